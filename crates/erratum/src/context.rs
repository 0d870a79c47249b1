//! Per-request response context
//!
//! Handlers receive a [`ResponseContext`] alongside the request and may
//! pre-set a status code or headers through it, mirroring a mutable server
//! response object. The wrapper reads the context back after the handler
//! finishes: on success it applies the staged status and headers to the
//! returned response, on failure the staged status feeds status resolution
//! and the staged headers are preserved on the error response.

use std::sync::{Arc, Mutex, PoisonError};

use axum::response::Response;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

#[derive(Debug, Default)]
struct ContextState {
    status: Option<StatusCode>,
    headers: HeaderMap,
}

/// Mutable per-request status and header staging area
///
/// Cheap to clone; clones share the same underlying state for the duration
/// of one request. A fresh context is created per invocation, nothing is
/// shared across requests.
#[derive(Debug, Clone, Default)]
pub struct ResponseContext {
    inner: Arc<Mutex<ContextState>>,
}

impl ResponseContext {
    /// Create an untouched context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a response status code
    pub fn set_status(&self, status: StatusCode) {
        self.lock().status = Some(status);
    }

    /// Staged status, if the handler set one
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.lock().status
    }

    /// Stage a response header
    pub fn set_header(&self, name: HeaderName, value: HeaderValue) {
        self.lock().headers.insert(name, value);
    }

    /// Apply staged status and headers to a successful response
    pub(crate) fn apply(&self, response: &mut Response) {
        let state = self.lock();
        if let Some(status) = state.status {
            *response.status_mut() = status;
        }
        for (name, value) in &state.headers {
            response.headers_mut().insert(name, value.clone());
        }
    }

    /// Merge staged headers into an error response without overriding the
    /// headers the responder set itself
    pub(crate) fn merge_headers(&self, response: &mut Response) {
        let state = self.lock();
        for (name, value) in &state.headers {
            if !response.headers().contains_key(name) {
                response.headers_mut().insert(name, value.clone());
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ContextState> {
        // A poisoned lock means a panic elsewhere in this request; the
        // staged state is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
