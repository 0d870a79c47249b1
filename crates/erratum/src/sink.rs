//! Diagnostic side channel
//!
//! When the dump flag is enabled, the caught error is handed to a
//! [`DiagnosticSink`] before the response is built. This is an operator
//! side channel only; it never alters the status code or the payload.

use crate::error::CaughtError;

/// Receiver for caught errors, injected at wrap time
pub trait DiagnosticSink: Send + Sync {
    /// Record a caught error, synchronously
    fn dump(&self, error: &CaughtError);
}

/// Emits caught errors through `tracing`
///
/// The generic case logs the full anyhow chain (and backtrace, when
/// captured) via its `Debug` form.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn dump(&self, error: &CaughtError) {
        match error {
            CaughtError::Rich(rich) => {
                tracing::error!(status = rich.status().as_u16(), error = %rich, "handler error");
            }
            CaughtError::Generic { status, error } => {
                tracing::error!(status = status.map(|s| s.as_u16()), error = ?error, "handler error");
            }
        }
    }
}

/// Writes caught errors to standard error
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn dump(&self, error: &CaughtError) {
        match error {
            CaughtError::Rich(rich) => eprintln!("{rich}"),
            CaughtError::Generic { error, .. } => eprintln!("{error:?}"),
        }
    }
}
