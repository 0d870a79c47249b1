use std::fmt;

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Reason phrase for an HTTP status code
///
/// Uses the standard registry (404 is `"Not Found"`, 429 is `"Too Many
/// Requests"`). Codes without a registered phrase map to `"Unknown"`.
#[must_use]
pub fn reason_phrase(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown")
}

/// A structured error value with a fixed HTTP classification
///
/// Immutable once constructed: the status, message, attached data and
/// optional auth challenge are trusted as-is by the response builder and
/// survive the conversion to a JSON payload unchanged (subject only to the
/// 5xx message redaction rule).
#[derive(Debug, Clone)]
pub struct RichError {
    status: StatusCode,
    message: Option<String>,
    data: Option<Value>,
    challenge: Option<String>,
}

impl RichError {
    /// Create an error classified under the given status code
    #[must_use]
    pub const fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: None,
            data: None,
            challenge: None,
        }
    }

    /// Attach a client-facing message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach arbitrary structured context, passed through to the payload's
    /// `data` field verbatim
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach a `WWW-Authenticate` challenge, emitted on 401 responses only
    #[must_use]
    pub fn with_challenge(mut self, challenge: impl Into<String>) -> Self {
        self.challenge = Some(challenge.into());
        self
    }

    /// Status code this error was classified under
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Reason phrase for the embedded status code
    #[must_use]
    pub fn reason(&self) -> &'static str {
        reason_phrase(self.status)
    }

    /// Client-facing message, if one was attached
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Structured context, if any was attached
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Auth challenge, if one was attached
    #[must_use]
    pub fn challenge(&self) -> Option<&str> {
        self.challenge.as_deref()
    }
}

impl fmt::Display for RichError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => write!(f, "{} {}", self.status.as_u16(), self.reason()),
        }
    }
}

impl std::error::Error for RichError {}

/// An error caught at the handler boundary
///
/// Explicit tagged union over the two kinds of failure a handler can
/// surface: a pre-classified [`RichError`], or any other error, optionally
/// tagged with an ad-hoc status hint.
#[derive(Debug, Error)]
pub enum CaughtError {
    /// Pre-classified structured error, used as constructed
    #[error(transparent)]
    Rich(#[from] RichError),

    /// Any other failure
    #[error("{error}")]
    Generic {
        /// Ad-hoc status hint carried alongside the error, if any
        status: Option<StatusCode>,
        /// The underlying error
        error: anyhow::Error,
    },
}

impl CaughtError {
    /// Wrap an error with an ad-hoc status hint
    #[must_use]
    pub fn with_status(status: StatusCode, error: impl Into<anyhow::Error>) -> Self {
        Self::Generic {
            status: Some(status),
            error: error.into(),
        }
    }
}

impl From<anyhow::Error> for CaughtError {
    fn from(error: anyhow::Error) -> Self {
        Self::Generic { status: None, error }
    }
}
