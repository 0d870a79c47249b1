//! Error normalization and emission
//!
//! Builds the JSON payload for a caught error and converts it into an HTTP
//! response. The payload shape is `{ statusCode, error, message?, data? }`;
//! `error` is the reason phrase for the resolved status. Messages on 5xx
//! responses are redacted so internals never leak to clients.

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::header::{CONTENT_TYPE, WWW_AUTHENTICATE};
use http::{HeaderValue, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::error::{CaughtError, reason_phrase};

/// Fixed message substituted for 5xx responses
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred";

/// Canned body used when payload serialization itself fails
const FALLBACK_BODY: &str =
    r#"{"statusCode":500,"error":"Internal Server Error","message":"An internal server error occurred"}"#;

/// Normalized JSON error payload
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    /// Resolved status code
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Reason phrase for the resolved status
    pub error: &'static str,
    /// Client-facing message, omitted when the error carried none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Caller-supplied structured context, omitted when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A fully normalized error response, ready to emit
#[derive(Debug)]
pub struct ErrorResponse {
    /// Final status code
    pub status: StatusCode,
    /// JSON body
    pub payload: ErrorPayload,
    /// `WWW-Authenticate` challenge, present only for 401 responses
    pub challenge: Option<String>,
}

/// Build the normalized response for a caught error
///
/// `status` must come from [`crate::classify::resolve_status`]; it drives
/// the reason phrase and the redaction rule even when it differs from a
/// rich error's embedded status (the sub-400 floor rewrite).
#[must_use]
pub fn build_response(caught: &CaughtError, status: StatusCode) -> ErrorResponse {
    let (message, data, challenge) = match caught {
        CaughtError::Rich(rich) => (
            rich.message().map(str::to_owned),
            rich.data().cloned(),
            rich.challenge().map(str::to_owned),
        ),
        CaughtError::Generic { error, .. } => (Some(error.to_string()), None, None),
    };

    // Server faults never expose the original message text.
    let message = if status.as_u16() >= 500 {
        message.map(|_| INTERNAL_ERROR_MESSAGE.to_owned())
    } else {
        message
    };

    let challenge = if status == StatusCode::UNAUTHORIZED {
        challenge
    } else {
        None
    };

    ErrorResponse {
        status,
        payload: ErrorPayload {
            status_code: status.as_u16(),
            error: reason_phrase(status),
            message,
            data,
        },
        challenge,
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let (status, body) = match serde_json::to_vec(&self.payload) {
            Ok(body) => (self.status, body),
            Err(error) => {
                tracing::error!(%error, "failed to serialize error payload");
                (StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_BODY.as_bytes().to_vec())
            }
        };

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(challenge) = self.challenge {
            match HeaderValue::from_str(&challenge) {
                Ok(value) => {
                    response.headers_mut().insert(WWW_AUTHENTICATE, value);
                }
                Err(error) => {
                    tracing::warn!(%error, "challenge is not a valid header value, skipping");
                }
            }
        }

        response
    }
}
