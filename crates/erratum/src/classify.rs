//! Status-code resolution policy
//!
//! Decides the final status for a caught error from, in order of
//! precedence: the rich error's embedded status, an ad-hoc status hint on a
//! generic error, a status the handler pre-set on the response context, and
//! finally 500. An error response must never report a non-error status, so
//! anything that resolves below 400 is rewritten to 500.

use http::StatusCode;

use crate::error::CaughtError;

/// Resolve the status code for a caught error
///
/// `preset` is the status the handler set on the response context before
/// failing, if it touched it at all. Total function: always returns a
/// status in the 400..=999 range.
#[must_use]
pub fn resolve_status(caught: &CaughtError, preset: Option<StatusCode>) -> StatusCode {
    let resolved = match caught {
        CaughtError::Rich(rich) => rich.status(),
        CaughtError::Generic { status: Some(hint), .. } => *hint,
        CaughtError::Generic { status: None, .. } => {
            preset.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
    };

    // A sub-400 status on an error path is a handler mistake, e.g. setting
    // 200 and then failing.
    if resolved.as_u16() < 400 {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        resolved
    }
}
