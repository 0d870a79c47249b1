//! Catch errors from async HTTP handlers and convert them into structured
//! JSON error responses
//!
//! A handler is an async function taking a request and a [`ResponseContext`]
//! and returning `Result<Response, CaughtError>`. Wrapping it with
//! [`ErrorHandler`] yields an infallible function of the same shape: errors
//! are classified to a status code, normalized into a
//! `{ statusCode, error, message, data? }` JSON payload and emitted with
//! `Content-Type: application/json`. Messages on 5xx responses are always
//! replaced with a fixed generic phrase so internals never reach clients.
//!
//! ```
//! use axum::response::Response;
//! use erratum::{CaughtError, ErrorHandler, ResponseContext, RichError};
//! use http::{Request, StatusCode};
//!
//! async fn find_user(
//!     _request: Request<()>,
//!     _context: ResponseContext,
//! ) -> Result<Response, CaughtError> {
//!     Err(RichError::new(StatusCode::NOT_FOUND)
//!         .with_message("no such user")
//!         .into())
//! }
//!
//! # async fn demo() {
//! let wrapped = ErrorHandler::new().wrap(find_user);
//! let response = wrapped(Request::new(())).await;
//! assert_eq!(response.status(), StatusCode::NOT_FOUND);
//! # }
//! ```

pub mod classify;
pub mod context;
pub mod error;
pub mod handler;
pub mod respond;
pub mod sink;

pub use classify::resolve_status;
pub use context::ResponseContext;
pub use error::{CaughtError, RichError, reason_phrase};
pub use handler::ErrorHandler;
pub use respond::{ErrorPayload, ErrorResponse, INTERNAL_ERROR_MESSAGE, build_response};
pub use sink::{DiagnosticSink, StderrSink, TracingSink};
