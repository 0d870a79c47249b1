//! Handler wrapping
//!
//! [`ErrorHandler`] is the boundary that makes a fallible async handler
//! infallible: it invokes the handler with a fresh [`ResponseContext`],
//! passes successful responses through, and converts any [`CaughtError`]
//! into a normalized JSON error response. Nothing propagates past it.

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use http::Request;

use crate::classify::resolve_status;
use crate::context::ResponseContext;
use crate::error::CaughtError;
use crate::respond::build_response;
use crate::sink::{DiagnosticSink, TracingSink};

/// Error-catching wrapper around fallible async handlers
///
/// A handler is any async function of `(Request<B>, ResponseContext)`
/// returning `Result<Response, CaughtError>`. Wrapping yields a function of
/// the dispatcher's shape that always produces a response.
#[derive(Clone)]
pub struct ErrorHandler {
    dump: bool,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorHandler {
    /// Create a wrapper with dumping disabled and [`TracingSink`] as the
    /// diagnostic sink
    #[must_use]
    pub fn new() -> Self {
        Self {
            dump: false,
            sink: Arc::new(TracingSink),
        }
    }

    /// Enable or disable dumping caught errors to the diagnostic sink
    #[must_use]
    pub const fn with_dump(mut self, enabled: bool) -> Self {
        self.dump = enabled;
        self
    }

    /// Replace the diagnostic sink
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Invoke a handler once, converting any error into a response
    ///
    /// On success the context's staged status and headers are applied to
    /// the handler's response and classification never runs. On failure the
    /// pipeline is strictly ordered: dump (if enabled), resolve status,
    /// build payload, emit.
    pub async fn run<B, F, Fut>(&self, handler: F, request: Request<B>) -> Response
    where
        F: FnOnce(Request<B>, ResponseContext) -> Fut,
        Fut: Future<Output = Result<Response, CaughtError>>,
    {
        let context = ResponseContext::new();

        match handler(request, context.clone()).await {
            Ok(mut response) => {
                context.apply(&mut response);
                response
            }
            Err(caught) => {
                if self.dump {
                    self.sink.dump(&caught);
                }

                let status = resolve_status(&caught, context.status());
                let mut response = build_response(&caught, status).into_response();
                context.merge_headers(&mut response);
                response
            }
        }
    }

    /// Wrap a handler into a function of the dispatcher's shape
    ///
    /// The returned function is cloneable and owns its configuration, so it
    /// can be registered with any dispatcher that accepts
    /// `Fn(Request<B>) -> Future<Output = Response>`.
    #[must_use]
    pub fn wrap<B, F, Fut>(self, handler: F) -> impl Fn(Request<B>) -> BoxFuture<'static, Response> + Clone
    where
        B: Send + 'static,
        F: Fn(Request<B>, ResponseContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, CaughtError>> + Send + 'static,
    {
        move |request| {
            let this = self.clone();
            let handler = handler.clone();
            Box::pin(async move { this.run(handler, request).await })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::body::Body;
    use http::{HeaderValue, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    use super::*;
    use crate::error::RichError;

    #[derive(Default)]
    struct RecordingSink {
        seen: Mutex<Vec<String>>,
    }

    impl DiagnosticSink for RecordingSink {
        fn dump(&self, error: &CaughtError) {
            self.seen.lock().unwrap().push(error.to_string());
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn request() -> Request<Body> {
        Request::new(Body::empty())
    }

    #[tokio::test]
    async fn success_passes_through() {
        let response = ErrorHandler::new()
            .run(
                |_req, _ctx| async { Ok((StatusCode::OK, "hello").into_response()) },
                request(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn success_applies_staged_status_and_headers() {
        let response = ErrorHandler::new()
            .run(
                |_req, ctx: ResponseContext| async move {
                    ctx.set_status(StatusCode::CREATED);
                    ctx.set_header(
                        header::HeaderName::from_static("x-request-id"),
                        HeaderValue::from_static("abc123"),
                    );
                    Ok("created".into_response())
                },
                request(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
            Some("abc123")
        );
    }

    #[tokio::test]
    async fn generic_error_becomes_500() {
        let response = ErrorHandler::new()
            .run(
                |_req, _ctx| async { Err(anyhow::anyhow!("Whoops").into()) },
                request(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({
                "statusCode": 500,
                "error": "Internal Server Error",
                "message": "An internal server error occurred",
            })
        );
    }

    #[tokio::test]
    async fn preset_status_shapes_the_error() {
        let response = ErrorHandler::new()
            .run(
                |_req, ctx: ResponseContext| async move {
                    ctx.set_status(StatusCode::UNAUTHORIZED);
                    Err(anyhow::anyhow!("Access denied").into())
                },
                request(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({
                "statusCode": 401,
                "error": "Unauthorized",
                "message": "Access denied",
            })
        );
    }

    #[tokio::test]
    async fn staged_headers_survive_the_error_path() {
        let response = ErrorHandler::new()
            .run(
                |_req, ctx: ResponseContext| async move {
                    ctx.set_header(
                        header::HeaderName::from_static("x-request-id"),
                        HeaderValue::from_static("abc123"),
                    );
                    Err(CaughtError::from(RichError::new(StatusCode::NOT_FOUND)))
                },
                request(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
            Some("abc123")
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn sink_sees_the_error_only_when_dump_enabled() {
        let sink = Arc::new(RecordingSink::default());

        let response = ErrorHandler::new()
            .with_dump(true)
            .with_sink(sink.clone())
            .run(
                |_req, _ctx| async { Err(anyhow::anyhow!("boom").into()) },
                request(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(sink.seen.lock().unwrap().as_slice(), ["boom"]);

        let quiet = Arc::new(RecordingSink::default());
        ErrorHandler::new()
            .with_sink(quiet.clone())
            .run(
                |_req, _ctx| async { Err(anyhow::anyhow!("boom").into()) },
                request(),
            )
            .await;

        assert!(quiet.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn wrapped_function_is_callable_and_cloneable() {
        let wrapped = ErrorHandler::new().wrap(|_req: Request<Body>, _ctx| async {
            Err::<Response, _>(CaughtError::from(
                RichError::new(StatusCode::TOO_MANY_REQUESTS).with_message("Rate limit exceeded"),
            ))
        });

        let clone = wrapped.clone();
        let response = clone(request()).await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body_json(response).await,
            json!({
                "statusCode": 429,
                "error": "Too Many Requests",
                "message": "Rate limit exceeded",
            })
        );
    }
}
