//! Request correlation and access logging.
//!
//! Every request leaves with an `x-request-id` header (the caller's, or a
//! fresh nanoid) and runs inside an `http_request` span that carries the
//! route template, final status and latency.

use std::time::Duration;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderMap, HeaderName, Request},
    middleware::{from_fn, Next},
    response::Response,
    Router,
};
use tower_http::{
    request_id::{
        MakeRequestId, PropagateRequestIdLayer, RequestId as HeaderRequestId, SetRequestIdLayer,
    },
    trace::TraceLayer,
};
use tracing::{field::Empty, Span};

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request id as seen by handlers, available via `Extension<RequestId>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| Self(v.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Copy, Default)]
struct NanoId;

impl MakeRequestId for NanoId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<HeaderRequestId> {
        nanoid::nanoid!().parse().ok().map(HeaderRequestId::new)
    }
}

/// Wrap `router` so each request is assigned an id, traced and answered
/// with the id echoed back.
pub(crate) fn with_request_tracing(router: Router) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(request_span)
        .on_response(record_response);

    router
        .layer(from_fn(attach_request_id))
        .layer(trace)
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER.clone(), NanoId))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER.clone()))
}

fn request_span(req: &Request<Body>) -> Span {
    let request_id = RequestId::from_headers(req.headers());
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or("<fallback>");

    tracing::info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        route = %route,
        request_id = %request_id.as_ref().map_or("", RequestId::as_str),
        status = Empty,
        latency_ms = Empty,
    )
}

fn record_response(res: &Response, latency: Duration, span: &Span) {
    let status = res.status().as_u16();
    let latency_ms = latency.as_millis() as u64;
    span.record("status", status);
    span.record("latency_ms", latency_ms);

    if res.status().is_server_error() {
        tracing::warn!(parent: span, status, latency_ms, "request completed");
    } else {
        tracing::debug!(parent: span, status, latency_ms, "request completed");
    }
}

async fn attach_request_id(mut req: Request<Body>, next: Next) -> Response {
    if let Some(id) = RequestId::from_headers(req.headers()) {
        req.extensions_mut().insert(id);
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Extension};
    use tower::ServiceExt;
    use tracing_test::traced_test;

    async fn echo(Extension(id): Extension<RequestId>) -> String {
        id.0
    }

    fn app() -> Router {
        with_request_tracing(Router::new().route("/orders/{id}", get(echo)))
    }

    #[test]
    fn blank_header_is_not_a_request_id() {
        let mut headers = HeaderMap::new();
        assert_eq!(RequestId::from_headers(&headers), None);

        headers.insert(REQUEST_ID_HEADER.clone(), "".parse().unwrap());
        assert_eq!(RequestId::from_headers(&headers), None);

        headers.insert(REQUEST_ID_HEADER.clone(), "rid-7".parse().unwrap());
        assert_eq!(RequestId::from_headers(&headers), Some(RequestId("rid-7".into())));
    }

    #[traced_test]
    #[tokio::test]
    async fn completed_request_logs_route_template_and_status() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/orders/42")
                    .header(&REQUEST_ID_HEADER, "rid-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[&REQUEST_ID_HEADER], "rid-42");
        assert!(logs_contain("request completed"));
        assert!(logs_contain("status=200"));
        assert!(logs_contain("route=/orders/{id}"));
        assert!(logs_contain("request_id=rid-42"));
    }

    #[traced_test]
    #[tokio::test]
    async fn generated_id_reaches_handler_and_response() {
        let response = app()
            .oneshot(Request::builder().uri("/orders/1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response.headers()[&REQUEST_ID_HEADER].to_str().unwrap().to_owned();
        assert_eq!(header.len(), 21);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, header.as_bytes());
    }
}
