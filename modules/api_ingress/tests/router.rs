use std::time::Duration;

use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

use api_ingress::request_id::RequestId;
use api_ingress::{ApiIngress, ApiIngressConfig};

fn ingress(config: ApiIngressConfig) -> ApiIngress {
    ApiIngress::new(config, Some(Duration::from_secs(5)))
}

fn app_with(config: ApiIngressConfig) -> Router {
    let routes = Router::new().route("/echo", get(echo_request_id));
    let mut openapi = utoipa::openapi::OpenApi::default();
    openapi.info.title = "CRM test".into();
    ingress(config).build_router(routes, openapi).unwrap()
}

fn app() -> Router {
    app_with(ApiIngressConfig::default())
}

async fn echo_request_id(Extension(RequestId(request_id)): Extension<RequestId>) -> Json<Value> {
    Json(json!({ "request_id": request_id }))
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn generates_request_id_when_missing() {
    let response = app()
        .oneshot(Request::builder().uri("/echo").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("x-request-id should be generated");
    assert!(!header.is_empty());

    let json = body_json(response).await;
    assert_eq!(json["request_id"], header.as_str());
}

#[tokio::test]
async fn preserves_incoming_request_id() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/echo")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("abc-123")
    );
    assert_eq!(body_json(response).await["request_id"], "abc-123");
}

#[tokio::test]
async fn health_reports_healthy() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn openapi_document_is_served_when_docs_enabled() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["info"]["title"], "CRM test");
}

#[tokio::test]
async fn docs_routes_are_absent_when_disabled() {
    let config = ApiIngressConfig {
        enable_docs: false,
        ..ApiIngressConfig::default()
    };
    let response = app_with(config)
        .oneshot(Request::builder().uri("/docs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_returns_problem_json() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/problem+json")
    );
    let json = body_json(response).await;
    assert_eq!(json["status"], 404);
    assert_eq!(json["instance"], "/nope");
    assert_eq!(json["code"], "api_ingress.route.not_found.v1");
}
