use axum::{
    http::{StatusCode, Uri},
    response::{Html, Json},
};
use api_errors::{Problem, ProblemResponse};
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// RFC 9457 body for unmatched routes
pub async fn not_found(uri: Uri) -> ProblemResponse {
    Problem::new(
        StatusCode::NOT_FOUND,
        "Not Found",
        format!("no route for {}", uri.path()),
    )
    .with_instance(uri.path())
    .with_code("api_ingress.route.not_found.v1")
    .into()
}

pub async fn serve_docs() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>CRM API Docs</title>
  <script src="https://unpkg.com/@stoplight/elements@latest/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@latest/styles.min.css">
</head>
<body>
  <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
</body>
</html>"#,
    )
}
