//! Admin key check for the salespersons routes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderName,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::ErrorCode;

pub fn admin_key_header() -> HeaderName {
    HeaderName::from_static("x-admin-key")
}

/// Expected admin key. `None` disables the check.
#[derive(Clone, Default)]
pub struct AdminKey(Option<Arc<str>>);

impl AdminKey {
    pub fn new(key: Option<String>) -> Self {
        Self(key.filter(|k| !k.is_empty()).map(Arc::from))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }
}

pub async fn require_admin_key(
    State(expected): State<AdminKey>,
    req: Request,
    next: Next,
) -> Response {
    let Some(expected) = expected.0.as_deref() else {
        return next.run(req).await;
    };

    let supplied = req
        .headers()
        .get(admin_key_header())
        .and_then(|v| v.to_str().ok());
    if supplied == Some(expected) {
        return next.run(req).await;
    }

    let request_id = super::handlers::request_id(req.headers());
    tracing::warn!(path = %req.uri().path(), "admin key missing or wrong");
    ErrorCode::salespersons_auth_unauthorized_v1
        .to_response(
            "a valid x-admin-key header is required",
            req.uri().path(),
            request_id,
        )
        .into_response()
}
