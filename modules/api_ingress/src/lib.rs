//! HTTP front door: health and docs endpoints, the shared middleware stack
//! and the server loop.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

pub struct ApiIngress {
    config: ApiIngressConfig,
    request_timeout: Option<Duration>,
}

impl ApiIngress {
    pub const NAME: &'static str = "api_ingress";

    /// `request_timeout` of `None` leaves requests unbounded.
    pub fn new(config: ApiIngressConfig, request_timeout: Option<Duration>) -> Self {
        Self {
            config,
            request_timeout,
        }
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Wrap module routes with `/health`, the OpenAPI endpoints and the
    /// middleware stack.
    pub fn build_router(&self, routes: Router, openapi: utoipa::openapi::OpenApi) -> Result<Router> {
        tracing::debug!("Building HTTP router");
        let mut router = routes.route("/health", get(web::health_check));

        if self.config.enable_docs {
            let doc = Arc::new(serde_json::to_value(&openapi).context("serialize OpenAPI document")?);
            let path_count = openapi.paths.paths.len();
            tracing::info!("Serving OpenAPI document with {path_count} paths");
            router = router
                .route(
                    "/openapi.json",
                    get(move || {
                        let doc = doc.clone();
                        async move {
                            ([(header::CACHE_CONTROL, "no-store")], Json((*doc).clone()))
                                .into_response()
                        }
                    }),
                )
                .route("/docs", get(web::serve_docs));
        }

        router = router.fallback(web::not_found);

        // Later layers wrap earlier ones; request tracing ends up outermost.
        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));
        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        if let Some(timeout) = self.request_timeout {
            router = router.layer(TimeoutLayer::new(timeout));
        }

        Ok(request_id::with_request_tracing(router))
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn serve<F>(&self, router: Router, addr: SocketAddr, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        tracing::info!("HTTP server bound on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server failed")
    }
}

/// Resolves on Ctrl-C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("HTTP server shutting down gracefully");
}
