use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::get,
    Extension, Router,
};

use crate::api::rest::guard::{require_admin_key, AdminKey};
use crate::api::rest::handlers;
use crate::domain::service::Service;

pub fn register_routes(router: Router, service: Arc<Service>, admin_key: AdminKey) -> Router {
    let routes = Router::new()
        // GET /salespersons - List salespersons
        .route(
            "/salespersons",
            get(handlers::list_salespersons).delete(handlers::delete_without_identifier),
        )
        // GET/DELETE /salespersons/{id} - Resolve or cascade-delete
        .route(
            "/salespersons/{id}",
            get(handlers::get_salesperson).delete(handlers::delete_salesperson),
        )
        // GET /salespersons/{id}/prospects - Preview what a delete removes
        .route(
            "/salespersons/{id}/prospects",
            get(handlers::owned_dependencies),
        )
        .route_layer(from_fn_with_state(admin_key, require_admin_key))
        .layer(Extension(service));

    router.merge(routes)
}
