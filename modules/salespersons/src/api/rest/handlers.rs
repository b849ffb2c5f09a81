use std::sync::Arc;

use api_errors::{Problem, ProblemResponse};
use axum::{
    extract::{rejection::QueryRejection, Path, Query},
    http::{HeaderMap, Uri},
    response::Json,
    Extension,
};
use tracing::info;

use crate::api::rest::dto::{
    DeleteSalespersonQuery, DeleteSalespersonResponse, IdentityDto, ListSalespersonsQuery,
    OwnedDependenciesDto, SalespersonDto, SalespersonListDto,
};
use crate::api::rest::error::domain_error_to_problem;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

pub(crate) fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Malformed query strings answer with the same 400 Problem as other bad input.
fn rejected_query(
    rejection: QueryRejection,
    field: &str,
    uri: &Uri,
    headers: &HeaderMap,
) -> ProblemResponse {
    domain_error_to_problem(
        &DomainError::validation(field, rejection.body_text()),
        uri.path(),
        request_id(headers),
    )
}

/// List salespersons with optional pagination
#[utoipa::path(
    get,
    path = "/salespersons",
    operation_id = "salespersons.list_salespersons",
    tag = "salespersons",
    params(ListSalespersonsQuery),
    responses(
        (status = 200, description = "List of salespersons", body = SalespersonListDto),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_salespersons(
    Extension(svc): Extension<Arc<Service>>,
    query: Result<Query<ListSalespersonsQuery>, QueryRejection>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Json<SalespersonListDto>, ProblemResponse> {
    let Query(query) = query.map_err(|rej| rejected_query(rej, "query", &uri, &headers))?;
    info!("Listing salespersons with query: {:?}", query);

    let rows = svc
        .list_salespersons(query.limit, query.offset)
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path(), request_id(&headers)))?;

    let salespersons: Vec<SalespersonDto> = rows.into_iter().map(Into::into).collect();
    Ok(Json(SalespersonListDto {
        total: salespersons.len(),
        limit: svc.page_limit(query.limit),
        offset: query.offset.unwrap_or(0),
        salespersons,
    }))
}

/// Resolve an id, external-auth uid or email to its identity records
#[utoipa::path(
    get,
    path = "/salespersons/{id}",
    operation_id = "salespersons.get_salesperson",
    tag = "salespersons",
    params(("id" = String, Path, description = "Primary key, external-auth uid or email")),
    responses(
        (status = 200, description = "Identity found", body = IdentityDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_salesperson(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Json<IdentityDto>, ProblemResponse> {
    info!("Resolving salesperson: {}", id);

    svc.resolve_salesperson(&id)
        .await
        .map(|identity| Json(identity.into()))
        .map_err(|e| domain_error_to_problem(&e, uri.path(), request_id(&headers)))
}

/// Prospects, activities and reminders a delete would remove
#[utoipa::path(
    get,
    path = "/salespersons/{id}/prospects",
    operation_id = "salespersons.owned_dependencies",
    tag = "salespersons",
    params(("id" = String, Path, description = "Primary key, external-auth uid or email")),
    responses(
        (status = 200, description = "Owned records", body = OwnedDependenciesDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn owned_dependencies(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Json<OwnedDependenciesDto>, ProblemResponse> {
    info!("Collecting records owned by: {}", id);

    svc.owned_dependencies(&id)
        .await
        .map(|deps| Json(deps.into()))
        .map_err(|e| domain_error_to_problem(&e, uri.path(), request_id(&headers)))
}

/// Delete a salesperson with its prospects, activities, reminders and auth account
#[utoipa::path(
    delete,
    path = "/salespersons/{id}",
    operation_id = "salespersons.delete_salesperson",
    tag = "salespersons",
    params(
        ("id" = String, Path, description = "Primary key, external-auth uid or email"),
        DeleteSalespersonQuery,
    ),
    responses(
        (status = 200, description = "Salesperson deleted", body = DeleteSalespersonResponse),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Nothing found; retry with force=true", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Deletion rolled back", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn delete_salesperson(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
    query: Result<Query<DeleteSalespersonQuery>, QueryRejection>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Json<DeleteSalespersonResponse>, ProblemResponse> {
    let Query(query) = query.map_err(|rej| rejected_query(rej, "force", &uri, &headers))?;
    let force = query.force.unwrap_or(false);
    info!("Deleting salesperson: {} (force={})", id, force);

    svc.delete_salesperson(&id, force)
        .await
        .map(|report| Json(report.into()))
        .map_err(|e| domain_error_to_problem(&e, uri.path(), request_id(&headers)))
}

/// `DELETE /salespersons` without an identifier
pub async fn delete_without_identifier(uri: Uri, headers: HeaderMap) -> ProblemResponse {
    domain_error_to_problem(
        &DomainError::validation("id", "a salesperson identifier is required"),
        uri.path(),
        request_id(&headers),
    )
}
