use api_errors::ProblemResponse;
use tracing::{error, warn};

use crate::domain::error::DomainError;
use crate::errors::ErrorCode;

/// Map a domain error to an RFC 9457 problem for `instance`.
pub fn domain_error_to_problem(
    err: &DomainError,
    instance: &str,
    request_id: Option<String>,
) -> ProblemResponse {
    let (code, detail) = match err {
        DomainError::Validation { field, message } => (
            ErrorCode::salespersons_request_invalid_v1,
            format!("{field}: {message}"),
        ),
        DomainError::NotFound { identifier } => (
            ErrorCode::salespersons_salesperson_not_found_v1,
            format!(
                "No salesperson, user or owned prospects found for '{identifier}'. \
                 Retry with ?force=true to remove orphaned identity records."
            ),
        ),
        DomainError::Transaction { message } => (
            ErrorCode::salespersons_cascade_transaction_failed_v1,
            format!("Deletion rolled back: {message}"),
        ),
        DomainError::ExternalAuth { message } => (
            ErrorCode::salespersons_external_auth_failed_v1,
            format!("Identity provider call failed: {message}"),
        ),
        DomainError::Database { .. } => {
            (ErrorCode::salespersons_internal_database_v1, err.to_string())
        }
    };

    if code.status() >= 500 {
        error!(error = %err, instance, "request failed");
    } else {
        warn!(error = %err, instance, "request rejected");
    }

    code.to_response(detail, instance, request_id)
}
