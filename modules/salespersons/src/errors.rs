//! Error catalog for the salespersons module.
//!
//! Codes are stable and versioned; the REST layer only emits problems built
//! from this table.

use api_errors::{ErrDef, Problem, ProblemResponse};

/// Strongly-typed error codes from the catalog
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// salespersons.request.invalid.v1
    salespersons_request_invalid_v1,
    /// salespersons.auth.unauthorized.v1
    salespersons_auth_unauthorized_v1,
    /// salespersons.salesperson.not_found.v1
    salespersons_salesperson_not_found_v1,
    /// salespersons.cascade.transaction_failed.v1
    salespersons_cascade_transaction_failed_v1,
    /// salespersons.internal.database.v1
    salespersons_internal_database_v1,
    /// salespersons.external_auth.failed.v1
    salespersons_external_auth_failed_v1,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 6] = [
        Self::salespersons_request_invalid_v1,
        Self::salespersons_auth_unauthorized_v1,
        Self::salespersons_salesperson_not_found_v1,
        Self::salespersons_cascade_transaction_failed_v1,
        Self::salespersons_internal_database_v1,
        Self::salespersons_external_auth_failed_v1,
    ];

    /// Get the HTTP status code for this error
    pub const fn status(&self) -> u16 {
        self.def().status
    }

    /// Get the error definition for this error code
    pub const fn def(&self) -> ErrDef {
        match self {
            Self::salespersons_request_invalid_v1 => ErrDef {
                status: 400,
                title: "Invalid Request",
                code: "salespersons.request.invalid.v1",
                type_url: "https://errors.crm.local/salespersons.request.invalid.v1",
            },
            Self::salespersons_auth_unauthorized_v1 => ErrDef {
                status: 401,
                title: "Unauthorized",
                code: "salespersons.auth.unauthorized.v1",
                type_url: "https://errors.crm.local/salespersons.auth.unauthorized.v1",
            },
            Self::salespersons_salesperson_not_found_v1 => ErrDef {
                status: 404,
                title: "Salesperson Not Found",
                code: "salespersons.salesperson.not_found.v1",
                type_url: "https://errors.crm.local/salespersons.salesperson.not_found.v1",
            },
            Self::salespersons_cascade_transaction_failed_v1 => ErrDef {
                status: 500,
                title: "Deletion Aborted",
                code: "salespersons.cascade.transaction_failed.v1",
                type_url: "https://errors.crm.local/salespersons.cascade.transaction_failed.v1",
            },
            Self::salespersons_internal_database_v1 => ErrDef {
                status: 500,
                title: "Internal Database Error",
                code: "salespersons.internal.database.v1",
                type_url: "https://errors.crm.local/salespersons.internal.database.v1",
            },
            Self::salespersons_external_auth_failed_v1 => ErrDef {
                status: 502,
                title: "Identity Provider Error",
                code: "salespersons.external_auth.failed.v1",
                type_url: "https://errors.crm.local/salespersons.external_auth.failed.v1",
            },
        }
    }

    /// Convert to Problem with detail (without instance/request id)
    pub fn to_problem(&self, detail: impl Into<String>) -> Problem {
        self.def().to_problem(detail)
    }

    /// Create a full ProblemResponse with context (recommended for handlers)
    pub fn to_response(
        &self,
        detail: impl Into<String>,
        instance: &str,
        request_id: Option<String>,
    ) -> ProblemResponse {
        self.def().to_response(detail, instance, request_id)
    }
}
