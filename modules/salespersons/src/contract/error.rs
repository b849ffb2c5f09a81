use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SalespersonsError {
    #[error("Salesperson not found: {identifier}")]
    NotFound { identifier: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Deletion aborted: {message}")]
    Aborted { message: String },

    #[error("Identity provider error: {message}")]
    ExternalAuth { message: String },

    #[error("Internal error")]
    Internal,
}

impl SalespersonsError {
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self::Aborted {
            message: message.into(),
        }
    }

    pub fn external_auth(message: impl Into<String>) -> Self {
        Self::ExternalAuth {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}
