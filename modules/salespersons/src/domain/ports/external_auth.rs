use async_trait::async_trait;

use crate::domain::error::DomainError;

/// External identity provider holding the login account of a team member.
///
/// Its lifecycle is independent of the database; callers treat failures as
/// recoverable.
#[async_trait]
pub trait ExternalAuthPort: Send + Sync {
    async fn delete_account(&self, auth_uid: &str) -> Result<(), DomainError>;
}
