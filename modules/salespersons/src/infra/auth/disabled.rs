use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::ports::ExternalAuthPort;

/// Used when no identity provider is configured. Every deletion fails, so
/// the response reports the external account as not removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledIdentityProvider;

#[async_trait]
impl ExternalAuthPort for DisabledIdentityProvider {
    async fn delete_account(&self, _auth_uid: &str) -> Result<(), DomainError> {
        Err(DomainError::external_auth("identity provider is not configured"))
    }
}
