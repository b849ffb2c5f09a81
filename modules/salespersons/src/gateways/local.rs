use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::SalespersonsApi,
    error::SalespersonsError,
    model::{DeletionReport, OwnedDependencies, ResolvedIdentity, Salesperson},
};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the SalespersonsApi trait that delegates to the domain service
pub struct SalespersonsLocalClient {
    service: Arc<Service>,
}

impl SalespersonsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SalespersonsApi for SalespersonsLocalClient {
    async fn resolve(&self, identifier: &str) -> anyhow::Result<ResolvedIdentity> {
        self.service
            .resolve_salesperson(identifier)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn list_salespersons(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> anyhow::Result<Vec<Salesperson>> {
        self.service
            .list_salespersons(limit, offset)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn owned_dependencies(&self, identifier: &str) -> anyhow::Result<OwnedDependencies> {
        self.service
            .owned_dependencies(identifier)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn delete_salesperson(
        &self,
        identifier: &str,
        force: bool,
    ) -> anyhow::Result<DeletionReport> {
        self.service
            .delete_salesperson(identifier, force)
            .await
            .map_err(map_domain_error_to_anyhow)
    }
}

/// Map domain errors to contract errors wrapped in anyhow
fn map_domain_error_to_anyhow(domain_error: DomainError) -> anyhow::Error {
    let contract_error = match domain_error {
        DomainError::NotFound { identifier } => SalespersonsError::not_found(identifier),
        DomainError::Validation { field, message } => {
            SalespersonsError::validation(format!("{field}: {message}"))
        }
        DomainError::Transaction { message } => SalespersonsError::aborted(message),
        DomainError::ExternalAuth { message } => SalespersonsError::external_auth(message),
        DomainError::Database { .. } => SalespersonsError::internal(),
    };

    anyhow::Error::new(contract_error)
}
