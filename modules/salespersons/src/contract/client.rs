use async_trait::async_trait;

use crate::contract::model::{DeletionReport, OwnedDependencies, ResolvedIdentity, Salesperson};

/// Public API trait for the salespersons module that other modules can use
#[async_trait]
pub trait SalespersonsApi: Send + Sync {
    /// Resolve an id, external-auth uid or email to its identity records
    async fn resolve(&self, identifier: &str) -> anyhow::Result<ResolvedIdentity>;

    /// List salespersons with optional pagination
    async fn list_salespersons(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> anyhow::Result<Vec<Salesperson>>;

    /// Prospects, activities and reminders owned by the identity behind
    /// `identifier`, i.e. what a delete would remove
    async fn owned_dependencies(&self, identifier: &str) -> anyhow::Result<OwnedDependencies>;

    /// Remove a salesperson together with its prospects, activities, reminders
    /// and external auth account
    async fn delete_salesperson(&self, identifier: &str, force: bool)
        -> anyhow::Result<DeletionReport>;
}
