use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::contract::model::{DeletionReport, OwnedDependencies, ResolvedIdentity, Salesperson};
use crate::domain::cascade::{CascadeDeleter, CascadeOutcome};
use crate::domain::dependencies::{collect_owned_prospects, owner_keys, prospect_ids};
use crate::domain::error::DomainError;
use crate::domain::force::force_delete;
use crate::domain::identity::{resolve, Resolution, SalespersonRef};
use crate::domain::ports::ExternalAuthPort;
use crate::domain::repo::CrmStore;

/// Domain service for salesperson lookup and removal.
#[derive(Clone)]
pub struct Service {
    store: Arc<dyn CrmStore>,
    auth: Arc<dyn ExternalAuthPort>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 500,
        }
    }
}

fn db_error(e: anyhow::Error) -> DomainError {
    DomainError::database(format!("{e:#}"))
}

fn deletion_message(identifier: &str, outcome: &CascadeOutcome, force_ran: bool) -> String {
    if force_ran {
        return format!("Force delete completed for '{identifier}'");
    }
    format!(
        "Salesperson '{identifier}' deleted with {} prospects, {} activities and {} reminders",
        outcome.prospects_deleted, outcome.activities_deleted, outcome.reminders_deleted
    )
}

impl Service {
    pub fn new(
        store: Arc<dyn CrmStore>,
        auth: Arc<dyn ExternalAuthPort>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            auth,
            config,
        }
    }

    /// Remove the identity behind `identifier` and everything it owns.
    ///
    /// With `force`, a fallback delete-many runs after the transaction when
    /// the cascade did not remove any identity row.
    #[instrument(name = "salespersons.service.delete_salesperson", skip(self))]
    pub async fn delete_salesperson(
        &self,
        identifier: &str,
        force: bool,
    ) -> Result<DeletionReport, DomainError> {
        let identifier = SalespersonRef::parse(identifier)?;
        info!("Deleting salesperson");

        let outcome = CascadeDeleter::new(self.store.as_ref(), self.auth.as_ref())
            .run(&identifier, force)
            .await?;

        let force_deleted = if force && !outcome.removed_identity_rows() {
            debug!("cascade removed no identity rows; running force fallback");
            Some(force_delete(self.store.repo(), &identifier).await)
        } else {
            None
        };

        let user_deleted = outcome.users_deleted > 0
            || force_deleted.is_some_and(|c| c.users > 0);
        let salesperson_deleted = outcome.salespersons_deleted > 0
            || force_deleted.is_some_and(|c| c.salespersons > 0);

        let report = DeletionReport {
            message: deletion_message(identifier.as_str(), &outcome, force_deleted.is_some()),
            user_deleted,
            salesperson_deleted,
            external_auth_deleted: outcome.external_auth_deleted,
            prospects_deleted: outcome.prospects_deleted,
            activities_deleted: outcome.activities_deleted,
            reminders_deleted: outcome.reminders_deleted,
            force_mode: force,
            force_deleted,
        };

        info!(
            user_deleted,
            salesperson_deleted,
            external_auth_deleted = report.external_auth_deleted,
            prospects = report.prospects_deleted,
            "Salesperson deletion finished"
        );
        Ok(report)
    }

    /// Resolve an identifier without touching anything.
    #[instrument(name = "salespersons.service.resolve_salesperson", skip(self))]
    pub async fn resolve_salesperson(
        &self,
        identifier: &str,
    ) -> Result<ResolvedIdentity, DomainError> {
        let identifier = SalespersonRef::parse(identifier)?;
        match resolve(self.store.repo(), &identifier, false)
            .await
            .map_err(db_error)?
        {
            Resolution::Found(identity) => Ok(identity),
            Resolution::NotFound => Err(DomainError::not_found(identifier.as_str())),
        }
    }

    /// Effective page size for a requested `limit`.
    pub fn page_limit(&self, limit: Option<u32>) -> u32 {
        limit
            .unwrap_or(self.config.default_page_size)
            .clamp(1, self.config.max_page_size.max(1))
    }

    #[instrument(name = "salespersons.service.list_salespersons", skip(self))]
    pub async fn list_salespersons(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Salesperson>, DomainError> {
        let limit = self.page_limit(limit);
        let offset = offset.unwrap_or(0);

        let rows = self
            .store
            .repo()
            .list_salespersons(u64::from(limit), u64::from(offset))
            .await
            .map_err(db_error)?;
        debug!("Listed {} salespersons", rows.len());
        Ok(rows)
    }

    /// What a cascade would remove for `identifier`, read outside any
    /// transaction.
    #[instrument(name = "salespersons.service.owned_dependencies", skip(self))]
    pub async fn owned_dependencies(
        &self,
        identifier: &str,
    ) -> Result<OwnedDependencies, DomainError> {
        let identifier = SalespersonRef::parse(identifier)?;
        let repo = self.store.repo();
        let identity = resolve(repo, &identifier, false)
            .await
            .map_err(db_error)?
            .into_identity();

        let prospects = collect_owned_prospects(repo, &owner_keys(&identifier, &identity))
            .await
            .map_err(db_error)?;

        if identity.is_empty() && prospects.is_empty() {
            return Err(DomainError::not_found(identifier.as_str()));
        }

        let ids = prospect_ids(&prospects);
        let (activities, reminders) = if ids.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            (
                repo.find_activities_for(&ids).await.map_err(db_error)?,
                repo.find_reminders_for(&ids).await.map_err(db_error)?,
            )
        };

        Ok(OwnedDependencies {
            identity,
            prospects,
            activities,
            reminders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::auth::DisabledIdentityProvider;
    use crate::infra::storage::migrations::Migrator;
    use crate::infra::storage::SeaOrmCrmStore;
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;
    use tracing_test::traced_test;

    async fn service() -> Service {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        Service::new(
            Arc::new(SeaOrmCrmStore::new(db)),
            Arc::new(DisabledIdentityProvider),
            ServiceConfig::default(),
        )
    }

    #[tokio::test]
    #[traced_test]
    async fn delete_runs_inside_named_span() {
        let svc = service().await;
        let _ = svc.delete_salesperson("uid-traced", false).await;

        assert!(logs_contain("salespersons.service.delete_salesperson"));
        assert!(logs_contain("Deleting salesperson"));
    }

    #[tokio::test]
    #[traced_test]
    async fn force_fallback_is_logged() {
        let svc = service().await;
        let report = svc.delete_salesperson("uid-ghost", true).await.unwrap();

        assert_eq!(report.force_deleted, Some(Default::default()));
        assert!(logs_contain("force delete finished"));
        assert_eq!(report.message, "Force delete completed for 'uid-ghost'");
    }

    #[test]
    fn message_lists_removed_counts() {
        let outcome = CascadeOutcome {
            prospects_deleted: 2,
            activities_deleted: 3,
            reminders_deleted: 1,
            ..Default::default()
        };
        assert_eq!(
            deletion_message("sp-1", &outcome, false),
            "Salesperson 'sp-1' deleted with 2 prospects, 3 activities and 1 reminders"
        );
    }
}
