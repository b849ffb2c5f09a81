//! Transactional removal of a salesperson and everything it owns.
//!
//! Order inside the transaction: activities, reminders, prospects, external
//! auth account (best effort, cannot take part in the transaction), user row,
//! salesperson row, commit. Any database failure rolls everything back.

use tracing::{debug, info, warn};

use crate::contract::model::ResolvedIdentity;
use crate::domain::dependencies::{collect_owned_prospects, owner_keys, prospect_ids};
use crate::domain::error::DomainError;
use crate::domain::identity::{resolve, SalespersonRef};
use crate::domain::ports::ExternalAuthPort;
use crate::domain::repo::{CrmRepository, CrmStore, IdentityKey};

/// Counts accumulated by one cascade run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeOutcome {
    pub identity: ResolvedIdentity,
    pub activities_deleted: u64,
    pub reminders_deleted: u64,
    pub prospects_deleted: u64,
    pub users_deleted: u64,
    pub salespersons_deleted: u64,
    pub external_auth_deleted: bool,
}

impl CascadeOutcome {
    pub fn removed_identity_rows(&self) -> bool {
        self.users_deleted > 0 || self.salespersons_deleted > 0
    }
}

pub struct CascadeDeleter<'a> {
    store: &'a dyn CrmStore,
    auth: &'a dyn ExternalAuthPort,
}

fn tx_error(step: &str, e: anyhow::Error) -> DomainError {
    DomainError::transaction(format!("{step}: {e:#}"))
}

impl<'a> CascadeDeleter<'a> {
    pub fn new(store: &'a dyn CrmStore, auth: &'a dyn ExternalAuthPort) -> Self {
        Self { store, auth }
    }

    /// Resolve, collect and delete inside one transaction.
    ///
    /// Returns `NotFound` without writing anything when no identity row and no
    /// owned prospect exists and `force` is off.
    pub async fn run(
        &self,
        identifier: &SalespersonRef,
        force: bool,
    ) -> Result<CascadeOutcome, DomainError> {
        let tx = self
            .store
            .begin()
            .await
            .map_err(|e| DomainError::database(format!("begin transaction: {e:#}")))?;

        let result = self.run_in(tx.repo(), identifier, force).await;

        match result {
            Ok(outcome) => {
                tx.commit().await.map_err(|e| tx_error("commit", e))?;
                debug!("cascade transaction committed");
                Ok(outcome)
            }
            Err(err) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "rollback after failed cascade also failed");
                }
                Err(err)
            }
        }
    }

    async fn run_in(
        &self,
        repo: &dyn CrmRepository,
        identifier: &SalespersonRef,
        force: bool,
    ) -> Result<CascadeOutcome, DomainError> {
        let identity = resolve(repo, identifier, force)
            .await
            .map_err(|e| DomainError::database(format!("identity lookup: {e:#}")))?
            .into_identity();

        let keys = owner_keys(identifier, &identity);
        let prospects = collect_owned_prospects(repo, &keys)
            .await
            .map_err(|e| DomainError::database(format!("prospect lookup: {e:#}")))?;

        debug!(
            salesperson = identity.salesperson.is_some(),
            user = identity.user.is_some(),
            auth_uid = identity.auth_uid.as_deref().unwrap_or(""),
            prospects = prospects.len(),
            "resolved deletion targets"
        );

        if identity.is_empty() && prospects.is_empty() && !force {
            return Err(DomainError::not_found(identifier.as_str()));
        }

        let ids = prospect_ids(&prospects);
        let mut outcome = CascadeOutcome::default();

        if !ids.is_empty() {
            outcome.activities_deleted = repo
                .delete_activities_for(&ids)
                .await
                .map_err(|e| tx_error("delete activities", e))?;
            outcome.reminders_deleted = repo
                .delete_reminders_for(&ids)
                .await
                .map_err(|e| tx_error("delete reminders", e))?;
        }
        outcome.prospects_deleted = repo
            .delete_owned_prospects(&keys)
            .await
            .map_err(|e| tx_error("delete prospects", e))?;

        if let Some(uid) = identity.auth_uid.as_deref() {
            outcome.external_auth_deleted = self.delete_external_account(uid).await;
        }

        let user_key = match (&identity.user, &identity.auth_uid) {
            (Some(user), _) => Some(IdentityKey::Id(&user.id)),
            (None, Some(uid)) => Some(IdentityKey::AuthUid(uid)),
            (None, None) => None,
        };
        if let Some(key) = user_key {
            outcome.users_deleted = repo
                .delete_users(key)
                .await
                .map_err(|e| tx_error("delete user", e))?;
        }

        let salesperson_key = match (&identity.salesperson, &identity.auth_uid) {
            (Some(sp), _) => Some(IdentityKey::Id(&sp.id)),
            (None, Some(uid)) => Some(IdentityKey::AuthUid(uid)),
            (None, None) => None,
        };
        if let Some(key) = salesperson_key {
            outcome.salespersons_deleted = repo
                .delete_salespersons(key)
                .await
                .map_err(|e| tx_error("delete salesperson", e))?;
        }

        info!(
            activities = outcome.activities_deleted,
            reminders = outcome.reminders_deleted,
            prospects = outcome.prospects_deleted,
            users = outcome.users_deleted,
            salespersons = outcome.salespersons_deleted,
            "cascade staged"
        );

        outcome.identity = identity;
        Ok(outcome)
    }

    /// Failure here never aborts the cascade.
    async fn delete_external_account(&self, uid: &str) -> bool {
        match self.auth.delete_account(uid).await {
            Ok(()) => {
                debug!(auth_uid = uid, "external auth account deleted");
                true
            }
            Err(e) => {
                warn!(auth_uid = uid, error = %e, "external auth deletion failed; continuing");
                false
            }
        }
    }
}
