//! Last-resort cleanup for identity rows the structured resolver cannot reach.

use tracing::{info, warn};

use crate::contract::model::ForceDeleteCounts;
use crate::domain::identity::SalespersonRef;
use crate::domain::repo::{CrmRepository, IdentityKey};

/// Delete-many against both identity collections for every field the
/// identifier could plausibly match. Never fails: a broken field is logged
/// and skipped.
pub async fn force_delete(
    repo: &dyn CrmRepository,
    identifier: &SalespersonRef,
) -> ForceDeleteCounts {
    let raw = identifier.as_str();
    let canonical = identifier.primary_key().filter(|pk| pk != raw);

    let mut keys = vec![IdentityKey::Id(raw)];
    if let Some(pk) = canonical.as_deref() {
        keys.push(IdentityKey::Id(pk));
    }
    keys.push(IdentityKey::AuthUid(raw));
    if identifier.is_email() {
        keys.push(IdentityKey::Email(raw));
    }

    let mut counts = ForceDeleteCounts::default();
    for key in keys {
        match repo.delete_salespersons(key).await {
            Ok(n) => counts.salespersons += n,
            Err(e) => warn!(
                field = key.field(),
                error = %e,
                "force delete on salespersons failed; skipping field"
            ),
        }
        match repo.delete_users(key).await {
            Ok(n) => counts.users += n,
            Err(e) => warn!(
                field = key.field(),
                error = %e,
                "force delete on users failed; skipping field"
            ),
        }
    }

    info!(
        salespersons = counts.salespersons,
        users = counts.users,
        "force delete finished"
    );
    counts
}
