//! Prospects owned by an identity under either legacy ownership field.

use std::collections::HashSet;

use crate::contract::model::{Prospect, ResolvedIdentity};
use crate::domain::identity::SalespersonRef;
use crate::domain::repo::CrmRepository;

/// Every value an owned prospect may carry in `assigned_to_id` or
/// `salesperson_id`: the identifier as given, the resolved primary keys and
/// the external-auth uid. Deduplicated, in that order.
pub fn owner_keys(identifier: &SalespersonRef, identity: &ResolvedIdentity) -> Vec<String> {
    let candidates = [
        Some(identifier.as_str().to_string()),
        identifier.primary_key(),
        identity.salesperson.as_ref().map(|s| s.id.clone()),
        identity.user.as_ref().map(|u| u.id.clone()),
        identity.auth_uid.clone(),
    ];

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .flatten()
        .filter(|k| !k.is_empty() && seen.insert(k.clone()))
        .collect()
}

/// Owned prospects, oldest first, each exactly once even when both ownership
/// fields match.
pub async fn collect_owned_prospects(
    repo: &dyn CrmRepository,
    owner_keys: &[String],
) -> anyhow::Result<Vec<Prospect>> {
    if owner_keys.is_empty() {
        return Ok(Vec::new());
    }
    let rows = repo.find_owned_prospects(owner_keys).await?;
    let mut seen = HashSet::with_capacity(rows.len());
    Ok(rows
        .into_iter()
        .filter(|p| seen.insert(p.id.clone()))
        .collect())
}

pub fn prospect_ids(prospects: &[Prospect]) -> Vec<String> {
    prospects.iter().map(|p| p.id.clone()).collect()
}
