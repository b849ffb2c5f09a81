//! Identity resolution across the `salespersons` and `users` collections.
//!
//! A person may have a row in either or both collections, linked through the
//! external-auth uid, and the link is not always populated on both sides.
//! The lookup order is an explicit plan of stages so it can be tested on its
//! own; the first stage that finds anything wins.

use tracing::debug;
use uuid::Uuid;

use crate::contract::model::ResolvedIdentity;
use crate::domain::error::DomainError;
use crate::domain::repo::{CrmRepository, IdentityKey};

/// Opaque identifier supplied by the caller: a primary key, an external-auth
/// uid or an email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalespersonRef {
    raw: String,
    uuid: Option<Uuid>,
}

impl SalespersonRef {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DomainError::validation(
                "id",
                "a salesperson identifier is required",
            ));
        }
        Ok(Self {
            raw: raw.to_string(),
            uuid: Uuid::parse_str(raw).ok(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Canonical primary-key form, only for well-formed keys.
    pub fn primary_key(&self) -> Option<String> {
        self.uuid.map(|u| u.to_string())
    }

    pub fn is_email(&self) -> bool {
        self.raw.contains('@')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Salespersons,
    Users,
}

/// One lookup against one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    SalespersonById(String),
    UserById(String),
    UserByAuthUid(String),
    SalespersonByAuthUid(String),
    SalespersonByEmail(String),
    UserByEmail(String),
    RawSalesperson(String),
    RawUser(String),
}

impl Probe {
    pub fn collection(&self) -> Collection {
        match self {
            Self::SalespersonById(_)
            | Self::SalespersonByAuthUid(_)
            | Self::SalespersonByEmail(_)
            | Self::RawSalesperson(_) => Collection::Salespersons,
            Self::UserById(_)
            | Self::UserByAuthUid(_)
            | Self::UserByEmail(_)
            | Self::RawUser(_) => Collection::Users,
        }
    }
}

/// Probes tried together; within a stage the first hit per collection wins.
pub type Stage = Vec<Probe>;

/// Ordered lookup plan for `identifier`.
pub fn lookup_plan(identifier: &SalespersonRef, force: bool) -> Vec<Stage> {
    let raw = identifier.as_str().to_string();
    let mut plan = Vec::with_capacity(5);

    if let Some(pk) = identifier.primary_key() {
        plan.push(vec![Probe::SalespersonById(pk)]);
    }

    let mut users = Vec::with_capacity(2);
    if let Some(pk) = identifier.primary_key() {
        users.push(Probe::UserById(pk));
    }
    users.push(Probe::UserByAuthUid(raw.clone()));
    plan.push(users);

    plan.push(vec![Probe::SalespersonByAuthUid(raw.clone())]);

    if identifier.is_email() {
        plan.push(vec![
            Probe::SalespersonByEmail(raw.clone()),
            Probe::UserByEmail(raw.clone()),
        ]);
    }

    if force {
        plan.push(vec![Probe::RawSalesperson(raw.clone()), Probe::RawUser(raw)]);
    }

    plan
}

/// Result of walking the lookup plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ResolvedIdentity),
    NotFound,
}

impl Resolution {
    pub fn into_identity(self) -> ResolvedIdentity {
        match self {
            Self::Found(identity) => identity,
            Self::NotFound => ResolvedIdentity::default(),
        }
    }
}

fn is_filled(found: &ResolvedIdentity, collection: Collection) -> bool {
    match collection {
        Collection::Salespersons => found.salesperson.is_some(),
        Collection::Users => found.user.is_some(),
    }
}

async fn run_probe(
    repo: &dyn CrmRepository,
    probe: &Probe,
    found: &mut ResolvedIdentity,
) -> anyhow::Result<()> {
    match probe {
        Probe::SalespersonById(v) => {
            found.salesperson = repo.find_salesperson(IdentityKey::Id(v)).await?
        }
        Probe::SalespersonByAuthUid(v) => {
            found.salesperson = repo.find_salesperson(IdentityKey::AuthUid(v)).await?
        }
        Probe::SalespersonByEmail(v) => {
            found.salesperson = repo.find_salesperson(IdentityKey::Email(v)).await?
        }
        Probe::RawSalesperson(v) => found.salesperson = repo.raw_find_salesperson(v).await?,
        Probe::UserById(v) => found.user = repo.find_user(IdentityKey::Id(v)).await?,
        Probe::UserByAuthUid(v) => found.user = repo.find_user(IdentityKey::AuthUid(v)).await?,
        Probe::UserByEmail(v) => found.user = repo.find_user(IdentityKey::Email(v)).await?,
        Probe::RawUser(v) => found.user = repo.raw_find_user(v).await?,
    }
    if is_filled(found, probe.collection()) {
        debug!(?probe, "identity probe matched");
    }
    Ok(())
}

/// Fill the missing side through the external-auth uid link.
async fn link_counterpart(
    repo: &dyn CrmRepository,
    found: &mut ResolvedIdentity,
) -> anyhow::Result<()> {
    if found.user.is_none() {
        if let Some(uid) = found.salesperson.as_ref().and_then(|s| s.auth_uid.clone()) {
            found.user = repo.find_user(IdentityKey::AuthUid(&uid)).await?;
        }
    }
    if found.salesperson.is_none() {
        if let Some(uid) = found.user.as_ref().and_then(|u| u.auth_uid.clone()) {
            found.salesperson = repo.find_salesperson(IdentityKey::AuthUid(&uid)).await?;
        }
    }
    found.auth_uid = found
        .salesperson
        .as_ref()
        .and_then(|s| s.auth_uid.clone())
        .or_else(|| found.user.as_ref().and_then(|u| u.auth_uid.clone()));
    Ok(())
}

/// Walk the lookup plan. Absence is a regular outcome, never an error; only
/// storage failures are reported as `Err`.
pub async fn resolve(
    repo: &dyn CrmRepository,
    identifier: &SalespersonRef,
    force: bool,
) -> anyhow::Result<Resolution> {
    let mut found = ResolvedIdentity::default();

    for stage in lookup_plan(identifier, force) {
        for probe in &stage {
            if is_filled(&found, probe.collection()) {
                continue;
            }
            run_probe(repo, probe, &mut found).await?;
        }
        if !found.is_empty() {
            link_counterpart(repo, &mut found).await?;
            return Ok(Resolution::Found(found));
        }
    }

    Ok(Resolution::NotFound)
}
