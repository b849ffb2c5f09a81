use async_trait::async_trait;

use crate::contract::model::{Activity, Prospect, Reminder, Salesperson, User};

/// Field used to address identity rows in either collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKey<'a> {
    Id(&'a str),
    AuthUid(&'a str),
    Email(&'a str),
}

impl IdentityKey<'_> {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::AuthUid(_) => "auth_uid",
            Self::Email(_) => "email",
        }
    }
}

/// Port for the domain layer: persistence operations the salesperson
/// routines need. Implementations may run on a plain connection or inside a
/// transaction.
#[async_trait]
pub trait CrmRepository: Send + Sync {
    async fn find_salesperson(&self, key: IdentityKey<'_>) -> anyhow::Result<Option<Salesperson>>;
    async fn find_user(&self, key: IdentityKey<'_>) -> anyhow::Result<Option<User>>;

    /// Untyped lookup matching `raw` against the primary key or the
    /// external-auth column, regardless of key format.
    async fn raw_find_salesperson(&self, raw: &str) -> anyhow::Result<Option<Salesperson>>;
    async fn raw_find_user(&self, raw: &str) -> anyhow::Result<Option<User>>;

    async fn list_salespersons(&self, limit: u64, offset: u64)
        -> anyhow::Result<Vec<Salesperson>>;

    /// Prospects whose `assigned_to_id` or `salesperson_id` is one of
    /// `owner_keys`, oldest first.
    async fn find_owned_prospects(&self, owner_keys: &[String]) -> anyhow::Result<Vec<Prospect>>;

    async fn find_activities_for(&self, prospect_ids: &[String]) -> anyhow::Result<Vec<Activity>>;
    async fn find_reminders_for(&self, prospect_ids: &[String]) -> anyhow::Result<Vec<Reminder>>;

    async fn delete_activities_for(&self, prospect_ids: &[String]) -> anyhow::Result<u64>;
    async fn delete_reminders_for(&self, prospect_ids: &[String]) -> anyhow::Result<u64>;
    /// Same ownership predicate as `find_owned_prospects`.
    async fn delete_owned_prospects(&self, owner_keys: &[String]) -> anyhow::Result<u64>;

    async fn delete_users(&self, key: IdentityKey<'_>) -> anyhow::Result<u64>;
    async fn delete_salespersons(&self, key: IdentityKey<'_>) -> anyhow::Result<u64>;
}

/// An open database transaction. Dropping it without `commit` rolls back.
#[async_trait]
pub trait CrmTransaction: Send + Sync {
    fn repo(&self) -> &dyn CrmRepository;
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;
}

/// Entry point to storage: non-transactional reads plus transaction start.
#[async_trait]
pub trait CrmStore: Send + Sync {
    fn repo(&self) -> &dyn CrmRepository;
    async fn begin(&self) -> anyhow::Result<Box<dyn CrmTransaction>>;
}
