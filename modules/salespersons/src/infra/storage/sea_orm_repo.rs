//! SeaORM-backed implementation of the CRM storage ports.
//!
//! The same repository type serves plain connections and open transactions,
//! since both implement `ConnectionTrait`.

use anyhow::Context;
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Statement, TransactionTrait,
};

use crate::contract::model::{Activity, Prospect, Reminder, Salesperson, User};
use crate::domain::repo::{CrmRepository, CrmStore, CrmTransaction, IdentityKey};
use crate::infra::storage::entity::{activity, prospect, reminder, salesperson, user};

/// Filter on one identity column. Email matching ignores case.
fn identity_filter<C: ColumnTrait>(
    key: IdentityKey<'_>,
    id: C,
    auth_uid: C,
    email: C,
) -> SimpleExpr {
    match key {
        IdentityKey::Id(v) => id.eq(v),
        IdentityKey::AuthUid(v) => auth_uid.eq(v),
        IdentityKey::Email(v) => Expr::expr(Func::lower(Expr::col(email))).eq(v.to_lowercase()),
    }
}

fn ownership_condition(owner_keys: &[String]) -> Condition {
    Condition::any()
        .add(prospect::Column::AssignedToId.is_in(owner_keys.iter().cloned()))
        .add(prospect::Column::SalespersonId.is_in(owner_keys.iter().cloned()))
}

/// `id = ? OR auth_uid = ?` written as plain SQL, bypassing any key typing.
fn raw_identity_statement(backend: DbBackend, table: &str, raw: &str) -> Statement {
    let sql = match backend {
        DbBackend::Postgres => format!("SELECT * FROM {table} WHERE id = $1 OR auth_uid = $2 LIMIT 1"),
        _ => format!("SELECT * FROM {table} WHERE id = ? OR auth_uid = ? LIMIT 1"),
    };
    Statement::from_sql_and_values(backend, sql, [raw.into(), raw.into()])
}

pub struct SeaOrmCrmRepository<C> {
    conn: C,
}

impl<C> SeaOrmCrmRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &C {
        &self.conn
    }

    pub fn into_inner(self) -> C {
        self.conn
    }
}

#[async_trait]
impl<C> CrmRepository for SeaOrmCrmRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_salesperson(&self, key: IdentityKey<'_>) -> anyhow::Result<Option<Salesperson>> {
        let row = salesperson::Entity::find()
            .filter(identity_filter(
                key,
                salesperson::Column::Id,
                salesperson::Column::AuthUid,
                salesperson::Column::Email,
            ))
            .order_by_asc(salesperson::Column::CreatedAt)
            .one(&self.conn)
            .await
            .with_context(|| format!("find salesperson by {}", key.field()))?;
        Ok(row.map(Into::into))
    }

    async fn find_user(&self, key: IdentityKey<'_>) -> anyhow::Result<Option<User>> {
        let row = user::Entity::find()
            .filter(identity_filter(
                key,
                user::Column::Id,
                user::Column::AuthUid,
                user::Column::Email,
            ))
            .order_by_asc(user::Column::CreatedAt)
            .one(&self.conn)
            .await
            .with_context(|| format!("find user by {}", key.field()))?;
        Ok(row.map(Into::into))
    }

    async fn raw_find_salesperson(&self, raw: &str) -> anyhow::Result<Option<Salesperson>> {
        let stmt = raw_identity_statement(self.conn.get_database_backend(), "salespersons", raw);
        let row = salesperson::Entity::find()
            .from_raw_sql(stmt)
            .one(&self.conn)
            .await
            .context("raw salesperson lookup")?;
        Ok(row.map(Into::into))
    }

    async fn raw_find_user(&self, raw: &str) -> anyhow::Result<Option<User>> {
        let stmt = raw_identity_statement(self.conn.get_database_backend(), "users", raw);
        let row = user::Entity::find()
            .from_raw_sql(stmt)
            .one(&self.conn)
            .await
            .context("raw user lookup")?;
        Ok(row.map(Into::into))
    }

    async fn list_salespersons(&self, limit: u64, offset: u64) -> anyhow::Result<Vec<Salesperson>> {
        let rows = salesperson::Entity::find()
            .order_by_asc(salesperson::Column::CreatedAt)
            .order_by_asc(salesperson::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.conn)
            .await
            .context("list salespersons")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_owned_prospects(&self, owner_keys: &[String]) -> anyhow::Result<Vec<Prospect>> {
        let rows = prospect::Entity::find()
            .filter(ownership_condition(owner_keys))
            .order_by_asc(prospect::Column::CreatedAt)
            .order_by_asc(prospect::Column::Id)
            .all(&self.conn)
            .await
            .context("find owned prospects")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_activities_for(&self, prospect_ids: &[String]) -> anyhow::Result<Vec<Activity>> {
        let rows = activity::Entity::find()
            .filter(activity::Column::ProspectId.is_in(prospect_ids.iter().cloned()))
            .order_by_asc(activity::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("find activities")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_reminders_for(&self, prospect_ids: &[String]) -> anyhow::Result<Vec<Reminder>> {
        let rows = reminder::Entity::find()
            .filter(reminder::Column::ProspectId.is_in(prospect_ids.iter().cloned()))
            .order_by_asc(reminder::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("find reminders")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_activities_for(&self, prospect_ids: &[String]) -> anyhow::Result<u64> {
        let res = activity::Entity::delete_many()
            .filter(activity::Column::ProspectId.is_in(prospect_ids.iter().cloned()))
            .exec(&self.conn)
            .await
            .context("delete activities")?;
        Ok(res.rows_affected)
    }

    async fn delete_reminders_for(&self, prospect_ids: &[String]) -> anyhow::Result<u64> {
        let res = reminder::Entity::delete_many()
            .filter(reminder::Column::ProspectId.is_in(prospect_ids.iter().cloned()))
            .exec(&self.conn)
            .await
            .context("delete reminders")?;
        Ok(res.rows_affected)
    }

    async fn delete_owned_prospects(&self, owner_keys: &[String]) -> anyhow::Result<u64> {
        if owner_keys.is_empty() {
            return Ok(0);
        }
        let res = prospect::Entity::delete_many()
            .filter(ownership_condition(owner_keys))
            .exec(&self.conn)
            .await
            .context("delete prospects")?;
        Ok(res.rows_affected)
    }

    async fn delete_users(&self, key: IdentityKey<'_>) -> anyhow::Result<u64> {
        let res = user::Entity::delete_many()
            .filter(identity_filter(
                key,
                user::Column::Id,
                user::Column::AuthUid,
                user::Column::Email,
            ))
            .exec(&self.conn)
            .await
            .with_context(|| format!("delete users by {}", key.field()))?;
        Ok(res.rows_affected)
    }

    async fn delete_salespersons(&self, key: IdentityKey<'_>) -> anyhow::Result<u64> {
        let res = salesperson::Entity::delete_many()
            .filter(identity_filter(
                key,
                salesperson::Column::Id,
                salesperson::Column::AuthUid,
                salesperson::Column::Email,
            ))
            .exec(&self.conn)
            .await
            .with_context(|| format!("delete salespersons by {}", key.field()))?;
        Ok(res.rows_affected)
    }
}

pub struct SeaOrmCrmTransaction {
    repo: SeaOrmCrmRepository<DatabaseTransaction>,
}

#[async_trait]
impl CrmTransaction for SeaOrmCrmTransaction {
    fn repo(&self) -> &dyn CrmRepository {
        &self.repo
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.repo
            .into_inner()
            .commit()
            .await
            .context("commit transaction")
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        self.repo
            .into_inner()
            .rollback()
            .await
            .context("rollback transaction")
    }
}

/// Store over a pooled connection.
pub struct SeaOrmCrmStore {
    repo: SeaOrmCrmRepository<DatabaseConnection>,
}

impl SeaOrmCrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            repo: SeaOrmCrmRepository::new(db),
        }
    }
}

#[async_trait]
impl CrmStore for SeaOrmCrmStore {
    fn repo(&self) -> &dyn CrmRepository {
        &self.repo
    }

    async fn begin(&self) -> anyhow::Result<Box<dyn CrmTransaction>> {
        let txn = self
            .repo
            .conn()
            .begin()
            .await
            .context("begin transaction")?;
        Ok(Box::new(SeaOrmCrmTransaction {
            repo: SeaOrmCrmRepository::new(txn),
        }))
    }
}
