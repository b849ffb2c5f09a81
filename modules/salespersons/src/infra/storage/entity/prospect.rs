use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// A prospect. `assigned_to_id` and `salesperson_id` are two legacy ways of
/// recording the owner; either, both or neither may be set.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "prospects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub status: Option<String>,
    pub assigned_to_id: Option<String>,
    pub salesperson_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
