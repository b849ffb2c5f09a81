#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
    Set,
};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use salespersons::domain::error::DomainError;
use salespersons::domain::ports::ExternalAuthPort;
use salespersons::domain::service::{Service, ServiceConfig};
use salespersons::infra::storage::entity::{activity, prospect, reminder, salesperson, user};
use salespersons::infra::storage::migrations::Migrator;
use salespersons::infra::storage::SeaOrmCrmStore;

/// Fresh in-memory database with the schema applied. One connection only, so
/// every query sees the same database.
pub async fn test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Records every uid it is asked to delete and always succeeds.
#[derive(Default)]
pub struct RecordingAuth {
    pub deleted: Mutex<Vec<String>>,
}

impl RecordingAuth {
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExternalAuthPort for RecordingAuth {
    async fn delete_account(&self, auth_uid: &str) -> Result<(), DomainError> {
        self.deleted.lock().unwrap().push(auth_uid.to_string());
        Ok(())
    }
}

/// Identity provider that is always down.
pub struct FailingAuth;

#[async_trait]
impl ExternalAuthPort for FailingAuth {
    async fn delete_account(&self, _auth_uid: &str) -> Result<(), DomainError> {
        Err(DomainError::external_auth("identity provider unavailable"))
    }
}

pub fn service(db: &DatabaseConnection, auth: Arc<dyn ExternalAuthPort>) -> Arc<Service> {
    Arc::new(Service::new(
        Arc::new(SeaOrmCrmStore::new(db.clone())),
        auth,
        ServiceConfig::default(),
    ))
}

pub async fn seed_salesperson(
    db: &DatabaseConnection,
    id: &str,
    auth_uid: Option<&str>,
    email: Option<&str>,
) {
    salesperson::ActiveModel {
        id: Set(id.to_string()),
        auth_uid: Set(auth_uid.map(Into::into)),
        email: Set(email.map(Into::into)),
        display_name: Set("Sales Rep".into()),
        role: Set("salesperson".into()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert salesperson");
}

pub async fn seed_user(db: &DatabaseConnection, id: &str, auth_uid: Option<&str>, email: Option<&str>) {
    user::ActiveModel {
        id: Set(id.to_string()),
        auth_uid: Set(auth_uid.map(Into::into)),
        email: Set(email.map(Into::into)),
        display_name: Set("Sales Rep".into()),
        role: Set("salesperson".into()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert user");
}

/// `age_minutes` orders prospects: larger means older.
pub async fn seed_prospect(
    db: &DatabaseConnection,
    id: &str,
    assigned_to_id: Option<&str>,
    salesperson_id: Option<&str>,
    age_minutes: i64,
) {
    prospect::ActiveModel {
        id: Set(id.to_string()),
        full_name: Set(format!("Student {id}")),
        email: Set(None),
        status: Set(Some("In-Progress".into())),
        assigned_to_id: Set(assigned_to_id.map(Into::into)),
        salesperson_id: Set(salesperson_id.map(Into::into)),
        created_at: Set(Utc::now() - Duration::minutes(age_minutes)),
    }
    .insert(db)
    .await
    .expect("insert prospect");
}

pub async fn seed_activity(db: &DatabaseConnection, prospect_id: &str) {
    activity::ActiveModel {
        id: Set(new_id()),
        prospect_id: Set(prospect_id.to_string()),
        kind: Set(Some("phone".into())),
        notes: Set(Some("left a voicemail".into())),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert activity");
}

pub async fn seed_reminder(db: &DatabaseConnection, prospect_id: &str) {
    reminder::ActiveModel {
        id: Set(new_id()),
        prospect_id: Set(prospect_id.to_string()),
        title: Set("Follow up".into()),
        status: Set(Some("completed".into())),
        due_at: Set(Some(Utc::now() + Duration::days(1))),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert reminder");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub salespersons: u64,
    pub users: u64,
    pub prospects: u64,
    pub activities: u64,
    pub reminders: u64,
}

pub async fn counts(db: &DatabaseConnection) -> Counts {
    Counts {
        salespersons: salesperson::Entity::find().count(db).await.unwrap(),
        users: user::Entity::find().count(db).await.unwrap(),
        prospects: prospect::Entity::find().count(db).await.unwrap(),
        activities: activity::Entity::find().count(db).await.unwrap(),
        reminders: reminder::Entity::find().count(db).await.unwrap(),
    }
}

/// One salesperson with two prospects (one per legacy ownership field),
/// three activities and one reminder. Returns the salesperson id.
pub async fn seed_standard_portfolio(db: &DatabaseConnection, auth_uid: &str) -> String {
    let sp = new_id();
    seed_salesperson(db, &sp, Some(auth_uid), Some("rep@school.edu")).await;

    let via_assigned = new_id();
    let via_salesperson = new_id();
    seed_prospect(db, &via_assigned, Some(&sp), None, 10).await;
    seed_prospect(db, &via_salesperson, None, Some(&sp), 5).await;

    seed_activity(db, &via_assigned).await;
    seed_activity(db, &via_assigned).await;
    seed_activity(db, &via_salesperson).await;
    seed_reminder(db, &via_salesperson).await;
    sp
}
