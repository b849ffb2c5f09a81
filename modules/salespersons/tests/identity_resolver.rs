mod common;

use std::sync::Arc;

use common::*;
use salespersons::domain::dependencies::{collect_owned_prospects, owner_keys};
use salespersons::domain::error::DomainError;
use salespersons::domain::identity::{resolve, Resolution, SalespersonRef};
use salespersons::infra::storage::SeaOrmCrmRepository;

fn identifier(raw: &str) -> SalespersonRef {
    SalespersonRef::parse(raw).unwrap()
}

#[tokio::test]
async fn primary_key_lookup_links_user_through_auth_uid() {
    let db = test_db().await;
    let sp = new_id();
    let user_id = new_id();
    seed_salesperson(&db, &sp, Some("uid-a"), None).await;
    seed_user(&db, &user_id, Some("uid-a"), None).await;
    let repo = SeaOrmCrmRepository::new(db.clone());

    // Upper-case input still hits the canonical key.
    let found = resolve(&repo, &identifier(&sp.to_uppercase()), false)
        .await
        .unwrap()
        .into_identity();

    assert_eq!(found.salesperson.map(|s| s.id), Some(sp));
    assert_eq!(found.user.map(|u| u.id), Some(user_id));
    assert_eq!(found.auth_uid.as_deref(), Some("uid-a"));
}

#[tokio::test]
async fn auth_uid_lookup_prefers_user_then_fills_salesperson() {
    let db = test_db().await;
    let sp = new_id();
    let user_id = new_id();
    seed_salesperson(&db, &sp, Some("uid-b"), None).await;
    seed_user(&db, &user_id, Some("uid-b"), None).await;
    let repo = SeaOrmCrmRepository::new(db.clone());

    let found = resolve(&repo, &identifier("uid-b"), false).await.unwrap();
    let Resolution::Found(found) = found else {
        panic!("uid-b should resolve");
    };
    assert_eq!(found.user.map(|u| u.id), Some(user_id));
    assert_eq!(found.salesperson.map(|s| s.id), Some(sp));
}

#[tokio::test]
async fn user_primary_key_resolves_when_no_salesperson_row_exists() {
    let db = test_db().await;
    let user_id = new_id();
    seed_user(&db, &user_id, None, None).await;
    let repo = SeaOrmCrmRepository::new(db.clone());

    let found = resolve(&repo, &identifier(&user_id), false)
        .await
        .unwrap()
        .into_identity();
    assert!(found.salesperson.is_none());
    assert_eq!(found.user.map(|u| u.id), Some(user_id));
    assert!(found.auth_uid.is_none());
}

#[tokio::test]
async fn email_lookup_ignores_case() {
    let db = test_db().await;
    let sp = new_id();
    seed_salesperson(&db, &sp, None, Some("Maria.Lopez@School.edu")).await;
    let repo = SeaOrmCrmRepository::new(db.clone());

    let found = resolve(&repo, &identifier("maria.lopez@school.edu"), false)
        .await
        .unwrap()
        .into_identity();
    assert_eq!(found.salesperson.map(|s| s.id), Some(sp));
}

#[tokio::test]
async fn legacy_key_needs_force() {
    let db = test_db().await;
    seed_user(&db, "507f1f77bcf86cd799439011", None, None).await;
    let repo = SeaOrmCrmRepository::new(db.clone());
    let id = identifier("507f1f77bcf86cd799439011");

    assert_eq!(
        resolve(&repo, &id, false).await.unwrap(),
        Resolution::NotFound
    );
    let found = resolve(&repo, &id, true).await.unwrap().into_identity();
    assert_eq!(
        found.user.map(|u| u.id).as_deref(),
        Some("507f1f77bcf86cd799439011")
    );
}

#[tokio::test]
async fn collector_unions_both_ownership_fields_and_aliases() {
    let db = test_db().await;
    let sp = new_id();
    seed_salesperson(&db, &sp, Some("uid-c"), None).await;

    let by_assigned = new_id();
    let by_salesperson_alias = new_id();
    let by_both = new_id();
    seed_prospect(&db, &by_assigned, Some(&sp), None, 30).await;
    seed_prospect(&db, &by_salesperson_alias, None, Some("uid-c"), 20).await;
    seed_prospect(&db, &by_both, Some(&sp), Some(&sp), 10).await;
    seed_prospect(&db, &new_id(), Some("other"), Some("other"), 5).await;

    let repo = SeaOrmCrmRepository::new(db.clone());
    let id = identifier(&sp);
    let identity = resolve(&repo, &id, false).await.unwrap().into_identity();
    let prospects = collect_owned_prospects(&repo, &owner_keys(&id, &identity))
        .await
        .unwrap();

    let ids: Vec<_> = prospects.into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![by_assigned, by_salesperson_alias, by_both]);
}

#[tokio::test]
async fn preview_lists_owned_records_with_normalized_values() {
    let db = test_db().await;
    let sp = seed_standard_portfolio(&db, "uid-d").await;

    let deps = service(&db, Arc::new(RecordingAuth::default()))
        .owned_dependencies(&sp)
        .await
        .unwrap();

    assert_eq!(deps.prospects.len(), 2);
    assert_eq!(deps.activities.len(), 3);
    assert_eq!(deps.reminders.len(), 1);
    assert_eq!(deps.prospects[0].status.as_str(), "contacted");
    assert_eq!(deps.activities[0].kind.as_str(), "call");
    assert_eq!(deps.reminders[0].status.as_str(), "done");
    // Reads only.
    assert_eq!(counts(&db).await.prospects, 2);
}

#[tokio::test]
async fn unknown_identifier_is_not_found_for_reads() {
    let db = test_db().await;
    let svc = service(&db, Arc::new(RecordingAuth::default()));

    assert!(matches!(
        svc.resolve_salesperson("nobody").await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        svc.owned_dependencies("nobody").await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn listing_is_clamped_and_paginated() {
    let db = test_db().await;
    for _ in 0..3 {
        seed_salesperson(&db, &new_id(), None, None).await;
    }
    let svc = service(&db, Arc::new(RecordingAuth::default()));

    assert_eq!(svc.list_salespersons(None, None).await.unwrap().len(), 3);
    assert_eq!(svc.list_salespersons(Some(2), None).await.unwrap().len(), 2);
    assert_eq!(svc.list_salespersons(Some(2), Some(2)).await.unwrap().len(), 1);
    // Zero is raised to one.
    assert_eq!(svc.list_salespersons(Some(0), None).await.unwrap().len(), 1);
}
