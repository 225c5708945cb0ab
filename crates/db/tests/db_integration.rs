//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `inkpost_test`)
//!   `TEST_DB_PASSWORD` (default: `inkpost_test`)
//!   `TEST_DB_NAME` (default: `inkpost_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::Utc;
use inkpost_common::IdGenerator;
use inkpost_db::entities::user::{self, ReviewStatus, UserRole, UserStatus};
use inkpost_db::repositories::{ProfileReviewRepository, UserRepository};
use inkpost_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::Set;

async fn insert_user(repo: &UserRepository, email: &str, role: UserRole) -> user::Model {
    let id_gen = IdGenerator::new();
    repo.create(user::ActiveModel {
        id: Set(id_gen.generate()),
        email: Set(email.to_string()),
        password: Set("$argon2id$placeholder".to_string()),
        token: Set(id_gen.generate_token()),
        name: Set("Alice".to_string()),
        avatar: Set(Some("/old.png".to_string())),
        bio: Set(None),
        role: Set(role),
        status: Set(UserStatus::Active),
        pending_name: Set(None),
        pending_avatar: Set(None),
        review_status: Set(ReviewStatus::None),
        review_notes: Set(None),
        review_submitted_at: Set(None),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    })
    .await
    .unwrap()
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_submit_then_approve_merges_pending() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = Arc::new(db.conn);
    let users = UserRepository::new(Arc::clone(&conn));
    let reviews = ProfileReviewRepository::new(Arc::clone(&conn));

    let alice = insert_user(&users, "alice@example.com", UserRole::User).await;

    let staged = reviews
        .stage(&alice.id, None, Some("/a.png".to_string()))
        .await
        .unwrap();
    assert_eq!(staged, 1);

    let pending = users.get_by_id(&alice.id).await.unwrap();
    assert_eq!(pending.review_status, ReviewStatus::Pending);
    assert_eq!(pending.avatar.as_deref(), Some("/old.png"));
    assert_eq!(pending.pending_avatar.as_deref(), Some("/a.png"));
    assert!(pending.review_submitted_at.is_some());

    assert_eq!(reviews.approve(&alice.id).await.unwrap(), 1);

    let approved = users.get_by_id(&alice.id).await.unwrap();
    assert_eq!(approved.review_status, ReviewStatus::Approved);
    assert_eq!(approved.name, "Alice");
    assert_eq!(approved.avatar.as_deref(), Some("/a.png"));
    assert!(approved.pending_avatar.is_none());
    assert!(approved.pending_name.is_none());

    // Second approve is a no-op merge.
    assert_eq!(reviews.approve(&alice.id).await.unwrap(), 1);
    let again = users.get_by_id(&alice.id).await.unwrap();
    assert_eq!(again.avatar.as_deref(), Some("/a.png"));
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_reject_keeps_live_fields() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = Arc::new(db.conn);
    let users = UserRepository::new(Arc::clone(&conn));
    let reviews = ProfileReviewRepository::new(Arc::clone(&conn));

    let alice = insert_user(&users, "alice@example.com", UserRole::User).await;
    reviews
        .stage(&alice.id, Some("Mallory".to_string()), None)
        .await
        .unwrap();
    assert_eq!(reviews.find_pending().await.unwrap().len(), 1);

    assert_eq!(reviews.reject(&alice.id, "bad name").await.unwrap(), 1);

    let rejected = users.get_by_id(&alice.id).await.unwrap();
    assert_eq!(rejected.review_status, ReviewStatus::Rejected);
    assert_eq!(rejected.name, "Alice");
    assert_eq!(rejected.review_notes.as_deref(), Some("bad name"));
    assert!(rejected.pending_name.is_none());
    assert!(reviews.find_pending().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_find_pending_excludes_other_states() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = Arc::new(db.conn);
    let users = UserRepository::new(Arc::clone(&conn));
    let reviews = ProfileReviewRepository::new(Arc::clone(&conn));

    let alice = insert_user(&users, "alice@example.com", UserRole::User).await;
    let bob = insert_user(&users, "bob@example.com", UserRole::User).await;
    let _carol = insert_user(&users, "carol@example.com", UserRole::User).await;

    reviews.stage(&alice.id, Some("A".to_string()), None).await.unwrap();
    reviews.stage(&bob.id, Some("B".to_string()), None).await.unwrap();
    reviews.approve(&alice.id).await.unwrap();

    let pending = reviews.find_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, bob.id);
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_find_active_admin() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = Arc::new(db.conn);
    let users = UserRepository::new(Arc::clone(&conn));

    assert!(users.find_active_by_role(UserRole::Admin).await.unwrap().is_none());

    let admin = insert_user(&users, "admin@example.com", UserRole::Admin).await;
    let found = users
        .find_active_by_role(UserRole::Admin)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, admin.id);
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(config.database_url().starts_with("postgres://"));
}
