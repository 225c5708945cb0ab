//! In-memory fixtures for service and router tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use inkpost_common::AppResult;
use inkpost_db::entities::user::{self, ReviewStatus, UserRole, UserStatus};
use tokio::sync::RwLock;

use crate::services::profile_store::{ProfileStore, StagedChange};

/// Build an active user with no review history.
#[must_use]
pub fn user_fixture(id: &str, role: UserRole) -> user::Model {
    user::Model {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        password: String::new(),
        token: format!("token-{id}"),
        name: format!("name-{id}"),
        avatar: None,
        bio: None,
        role,
        status: UserStatus::Active,
        pending_name: None,
        pending_avatar: None,
        review_status: ReviewStatus::None,
        review_notes: None,
        review_submitted_at: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Map-backed [`ProfileStore`] with the same update semantics as the
/// database store.
#[derive(Default)]
pub struct MemoryProfileStore {
    users: RwLock<HashMap<String, user::Model>>,
}

impl MemoryProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with the given records.
    pub async fn with_users(users: impl IntoIterator<Item = user::Model>) -> Self {
        let store = Self::new();
        for user in users {
            store.insert(user).await;
        }
        store
    }

    pub async fn insert(&self, user: user::Model) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    pub async fn get(&self, user_id: &str) -> Option<user::Model> {
        self.users.read().await.get(user_id).cloned()
    }

    async fn update<F>(&self, user_id: &str, apply: F) -> u64
    where
        F: FnOnce(&mut user::Model),
    {
        let mut users = self.users.write().await;
        match users.get_mut(user_id) {
            Some(user) => {
                apply(user);
                user.updated_at = Some(Utc::now().into());
                1
            }
            None => 0,
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<user::Model>> {
        Ok(self.get(user_id).await)
    }

    async fn find_active_by_role(&self, role: UserRole) -> AppResult<Option<user::Model>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| u.role == role && u.status == UserStatus::Active)
            .min_by_key(|u| u.created_at)
            .cloned())
    }

    async fn find_pending_reviews(&self) -> AppResult<Vec<user::Model>> {
        let users = self.users.read().await;
        let mut pending: Vec<user::Model> = users
            .values()
            .filter(|u| u.review_status == ReviewStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| {
            b.review_submitted_at
                .cmp(&a.review_submitted_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(pending)
    }

    async fn stage_review(&self, user_id: &str, change: StagedChange) -> AppResult<u64> {
        Ok(self
            .update(user_id, |user| {
                user.pending_name = change.name;
                user.pending_avatar = change.avatar;
                user.review_status = ReviewStatus::Pending;
                user.review_notes = None;
                user.review_submitted_at = Some(Utc::now().into());
            })
            .await)
    }

    async fn approve_review(&self, user_id: &str) -> AppResult<u64> {
        Ok(self
            .update(user_id, |user| {
                if let Some(name) = user.pending_name.take() {
                    user.name = name;
                }
                if let Some(avatar) = user.pending_avatar.take() {
                    user.avatar = Some(avatar);
                }
                user.review_status = ReviewStatus::Approved;
                user.review_notes = None;
            })
            .await)
    }

    async fn reject_review(&self, user_id: &str, notes: &str) -> AppResult<u64> {
        Ok(self
            .update(user_id, |user| {
                user.pending_name = None;
                user.pending_avatar = None;
                user.review_status = ReviewStatus::Rejected;
                user.review_notes = Some(notes.to_string());
            })
            .await)
    }
}
