//! Record store consumed by the moderation services.
//!
//! Services hold an `Arc<dyn ProfileStore>` so the `PostgreSQL` store and the
//! in-memory store used by tests are interchangeable.

use std::sync::Arc;

use async_trait::async_trait;
use inkpost_common::AppResult;
use inkpost_db::{
    entities::user::{self, UserRole},
    repositories::{ProfileReviewRepository, UserRepository},
};

/// Values staged by a submission. `None` stages nothing for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedChange {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

impl StagedChange {
    /// Whether the change stages no field at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.avatar.is_none()
    }
}

/// Keyed user record store.
///
/// The three write methods are single-record updates and return the number
/// of records affected.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Get a record by ID.
    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<user::Model>>;

    /// Get the earliest-created active record holding `role`.
    async fn find_active_by_role(&self, role: UserRole) -> AppResult<Option<user::Model>>;

    /// Records with `review_status = pending`, newest submission first.
    async fn find_pending_reviews(&self) -> AppResult<Vec<user::Model>>;

    /// Replace both pending fields, clear notes, mark pending.
    async fn stage_review(&self, user_id: &str, change: StagedChange) -> AppResult<u64>;

    /// Coalesce pending into live, clear pending and notes, mark approved.
    async fn approve_review(&self, user_id: &str) -> AppResult<u64>;

    /// Clear pending, store notes, mark rejected.
    async fn reject_review(&self, user_id: &str, notes: &str) -> AppResult<u64>;
}

/// Shared handle to a profile store.
pub type SharedProfileStore = Arc<dyn ProfileStore>;

/// `PostgreSQL`-backed store built from the repositories.
#[derive(Clone)]
pub struct DbProfileStore {
    users: UserRepository,
    reviews: ProfileReviewRepository,
}

impl DbProfileStore {
    /// Create a store over the given repositories.
    #[must_use]
    pub const fn new(users: UserRepository, reviews: ProfileReviewRepository) -> Self {
        Self { users, reviews }
    }

    /// Wrap into a shared handle.
    #[must_use]
    pub fn shared(self) -> SharedProfileStore {
        Arc::new(self)
    }
}

#[async_trait]
impl ProfileStore for DbProfileStore {
    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<user::Model>> {
        self.users.find_by_id(user_id).await
    }

    async fn find_active_by_role(&self, role: UserRole) -> AppResult<Option<user::Model>> {
        self.users.find_active_by_role(role).await
    }

    async fn find_pending_reviews(&self) -> AppResult<Vec<user::Model>> {
        self.reviews.find_pending().await
    }

    async fn stage_review(&self, user_id: &str, change: StagedChange) -> AppResult<u64> {
        self.reviews.stage(user_id, change.name, change.avatar).await
    }

    async fn approve_review(&self, user_id: &str) -> AppResult<u64> {
        self.reviews.approve(user_id).await
    }

    async fn reject_review(&self, user_id: &str, notes: &str) -> AppResult<u64> {
        self.reviews.reject(user_id, notes).await
    }
}
