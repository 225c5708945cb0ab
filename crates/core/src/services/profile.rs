//! Profile reads.

use inkpost_common::{AppError, AppResult};
use inkpost_db::entities::user::{self, UserRole};

use super::profile_store::SharedProfileStore;

/// Reads live profiles together with their moderation state.
#[derive(Clone)]
pub struct ProfileService {
    store: SharedProfileStore,
}

impl ProfileService {
    #[must_use]
    pub fn new(store: SharedProfileStore) -> Self {
        Self { store }
    }

    /// Get a user's profile, pending fields included.
    pub async fn get_profile(&self, user_id: &str) -> AppResult<user::Model> {
        self.store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))
    }

    /// Get the earliest active account holding `role`.
    pub async fn get_profile_by_role(&self, role: UserRole) -> AppResult<user::Model> {
        self.store
            .find_active_by_role(role)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No active {} profile", role.as_str())))
    }

    /// Profile shown as the site's author.
    pub async fn get_author(&self) -> AppResult<user::Model> {
        self.get_profile_by_role(UserRole::Admin).await
    }
}
