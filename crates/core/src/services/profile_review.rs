//! Profile review submission.
//!
//! Users never change their live display name or avatar directly. They stage
//! replacement values here and an administrator decides on them later.

use inkpost_common::{AppError, AppResult};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::authorization::Identity;
use super::profile_store::{SharedProfileStore, StagedChange};

/// Input for a profile change request.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubmitReviewInput {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,

    #[validate(length(max = 1024))]
    pub avatar: Option<String>,
}

impl SubmitReviewInput {
    /// Trim both fields and drop the ones left empty.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            avatar: non_blank(self.avatar),
        }
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Stages profile change requests for moderation.
#[derive(Clone)]
pub struct ProfileReviewService {
    store: SharedProfileStore,
}

impl ProfileReviewService {
    /// Create a new profile review service.
    #[must_use]
    pub fn new(store: SharedProfileStore) -> Self {
        Self { store }
    }

    /// Stage a name and/or avatar change for `user_id`.
    ///
    /// Both pending fields are replaced: a field left out of `input` is
    /// cleared. Any previous rejection note is dropped.
    pub async fn submit(
        &self,
        caller: &Identity,
        user_id: &str,
        input: SubmitReviewInput,
    ) -> AppResult<()> {
        caller.require_owner(user_id)?;

        let input = input.normalized();
        let change = StagedChange {
            name: input.name.clone(),
            avatar: input.avatar.clone(),
        };
        if change.is_empty() {
            return Err(AppError::Validation(
                "at least one of name or avatar is required".to_string(),
            ));
        }
        input.validate()?;

        if self.store.find_by_id(user_id).await?.is_none() {
            return Err(AppError::UserNotFound(user_id.to_string()));
        }

        let staged_name = change.name.is_some();
        let staged_avatar = change.avatar.is_some();
        let affected = self.store.stage_review(user_id, change).await?;
        if affected == 0 {
            return Err(AppError::OperationFailed(
                "Failed to submit profile for review".to_string(),
            ));
        }

        info!(user_id = %user_id, staged_name, staged_avatar, "Profile change submitted for review");
        Ok(())
    }
}
