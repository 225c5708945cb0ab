//! Administrator decisions on profile change requests.

use std::str::FromStr;

use inkpost_common::{AppError, AppResult, config::ModerationConfig};
use inkpost_db::entities::user::{self, ReviewStatus};
use tracing::{error, info};

use super::authorization::AdminCapability;
use super::profile_store::SharedProfileStore;

/// Decision an administrator can take on a pending change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl FromStr for ReviewAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(AppError::Validation(format!(
                "Unknown review action: {other}"
            ))),
        }
    }
}

/// Lists, approves and rejects profile change requests.
#[derive(Clone)]
pub struct ReviewDecisionService {
    store: SharedProfileStore,
    default_rejection_note: String,
}

impl ReviewDecisionService {
    /// Create a new review decision service.
    #[must_use]
    pub fn new(store: SharedProfileStore, config: &ModerationConfig) -> Self {
        Self {
            store,
            default_rejection_note: config.default_rejection_note.clone(),
        }
    }

    /// Outstanding change requests, newest submission first.
    ///
    /// A storage failure is logged and yields an empty list.
    pub async fn list_pending(&self, admin: &AdminCapability) -> Vec<user::Model> {
        match self.store.find_pending_reviews().await {
            Ok(mut users) => {
                users.retain(|u| u.review_status == ReviewStatus::Pending);
                users
            }
            Err(e) => {
                error!(admin_id = %admin.admin_id(), error = %e, "Failed to list pending profile reviews");
                Vec::new()
            }
        }
    }

    /// Merge the staged values into the live profile.
    pub async fn approve(&self, admin: &AdminCapability, user_id: &str) -> AppResult<()> {
        self.ensure_exists(user_id).await?;

        let affected = self.store.approve_review(user_id).await?;
        if affected == 0 {
            return Err(AppError::OperationFailed(
                "Failed to approve profile review".to_string(),
            ));
        }

        info!(admin_id = %admin.admin_id(), user_id = %user_id, "Profile review approved");
        Ok(())
    }

    /// Discard the staged values and record why.
    ///
    /// Blank or missing notes fall back to the configured default.
    pub async fn reject(
        &self,
        admin: &AdminCapability,
        user_id: &str,
        notes: Option<&str>,
    ) -> AppResult<()> {
        self.ensure_exists(user_id).await?;

        let notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.default_rejection_note.as_str());

        let affected = self.store.reject_review(user_id, notes).await?;
        if affected == 0 {
            return Err(AppError::OperationFailed(
                "Failed to reject profile review".to_string(),
            ));
        }

        info!(admin_id = %admin.admin_id(), user_id = %user_id, "Profile review rejected");
        Ok(())
    }

    /// Apply `action` (`approve` or `reject`) to `user_id`.
    pub async fn decide(
        &self,
        admin: &AdminCapability,
        user_id: &str,
        action: &str,
        notes: Option<&str>,
    ) -> AppResult<ReviewAction> {
        let action: ReviewAction = action.parse()?;
        match action {
            ReviewAction::Approve => self.approve(admin, user_id).await?,
            ReviewAction::Reject => self.reject(admin, user_id, notes).await?,
        }
        Ok(action)
    }

    async fn ensure_exists(&self, user_id: &str) -> AppResult<()> {
        match self.store.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::UserNotFound(user_id.to_string())),
        }
    }
}
