//! Profile review repository.
//!
//! Every write here is one `UPDATE user ... WHERE id = ?`, so the pending
//! fields and the review status always change together without an explicit
//! transaction. Callers get the affected row count back and decide what a
//! zero means.

use std::sync::Arc;

use crate::entities::{User, user, user::ReviewStatus};
use chrono::Utc;
use inkpost_common::{AppError, AppResult};
use sea_orm::{
    ActiveEnum, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
    prelude::DateTimeWithTimeZone,
    sea_query::Expr,
};

/// Repository for the moderation columns of the user table.
#[derive(Clone)]
pub struct ProfileReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ProfileReviewRepository {
    /// Create a new profile review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Users with an outstanding change request, newest submission first.
    pub async fn find_pending(&self) -> AppResult<Vec<user::Model>> {
        User::find()
            .filter(user::Column::ReviewStatus.eq(ReviewStatus::Pending))
            .order_by_desc(user::Column::ReviewSubmittedAt)
            .order_by_desc(user::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::OperationFailed(e.to_string()))
    }

    /// Replace both staged fields and mark the record pending.
    ///
    /// Clears any earlier rejection note. Live `name`/`avatar` are untouched.
    pub async fn stage(
        &self,
        user_id: &str,
        pending_name: Option<String>,
        pending_avatar: Option<String>,
    ) -> AppResult<u64> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        let result = User::update_many()
            .col_expr(user::Column::PendingName, Expr::value(pending_name))
            .col_expr(user::Column::PendingAvatar, Expr::value(pending_avatar))
            .col_expr(
                user::Column::ReviewStatus,
                Expr::value(ReviewStatus::Pending.to_value()),
            )
            .col_expr(user::Column::ReviewNotes, Expr::value(Option::<String>::None))
            .col_expr(user::Column::ReviewSubmittedAt, Expr::value(Some(now)))
            .col_expr(user::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(user::Column::Id.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::OperationFailed(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Merge staged values into the live fields and mark the record approved.
    ///
    /// A staged NULL keeps the live value (`COALESCE`), so approving a record
    /// with nothing staged only flips the status.
    pub async fn approve(&self, user_id: &str) -> AppResult<u64> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        let result = User::update_many()
            .col_expr(user::Column::Name, Expr::cust("COALESCE(pending_name, name)"))
            .col_expr(
                user::Column::Avatar,
                Expr::cust("COALESCE(pending_avatar, avatar)"),
            )
            .col_expr(user::Column::PendingName, Expr::value(Option::<String>::None))
            .col_expr(user::Column::PendingAvatar, Expr::value(Option::<String>::None))
            .col_expr(
                user::Column::ReviewStatus,
                Expr::value(ReviewStatus::Approved.to_value()),
            )
            .col_expr(user::Column::ReviewNotes, Expr::value(Option::<String>::None))
            .col_expr(user::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(user::Column::Id.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::OperationFailed(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Drop staged values, mark the record rejected and store `notes`.
    pub async fn reject(&self, user_id: &str, notes: &str) -> AppResult<u64> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        let result = User::update_many()
            .col_expr(user::Column::PendingName, Expr::value(Option::<String>::None))
            .col_expr(user::Column::PendingAvatar, Expr::value(Option::<String>::None))
            .col_expr(
                user::Column::ReviewStatus,
                Expr::value(ReviewStatus::Rejected.to_value()),
            )
            .col_expr(user::Column::ReviewNotes, Expr::value(Some(notes.to_string())))
            .col_expr(user::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(user::Column::Id.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::OperationFailed(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
