//! Administrator endpoints: author attribution and the profile review queue.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use inkpost_common::AppResult;
use inkpost_core::ReviewAction;
use inkpost_db::entities::user::{self, ReviewStatus, UserRole, UserStatus};
use serde::{Deserialize, Serialize};

use crate::{extractors::AdminUser, middleware::AppState, response::ApiResponse};

/// Public author profile. Carries no email.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorProfileResponse {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<user::Model> for AuthorProfileResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            avatar: user.avatar,
            bio: user.bio,
            role: user.role,
            status: user.status,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Entry of the pending review queue.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReviewResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub pending_name: Option<String>,
    pub pending_avatar: Option<String>,
    pub review_status: ReviewStatus,
    pub review_notes: Option<String>,
    pub submitted_at: Option<String>,
    pub created_at: String,
}

impl From<user::Model> for PendingReviewResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            pending_name: user.pending_name,
            pending_avatar: user.pending_avatar,
            review_status: user.review_status,
            review_notes: user.review_notes,
            submitted_at: user.review_submitted_at.map(|t| t.to_rfc3339()),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Outcome of a review decision.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDecisionResponse {
    pub user_id: String,
    pub review_status: ReviewStatus,
}

/// Approve request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveReviewRequest {
    pub user_id: String,
}

/// Reject request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectReviewRequest {
    pub user_id: String,
    pub notes: Option<String>,
}

/// Combined decision request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecideReviewRequest {
    pub user_id: String,
    pub action: String,
    pub notes: Option<String>,
}

/// Site author attribution (public).
async fn author_profile(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<AuthorProfileResponse>> {
    let author = state.profile_service.get_author().await?;
    Ok(ApiResponse::ok(author.into()))
}

/// List pending profile reviews (admin only).
async fn list_profile_reviews(
    admin: AdminUser,
    State(state): State<AppState>,
) -> ApiResponse<Vec<PendingReviewResponse>> {
    let pending = state
        .review_decision_service
        .list_pending(&admin.capability)
        .await;

    ApiResponse::ok(pending.into_iter().map(Into::into).collect())
}

/// Approve a pending profile change (admin only).
async fn approve_profile_review(
    admin: AdminUser,
    State(state): State<AppState>,
    Json(req): Json<ApproveReviewRequest>,
) -> AppResult<ApiResponse<ReviewDecisionResponse>> {
    state
        .review_decision_service
        .approve(&admin.capability, &req.user_id)
        .await?;

    Ok(ApiResponse::ok(ReviewDecisionResponse {
        user_id: req.user_id,
        review_status: ReviewStatus::Approved,
    }))
}

/// Reject a pending profile change (admin only).
async fn reject_profile_review(
    admin: AdminUser,
    State(state): State<AppState>,
    Json(req): Json<RejectReviewRequest>,
) -> AppResult<ApiResponse<ReviewDecisionResponse>> {
    state
        .review_decision_service
        .reject(&admin.capability, &req.user_id, req.notes.as_deref())
        .await?;

    Ok(ApiResponse::ok(ReviewDecisionResponse {
        user_id: req.user_id,
        review_status: ReviewStatus::Rejected,
    }))
}

/// Approve or reject by action name (admin only).
async fn decide_profile_review(
    admin: AdminUser,
    State(state): State<AppState>,
    Json(req): Json<DecideReviewRequest>,
) -> AppResult<ApiResponse<ReviewDecisionResponse>> {
    let action = state
        .review_decision_service
        .decide(
            &admin.capability,
            &req.user_id,
            &req.action,
            req.notes.as_deref(),
        )
        .await?;

    let review_status = match action {
        ReviewAction::Approve => ReviewStatus::Approved,
        ReviewAction::Reject => ReviewStatus::Rejected,
    };

    Ok(ApiResponse::ok(ReviewDecisionResponse {
        user_id: req.user_id,
        review_status,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(author_profile))
        .route("/profile-reviews", get(list_profile_reviews))
        .route("/profile-reviews/approve", post(approve_profile_review))
        .route("/profile-reviews/reject", post(reject_profile_review))
        .route("/profile-reviews/decide", post(decide_profile_review))
}
