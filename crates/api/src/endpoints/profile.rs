//! Own-profile endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use inkpost_common::AppResult;
use inkpost_core::{ChangePasswordInput, SubmitReviewInput, UpdateProfileInput};
use inkpost_db::entities::user::{self, ReviewStatus, UserRole, UserStatus};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Success},
};

/// Profile with its moderation state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub pending_name: Option<String>,
    pub pending_avatar: Option<String>,
    pub review_status: ReviewStatus,
    pub review_notes: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<user::Model> for ProfileResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            avatar: user.avatar,
            bio: user.bio,
            role: user.role,
            status: user.status,
            pending_name: user.pending_name,
            pending_avatar: user.pending_avatar,
            review_status: user.review_status,
            review_notes: user.review_notes,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Direct profile edit request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Profile change submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// Get the caller's profile.
async fn get_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let profile = state.profile_service.get_profile(&user.id).await?;
    Ok(ApiResponse::ok(profile.into()))
}

/// Update bio and password. Administrators may also set name and avatar.
///
/// Nothing is written unless every part of the request is accepted.
async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let identity = auth.identity();
    let password = req.new_password.map(|new_password| ChangePasswordInput {
        current_password: req.current_password.unwrap_or_default(),
        new_password,
    });

    let profile = state
        .user_service
        .update_account(
            &identity,
            UpdateProfileInput {
                bio: req.bio,
                name: req.name,
                avatar: req.avatar,
            },
            password,
        )
        .await?;

    Ok(ApiResponse::ok(profile.into()))
}

/// Stage a name/avatar change for administrator review.
async fn submit_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmitReviewRequest>,
) -> AppResult<ApiResponse<Success>> {
    let identity = auth.identity();
    state
        .profile_review_service
        .submit(
            &identity,
            &auth.0.id,
            SubmitReviewInput {
                name: req.name,
                avatar: req.avatar,
            },
        )
        .await?;

    Ok(ApiResponse::ok(Success::new()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/review", post(submit_review))
}
