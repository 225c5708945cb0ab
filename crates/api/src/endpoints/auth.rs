//! Account registration endpoint.

use axum::{Json, Router, extract::State, routing::post};
use inkpost_common::AppResult;
use inkpost_core::SignupInput;
use inkpost_db::entities::user::UserRole;
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

/// Signup request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

/// Signup response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub token: String,
}

/// Create a new user account.
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<ApiResponse<SignupResponse>> {
    let user = state
        .user_service
        .signup(SignupInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(ApiResponse::ok(SignupResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
        token: user.token,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/signup", post(signup))
}
