//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use inkpost_common::AppError;
use inkpost_core::{ProfileReviewService, ProfileService, ReviewDecisionService, UserService};
use tracing::debug;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub profile_service: ProfileService,
    pub profile_review_service: ProfileReviewService,
    pub review_decision_service: ReviewDecisionService,
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` and stores the user record in the
/// request extensions. Unknown tokens leave the request anonymous; any other
/// failure (suspended account, store error) is returned as-is.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_by_token(token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(AppError::Unauthorized) => debug!("Bearer token not recognized"),
            Err(e) => return e.into_response(),
        }
    }

    next.run(req).await
}
