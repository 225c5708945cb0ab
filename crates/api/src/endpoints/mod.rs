//! API endpoints.

mod admin;
mod auth;
mod profile;

use axum::Router;

use crate::middleware::AppState;

pub use admin::{AuthorProfileResponse, PendingReviewResponse, ReviewDecisionResponse};
pub use auth::SignupResponse;
pub use profile::ProfileResponse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/user", profile::router())
        .nest("/admin", admin::router())
}
