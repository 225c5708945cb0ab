//! Core business logic for inkpost.
//!
//! The profile moderation workflow lives here: users stage name/avatar
//! changes ([`ProfileReviewService`]), administrators list and decide on
//! them ([`ReviewDecisionService`]), and both read the merged view
//! ([`ProfileService`]). [`UserService`] covers account creation and token
//! authentication.

pub mod services;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use services::*;
