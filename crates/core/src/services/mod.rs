//! Business logic services.

#![allow(missing_docs)]

pub mod authorization;
pub mod profile;
pub mod profile_review;
pub mod profile_store;
pub mod review_decision;
pub mod user;

pub use authorization::{AdminCapability, Identity};
pub use profile::ProfileService;
pub use profile_review::{ProfileReviewService, SubmitReviewInput};
pub use profile_store::{DbProfileStore, ProfileStore, SharedProfileStore, StagedChange};
pub use review_decision::{ReviewAction, ReviewDecisionService};
pub use user::{ChangePasswordInput, SignupInput, UpdateProfileInput, UserService, hash_password};
