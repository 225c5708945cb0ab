//! Repositories.

pub mod profile_review;
pub mod user;

pub use profile_review::ProfileReviewRepository;
pub use user::UserRepository;
