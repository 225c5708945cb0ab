//! HTTP API layer for inkpost.
//!
//! - **Endpoints**: signup, own profile, review submission and the
//!   administrator review queue
//! - **Extractors**: authenticated caller and administrator capability
//! - **Middleware**: bearer token authentication
//!
//! Built on Axum 0.8. The router is mounted under `/api` by the server.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
