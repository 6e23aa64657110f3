//! Business logic layer
//!
//! Services sit between the HTTP handlers and the record store. They own
//! validation, reference checks, and credential handling; the store stays a
//! plain persistence surface.

pub mod auth;
pub mod mutation;
pub mod password;
pub(crate) mod projection;
pub mod query;
pub mod summary;

pub use auth::AuthService;
pub use mutation::MutationService;
pub use query::{QueryService, UpcomingRecords};
pub use summary::SummaryService;
