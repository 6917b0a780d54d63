//! Profile domain - read-only decoration of verified logins.
//!
//! Profiles are maintained by an external CRUD service; this engine only
//! fetches them by account id to enrich responses.

pub mod models;

pub use models::profile::{Profile, ProfileView, PROFILES_COLLECTION};
