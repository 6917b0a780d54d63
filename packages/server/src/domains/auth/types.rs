//! Auth domain data types
//!
//! Simple, serializable types returned by the login flow.

use serde::{Deserialize, Serialize};

use crate::domains::profile::models::profile::ProfileView;

/// Result of a successful verification: the session token plus the merged
/// profile view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedLogin {
    pub token: String,
    pub user_type: String,
    pub profile: ProfileView,
}
