use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domains::tenant::Tenant;
use crate::kernel::{ServerDeps, StoreQuery};

pub const LOGIN_COLLECTION: &str = "login_info";

/// User type assigned when a record carries none.
pub const DEFAULT_USER_TYPE: &str = "default";

/// Deletion state carried on a login record. Deletion execution happens
/// elsewhere; this engine only reads and marks it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeletionInfo {
    pub marked_for_deletion: bool,
    pub deletion_epoch: i64,
    pub reason: String,
}

/// Per-account login bookkeeping, keyed by account id.
///
/// Exactly one of `email` / `phone` is set by the channel that first created
/// the record; the account id is derived from that contact and stays stable
/// no matter which channel the user authenticates through later.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRecord {
    pub account_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub otp: String,
    pub user_type: String,
    pub last_otp_sent_epoch: i64,
    pub otp_verified_epoch: i64,
    pub created_epoch: i64,
    pub is_blocked: bool,
    pub deletion_info: DeletionInfo,
    pub last_active_epoch: i64,
}

impl LoginRecord {
    /// A record exists in the store once `created_epoch` is stamped;
    /// un-persisted defaults carry zero.
    pub fn is_persisted(&self) -> bool {
        self.created_epoch != 0
    }

    /// Whichever contact field the record carries.
    pub fn contact(&self) -> Option<&str> {
        self.email.as_deref().or(self.phone.as_deref())
    }

    /// Dispatch a fan-out read for the record with this account id.
    pub fn fetch_by_account_id(
        deps: &ServerDeps,
        tenant: &Tenant,
        account_id: &str,
    ) -> StoreQuery<Option<LoginRecord>> {
        let query = deps.find_one(
            &tenant.name,
            LOGIN_COLLECTION,
            json!({ "accountId": account_id }),
        );

        StoreQuery::spawn(deps.query_deadline, async move {
            let doc = query.join().await?;
            doc.map(serde_json::from_value).transpose().map_err(Into::into)
        })
    }
}
