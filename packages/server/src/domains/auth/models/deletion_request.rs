use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domains::tenant::Tenant;
use crate::kernel::ServerDeps;

pub const DELETION_REQUESTS_COLLECTION: &str = "deletion_requests";

/// A pending request to delete an account. Its presence blocks login;
/// execution of the deletion belongs to an external worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionRequest {
    pub account_id: String,
    pub requested_epoch: i64,
    pub reason: String,
}

impl DeletionRequest {
    /// True when a deletion request is pending for the account.
    pub async fn pending(deps: &ServerDeps, tenant: &Tenant, account_id: &str) -> Result<bool> {
        let doc = deps
            .find_one(
                &tenant.name,
                DELETION_REQUESTS_COLLECTION,
                json!({ "accountId": account_id }),
            )
            .join()
            .await?;

        Ok(doc.is_some())
    }

    /// Persist a deletion request (deletion endpoints and tests).
    pub async fn save(&self, deps: &ServerDeps, tenant: &Tenant) -> Result<()> {
        deps.save(
            &tenant.name,
            DELETION_REQUESTS_COLLECTION,
            &self.account_id,
            serde_json::to_value(self)?,
        )
        .await
    }
}
