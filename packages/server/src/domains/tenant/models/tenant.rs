use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::kernel::ServerDeps;

/// Reserved namespace holding tenant definitions themselves.
pub const SYSTEM_NAMESPACE: &str = "system";
pub const TENANTS_COLLECTION: &str = "tenants";

/// Tenant - one isolated customer deployment, selected by access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub name: String,
    pub access_token: String,
    pub stage: String,
}

impl Tenant {
    /// Resolve a tenant by the domain token presented with a request.
    pub async fn find_by_access_token(deps: &ServerDeps, token: &str) -> Result<Option<Tenant>> {
        let doc = deps
            .find_one(
                SYSTEM_NAMESPACE,
                TENANTS_COLLECTION,
                json!({ "accessToken": token }),
            )
            .join()
            .await?;

        doc.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    /// Look a tenant up by name (used when a session token names its tenant).
    pub async fn find_by_name(deps: &ServerDeps, name: &str) -> Result<Option<Tenant>> {
        let doc = deps
            .find_one(SYSTEM_NAMESPACE, TENANTS_COLLECTION, json!({ "name": name }))
            .join()
            .await?;

        doc.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    /// Persist a tenant definition (provisioning and tests).
    pub async fn save(&self, deps: &ServerDeps) -> Result<()> {
        deps.save(
            SYSTEM_NAMESPACE,
            TENANTS_COLLECTION,
            &self.name,
            serde_json::to_value(self)?,
        )
        .await
    }
}
