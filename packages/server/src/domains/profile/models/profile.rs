use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domains::auth::models::LoginRecord;
use crate::domains::tenant::Tenant;
use crate::kernel::{ServerDeps, StoreQuery};

pub const PROFILES_COLLECTION: &str = "profiles";

/// Stored profile document, keyed by account id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub account_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub user_type: String,
    pub image_url: Option<String>,
}

/// Projection returned to clients. Built by layering login fields over the
/// stored profile; login wins on overlap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub account_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub user_type: String,
    pub image_url: Option<String>,
}

impl Profile {
    /// Dispatch a fan-out read for the profile with this account id.
    pub fn fetch(
        deps: &ServerDeps,
        tenant: &Tenant,
        account_id: &str,
    ) -> StoreQuery<Option<Profile>> {
        let query = deps.find_one(
            &tenant.name,
            PROFILES_COLLECTION,
            json!({ "accountId": account_id }),
        );

        StoreQuery::spawn(deps.query_deadline, async move {
            let doc = query.join().await?;
            doc.map(serde_json::from_value).transpose().map_err(Into::into)
        })
    }

    /// Persist a profile document (profile service and tests).
    pub async fn save(&self, deps: &ServerDeps, tenant: &Tenant) -> Result<()> {
        deps.save(
            &tenant.name,
            PROFILES_COLLECTION,
            &self.account_id,
            serde_json::to_value(self)?,
        )
        .await
    }
}

impl ProfileView {
    /// Merge login fields onto the profile. A missing profile is fine: the
    /// view then carries only what the login record knows.
    pub fn merged(profile: Option<Profile>, record: &LoginRecord) -> ProfileView {
        let profile = profile.unwrap_or_default();
        ProfileView {
            account_id: record.account_id.clone(),
            name: profile.name,
            email: record.email.clone().or(profile.email),
            phone: record.phone.clone().or(profile.phone),
            user_type: record.user_type.clone(),
            image_url: profile.image_url,
        }
    }
}
