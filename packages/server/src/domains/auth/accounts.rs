//! Guarded account views.
//!
//! Everything behind a session token funnels through here: the account must
//! still exist, must not be blocked, and must not be marked for deletion.
//! The login record and profile are independent documents, so their reads
//! are dispatched together and joined.

use futures::future::try_join;

use crate::domains::auth::errors::AuthError;
use crate::domains::auth::models::LoginRecord;
use crate::domains::profile::{Profile, ProfileView};
use crate::domains::tenant::Tenant;
use crate::kernel::{join_all, ServerDeps};

/// Load the merged account view, enforcing the access guards.
pub async fn account_view(
    deps: &ServerDeps,
    tenant: &Tenant,
    account_id: &str,
) -> Result<ProfileView, AuthError> {
    let record_query = LoginRecord::fetch_by_account_id(deps, tenant, account_id);
    let profile_query = Profile::fetch(deps, tenant, account_id);
    let (record, profile) = try_join(record_query.join(), profile_query.join()).await?;

    let record = record.ok_or_else(|| AuthError::NotFound("account not found".to_string()))?;
    guard(&record)?;

    Ok(ProfileView::merged(profile, &record))
}

/// Batch variant: every read for every id is in flight before the first
/// join, so N accounts cost one round of store latency, not 2N.
pub async fn account_views(
    deps: &ServerDeps,
    tenant: &Tenant,
    account_ids: &[String],
) -> Result<Vec<ProfileView>, AuthError> {
    let record_queries = account_ids
        .iter()
        .map(|id| LoginRecord::fetch_by_account_id(deps, tenant, id))
        .collect();
    let profile_queries = account_ids
        .iter()
        .map(|id| Profile::fetch(deps, tenant, id))
        .collect();

    let (records, profiles) =
        try_join(join_all(record_queries), join_all(profile_queries)).await?;

    // Unknown ids are skipped rather than failing the whole batch
    let views = records
        .into_iter()
        .zip(profiles)
        .filter_map(|(record, profile)| {
            record.map(|record| ProfileView::merged(profile, &record))
        })
        .collect();

    Ok(views)
}

fn guard(record: &LoginRecord) -> Result<(), AuthError> {
    if record.is_blocked {
        return Err(AuthError::denied("account blocked"));
    }
    if record.deletion_info.marked_for_deletion {
        return Err(AuthError::denied("account marked for deletion"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::account_id;
    use crate::domains::auth::models::{DeletionInfo, LOGIN_COLLECTION};
    use crate::kernel::test_dependencies::TestDependencies;
    use crate::kernel::traits::BaseStore;

    fn tenant() -> Tenant {
        Tenant {
            name: "acme".to_string(),
            access_token: "valid_domain".to_string(),
            stage: "test".to_string(),
        }
    }

    async fn seed_record(harness: &TestDependencies, record: &LoginRecord) {
        harness
            .store
            .save(
                "acme",
                LOGIN_COLLECTION,
                &record.account_id,
                serde_json::to_value(record).unwrap(),
            )
            .await
            .unwrap();
    }

    fn record_for(contact: &str) -> LoginRecord {
        LoginRecord {
            account_id: account_id(contact),
            phone: Some(contact.to_string()),
            user_type: "default".to_string(),
            created_epoch: 1_700_000_000,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_account_view_merges_record_and_profile() {
        let harness = TestDependencies::new();
        let deps = harness.deps();
        let id = account_id("9970378011");

        seed_record(&harness, &record_for("9970378011")).await;
        Profile {
            account_id: id.clone(),
            name: "Jo".to_string(),
            ..Default::default()
        }
        .save(&deps, &tenant())
        .await
        .unwrap();

        let view = account_view(&deps, &tenant(), &id).await.unwrap();
        assert_eq!(view.name, "Jo");
        assert_eq!(view.phone.as_deref(), Some("9970378011"));
    }

    #[tokio::test]
    async fn test_account_view_missing_account() {
        let harness = TestDependencies::new();
        let deps = harness.deps();

        let err = account_view(&deps, &tenant(), "no-such-id").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound(_)), "got: {err}");
    }

    #[tokio::test]
    async fn test_account_view_rejects_blocked() {
        let harness = TestDependencies::new();
        let deps = harness.deps();

        let mut record = record_for("9970378011");
        record.is_blocked = true;
        seed_record(&harness, &record).await;

        let err = account_view(&deps, &tenant(), &record.account_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::PermissionDenied(_)), "got: {err}");
    }

    #[tokio::test]
    async fn test_account_view_rejects_marked_for_deletion() {
        let harness = TestDependencies::new();
        let deps = harness.deps();

        let mut record = record_for("9970378011");
        record.deletion_info = DeletionInfo {
            marked_for_deletion: true,
            deletion_epoch: 1_700_000_100,
            reason: "user request".to_string(),
        };
        seed_record(&harness, &record).await;

        let err = account_view(&deps, &tenant(), &record.account_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::PermissionDenied(_)), "got: {err}");
    }

    #[tokio::test]
    async fn test_account_views_skips_unknown_ids() {
        let harness = TestDependencies::new();
        let deps = harness.deps();

        seed_record(&harness, &record_for("9970378011")).await;
        seed_record(&harness, &record_for("8880000000")).await;

        let ids = vec![
            account_id("9970378011"),
            "unknown".to_string(),
            account_id("8880000000"),
        ];
        let views = account_views(&deps, &tenant(), &ids).await.unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].phone.as_deref(), Some("9970378011"));
        assert_eq!(views[1].phone.as_deref(), Some("8880000000"));
    }
}
