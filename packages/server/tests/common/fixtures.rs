//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use chrono::Utc;
use server_core::common::account_id;
use server_core::domains::auth::models::{DeletionRequest, LoginRecord, LOGIN_COLLECTION};
use server_core::domains::profile::Profile;
use server_core::domains::tenant::Tenant;
use server_core::kernel::traits::BaseStore;

use super::TestHarness;

/// Persist a login record for a phone contact, created in the past.
pub async fn create_phone_record(harness: &TestHarness, tenant: &Tenant, phone: &str) -> LoginRecord {
    let record = LoginRecord {
        account_id: account_id(phone),
        phone: Some(phone.to_string()),
        user_type: "default".to_string(),
        created_epoch: Utc::now().timestamp() - 3600,
        last_otp_sent_epoch: Utc::now().timestamp() - 3600,
        ..Default::default()
    };
    save_record(harness, tenant, &record).await;
    record
}

/// Write a login record document straight into the store.
pub async fn save_record(harness: &TestHarness, tenant: &Tenant, record: &LoginRecord) {
    harness
        .mocks
        .store
        .save(
            &tenant.name,
            LOGIN_COLLECTION,
            &record.account_id,
            serde_json::to_value(record).unwrap(),
        )
        .await
        .unwrap();
}

/// Seed a profile for a contact's account id.
pub async fn create_profile(harness: &TestHarness, tenant: &Tenant, contact: &str, name: &str) {
    Profile {
        account_id: account_id(contact),
        name: name.to_string(),
        ..Default::default()
    }
    .save(&harness.deps, tenant)
    .await
    .unwrap();
}

/// Mark a contact's account for deletion.
pub async fn create_deletion_request(harness: &TestHarness, tenant: &Tenant, contact: &str) {
    DeletionRequest {
        account_id: account_id(contact),
        requested_epoch: Utc::now().timestamp(),
        reason: "user request".to_string(),
    }
    .save(&harness.deps, tenant)
    .await
    .unwrap();
}
