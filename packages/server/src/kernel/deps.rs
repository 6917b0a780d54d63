//! Server dependencies (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! code. All external services use trait abstractions to enable testing.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use twilio::{TwilioError, TwilioService};

use crate::domains::auth::JwtService;
use crate::kernel::query::StoreQuery;
use crate::kernel::traits::{BaseMailer, BaseStore, BaseTwilioService};

// =============================================================================
// TwilioService Adapter (implements BaseTwilioService trait)
// =============================================================================

/// Wrapper around TwilioService that implements the BaseTwilioService trait
pub struct TwilioAdapter(pub Arc<TwilioService>);

impl TwilioAdapter {
    pub fn new(service: Arc<TwilioService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseTwilioService for TwilioAdapter {
    async fn send_otp(&self, phone_number: &str) -> Result<()> {
        self.0
            .create_verification(phone_number)
            .await
            .map(|_| ())
            .map_err(Into::into)
    }

    async fn verify_otp(&self, phone_number: &str, code: &str) -> Result<bool> {
        match self.0.check_verification(phone_number, code).await {
            Ok(()) => Ok(true),
            Err(TwilioError::NotApproved(_)) => Ok(false),
            // No pending verification for this number counts as a miss
            Err(TwilioError::Api { status: 404, .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to domain code (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseStore>,
    pub twilio: Arc<dyn BaseTwilioService>,
    pub mailer: Arc<dyn BaseMailer>,
    /// JWT service for session token creation
    pub jwt_service: Arc<JwtService>,
    /// Deadline applied to every store read dispatched via `find_one`
    pub query_deadline: Duration,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn BaseStore>,
        twilio: Arc<dyn BaseTwilioService>,
        mailer: Arc<dyn BaseMailer>,
        jwt_service: Arc<JwtService>,
        query_deadline: Duration,
    ) -> Self {
        Self {
            store,
            twilio,
            mailer,
            jwt_service,
            query_deadline,
        }
    }

    /// Dispatch a store read as a fan-out query.
    ///
    /// The read starts immediately; callers join when they need the outcome,
    /// which lets independent reads run concurrently.
    pub fn find_one(
        &self,
        namespace: &str,
        collection: &str,
        filter: Value,
    ) -> StoreQuery<Option<Value>> {
        let store = self.store.clone();
        let namespace = namespace.to_string();
        let collection = collection.to_string();

        StoreQuery::spawn(self.query_deadline, async move {
            store.find_one(&namespace, &collection, filter).await
        })
    }

    /// Write through to the store.
    pub async fn save(
        &self,
        namespace: &str,
        collection: &str,
        key: &str,
        document: Value,
    ) -> Result<()> {
        self.store.save(namespace, collection, key, document).await
    }
}
