// TestDependencies - mock implementations for testing
//
// Provides an in-memory store and mock channel providers that can be
// injected into ServerDeps for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::{BaseMailer, BaseStore, BaseTwilioService, ServerDeps};
use crate::domains::auth::JwtService;

// =============================================================================
// In-Memory Store
// =============================================================================

/// In-memory document store with the same filter semantics as PgStore:
/// a document matches when it contains every field of the filter.
pub struct MemoryStore {
    docs: Mutex<HashMap<(String, String, String), Value>>,
    reads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            docs: Mutex::new(HashMap::new()),
            reads: AtomicUsize::new(0),
        }
    }

    /// Number of find_one calls issued so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn matches(doc: &Value, filter: &Value) -> bool {
        match (doc, filter) {
            (Value::Object(doc), Value::Object(filter)) => filter
                .iter()
                .all(|(key, expected)| doc.get(key) == Some(expected)),
            _ => false,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseStore for MemoryStore {
    async fn find_one(
        &self,
        namespace: &str,
        collection: &str,
        filter: Value,
    ) -> Result<Option<Value>> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        let docs = self.docs.lock().unwrap();
        let found = docs
            .iter()
            .find(|((ns, coll, _), doc)| {
                ns == namespace && coll == collection && Self::matches(doc, &filter)
            })
            .map(|(_, doc)| doc.clone());
        Ok(found)
    }

    async fn save(
        &self,
        namespace: &str,
        collection: &str,
        key: &str,
        document: Value,
    ) -> Result<()> {
        let mut docs = self.docs.lock().unwrap();
        docs.insert(
            (
                namespace.to_string(),
                collection.to_string(),
                key.to_string(),
            ),
            document,
        );
        Ok(())
    }
}

/// Store whose reads never resolve. Used to exercise query deadlines.
pub struct HangingStore;

#[async_trait]
impl BaseStore for HangingStore {
    async fn find_one(
        &self,
        _namespace: &str,
        _collection: &str,
        _filter: Value,
    ) -> Result<Option<Value>> {
        futures::future::pending::<()>().await;
        unreachable!()
    }

    async fn save(
        &self,
        _namespace: &str,
        _collection: &str,
        _key: &str,
        _document: Value,
    ) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Mock Twilio Service
// =============================================================================

pub struct MockTwilioService {
    accepted_code: String,
    fail_sends: bool,
    sends: Arc<Mutex<Vec<String>>>,
}

impl MockTwilioService {
    pub fn new() -> Self {
        Self {
            accepted_code: "123456".to_string(),
            fail_sends: false,
            sends: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_accepted_code(mut self, code: impl Into<String>) -> Self {
        self.accepted_code = code.into();
        self
    }

    /// Make every send fail (provider outage)
    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Self::new()
        }
    }

    /// Get all phone numbers a verification was started for
    pub fn sends(&self) -> Vec<String> {
        self.sends.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.sends.lock().unwrap().len()
    }
}

impl Default for MockTwilioService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseTwilioService for MockTwilioService {
    async fn send_otp(&self, phone_number: &str) -> Result<()> {
        if self.fail_sends {
            bail!("twilio unavailable");
        }
        self.sends.lock().unwrap().push(phone_number.to_string());
        Ok(())
    }

    async fn verify_otp(&self, _phone_number: &str, code: &str) -> Result<bool> {
        Ok(code == self.accepted_code)
    }
}

// =============================================================================
// Mock Mailer
// =============================================================================

pub struct MockMailer {
    accepted_codes: Vec<String>,
    fail_sends: bool,
    sends: Arc<Mutex<Vec<String>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            accepted_codes: vec!["123456".to_string()],
            fail_sends: false,
            sends: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_accepted_codes(mut self, codes: Vec<String>) -> Self {
        self.accepted_codes = codes;
        self
    }

    /// Make every send fail (gateway outage)
    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Self::new()
        }
    }

    /// Get all addresses an OTP mail was sent to
    pub fn sends(&self) -> Vec<String> {
        self.sends.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.sends.lock().unwrap().len()
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMailer for MockMailer {
    async fn send_otp(&self, email: &str) -> Result<()> {
        if self.fail_sends {
            bail!("mail gateway unavailable");
        }
        self.sends.lock().unwrap().push(email.to_string());
        Ok(())
    }

    async fn verify_otp(&self, _email: &str, code: &str) -> Result<bool> {
        Ok(self.accepted_codes.iter().any(|c| c == code))
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub store: Arc<MemoryStore>,
    pub twilio: Arc<MockTwilioService>,
    pub mailer: Arc<MockMailer>,
    pub jwt_service: Arc<JwtService>,
    pub query_deadline: Duration,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            twilio: Arc::new(MockTwilioService::new()),
            mailer: Arc::new(MockMailer::new()),
            jwt_service: Arc::new(JwtService::new("test_secret", "test_issuer".to_string())),
            query_deadline: Duration::from_secs(2),
        }
    }

    /// Set a mock Twilio service
    pub fn mock_twilio(mut self, twilio: MockTwilioService) -> Self {
        self.twilio = Arc::new(twilio);
        self
    }

    /// Set a mock mailer
    pub fn mock_mailer(mut self, mailer: MockMailer) -> Self {
        self.mailer = Arc::new(mailer);
        self
    }

    pub fn query_deadline(mut self, deadline: Duration) -> Self {
        self.query_deadline = deadline;
        self
    }

    /// Build ServerDeps backed by these mocks. The TestDependencies handles
    /// stay usable for assertions afterwards.
    pub fn deps(&self) -> Arc<ServerDeps> {
        Arc::new(ServerDeps::new(
            self.store.clone(),
            self.twilio.clone(),
            self.mailer.clone(),
            self.jwt_service.clone(),
            self.query_deadline,
        ))
    }

    /// Build ServerDeps whose store reads never resolve.
    pub fn deps_with_hanging_store(&self) -> Arc<ServerDeps> {
        Arc::new(ServerDeps::new(
            Arc::new(HangingStore),
            self.twilio.clone(),
            self.mailer.clone(),
            self.jwt_service.clone(),
            self.query_deadline,
        ))
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
