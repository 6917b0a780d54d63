//! Test harness over the mock dependency set.
//!
//! Flows run against the in-memory store and mock channel providers; the
//! mock handles stay available for assertions (what was sent, to whom, how
//! many store reads happened).

use std::sync::Arc;

use server_core::domains::tenant::Tenant;
use server_core::kernel::test_dependencies::TestDependencies;
use server_core::kernel::ServerDeps;

pub struct TestHarness {
    pub mocks: TestDependencies,
    pub deps: Arc<ServerDeps>,
}

impl TestHarness {
    pub fn new() -> Self {
        let mocks = TestDependencies::new();
        let deps = mocks.deps();
        Self { mocks, deps }
    }

    /// Seed the standard tenant and return it.
    pub async fn seed_tenant(&self) -> Tenant {
        let tenant = Tenant {
            name: "acme".to_string(),
            access_token: "valid_domain".to_string(),
            stage: "test".to_string(),
        };
        tenant.save(&self.deps).await.unwrap();
        tenant
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
