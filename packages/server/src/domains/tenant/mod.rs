//! Tenant domain - isolated customer namespaces.
//!
//! Tenants are created out-of-band and read-only at request time. Every
//! store operation after tenant resolution is scoped to the tenant's
//! namespace.

pub mod models;

pub use models::tenant::{Tenant, SYSTEM_NAMESPACE, TENANTS_COLLECTION};
