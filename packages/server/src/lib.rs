// Gatehouse - Multi-Tenant Login Core
//
// This crate provides the OTP login backend for a multi-tenant platform:
// tenant resolution by domain token, channel-polymorphic OTP delivery
// (email or SMS), code verification, and signed session tokens.

pub mod common;
pub mod domains;
pub mod kernel;
pub mod server;
