//! End-to-End Integration Tests
//!
//! These tests drive the public APIs of the fedsec crates together:
//! storage and replay detection, signing and trust evaluation, and XML
//! encryption between two parties.

mod config_loading;
mod encryption_flows;
mod signature_flows;
mod storage_flows;
