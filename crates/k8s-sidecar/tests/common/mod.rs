//! Shared test utilities for the sidecar integration tests.
//!
//! This module provides:
//! - `MaterializerHarness` for running events against an isolated temp folder
//! - wiremock helpers and a raw TCP endpoint for callback tests
//! - `CapturedLogs` for asserting on emitted log lines

pub mod endpoint;
pub mod harness;
pub mod logs;

pub use endpoint::{hook_server, hook_url, unused_local_url, wait_for_requests, ClosingEndpoint};
pub use harness::MaterializerHarness;
pub use logs::CapturedLogs;
