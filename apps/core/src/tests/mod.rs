//! Test Module
//!
//! Cross-component suites for the ERP assistant core.
//!
//! ## Test Categories
//! - `brain_tests`: extractor properties over many inputs
//! - `store_tests`: solicitation lifecycle, filters, concurrent access
//! - `dispatch_tests`: orchestrator and handle against a mock assistant
//! - `feedback_tests`: feedback submission against a mock assistant
//! - `integration_tests`: environment config through to an answered request

mod brain_tests;
mod feedback_tests;
mod store_tests;
