//! Shared fixtures for release flow tests

#![allow(dead_code)]

mod mock_gateway;

pub use mock_gateway::{MockCommitSource, MockGateway};

use chrono::NaiveDate;
use shipwright_core::config::Config;
use shipwright_core::RunContext;

/// Parse a JSON configuration
pub fn config(json: &str) -> Config {
    serde_json::from_str(json).expect("valid test config")
}

/// Run context for `acme/widgets` on `main`
pub fn run_context(config: &Config) -> RunContext {
    config.run_context(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
}
