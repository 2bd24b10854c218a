//! Shipwright Core - Core library for release automation
//!
//! This crate provides the foundational types, error handling, configuration
//! and manifest state shared by every Shipwright crate.

pub mod config;
pub mod error;
pub mod manifest;
pub mod types;

pub use error::{
    ConfigError, GatewayError, GitError, PipelineError, Result, ShipwrightError,
    UpdaterError, VersionError,
};
pub use manifest::ManifestState;
pub use types::{owner_of, Component, ReleaseWarning, RunContext, ROOT_PATH};
