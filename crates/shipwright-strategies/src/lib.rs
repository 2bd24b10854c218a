//! Shipwright Strategies - Version calculation for release management
//!
//! This crate classifies commits into version bumps, applies the selected
//! versioning strategy and computes the next version of a component.

mod always;
mod calculator;
mod default;
mod registry;
mod traits;
pub mod types;
pub mod version;

pub use always::AlwaysBumpStrategy;
pub use calculator::{VersionCalculator, VersionOutcome};
pub use default::DefaultStrategy;
pub use registry::StrategyRegistry;
pub use traits::VersioningStrategy;
pub use types::BumpType;
