//! Shipwright Updaters - File updates for release pull requests
//!
//! A release strategy knows which files of a component carry its version and
//! produces a [`FileUpdate`] for each; updates are collected per candidate in
//! an [`UpdateSet`] that admits at most one update per path.

pub mod cargo;
pub mod generic;
pub mod npm;
pub mod python;
pub mod registry;
pub mod simple;
mod traits;
mod update;

pub use registry::UpdaterRegistry;
pub use traits::{ReleaseStrategy, StrategyContext};
pub use update::{FileUpdate, UpdateSet, Updater};
