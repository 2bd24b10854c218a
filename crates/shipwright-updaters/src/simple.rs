//! Release type for repositories without a package manifest

use shipwright_core::error::Result;

use crate::generic::VersionFileUpdater;
use crate::traits::{ReleaseStrategy, StrategyContext};
use crate::update::FileUpdate;

/// Tracks the version in `version.txt`
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleStrategy;

impl SimpleStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ReleaseStrategy for SimpleStrategy {
    fn release_type(&self) -> &'static str {
        "simple"
    }

    fn build_updates(&self, ctx: &StrategyContext<'_>) -> Result<Vec<FileUpdate>> {
        let mut updates: Vec<FileUpdate> = ctx.changelog_update().into_iter().collect();
        updates.push(FileUpdate::creating(
            ctx.component.file_path("version.txt"),
            VersionFileUpdater::new(ctx.version),
        ));
        Ok(updates)
    }
}
