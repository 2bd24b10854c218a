//! Node.js release type

mod manifest;

use shipwright_core::error::Result;

use crate::traits::{ReleaseStrategy, StrategyContext};
use crate::update::FileUpdate;
pub use manifest::{package_name, PackageJsonUpdater};

/// Updates `package.json` and the changelog
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeStrategy;

impl NodeStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ReleaseStrategy for NodeStrategy {
    fn release_type(&self) -> &'static str {
        "node"
    }

    fn build_updates(&self, ctx: &StrategyContext<'_>) -> Result<Vec<FileUpdate>> {
        let mut updates: Vec<FileUpdate> = ctx.changelog_update().into_iter().collect();
        updates.push(FileUpdate::new(
            ctx.component.file_path("package.json"),
            PackageJsonUpdater::new(ctx.version),
        ));
        Ok(updates)
    }

    fn package_manifest(&self) -> Option<&'static str> {
        Some("package.json")
    }

    fn package_name_from(&self, content: &str) -> Option<String> {
        package_name(content)
    }
}
