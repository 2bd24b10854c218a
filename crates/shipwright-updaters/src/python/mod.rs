//! Python release type

mod pyproject;

use shipwright_core::error::Result;

use crate::traits::{ReleaseStrategy, StrategyContext};
use crate::update::FileUpdate;
pub use pyproject::{project_name, PyProjectUpdater};

/// Updates `pyproject.toml` and the changelog
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonStrategy;

impl PythonStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ReleaseStrategy for PythonStrategy {
    fn release_type(&self) -> &'static str {
        "python"
    }

    fn build_updates(&self, ctx: &StrategyContext<'_>) -> Result<Vec<FileUpdate>> {
        let mut updates: Vec<FileUpdate> = ctx.changelog_update().into_iter().collect();
        updates.push(FileUpdate::new(
            ctx.component.file_path("pyproject.toml"),
            PyProjectUpdater::new(ctx.version),
        ));
        Ok(updates)
    }

    fn package_manifest(&self) -> Option<&'static str> {
        Some("pyproject.toml")
    }

    fn package_name_from(&self, content: &str) -> Option<String> {
        project_name(content)
    }
}
