//! Release strategy trait

use semver::Version;
use shipwright_core::error::Result;
use shipwright_core::Component;

use crate::generic::ChangelogUpdater;
use crate::update::FileUpdate;

/// Inputs a release strategy needs to stage a component's release
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    pub component: &'a Component,
    pub version: &'a Version,
    pub previous_version: Option<&'a Version>,
    /// Rendered release notes for this version
    pub changelog_entry: &'a str,
}

impl StrategyContext<'_> {
    /// Changelog update for the component, unless disabled
    pub fn changelog_update(&self) -> Option<FileUpdate> {
        if self.component.skip_changelog {
            return None;
        }
        Some(FileUpdate::creating(
            self.component.file_path(&self.component.changelog_path),
            ChangelogUpdater::new(self.changelog_entry),
        ))
    }
}

/// Per-ecosystem knowledge of which files carry a component's version
pub trait ReleaseStrategy: Send + Sync {
    /// Release type this strategy serves (e.g. "node", "rust")
    fn release_type(&self) -> &'static str;

    /// File updates staging the release described by `ctx`
    fn build_updates(&self, ctx: &StrategyContext<'_>) -> Result<Vec<FileUpdate>>;

    /// Component-relative file that declares the package name
    fn package_manifest(&self) -> Option<&'static str> {
        None
    }

    /// Extract the package name from the content of [`Self::package_manifest`]
    fn package_name_from(&self, _content: &str) -> Option<String> {
        None
    }
}
