//! Rust release type

mod manifest;

use shipwright_core::error::Result;

use crate::traits::{ReleaseStrategy, StrategyContext};
use crate::update::FileUpdate;
pub use manifest::{crate_name, CargoTomlUpdater};

/// Updates `Cargo.toml` and the changelog
#[derive(Debug, Clone, Copy, Default)]
pub struct RustStrategy;

impl RustStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ReleaseStrategy for RustStrategy {
    fn release_type(&self) -> &'static str {
        "rust"
    }

    fn build_updates(&self, ctx: &StrategyContext<'_>) -> Result<Vec<FileUpdate>> {
        let mut updates: Vec<FileUpdate> = ctx.changelog_update().into_iter().collect();
        updates.push(FileUpdate::new(
            ctx.component.file_path("Cargo.toml"),
            CargoTomlUpdater::new(ctx.version),
        ));
        Ok(updates)
    }

    fn package_manifest(&self) -> Option<&'static str> {
        Some("Cargo.toml")
    }

    fn package_name_from(&self, content: &str) -> Option<String> {
        crate_name(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;
    use shipwright_core::Component;

    #[test]
    fn test_rust_updates() {
        let component = Component::new("crates/core", "rust");
        let version = Version::new(0, 2, 0);
        let ctx = StrategyContext {
            component: &component,
            version: &version,
            previous_version: None,
            changelog_entry: "## 0.2.0",
        };

        let updates = RustStrategy.build_updates(&ctx).unwrap();
        let paths: Vec<_> = updates.iter().map(|u| u.path.as_str()).collect();
        assert_eq!(paths, vec!["crates/core/CHANGELOG.md", "crates/core/Cargo.toml"]);
    }
}
