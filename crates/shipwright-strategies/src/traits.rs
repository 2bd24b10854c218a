//! Versioning strategy trait

use semver::Version;
use shipwright_changelog::ConventionalCommit;
use shipwright_core::Component;

use crate::types::BumpType;

/// Decides how far a component's version moves for a set of commits
pub trait VersioningStrategy: Send + Sync {
    /// Get the name of this strategy
    fn name(&self) -> &'static str;

    /// Bump for `commits` given the previous release, if any
    fn determine_bump(
        &self,
        commits: &[ConventionalCommit],
        previous: Option<&Version>,
        component: &Component,
    ) -> BumpType;
}
