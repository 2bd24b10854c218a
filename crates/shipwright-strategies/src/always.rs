//! Fixed-bump versioning strategies

use semver::Version;
use shipwright_changelog::ConventionalCommit;
use shipwright_core::Component;

use crate::traits::VersioningStrategy;
use crate::types::BumpType;

/// Applies the same bump whenever any releasable commit is present
#[derive(Debug, Clone, Copy)]
pub struct AlwaysBumpStrategy {
    bump: BumpType,
}

impl AlwaysBumpStrategy {
    /// `always-bump-patch`
    pub fn patch() -> Self {
        Self { bump: BumpType::Patch }
    }

    /// `always-bump-minor`
    pub fn minor() -> Self {
        Self { bump: BumpType::Minor }
    }

    /// `always-bump-major`
    pub fn major() -> Self {
        Self { bump: BumpType::Major }
    }
}

impl VersioningStrategy for AlwaysBumpStrategy {
    fn name(&self) -> &'static str {
        match self.bump {
            BumpType::Major => "always-bump-major",
            BumpType::Minor => "always-bump-minor",
            _ => "always-bump-patch",
        }
    }

    fn determine_bump(
        &self,
        commits: &[ConventionalCommit],
        _previous: Option<&Version>,
        _component: &Component,
    ) -> BumpType {
        if BumpType::for_commits(commits).is_release() {
            self.bump
        } else {
            BumpType::None
        }
    }
}
