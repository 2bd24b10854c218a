//! Default conventional-commit versioning

use semver::Version;
use shipwright_changelog::ConventionalCommit;
use shipwright_core::Component;
use tracing::debug;

use crate::traits::VersioningStrategy;
use crate::types::BumpType;

/// Breaking changes bump major, features minor, fixes patch
///
/// While the previous major is 0, `bump-minor-pre-major` demotes major to
/// minor and `bump-patch-for-minor-pre-major` demotes minor to patch.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStrategy;

impl DefaultStrategy {
    /// Create the default strategy
    pub fn new() -> Self {
        Self
    }
}

impl VersioningStrategy for DefaultStrategy {
    fn name(&self) -> &'static str {
        "default"
    }

    fn determine_bump(
        &self,
        commits: &[ConventionalCommit],
        previous: Option<&Version>,
        component: &Component,
    ) -> BumpType {
        let raw = BumpType::for_commits(commits);
        let pre_major = previous.is_some_and(|v| v.major == 0);
        if !pre_major {
            return raw;
        }

        let mut bump = raw;
        if bump == BumpType::Major && component.bump_minor_pre_major {
            bump = BumpType::Minor;
        } else if bump == BumpType::Minor && component.bump_patch_for_minor_pre_major {
            bump = BumpType::Patch;
        }

        if bump != raw {
            debug!(component = %component.path, from = %raw, to = %bump, "demoted pre-major bump");
        }
        bump
    }
}
