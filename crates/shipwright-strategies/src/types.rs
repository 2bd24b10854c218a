//! Version bump types

use serde::{Deserialize, Serialize};
use shipwright_changelog::ConventionalCommit;

/// Type of version bump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    /// Major version bump (breaking changes)
    Major,
    /// Minor version bump (new features)
    Minor,
    /// Patch version bump (bug fixes)
    Patch,
    /// Pre-release sequence bump
    Prerelease,
    /// No bump needed
    None,
}

impl BumpType {
    /// Bump implied by a single commit
    pub fn for_commit(commit: &ConventionalCommit) -> Self {
        if commit.breaking {
            return Self::Major;
        }
        match commit.commit_type.as_str() {
            "feat" => Self::Minor,
            "fix" | "perf" | "revert" => Self::Patch,
            _ => Self::None,
        }
    }

    /// Highest-severity bump across commits
    pub fn for_commits(commits: &[ConventionalCommit]) -> Self {
        commits
            .iter()
            .map(Self::for_commit)
            .fold(Self::None, Self::max)
    }

    fn rank(self) -> u8 {
        match self {
            Self::Major => 4,
            Self::Minor => 3,
            Self::Patch => 2,
            Self::Prerelease => 1,
            Self::None => 0,
        }
    }

    /// Get the higher priority bump type
    pub fn max(self, other: Self) -> Self {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }

    /// Whether this bump produces a release
    pub fn is_release(self) -> bool {
        self != Self::None
    }
}

impl std::fmt::Display for BumpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
            Self::Prerelease => write!(f, "prerelease"),
            Self::None => write!(f, "none"),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::commits;
    use super::*;

    #[test]
    fn test_bump_type_max() {
        assert_eq!(BumpType::Patch.max(BumpType::Minor), BumpType::Minor);
        assert_eq!(BumpType::Minor.max(BumpType::Major), BumpType::Major);
        assert_eq!(BumpType::None.max(BumpType::Patch), BumpType::Patch);
        assert_eq!(BumpType::Prerelease.max(BumpType::None), BumpType::Prerelease);
    }

    #[test]
    fn test_classification() {
        assert_eq!(BumpType::for_commits(&commits(&["fix: a", "chore: b"])), BumpType::Patch);
        assert_eq!(BumpType::for_commits(&commits(&["perf: a"])), BumpType::Patch);
        assert_eq!(BumpType::for_commits(&commits(&["revert: a"])), BumpType::Patch);
        assert_eq!(BumpType::for_commits(&commits(&["fix: a", "feat: b"])), BumpType::Minor);
        assert_eq!(BumpType::for_commits(&commits(&["docs!: a", "feat: b"])), BumpType::Major);
        assert_eq!(BumpType::for_commits(&commits(&["chore: a", "Update readme"])), BumpType::None);
    }
}
