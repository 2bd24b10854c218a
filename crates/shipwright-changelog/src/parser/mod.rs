//! Commit parsing

mod conventional;
mod types;

pub use conventional::ConventionalParser;
pub use types::*;

use crate::types::ConventionalCommit;
use shipwright_git::CommitInfo;

/// Trait for commit parsers
pub trait CommitParser: Send + Sync {
    /// Classify a raw commit; `None` drops it from release consideration
    fn parse(&self, commit: &CommitInfo) -> Option<ConventionalCommit>;

    /// Classify every commit, keeping input order
    fn parse_all(&self, commits: &[CommitInfo]) -> Vec<ConventionalCommit> {
        commits.iter().filter_map(|c| self.parse(c)).collect()
    }
}
