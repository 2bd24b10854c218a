//! Commit history with touched files

use chrono::{TimeZone, Utc};
use git2::{DiffOptions, Sort};
use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::CommitInfo;

impl GitRepo {
    /// Commits reachable from HEAD but not from `since`, newest first
    ///
    /// With `path_prefix`, only commits touching a file under the prefix are
    /// returned. A missing `since` walks the whole history.
    #[instrument(skip(self))]
    pub fn commits_since(&self, since: Option<&str>, path_prefix: Option<&str>) -> Result<Vec<CommitInfo>> {
        let head = self.head_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head.id())?;
        if let Some(since) = since {
            revwalk.hide(self.resolve_commit(since)?.id())?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let info = self.commit_to_info(&commit)?;
            if path_prefix.map_or(true, |prefix| info.touches(prefix)) {
                commits.push(info);
            }
        }

        debug!(count = commits.len(), "collected commits");
        Ok(commits)
    }

    /// Paths changed by `commit` relative to its first parent
    fn touched_files(&self, commit: &git2::Commit<'_>) -> Result<Vec<String>> {
        let tree = commit.tree()?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree()?),
            Err(_) => None,
        };

        let mut opts = DiffOptions::new();
        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

        let mut files = Vec::new();
        for delta in diff.deltas() {
            for file in [delta.old_file(), delta.new_file()] {
                if let Some(path) = file.path().and_then(|p| p.to_str()) {
                    if !files.iter().any(|f| f == path) {
                        files.push(path.to_string());
                    }
                }
            }
        }
        Ok(files)
    }

    fn commit_to_info(&self, commit: &git2::Commit<'_>) -> Result<CommitInfo> {
        let author = commit.author();
        let timestamp = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .unwrap_or_else(Utc::now);

        Ok(CommitInfo::new(
            commit.id().to_string(),
            commit.summary().unwrap_or_default(),
            author.name().unwrap_or("Unknown"),
            author.email().unwrap_or_default(),
            timestamp,
        )
        .with_body(commit.body().unwrap_or_default())
        .with_files(self.touched_files(commit)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::{commit_files, init};
    use crate::GitRepo;

    #[test]
    fn test_commits_since_tag_with_files() {
        let (temp, raw) = init();
        let first = commit_files(&raw, temp.path(), "chore: init", &[("README.md", "hi")]);
        raw.tag_lightweight("v1.0.0", &raw.find_object(first, None).unwrap(), false)
            .unwrap();
        commit_files(&raw, temp.path(), "feat: add a", &[("packages/a/index.js", "a")]);
        commit_files(&raw, temp.path(), "fix: patch b\n\nCloses #12", &[("packages/b/index.js", "b")]);

        let repo = GitRepo::open(temp.path()).unwrap();
        let commits = repo.commits_since(Some("v1.0.0"), None).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].message, "fix: patch b");
        assert_eq!(commits[0].body.as_deref(), Some("Closes #12"));
        assert_eq!(commits[0].files, vec!["packages/b/index.js".to_string()]);
    }

    #[test]
    fn test_commits_filtered_by_path() {
        let (temp, raw) = init();
        commit_files(&raw, temp.path(), "feat: add a", &[("packages/a/index.js", "a")]);
        commit_files(&raw, temp.path(), "feat: add b", &[("packages/b/index.js", "b")]);

        let repo = GitRepo::open(temp.path()).unwrap();
        let commits = repo.commits_since(None, Some("packages/a")).unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "feat: add a");

        assert_eq!(repo.commits_since(None, Some(".")).unwrap().len(), 2);
    }

    #[test]
    fn test_root_commit_lists_all_files() {
        let (temp, raw) = init();
        commit_files(&raw, temp.path(), "chore: init", &[("a.txt", "a"), ("b/c.txt", "c")]);

        let repo = GitRepo::open(temp.path()).unwrap();
        let commits = repo.commits_since(None, None).unwrap();
        assert_eq!(commits[0].files.len(), 2);
    }
}
