//! File updates and update sets

use std::fmt;
use std::sync::Arc;

use shipwright_core::error::{PipelineError, Result, UpdaterError};
use tracing::debug;

/// Rewrites the content of one file for a release
pub trait Updater: Send + Sync {
    /// Short identifier used in logs and debug output
    fn name(&self) -> &'static str;

    /// New content for `path` given its current content (`None` if absent)
    fn update_content(&self, path: &str, content: Option<&str>) -> Result<String>;
}

/// A pending edit of one repository file
#[derive(Clone)]
pub struct FileUpdate {
    /// Repository-relative path
    pub path: String,
    /// Whether the file may be created when absent
    pub create_if_missing: bool,
    /// Content rewriter
    pub updater: Arc<dyn Updater>,
    /// Current content, when already fetched
    pub cached_content: Option<String>,
}

impl FileUpdate {
    /// Update of an existing file
    pub fn new(path: impl Into<String>, updater: impl Updater + 'static) -> Self {
        Self {
            path: path.into(),
            create_if_missing: false,
            updater: Arc::new(updater),
            cached_content: None,
        }
    }

    /// Update that creates the file when it does not exist yet
    pub fn creating(path: impl Into<String>, updater: impl Updater + 'static) -> Self {
        Self {
            create_if_missing: true,
            ..Self::new(path, updater)
        }
    }

    /// Attach the file's current content
    pub fn with_cached_content(mut self, content: Option<String>) -> Self {
        self.cached_content = content;
        self
    }

    /// Produce the new content from `existing`
    pub fn apply(&self, existing: Option<&str>) -> Result<String> {
        if existing.is_none() && !self.create_if_missing {
            return Err(UpdaterError::MissingFile(self.path.clone()).into());
        }
        self.updater.update_content(&self.path, existing)
    }

    /// Produce the new content from the cached content
    pub fn render(&self) -> Result<String> {
        self.apply(self.cached_content.as_deref())
    }
}

impl fmt::Debug for FileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpdate")
            .field("path", &self.path)
            .field("create_if_missing", &self.create_if_missing)
            .field("updater", &self.updater.name())
            .field("cached", &self.cached_content.is_some())
            .finish()
    }
}

/// Updates of one candidate, at most one per path, each with its owning component
#[derive(Debug, Clone, Default)]
pub struct UpdateSet {
    entries: Vec<(String, FileUpdate)>,
}

impl UpdateSet {
    /// Empty update set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an update owned by `owner`; a second update for the same path is an error
    pub fn insert(&mut self, owner: &str, update: FileUpdate) -> Result<()> {
        if self.get(&update.path).is_some() {
            return Err(UpdaterError::DuplicatePath {
                component: owner.to_string(),
                path: update.path,
            }
            .into());
        }
        self.entries.push((owner.to_string(), update));
        Ok(())
    }

    /// Add an update, replacing any existing update for the same path
    pub fn upsert(&mut self, owner: &str, update: FileUpdate) {
        match self.entries.iter_mut().find(|(_, u)| u.path == update.path) {
            Some(slot) => *slot = (owner.to_string(), update),
            None => self.entries.push((owner.to_string(), update)),
        }
    }

    /// Union with `other`
    ///
    /// A path present in both is a merge conflict naming both owners, unless
    /// `force` is set, in which case `other` wins.
    pub fn merge(&mut self, other: UpdateSet, force: bool) -> Result<()> {
        for (owner, update) in other.entries {
            if let Some(first) = self.owner_of(&update.path) {
                if !force {
                    return Err(PipelineError::MergeConflict {
                        path: update.path,
                        first: first.to_string(),
                        second: owner,
                    }
                    .into());
                }
                debug!(path = %update.path, first, second = %owner, "forced merge replaces update");
            }
            self.upsert(&owner, update);
        }
        Ok(())
    }

    /// Update for `path`
    pub fn get(&self, path: &str) -> Option<&FileUpdate> {
        self.entries.iter().find(|(_, u)| u.path == path).map(|(_, u)| u)
    }

    /// Component owning the update for `path`
    pub fn owner_of(&self, path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, u)| u.path == path)
            .map(|(owner, _)| owner.as_str())
    }

    /// Paths in insertion order
    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, u)| u.path.as_str()).collect()
    }

    /// Updates in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &FileUpdate> {
        self.entries.iter().map(|(_, u)| u)
    }

    /// Mutable updates in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FileUpdate> {
        self.entries.iter_mut().map(|(_, u)| u)
    }

    /// Number of updates
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for UpdateSet {
    type Item = FileUpdate;
    type IntoIter = std::vec::IntoIter<FileUpdate>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .into_iter()
            .map(|(_, update)| update)
            .collect::<Vec<_>>()
            .into_iter()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::Fixed;
    use super::*;
    use shipwright_core::ShipwrightError;

    #[test]
    fn test_duplicate_path_rejected() {
        let mut set = UpdateSet::new();
        set.insert("a", FileUpdate::new("CHANGELOG.md", Fixed("one"))).unwrap();
        let err = set.insert("a", FileUpdate::new("CHANGELOG.md", Fixed("two"))).unwrap_err();

        assert!(matches!(
            err,
            ShipwrightError::Updater(UpdaterError::DuplicatePath { .. })
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_merge_union() {
        let mut left = UpdateSet::new();
        left.insert("a", FileUpdate::new("a/package.json", Fixed("a"))).unwrap();
        let mut right = UpdateSet::new();
        right.insert("b", FileUpdate::new("b/package.json", Fixed("b"))).unwrap();

        left.merge(right, false).unwrap();
        assert_eq!(left.paths(), vec!["a/package.json", "b/package.json"]);
        assert_eq!(left.owner_of("b/package.json"), Some("b"));
    }

    #[test]
    fn test_merge_conflict_names_both_owners() {
        let mut left = UpdateSet::new();
        left.insert("a", FileUpdate::creating("shared.txt", Fixed("a"))).unwrap();
        let mut right = UpdateSet::new();
        right.insert("b", FileUpdate::creating("shared.txt", Fixed("b"))).unwrap();

        match left.clone().merge(right.clone(), false) {
            Err(ShipwrightError::Pipeline(PipelineError::MergeConflict { path, first, second })) => {
                assert_eq!(path, "shared.txt");
                assert_eq!(first, "a");
                assert_eq!(second, "b");
            }
            other => panic!("expected merge conflict, got {other:?}"),
        }

        left.merge(right, true).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left.get("shared.txt").unwrap().render().unwrap(), "b");
    }

    #[test]
    fn test_apply_requires_existing_file() {
        let update = FileUpdate::new("package.json", Fixed("x"));
        assert!(update.apply(None).is_err());
        assert_eq!(update.apply(Some("old")).unwrap(), "x");

        let creating = FileUpdate::creating("version.txt", Fixed("1.0.0\n"));
        assert_eq!(creating.apply(None).unwrap(), "1.0.0\n");
    }
}
