//! Git repository access

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::{debug, instrument};

use shipwright_core::error::GitError;

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Read-only handle on a local git checkout
pub struct GitRepo {
    pub(crate) repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open the repository rooted at `path`
    #[instrument(fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        debug!("opening git repository");
        let repo = Repository::open(path).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => GitError::RepositoryNotFound(path.to_path_buf()),
            _ => GitError::OpenFailed(e.to_string()),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            repo,
        })
    }

    /// Open the repository containing `start_path`, searching parent directories
    #[instrument(fields(start_path = %start_path.display()))]
    pub fn discover(start_path: &Path) -> Result<Self> {
        debug!("discovering git repository");
        let repo = Repository::discover(start_path).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => GitError::NotARepository(start_path.to_path_buf()),
            _ => GitError::OpenFailed(e.to_string()),
        })?;

        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        Ok(Self { repo, path })
    }

    /// Working tree root (or git dir for bare repositories)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a revision (tag, branch or hash) to a commit
    pub fn resolve_commit(&self, revision: &str) -> Result<git2::Commit<'_>> {
        self.repo
            .revparse_single(revision)
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| match e.code() {
                git2::ErrorCode::NotFound => GitError::RevisionNotFound(revision.to_string()),
                _ => GitError::Git2(e),
            })
    }

    /// The HEAD commit
    pub fn head_commit(&self) -> Result<git2::Commit<'_>> {
        self.repo.head()?.peel_to_commit().map_err(GitError::Git2)
    }

    /// Read a file from the HEAD tree
    pub fn read_file_at_head(&self, path: &str) -> Result<Option<String>> {
        let tree = self.head_commit()?.tree()?;
        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let blob = entry.to_object(&self.repo)?.peel_to_blob()?;
        Ok(Some(String::from_utf8_lossy(blob.content()).into_owned()))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use git2::{Repository, Signature};
    use tempfile::TempDir;

    /// Commit `files` (path, content) on HEAD and return the new commit id
    pub fn commit_files(repo: &Repository, root: &Path, message: &str, files: &[(&str, &str)]) -> git2::Oid {
        let mut index = repo.index().unwrap();
        for (path, content) in files {
            let full = root.join(path);
            std::fs::create_dir_all(full.parent().unwrap()).unwrap();
            std::fs::write(&full, content).unwrap();
            index.add_path(Path::new(path)).unwrap();
        }
        index.write().unwrap();

        let sig = Signature::now("Test", "test@example.com").unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let parents: Vec<_> = repo.head().ok().and_then(|h| h.peel_to_commit().ok()).into_iter().collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs).unwrap()
    }

    pub fn init() -> (TempDir, Repository) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        (temp, repo)
    }
}
