//! Collaborator capabilities: commit source and repository gateway

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use shipwright_changelog::{CommitParser, ConventionalCommit, ConventionalParser};
use shipwright_core::error::{GatewayError, Result};
use shipwright_git::{GitRepo, TagInfo};
use tracing::debug;

/// Supplies classified commits and release tags
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// Commits newest first, excluding `since` and its ancestors,
    /// restricted to those touching `path_prefix` when given
    async fn list_commits_since(
        &self,
        since: Option<&str>,
        path_prefix: Option<&str>,
    ) -> Result<Vec<ConventionalCommit>>;

    /// Tags of the repository
    async fn list_tags(&self) -> Result<Vec<TagInfo>>;
}

/// Pull request currently open for a head branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExistingPullRequest {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// New content of one file on the head branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: String,
    pub content: String,
}

/// Everything needed to open or update a release pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRequest {
    pub title: String,
    pub body: String,
    pub head_branch: String,
    pub base_branch: String,
    pub changes: Vec<FileChange>,
    pub labels: Vec<String>,
    pub draft: bool,
}

/// Identifier of an opened or updated pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestHandle {
    pub number: u64,
    pub url: String,
}

/// Remote repository operations used by a run
///
/// Implementations own retries; errors are surfaced to the caller unchanged.
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Open pull request whose head is `branch`
    async fn find_open_pull_request(&self, branch: &str) -> Result<Option<ExistingPullRequest>>;

    /// Create the pull request, or update the one open for its head branch
    async fn open_or_update_pull_request(&self, request: &PullRequestRequest) -> Result<PullRequestHandle>;

    /// Commit `content` to `path` on `branch`; returns a URL to the file
    async fn write_overflow_file(&self, branch: &str, path: &str, content: &str) -> Result<String>;

    /// Content behind a URL returned by [`Self::write_overflow_file`]
    async fn read_overflow_file(&self, url: &str) -> Result<String>;

    /// Content of `path` on the target branch, `None` when absent
    async fn read_file(&self, path: &str) -> Result<Option<String>>;

    /// Comment on pull request `number`
    async fn add_comment(&self, number: u64, body: &str) -> Result<()>;
}

/// Commit source backed by a local git checkout
pub struct LocalCommitSource {
    repo: Mutex<GitRepo>,
    parser: ConventionalParser,
}

impl LocalCommitSource {
    pub fn new(repo: GitRepo) -> Self {
        Self {
            repo: Mutex::new(repo),
            parser: ConventionalParser::new(),
        }
    }

    /// Open the repository containing `path`
    pub fn discover(path: &Path) -> Result<Self> {
        Ok(Self::new(GitRepo::discover(path)?))
    }

    pub fn with_parser(mut self, parser: ConventionalParser) -> Self {
        self.parser = parser;
        self
    }

    fn with_repo<T>(&self, f: impl FnOnce(&GitRepo) -> Result<T>) -> Result<T> {
        let repo = self.repo.lock().map_err(|_| GatewayError::RequestFailed {
            operation: "git".to_string(),
            message: "repository lock poisoned".to_string(),
        })?;
        f(&repo)
    }
}

#[async_trait]
impl CommitSource for LocalCommitSource {
    async fn list_commits_since(
        &self,
        since: Option<&str>,
        path_prefix: Option<&str>,
    ) -> Result<Vec<ConventionalCommit>> {
        let raw = self.with_repo(|repo| Ok(repo.commits_since(since, path_prefix)?))?;
        let parsed = self.parser.parse_all(&raw);
        debug!(raw = raw.len(), parsed = parsed.len(), since = ?since, path = ?path_prefix, "commits classified");
        Ok(parsed)
    }

    async fn list_tags(&self) -> Result<Vec<TagInfo>> {
        self.with_repo(|repo| Ok(repo.tags()?))
    }
}

/// Read-only gateway over a local checkout, for dry runs
///
/// Reads files from `HEAD`, reports no open pull requests and refuses writes.
pub struct LocalGateway {
    repo: Mutex<GitRepo>,
}

impl LocalGateway {
    pub fn new(repo: GitRepo) -> Self {
        Self { repo: Mutex::new(repo) }
    }

    pub fn discover(path: &Path) -> Result<Self> {
        Ok(Self::new(GitRepo::discover(path)?))
    }
}

fn read_only(operation: &str) -> GatewayError {
    GatewayError::Unsupported(format!("{} on a read-only local gateway", operation))
}

#[async_trait]
impl RepositoryGateway for LocalGateway {
    async fn find_open_pull_request(&self, _branch: &str) -> Result<Option<ExistingPullRequest>> {
        Ok(None)
    }

    async fn open_or_update_pull_request(&self, _request: &PullRequestRequest) -> Result<PullRequestHandle> {
        Err(read_only("open_or_update_pull_request").into())
    }

    async fn write_overflow_file(&self, _branch: &str, _path: &str, _content: &str) -> Result<String> {
        Err(read_only("write_overflow_file").into())
    }

    async fn read_overflow_file(&self, url: &str) -> Result<String> {
        Err(GatewayError::NotFound(url.to_string()).into())
    }

    async fn read_file(&self, path: &str) -> Result<Option<String>> {
        let repo = self.repo.lock().map_err(|_| GatewayError::RequestFailed {
            operation: "read_file".to_string(),
            message: "repository lock poisoned".to_string(),
        })?;
        Ok(repo.read_file_at_head(path)?)
    }

    async fn add_comment(&self, _number: u64, _body: &str) -> Result<()> {
        Err(read_only("add_comment").into())
    }
}
