//! In-memory gateway and commit source
//!
//! These are test utilities - not all may be used in every test file.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shipwright_changelog::{CommitParser, ConventionalCommit, ConventionalParser};
use shipwright_core::error::{GatewayError, Result};
use shipwright_git::{CommitInfo, TagInfo};
use shipwright_release::{
    CommitSource, ExistingPullRequest, PullRequestHandle, PullRequestRequest, RepositoryGateway,
};

const BASE_URL: &str = "https://github.com/acme/widgets";

fn failure(operation: &str, message: &str) -> GatewayError {
    GatewayError::RequestFailed {
        operation: operation.to_string(),
        message: message.to_string(),
    }
}

/// Mock repository gateway
///
/// Features:
/// - Files on the target branch
/// - Open pull requests per head branch, updated by proposals
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockGateway {
    next_number: AtomicU64,
    files: Mutex<HashMap<String, String>>,
    open: Mutex<HashMap<String, ExistingPullRequest>>,
    overflow: Mutex<HashMap<String, String>>,
    // Call tracking
    find_calls: Mutex<Vec<String>>,
    requests: Mutex<Vec<PullRequestRequest>>,
    comments: Mutex<Vec<(u64, String)>>,
    overflow_writes: Mutex<Vec<(String, String)>>,
    // Error injection
    error_on_find: Mutex<Option<String>>,
    error_on_open: Mutex<Option<String>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            next_number: AtomicU64::new(1),
            files: Mutex::new(HashMap::new()),
            open: Mutex::new(HashMap::new()),
            overflow: Mutex::new(HashMap::new()),
            find_calls: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            comments: Mutex::new(Vec::new()),
            overflow_writes: Mutex::new(Vec::new()),
            error_on_find: Mutex::new(None),
            error_on_open: Mutex::new(None),
        }
    }

    /// Add a file to the target branch
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        self
    }

    /// Register an open pull request for `branch`
    pub fn set_open_pull_request(&self, branch: &str, title: &str, body: &str, labels: &[&str]) -> u64 {
        let number = self.next_number.fetch_add(1, Ordering::SeqCst);
        self.open.lock().unwrap().insert(
            branch.to_string(),
            ExistingPullRequest {
                number,
                title: title.to_string(),
                body: body.to_string(),
                labels: labels.iter().map(|l| l.to_string()).collect(),
            },
        );
        number
    }

    // === Error injection methods ===

    pub fn fail_find_pull_request(&self, msg: &str) {
        *self.error_on_find.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_open_pull_request(&self, msg: &str) {
        *self.error_on_open.lock().unwrap() = Some(msg.to_string());
    }

    // === Call inspection ===

    pub fn requests(&self) -> Vec<PullRequestRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn comments(&self) -> Vec<(u64, String)> {
        self.comments.lock().unwrap().clone()
    }

    pub fn overflow_writes(&self) -> Vec<(String, String)> {
        self.overflow_writes.lock().unwrap().clone()
    }

    pub fn find_calls(&self) -> Vec<String> {
        self.find_calls.lock().unwrap().clone()
    }

    pub fn open_pull_request(&self, branch: &str) -> Option<ExistingPullRequest> {
        self.open.lock().unwrap().get(branch).cloned()
    }
}

#[async_trait]
impl RepositoryGateway for MockGateway {
    async fn find_open_pull_request(&self, branch: &str) -> Result<Option<ExistingPullRequest>> {
        self.find_calls.lock().unwrap().push(branch.to_string());
        if let Some(msg) = self.error_on_find.lock().unwrap().as_ref() {
            return Err(failure("find_open_pull_request", msg).into());
        }
        Ok(self.open.lock().unwrap().get(branch).cloned())
    }

    async fn open_or_update_pull_request(&self, request: &PullRequestRequest) -> Result<PullRequestHandle> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(msg) = self.error_on_open.lock().unwrap().as_ref() {
            return Err(failure("open_or_update_pull_request", msg).into());
        }

        let mut open = self.open.lock().unwrap();
        let number = match open.get(&request.head_branch) {
            Some(existing) => existing.number,
            None => self.next_number.fetch_add(1, Ordering::SeqCst),
        };
        open.insert(
            request.head_branch.clone(),
            ExistingPullRequest {
                number,
                title: request.title.clone(),
                body: request.body.clone(),
                labels: request.labels.clone(),
            },
        );
        Ok(PullRequestHandle {
            number,
            url: format!("{}/pull/{}", BASE_URL, number),
        })
    }

    async fn write_overflow_file(&self, branch: &str, path: &str, content: &str) -> Result<String> {
        let url = format!("{}/blob/{}/{}", BASE_URL, branch, path);
        self.overflow_writes
            .lock()
            .unwrap()
            .push((branch.to_string(), path.to_string()));
        self.overflow
            .lock()
            .unwrap()
            .insert(url.clone(), content.to_string());
        Ok(url)
    }

    async fn read_overflow_file(&self, url: &str) -> Result<String> {
        self.overflow
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(url.to_string()).into())
    }

    async fn read_file(&self, path: &str) -> Result<Option<String>> {
        Ok(self.files.lock().unwrap().get(path).cloned())
    }

    async fn add_comment(&self, number: u64, body: &str) -> Result<()> {
        self.comments.lock().unwrap().push((number, body.to_string()));
        Ok(())
    }
}

/// Mock commit source over an in-memory history
///
/// Commits are kept newest first; tags point at commit hashes.
pub struct MockCommitSource {
    commits: Mutex<Vec<CommitInfo>>,
    tags: Mutex<Vec<TagInfo>>,
    parser: ConventionalParser,
    calls: Mutex<Vec<(Option<String>, Option<String>)>>,
}

impl Default for MockCommitSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCommitSource {
    pub fn new() -> Self {
        Self {
            commits: Mutex::new(Vec::new()),
            tags: Mutex::new(Vec::new()),
            parser: ConventionalParser::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add a commit on top of the history touching `files`
    pub fn commit(self, message: &str, files: &[&str]) -> Self {
        {
            let mut commits = self.commits.lock().unwrap();
            let n = commits.len() as i64 + 1;
            let hash = format!("{:040x}", n);
            let timestamp = Utc.timestamp_opt(1_700_000_000 + n * 60, 0).unwrap();
            let (summary, body) = message.split_once("\n\n").unwrap_or((message, ""));
            let info = CommitInfo::new(hash, summary, "Test", "test@example.com", timestamp)
                .with_body(body)
                .with_files(files.iter().copied());
            commits.insert(0, info);
        }
        self
    }

    /// Tag the newest commit
    pub fn tag(self, name: &str) -> Self {
        let hash = self
            .commits
            .lock()
            .unwrap()
            .first()
            .map(|c| c.hash.clone())
            .expect("tag needs a commit");
        self.tags.lock().unwrap().push(TagInfo::new(name, hash));
        self
    }

    /// `(since, path_prefix)` of every `list_commits_since` call
    pub fn calls(&self) -> Vec<(Option<String>, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }

    fn resolve(&self, since: &str) -> Option<String> {
        self.tags
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.name == since)
            .map(|t| t.commit_hash.clone())
            .or_else(|| Some(since.to_string()))
    }
}

#[async_trait]
impl CommitSource for MockCommitSource {
    async fn list_commits_since(
        &self,
        since: Option<&str>,
        path_prefix: Option<&str>,
    ) -> Result<Vec<ConventionalCommit>> {
        self.calls
            .lock()
            .unwrap()
            .push((since.map(str::to_string), path_prefix.map(str::to_string)));

        let stop = since.and_then(|s| self.resolve(s));
        let commits = self.commits.lock().unwrap();
        let selected: Vec<CommitInfo> = commits
            .iter()
            .take_while(|c| Some(&c.hash) != stop.as_ref())
            .filter(|c| path_prefix.map_or(true, |prefix| c.touches(prefix)))
            .cloned()
            .collect();
        Ok(self.parser.parse_all(&selected))
    }

    async fn list_tags(&self) -> Result<Vec<TagInfo>> {
        Ok(self.tags.lock().unwrap().clone())
    }
}
