//! Changelog types

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Commit type recorded for messages that are not conventional commits
pub const UNKNOWN_TYPE: &str = "unknown";

/// A commit classified under the Conventional Commits format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionalCommit {
    /// Full commit hash
    pub sha: String,
    /// Original commit message (summary and body)
    pub message: String,
    /// Commit type (feat, fix, ...; `unknown` when not conventional)
    pub commit_type: String,
    /// Scope in parentheses, if any
    pub scope: Option<String>,
    /// Whether the commit breaks compatibility
    pub breaking: bool,
    /// Summary text after the type prefix
    pub description: String,
    /// Repository-relative files the commit touched
    pub touched_paths: BTreeSet<String>,
    /// Issue numbers referenced in the message
    pub references: Vec<u64>,
    /// Author name
    pub author: String,
    /// Text of the breaking-change footer (or the description with `!`)
    pub breaking_description: Option<String>,
    /// Footer fields
    pub footers: Vec<Footer>,
}

impl ConventionalCommit {
    /// Short hash used in changelog links
    pub fn short_sha(&self) -> &str {
        &self.sha[..7.min(self.sha.len())]
    }

    /// Whether the message followed the conventional format
    pub fn is_conventional(&self) -> bool {
        self.commit_type != UNKNOWN_TYPE
    }
}

/// A footer field from a conventional commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footer {
    /// Footer token (e.g., "BREAKING CHANGE", "Fixes", "Refs")
    pub token: String,
    /// Footer value
    pub value: String,
}

/// A titled group of commits in release notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section title
    pub title: String,
    /// Commits in this section
    pub commits: Vec<ConventionalCommit>,
}

impl Section {
    /// Create a new section
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            commits: Vec::new(),
        }
    }

    /// Check if section is empty
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Release notes for one component version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseNotes {
    /// Version being released
    pub version: String,
    /// Tag of the new release
    pub current_tag: String,
    /// Tag of the previous release, if any
    pub previous_tag: Option<String>,
    /// Release date
    pub date: NaiveDate,
    /// Breaking changes, listed before every other section
    pub breaking_changes: Vec<ConventionalCommit>,
    /// Visible sections in configured order
    pub sections: Vec<Section>,
}

impl ReleaseNotes {
    /// Check if the notes list any commit
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.breaking_changes.is_empty()
    }
}
