//! Conventional Commits parser
//!
//! Parses commits following the Conventional Commits specification:
//! https://www.conventionalcommits.org/

use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

use super::{CommitParser, ParserConfig};
use crate::types::{ConventionalCommit, Footer, UNKNOWN_TYPE};
use shipwright_git::CommitInfo;

/// Regex for parsing conventional commit headers
static CONVENTIONAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<type>[a-zA-Z]+)(?:\((?P<scope>[^)]+)\))?(?P<breaking>!)?: (?P<description>.+)$",
    )
    .expect("Invalid regex")
});

/// Regex for parsing footer lines (`Token: value` or `Token #123`)
static FOOTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<token>BREAKING[ -]CHANGE|[A-Za-z-]+)(?:: | (?P<hash>#))(?P<value>.+)$")
        .expect("Invalid regex")
});

/// Regex for issue references such as `#123` or `(#123)`
static REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w&/])#(?P<number>\d+)\b").expect("Invalid regex"));

/// Parser for Conventional Commits format
pub struct ConventionalParser {
    config: ParserConfig,
}

impl ConventionalParser {
    /// Create a new parser with default configuration
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Split a commit body into footers
    fn parse_footers(&self, body: &str) -> Vec<Footer> {
        let mut footers: Vec<Footer> = Vec::new();
        let mut in_footer = false;

        for line in body.lines() {
            if let Some(caps) = FOOTER_REGEX.captures(line) {
                in_footer = true;
                let value = caps.name("value").map_or("", |m| m.as_str());
                let value = if caps.name("hash").is_some() {
                    format!("#{}", value)
                } else {
                    value.to_string()
                };
                footers.push(Footer {
                    token: caps.name("token").map_or("", |m| m.as_str()).to_string(),
                    value,
                });
            } else if in_footer && line.starts_with(' ') {
                // Continuation of previous footer
                if let Some(last) = footers.last_mut() {
                    last.value.push('\n');
                    last.value.push_str(line.trim());
                }
            } else if in_footer && line.trim().is_empty() {
                in_footer = false;
            }
        }

        footers
    }
}

impl Default for ConventionalParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Issue numbers mentioned in `text`, in first-seen order
fn extract_references(text: &str) -> Vec<u64> {
    let mut references = Vec::new();
    for caps in REFERENCE_REGEX.captures_iter(text) {
        if let Some(number) = caps.name("number").and_then(|m| m.as_str().parse().ok()) {
            if !references.contains(&number) {
                references.push(number);
            }
        }
    }
    references
}

fn is_breaking_token(token: &str) -> bool {
    token.eq_ignore_ascii_case("BREAKING CHANGE") || token.eq_ignore_ascii_case("BREAKING-CHANGE")
}

impl CommitParser for ConventionalParser {
    fn parse(&self, commit: &CommitInfo) -> Option<ConventionalCommit> {
        if !self.config.include_merges && commit.message.starts_with("Merge ") {
            trace!(sha = %commit.short_hash, "skipping merge commit");
            return None;
        }

        let message = commit.full_message();
        let footers = commit
            .body
            .as_deref()
            .map(|body| self.parse_footers(body))
            .unwrap_or_default();

        let mut record = ConventionalCommit {
            sha: commit.hash.clone(),
            message: message.clone(),
            commit_type: UNKNOWN_TYPE.to_string(),
            scope: None,
            breaking: false,
            description: commit.message.clone(),
            touched_paths: commit.files.iter().cloned().collect(),
            references: extract_references(&message),
            author: commit.author.clone(),
            breaking_description: None,
            footers,
        };

        let Some(caps) = CONVENTIONAL_REGEX.captures(&commit.message) else {
            if !self.config.include_untyped {
                return None;
            }
            trace!(sha = %commit.short_hash, "non-conventional commit");
            return Some(record);
        };

        record.commit_type = caps.name("type")?.as_str().to_lowercase();
        record.scope = caps.name("scope").map(|m| m.as_str().to_string());
        record.description = caps.name("description")?.as_str().to_string();

        let footer_note = record
            .footers
            .iter()
            .find(|f| is_breaking_token(&f.token))
            .map(|f| f.value.clone());
        let marker = caps.name("breaking").is_some();
        record.breaking = marker || footer_note.is_some();
        record.breaking_description = match footer_note {
            Some(note) => Some(note),
            None if marker => Some(record.description.clone()),
            None => None,
        };

        Some(record)
    }
}
