//! Markdown release notes formatter

use tracing::{debug, instrument};

use super::ChangelogFormatter;
use crate::types::{ConventionalCommit, ReleaseNotes};

/// Markdown release notes formatter
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormatter {
    /// Repository URL for commit, compare and issue links
    pub repo_url: Option<String>,
}

impl MarkdownFormatter {
    /// Create a new markdown formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Set repository URL for links
    pub fn with_repo_url(mut self, url: impl Into<String>) -> Self {
        self.repo_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    fn heading(&self, notes: &ReleaseNotes) -> String {
        let date = notes.date.format("%Y-%m-%d");
        match (&self.repo_url, &notes.previous_tag) {
            (Some(url), Some(previous)) => format!(
                "## [{}]({}/compare/{}...{}) ({})",
                notes.version, url, previous, notes.current_tag, date
            ),
            (Some(url), None) => format!(
                "## [{}]({}/releases/tag/{}) ({})",
                notes.version, url, notes.current_tag, date
            ),
            (None, _) => format!("## {} ({})", notes.version, date),
        }
    }

    fn bullet(&self, commit: &ConventionalCommit, text: &str) -> String {
        let mut line = String::from("* ");
        if let Some(scope) = &commit.scope {
            line.push_str(&format!("**{}:** ", scope));
        }
        line.push_str(text);

        match &self.repo_url {
            Some(url) => line.push_str(&format!(
                " ([{}]({}/commit/{}))",
                commit.short_sha(),
                url,
                commit.sha
            )),
            None => line.push_str(&format!(" ({})", commit.short_sha())),
        }

        if !commit.references.is_empty() {
            let refs: Vec<String> = commit
                .references
                .iter()
                .map(|n| match &self.repo_url {
                    Some(url) => format!("[#{}]({}/issues/{})", n, url, n),
                    None => format!("#{}", n),
                })
                .collect();
            line.push_str(&format!(", closes {}", refs.join(" ")));
        }

        line
    }
}

impl ChangelogFormatter for MarkdownFormatter {
    #[instrument(skip(self, notes), fields(version = %notes.version, section_count = notes.sections.len()))]
    fn format(&self, notes: &ReleaseNotes) -> String {
        let mut output = self.heading(notes);
        output.push('\n');

        if !notes.breaking_changes.is_empty() {
            output.push_str("\n\n### ⚠ BREAKING CHANGES\n\n");
            for commit in &notes.breaking_changes {
                let text = commit
                    .breaking_description
                    .as_deref()
                    .unwrap_or(&commit.description);
                output.push_str(&self.bullet(commit, text));
                output.push('\n');
            }
        }

        for section in notes.sections.iter().filter(|s| !s.is_empty()) {
            output.push_str(&format!("\n\n### {}\n\n", section.title));
            for commit in &section.commits {
                output.push_str(&self.bullet(commit, &commit.description));
                output.push('\n');
            }
        }

        debug!(output_len = output.len(), "markdown release notes formatted");
        output
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}
