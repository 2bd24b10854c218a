//! Release notes generation

use chrono::NaiveDate;
use shipwright_core::config::{default_changelog_sections, ChangelogSection};
use tracing::{debug, instrument};

use crate::formatter::{ChangelogFormatter, MarkdownFormatter};
use crate::types::{ConventionalCommit, ReleaseNotes, Section};

/// Groups classified commits into configured changelog sections
pub struct ChangelogGenerator {
    sections: Vec<ChangelogSection>,
    formatter: Box<dyn ChangelogFormatter>,
}

impl ChangelogGenerator {
    /// Create a generator for the given section configuration
    pub fn new(sections: Vec<ChangelogSection>) -> Self {
        Self {
            sections,
            formatter: Box::new(MarkdownFormatter::new()),
        }
    }

    /// Use a custom formatter
    pub fn with_formatter<F: ChangelogFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Build release notes for `version` from the component's commits
    ///
    /// Sections follow configuration order; commits whose type has no visible
    /// section are left out, except that breaking changes are always listed.
    #[instrument(skip(self, commits), fields(commit_count = commits.len()))]
    pub fn generate(
        &self,
        version: &str,
        current_tag: &str,
        previous_tag: Option<&str>,
        date: NaiveDate,
        commits: &[ConventionalCommit],
    ) -> ReleaseNotes {
        let breaking_changes: Vec<_> = commits.iter().filter(|c| c.breaking).cloned().collect();

        let mut sections: Vec<Section> = Vec::new();
        for config in self.sections.iter().filter(|s| !s.hidden) {
            let matching = commits.iter().filter(|c| c.commit_type == config.commit_type).cloned();
            // Several types may share one section title
            match sections.iter_mut().find(|s| s.title == config.section) {
                Some(existing) => existing.commits.extend(matching),
                None => sections.push(Section {
                    title: config.section.clone(),
                    commits: matching.collect(),
                }),
            }
        }
        sections.retain(|s| !s.is_empty());

        debug!(
            section_count = sections.len(),
            breaking_count = breaking_changes.len(),
            "release notes sections built"
        );

        ReleaseNotes {
            version: version.to_string(),
            current_tag: current_tag.to_string(),
            previous_tag: previous_tag.map(str::to_string),
            date,
            breaking_changes,
            sections,
        }
    }

    /// Render release notes
    pub fn format(&self, notes: &ReleaseNotes) -> String {
        self.formatter.format(notes)
    }
}

impl Default for ChangelogGenerator {
    fn default() -> Self {
        Self::new(default_changelog_sections())
    }
}
