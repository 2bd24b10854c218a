//! Updaters shared by every release type

use semver::Version;
use shipwright_core::error::Result;
use shipwright_core::ManifestState;

use crate::update::Updater;

/// Heading written to new changelog files
pub const CHANGELOG_HEADER: &str = "# Changelog";

/// Replaces a plain-text version file (`version.txt`)
#[derive(Debug, Clone)]
pub struct VersionFileUpdater {
    version: Version,
}

impl VersionFileUpdater {
    pub fn new(version: &Version) -> Self {
        Self {
            version: version.clone(),
        }
    }
}

impl Updater for VersionFileUpdater {
    fn name(&self) -> &'static str {
        "version-file"
    }

    fn update_content(&self, _path: &str, _content: Option<&str>) -> Result<String> {
        Ok(format!("{}\n", self.version))
    }
}

/// Inserts a release entry above earlier entries of a changelog
#[derive(Debug, Clone)]
pub struct ChangelogUpdater {
    entry: String,
}

impl ChangelogUpdater {
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            entry: entry.into().trim_end().to_string(),
        }
    }
}

impl Updater for ChangelogUpdater {
    fn name(&self) -> &'static str {
        "changelog"
    }

    fn update_content(&self, _path: &str, content: Option<&str>) -> Result<String> {
        let existing = content.unwrap_or_default();
        if existing.trim().is_empty() {
            return Ok(format!("{}\n\n{}\n", CHANGELOG_HEADER, self.entry));
        }

        // New entries go before the first release heading
        let first_entry = existing
            .match_indices("\n## ")
            .map(|(i, _)| i + 1)
            .next()
            .or_else(|| existing.starts_with("## ").then_some(0));

        Ok(match first_entry {
            Some(at) => format!("{}{}\n\n{}", &existing[..at], self.entry, &existing[at..]),
            None => format!("{}\n\n{}\n", existing.trim_end(), self.entry),
        })
    }
}

/// Sets component entries in the release manifest
#[derive(Debug, Clone)]
pub struct ManifestUpdater {
    entries: Vec<(String, Version)>,
}

impl ManifestUpdater {
    pub fn new(entries: Vec<(String, Version)>) -> Self {
        Self { entries }
    }
}

impl Updater for ManifestUpdater {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn update_content(&self, _path: &str, content: Option<&str>) -> Result<String> {
        let current = ManifestState::parse(content.unwrap_or_default())?;
        let next = current.with_versions(
            self.entries
                .iter()
                .map(|(path, version)| (path.as_str(), version.clone())),
        );
        next.to_json()
    }
}
