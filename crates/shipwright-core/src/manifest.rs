//! Release manifest state
//!
//! The manifest is a JSON object mapping component paths to their last
//! released version. It is read once at the start of a run and never mutated
//! in place; new content is produced with [`ManifestState::with_versions`] and
//! staged as a file update.

use std::collections::BTreeMap;

use semver::Version;
use tracing::debug;

use crate::error::{ConfigError, Result, VersionError};
use crate::types::normalize_path;

/// Snapshot of last released versions keyed by component path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestState {
    versions: BTreeMap<String, Version>,
}

impl ManifestState {
    /// Empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse manifest JSON content
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: BTreeMap<String, String> =
            serde_json::from_str(content).map_err(ConfigError::JsonError)?;

        let mut versions = BTreeMap::new();
        for (path, version) in raw {
            let parsed = Version::parse(version.trim_start_matches('v'))
                .map_err(|e| VersionError::ParseFailed(version.clone(), e.to_string()))?;
            versions.insert(normalize_path(&path), parsed);
        }

        debug!(entries = versions.len(), "parsed release manifest");
        Ok(Self { versions })
    }

    /// Last released version of the component at `path`
    pub fn get(&self, path: &str) -> Option<&Version> {
        self.versions.get(&normalize_path(path))
    }

    /// Number of recorded components
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether the manifest has no entries
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Iterate over `(path, version)` entries in path order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Version)> {
        self.versions.iter()
    }

    /// A new manifest with one entry set
    pub fn with_version(&self, path: &str, version: Version) -> Self {
        let mut versions = self.versions.clone();
        versions.insert(normalize_path(path), version);
        Self { versions }
    }

    /// A new manifest with several entries set
    pub fn with_versions<'a>(&self, entries: impl IntoIterator<Item = (&'a str, Version)>) -> Self {
        entries
            .into_iter()
            .fold(self.clone(), |manifest, (path, version)| manifest.with_version(path, version))
    }

    /// Serialize as pretty JSON with a trailing newline
    pub fn to_json(&self) -> Result<String> {
        let raw: BTreeMap<&String, String> =
            self.versions.iter().map(|(path, v)| (path, v.to_string())).collect();
        let mut json = serde_json::to_string_pretty(&raw)?;
        json.push('\n');
        Ok(json)
    }
}
