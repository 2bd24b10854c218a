//! Core types for Shipwright

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Path of the component rooted at the repository root
pub const ROOT_PATH: &str = ".";

/// A releasable unit within a repository
///
/// Components are resolved from configuration once per run and never change
/// afterwards. Identity is the repository-relative `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Repository-relative root (`.` for the repository root)
    pub path: String,
    /// Package name as published
    pub package_name: Option<String>,
    /// Explicit component name used in tags and branches
    pub component: Option<String>,
    /// Ecosystem identifier selecting the release strategy
    pub release_type: String,
    /// Whether tags and branches are namespaced per component
    pub include_component_in_tag: bool,
    /// Whether tags carry a `v` before the version
    pub include_v_in_tag: bool,
    /// Separator between component and version in tags
    pub tag_separator: String,
    /// Versioning strategy name
    pub versioning: String,
    /// Breaking changes bump minor while major is 0
    pub bump_minor_pre_major: bool,
    /// Features bump patch while major is 0
    pub bump_patch_for_minor_pre_major: bool,
    /// Explicit version to release instead of the computed one
    pub release_as: Option<String>,
    /// Pre-release label (e.g. `beta`); enables pre-release mode
    pub prerelease: Option<String>,
    /// Version used when the component has never been released
    pub initial_version: String,
    /// Whether the release pull request is opened as a draft
    pub draft: bool,
    /// Changelog path relative to the component root
    pub changelog_path: String,
    /// Paths (relative to the component) whose commits are ignored
    pub exclude_paths: Vec<String>,
    /// Skip writing the changelog file
    pub skip_changelog: bool,
}

impl Component {
    /// Create a component with default policy for the given path and release type
    pub fn new(path: impl Into<String>, release_type: impl Into<String>) -> Self {
        Self {
            path: normalize_path(&path.into()),
            package_name: None,
            component: None,
            release_type: release_type.into(),
            include_component_in_tag: true,
            include_v_in_tag: true,
            tag_separator: "-".to_string(),
            versioning: "default".to_string(),
            bump_minor_pre_major: false,
            bump_patch_for_minor_pre_major: false,
            release_as: None,
            prerelease: None,
            initial_version: "0.0.1".to_string(),
            draft: false,
            changelog_path: "CHANGELOG.md".to_string(),
            exclude_paths: Vec::new(),
            skip_changelog: false,
        }
    }

    /// Set the package name
    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    /// Set the explicit component name
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Set whether the component is included in tags and branch names
    pub fn with_component_in_tag(mut self, include: bool) -> Self {
        self.include_component_in_tag = include;
        self
    }

    /// Whether this component is the repository root
    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }

    /// Name used in tags, branches, titles and body sections
    ///
    /// Falls back from the explicit component name to the package name, then to
    /// the last path segment. The root component without names has none.
    pub fn name(&self) -> Option<String> {
        if let Some(component) = &self.component {
            return Some(component.clone());
        }
        if let Some(package) = &self.package_name {
            // Scoped npm packages: "@scope/name" -> "name"
            let short = package.rsplit('/').next().unwrap_or(package);
            return Some(short.to_string());
        }
        if self.is_root() {
            return None;
        }
        self.path.rsplit('/').next().map(str::to_string)
    }

    /// Component name used in tags and branches, if namespacing is enabled
    pub fn tag_component(&self) -> Option<String> {
        if self.include_component_in_tag {
            self.name()
        } else {
            None
        }
    }

    /// Resolve a component-relative path to a repository-relative one
    pub fn file_path(&self, relative: &str) -> String {
        if self.is_root() {
            relative.to_string()
        } else {
            format!("{}/{}", self.path, relative)
        }
    }

    /// Whether a repository-relative file lies under this component's path
    pub fn contains(&self, file: &str) -> bool {
        self.is_root()
            || file == self.path
            || file
                .strip_prefix(&self.path)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Number of path segments below the repository root
    pub fn depth(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.path.split('/').count()
        }
    }

    /// Whether a repository-relative file belongs to this component
    ///
    /// Only checks this component's path and exclusions; use [`owner_of`] to
    /// settle files claimed by nested components.
    pub fn owns_file(&self, file: &str) -> bool {
        self.contains(file)
            && !self.exclude_paths.iter().any(|excluded| {
                let excluded = self.file_path(excluded.trim_end_matches('/'));
                file == excluded || file.starts_with(&format!("{}/", excluded))
            })
    }
}

/// The component a repository-relative file is attributed to
///
/// The deepest component containing the file wins, so the root only receives
/// files no other component claims.
pub fn owner_of<'c>(components: &'c [Component], file: &str) -> Option<&'c Component> {
    components
        .iter()
        .filter(|component| component.contains(file))
        .max_by_key(|component| component.depth())
}

/// Normalize a configured component path (`./a/` -> `a`, `` -> `.`)
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_start_matches("./").trim_matches('/');
    if trimmed.is_empty() || trimmed == "." {
        ROOT_PATH.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Explicit per-run context threaded through the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    /// Repository identity (e.g. `owner/name`)
    pub repository: String,
    /// Base URL for commit, compare and issue links
    pub repository_url: Option<String>,
    /// Branch releases are proposed against
    pub target_branch: String,
    /// Release date stamped into changelog entries
    pub release_date: NaiveDate,
}

impl RunContext {
    /// Create a context for a repository and target branch
    pub fn new(repository: impl Into<String>, target_branch: impl Into<String>, release_date: NaiveDate) -> Self {
        Self {
            repository: repository.into(),
            repository_url: None,
            target_branch: target_branch.into(),
            release_date,
        }
    }

    /// Set the repository URL used for links
    pub fn with_repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }
}

/// A non-fatal problem carried with a candidate and surfaced to reviewers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ReleaseWarning {
    /// A forced version does not advance past the previous release
    VersionRegression {
        component: String,
        version: String,
        previous: String,
    },
}

impl ReleaseWarning {
    /// Component the warning is about
    pub fn component(&self) -> &str {
        match self {
            Self::VersionRegression { component, .. } => component,
        }
    }
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionRegression {
                component,
                version,
                previous,
            } => write!(
                f,
                "{}: version {} is not greater than the previous release {}",
                component, version, previous
            ),
        }
    }
}
