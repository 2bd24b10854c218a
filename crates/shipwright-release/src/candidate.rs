//! Release pull request candidates

use semver::Version;
use serde::Serialize;
use shipwright_changelog::ConventionalCommit;
use shipwright_core::{Component, ReleaseWarning};
use shipwright_git::BranchName;
use shipwright_updaters::UpdateSet;

use crate::body::PullRequestBody;
use crate::title::PullRequestTitle;

/// The release of one component carried by a candidate
#[derive(Debug, Clone)]
pub struct ComponentRelease {
    pub component: Component,
    pub version: Version,
    pub previous_version: Option<Version>,
    pub tag: String,
    pub previous_tag: Option<String>,
    /// Rendered changelog entry
    pub notes: String,
    /// Commits attributed to the component since its previous release
    pub commits: Vec<ConventionalCommit>,
}

impl ComponentRelease {
    /// Label used for body sections
    pub fn label(&self) -> String {
        self.component
            .name()
            .unwrap_or_else(|| self.component.path.clone())
    }
}

/// A proposed release pull request
#[derive(Debug, Clone)]
pub struct ReleaseCandidate {
    pub title: PullRequestTitle,
    pub body: PullRequestBody,
    pub head_branch: BranchName,
    pub releases: Vec<ComponentRelease>,
    pub draft: bool,
    pub group: Option<String>,
    pub labels: Vec<String>,
    pub updates: UpdateSet,
    pub warnings: Vec<ReleaseWarning>,
}

impl ReleaseCandidate {
    /// Version shared by every release, if they agree
    pub fn version(&self) -> Option<&Version> {
        let first = &self.releases.first()?.version;
        self.releases
            .iter()
            .all(|r| &r.version == first)
            .then_some(first)
    }

    /// Commits of every release, in release order
    pub fn conventional_commits(&self) -> Vec<&ConventionalCommit> {
        self.releases.iter().flat_map(|r| r.commits.iter()).collect()
    }

    /// Paths of the released components
    pub fn component_paths(&self) -> Vec<&str> {
        self.releases.iter().map(|r| r.component.path.as_str()).collect()
    }

    /// Whether `key` names one of the released components by name or path
    pub fn releases_component(&self, key: &str) -> bool {
        self.releases
            .iter()
            .any(|r| r.component.path == key || r.component.name().as_deref() == Some(key))
    }

    /// Serializable view for reports
    pub fn summary(&self) -> CandidateSummary {
        CandidateSummary {
            title: self.title.render(),
            head_branch: self.head_branch.to_string(),
            releases: self
                .releases
                .iter()
                .map(|r| ReleaseSummary {
                    component: r.component.path.clone(),
                    version: r.version.to_string(),
                    previous_version: r.previous_version.as_ref().map(Version::to_string),
                    tag: r.tag.clone(),
                    commits: r.commits.len(),
                })
                .collect(),
            draft: self.draft,
            group: self.group.clone(),
            labels: self.labels.clone(),
            files: self.updates.paths().into_iter().map(str::to_string).collect(),
            warnings: self.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Report view of a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSummary {
    pub title: String,
    pub head_branch: String,
    pub releases: Vec<ReleaseSummary>,
    pub draft: bool,
    pub group: Option<String>,
    pub labels: Vec<String>,
    pub files: Vec<String>,
    pub warnings: Vec<String>,
}

/// Report view of one component release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseSummary {
    pub component: String,
    pub version: String,
    pub previous_version: Option<String>,
    pub tag: String,
    pub commits: usize,
}
