//! Configuration types

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use chrono::NaiveDate;

use crate::error::{ConfigError, Result};
use crate::types::{normalize_path, Component, RunContext, ROOT_PATH};

use super::defaults::{
    DEFAULT_CUSTOM_VERSION_LABEL, DEFAULT_MANIFEST_FILE, DEFAULT_OVERFLOW_THRESHOLD,
    DEFAULT_PENDING_LABEL, DEFAULT_TITLE_PATTERN,
};

/// Main configuration for Shipwright
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Version of the config schema
    #[serde(rename = "$schema")]
    pub schema: Option<String>,

    /// Repository identity (e.g. `owner/name`)
    pub repository: Option<String>,

    /// Base URL used for commit, compare and issue links
    pub repository_url: Option<String>,

    /// Branch releases are proposed against
    pub target_branch: String,

    /// Path of the release manifest file
    pub manifest_path: String,

    /// Defaults inherited by every package
    #[serde(flatten)]
    pub defaults: PackageConfig,

    /// Pull request configuration
    pub pull_request: PullRequestConfig,

    /// Changelog sections, in rendering order
    pub changelog_sections: Vec<ChangelogSection>,

    /// Plugins, applied in order
    pub plugins: Vec<PluginConfig>,

    /// Package configurations keyed by path, in configuration order
    pub packages: Packages,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: None,
            repository: None,
            repository_url: None,
            target_branch: "main".to_string(),
            manifest_path: DEFAULT_MANIFEST_FILE.to_string(),
            defaults: PackageConfig::default(),
            pull_request: PullRequestConfig::default(),
            changelog_sections: default_changelog_sections(),
            plugins: Vec::new(),
            packages: Packages::default(),
        }
    }
}

impl Config {
    /// Repository identity, or a placeholder when unset
    pub fn repository_name(&self) -> &str {
        self.repository.as_deref().unwrap_or("repository")
    }

    /// Context of a run releasing on `release_date`
    pub fn run_context(&self, release_date: NaiveDate) -> RunContext {
        let run = RunContext::new(self.repository_name(), &self.target_branch, release_date);
        match &self.repository_url {
            Some(url) => run.with_repository_url(url.clone()),
            None => run,
        }
    }

    /// Resolve configured packages into components
    ///
    /// A configuration without packages describes a single root component.
    /// Package entries inherit every unset field from the root defaults.
    pub fn components(&self) -> Result<Vec<Component>> {
        if self.packages.is_empty() {
            return Ok(vec![self.defaults.resolve(ROOT_PATH, &PackageConfig::default())?]);
        }

        self.packages
            .iter()
            .map(|(path, package)| package.resolve(path, &self.defaults))
            .collect()
    }
}

/// Package entries in the order they appear in the configuration file
///
/// Plugins see candidates in this order, so it is never sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packages(Vec<(String, PackageConfig)>);

impl Packages {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PackageConfig)> {
        self.0.iter().map(|(path, package)| (path, package))
    }

    pub fn get(&self, path: &str) -> Option<&PackageConfig> {
        self.0.iter().find(|(key, _)| key == path).map(|(_, package)| package)
    }

    /// Add or replace the entry for `path`, keeping its position if present
    pub fn insert(&mut self, path: impl Into<String>, package: PackageConfig) {
        let path = path.into();
        match self.0.iter_mut().find(|(key, _)| *key == path) {
            Some(entry) => entry.1 = package,
            None => self.0.push((path, package)),
        }
    }
}

impl Serialize for Packages {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (path, package) in &self.0 {
            map.serialize_entry(path, package)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Packages {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PackagesVisitor;

        impl<'de> Visitor<'de> for PackagesVisitor {
            type Value = Packages;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of package paths to package configuration")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Packages, A::Error> {
                let mut packages = Packages::default();
                while let Some((path, package)) = access.next_entry::<String, PackageConfig>()? {
                    packages.insert(path, package);
                }
                Ok(packages)
            }
        }

        deserializer.deserialize_map(PackagesVisitor)
    }
}

/// Package-level configuration; every field may be inherited from the root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PackageConfig {
    /// Ecosystem identifier (simple, node, rust, python, ...)
    pub release_type: Option<String>,
    /// Package name
    pub package_name: Option<String>,
    /// Component name for tags and branches
    pub component: Option<String>,
    /// Namespace tags and branches by component
    pub include_component_in_tag: Option<bool>,
    /// Prefix versions in tags with `v`
    pub include_v_in_tag: Option<bool>,
    /// Separator between component and version in tags
    pub tag_separator: Option<String>,
    /// Versioning strategy
    pub versioning: Option<String>,
    /// Breaking changes bump minor before 1.0
    pub bump_minor_pre_major: Option<bool>,
    /// Features bump patch before 1.0
    pub bump_patch_for_minor_pre_major: Option<bool>,
    /// Force the next version
    pub release_as: Option<String>,
    /// Pre-release label
    pub prerelease: Option<String>,
    /// Version used for the first release
    pub initial_version: Option<String>,
    /// Open the pull request as a draft
    pub draft: Option<bool>,
    /// Changelog path relative to the package
    pub changelog_path: Option<String>,
    /// Package-relative paths to ignore when attributing commits
    pub exclude_paths: Option<Vec<String>>,
    /// Do not write a changelog file
    pub skip_changelog: Option<bool>,
}

impl PackageConfig {
    /// Resolve this entry over `defaults` into a component at `path`
    pub fn resolve(&self, path: &str, defaults: &PackageConfig) -> Result<Component> {
        let path = normalize_path(path);
        let release_type = self
            .release_type
            .clone()
            .or_else(|| defaults.release_type.clone())
            .ok_or_else(|| {
                if path == ROOT_PATH {
                    ConfigError::MissingField("release-type".to_string())
                } else {
                    ConfigError::MissingField(format!("packages.{}.release-type", path))
                }
            })?;

        let mut component = Component::new(path, release_type);

        component.package_name = self.package_name.clone().or_else(|| defaults.package_name.clone());
        component.component = self.component.clone().or_else(|| defaults.component.clone());
        if let Some(include) = self.include_component_in_tag.or(defaults.include_component_in_tag) {
            component.include_component_in_tag = include;
        } else if component.is_root() {
            component.include_component_in_tag = false;
        }
        if let Some(include_v) = self.include_v_in_tag.or(defaults.include_v_in_tag) {
            component.include_v_in_tag = include_v;
        }
        if let Some(separator) = self.tag_separator.clone().or_else(|| defaults.tag_separator.clone()) {
            component.tag_separator = separator;
        }
        if let Some(versioning) = self.versioning.clone().or_else(|| defaults.versioning.clone()) {
            component.versioning = versioning;
        }
        component.bump_minor_pre_major = self
            .bump_minor_pre_major
            .or(defaults.bump_minor_pre_major)
            .unwrap_or(false);
        component.bump_patch_for_minor_pre_major = self
            .bump_patch_for_minor_pre_major
            .or(defaults.bump_patch_for_minor_pre_major)
            .unwrap_or(false);
        // release-as only applies to the entry that sets it
        component.release_as = self.release_as.clone();
        component.prerelease = self.prerelease.clone().or_else(|| defaults.prerelease.clone());
        if let Some(initial) = self.initial_version.clone().or_else(|| defaults.initial_version.clone()) {
            component.initial_version = initial;
        }
        component.draft = self.draft.or(defaults.draft).unwrap_or(false);
        if let Some(changelog) = self.changelog_path.clone().or_else(|| defaults.changelog_path.clone()) {
            component.changelog_path = changelog;
        }
        component.exclude_paths = self
            .exclude_paths
            .clone()
            .or_else(|| defaults.exclude_paths.clone())
            .unwrap_or_default();
        component.skip_changelog = self.skip_changelog.or(defaults.skip_changelog).unwrap_or(false);

        Ok(component)
    }
}

/// Pull request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PullRequestConfig {
    /// Title pattern with `${scope}`, `${component}`, `${version}`, `${branch}`
    pub title_pattern: String,

    /// Header placed above the release sections
    pub header: String,

    /// Footer appended below the release sections
    pub footer: String,

    /// Labels applied to release pull requests
    pub labels: Vec<String>,

    /// Label marking a manually chosen version in the title
    pub custom_version_label: String,

    /// Body length above which notes are moved to a side file
    pub overflow_threshold: usize,

    /// What to do when an override does not advance the version
    pub override_regression_policy: RegressionPolicy,
}

impl Default for PullRequestConfig {
    fn default() -> Self {
        Self {
            title_pattern: DEFAULT_TITLE_PATTERN.to_string(),
            header: super::defaults::DEFAULT_HEADER.to_string(),
            footer: super::defaults::DEFAULT_FOOTER.to_string(),
            labels: vec![DEFAULT_PENDING_LABEL.to_string()],
            custom_version_label: DEFAULT_CUSTOM_VERSION_LABEL.to_string(),
            overflow_threshold: DEFAULT_OVERFLOW_THRESHOLD,
            override_regression_policy: RegressionPolicy::Warn,
        }
    }
}

/// Policy for override versions that do not exceed the previous release
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegressionPolicy {
    /// Warn through a pull request comment and proceed
    #[default]
    Warn,
    /// Refuse to propose the release
    Block,
}

/// Changelog section for a commit type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogSection {
    /// Conventional commit type
    #[serde(rename = "type")]
    pub commit_type: String,
    /// Section header in the changelog
    pub section: String,
    /// Whether to hide this type from the changelog
    #[serde(default)]
    pub hidden: bool,
}

impl ChangelogSection {
    /// Create a visible section
    pub fn new(commit_type: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            commit_type: commit_type.into(),
            section: section.into(),
            hidden: false,
        }
    }

    /// Create a hidden section
    pub fn hidden(commit_type: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            hidden: true,
            ..Self::new(commit_type, section)
        }
    }
}

/// Default changelog sections
pub fn default_changelog_sections() -> Vec<ChangelogSection> {
    vec![
        ChangelogSection::new("feat", "Features"),
        ChangelogSection::new("fix", "Bug Fixes"),
        ChangelogSection::new("perf", "Performance Improvements"),
        ChangelogSection::new("revert", "Reverts"),
        ChangelogSection::hidden("docs", "Documentation"),
        ChangelogSection::hidden("style", "Styles"),
        ChangelogSection::hidden("chore", "Miscellaneous Chores"),
        ChangelogSection::hidden("refactor", "Code Refactoring"),
        ChangelogSection::hidden("test", "Tests"),
        ChangelogSection::hidden("build", "Build System"),
        ChangelogSection::hidden("ci", "Continuous Integration"),
    ]
}

/// Plugin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PluginConfig {
    /// Force a set of components to share one version
    LinkedVersions(LinkedVersionsConfig),
    /// Combine candidates into one pull request
    Merge(MergeConfig),
    /// Share body sections between candidates of a group
    GroupTitle(GroupTitleConfig),
}

impl PluginConfig {
    /// Plugin type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::LinkedVersions(_) => "linked-versions",
            Self::Merge(_) => "merge",
            Self::GroupTitle(_) => "group-title",
        }
    }
}

/// Linked versions plugin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinkedVersionsConfig {
    /// Group name, used as group key
    pub group_name: String,
    /// Member component names or paths
    pub components: Vec<String>,
}

/// Merge plugin configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MergeConfig {
    /// Title pattern for the merged pull request
    pub title_pattern: Option<String>,
    /// Which head branch the merged pull request uses
    pub head_branch: HeadBranchStrategy,
    /// Later candidates win on conflicting file updates
    pub force_merge: bool,
    /// Only merge candidates of this group
    pub group: Option<String>,
}

/// Head branch choice for merged pull requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadBranchStrategy {
    /// A dedicated branch shared by all merged components
    #[default]
    Shared,
    /// Reuse the first input candidate's branch
    First,
}

/// Group title plugin configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GroupTitleConfig {
    /// Title pattern for grouped pull requests
    pub title_pattern: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_root_requires_release_type() {
        let config = Config::default();
        assert!(config.components().is_err());
    }

    #[test]
    fn test_root_component_from_defaults() {
        let config: Config = serde_json::from_str(r#"{"release-type": "simple"}"#).unwrap();
        let components = config.components().unwrap();

        assert_eq!(components.len(), 1);
        assert!(components[0].is_root());
        assert_eq!(components[0].release_type, "simple");
        assert!(!components[0].include_component_in_tag);
    }

    #[test]
    fn test_packages_inherit_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "release-type": "node",
                "bump-minor-pre-major": true,
                "packages": {
                    "packages/a": {},
                    "packages/b": {"release-type": "rust", "component": "bee"}
                }
            }"#,
        )
        .unwrap();

        let components = config.components().unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].path, "packages/a");
        assert_eq!(components[0].release_type, "node");
        assert!(components[0].bump_minor_pre_major);
        assert_eq!(components[1].release_type, "rust");
        assert_eq!(components[1].name(), Some("bee".to_string()));
        assert!(components[1].include_component_in_tag);
    }

    #[test]
    fn test_packages_keep_configuration_order() {
        let config: Config = serde_json::from_str(
            r#"{"release-type": "node", "packages": {"zeta": {}, "alpha": {}, "mid": {"component": "m"}}}"#,
        )
        .unwrap();
        let paths: Vec<String> = config.components().unwrap().into_iter().map(|c| c.path).collect();
        assert_eq!(paths, vec!["zeta", "alpha", "mid"]);

        let yaml: Config = serde_yaml::from_str("release-type: node
packages:
  zeta: {}
  alpha: {}
").unwrap();
        let keys: Vec<&String> = yaml.packages.iter().map(|(path, _)| path).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);

        let toml: Config =
            toml::from_str("release-type = \"node\"\n\n[packages.zeta]\n\n[packages.alpha]\n").unwrap();
        let keys: Vec<&String> = toml.packages.iter().map(|(path, _)| path).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(toml.packages.get("alpha"), Some(&PackageConfig::default()));
    }

    #[test]
    fn test_release_as_not_inherited() {
        let config: Config = serde_json::from_str(
            r#"{"release-type": "node", "release-as": "2.0.0", "packages": {"a": {}}}"#,
        )
        .unwrap();
        let components = config.components().unwrap();
        assert_eq!(components[0].release_as, None);
    }

    #[test]
    fn test_plugin_config_parsing() {
        let config: Config = serde_json::from_str(
            r#"{
                "release-type": "node",
                "plugins": [
                    {"type": "linked-versions", "group-name": "sdk", "components": ["a", "b"]},
                    {"type": "merge", "force-merge": true},
                    {"type": "group-title"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.plugins.len(), 3);
        assert_eq!(config.plugins[0].type_name(), "linked-versions");
        match &config.plugins[1] {
            PluginConfig::Merge(merge) => {
                assert!(merge.force_merge);
                assert_eq!(merge.head_branch, HeadBranchStrategy::Shared);
            }
            other => panic!("unexpected plugin: {other:?}"),
        }
    }

    #[test]
    fn test_run_context() {
        let config: Config = serde_json::from_str(
            r#"{"release-type": "simple", "repository": "acme/widgets", "repository-url": "https://github.com/acme/widgets/"}"#,
        )
        .unwrap();
        let run = config.run_context(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(run.repository, "acme/widgets");
        assert_eq!(run.target_branch, "main");
        assert_eq!(run.repository_url.as_deref(), Some("https://github.com/acme/widgets"));
    }

    #[test]
    fn test_pull_request_defaults() {
        let config = Config::default();
        assert_eq!(config.pull_request.title_pattern, DEFAULT_TITLE_PATTERN);
        assert_eq!(config.pull_request.override_regression_policy, RegressionPolicy::Warn);
        assert!(config.changelog_sections.iter().any(|s| s.commit_type == "fix" && !s.hidden));
    }
}
