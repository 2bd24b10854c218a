//! Pull request title codec
//!
//! Titles are rendered from a pattern with `${scope}`, `${component}`,
//! `${version}` and `${branch}` placeholders and parsed back with a regex
//! derived from the same pattern.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;
use serde::Serialize;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(scope|component|version|branch)\}").expect("Invalid regex"));

/// Structured release pull request title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestTitle {
    pattern: String,
    /// Rendered as `(target)` in place of `${scope}`
    pub target_branch: Option<String>,
    /// Rendered as ` component` in place of `${component}`
    pub component: Option<String>,
    pub version: Option<Version>,
    pub branch: Option<String>,
}

impl PullRequestTitle {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            target_branch: None,
            component: None,
            version: None,
            branch: None,
        }
    }

    pub fn with_target_branch(mut self, target: impl Into<String>) -> Self {
        self.target_branch = Some(target.into());
        self
    }

    pub fn with_component(mut self, component: Option<String>) -> Self {
        self.component = component;
        self
    }

    pub fn with_version(mut self, version: Option<Version>) -> Self {
        self.version = version;
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the pattern carries a version
    pub fn has_version(&self) -> bool {
        self.pattern.contains("${version}")
    }

    pub fn render(&self) -> String {
        PLACEHOLDER
            .replace_all(&self.pattern, |caps: &regex::Captures<'_>| match &caps[1] {
                "scope" => self
                    .target_branch
                    .as_ref()
                    .map(|t| format!("({})", t))
                    .unwrap_or_default(),
                "component" => self
                    .component
                    .as_ref()
                    .map(|c| format!(" {}", c))
                    .unwrap_or_default(),
                "version" => self.version.as_ref().map(Version::to_string).unwrap_or_default(),
                _ => self.branch.clone().unwrap_or_default(),
            })
            .into_owned()
    }

    /// Parse `title` as a rendering of `pattern`
    ///
    /// Returns `None` when the title does not match. A placeholder used more
    /// than once in the pattern makes every title unparseable.
    pub fn parse(pattern: &str, title: &str) -> Option<Self> {
        let regex = Regex::new(&title_regex(pattern)).ok()?;
        let caps = regex.captures(title)?;
        let text = |name: &str| caps.name(name).map(|m| m.as_str().to_string());

        let version = match caps.name("version") {
            Some(m) => Some(Version::parse(m.as_str()).ok()?),
            None => None,
        };

        Some(Self {
            pattern: pattern.to_string(),
            target_branch: text("scope"),
            component: text("component"),
            version,
            branch: text("branch"),
        })
    }
}

impl fmt::Display for PullRequestTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn title_regex(pattern: &str) -> String {
    let mut regex = String::from("^");
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(pattern) {
        let Some(whole) = caps.get(0) else { continue };
        regex.push_str(&regex::escape(&pattern[last..whole.start()]));
        regex.push_str(match &caps[1] {
            "scope" => r"(?:\((?P<scope>[^()]+)\))?",
            "component" => r"(?: (?P<component>\S+))?",
            "version" => r"(?:v?(?P<version>\d+\.\d+\.\d+(?:[-+][0-9A-Za-z.+-]*)?))?",
            _ => r"(?P<branch>\S+)?",
        });
        last = whole.end();
    }
    regex.push_str(&regex::escape(&pattern[last..]));
    regex.push('$');
    regex
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipwright_core::config::{DEFAULT_GROUP_TITLE_PATTERN, DEFAULT_MERGED_TITLE_PATTERN, DEFAULT_TITLE_PATTERN};

    fn round_trip(title: PullRequestTitle) -> String {
        let rendered = title.render();
        assert_eq!(
            PullRequestTitle::parse(title.pattern(), &rendered),
            Some(title),
            "round trip of {rendered}"
        );
        rendered
    }

    #[test]
    fn test_default_pattern() {
        let title = PullRequestTitle::new(DEFAULT_TITLE_PATTERN)
            .with_target_branch("main")
            .with_version(Some(Version::new(1, 2, 3)));
        assert_eq!(round_trip(title), "chore(main): release 1.2.3");
    }

    #[test]
    fn test_with_component() {
        let title = PullRequestTitle::new(DEFAULT_TITLE_PATTERN)
            .with_target_branch("main")
            .with_component(Some("@acme/widget".to_string()))
            .with_version(Some(Version::parse("6.7.9-alpha.1").unwrap()));
        assert_eq!(round_trip(title), "chore(main): release @acme/widget 6.7.9-alpha.1");
    }

    #[test]
    fn test_without_scope() {
        let title = PullRequestTitle::new(DEFAULT_TITLE_PATTERN).with_version(Some(Version::new(0, 0, 1)));
        assert_eq!(round_trip(title), "chore: release 0.0.1");
    }

    #[test]
    fn test_merged_and_group_patterns() {
        let merged = PullRequestTitle::new(DEFAULT_MERGED_TITLE_PATTERN)
            .with_target_branch("main")
            .with_branch("main");
        assert_eq!(round_trip(merged), "chore(main): release main");

        let group = PullRequestTitle::new(DEFAULT_GROUP_TITLE_PATTERN)
            .with_target_branch("main")
            .with_branch("sdk")
            .with_version(Some(Version::new(2, 0, 0)));
        assert_eq!(round_trip(group), "chore(main): release sdk 2.0.0");
    }

    #[test]
    fn test_parse_accepts_v_prefix() {
        let parsed = PullRequestTitle::parse(DEFAULT_TITLE_PATTERN, "chore(main): release v1.0.0").unwrap();
        assert_eq!(parsed.version, Some(Version::new(1, 0, 0)));
    }

    #[test]
    fn test_parse_rejects_foreign_titles() {
        assert_eq!(PullRequestTitle::parse(DEFAULT_TITLE_PATTERN, "fix: something"), None);
        assert_eq!(
            PullRequestTitle::parse(DEFAULT_TITLE_PATTERN, "chore(main): release core banana"),
            None
        );
        assert_eq!(
            PullRequestTitle::parse("${version} ${version}", "1.0.0 1.0.0"),
            None
        );
    }

    #[test]
    fn test_parse_custom_pattern_with_special_characters() {
        let pattern = "release[${branch}]: ${version}?";
        let title = PullRequestTitle::new(pattern)
            .with_branch("next")
            .with_version(Some(Version::new(3, 1, 0)));
        assert_eq!(round_trip(title), "release[next]: 3.1.0?");
    }
}
