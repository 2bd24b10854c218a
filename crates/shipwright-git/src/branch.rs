//! Release branch name codec
//!
//! Head branches of release pull requests encode which release they carry so
//! that later runs can find them again:
//!
//! | fields                       | branch                                                        |
//! |------------------------------|---------------------------------------------------------------|
//! | target                       | `shipwright--branches--{target}`                              |
//! | target, component            | `shipwright--branches--{target}--components--{component}`     |
//! | target, changes[, component] | `shipwright--branches--{target}--changes--{changes}[--components--{component}]` |
//! | target, group                | `shipwright--branches--{target}--groups--{group}`             |
//! | version                      | `release-v{version}`                                          |
//! | component, version           | `release-{component}-v{version}`                              |
//!
//! Formatting rejects field values that would make parsing ambiguous, so
//! `parse(format(b)) == b` holds for every name that formats.

use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

use shipwright_core::error::GitError;

use crate::repository::Result;

/// Prefix of every branch in the `--branches--` family
pub const BRANCH_PREFIX: &str = "shipwright--branches--";

const SEPARATOR: &str = "--";
const COMPONENTS: &str = "components";
const CHANGES: &str = "changes";
const GROUPS: &str = "groups";
const RELEASE_PREFIX: &str = "release-";

/// Structured head branch name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchName {
    pub component: Option<String>,
    pub target_branch: Option<String>,
    pub changes_branch: Option<String>,
    pub version: Option<Version>,
    pub group: Option<String>,
}

impl BranchName {
    /// Branch releasing into `target`
    pub fn for_target(target: impl Into<String>) -> Self {
        Self {
            target_branch: Some(target.into()),
            ..Self::default()
        }
    }

    /// Version-only release branch
    pub fn for_version(version: Version) -> Self {
        Self {
            version: Some(version),
            ..Self::default()
        }
    }

    /// Scope the branch to a component
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Scope the branch to a changes branch
    pub fn with_changes_branch(mut self, changes: impl Into<String>) -> Self {
        self.changes_branch = Some(changes.into());
        self
    }

    /// Scope the branch to a group
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Encode into a git branch name
    pub fn format(&self) -> Result<String> {
        match (
            &self.target_branch,
            &self.component,
            &self.changes_branch,
            &self.version,
            &self.group,
        ) {
            (Some(target), component, changes, None, None) => {
                check_segment("target_branch", target)?;
                let mut name = format!("{}{}", BRANCH_PREFIX, target);
                if let Some(changes) = changes {
                    check_segment("changes_branch", changes)?;
                    name.push_str(&format!("{SEPARATOR}{CHANGES}{SEPARATOR}{changes}"));
                }
                if let Some(component) = component {
                    check_segment("component", component)?;
                    name.push_str(&format!("{SEPARATOR}{COMPONENTS}{SEPARATOR}{component}"));
                }
                Ok(name)
            }
            (Some(target), None, None, None, Some(group)) => {
                check_segment("target_branch", target)?;
                check_segment("group", group)?;
                Ok(format!("{BRANCH_PREFIX}{target}{SEPARATOR}{GROUPS}{SEPARATOR}{group}"))
            }
            (None, None, None, Some(version), None) => Ok(format!("{RELEASE_PREFIX}v{version}")),
            (None, Some(component), None, Some(version), None) => {
                check_release_component(component)?;
                Ok(format!("{RELEASE_PREFIX}{component}-v{version}"))
            }
            _ => Err(GitError::InvalidBranchName {
                field: "branch".to_string(),
                message: format!("unsupported field combination: {:?}", self),
            }),
        }
    }

    /// Decode a branch name; `None` when it is not a release branch
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(rest) = name.strip_prefix(BRANCH_PREFIX) {
            return parse_branches_family(rest);
        }
        if let Some(rest) = name.strip_prefix(RELEASE_PREFIX) {
            return parse_release_family(rest);
        }
        None
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format() {
            Ok(name) => f.write_str(&name),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

fn parse_branches_family(rest: &str) -> Option<BranchName> {
    let mut parts = rest.split(SEPARATOR);
    let target = parts.next().filter(|t| !t.is_empty())?;
    let mut branch = BranchName::for_target(target);

    while let Some(key) = parts.next() {
        let value = parts.next().filter(|v| !v.is_empty())?.to_string();
        let slot = match key {
            COMPONENTS => &mut branch.component,
            CHANGES => &mut branch.changes_branch,
            GROUPS => &mut branch.group,
            _ => return None,
        };
        if slot.replace(value).is_some() {
            return None;
        }
    }

    // Only accept names this codec would produce itself
    match branch.format() {
        Ok(canonical) if canonical == format!("{}{}", BRANCH_PREFIX, rest) => Some(branch),
        _ => None,
    }
}

fn parse_release_family(rest: &str) -> Option<BranchName> {
    if let Some(version) = rest.strip_prefix('v').and_then(|v| Version::parse(v).ok()) {
        return Some(BranchName::for_version(version));
    }

    let split = version_marker(rest)?;
    let component = &rest[..split];
    let version = Version::parse(&rest[split + 2..]).ok()?;
    if component.is_empty() {
        return None;
    }
    Some(BranchName::for_version(version).with_component(component))
}

/// Byte offset of the leftmost `-v<digit>` in `value`
fn version_marker(value: &str) -> Option<usize> {
    value
        .match_indices("-v")
        .map(|(i, _)| i)
        .find(|&i| value[i + 2..].starts_with(|c: char| c.is_ascii_digit()))
}

fn invalid(field: &str, message: impl Into<String>) -> GitError {
    GitError::InvalidBranchName {
        field: field.to_string(),
        message: message.into(),
    }
}

fn check_segment(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid(field, "cannot be empty"));
    }
    if value.contains(SEPARATOR) {
        return Err(invalid(field, format!("'{}' contains '{}'", value, SEPARATOR)));
    }
    if value.starts_with('-') || value.ends_with('-') {
        return Err(invalid(field, format!("'{}' starts or ends with '-'", value)));
    }
    Ok(())
}

fn check_release_component(component: &str) -> Result<()> {
    if component.is_empty() {
        return Err(invalid("component", "cannot be empty"));
    }
    if version_marker(component).is_some() {
        return Err(invalid(
            "component",
            format!("'{}' contains a '-v<version>' marker", component),
        ));
    }
    if component.starts_with('v') && component[1..].starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid("component", format!("'{}' reads as a version", component)));
    }
    Ok(())
}
