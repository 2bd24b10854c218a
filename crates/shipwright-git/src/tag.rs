//! Release tag name codec
//!
//! Tags are `{component}{separator}v{version}` for namespaced components and
//! `v{version}` otherwise; the `v` is optional.

use std::fmt;

use semver::Version;

/// A parsed or to-be-created release tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagName {
    pub component: Option<String>,
    pub version: Version,
    pub separator: String,
    pub include_v: bool,
}

impl TagName {
    /// Tag for `version`, optionally namespaced by `component`
    pub fn new(version: Version, component: Option<String>, separator: impl Into<String>, include_v: bool) -> Self {
        Self {
            component,
            version,
            separator: separator.into(),
            include_v,
        }
    }

    /// Parse `tag` as a release of `component` using `separator`
    ///
    /// Returns `None` when the tag belongs to another component or does not
    /// end in a version. A `v` before the version is accepted either way.
    pub fn parse_for(tag: &str, component: Option<&str>, separator: &str) -> Option<Self> {
        let rest = match component {
            Some(name) => tag.strip_prefix(name)?.strip_prefix(separator)?,
            None => tag,
        };
        let (include_v, raw) = match rest.strip_prefix('v') {
            Some(raw) => (true, raw),
            None => (false, rest),
        };
        let version = Version::parse(raw).ok()?;

        Some(Self {
            component: component.map(str::to_string),
            version,
            separator: separator.to_string(),
            include_v,
        })
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(component) = &self.component {
            write!(f, "{}{}", component, self.separator)?;
        }
        if self.include_v {
            f.write_str("v")?;
        }
        write!(f, "{}", self.version)
    }
}
