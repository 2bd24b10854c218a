//! package.json handling

use std::sync::LazyLock;

use regex::Regex;
use semver::Version;
use shipwright_core::error::{Result, UpdaterError};

use crate::update::Updater;

/// First `"version": "..."` pair; package.json declares it at the top level
static VERSION_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<prefix>"version"\s*:\s*")(?P<version>[^"]*)(?P<suffix>")"#)
        .expect("Invalid regex")
});

/// Rewrites the version of a package.json, preserving its formatting
#[derive(Debug, Clone)]
pub struct PackageJsonUpdater {
    version: Version,
}

impl PackageJsonUpdater {
    pub fn new(version: &Version) -> Self {
        Self {
            version: version.clone(),
        }
    }
}

impl Updater for PackageJsonUpdater {
    fn name(&self) -> &'static str {
        "package-json"
    }

    fn update_content(&self, path: &str, content: Option<&str>) -> Result<String> {
        let content = content.ok_or_else(|| UpdaterError::MissingFile(path.to_string()))?;

        serde_json::from_str::<serde_json::Value>(content).map_err(|e| UpdaterError::ParseFailed {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        if !VERSION_FIELD.is_match(content) {
            return Err(UpdaterError::VersionNotFound(path.to_string()).into());
        }

        let replacement = format!("${{prefix}}{}${{suffix}}", self.version);
        Ok(VERSION_FIELD.replacen(content, 1, replacement.as_str()).into_owned())
    }
}

/// `name` field of a package.json
pub fn package_name(content: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    value.get("name")?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_formatting() {
        let original = "{\n  \"name\": \"web\",\n  \"version\": \"1.0.0\",\n  \"dependencies\": {\n    \"left-pad\": \"1.0.0\"\n  }\n}\n";
        let updated = PackageJsonUpdater::new(&Version::new(1, 1, 0))
            .update_content("package.json", Some(original))
            .unwrap();

        assert!(updated.contains("\"version\": \"1.1.0\""));
        assert!(updated.contains("\"left-pad\": \"1.0.0\""));
        assert!(updated.ends_with("}\n"));
    }

    #[test]
    fn test_missing_version_field() {
        let result = PackageJsonUpdater::new(&Version::new(1, 0, 0))
            .update_content("package.json", Some(r#"{"name": "web"}"#));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_json() {
        let result = PackageJsonUpdater::new(&Version::new(1, 0, 0))
            .update_content("package.json", Some("{"));
        assert!(result.is_err());
    }
}
