//! Cargo.toml handling

use semver::Version;
use shipwright_core::error::{Result, UpdaterError};
use toml_edit::{value, DocumentMut};

use crate::update::Updater;

fn parse(path: &str, content: &str) -> Result<DocumentMut> {
    content.parse().map_err(|e: toml_edit::TomlError| {
        UpdaterError::ParseFailed {
            path: path.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Rewrites the crate version (preserves formatting using toml_edit)
///
/// A crate inheriting `version.workspace = true` has the version of the
/// `[workspace.package]` table in the same manifest updated instead.
#[derive(Debug, Clone)]
pub struct CargoTomlUpdater {
    version: Version,
}

impl CargoTomlUpdater {
    pub fn new(version: &Version) -> Self {
        Self {
            version: version.clone(),
        }
    }
}

impl Updater for CargoTomlUpdater {
    fn name(&self) -> &'static str {
        "cargo-toml"
    }

    fn update_content(&self, path: &str, content: Option<&str>) -> Result<String> {
        let content = content.ok_or_else(|| UpdaterError::MissingFile(path.to_string()))?;
        let mut doc = parse(path, content)?;
        let version = self.version.to_string();

        let package_version = doc
            .get_mut("package")
            .and_then(|p| p.as_table_like_mut())
            .and_then(|t| t.get_mut("version"));
        if let Some(item) = package_version {
            if item.is_str() {
                *item = value(version);
                return Ok(doc.to_string());
            }
        }

        let workspace_version = doc
            .get_mut("workspace")
            .and_then(|w| w.get_mut("package"))
            .and_then(|p| p.as_table_like_mut())
            .and_then(|t| t.get_mut("version"));
        match workspace_version {
            Some(item) if item.is_str() => {
                *item = value(version);
                Ok(doc.to_string())
            }
            _ => Err(UpdaterError::VersionNotFound(path.to_string()).into()),
        }
    }
}

/// `[package].name` of a Cargo.toml
pub fn crate_name(content: &str) -> Option<String> {
    let doc: DocumentMut = content.parse().ok()?;
    doc.get("package")?.get("name")?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_version_preserves_formatting() {
        let original = r#"[package]
name = "test-crate"
version = "1.0.0"
edition = "2021"

# This is a comment

[dependencies]
serde = "1.0"
"#;

        let updated = CargoTomlUpdater::new(&Version::new(2, 0, 0))
            .update_content("Cargo.toml", Some(original))
            .unwrap();

        assert!(updated.contains("version = \"2.0.0\""));
        assert!(updated.contains("# This is a comment"));
        assert!(updated.contains("serde = \"1.0\""));
    }

    #[test]
    fn test_workspace_inherited_version() {
        let original = r#"[workspace.package]
version = "0.3.0"

[package]
name = "root"
version.workspace = true
"#;

        let updated = CargoTomlUpdater::new(&Version::new(0, 4, 0))
            .update_content("Cargo.toml", Some(original))
            .unwrap();

        assert!(updated.contains("version = \"0.4.0\""));
        assert!(updated.contains("version.workspace = true"));
    }

    #[test]
    fn test_missing_version() {
        let result = CargoTomlUpdater::new(&Version::new(1, 0, 0))
            .update_content("Cargo.toml", Some("[workspace]\nmembers = []\n"));
        assert!(result.is_err());
    }

    #[test]
    fn test_crate_name() {
        assert_eq!(
            crate_name("[package]\nname = \"core\"\nversion = \"1.0.0\"\n"),
            Some("core".to_string())
        );
        assert_eq!(crate_name("[workspace]\n"), None);
    }
}
