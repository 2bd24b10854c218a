//! pyproject.toml handling

use semver::Version;
use shipwright_core::error::{Result, UpdaterError};
use toml_edit::{value, DocumentMut, Item};

use crate::update::Updater;

/// `[project]` (PEP 621) first, then `[tool.poetry]`
fn project_table<'a>(doc: &'a mut DocumentMut) -> Option<&'a mut Item> {
    if doc.get("project").and_then(|p| p.get("version")).is_some() {
        return doc.get_mut("project");
    }
    doc.get_mut("tool")?.get_mut("poetry")
}

/// Rewrites the project version of a pyproject.toml
#[derive(Debug, Clone)]
pub struct PyProjectUpdater {
    version: Version,
}

impl PyProjectUpdater {
    pub fn new(version: &Version) -> Self {
        Self {
            version: version.clone(),
        }
    }
}

impl Updater for PyProjectUpdater {
    fn name(&self) -> &'static str {
        "pyproject"
    }

    fn update_content(&self, path: &str, content: Option<&str>) -> Result<String> {
        let content = content.ok_or_else(|| UpdaterError::MissingFile(path.to_string()))?;
        let mut doc: DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| UpdaterError::ParseFailed {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let slot = project_table(&mut doc)
            .and_then(|t| t.as_table_like_mut())
            .and_then(|t| t.get_mut("version"))
            .filter(|item| item.is_str());
        match slot {
            Some(item) => {
                *item = value(self.version.to_string());
                Ok(doc.to_string())
            }
            None => Err(UpdaterError::VersionNotFound(path.to_string()).into()),
        }
    }
}

/// Project name from `[project]` or `[tool.poetry]`
pub fn project_name(content: &str) -> Option<String> {
    let doc: DocumentMut = content.parse().ok()?;
    doc.get("project")
        .and_then(|p| p.get("name"))
        .or_else(|| doc.get("tool")?.get("poetry")?.get("name"))
        .and_then(|n| n.as_str())
        .map(str::to_string)
}
