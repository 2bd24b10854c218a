//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::Config;
use super::validation::validate_config;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Parse configuration content in the format implied by `path`
pub fn parse_config(path: &Path, content: &str) -> Result<Config> {
    let config: Config = match ConfigFormat::from_path(path) {
        ConfigFormat::Json => serde_json::from_str(content).map_err(ConfigError::JsonError)?,
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(ConfigError::YamlError)?,
        ConfigFormat::Toml => toml::from_str(content).map_err(ConfigError::TomlError)?,
    };
    Ok(config)
}

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    let format = ConfigFormat::from_path(path);
    info!(path = %path.display(), format = ?format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config = parse_config(path, &content)?;

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find configuration file in directory or parent directories.
///
/// At each directory level the search checks:
///   1. `<dir>/<name>`          (e.g. `shipwright-config.json`)
///   2. `<dir>/.github/<name>`  (e.g. `.github/shipwright-config.json`)
///
/// The first match wins. Parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.exists() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }

            let github_path = current.join(".github").join(name);
            if github_path.exists() {
                info!(path = %github_path.display(), "found config file in .github/");
                return Some(github_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration from directory (searching parent directories)
pub fn load_config_from_dir(dir: &Path) -> Result<(Config, PathBuf)> {
    let config_path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;

    let config = load_config(&config_path)?;
    Ok((config, config_path))
}

/// Load configuration or use defaults
pub fn load_config_or_default(dir: &Path) -> (Config, Option<PathBuf>) {
    match load_config_from_dir(dir) {
        Ok((config, path)) => (config, Some(path)),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "no usable config found, using defaults");
            (Config::default(), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_json() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("shipwright-config.json");
        std::fs::write(&config_path, r#"{"release-type": "simple"}"#).unwrap();

        let found = find_config(temp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_prefers_json_over_yaml() {
        let temp = TempDir::new().unwrap();
        let json_path = temp.path().join("shipwright-config.json");
        let yaml_path = temp.path().join("shipwright.yaml");
        std::fs::write(&json_path, r#"{"release-type": "simple"}"#).unwrap();
        std::fs::write(&yaml_path, "release-type: simple\n").unwrap();

        let found = find_config(temp.path()).unwrap();
        assert_eq!(found, json_path);
    }

    #[test]
    fn test_find_config_in_github_dir() {
        let temp = TempDir::new().unwrap();
        let github_dir = temp.path().join(".github");
        std::fs::create_dir_all(&github_dir).unwrap();
        let config_path = github_dir.join("shipwright-config.json");
        std::fs::write(&config_path, r#"{"release-type": "simple"}"#).unwrap();

        assert_eq!(find_config(temp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("shipwright-config.json");
        std::fs::write(&config_path, r#"{"release-type": "simple"}"#).unwrap();
        let nested = temp.path().join("packages").join("a");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config(&nested), Some(config_path));
    }

    #[test]
    fn test_load_config_json() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("shipwright-config.json");
        std::fs::write(
            &config_path,
            r#"{"release-type": "node", "target-branch": "develop", "packages": {"packages/a": {}}}"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.target_branch, "develop");
        assert_eq!(config.packages.len(), 1);
    }

    #[test]
    fn test_load_config_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("shipwright.yaml");
        std::fs::write(
            &config_path,
            "release-type: rust\npull-request:\n  overflow-threshold: 100\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.defaults.release_type.as_deref(), Some("rust"));
        assert_eq!(config.pull_request.overflow_threshold, 100);
    }

    #[test]
    fn test_load_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("shipwright.toml");
        std::fs::write(
            &config_path,
            "release-type = \"python\"\n\n[packages.\"libs/core\"]\ncomponent = \"core\"\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        let components = config.components().unwrap();
        assert_eq!(components[0].path, "libs/core");
        assert_eq!(components[0].release_type, "python");
    }

    #[test]
    fn test_load_invalid_config_fails_validation() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("shipwright-config.json");
        std::fs::write(&config_path, r#"{"release-type": "node", "target-branch": ""}"#).unwrap();

        assert!(load_config(&config_path).is_err());
    }
}
