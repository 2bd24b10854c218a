//! Configuration validation

use std::collections::HashSet;

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::{Config, PluginConfig};

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_repository(config)?;
    validate_pull_request(config)?;
    validate_packages(config)?;
    validate_plugins(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
}

fn validate_repository(config: &Config) -> Result<()> {
    if config.target_branch.is_empty() {
        return Err(invalid("target-branch", "target branch cannot be empty").into());
    }

    if let Some(url) = &config.repository_url {
        url::Url::parse(url).map_err(|e| invalid("repository-url", e.to_string()))?;
    }

    if config.manifest_path.is_empty() {
        return Err(invalid("manifest-path", "manifest path cannot be empty").into());
    }

    Ok(())
}

fn validate_pull_request(config: &Config) -> Result<()> {
    let pr = &config.pull_request;
    if !pr.title_pattern.contains("${version}") {
        return Err(invalid(
            "pull-request.title-pattern",
            "must contain ${version} placeholder",
        )
        .into());
    }

    if pr.overflow_threshold == 0 {
        return Err(invalid("pull-request.overflow-threshold", "must be greater than 0").into());
    }

    if pr.custom_version_label.is_empty() {
        return Err(invalid("pull-request.custom-version-label", "label cannot be empty").into());
    }

    Ok(())
}

fn validate_packages(config: &Config) -> Result<()> {
    if !config.packages.is_empty() {
        debug!(count = config.packages.len(), "validating packages");
    }

    let components = config.components()?;
    let mut paths = HashSet::new();
    let mut tag_names = HashSet::new();

    for component in &components {
        if !paths.insert(component.path.clone()) {
            return Err(invalid(
                format!("packages.{}", component.path),
                "package path is configured more than once",
            )
            .into());
        }

        if component.include_component_in_tag {
            match component.name() {
                Some(name) if !tag_names.insert(name.clone()) => {
                    return Err(invalid(
                        format!("packages.{}.component", component.path),
                        format!("component name '{}' is used by another package", name),
                    )
                    .into());
                }
                Some(_) => {}
                None => {
                    return Err(invalid(
                        format!("packages.{}.component", component.path),
                        "include-component-in-tag requires a component or package name",
                    )
                    .into());
                }
            }
        }

        for (field, value) in [
            ("release-as", component.release_as.as_deref()),
            ("initial-version", Some(component.initial_version.as_str())),
        ] {
            if let Some(value) = value {
                semver::Version::parse(value).map_err(|e| {
                    invalid(format!("packages.{}.{}", component.path, field), e.to_string())
                })?;
            }
        }
    }

    Ok(())
}

fn validate_plugins(config: &Config) -> Result<()> {
    for (i, plugin) in config.plugins.iter().enumerate() {
        if let PluginConfig::LinkedVersions(linked) = plugin {
            if linked.group_name.is_empty() {
                return Err(invalid(format!("plugins[{}].group-name", i), "cannot be empty").into());
            }
            if linked.components.is_empty() {
                return Err(invalid(
                    format!("plugins[{}].components", i),
                    "linked versions need at least one component",
                )
                .into());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: &str) -> Config {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_validate_minimal_config() {
        assert!(validate_config(&config(r#"{"release-type": "simple"}"#)).is_ok());
    }

    #[test]
    fn test_validate_missing_release_type() {
        assert!(validate_config(&Config::default()).is_err());
    }

    #[test]
    fn test_validate_title_pattern_requires_version() {
        let cfg = config(r#"{"release-type": "simple", "pull-request": {"title-pattern": "release"}}"#);
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_validate_duplicate_component_names() {
        let cfg = config(
            r#"{"release-type": "node", "packages": {
                "a": {"component": "same"},
                "b": {"component": "same"}
            }}"#,
        );
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_validate_duplicate_normalized_paths() {
        let cfg = config(r#"{"release-type": "node", "packages": {"a": {}, "./a/": {}}}"#);
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_validate_bad_release_as() {
        let cfg = config(r#"{"release-type": "node", "packages": {"a": {"release-as": "one"}}}"#);
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_validate_bad_repository_url() {
        let cfg = config(r#"{"release-type": "node", "repository-url": "not a url"}"#);
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_validate_empty_linked_group() {
        let cfg = config(
            r#"{"release-type": "node", "plugins": [{"type": "linked-versions", "group-name": "g", "components": []}]}"#,
        );
        assert!(validate_config(&cfg).is_err());
    }
}
