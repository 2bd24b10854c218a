//! Default configuration values

use super::types::Config;

/// Default configuration file name (JSON)
pub const DEFAULT_CONFIG_JSON: &str = "shipwright-config.json";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "shipwright.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "shipwright.toml";

/// Default release manifest file
pub const DEFAULT_MANIFEST_FILE: &str = ".shipwright-manifest.json";

/// Default pull request title pattern
pub const DEFAULT_TITLE_PATTERN: &str = "chore${scope}: release${component} ${version}";

/// Default title pattern for merged pull requests
pub const DEFAULT_MERGED_TITLE_PATTERN: &str = "chore${scope}: release ${branch}";

/// Default title pattern for pull requests of a linked group
pub const DEFAULT_GROUP_TITLE_PATTERN: &str = "chore${scope}: release ${branch} ${version}";

/// Label applied to pending release pull requests
pub const DEFAULT_PENDING_LABEL: &str = "autorelease: pending";

/// Label signalling a manually chosen version
pub const DEFAULT_CUSTOM_VERSION_LABEL: &str = "autorelease: custom version";

/// Body size above which release notes move to a side file
pub const DEFAULT_OVERFLOW_THRESHOLD: usize = 60_000;

/// Default pull request body header
pub const DEFAULT_HEADER: &str = ":ship: A release is ready to go out.";

/// Default pull request body footer
pub const DEFAULT_FOOTER: &str = "This pull request is maintained by Shipwright. \
Merge it to publish the release; squash merging is recommended so the release \
lands as a single commit. Edit the title and add the `autorelease: custom version` \
label to choose a different version.";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_JSON,
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ".shipwright-config.json",
    ]
}

/// Generate default configuration JSON
pub fn default_config_json() -> String {
    let config = Config::default();
    serde_json::to_string_pretty(&config).unwrap_or_else(|_| DEFAULT_CONFIG_TEMPLATE.to_string())
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"{
  "release-type": "simple",
  "target-branch": "main",
  "bump-minor-pre-major": true,
  "pull-request": {
    "title-pattern": "chore${scope}: release${component} ${version}",
    "labels": ["autorelease: pending"]
  },
  "packages": {}
}
"#;
