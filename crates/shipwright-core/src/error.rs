//! Error types for Shipwright

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ShipwrightError
pub type Result<T> = std::result::Result<T, ShipwrightError>;

/// Main error type for Shipwright operations
#[derive(Debug, Error)]
pub enum ShipwrightError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Version-related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// File updater errors
    #[error(transparent)]
    Updater(#[from] UpdaterError),

    /// Plugin pipeline errors
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Repository gateway errors
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// An error scoped to a single component of a repository
    #[error("{repository} [{component}]: {source}")]
    Component {
        repository: String,
        component: String,
        #[source]
        source: Box<ShipwrightError>,
    },

    /// A run-level failure of a repository
    #[error("{repository}: {source}")]
    Repository {
        repository: String,
        #[source]
        source: Box<ShipwrightError>,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// No release strategy registered for the release type
    #[error("Unknown release type '{release_type}' for component '{component}'")]
    UnknownReleaseType {
        component: String,
        release_type: String,
    },

    /// A file the release strategy cannot work without is absent
    #[error("Missing required file '{path}' for component '{component}'")]
    MissingRequiredFile { component: String, path: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Revision could not be resolved
    #[error("Revision not found: {0}")]
    RevisionNotFound(String),

    /// Branch name could not be encoded
    #[error("Invalid branch name field {field}: {message}")]
    InvalidBranchName { field: String, message: String },

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Version-related errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Failed to parse version
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, String),

    /// Invalid version format
    #[error("Invalid version format: {0}")]
    InvalidFormat(String),

    /// Unknown versioning strategy
    #[error("Unknown versioning strategy: {0}")]
    UnknownStrategy(String),

    /// Version does not advance past the previous release
    #[error("Version {version} for '{component}' is not greater than previous release {previous}")]
    Regression {
        component: String,
        version: String,
        previous: String,
    },

    /// Semver error
    #[error("Semver error: {0}")]
    Semver(#[from] semver::Error),
}

/// File updater errors
#[derive(Debug, Error)]
pub enum UpdaterError {
    /// File content could not be parsed by the updater
    #[error("Failed to parse {path}: {message}")]
    ParseFailed { path: String, message: String },

    /// The version field could not be located
    #[error("No version field found in {0}")]
    VersionNotFound(String),

    /// The file is required but does not exist
    #[error("File {0} does not exist and cannot be created")]
    MissingFile(String),

    /// Two updates declared for the same path in one update set
    #[error("Duplicate update for {path} in {component}")]
    DuplicatePath { component: String, path: String },
}

/// Plugin pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Two merged candidates update the same file
    #[error("Merge conflict on {path}: updated by both '{first}' and '{second}'")]
    MergeConflict {
        path: String,
        first: String,
        second: String,
    },
}

/// Repository gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A gateway request failed
    #[error("{operation} failed: {message}")]
    RequestFailed { operation: String, message: String },

    /// The requested object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The gateway does not support the operation
    #[error("Operation not supported: {0}")]
    Unsupported(String),
}

impl ShipwrightError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Attach repository and component identity to an error
    pub fn for_component(self, repository: impl Into<String>, component: impl Into<String>) -> Self {
        match self {
            already @ Self::Component { .. } => already,
            other => Self::Component {
                repository: repository.into(),
                component: component.into(),
                source: Box::new(other),
            },
        }
    }

    /// Attach repository identity to an error that ends a run
    ///
    /// Component errors already name their repository and are left as is.
    pub fn for_repository(self, repository: impl Into<String>) -> Self {
        match self {
            already @ (Self::Component { .. } | Self::Repository { .. }) => already,
            other => Self::Repository {
                repository: repository.into(),
                source: Box::new(other),
            },
        }
    }

    /// The error with repository and component wrappers removed
    pub fn root_cause(&self) -> &ShipwrightError {
        match self {
            Self::Component { source, .. } | Self::Repository { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether the failure is isolated to one component's candidate
    ///
    /// Configuration, version and updater failures only abort the
    /// component being built; pipeline and gateway failures abort the run.
    pub fn is_component_scoped(&self) -> bool {
        match self {
            Self::Config(_) | Self::Version(_) | Self::Updater(_) => true,
            Self::Component { source, .. } => source.is_component_scoped(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_context_in_message() {
        let err = ShipwrightError::from(ConfigError::MissingRequiredFile {
            component: "packages/a".to_string(),
            path: "packages/a/package.json".to_string(),
        })
        .for_component("acme/widgets", "packages/a");

        let message = err.to_string();
        assert!(message.contains("acme/widgets"));
        assert!(message.contains("packages/a/package.json"));
        assert!(err.is_component_scoped());
    }

    #[test]
    fn test_for_component_does_not_nest() {
        let err = ShipwrightError::other("boom")
            .for_component("acme/widgets", "a")
            .for_component("acme/widgets", "b");

        match err {
            ShipwrightError::Component { component, .. } => assert_eq!(component, "a"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_run_errors_name_repository() {
        let err = ShipwrightError::from(GatewayError::NotFound("pull request 7".to_string()))
            .for_repository("acme/widgets")
            .for_repository("acme/other");

        assert_eq!(err.to_string(), "acme/widgets: Not found: pull request 7");
        assert!(!err.is_component_scoped());
        assert!(matches!(err.root_cause(), ShipwrightError::Gateway(GatewayError::NotFound(_))));
    }

    #[test]
    fn test_pipeline_errors_abort_run() {
        let err = ShipwrightError::from(PipelineError::MergeConflict {
            path: "CHANGELOG.md".to_string(),
            first: "a".to_string(),
            second: "b".to_string(),
        });
        assert!(!err.is_component_scoped());
        assert!(err.to_string().contains("'a'"));
        assert!(err.to_string().contains("'b'"));
    }
}
