//! Next-version calculation for a component

use semver::Version;
use serde::Serialize;
use shipwright_changelog::ConventionalCommit;
use shipwright_core::error::{ConfigError, Result};
use shipwright_core::{Component, ReleaseWarning};
use tracing::{debug, info, instrument};

use crate::registry::StrategyRegistry;
use crate::types::BumpType;
use crate::version::{bump, next_prerelease, parse_version, with_prerelease};

/// Result of a version calculation that produces a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionOutcome {
    /// Version to release
    pub version: Version,
    /// Bump that produced it
    pub bump: BumpType,
    /// Non-fatal problems, such as a forced version that regresses
    pub warnings: Vec<ReleaseWarning>,
}

/// Computes the next version of a component from its commits
pub struct VersionCalculator {
    registry: StrategyRegistry,
}

impl VersionCalculator {
    /// Calculator using the built-in strategies
    pub fn new() -> Self {
        Self::with_registry(StrategyRegistry::new())
    }

    /// Calculator using a custom strategy registry
    pub fn with_registry(registry: StrategyRegistry) -> Self {
        Self { registry }
    }

    /// Next version of `component`, or `None` when nothing warrants a release
    #[instrument(skip(self, component, commits), fields(component = %component.path, commits = commits.len()))]
    pub fn calculate(
        &self,
        component: &Component,
        previous: Option<&Version>,
        commits: &[ConventionalCommit],
    ) -> Result<Option<VersionOutcome>> {
        let strategy = self.registry.require(&component.versioning)?;
        let computed = strategy.determine_bump(commits, previous, component);

        if let Some(raw) = &component.release_as {
            return self.forced(component, previous, raw, computed).map(Some);
        }

        if !computed.is_release() {
            debug!("no releasable commits");
            return Ok(None);
        }

        let Some(previous) = previous else {
            let mut version = parse_version(&component.initial_version).map_err(|e| ConfigError::InvalidValue {
                field: "initial-version".to_string(),
                message: e.to_string(),
            })?;
            // An explicit pre-release in initial-version is kept as written
            if let (Some(label), true) = (&component.prerelease, version.pre.is_empty()) {
                version = with_prerelease(&version, label)?;
            }
            info!(version = %version, "first release of component");
            return Ok(Some(VersionOutcome {
                version,
                bump: computed,
                warnings: Vec::new(),
            }));
        };

        let (version, applied) = match &component.prerelease {
            Some(label) => match next_prerelease(previous, label) {
                Some(next) => (next, BumpType::Prerelease),
                None => {
                    let core = bump(&Version::new(previous.major, previous.minor, previous.patch), computed);
                    (with_prerelease(&core, label)?, computed)
                }
            },
            None => (bump(previous, computed), computed),
        };

        info!(previous = %previous, version = %version, bump = %applied, "calculated next version");
        Ok(Some(VersionOutcome {
            version,
            bump: applied,
            warnings: Vec::new(),
        }))
    }

    fn forced(
        &self,
        component: &Component,
        previous: Option<&Version>,
        raw: &str,
        computed: BumpType,
    ) -> Result<VersionOutcome> {
        let version = parse_version(raw).map_err(|e| ConfigError::InvalidValue {
            field: format!("packages.{}.release-as", component.path),
            message: e.to_string(),
        })?;

        let mut warnings = Vec::new();
        if let Some(previous) = previous.filter(|p| version <= **p) {
            warnings.push(ReleaseWarning::VersionRegression {
                component: component.name().unwrap_or_else(|| component.path.clone()),
                version: version.to_string(),
                previous: previous.to_string(),
            });
        }

        info!(version = %version, regression = !warnings.is_empty(), "using release-as version");
        Ok(VersionOutcome {
            version,
            bump: computed,
            warnings,
        })
    }
}

impl Default for VersionCalculator {
    fn default() -> Self {
        Self::new()
    }
}
