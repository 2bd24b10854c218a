//! Release strategy registry

use std::sync::Arc;

use shipwright_core::error::{ConfigError, Result};
use shipwright_core::Component;
use tracing::debug;

use crate::cargo::RustStrategy;
use crate::npm::NodeStrategy;
use crate::python::PythonStrategy;
use crate::simple::SimpleStrategy;
use crate::traits::ReleaseStrategy;

/// Registry of release strategies keyed by release type
pub struct UpdaterRegistry {
    strategies: Vec<Arc<dyn ReleaseStrategy>>,
}

impl UpdaterRegistry {
    /// Create a new registry with all built-in release types
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Arc::new(SimpleStrategy::new()),
                Arc::new(NodeStrategy::new()),
                Arc::new(RustStrategy::new()),
                Arc::new(PythonStrategy::new()),
            ],
        }
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Register a strategy; a later registration shadows an earlier one
    pub fn register<S: ReleaseStrategy + 'static>(&mut self, strategy: S) {
        self.strategies.insert(0, Arc::new(strategy));
    }

    /// Get strategy by release type
    pub fn get(&self, release_type: &str) -> Option<Arc<dyn ReleaseStrategy>> {
        self.strategies
            .iter()
            .find(|s| s.release_type() == release_type)
            .cloned()
    }

    /// Strategy for a component, or an unknown release type error
    pub fn require(&self, component: &Component) -> Result<Arc<dyn ReleaseStrategy>> {
        let strategy = self.get(&component.release_type).ok_or_else(|| ConfigError::UnknownReleaseType {
            component: component.path.clone(),
            release_type: component.release_type.clone(),
        })?;
        debug!(component = %component.path, release_type = strategy.release_type(), "resolved release strategy");
        Ok(strategy)
    }

    /// Registered release types
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.release_type()).collect()
    }
}

impl Default for UpdaterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StrategyContext;
    use crate::update::FileUpdate;

    struct Docs;

    impl ReleaseStrategy for Docs {
        fn release_type(&self) -> &'static str {
            "simple"
        }

        fn build_updates(&self, _ctx: &StrategyContext<'_>) -> Result<Vec<FileUpdate>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_builtin_release_types() {
        let registry = UpdaterRegistry::new();
        assert_eq!(registry.names(), vec!["simple", "node", "rust", "python"]);
        assert!(registry.get("node").is_some());
        assert!(registry.get("go").is_none());
    }

    #[test]
    fn test_require_unknown_release_type() {
        let registry = UpdaterRegistry::new();
        let component = Component::new("services/api", "cobol");

        let err = registry.require(&component).err().unwrap();
        assert!(err.to_string().contains("cobol"));
        assert!(err.is_component_scoped());
    }

    #[test]
    fn test_register_shadows_builtin() {
        let mut registry = UpdaterRegistry::new();
        registry.register(Docs);

        let strategy = registry.require(&Component::new(".", "simple")).unwrap();
        let version = semver::Version::new(1, 0, 0);
        let component = Component::new(".", "simple");
        let ctx = StrategyContext {
            component: &component,
            version: &version,
            previous_version: None,
            changelog_entry: "",
        };
        assert!(strategy.build_updates(&ctx).unwrap().is_empty());
    }
}
