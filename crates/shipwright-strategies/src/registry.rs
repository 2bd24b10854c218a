//! Versioning strategy registry

use std::sync::Arc;

use shipwright_core::error::{Result, VersionError};
use tracing::debug;

use crate::always::AlwaysBumpStrategy;
use crate::default::DefaultStrategy;
use crate::traits::VersioningStrategy;

/// Registry of available versioning strategies
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn VersioningStrategy>>,
}

impl StrategyRegistry {
    /// Create a new registry with all built-in strategies
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Arc::new(DefaultStrategy::new()),
                Arc::new(AlwaysBumpStrategy::patch()),
                Arc::new(AlwaysBumpStrategy::minor()),
                Arc::new(AlwaysBumpStrategy::major()),
            ],
        }
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Register a strategy
    pub fn register<S: VersioningStrategy + 'static>(&mut self, strategy: S) {
        self.strategies.push(Arc::new(strategy));
    }

    /// Get strategy by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn VersioningStrategy>> {
        let result = self.strategies.iter().find(|s| s.name() == name).cloned();
        debug!(strategy = name, found = result.is_some(), "strategy registry lookup");
        result
    }

    /// Get strategy by name or fail
    pub fn require(&self, name: &str) -> Result<Arc<dyn VersioningStrategy>> {
        self.get(name)
            .ok_or_else(|| VersionError::UnknownStrategy(name.to_string()).into())
    }

    /// Get strategy names
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
