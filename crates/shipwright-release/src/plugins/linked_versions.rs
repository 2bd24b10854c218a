//! Linked versions: a named set of components released at one version

use shipwright_core::config::LinkedVersionsConfig;
use shipwright_core::error::Result;
use tracing::{debug, info};

use super::{PluginContext, ReleasePlugin};
use crate::candidate::ReleaseCandidate;

/// Raises every present member of the group to the highest member version
pub struct LinkedVersionsPlugin {
    config: LinkedVersionsConfig,
}

impl LinkedVersionsPlugin {
    pub fn new(config: LinkedVersionsConfig) -> Self {
        Self { config }
    }

    fn is_member(&self, candidate: &ReleaseCandidate) -> bool {
        candidate.releases.len() == 1
            && self
                .config
                .components
                .iter()
                .any(|key| candidate.releases_component(key))
    }
}

impl ReleasePlugin for LinkedVersionsPlugin {
    fn name(&self) -> &'static str {
        "linked-versions"
    }

    fn run(&self, candidates: Vec<ReleaseCandidate>, ctx: &PluginContext<'_>) -> Result<Vec<ReleaseCandidate>> {
        let Some(target) = candidates
            .iter()
            .filter(|c| self.is_member(c))
            .filter_map(|c| c.version())
            .max()
            .cloned()
        else {
            debug!(group = %self.config.group_name, "no group member has a release");
            return Ok(candidates);
        };

        info!(group = %self.config.group_name, version = %target, "linking group versions");
        candidates
            .into_iter()
            .map(|candidate| {
                if !self.is_member(&candidate) {
                    return Ok(candidate);
                }
                let mut linked = if candidate.version() == Some(&target) {
                    candidate
                } else {
                    debug!(components = ?candidate.component_paths(), version = %target, "raising linked member");
                    ctx.builder.rebuild_with_version(&candidate, target.clone())?
                };
                linked.group = Some(self.config.group_name.clone());
                Ok(linked)
            })
            .collect()
    }
}
