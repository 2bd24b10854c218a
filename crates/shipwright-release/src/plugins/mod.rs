//! Candidate transformation pipeline
//!
//! Each plugin consumes the whole candidate list and returns its replacement.
//! Plugins run in configured order; the first error aborts the pipeline.

mod group_title;
mod linked_versions;
mod merge;

use shipwright_core::config::{PluginConfig, PullRequestConfig};
use shipwright_core::error::Result;
use shipwright_core::RunContext;
use tracing::{debug, info, instrument};

use crate::builder::CandidateBuilder;
use crate::candidate::ReleaseCandidate;

pub use group_title::GroupTitlePlugin;
pub use linked_versions::LinkedVersionsPlugin;
pub use merge::MergePlugin;

/// Inputs shared by every plugin of a run
#[derive(Clone, Copy)]
pub struct PluginContext<'a> {
    pub builder: &'a CandidateBuilder,
}

impl PluginContext<'_> {
    pub fn run(&self) -> &RunContext {
        self.builder.run()
    }

    pub fn pull_request(&self) -> &PullRequestConfig {
        self.builder.pull_request()
    }
}

/// A transformation of the candidate list
pub trait ReleasePlugin: Send + Sync {
    /// Plugin type name
    fn name(&self) -> &'static str;

    /// Replace `candidates` with the transformed list
    fn run(&self, candidates: Vec<ReleaseCandidate>, ctx: &PluginContext<'_>) -> Result<Vec<ReleaseCandidate>>;
}

/// Ordered list of plugins
#[derive(Default)]
pub struct PluginPipeline {
    plugins: Vec<Box<dyn ReleasePlugin>>,
}

impl PluginPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline for the configured plugins, in configuration order
    pub fn from_config(plugins: &[PluginConfig]) -> Self {
        let mut pipeline = Self::new();
        for plugin in plugins {
            match plugin {
                PluginConfig::LinkedVersions(config) => pipeline.push(LinkedVersionsPlugin::new(config.clone())),
                PluginConfig::Merge(config) => pipeline.push(MergePlugin::new(config.clone())),
                PluginConfig::GroupTitle(config) => pipeline.push(GroupTitlePlugin::new(config.clone())),
            }
        }
        pipeline
    }

    /// Append a plugin
    pub fn push<P: ReleasePlugin + 'static>(&mut self, plugin: P) {
        self.plugins.push(Box::new(plugin));
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run every plugin over `candidates`
    #[instrument(skip_all, fields(plugins = self.plugins.len(), candidates = candidates.len()))]
    pub fn run(&self, mut candidates: Vec<ReleaseCandidate>, ctx: &PluginContext<'_>) -> Result<Vec<ReleaseCandidate>> {
        for plugin in &self.plugins {
            let before = candidates.len();
            candidates = plugin.run(candidates, ctx)?;
            debug!(plugin = plugin.name(), before, after = candidates.len(), "plugin applied");
        }
        info!(candidates = candidates.len(), "plugin pipeline complete");
        Ok(candidates)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use semver::Version;
    use shipwright_core::Component;

    use crate::builder::test_support::commit;
    use crate::builder::CandidateBuilder;
    use crate::candidate::ReleaseCandidate;

    /// Single-component candidate with one fix commit
    pub fn candidate(builder: &CandidateBuilder, path: &str, previous: &str, version: &str) -> ReleaseCandidate {
        let component = Component::new(path, "simple");
        let previous = Version::parse(previous).unwrap();
        builder
            .build(
                &component,
                Some(&previous),
                vec![commit(&format!("fix: change {}", path), path)],
                Version::parse(version).unwrap(),
                Vec::new(),
            )
            .unwrap()
    }
}
