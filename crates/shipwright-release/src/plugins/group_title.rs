//! Group title: members of a group share one body and a group title

use std::collections::BTreeMap;

use shipwright_core::config::{GroupTitleConfig, DEFAULT_GROUP_TITLE_PATTERN};
use shipwright_core::error::Result;
use tracing::debug;

use super::{PluginContext, ReleasePlugin};
use crate::body::BodySection;
use crate::candidate::ReleaseCandidate;
use crate::title::PullRequestTitle;

/// Gives every candidate of a group the sections of all members
///
/// Candidates keep their own branches and updates.
pub struct GroupTitlePlugin {
    config: GroupTitleConfig,
}

impl GroupTitlePlugin {
    pub fn new(config: GroupTitleConfig) -> Self {
        Self { config }
    }
}

impl ReleasePlugin for GroupTitlePlugin {
    fn name(&self) -> &'static str {
        "group-title"
    }

    fn run(&self, mut candidates: Vec<ReleaseCandidate>, ctx: &PluginContext<'_>) -> Result<Vec<ReleaseCandidate>> {
        let mut groups: BTreeMap<String, Vec<BodySection>> = BTreeMap::new();
        for candidate in &candidates {
            if let Some(group) = &candidate.group {
                groups
                    .entry(group.clone())
                    .or_default()
                    .extend(candidate.body.sections.iter().cloned());
            }
        }

        let pattern = self
            .config
            .title_pattern
            .as_deref()
            .unwrap_or(DEFAULT_GROUP_TITLE_PATTERN);
        for candidate in &mut candidates {
            let Some(group) = candidate.group.clone() else {
                continue;
            };
            let Some(sections) = groups.get(&group) else {
                continue;
            };
            if sections.len() < 2 {
                continue;
            }

            candidate.body.sections = sections.clone();
            candidate.title = PullRequestTitle::new(pattern)
                .with_target_branch(&ctx.run().target_branch)
                .with_branch(group.clone())
                .with_version(candidate.version().cloned());
            debug!(group = %group, branch = %candidate.head_branch, "group title applied");
        }

        Ok(candidates)
    }
}
