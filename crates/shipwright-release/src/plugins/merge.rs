//! Merge: several candidates proposed as one pull request

use shipwright_core::config::{HeadBranchStrategy, MergeConfig, DEFAULT_MERGED_TITLE_PATTERN};
use shipwright_core::error::Result;
use shipwright_git::BranchName;
use shipwright_updaters::UpdateSet;
use tracing::{info, warn};

use super::{PluginContext, ReleasePlugin};
use crate::body::PullRequestBody;
use crate::candidate::ReleaseCandidate;
use crate::title::PullRequestTitle;

/// Combines candidates into a single candidate
pub struct MergePlugin {
    config: MergeConfig,
}

impl MergePlugin {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    fn selects(&self, candidate: &ReleaseCandidate) -> bool {
        match &self.config.group {
            Some(group) => candidate.group.as_ref() == Some(group),
            None => true,
        }
    }

    fn merge(&self, inputs: Vec<ReleaseCandidate>, ctx: &PluginContext<'_>) -> Result<ReleaseCandidate> {
        let run = ctx.run();
        let pull_request = ctx.pull_request();

        let head_branch = match (self.config.head_branch, &self.config.group, inputs.first()) {
            (HeadBranchStrategy::First, _, Some(first)) => first.head_branch.clone(),
            (_, Some(group), _) => BranchName::for_target(&run.target_branch).with_group(group.clone()),
            _ => BranchName::for_target(&run.target_branch),
        };
        let draft = inputs.iter().all(|c| c.draft);

        let mut releases = Vec::new();
        let mut sections = Vec::new();
        let mut labels: Vec<String> = Vec::new();
        let mut warnings = Vec::new();
        let mut updates = UpdateSet::new();
        for candidate in inputs {
            updates.merge(candidate.updates, self.config.force_merge)?;
            releases.extend(candidate.releases);
            sections.extend(candidate.body.sections);
            for label in candidate.labels {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
            warnings.extend(candidate.warnings);
        }

        let branch = self.config.group.clone().unwrap_or_else(|| run.target_branch.clone());
        let mut title = PullRequestTitle::new(
            self.config
                .title_pattern
                .as_deref()
                .unwrap_or(DEFAULT_MERGED_TITLE_PATTERN),
        )
        .with_target_branch(&run.target_branch)
        .with_branch(branch.clone());

        let merged = ReleaseCandidate {
            title: title.clone(),
            body: PullRequestBody::new(&pull_request.header, &pull_request.footer).with_sections(sections),
            head_branch,
            releases,
            draft,
            group: self.config.group.clone(),
            labels,
            updates,
            warnings,
        };

        if title.has_version() {
            match merged.version() {
                Some(version) => title.version = Some(version.clone()),
                None => {
                    warn!(pattern = title.pattern(), "merged components disagree on version, using default merged title");
                    title = PullRequestTitle::new(DEFAULT_MERGED_TITLE_PATTERN)
                        .with_target_branch(&run.target_branch)
                        .with_branch(branch);
                }
            }
        }

        info!(
            components = ?merged.component_paths(),
            branch = %merged.head_branch,
            updates = merged.updates.len(),
            "merged candidates"
        );
        Ok(ReleaseCandidate { title, ..merged })
    }
}

impl ReleasePlugin for MergePlugin {
    fn name(&self) -> &'static str {
        "merge"
    }

    fn run(&self, candidates: Vec<ReleaseCandidate>, ctx: &PluginContext<'_>) -> Result<Vec<ReleaseCandidate>> {
        let Some(position) = candidates.iter().position(|c| self.selects(c)) else {
            return Ok(candidates);
        };
        if candidates.iter().filter(|c| self.selects(c)).count() < 2 {
            return Ok(candidates);
        }

        let (selected, mut others): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|c| self.selects(c));
        // Unselected candidates before the first selected one keep their place
        let merged = self.merge(selected, ctx)?;
        others.insert(position, merged);
        Ok(others)
    }
}
