//! Release run orchestration
//!
//! A run plans every component, transforms the candidates through the plugin
//! pipeline, reconciles them with open pull requests and finally proposes
//! them through the gateway. Component-scoped failures are collected and the
//! run carries on; pipeline and gateway failures end it.

use std::collections::HashMap;

use semver::Version;
use serde::Serialize;
use shipwright_changelog::ConventionalCommit;
use shipwright_core::config::Config;
use shipwright_core::error::{ConfigError, Result};
use shipwright_core::{owner_of, Component, ManifestState, RunContext, ShipwrightError, ROOT_PATH};
use shipwright_git::{TagInfo, TagName};
use shipwright_strategies::VersionCalculator;
use shipwright_updaters::generic::ManifestUpdater;
use shipwright_updaters::{FileUpdate, UpdaterRegistry};
use tracing::{debug, info, instrument, warn};

use crate::builder::CandidateBuilder;
use crate::candidate::{CandidateSummary, ReleaseCandidate};
use crate::gateway::{CommitSource, ExistingPullRequest, FileChange, PullRequestRequest, RepositoryGateway};
use crate::overflow::OverflowHandler;
use crate::plugins::{PluginContext, PluginPipeline};
use crate::reconcile::Reconciler;

/// A component or candidate that could not be released this run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentFailure {
    pub component: String,
    pub message: String,
}

/// A reconciled candidate ready to be proposed
#[derive(Debug, Clone)]
pub struct PlannedRelease {
    pub candidate: ReleaseCandidate,
    pub existing: Option<ExistingPullRequest>,
    pub comments: Vec<String>,
    pub changes: Vec<FileChange>,
}

/// Outcome of planning a run
#[derive(Debug, Clone, Default)]
pub struct ReleasePlan {
    pub releases: Vec<PlannedRelease>,
    pub failures: Vec<ComponentFailure>,
}

impl ReleasePlan {
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            releases: self
                .releases
                .iter()
                .map(|planned| PlannedSummary {
                    candidate: planned.candidate.summary(),
                    existing_pull_request: planned.existing.as_ref().map(|pr| pr.number),
                    comments: planned.comments.clone(),
                })
                .collect(),
            failures: self.failures.clone(),
        }
    }
}

/// Report view of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub releases: Vec<PlannedSummary>,
    pub failures: Vec<ComponentFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedSummary {
    #[serde(flatten)]
    pub candidate: CandidateSummary,
    pub existing_pull_request: Option<u64>,
    pub comments: Vec<String>,
}

/// What happened to a release pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestStatus {
    Created,
    Updated,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestOutcome {
    pub head_branch: String,
    pub number: u64,
    pub url: Option<String>,
    pub status: PullRequestStatus,
}

/// Result of a complete run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub pull_requests: Vec<PullRequestOutcome>,
    pub failures: Vec<ComponentFailure>,
}

/// File contents read during one run
#[derive(Default)]
struct FileCache {
    files: HashMap<String, Option<String>>,
}

impl FileCache {
    async fn read(&mut self, gateway: &dyn RepositoryGateway, path: &str) -> Result<Option<String>> {
        if let Some(hit) = self.files.get(path) {
            return Ok(hit.clone());
        }
        let content = gateway.read_file(path).await?;
        self.files.insert(path.to_string(), content.clone());
        Ok(content)
    }
}

/// Drives one release run for a repository
pub struct ReleaseRunner<'a> {
    config: &'a Config,
    gateway: &'a dyn RepositoryGateway,
    commits: &'a dyn CommitSource,
    builder: CandidateBuilder,
    calculator: VersionCalculator,
    pipeline: PluginPipeline,
}

impl<'a> ReleaseRunner<'a> {
    pub fn new(
        config: &'a Config,
        run: RunContext,
        gateway: &'a dyn RepositoryGateway,
        commits: &'a dyn CommitSource,
    ) -> Self {
        Self {
            builder: CandidateBuilder::new(run, config),
            pipeline: PluginPipeline::from_config(&config.plugins),
            calculator: VersionCalculator::new(),
            config,
            gateway,
            commits,
        }
    }

    /// Use a custom release strategy registry
    pub fn with_updaters(mut self, updaters: UpdaterRegistry) -> Self {
        self.builder = self.builder.with_updaters(updaters);
        self
    }

    /// Use a custom version calculator
    pub fn with_calculator(mut self, calculator: VersionCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    fn run_context(&self) -> &RunContext {
        self.builder.run()
    }

    /// Plan and propose
    pub async fn run(&self) -> Result<RunReport> {
        let plan = self.plan().await?;
        self.execute(plan).await
    }

    /// Compute the final candidate set without writing anything
    #[instrument(skip(self), fields(repository = %self.run_context().repository))]
    pub async fn plan(&self) -> Result<ReleasePlan> {
        self.plan_components()
            .await
            .map_err(|e| e.for_repository(&self.run_context().repository))
    }

    /// Open or update the pull requests of `plan`
    #[instrument(skip_all, fields(releases = plan.releases.len()))]
    pub async fn execute(&self, plan: ReleasePlan) -> Result<RunReport> {
        self.propose(plan)
            .await
            .map_err(|e| e.for_repository(&self.run_context().repository))
    }

    async fn plan_components(&self) -> Result<ReleasePlan> {
        let manifest_raw = self.gateway.read_file(&self.config.manifest_path).await?;
        let manifest = ManifestState::parse(manifest_raw.as_deref().unwrap_or_default())?;
        let components = self.config.components()?;
        let tags = self.commits.list_tags().await?;
        info!(components = components.len(), manifest_entries = manifest.len(), "planning release");

        let mut files = FileCache::default();
        let mut candidates = Vec::new();
        let mut failures = Vec::new();
        for component in &components {
            match self.prepare(component, &components, &manifest, &tags, &mut files).await {
                Ok(Some(candidate)) => candidates.push(candidate),
                Ok(None) => debug!(component = %component.path, "nothing to release"),
                Err(e) if e.is_component_scoped() => failures.push(self.failure(&component.path, e)),
                Err(e) => return Err(e),
            }
        }

        let ctx = PluginContext { builder: &self.builder };
        let candidates = self.pipeline.run(candidates, &ctx)?;

        let reconciler = Reconciler::new(&self.builder);
        let mut releases = Vec::new();
        for candidate in candidates {
            let paths = candidate.component_paths().join(", ");
            let existing = self
                .gateway
                .find_open_pull_request(&candidate.head_branch.format()?)
                .await?;
            let planned = reconciler
                .reconcile(candidate, existing.as_ref())
                .and_then(|reconciled| {
                    let mut candidate = reconciled.candidate;
                    self.add_manifest_update(&mut candidate, manifest_raw.as_ref());
                    let changes = render_changes(&candidate)?;
                    Ok(PlannedRelease {
                        candidate,
                        existing,
                        comments: reconciled.comments,
                        changes,
                    })
                });
            match planned {
                Ok(planned) => releases.push(planned),
                Err(e) if e.is_component_scoped() => failures.push(self.failure(&paths, e)),
                Err(e) => return Err(e),
            }
        }

        info!(releases = releases.len(), failures = failures.len(), "release plan ready");
        Ok(ReleasePlan { releases, failures })
    }

    async fn propose(&self, plan: ReleasePlan) -> Result<RunReport> {
        let overflow = OverflowHandler::new(self.gateway, self.config.pull_request.overflow_threshold);
        let mut pull_requests = Vec::new();

        for planned in plan.releases {
            let PlannedRelease {
                candidate,
                existing,
                comments,
                changes,
            } = planned;
            let head_branch = candidate.head_branch.format()?;
            let title = candidate.title.render();
            let body = candidate.body.render();

            if let Some(existing) = &existing {
                let current = overflow.resolve(&existing.body).await?;
                if existing.title == title && current == body {
                    info!(branch = %head_branch, number = existing.number, "pull request unchanged, skipping update");
                    pull_requests.push(PullRequestOutcome {
                        head_branch,
                        number: existing.number,
                        url: None,
                        status: PullRequestStatus::Unchanged,
                    });
                    continue;
                }
            }

            let body = overflow.prepare(&head_branch, body).await?;
            let request = PullRequestRequest {
                title,
                body,
                head_branch: head_branch.clone(),
                base_branch: self.run_context().target_branch.clone(),
                changes,
                labels: candidate.labels.clone(),
                draft: candidate.draft,
            };
            let handle = self.gateway.open_or_update_pull_request(&request).await?;
            for comment in &comments {
                self.gateway.add_comment(handle.number, comment).await?;
            }

            let status = if existing.is_some() {
                PullRequestStatus::Updated
            } else {
                PullRequestStatus::Created
            };
            info!(branch = %head_branch, number = handle.number, status = ?status, "release pull request proposed");
            pull_requests.push(PullRequestOutcome {
                head_branch,
                number: handle.number,
                url: Some(handle.url),
                status,
            });
        }

        Ok(RunReport {
            pull_requests,
            failures: plan.failures,
        })
    }

    #[instrument(skip_all, fields(component = %component.path))]
    async fn prepare(
        &self,
        component: &Component,
        components: &[Component],
        manifest: &ManifestState,
        tags: &[TagInfo],
        files: &mut FileCache,
    ) -> Result<Option<ReleaseCandidate>> {
        let strategy = self.builder.updaters().require(component)?;

        let mut component = component.clone();
        if let (None, Some(manifest_file)) = (&component.package_name, strategy.package_manifest()) {
            let path = component.file_path(manifest_file);
            let content = files
                .read(self.gateway, &path)
                .await?
                .ok_or_else(|| ConfigError::MissingRequiredFile {
                    component: component.path.clone(),
                    path: path.clone(),
                })?;
            component.package_name = strategy.package_name_from(&content);
            debug!(package = ?component.package_name, "detected package name");
        }

        let (previous, since) = previous_release(&component, manifest, tags);
        let prefix = (!component.is_root()).then_some(component.path.as_str());
        let mut commits = self.commits.list_commits_since(since.as_deref(), prefix).await?;
        commits.retain(|commit| attributed(&component, components, commit));

        let Some(outcome) = self.calculator.calculate(&component, previous.as_ref(), &commits)? else {
            return Ok(None);
        };

        let mut candidate = self.builder.build(
            &component,
            previous.as_ref(),
            commits,
            outcome.version,
            outcome.warnings,
        )?;

        for update in candidate.updates.iter_mut() {
            let content = files.read(self.gateway, &update.path).await?;
            if content.is_none() && !update.create_if_missing {
                return Err(ConfigError::MissingRequiredFile {
                    component: component.path.clone(),
                    path: update.path.clone(),
                }
                .into());
            }
            update.cached_content = content;
        }

        Ok(Some(candidate))
    }

    fn add_manifest_update(&self, candidate: &mut ReleaseCandidate, manifest_raw: Option<&String>) {
        let entries = candidate
            .releases
            .iter()
            .map(|r| (r.component.path.clone(), r.version.clone()))
            .collect();
        let owner = candidate
            .releases
            .first()
            .map_or(ROOT_PATH, |r| r.component.path.as_str())
            .to_string();
        candidate.updates.upsert(
            &owner,
            FileUpdate::creating(&self.config.manifest_path, ManifestUpdater::new(entries))
                .with_cached_content(manifest_raw.cloned()),
        );
    }

    fn failure(&self, component: &str, error: ShipwrightError) -> ComponentFailure {
        let error = error.for_component(&self.run_context().repository, component);
        warn!(component, error = %error, "component skipped");
        ComponentFailure {
            component: component.to_string(),
            message: error.to_string(),
        }
    }
}

/// Previous version of `component` and the ref its history starts after
///
/// The manifest wins; components missing from it fall back to their highest
/// release tag.
fn previous_release(
    component: &Component,
    manifest: &ManifestState,
    tags: &[TagInfo],
) -> (Option<Version>, Option<String>) {
    let tag_component = component.tag_component();
    let releases: Vec<(&TagInfo, TagName)> = tags
        .iter()
        .filter_map(|tag| {
            TagName::parse_for(&tag.name, tag_component.as_deref(), &component.tag_separator).map(|name| (tag, name))
        })
        .collect();

    if let Some(version) = manifest.get(&component.path) {
        let since = releases
            .iter()
            .find(|(_, name)| &name.version == version)
            .map(|(tag, _)| tag.name.clone());
        if since.is_none() {
            warn!(component = %component.path, version = %version, "no tag for manifest version, reading full history");
        }
        return (Some(version.clone()), since);
    }

    match releases.into_iter().max_by(|a, b| a.1.version.cmp(&b.1.version)) {
        Some((tag, name)) => {
            debug!(component = %component.path, tag = %tag.name, "previous version from tag");
            (Some(name.version), Some(tag.name.clone()))
        }
        None => (None, None),
    }
}

/// Whether `commit` counts towards `component`
///
/// A touched file counts only for its deepest owning component. Commits
/// without touched files belong to the root.
fn attributed(component: &Component, components: &[Component], commit: &ConventionalCommit) -> bool {
    if commit.touched_paths.is_empty() {
        return component.is_root();
    }
    commit.touched_paths.iter().any(|path| {
        component.owns_file(path) && owner_of(components, path).is_some_and(|owner| owner.path == component.path)
    })
}

fn render_changes(candidate: &ReleaseCandidate) -> Result<Vec<FileChange>> {
    candidate
        .updates
        .iter()
        .map(|update| {
            Ok(FileChange {
                path: update.path.clone(),
                content: update.render()?,
            })
        })
        .collect()
}
