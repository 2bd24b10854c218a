//! Shipwright Release - Release pull request orchestration
//!
//! This crate turns components and their commit history into release
//! candidates, runs them through the plugin pipeline, reconciles them with
//! open pull requests and proposes them through a [`RepositoryGateway`].

pub mod body;
pub mod builder;
pub mod candidate;
pub mod gateway;
pub mod overflow;
pub mod plugins;
pub mod reconcile;
pub mod runner;
pub mod title;

pub use body::{BodySection, PullRequestBody};
pub use builder::CandidateBuilder;
pub use candidate::{CandidateSummary, ComponentRelease, ReleaseCandidate, ReleaseSummary};
pub use gateway::{
    CommitSource, ExistingPullRequest, FileChange, LocalCommitSource, LocalGateway, PullRequestHandle,
    PullRequestRequest, RepositoryGateway,
};
pub use overflow::{OverflowHandler, OVERFLOW_FILE};
pub use plugins::{PluginContext, PluginPipeline, ReleasePlugin};
pub use reconcile::{Reconciler, Reconciliation};
pub use runner::{
    ComponentFailure, PlanSummary, PlannedRelease, PullRequestOutcome, PullRequestStatus, ReleasePlan,
    ReleaseRunner, RunReport,
};
pub use title::PullRequestTitle;
