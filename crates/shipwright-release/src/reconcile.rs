//! Manual-override reconciliation against an open pull request

use shipwright_core::config::{PullRequestConfig, RegressionPolicy};
use shipwright_core::error::{Result, VersionError};
use shipwright_core::ReleaseWarning;
use tracing::{debug, info, instrument, warn};

use crate::body::PullRequestBody;
use crate::builder::CandidateBuilder;
use crate::candidate::ReleaseCandidate;
use crate::gateway::ExistingPullRequest;
use crate::title::PullRequestTitle;

/// Candidate after reconciliation, with the comments to post on its pull request
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub candidate: ReleaseCandidate,
    pub comments: Vec<String>,
}

/// Applies the custom version label and the regression policy
pub struct Reconciler<'a> {
    builder: &'a CandidateBuilder,
}

impl<'a> Reconciler<'a> {
    pub fn new(builder: &'a CandidateBuilder) -> Self {
        Self { builder }
    }

    fn config(&self) -> &PullRequestConfig {
        self.builder.pull_request()
    }

    /// Reconcile `candidate` with the pull request open for its branch
    #[instrument(skip_all, fields(branch = %candidate.head_branch))]
    pub fn reconcile(
        &self,
        candidate: ReleaseCandidate,
        existing: Option<&ExistingPullRequest>,
    ) -> Result<Reconciliation> {
        let mut comments = Vec::new();
        let candidate = match existing {
            Some(pr) => self.apply_title(candidate, pr, &mut comments)?,
            None => candidate,
        };

        for warning in &candidate.warnings {
            let ReleaseWarning::VersionRegression {
                component,
                version,
                previous,
            } = warning
            else {
                comments.push(format!(":warning: {}", warning));
                continue;
            };
            match self.config().override_regression_policy {
                RegressionPolicy::Block => {
                    return Err(VersionError::Regression {
                        component: component.clone(),
                        version: version.clone(),
                        previous: previous.clone(),
                    }
                    .into());
                }
                RegressionPolicy::Warn => {
                    warn!(%component, %version, %previous, "release version does not advance");
                    comments.push(format!(
                        ":warning: Version regression in {}: {} is not greater than the previous release {}.",
                        component, version, previous
                    ));
                }
            }
        }

        Ok(Reconciliation { candidate, comments })
    }

    fn apply_title(
        &self,
        candidate: ReleaseCandidate,
        pr: &ExistingPullRequest,
        comments: &mut Vec<String>,
    ) -> Result<ReleaseCandidate> {
        let label = &self.config().custom_version_label;
        let labelled = pr.labels.iter().any(|l| l == label);
        let title_version = PullRequestTitle::parse(candidate.title.pattern(), &pr.title).and_then(|t| t.version);
        let Some(computed) = candidate.version().cloned() else {
            return Ok(candidate);
        };

        match (labelled, title_version) {
            (true, Some(manual)) if manual == computed => Ok(candidate),
            (true, Some(manual)) => {
                if candidate.releases.len() != 1 {
                    comments.push(format!(
                        "The \"{}\" label asks for version {}, but this pull request releases several components. Keeping the computed version {}.",
                        label, manual, computed
                    ));
                    return Ok(candidate);
                }
                info!(%manual, %computed, "using manually set version");
                comments.push(format!(
                    "Version manually set to {} from the pull request title, replacing the computed version {}.",
                    manual, computed
                ));
                self.builder.rebuild_with_version(&candidate, manual)
            }
            (true, None) => {
                warn!(title = %pr.title, "custom version label without a version in the title");
                comments.push(format!(
                    "The \"{}\" label is set, but no version could be read from the title \"{}\". \
                     Edit the title to match \"{}\" to choose a version. Keeping the computed version {}.",
                    label,
                    pr.title,
                    candidate.title.render(),
                    computed
                ));
                Ok(candidate)
            }
            (false, Some(titled)) if titled != computed => {
                // A title still naming a version from the body is our own stale proposal
                let Some(body) = PullRequestBody::parse(&pr.body) else {
                    debug!(%titled, "existing body not recognized, cannot tell whether the title was edited");
                    return Ok(candidate);
                };
                if body.sections.iter().any(|section| section.version == titled) {
                    debug!(%titled, %computed, "title carries the previously proposed version");
                    return Ok(candidate);
                }
                comments.push(format!(
                    "The title names version {}, but the computed version is {}. \
                     Add the \"{}\" label to release a manually chosen version.",
                    titled, computed, label
                ));
                Ok(candidate)
            }
            (false, _) => Ok(candidate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::test_support::{builder, run};
    use crate::plugins::test_support::candidate;
    use semver::Version;
    use shipwright_core::config::Config;
    use shipwright_core::ShipwrightError;

    fn pr(title: &str, labels: &[&str]) -> ExistingPullRequest {
        ExistingPullRequest {
            number: 7,
            title: title.to_string(),
            body: String::new(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Pull request as proposed by an earlier run, with its title then edited
    fn proposed(builder: &CandidateBuilder, version: &str, title: &str) -> ExistingPullRequest {
        let earlier = candidate(builder, "pkg1", "1.0.0", version);
        ExistingPullRequest {
            body: earlier.body.render(),
            ..pr(title, &["autorelease: pending"])
        }
    }

    #[test]
    fn test_custom_version_overrides() {
        let builder = builder();
        let candidate = candidate(&builder, "pkg1", "1.0.0", "1.0.1");
        let existing = pr(
            "chore(main): release pkg1 6.7.9-alpha.1",
            &["autorelease: pending", "autorelease: custom version"],
        );

        let result = Reconciler::new(&builder).reconcile(candidate, Some(&existing)).unwrap();

        let manual = Version::parse("6.7.9-alpha.1").unwrap();
        assert_eq!(result.candidate.version(), Some(&manual));
        assert_eq!(result.candidate.title.render(), "chore(main): release pkg1 6.7.9-alpha.1");
        assert_eq!(result.comments.len(), 1);
        assert!(result.comments[0].contains("manually set"));
        assert!(result.comments[0].contains("6.7.9-alpha.1"));
        assert!(result.comments[0].contains("1.0.1"));
    }

    #[test]
    fn test_label_without_version_keeps_computed() {
        let builder = builder();
        let candidate = candidate(&builder, "pkg1", "1.0.0", "1.0.1");
        let existing = pr("release please", &["autorelease: custom version"]);

        let result = Reconciler::new(&builder).reconcile(candidate, Some(&existing)).unwrap();

        assert_eq!(result.candidate.version(), Some(&Version::new(1, 0, 1)));
        assert_eq!(result.comments.len(), 1);
        assert!(result.comments[0].contains("no version could be read"));
        assert!(result.comments[0].contains("chore(main): release pkg1 1.0.1"));
    }

    #[test]
    fn test_title_edit_without_label_is_explained() {
        let builder = builder();
        let candidate = candidate(&builder, "pkg1", "1.0.0", "1.0.1");
        let existing = proposed(&builder, "1.0.1", "chore(main): release pkg1 2.0.0");

        let result = Reconciler::new(&builder).reconcile(candidate, Some(&existing)).unwrap();

        assert_eq!(result.candidate.version(), Some(&Version::new(1, 0, 1)));
        assert_eq!(result.comments.len(), 1);
        assert!(result.comments[0].contains("computed version is 1.0.1"));
    }

    #[test]
    fn test_stale_title_from_earlier_run_is_quiet() {
        let builder = builder();
        let candidate = candidate(&builder, "pkg1", "1.0.0", "1.1.0");
        let existing = proposed(&builder, "1.0.1", "chore(main): release pkg1 1.0.1");

        let result = Reconciler::new(&builder).reconcile(candidate, Some(&existing)).unwrap();

        assert_eq!(result.candidate.version(), Some(&Version::new(1, 1, 0)));
        assert!(result.comments.is_empty());
    }

    #[test]
    fn test_matching_title_is_quiet() {
        let builder = builder();
        let candidate = candidate(&builder, "pkg1", "1.0.0", "1.0.1");
        let existing = pr("chore(main): release pkg1 1.0.1", &["autorelease: pending"]);

        let result = Reconciler::new(&builder).reconcile(candidate, Some(&existing)).unwrap();
        assert!(result.comments.is_empty());
    }

    #[test]
    fn test_regression_warns_by_default() {
        let builder = builder();
        let candidate = candidate(&builder, "pkg1", "2.0.0", "2.0.1");
        let existing = pr("chore(main): release pkg1 1.9.0", &["autorelease: custom version"]);

        let result = Reconciler::new(&builder).reconcile(candidate, Some(&existing)).unwrap();

        assert_eq!(result.candidate.version(), Some(&Version::new(1, 9, 0)));
        assert_eq!(result.comments.len(), 2);
        assert!(result.comments[1].contains("Version regression in pkg1"));
    }

    #[test]
    fn test_regression_blocks_under_policy() {
        let mut config = Config::default();
        config.pull_request.override_regression_policy = RegressionPolicy::Block;
        let builder = CandidateBuilder::new(run(), &config);
        let candidate = candidate(&builder, "pkg1", "2.0.0", "2.0.1");
        let existing = pr("chore(main): release pkg1 1.9.0", &["autorelease: custom version"]);

        let err = Reconciler::new(&builder)
            .reconcile(candidate, Some(&existing))
            .unwrap_err();
        assert!(matches!(err, ShipwrightError::Version(VersionError::Regression { .. })));
    }
}
