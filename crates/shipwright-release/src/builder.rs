//! Candidate construction

use semver::Version;
use shipwright_changelog::{ChangelogGenerator, ConventionalCommit, MarkdownFormatter};
use shipwright_core::config::{Config, PullRequestConfig};
use shipwright_core::error::Result;
use shipwright_core::{Component, ReleaseWarning, RunContext, ShipwrightError};
use shipwright_git::{BranchName, TagName};
use shipwright_updaters::{StrategyContext, UpdateSet, UpdaterRegistry};
use tracing::{debug, instrument};

use crate::body::{BodySection, PullRequestBody};
use crate::candidate::{ComponentRelease, ReleaseCandidate};
use crate::title::PullRequestTitle;

/// Builds one release candidate per component
pub struct CandidateBuilder {
    run: RunContext,
    pull_request: PullRequestConfig,
    changelog: ChangelogGenerator,
    updaters: UpdaterRegistry,
}

impl CandidateBuilder {
    pub fn new(run: RunContext, config: &Config) -> Self {
        let mut formatter = MarkdownFormatter::new();
        if let Some(url) = &run.repository_url {
            formatter = formatter.with_repo_url(url.clone());
        }
        Self {
            changelog: ChangelogGenerator::new(config.changelog_sections.clone()).with_formatter(formatter),
            pull_request: config.pull_request.clone(),
            run,
            updaters: UpdaterRegistry::new(),
        }
    }

    /// Use a custom release strategy registry
    pub fn with_updaters(mut self, updaters: UpdaterRegistry) -> Self {
        self.updaters = updaters;
        self
    }

    pub fn run(&self) -> &RunContext {
        &self.run
    }

    pub fn pull_request(&self) -> &PullRequestConfig {
        &self.pull_request
    }

    pub fn updaters(&self) -> &UpdaterRegistry {
        &self.updaters
    }

    /// Candidate releasing `component` at `version`
    #[instrument(skip_all, fields(component = %component.path, version = %version))]
    pub fn build(
        &self,
        component: &Component,
        previous: Option<&Version>,
        commits: Vec<ConventionalCommit>,
        version: Version,
        warnings: Vec<ReleaseWarning>,
    ) -> Result<ReleaseCandidate> {
        let strategy = self.updaters.require(component)?;
        let tag_component = component.tag_component();

        let tag = self.tag_name(component, &version);
        let previous_tag = previous.map(|p| self.tag_name(component, p));
        let notes = self.changelog.format(&self.changelog.generate(
            &version.to_string(),
            &tag,
            previous_tag.as_deref(),
            self.run.release_date,
            &commits,
        ));

        let ctx = StrategyContext {
            component,
            version: &version,
            previous_version: previous,
            changelog_entry: &notes,
        };
        let mut updates = UpdateSet::new();
        for update in strategy.build_updates(&ctx)? {
            updates.insert(&component.path, update)?;
        }

        let mut head_branch = BranchName::for_target(&self.run.target_branch);
        if let Some(name) = &tag_component {
            head_branch = head_branch.with_component(name.clone());
        }

        let title = PullRequestTitle::new(&self.pull_request.title_pattern)
            .with_target_branch(&self.run.target_branch)
            .with_component(tag_component)
            .with_version(Some(version.clone()));

        let release = ComponentRelease {
            component: component.clone(),
            version,
            previous_version: previous.cloned(),
            tag,
            previous_tag,
            notes,
            commits,
        };
        let body = PullRequestBody::new(&self.pull_request.header, &self.pull_request.footer)
            .with_sections(vec![section_of(&release)]);

        debug!(updates = updates.len(), "candidate built");
        Ok(ReleaseCandidate {
            title,
            body,
            head_branch,
            releases: vec![release],
            draft: component.draft,
            group: None,
            labels: self.pull_request.labels.clone(),
            updates,
            warnings,
        })
    }

    /// Re-render a single-release candidate at a forced version
    ///
    /// Branch, group, labels, title pattern and the body sections of other
    /// components are kept; file contents already fetched are carried over.
    pub fn rebuild_with_version(&self, candidate: &ReleaseCandidate, version: Version) -> Result<ReleaseCandidate> {
        let [release] = candidate.releases.as_slice() else {
            return Err(ShipwrightError::other(format!(
                "cannot re-version a candidate carrying {} releases",
                candidate.releases.len()
            )));
        };

        let name = release.component.name().unwrap_or_else(|| release.component.path.clone());
        let mut warnings: Vec<ReleaseWarning> = candidate
            .warnings
            .iter()
            .filter(|w| !matches!(w, ReleaseWarning::VersionRegression { component, .. } if *component == name))
            .cloned()
            .collect();
        if let Some(previous) = release.previous_version.as_ref().filter(|p| version <= **p) {
            warnings.push(ReleaseWarning::VersionRegression {
                component: name,
                version: version.to_string(),
                previous: previous.to_string(),
            });
        }

        let fresh = self.build(
            &release.component,
            release.previous_version.as_ref(),
            release.commits.clone(),
            version.clone(),
            warnings,
        )?;

        let mut body = candidate.body.clone();
        if let Some(section) = fresh.body.sections.first() {
            body.replace_section(section.clone());
        }

        let mut title = candidate.title.clone();
        if title.version.is_some() {
            title.version = Some(version);
        }

        let mut updates = fresh.updates;
        for update in updates.iter_mut() {
            if let Some(previous) = candidate.updates.get(&update.path) {
                update.cached_content = previous.cached_content.clone();
            }
        }

        Ok(ReleaseCandidate {
            title,
            body,
            head_branch: candidate.head_branch.clone(),
            releases: fresh.releases,
            draft: candidate.draft,
            group: candidate.group.clone(),
            labels: candidate.labels.clone(),
            updates,
            warnings: fresh.warnings,
        })
    }

    fn tag_name(&self, component: &Component, version: &Version) -> String {
        TagName::new(
            version.clone(),
            component.tag_component(),
            component.tag_separator.clone(),
            component.include_v_in_tag,
        )
        .to_string()
    }
}

/// Body section for one release
pub(crate) fn section_of(release: &ComponentRelease) -> BodySection {
    BodySection::new(Some(release.label()), release.version.clone(), release.notes.clone())
}


#[cfg(test)]
mod tests {
    use super::test_support::{builder, commit};
    use super::*;

    #[test]
    fn test_build_component_candidate() {
        let component = Component::new("packages/a", "node");
        let previous = Version::new(1, 0, 0);
        let candidate = builder()
            .build(
                &component,
                Some(&previous),
                vec![commit("fix: handle nulls", "packages/a")],
                Version::new(1, 0, 1),
                Vec::new(),
            )
            .unwrap();

        assert_eq!(candidate.title.render(), "chore(main): release a 1.0.1");
        assert_eq!(
            candidate.head_branch.format().unwrap(),
            "shipwright--branches--main--components--a"
        );
        assert_eq!(candidate.releases[0].tag, "a-v1.0.1");
        assert_eq!(candidate.releases[0].previous_tag.as_deref(), Some("a-v1.0.0"));
        assert_eq!(
            candidate.updates.paths(),
            vec!["packages/a/CHANGELOG.md", "packages/a/package.json"]
        );
        assert!(candidate.body.render().contains("* handle nulls"));
        assert_eq!(candidate.labels, vec!["autorelease: pending".to_string()]);
    }

    #[test]
    fn test_root_component_branch_is_bare() {
        let component = Component::new(".", "simple").with_component_in_tag(false);
        let candidate = builder()
            .build(&component, None, vec![commit("fix: a", ".")], Version::new(0, 0, 1), Vec::new())
            .unwrap();

        assert_eq!(candidate.head_branch.format().unwrap(), "shipwright--branches--main");
        assert_eq!(candidate.releases[0].tag, "v0.0.1");
        assert_eq!(candidate.title.render(), "chore(main): release 0.0.1");
    }

    #[test]
    fn test_unknown_release_type() {
        let component = Component::new("a", "cobol");
        let err = builder()
            .build(&component, None, Vec::new(), Version::new(1, 0, 0), Vec::new())
            .unwrap_err();
        assert!(err.is_component_scoped());
    }

    #[test]
    fn test_rebuild_keeps_branch_and_cached_content() {
        let component = Component::new("packages/a", "node");
        let previous = Version::new(1, 0, 0);
        let mut candidate = builder()
            .build(
                &component,
                Some(&previous),
                vec![commit("fix: a", "packages/a")],
                Version::new(1, 0, 1),
                Vec::new(),
            )
            .unwrap();
        for update in candidate.updates.iter_mut() {
            update.cached_content = Some("{\"name\": \"a\", \"version\": \"1.0.0\"}".to_string());
        }
        candidate.group = Some("sdk".to_string());

        let rebuilt = builder()
            .rebuild_with_version(&candidate, Version::new(1, 2, 1))
            .unwrap();

        assert_eq!(rebuilt.head_branch, candidate.head_branch);
        assert_eq!(rebuilt.group.as_deref(), Some("sdk"));
        assert_eq!(rebuilt.version(), Some(&Version::new(1, 2, 1)));
        assert_eq!(rebuilt.title.version, Some(Version::new(1, 2, 1)));
        assert!(rebuilt.updates.iter().all(|u| u.cached_content.is_some()));
        let package = rebuilt.updates.get("packages/a/package.json").unwrap().render().unwrap();
        assert!(package.contains("\"version\": \"1.2.1\""));
        assert!(rebuilt.warnings.is_empty());
    }

    #[test]
    fn test_rebuild_below_previous_warns() {
        let component = Component::new("packages/a", "simple");
        let previous = Version::new(2, 0, 0);
        let candidate = builder()
            .build(
                &component,
                Some(&previous),
                vec![commit("fix: a", "packages/a")],
                Version::new(2, 0, 1),
                Vec::new(),
            )
            .unwrap();

        let rebuilt = builder()
            .rebuild_with_version(&candidate, Version::new(1, 5, 0))
            .unwrap();
        assert!(matches!(
            rebuilt.warnings.as_slice(),
            [ReleaseWarning::VersionRegression { .. }]
        ));
    }
}
