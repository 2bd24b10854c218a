//! Plan command

use chrono::{Local, NaiveDate};
use clap::Args;
use tracing::info;

use shipwright_core::config::load_config_from_dir;
use shipwright_release::{LocalCommitSource, LocalGateway, ReleasePlan, ReleaseRunner};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};
use crate::exit_codes;

/// Show the release pull requests the next run would propose
///
/// Reads history and files from the local checkout; nothing is written.
#[derive(Debug, Args)]
pub struct PlanCommand {
    /// Release date used in notes (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Print the full pull request bodies
    #[arg(long)]
    pub show_body: bool,
}

impl PlanCommand {
    /// Execute the plan command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        let (config, config_path) = load_config_from_dir(&cwd)?;
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        info!(config = %config_path.display(), date = %date, "executing plan command");

        let gateway = LocalGateway::discover(&cwd)?;
        let commits = LocalCommitSource::discover(&cwd)?;
        let runner = ReleaseRunner::new(&config, config.run_context(date), &gateway, &commits);

        let rt = tokio::runtime::Runtime::new()?;
        let plan = rt.block_on(runner.plan())?;

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan.summary())?),
            OutputFormat::Text if !cli.quiet => self.print(&plan),
            OutputFormat::Text => {}
        }

        if !plan.failures.is_empty() {
            std::process::exit(exit_codes::COMPONENT_FAILURE);
        }
        Ok(())
    }

    fn print(&self, plan: &ReleasePlan) {
        if plan.is_empty() && plan.failures.is_empty() {
            output::info("Nothing to release");
            return;
        }

        for planned in &plan.releases {
            let summary = planned.candidate.summary();
            println!("{}", output::header(&summary.title));
            println!("{}", output::key_value("Branch", &output::branch(&summary.head_branch)));
            if let Some(group) = &summary.group {
                println!("{}", output::key_value("Group", group));
            }
            if summary.draft {
                println!("{}", output::key_value("Draft", "yes"));
            }
            for release in &summary.releases {
                println!("{}", output::release_line(release));
            }
            println!("{}", output::key_value("Files", &summary.files.join(", ")));
            for warning in &summary.warnings {
                output::warning(warning);
            }
            for comment in &planned.comments {
                output::info(comment);
            }
            if self.show_body {
                println!();
                println!("{}", planned.candidate.body.render());
            }
            println!();
        }

        for failure in &plan.failures {
            output::error(&format!("{}: {}", failure.component, failure.message));
        }
        if !plan.releases.is_empty() {
            output::success(&format!("{} release pull request(s) planned", plan.releases.len()));
        }
    }
}
