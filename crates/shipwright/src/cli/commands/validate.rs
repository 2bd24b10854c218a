//! Validate command

use std::path::Path;

use clap::Args;
use console::style;
use tracing::info;

use shipwright_core::config::{load_config_from_dir, Config};
use shipwright_core::ManifestState;
use shipwright_git::GitRepo;
use shipwright_strategies::StrategyRegistry;
use shipwright_updaters::UpdaterRegistry;

use crate::cli::{Cli, OutputFormat};
use crate::exit_codes;

/// Validate configuration and repository state
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Only validate configuration file
    #[arg(long)]
    pub config_only: bool,

    /// Strict mode - treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Problems found by validation
#[derive(Debug, Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(config_only = self.config_only, strict = self.strict, "executing validate command");
        let cwd = std::env::current_dir()?;

        let mut findings = Findings::default();
        let config_path = match load_config_from_dir(&cwd) {
            Ok((config, path)) => {
                check_components(&config, &mut findings);
                if !self.config_only {
                    check_repository(&cwd, &config, &mut findings);
                }
                Some(path)
            }
            Err(e) => {
                findings.errors.push(format!("Configuration: {}", e));
                None
            }
        };

        if self.strict {
            let mut warnings = std::mem::take(&mut findings.warnings);
            findings.errors.append(&mut warnings);
        }
        let passed = findings.errors.is_empty();

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "valid": passed,
                    "config_path": config_path.map(|p| p.to_string_lossy().to_string()),
                    "errors": findings.errors,
                    "warnings": findings.warnings
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text if !cli.quiet => print(&findings, config_path.as_deref()),
            OutputFormat::Text => {}
        }

        if !passed {
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
        Ok(())
    }
}

/// Release types and versioning strategies must be known
fn check_components(config: &Config, findings: &mut Findings) {
    let components = match config.components() {
        Ok(components) => components,
        Err(e) => {
            findings.errors.push(format!("Packages: {}", e));
            return;
        }
    };

    let updaters = UpdaterRegistry::new();
    let strategies = StrategyRegistry::new();
    for component in &components {
        if updaters.get(&component.release_type).is_none() {
            findings.errors.push(format!(
                "Package '{}': unknown release type '{}' (known: {})",
                component.path,
                component.release_type,
                updaters.names().join(", ")
            ));
        }
        if strategies.get(&component.versioning).is_none() {
            findings.errors.push(format!(
                "Package '{}': unknown versioning strategy '{}' (known: {})",
                component.path,
                component.versioning,
                strategies.names().join(", ")
            ));
        }
    }
}

fn check_repository(cwd: &Path, config: &Config, findings: &mut Findings) {
    let repo = match GitRepo::discover(cwd) {
        Ok(repo) => repo,
        Err(e) => {
            findings.errors.push(format!("Git repository: {}", e));
            return;
        }
    };

    match repo.read_file_at_head(&config.manifest_path) {
        Ok(Some(content)) => {
            if let Err(e) = ManifestState::parse(&content) {
                findings.errors.push(format!("Manifest '{}': {}", config.manifest_path, e));
            }
        }
        Ok(None) => findings.warnings.push(format!(
            "Manifest '{}' not found; previous versions will come from tags",
            config.manifest_path
        )),
        Err(e) => findings.errors.push(format!("Manifest '{}': {}", config.manifest_path, e)),
    }
}

fn print(findings: &Findings, config_path: Option<&Path>) {
    println!("{}", style("Validation Results").bold());
    println!();

    if let Some(path) = config_path {
        println!("Config: {}", style(path.display()).cyan());
        println!();
    }

    if !findings.errors.is_empty() {
        println!("{}", style("Errors:").red().bold());
        for error in &findings.errors {
            println!("  {} {}", style("✗").red(), error);
        }
        println!();
    }

    if !findings.warnings.is_empty() {
        println!("{}", style("Warnings:").yellow().bold());
        for warning in &findings.warnings {
            println!("  {} {}", style("!").yellow(), warning);
        }
        println!();
    }

    match (findings.errors.len(), findings.warnings.len()) {
        (0, 0) => println!("{}", style("✓ All checks passed").green().bold()),
        (0, warnings) => println!(
            "{} with {} warning(s)",
            style("✓ Validation passed").green().bold(),
            warnings
        ),
        (errors, _) => println!("{} with {} error(s)", style("✗ Validation failed").red().bold(), errors),
    }
}
