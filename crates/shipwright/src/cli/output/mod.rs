//! Output formatting utilities

use console::style;
use shipwright_release::ReleaseSummary;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

pub fn branch(name: &str) -> String {
    style(name).cyan().to_string()
}

/// One component line: `name 1.0.0 → 1.1.0 (tag, 3 commits)`
pub fn release_line(release: &ReleaseSummary) -> String {
    let previous = release.previous_version.as_deref().unwrap_or("none");
    format!(
        "  {} {} → {} ({}, {} commit{})",
        style(&release.component).cyan(),
        style(previous).dim(),
        style(&release.version).green().bold(),
        style(&release.tag).yellow(),
        release.commits,
        if release.commits == 1 { "" } else { "s" }
    )
}
