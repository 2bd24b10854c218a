//! Release notes formatters

mod markdown;

pub use markdown::MarkdownFormatter;

use crate::types::ReleaseNotes;

/// Trait for release notes formatters
pub trait ChangelogFormatter: Send + Sync {
    /// Render release notes to a string
    fn format(&self, notes: &ReleaseNotes) -> String;

    /// Get the file extension for this format
    fn extension(&self) -> &'static str;
}
