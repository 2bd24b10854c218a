//! Shipwright Changelog - Commit classification and release notes
//!
//! This crate turns raw commits into conventional-commit records and renders
//! release notes from them.

pub mod formatter;
pub mod generator;
pub mod parser;
pub mod types;

pub use formatter::{ChangelogFormatter, MarkdownFormatter};
pub use generator::ChangelogGenerator;
pub use parser::{CommitParser, ConventionalParser, ParserConfig};
pub use types::{ConventionalCommit, Footer, ReleaseNotes, Section, UNKNOWN_TYPE};
