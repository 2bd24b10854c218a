//! Shipwright Git - Git access and naming codecs for release management
//!
//! This crate provides commit history with touched files, tag listing, and the
//! bidirectional codecs for release branch names and release tag names.

mod branch;
mod commits;
mod repository;
mod tag;
mod tags;
pub mod types;

pub use branch::{BranchName, BRANCH_PREFIX};
pub use repository::{GitRepo, Result};
pub use tag::TagName;
pub use types::{CommitInfo, TagInfo};
