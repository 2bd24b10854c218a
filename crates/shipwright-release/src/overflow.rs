//! Oversized pull request bodies

use shipwright_core::error::Result;
use tracing::{debug, info};

use crate::gateway::RepositoryGateway;

/// File on the head branch holding release notes too large for the body
pub const OVERFLOW_FILE: &str = ".shipwright/release-notes.md";

const POINTER_PREFIX: &str =
    "This release is too large to preview in the pull request body. View the full release notes here: ";

/// Body linking to the overflow file at `url`
pub fn pointer_body(url: &str) -> String {
    format!("{}{}", POINTER_PREFIX, url)
}

/// URL of the overflow file when `body` is a pointer body
pub fn parse_pointer(body: &str) -> Option<&str> {
    let url = body.trim().strip_prefix(POINTER_PREFIX)?;
    (!url.is_empty() && !url.contains(char::is_whitespace)).then_some(url)
}

/// Moves bodies over the threshold into a side file
pub struct OverflowHandler<'a> {
    gateway: &'a dyn RepositoryGateway,
    threshold: usize,
}

impl<'a> OverflowHandler<'a> {
    pub fn new(gateway: &'a dyn RepositoryGateway, threshold: usize) -> Self {
        Self { gateway, threshold }
    }

    /// Whether `body` must be moved out of the pull request
    pub fn overflows(&self, body: &str) -> bool {
        body.chars().count() > self.threshold
    }

    /// Body to send for `branch`; oversized bodies are written to the side file
    pub async fn prepare(&self, branch: &str, body: String) -> Result<String> {
        if !self.overflows(&body) {
            return Ok(body);
        }
        let url = self.gateway.write_overflow_file(branch, OVERFLOW_FILE, &body).await?;
        info!(branch, length = body.len(), url = %url, "release notes moved to overflow file");
        Ok(pointer_body(&url))
    }

    /// Full body of an existing pull request, following an overflow pointer
    pub async fn resolve(&self, body: &str) -> Result<String> {
        match parse_pointer(body) {
            Some(url) => {
                debug!(url, "existing body is an overflow pointer");
                self.gateway.read_overflow_file(url).await
            }
            None => Ok(body.to_string()),
        }
    }
}
