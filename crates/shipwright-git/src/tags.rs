//! Tag listing

use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::TagInfo;

impl GitRepo {
    /// All tags with the commit each one points to
    #[instrument(skip(self))]
    pub fn tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = Vec::new();

        self.repo.tag_foreach(|oid, name| {
            let name = String::from_utf8_lossy(name)
                .trim_start_matches("refs/tags/")
                .to_string();

            // Annotated tags point at a tag object; peel to the commit
            let target = self
                .repo
                .find_object(oid, None)
                .and_then(|object| object.peel_to_commit());
            if let Ok(commit) = target {
                tags.push(TagInfo::new(name, commit.id().to_string()));
            }

            true
        })?;

        tags.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = tags.len(), "listed tags");
        Ok(tags)
    }
}
