//! Version value helpers

use semver::{BuildMetadata, Prerelease, Version};
use shipwright_core::error::{Result, VersionError};

use crate::types::BumpType;

/// Parse a version, accepting a leading `v`
pub fn parse_version(raw: &str) -> Result<Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed)
        .map_err(|e| VersionError::ParseFailed(raw.to_string(), e.to_string()).into())
}

/// Apply a bump to `current`
///
/// A pre-release graduates to its own core version when the bump does not
/// reach past it (`1.2.0-beta.3` + minor = `1.2.0`). Build metadata is dropped.
pub fn bump(current: &Version, bump: BumpType) -> Version {
    let mut next = Version::new(current.major, current.minor, current.patch);
    let graduating = !current.pre.is_empty();

    match bump {
        BumpType::Major => {
            if !(graduating && current.minor == 0 && current.patch == 0) {
                next.major += 1;
                next.minor = 0;
                next.patch = 0;
            }
        }
        BumpType::Minor => {
            if !(graduating && current.patch == 0) {
                next.minor += 1;
                next.patch = 0;
            }
        }
        BumpType::Patch => {
            if !graduating {
                next.patch += 1;
            }
        }
        BumpType::Prerelease | BumpType::None => return current.clone(),
    }

    next
}

/// `version` with the `-{label}.1` pre-release appended
pub fn with_prerelease(version: &Version, label: &str) -> Result<Version> {
    let mut next = version.clone();
    next.pre = Prerelease::new(&format!("{}.1", label))
        .map_err(|e| VersionError::InvalidFormat(format!("pre-release label '{}': {}", label, e)))?;
    next.build = BuildMetadata::EMPTY;
    Ok(next)
}

/// Next sequence of `previous` if it is a `{label}.N` pre-release
pub fn next_prerelease(previous: &Version, label: &str) -> Option<Version> {
    let sequence: u64 = previous
        .pre
        .as_str()
        .strip_prefix(label)?
        .strip_prefix('.')?
        .parse()
        .ok()?;

    let mut next = previous.clone();
    next.pre = Prerelease::new(&format!("{}.{}", label, sequence + 1)).ok()?;
    next.build = BuildMetadata::EMPTY;
    Some(next)
}
