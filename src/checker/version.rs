//! Patch-level version policy.
//!
//! Versions are compared as strings split on `.`, not as full semver. The
//! only question asked is whether the registry lists the release that
//! directly follows the installed one, e.g. `1.5.8` for `1.5.7`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("version {0} does not follow semantic versioning")]
    NotSemanticVersion(String),

    #[error("version {0} has a non-numeric patch component")]
    InvalidPatch(String),
}

/// What the policy can say about a single installed version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchPolicy {
    /// The version string of the next patch release.
    NextPatch(String),
    /// The version does not have three components.
    NotApplicable,
    /// Three components, but the patch component is not a number.
    Malformed,
}

/// Returns true if `version` splits into exactly three non-empty parts.
pub fn supports_semantic_versioning(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3 && parts.iter().all(|p| !p.is_empty())
}

/// Computes the next patch version, keeping major and minor verbatim.
///
/// A `v` prefix stays part of the major component, so `v1.5.7` becomes
/// `v1.5.8`.
pub fn next_patch_version(version: &str) -> Result<String, VersionError> {
    if !supports_semantic_versioning(version) {
        return Err(VersionError::NotSemanticVersion(version.to_string()));
    }

    let mut parts = version.splitn(3, '.');
    let (major, minor, patch) = match (parts.next(), parts.next(), parts.next()) {
        (Some(major), Some(minor), Some(patch)) => (major, minor, patch),
        _ => return Err(VersionError::NotSemanticVersion(version.to_string())),
    };

    let next = patch
        .parse::<u64>()
        .ok()
        .and_then(|p| p.checked_add(1))
        .ok_or_else(|| VersionError::InvalidPatch(version.to_string()))?;

    Ok(format!("{}.{}.{}", major, minor, next))
}

/// Classifies a version for the audit without using errors for control flow.
pub fn classify(version: &str) -> PatchPolicy {
    match next_patch_version(version) {
        Ok(next) => PatchPolicy::NextPatch(next),
        Err(VersionError::NotSemanticVersion(_)) => PatchPolicy::NotApplicable,
        Err(VersionError::InvalidPatch(_)) => PatchPolicy::Malformed,
    }
}
