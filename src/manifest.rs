//! Reading installed packages from `composer.lock`.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::AuditError;
use crate::model::Package;

#[derive(Deserialize)]
struct LockFile {
    #[serde(default)]
    packages: Option<Vec<LockPackage>>,
    #[serde(default, rename = "packages-dev")]
    packages_dev: Option<Vec<LockPackage>>,
}

#[derive(Deserialize)]
struct LockPackage {
    name: String,
    version: String,
    version_normalized: Option<String>,
    description: Option<String>,
    source: Option<LockSource>,
    #[serde(rename = "type")]
    package_type: Option<String>,
}

#[derive(Deserialize)]
struct LockSource {
    url: Option<String>,
}

impl From<LockPackage> for Package {
    fn from(entry: LockPackage) -> Self {
        let mut package = Package::new(entry.name, entry.version);
        package.version_normalized = entry.version_normalized.unwrap_or_default();
        package.description = entry.description.unwrap_or_default();
        package.source_url = entry.source.and_then(|s| s.url).unwrap_or_default();
        package.package_type = entry.package_type.unwrap_or_default();
        package
    }
}

/// Loads the installed packages from a lock file.
///
/// Packages are keyed by name: a later entry replaces an earlier one but
/// keeps its position. With `include_dev`, `packages-dev` entries follow
/// the regular ones.
///
/// # Errors
///
/// Returns [`AuditError::ManifestNotFound`] if `path` is not a file, and
/// an I/O or parse error if it cannot be read as a lock file.
pub fn load_lock_file(path: &Path, include_dev: bool) -> Result<Vec<Package>, AuditError> {
    if !path.is_file() {
        return Err(AuditError::ManifestNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| AuditError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_lock(&content, include_dev).map_err(|source| AuditError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses lock file content into packages, see [`load_lock_file`].
pub fn parse_lock(content: &str, include_dev: bool) -> Result<Vec<Package>, serde_json::Error> {
    let lock: LockFile = serde_json::from_str(content)?;

    let mut entries = lock.packages.unwrap_or_default();
    if include_dev {
        entries.extend(lock.packages_dev.unwrap_or_default());
    }

    let mut packages: IndexMap<String, Package> = IndexMap::new();
    for entry in entries {
        let package = Package::from(entry);
        packages.insert(package.name.clone(), package);
    }

    Ok(packages.into_values().collect())
}
