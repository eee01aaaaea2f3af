//! Dependency audit against Packagist.
//!
//! [`PackagistChecker`] loads a lock file, queries the registry for every
//! package, and flags the packages for which Packagist already lists the
//! next patch release.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use packagist_checker::checker::{CheckOptions, PackagistChecker};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let checker = PackagistChecker::new();
//!     let report = checker.check(Path::new("composer.lock"), &CheckOptions::default()).await?;
//!
//!     for package in report.packages.iter().filter(|p| p.has_bug) {
//!         println!("{} {} has a newer patch release", package.name, package.version);
//!     }
//!     Ok(())
//! }
//! ```

pub mod version;

pub use version::{
    classify, next_patch_version, supports_semantic_versioning, PatchPolicy, VersionError,
};

use std::path::Path;

use tracing::debug;

use crate::config::IgnoreConfig;
use crate::error::AuditError;
use crate::manifest::load_lock_file;
use crate::model::{AuditReport, Filter, Package};
use crate::registry::{RegistryClient, RegistryResponse};

/// Options for [`PackagistChecker::check`].
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub filter: Filter,
    /// Also audit `packages-dev`.
    pub include_dev: bool,
    /// Packages left out of the audit entirely.
    pub ignore: IgnoreConfig,
}

pub struct PackagistChecker {
    client: RegistryClient,
}

impl PackagistChecker {
    pub fn new() -> Self {
        Self {
            client: RegistryClient::default(),
        }
    }

    pub fn with_client(client: RegistryClient) -> Self {
        Self { client }
    }

    pub fn set_packagist_url(&mut self, url: &str) {
        self.client.configure(url);
    }

    pub fn packagist_url(&self) -> &str {
        self.client.endpoint()
    }

    /// Audits the packages of a lock file.
    ///
    /// # Errors
    ///
    /// Fails if the lock file is missing or unreadable, or if a custom
    /// registry endpoint is unreachable.
    pub async fn check(&self, lock_file: &Path, options: &CheckOptions) -> Result<AuditReport, AuditError> {
        let packages: Vec<Package> = load_lock_file(lock_file, options.include_dev)?
            .into_iter()
            .filter(|p| {
                let ignored = options.ignore.should_ignore_package(&p.name);
                if ignored {
                    debug!(package = %p.name, "Skipping ignored package");
                }
                !ignored
            })
            .collect();

        self.audit(packages, options.filter).await
    }

    /// Queries the registry for `packages` and flags patch-level updates.
    ///
    /// The aggregate flag of the returned report covers every package, even
    /// when `filter` hides the unflagged ones.
    pub async fn audit(&self, mut packages: Vec<Package>, filter: Filter) -> Result<AuditReport, AuditError> {
        let responses = self.client.fetch_all(&packages).await?;
        let has_bugs = reconcile(&mut packages, &responses);

        let packages = match filter {
            Filter::All => packages,
            Filter::BugsOnly => packages.into_iter().filter(|p| p.has_bug).collect(),
        };

        Ok(AuditReport::with_flag(packages, has_bugs))
    }
}

impl Default for PackagistChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies registry answers to the packages they describe.
///
/// Each response updates the first package whose exact name and version it
/// lists; responses matching no package are ignored. Returns true if any
/// package was flagged.
fn reconcile(packages: &mut [Package], responses: &[RegistryResponse]) -> bool {
    let mut has_bugs = false;

    for response in responses {
        let matched = packages.iter_mut().find_map(|package| {
            let metadata = response.metadata(&package.name, &package.version)?;
            Some((package, metadata))
        });

        let Some((package, metadata)) = matched else {
            continue;
        };

        package.registry_known = true;
        metadata.apply_to(package);

        match classify(&package.version) {
            PatchPolicy::NextPatch(next) => {
                if response.has_version(&package.name, &next) {
                    debug!(package = %package.name, installed = %package.version, %next, "Newer patch release available");
                    package.has_bug = true;
                    has_bugs = true;
                }
            }
            PatchPolicy::NotApplicable => {}
            PatchPolicy::Malformed => {
                debug!(package = %package.name, version = %package.version, "Patch component is not numeric");
            }
        }
    }

    has_bugs
}
