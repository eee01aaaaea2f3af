use chrono::{DateTime, Utc};

use super::Package;

/// Which packages an audit hands back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    /// Every package from the manifest, flagged or not.
    #[default]
    All,
    /// Only packages with a newer patch release on Packagist.
    BugsOnly,
}

/// Result of one audit run.
#[derive(Debug, Clone)]
pub struct AuditReport {
    pub checked_at: DateTime<Utc>,
    pub packages: Vec<Package>,
    has_bugs: bool,
}

impl AuditReport {
    /// Builds a report, deriving the aggregate flag from the packages.
    pub fn new(packages: Vec<Package>) -> Self {
        let has_bugs = packages.iter().any(|p| p.has_bug);
        Self {
            checked_at: Utc::now(),
            packages,
            has_bugs,
        }
    }

    /// Builds a report whose aggregate flag was computed before filtering.
    pub(crate) fn with_flag(packages: Vec<Package>, has_bugs: bool) -> Self {
        Self {
            checked_at: Utc::now(),
            packages,
            has_bugs,
        }
    }

    /// Whether any package of this run is behind a patch release.
    pub fn has_bugs(&self) -> bool {
        self.has_bugs
    }

    pub fn bug_count(&self) -> usize {
        self.packages.iter().filter(|p| p.has_bug).count()
    }
}
