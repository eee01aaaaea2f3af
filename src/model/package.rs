use crate::checker::version::supports_semantic_versioning;

/// A dependency installed through Composer.
///
/// The informational fields start out with the values from `composer.lock`
/// and are overwritten by Packagist metadata once the registry confirms the
/// exact name and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub version_normalized: String,
    pub description: String,
    pub source_url: String,
    pub package_type: String,
    /// Packagist returned metadata for this exact name and version.
    pub registry_known: bool,
    /// Packagist lists the next patch release of the installed version.
    pub has_bug: bool,
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            version_normalized: String::new(),
            description: String::new(),
            source_url: String::new(),
            package_type: String::new(),
            registry_known: false,
            has_bug: false,
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_type(mut self, package_type: impl Into<String>) -> Self {
        self.package_type = package_type.into();
        self
    }

    /// Whether the installed version has exactly three dot-separated parts.
    pub fn follows_semver(&self) -> bool {
        supports_semantic_versioning(&self.version)
    }
}
