use std::path::PathBuf;

use thiserror::Error;

use crate::registry::TransportError;

/// Failures that abort an audit.
///
/// Anything not listed here degrades to "unknown" or "not flagged" for the
/// affected package instead of stopping the run.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("{} file does not exist", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error connection: {url}, only compatible with software https://github.com/composer/packagist")]
    RegistryUnreachable {
        url: String,
        #[source]
        source: TransportError,
    },
}
