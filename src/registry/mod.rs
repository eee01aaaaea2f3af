//! Packagist registry client.
//!
//! The client queries `{endpoint}/p/{name}.json` once per package with at
//! most [`MAX_CONCURRENT_REQUESTS`] requests in flight. Failed requests are
//! dropped from the result, so a package whose query failed looks exactly
//! like one Packagist does not know.
//!
//! # Example
//!
//! ```no_run
//! use packagist_checker::registry::RegistryClient;
//! use packagist_checker::Package;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = RegistryClient::default();
//!     let responses = client.fetch_all(&[Package::new("psr/log", "1.0.0")]).await?;
//!     println!("Packagist answered {} queries", responses.len());
//!     Ok(())
//! }
//! ```

mod http;

pub use http::HttpTransport;

use std::collections::HashMap;

use async_trait::async_trait;
use futures::future;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::error::AuditError;
use crate::model::Package;

/// The public Packagist instance. Requests against it skip the pre-flight probe.
pub const DEFAULT_PACKAGIST_URL: &str = "https://packagist.org";

/// Upper bound on simultaneously outstanding package queries.
pub const MAX_CONCURRENT_REQUESTS: usize = 10;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// HTTP seam of the registry client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and decodes the body as JSON.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, TransportError>;

    /// Checks that `url` answers with a success status.
    async fn probe(&self, url: &str) -> Result<(), TransportError>;
}

/// Decoded body of `/p/{name}.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryResponse {
    #[serde(default)]
    pub packages: HashMap<String, HashMap<String, VersionMetadata>>,
}

impl RegistryResponse {
    /// Metadata for an exact name and version pair.
    pub fn metadata(&self, name: &str, version: &str) -> Option<&VersionMetadata> {
        self.packages.get(name)?.get(version)
    }

    /// Whether the registry lists `version` for package `name`.
    pub fn has_version(&self, name: &str, version: &str) -> bool {
        self.metadata(name, version).is_some()
    }
}

/// Metadata Packagist publishes for one version of a package.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionMetadata {
    pub version_normalized: Option<String>,
    pub description: Option<String>,
    pub source: Option<SourceMetadata>,
    #[serde(rename = "type")]
    pub package_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceMetadata {
    pub url: Option<String>,
}

impl VersionMetadata {
    /// Overwrites the informational fields of `package` with registry data.
    ///
    /// Fields the registry leaves out keep their manifest value.
    pub fn apply_to(&self, package: &mut Package) {
        if let Some(normalized) = &self.version_normalized {
            package.version_normalized = normalized.clone();
        }
        if let Some(description) = &self.description {
            package.description = description.clone();
        }
        if let Some(url) = self.source.as_ref().and_then(|s| s.url.as_ref()) {
            package.source_url = url.clone();
        }
        if let Some(package_type) = &self.package_type {
            package.package_type = package_type.clone();
        }
    }
}

pub struct RegistryClient {
    transport: Box<dyn Transport>,
    endpoint: String,
}

impl RegistryClient {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            endpoint: DEFAULT_PACKAGIST_URL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.configure(endpoint);
        self
    }

    /// Sets the registry base URL. A trailing slash is ignored.
    pub fn configure(&mut self, endpoint: &str) {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_default_endpoint(&self) -> bool {
        self.endpoint == DEFAULT_PACKAGIST_URL
    }

    /// Queries the registry for every package and returns the answers that
    /// arrived intact, in completion order.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::RegistryUnreachable`] if a custom endpoint fails
    /// the pre-flight probe. Individual package failures are never errors.
    pub async fn fetch_all(&self, packages: &[Package]) -> Result<Vec<RegistryResponse>, AuditError> {
        if !self.is_default_endpoint() {
            self.preflight().await?;
        }

        let responses: Vec<RegistryResponse> = stream::iter(packages)
            .map(|package| self.fetch_package(&package.name))
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .filter_map(future::ready)
            .collect()
            .await;

        debug!(
            endpoint = %self.endpoint,
            requested = packages.len(),
            received = responses.len(),
            "Packagist queries finished"
        );

        Ok(responses)
    }

    async fn preflight(&self) -> Result<(), AuditError> {
        let url = format!("{}/packages/list.json", self.endpoint);
        debug!(%url, "Probing custom Packagist endpoint");

        self.transport
            .probe(&url)
            .await
            .map_err(|source| AuditError::RegistryUnreachable {
                url: self.endpoint.clone(),
                source,
            })
    }

    async fn fetch_package(&self, name: &str) -> Option<RegistryResponse> {
        let url = format!("{}/p/{}.json", self.endpoint, name);
        let body = self.transport.get_json(&url).await.ok()?;
        serde_json::from_value(body).ok()
    }
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new(Box::new(HttpTransport::new()))
    }
}
