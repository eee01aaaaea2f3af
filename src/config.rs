//! Configuration file handling.
//!
//! This module provides loading and saving of packagist-checker
//! configuration from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/packagist-checker/config.toml`
//! - macOS: `~/Library/Application Support/packagist-checker/config.toml`
//! - Windows: `%APPDATA%\packagist-checker\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! packagist_url = "https://packagist.example.com"
//! default_format = "text"
//! only_bugs = false
//! include_dev = true
//!
//! [ignore]
//! packages = ["symfony/polyfill-*", "acme/internal"]
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::registry::DEFAULT_PACKAGIST_URL;

/// Application configuration.
///
/// Command-line flags take precedence over every value here.
///
/// # Example
///
/// ```no_run
/// use packagist_checker::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Packagist: {}", config.packagist_url);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Packagist instance to query.
    ///
    /// Default: `https://packagist.org`
    pub packagist_url: String,

    /// Report format when no `--format` flag is provided.
    ///
    /// Valid values: "text", "json"
    /// Default: "text"
    pub default_format: String,

    /// Report only packages with a newer patch release.
    ///
    /// Default: false
    pub only_bugs: bool,

    /// Also audit `packages-dev` from the lock file.
    ///
    /// Default: false
    pub include_dev: bool,

    /// Packages excluded from the audit.
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// Packages to leave out of the audit, e.g. internal forks that
/// intentionally stay on an older patch release.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Package names or `*` glob patterns (e.g. "symfony/polyfill-*").
    pub packages: Vec<String>,
}

impl IgnoreConfig {
    /// Check if a package should be ignored.
    pub fn should_ignore_package(&self, name: &str) -> bool {
        self.packages.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, name)
            } else {
                pattern == name
            }
        })
    }
}

/// Simple glob matching (supports * as wildcard).
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];

    if text.len() < first.len() + last.len() || !text.starts_with(first) || !text.ends_with(last) {
        return false;
    }

    let mut remaining = &text[first.len()..text.len() - last.len()];
    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            packagist_url: DEFAULT_PACKAGIST_URL.to_string(),
            default_format: "text".to_string(),
            only_bugs: false,
            include_dev: false,
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("packagist-checker")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
