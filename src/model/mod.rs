//! Core data types for audited packages and audit results.
//!
//! This module contains the fundamental types used throughout packagist-checker:
//!
//! - [`Package`] - A dependency read from `composer.lock`
//! - [`Filter`] - Which packages an audit returns
//! - [`AuditReport`] - Complete audit results
//!
//! # Example
//!
//! ```
//! use packagist_checker::{AuditReport, Package};
//!
//! let package = Package::new("psr/log", "1.0.0");
//! let report = AuditReport::new(vec![package]);
//!
//! println!("Audited {} packages", report.packages.len());
//! assert!(!report.has_bugs());
//! ```

mod package;
mod report;

pub use package::*;
pub use report::*;
