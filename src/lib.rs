pub mod checker;
pub mod config;
pub mod error;
pub mod manifest;
pub mod model;
pub mod output;
pub mod registry;

pub use checker::{CheckOptions, PackagistChecker};
pub use config::Config;
pub use error::AuditError;
pub use model::{AuditReport, Filter, Package};
pub use registry::RegistryClient;
