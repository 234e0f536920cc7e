//! Configuration module for the controller.
//!
//! - `root`: main configuration and CLI overrides
//! - `sdn`: SDN client connection settings and bootstrap credentials
//! - `cluster`: cluster CIDR, subnet sizing, enterprise/domain naming
//! - `logging`: logging settings
//! - `errors`: configuration errors

pub mod cluster;
pub mod errors;
pub mod logging;
pub mod root;
pub mod sdn;

pub use cluster::ClusterConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use sdn::{CspCredentials, SdnConfig};
