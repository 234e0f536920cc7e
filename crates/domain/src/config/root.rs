use serde::{Deserialize, Serialize};

use super::cluster::ClusterConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::sdn::{CspCredentials, SdnConfig};

/// Root configuration, loaded from an optional TOML file and overlaid with
/// CLI overrides, mirroring the shape of every other config in this
/// workspace: `Config::load(path, overrides)` then `Config::validate()`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sdn: SdnConfig,
    #[serde(default)]
    pub csp: CspCredentials,
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Command-line overrides applied on top of the loaded file, in the style
/// of `clap`-derived flags. Each `Some` wins over the file's value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub sdn_base_url: Option<String>,
    pub cluster_cidr: Option<String>,
    pub subnet_length: Option<u8>,
    pub license_file: Option<String>,
}

impl Config {
    /// Loads `path` (if given) as TOML, falling back to an all-defaults
    /// config when no path is given, then applies `overrides`.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let contents =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                        path: path.to_string(),
                        source,
                    })?;
                toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: path.to_string(),
                    source,
                })?
            }
            None => Config::default(),
        };

        if let Some(url) = overrides.sdn_base_url {
            config.sdn.base_url = url;
        }
        if let Some(cidr) = overrides.cluster_cidr {
            config.cluster.cidr = cidr;
        }
        if let Some(len) = overrides.subnet_length {
            config.cluster.subnet_length = len;
        }
        if let Some(license) = overrides.license_file {
            config.cluster.license_file = Some(license);
        }

        Ok(config)
    }

    /// Checks the loaded configuration is internally consistent. Does not
    /// re-derive the clamped subnet length — that happens lazily via
    /// [`ClusterConfig::parsed_cidr_and_subnet_length`] — only that the raw
    /// fields parse at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sdn.base_url.is_empty() {
            return Err(ConfigError::Invalid("sdn.base_url must not be empty".into()));
        }
        if self.sdn.version.is_empty() {
            return Err(ConfigError::Invalid("sdn.version must not be empty".into()));
        }
        self.cluster
            .parsed_cidr_and_subnet_length()
            .map_err(|e| ConfigError::Invalid(format!("cluster.cidr: {e}")))?;
        Ok(())
    }
}
