use crate::{env_or_default, ConfigError, FromEnv};
use std::path::{Path, PathBuf};

/// Default location of the local pricing dumps, relative to the working directory
pub const DEFAULT_PRICING_DATA_DIR: &str = "./resources";

/// Where the local pricing catalogs live
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricingDataConfig {
    pub data_dir: PathBuf,
}

impl PricingDataConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl FromEnv for PricingDataConfig {
    /// Reads from environment variables with sensible defaults:
    /// - PRICING_DATA_DIR: defaults to ./resources
    fn from_env() -> Result<Self, ConfigError> {
        let data_dir = env_or_default("PRICING_DATA_DIR", DEFAULT_PRICING_DATA_DIR);
        if data_dir.trim().is_empty() {
            return Err(ConfigError::ParseError {
                key: "PRICING_DATA_DIR".to_string(),
                details: "must not be empty".to_string(),
            });
        }

        Ok(Self::new(data_dir))
    }
}

impl Default for PricingDataConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PRICING_DATA_DIR)
    }
}
