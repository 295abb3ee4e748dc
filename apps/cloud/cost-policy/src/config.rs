//! Configuration for the cost policy runner

use core_config::pricing::PricingDataConfig;
use core_config::{env_list, env_parse, Environment, FromEnv};
use domain_policy::{
    PolicyConfig, DEFAULT_MAX_MONTHLY_COST, DEFAULT_MAX_SUBNET_PREFIX_LENGTH,
    DEFAULT_REQUIRED_INSTANCE_TAGS,
};
use domain_pricing::Decimal;
use eyre::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub pricing: PricingDataConfig,
    pub policy: PolicyConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let max_monthly_cost: Decimal = env_parse("MAX_MONTHLY_COST", DEFAULT_MAX_MONTHLY_COST)?;
        let max_subnet_prefix_length: u8 =
            env_parse("MAX_SUBNET_PREFIX_LENGTH", DEFAULT_MAX_SUBNET_PREFIX_LENGTH)?;

        let config = Config {
            environment: Environment::from_env(),
            pricing: <PricingDataConfig as FromEnv>::from_env()?,
            policy: PolicyConfig {
                max_monthly_cost,
                max_subnet_prefix_length,
                required_instance_tags: env_list("REQUIRED_INSTANCE_TAGS", &DEFAULT_REQUIRED_INSTANCE_TAGS),
            },
        };
        config.validate()?;

        Ok(config)
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, max_monthly_cost: Option<Decimal>) -> Result<Self> {
        if let Some(dir) = data_dir {
            self.pricing = PricingDataConfig::new(dir);
        }
        if let Some(cost) = max_monthly_cost {
            self.policy.max_monthly_cost = cost;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        self.policy.validate()?;
        Ok(())
    }
}
