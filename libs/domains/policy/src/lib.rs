//! Policy Domain
//!
//! Checks a proposed deployment before it is applied: cost limits, network
//! sizing, required tags and bucket hardening.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_cloud_resources::ResourceGraph;
//! use domain_policy::{standard_pack, PolicyConfig};
//! use domain_pricing::CatalogLoader;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = ResourceGraph::from_file("preview.json")?;
//! let mut pack = standard_pack(CatalogLoader::from_dir("./resources"), &PolicyConfig::default());
//!
//! let report = pack.evaluate(&graph)?;
//! for violation in &report.violations {
//!     eprintln!("[{}] {}: {}", violation.enforcement_level, violation.policy, violation.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod budget;
pub mod compute;
pub mod error;
pub mod models;
pub mod pack;
pub mod storage;

use domain_pricing::{CatalogLoader, CloudProvider, Decimal};
use strum::IntoEnumIterator;

// Re-export commonly used types
pub use budget::{BudgetLimit, CostEstimate, DEFAULT_MAX_MONTHLY_COST};
pub use compute::{
    RequiredTags, SubnetSizing, DEFAULT_MAX_SUBNET_PREFIX_LENGTH, DEFAULT_REQUIRED_INSTANCE_TAGS,
};
pub use error::{PolicyError, PolicyResult};
pub use models::{EnforcementLevel, Finding, PolicyReport, Violation};
pub use pack::{Policy, PolicyContext, PolicyPack};
pub use storage::{
    KmsEncryptionEnabled, PublicReadProhibited, StaticWebsiteProhibited, VersioningEnabled,
};

/// Name of the pack built by [`standard_pack`]
pub const STANDARD_PACK_NAME: &str = "infrastructure-guardrails";

/// Tunables of the standard pack
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    /// `maxMonthlyCost` of the budget policies, in USD
    pub max_monthly_cost: Decimal,
    pub max_subnet_prefix_length: u8,
    pub required_instance_tags: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_monthly_cost: DEFAULT_MAX_MONTHLY_COST,
            max_subnet_prefix_length: DEFAULT_MAX_SUBNET_PREFIX_LENGTH,
            required_instance_tags: DEFAULT_REQUIRED_INSTANCE_TAGS
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

impl PolicyConfig {
    /// Reject tunables no policy can enforce
    pub fn validate(&self) -> PolicyResult<()> {
        if self.max_monthly_cost.is_sign_negative() {
            return Err(PolicyError::InvalidConfig {
                policy: "budget-limit".to_string(),
                reason: format!("maxMonthlyCost must not be negative, got {}", self.max_monthly_cost),
            });
        }
        if self.max_subnet_prefix_length > 32 {
            return Err(PolicyError::InvalidConfig {
                policy: "subnet-sizing".to_string(),
                reason: format!(
                    "maxSubnetPrefixLength must be between 0 and 32, got {}",
                    self.max_subnet_prefix_length
                ),
            });
        }
        Ok(())
    }
}

/// Every policy: per-provider cost policies, compute and S3 policies
pub fn standard_pack(loader: CatalogLoader, config: &PolicyConfig) -> PolicyPack {
    let mut pack = PolicyPack::new(STANDARD_PACK_NAME, loader);

    for provider in CloudProvider::iter() {
        pack.register(Box::new(BudgetLimit::new(provider, config.max_monthly_cost)));
        pack.register(Box::new(CostEstimate::new(provider)));
    }

    pack.with_policy(SubnetSizing::new(config.max_subnet_prefix_length))
        .with_policy(RequiredTags::new(config.required_instance_tags.iter().cloned()))
        .with_policy(PublicReadProhibited)
        .with_policy(VersioningEnabled)
        .with_policy(StaticWebsiteProhibited)
        .with_policy(KmsEncryptionEnabled)
}
