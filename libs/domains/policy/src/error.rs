use domain_pricing::PricingError;
use thiserror::Error;

/// Result type for policy evaluation
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Errors that abort a policy evaluation
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Cost data could not be produced (missing or corrupt catalog)
    #[error("Cost estimation failed: {0}")]
    Pricing(#[from] PricingError),

    /// Policy configuration is unusable
    #[error("Invalid configuration for policy [{policy}]: {reason}")]
    InvalidConfig { policy: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_pricing::CloudProvider;

    #[test]
    fn test_pricing_error_converts() {
        let err: PolicyError = PricingError::CatalogUnavailable {
            provider: CloudProvider::Gcp,
            path: "gcp/ondemand-pricing.csv".to_string(),
        }
        .into();

        assert!(err.to_string().contains("gcp/ondemand-pricing.csv"));
    }
}
