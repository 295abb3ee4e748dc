use thiserror::Error;

use crate::models::CloudProvider;

/// Result type for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur while loading catalogs or resolving prices
#[derive(Debug, Error)]
pub enum PricingError {
    /// Local pricing file is missing. Fatal: there is no network fallback.
    #[error("Unable to load local pricing file [{path}] for {provider}")]
    CatalogUnavailable { provider: CloudProvider, path: String },

    /// Pricing file exists but could not be read or decoded
    #[error("Pricing file [{path}] could not be parsed: {reason}")]
    CatalogParse { path: String, reason: String },

    /// No catalog entry matched the shape
    #[error("No price found for [{shape}]: {reason}")]
    NoPriceMatch { shape: String, reason: String },

    /// Matched catalog entry carries a price that is not a decimal number
    #[error("Invalid price [{value}] for SKU [{sku}]")]
    InvalidPrice { sku: String, value: String },
}

impl PricingError {
    pub fn no_match(shape: impl Into<String>, reason: impl Into<String>) -> Self {
        PricingError::NoPriceMatch {
            shape: shape.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error only affects one shape, leaving the rest of an estimate usable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PricingError::NoPriceMatch { .. } | PricingError::InvalidPrice { .. }
        )
    }
}
