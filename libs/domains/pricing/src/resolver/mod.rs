//! SKU Resolver
//!
//! Maps a shape descriptor (`m5.large`, `n1-standard-16`) onto the catalog
//! entry that prices it. One implementation per catalog format, selected by
//! [`CloudProvider`] through [`resolver_for`].

pub mod flat_csv;
pub mod nested_json;

pub use flat_csv::FlatCsvResolver;
pub use nested_json::NestedJsonResolver;

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::catalog::CatalogLoader;
use crate::error::{PricingError, PricingResult};
use crate::models::{CloudProvider, FlatCharge, PriceEntry};

/// Resolves on-demand prices from one provider's catalog.
///
/// Implementations are pure functions of (catalog, shape): the same input
/// always yields the same entry or the same error.
#[cfg_attr(test, mockall::automock)]
pub trait PriceResolver {
    /// Provider whose catalog backs this resolver
    fn provider(&self) -> CloudProvider;

    /// Price of one unit of `shape`
    fn resolve(&self, shape: &str) -> PricingResult<PriceEntry>;

    /// Price of a charge that has no shape descriptor
    fn resolve_flat(&self, charge: FlatCharge) -> PricingResult<PriceEntry> {
        match charge.fixed_hourly_rate() {
            Some(rate) => Ok(PriceEntry::from_hourly(charge.to_string(), charge.to_string(), rate)),
            None => Err(PricingError::no_match(
                charge.to_string(),
                format!("{} catalog does not price this charge", self.provider()),
            )),
        }
    }
}

impl<R: PriceResolver + ?Sized> PriceResolver for Box<R> {
    fn provider(&self) -> CloudProvider {
        (**self).provider()
    }

    fn resolve(&self, shape: &str) -> PricingResult<PriceEntry> {
        (**self).resolve(shape)
    }

    fn resolve_flat(&self, charge: FlatCharge) -> PricingResult<PriceEntry> {
        (**self).resolve_flat(charge)
    }
}

/// Build the resolver for `provider`, loading its catalog if needed
pub fn resolver_for(
    provider: CloudProvider,
    loader: &CatalogLoader,
) -> PricingResult<Box<dyn PriceResolver>> {
    Ok(match provider {
        CloudProvider::Aws => Box::new(NestedJsonResolver::new(loader.aws()?)),
        CloudProvider::Gcp => Box::new(FlatCsvResolver::new(loader.gcp()?)),
    })
}

/// Parse a catalog price string. Tolerates a leading `$` and thousands separators.
pub(crate) fn parse_price(sku: &str, raw: &str) -> PricingResult<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    Decimal::from_str(&cleaned)
        .ok()
        .filter(|price| !price.is_sign_negative())
        .ok_or_else(|| PricingError::InvalidPrice {
            sku: sku.to_string(),
            value: raw.to_string(),
        })
}
