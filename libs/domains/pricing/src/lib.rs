//! Pricing Domain
//!
//! Local on-demand pricing catalogs and the lookups that turn a shape
//! descriptor into a unit price.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │ PriceCache  │  ← Memoizes one lookup per shape
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Resolver   │  ← Shape → SKU → hourly price (trait + per-format impls)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Catalog   │  ← Immutable in-memory pricing dumps, loaded once
//! └─────────────┘
//! ```

pub mod cache;
pub mod catalog;
pub mod error;
pub mod models;
pub mod resolver;

// Re-export commonly used types
pub use cache::{CacheStats, PriceCache, PriceLookup};
pub use catalog::{
    AttributeFilter, AwsOfferCatalog, CatalogLoader, CatalogSource, GcpSkuCatalog,
};
pub use error::{PricingError, PricingResult};
pub use models::{monthly_from_hourly, CloudProvider, FlatCharge, PriceEntry, HOURS_PER_MONTH};
pub use resolver::{resolver_for, FlatCsvResolver, NestedJsonResolver, PriceResolver};

// Decimal is part of the public API
pub use rust_decimal::Decimal;
