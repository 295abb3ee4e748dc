//! Price Cache
//!
//! Memoizes resolver results per shape for the lifetime of the cache. A
//! shape is scanned at most once; later lookups, priced or not, are served
//! from memory. Errors that are not about the shape itself (catalog missing
//! or unreadable) are never cached.

use observability::{CostMetrics, ResolutionTimer};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::PricingResult;
use crate::models::{FlatCharge, PriceEntry};
use crate::resolver::PriceResolver;

/// Outcome of a cached lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceLookup {
    Priced(PriceEntry),
    /// No usable price; `reason` explains why
    Unpriced { reason: String },
}

impl PriceLookup {
    pub fn entry(&self) -> Option<&PriceEntry> {
        match self {
            PriceLookup::Priced(entry) => Some(entry),
            PriceLookup::Unpriced { .. } => None,
        }
    }

    pub fn is_priced(&self) -> bool {
        matches!(self, PriceLookup::Priced(_))
    }
}

/// Lookup counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Shape(String),
    Flat(FlatCharge),
}

/// Per-shape memoization in front of a [`PriceResolver`]
#[derive(Debug)]
pub struct PriceCache<R> {
    resolver: R,
    entries: HashMap<CacheKey, PriceLookup>,
    stats: CacheStats,
}

impl<R: PriceResolver> PriceCache<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of distinct shapes and charges seen so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Price of one unit of `shape`, resolving it on the first request only
    pub fn resolve(&mut self, shape: &str) -> PricingResult<PriceLookup> {
        self.lookup(CacheKey::Shape(shape.to_string()), shape, |resolver| resolver.resolve(shape))
    }

    /// Price of a flat charge, resolving it on the first request only
    pub fn resolve_flat(&mut self, charge: FlatCharge) -> PricingResult<PriceLookup> {
        let label = charge.to_string();
        self.lookup(CacheKey::Flat(charge), &label, |resolver| resolver.resolve_flat(charge))
    }

    fn lookup(
        &mut self,
        key: CacheKey,
        label: &str,
        resolve: impl FnOnce(&R) -> PricingResult<PriceEntry>,
    ) -> PricingResult<PriceLookup> {
        let provider = self.resolver.provider().to_string();

        if let Some(cached) = self.entries.get(&key) {
            self.stats.hits += 1;
            CostMetrics::record_cache_hit(&provider);
            debug!(provider = %provider, shape = label, "Price cache hit");
            return Ok(cached.clone());
        }

        self.stats.misses += 1;
        let mut timer = ResolutionTimer::new(&provider);
        let resolved = resolve(&self.resolver);
        timer.stop();

        let lookup = match resolved {
            Ok(entry) => PriceLookup::Priced(entry),
            Err(e) if e.is_recoverable() => {
                CostMetrics::record_unpriced_shape(&provider);
                warn!(provider = %provider, shape = label, error = %e, "Shape could not be priced");
                PriceLookup::Unpriced { reason: e.to_string() }
            }
            Err(e) => return Err(e),
        };

        debug!(provider = %provider, shape = label, priced = lookup.is_priced(), "Price cache miss");
        self.entries.insert(key, lookup.clone());
        Ok(lookup)
    }
}
