//! Pricing Catalog Loader
//!
//! Reads the static pricing dumps from local storage into immutable in-memory
//! catalogs. Each catalog is loaded on first use and shared for the lifetime of
//! the [`CatalogLoader`] that produced it.
//!
//! | Provider | File (relative to the data dir) | Format |
//! |----------|---------------------------------|--------|
//! | AWS | `aws/offers-ec2-us-east-1.json.gz` | gzip JSON offer file (products / terms) |
//! | GCP | `gcp/ondemand-pricing.csv` | CSV SKU table, optionally gzip compressed |

pub mod aws;
pub mod gcp;

pub use aws::{AwsOfferCatalog, OfferTerm, PriceDimension, Product};
pub use gcp::{GcpSkuCatalog, SkuRow};

use flate2::read::GzDecoder;
use once_cell::sync::OnceCell;
use observability::CostMetrics;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::error::{PricingError, PricingResult};
use crate::models::CloudProvider;

pub const AWS_OFFERS_FILE: &str = "aws/offers-ec2-us-east-1.json.gz";
pub const GCP_SKUS_FILE: &str = "gcp/ondemand-pricing.csv";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Anything whose named attributes can be matched by an [`AttributeFilter`]
pub trait AttributeSource {
    fn attribute(&self, key: &str) -> Option<&str>;
}

/// A single predicate over a catalog entry's attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeFilter {
    /// Attribute equals the value exactly
    Equals { key: String, value: String },
    /// Attribute ends with the suffix (usage types carry region prefixes)
    EndsWith { key: String, suffix: String },
}

impl AttributeFilter {
    pub fn eq(key: impl Into<String>, value: impl Into<String>) -> Self {
        AttributeFilter::Equals {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn ends_with(key: impl Into<String>, suffix: impl Into<String>) -> Self {
        AttributeFilter::EndsWith {
            key: key.into(),
            suffix: suffix.into(),
        }
    }

    pub fn matches<S: AttributeSource + ?Sized>(&self, entry: &S) -> bool {
        match self {
            AttributeFilter::Equals { key, value } => entry.attribute(key) == Some(value.as_str()),
            AttributeFilter::EndsWith { key, suffix } => entry
                .attribute(key)
                .is_some_and(|actual| actual.ends_with(suffix.as_str())),
        }
    }

    pub fn matches_all<S: AttributeSource + ?Sized>(filters: &[AttributeFilter], entry: &S) -> bool {
        filters.iter().all(|f| f.matches(entry))
    }
}

/// Read a pricing file, transparently inflating gzip content
pub(crate) fn read_catalog_file(provider: CloudProvider, path: &Path) -> PricingResult<Vec<u8>> {
    if !path.is_file() {
        CostMetrics::record_catalog_unavailable(&provider.to_string(), &path.display().to_string());
        return Err(PricingError::CatalogUnavailable {
            provider,
            path: path.display().to_string(),
        });
    }

    let parse_error = |e: std::io::Error| PricingError::CatalogParse {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let raw = std::fs::read(path).map_err(parse_error)?;
    if !raw.starts_with(&GZIP_MAGIC) {
        return Ok(raw);
    }

    let mut inflated = Vec::with_capacity(raw.len() * 8);
    GzDecoder::new(raw.as_slice())
        .read_to_end(&mut inflated)
        .map_err(parse_error)?;

    debug!(
        path = %path.display(),
        compressed = raw.len(),
        inflated = inflated.len(),
        "Decompressed pricing file"
    );

    Ok(inflated)
}

/// Locations of the pricing files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    pub aws_offers: PathBuf,
    pub gcp_skus: PathBuf,
}

impl CatalogSource {
    /// Standard file layout under a pricing data directory
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            aws_offers: data_dir.join(AWS_OFFERS_FILE),
            gcp_skus: data_dir.join(GCP_SKUS_FILE),
        }
    }

    pub fn path_for(&self, provider: CloudProvider) -> &Path {
        match provider {
            CloudProvider::Aws => &self.aws_offers,
            CloudProvider::Gcp => &self.gcp_skus,
        }
    }
}

/// Loads each provider's catalog once and hands out shared references
#[derive(Debug)]
pub struct CatalogLoader {
    source: CatalogSource,
    aws: OnceCell<Arc<AwsOfferCatalog>>,
    gcp: OnceCell<Arc<GcpSkuCatalog>>,
}

impl CatalogLoader {
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            aws: OnceCell::new(),
            gcp: OnceCell::new(),
        }
    }

    pub fn from_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(CatalogSource::in_dir(data_dir))
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// AWS EC2 offer file; read and parsed on the first call only
    pub fn aws(&self) -> PricingResult<Arc<AwsOfferCatalog>> {
        self.aws
            .get_or_try_init(|| {
                let started = Instant::now();
                let catalog = AwsOfferCatalog::load(&self.source.aws_offers)?;
                CostMetrics::record_catalog_loaded(
                    "aws",
                    catalog.products().len(),
                    started.elapsed().as_secs_f64(),
                );
                Ok(Arc::new(catalog))
            })
            .cloned()
    }

    /// GCP SKU table; read and parsed on the first call only
    pub fn gcp(&self) -> PricingResult<Arc<GcpSkuCatalog>> {
        self.gcp
            .get_or_try_init(|| {
                let started = Instant::now();
                let catalog = GcpSkuCatalog::load(&self.source.gcp_skus)?;
                CostMetrics::record_catalog_loaded(
                    "gcp",
                    catalog.rows().len(),
                    started.elapsed().as_secs_f64(),
                );
                Ok(Arc::new(catalog))
            })
            .cloned()
    }
}
