//! AWS bulk offer file (`offers/v1.0/aws/AmazonEC2/current/<region>/index.json`).
//!
//! Only the parts the resolver needs are kept: every product with its string
//! attributes, in document order, and the `OnDemand` terms keyed by SKU.

use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::{read_catalog_file, AttributeFilter, AttributeSource};
use crate::error::{PricingError, PricingResult};
use crate::models::CloudProvider;

/// One product of the offer file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub sku: String,
    #[serde(rename = "productFamily", default)]
    pub product_family: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl AttributeSource for Product {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// One offer term (e.g. `<sku>.JRTCKXETXF`) of a SKU
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OfferTerm {
    #[serde(rename = "priceDimensions", default)]
    pub price_dimensions: HashMap<String, PriceDimension>,
}

/// One rate of an offer term (e.g. `<sku>.JRTCKXETXF.6YS6EN2CT7`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceDimension {
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "pricePerUnit", default)]
    pub price_per_unit: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OfferFile {
    #[serde(default)]
    products: IndexMap<String, Product>,
    #[serde(default)]
    terms: OfferFileTerms,
}

#[derive(Debug, Default, Deserialize)]
struct OfferFileTerms {
    #[serde(rename = "OnDemand", default)]
    on_demand: HashMap<String, HashMap<String, OfferTerm>>,
}

/// In-memory AWS EC2 on-demand catalog
#[derive(Debug, Clone, Default)]
pub struct AwsOfferCatalog {
    products: Vec<Product>,
    on_demand: HashMap<String, HashMap<String, OfferTerm>>,
}

impl AwsOfferCatalog {
    pub fn load(path: &Path) -> PricingResult<Self> {
        let bytes = read_catalog_file(CloudProvider::Aws, path)?;
        Self::from_json_slice(&bytes).map_err(|e| match e {
            PricingError::CatalogParse { reason, .. } => PricingError::CatalogParse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn from_json_slice(bytes: &[u8]) -> PricingResult<Self> {
        let offer: OfferFile =
            serde_json::from_slice(bytes).map_err(|e| PricingError::CatalogParse {
                path: "<memory>".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            products: offer.products.into_values().collect(),
            on_demand: offer.terms.on_demand,
        })
    }

    /// Products in document order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Linear scan for products matching every filter, in document order
    pub fn filter<'a, 'f>(
        &'a self,
        filters: &'f [AttributeFilter],
    ) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |p| AttributeFilter::matches_all(filters, *p))
    }

    /// On-demand term `term_code` of `sku`
    pub fn on_demand_term(&self, sku: &str, term_code: &str) -> Option<&OfferTerm> {
        self.on_demand.get(sku)?.get(term_code)
    }
}
