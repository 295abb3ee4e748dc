//! GCP SKU table, as exported from the Cloud Billing pricing page (one row per SKU).

use serde::Deserialize;
use std::path::Path;

use super::{read_catalog_file, AttributeFilter, AttributeSource};
use crate::error::{PricingError, PricingResult};
use crate::models::CloudProvider;

pub const COLUMN_SKU_ID: &str = "SKU ID";
pub const COLUMN_SKU_DESCRIPTION: &str = "SKU description";
pub const COLUMN_PRODUCT_TAXONOMY: &str = "Product taxonomy";
pub const COLUMN_UNIT_DESCRIPTION: &str = "Unit description";
pub const COLUMN_LIST_PRICE: &str = "List price ($)";

/// One SKU row. Columns other than these are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkuRow {
    #[serde(rename = "SKU ID", default)]
    pub sku_id: Option<String>,
    #[serde(rename = "SKU description")]
    pub sku_description: String,
    #[serde(rename = "Product taxonomy")]
    pub product_taxonomy: String,
    #[serde(rename = "Unit description")]
    pub unit_description: String,
    #[serde(rename = "List price ($)")]
    pub list_price: String,
}

impl AttributeSource for SkuRow {
    fn attribute(&self, key: &str) -> Option<&str> {
        match key {
            COLUMN_SKU_ID => self.sku_id.as_deref(),
            COLUMN_SKU_DESCRIPTION => Some(&self.sku_description),
            COLUMN_PRODUCT_TAXONOMY => Some(&self.product_taxonomy),
            COLUMN_UNIT_DESCRIPTION => Some(&self.unit_description),
            COLUMN_LIST_PRICE => Some(&self.list_price),
            _ => None,
        }
    }
}

impl SkuRow {
    /// Identifier to report for this row: the SKU ID when present, else the description
    pub fn sku(&self) -> &str {
        self.sku_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.sku_description)
    }
}

/// In-memory GCP on-demand SKU table
#[derive(Debug, Clone, Default)]
pub struct GcpSkuCatalog {
    rows: Vec<SkuRow>,
}

impl GcpSkuCatalog {
    pub fn load(path: &Path) -> PricingResult<Self> {
        let bytes = read_catalog_file(CloudProvider::Gcp, path)?;
        Self::from_csv_slice(&bytes).map_err(|e| match e {
            PricingError::CatalogParse { reason, .. } => PricingError::CatalogParse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn from_csv_slice(bytes: &[u8]) -> PricingResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let rows = reader
            .deserialize::<SkuRow>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PricingError::CatalogParse {
                path: "<memory>".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { rows })
    }

    /// Rows in file order
    pub fn rows(&self) -> &[SkuRow] {
        &self.rows
    }

    /// Linear scan for rows matching every filter, in file order
    pub fn filter<'a>(
        &'a self,
        filters: &'a [AttributeFilter],
    ) -> impl Iterator<Item = &'a SkuRow> + 'a {
        self.rows
            .iter()
            .filter(move |row| AttributeFilter::matches_all(filters, *row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Google service,Service description,SKU ID,SKU description,Product taxonomy,Unit description,List price ($)
Compute Engine,Compute,2E27-4F75-95CD,N1 Predefined Instance Core running in Americas,GCP > Compute > GCE > VMs On Demand > Cores: Per Core,hour,0.031611
Compute Engine,Compute,6B8F-E63D-832B,N1 Predefined Instance Ram running in Americas,GCP > Compute > GCE > VMs On Demand > Memory: Per GB,gibibyte hour,0.004237
";

    #[test]
    fn test_parse_rows_ignoring_extra_columns() {
        let catalog = GcpSkuCatalog::from_csv_slice(CSV.as_bytes()).unwrap();
        assert_eq!(catalog.rows().len(), 2);

        let first = &catalog.rows()[0];
        assert_eq!(first.sku(), "2E27-4F75-95CD");
        assert_eq!(first.list_price, "0.031611");
        assert_eq!(first.attribute(COLUMN_UNIT_DESCRIPTION), Some("hour"));
        assert_eq!(first.attribute("Google service"), None);
    }

    #[test]
    fn test_filter_rows() {
        let catalog = GcpSkuCatalog::from_csv_slice(CSV.as_bytes()).unwrap();
        let filters = [AttributeFilter::eq(COLUMN_UNIT_DESCRIPTION, "hour")];

        let matched: Vec<_> = catalog.filter(&filters).map(|r| r.sku()).collect();
        assert_eq!(matched, vec!["2E27-4F75-95CD"]);
    }

    #[test]
    fn test_missing_required_column() {
        let err = GcpSkuCatalog::from_csv_slice(b"SKU description,Unit description\nx,hour\n").unwrap_err();
        assert!(matches!(err, PricingError::CatalogParse { .. }));
    }

    #[test]
    fn test_sku_falls_back_to_description() {
        let row = SkuRow {
            sku_id: None,
            sku_description: "E2 Instance Core running in Americas".to_string(),
            product_taxonomy: String::new(),
            unit_description: "hour".to_string(),
            list_price: "0.021811".to_string(),
        };
        assert_eq!(row.sku(), "E2 Instance Core running in Americas");
    }
}
