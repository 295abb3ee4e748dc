//! Resolver over the GCP flat SKU table.
//!
//! GCE machine types are priced per core: `n1-standard-16` is sixteen
//! `N1 Predefined Instance Core` SKUs. Memory SKUs are not added.

use regex::Regex;
use rust_decimal::Decimal;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use super::{parse_price, PriceResolver};
use crate::catalog::gcp::{COLUMN_PRODUCT_TAXONOMY, COLUMN_SKU_DESCRIPTION, COLUMN_UNIT_DESCRIPTION};
use crate::catalog::{AttributeFilter, GcpSkuCatalog};
use crate::error::{PricingError, PricingResult};
use crate::models::{CloudProvider, PriceEntry};

/// Taxonomy of per-core on-demand VM SKUs
pub const CORE_TAXONOMY: &str = "GCP > Compute > GCE > VMs On Demand > Cores: Per Core";

static MACHINE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z0-9]+)-([a-z]+)-([0-9]+)$").unwrap());

/// `family-tier-cores` decomposition of a machine type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineType<'a> {
    pub family: &'a str,
    pub tier: &'a str,
    pub cores: u32,
}

impl<'a> MachineType<'a> {
    pub fn parse(shape: &'a str) -> Option<Self> {
        let captures = MACHINE_TYPE.captures(shape)?;
        let family = captures.get(1)?.as_str();
        let tier = captures.get(2)?.as_str();
        let cores = captures.get(3)?.as_str().parse().ok()?;
        Some(Self { family, tier, cores })
    }

    /// SKU description of the per-core SKU for this family in the Americas regions
    pub fn core_sku_description(&self) -> Option<&'static str> {
        let description = match self.family {
            "n1" => "N1 Predefined Instance Core running in Americas",
            "n2" => "N2 Instance Core running in Americas",
            "n2d" => "N2D AMD Instance Core running in Americas",
            "e2" => "E2 Instance Core running in Americas",
            "c2" => "Compute optimized Core running in Americas",
            "m1" => "Memory-optimized Instance Core running in Americas",
            _ => return None,
        };
        Some(description)
    }
}

/// Prices GCE machine types from a [`GcpSkuCatalog`]
#[derive(Debug, Clone)]
pub struct FlatCsvResolver {
    catalog: Arc<GcpSkuCatalog>,
}

impl FlatCsvResolver {
    pub fn new(catalog: Arc<GcpSkuCatalog>) -> Self {
        Self { catalog }
    }
}

impl PriceResolver for FlatCsvResolver {
    fn provider(&self) -> CloudProvider {
        CloudProvider::Gcp
    }

    fn resolve(&self, shape: &str) -> PricingResult<PriceEntry> {
        let machine = MachineType::parse(shape).ok_or_else(|| {
            PricingError::no_match(shape, "not a <family>-<tier>-<cores> machine type")
        })?;

        let description = machine.core_sku_description().ok_or_else(|| {
            PricingError::no_match(shape, format!("unsupported machine family [{}]", machine.family))
        })?;

        let filters = [
            AttributeFilter::eq(COLUMN_UNIT_DESCRIPTION, "hour"),
            AttributeFilter::eq(COLUMN_PRODUCT_TAXONOMY, CORE_TAXONOMY),
            AttributeFilter::eq(COLUMN_SKU_DESCRIPTION, description),
        ];

        let mut rows = self.catalog.filter(&filters);
        let row = rows.next().ok_or_else(|| {
            PricingError::no_match(shape, format!("no SKU row for [{description}]"))
        })?;

        let extra = rows.count();
        if extra > 0 {
            warn!(shape, sku = row.sku(), candidates = extra + 1, "Multiple SKUs matched, continuing with the first");
        }

        let per_core = parse_price(row.sku(), &row.list_price)?;
        let hourly = per_core * Decimal::from(machine.cores);
        debug!(shape, sku = row.sku(), %per_core, cores = machine.cores, "Resolved GCP on-demand price");

        Ok(PriceEntry::from_hourly(shape, row.sku(), hourly))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlatCharge;
    use std::str::FromStr;

    const CSV: &str = "\
SKU ID,SKU description,Product taxonomy,Unit description,List price ($)
2E27-4F75-95CD,N1 Predefined Instance Core running in Americas,GCP > Compute > GCE > VMs On Demand > Cores: Per Core,hour,0.031611
6B8F-E63D-832B,N1 Predefined Instance Ram running in Americas,GCP > Compute > GCE > VMs On Demand > Memory: Per GB,gibibyte hour,0.004237
CF4E-A0C7-E3BF,E2 Instance Core running in Americas,GCP > Compute > GCE > VMs On Demand > Cores: Per Core,hour,0.021811
9999-0000-0000,E2 Instance Core running in Americas,GCP > Compute > GCE > VMs On Demand > Cores: Per Core,month,15.70
BAD0-0000-0000,N2 Instance Core running in Americas,GCP > Compute > GCE > VMs On Demand > Cores: Per Core,hour,tbd
";

    fn resolver() -> FlatCsvResolver {
        FlatCsvResolver::new(Arc::new(GcpSkuCatalog::from_csv_slice(CSV.as_bytes()).unwrap()))
    }

    #[test]
    fn test_parse_machine_type() {
        let machine = MachineType::parse("n1-standard-16").unwrap();
        assert_eq!(machine, MachineType { family: "n1", tier: "standard", cores: 16 });

        assert_eq!(MachineType::parse("n2d-highmem-8").unwrap().family, "n2d");
        assert!(MachineType::parse("e2-micro").is_none());
        assert!(MachineType::parse("custom-4-16384").is_none());
        assert!(MachineType::parse("N1-standard-4").is_none());
    }

    #[test]
    fn test_price_is_per_core_times_cores() {
        let entry = resolver().resolve("n1-standard-16").unwrap();

        assert_eq!(entry.sku, "2E27-4F75-95CD");
        assert_eq!(entry.hourly_price, Decimal::from_str("0.505776").unwrap());
        assert_eq!(entry.monthly_price, entry.hourly_price * Decimal::from(720));
    }

    #[test]
    fn test_only_hourly_rows_match() {
        let entry = resolver().resolve("e2-standard-2").unwrap();
        assert_eq!(entry.sku, "CF4E-A0C7-E3BF");
        assert_eq!(entry.hourly_price, Decimal::from_str("0.043622").unwrap());
    }

    #[test]
    fn test_unknown_family_is_recoverable() {
        let err = resolver().resolve("a2-highgpu-1").unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("a2"));
    }

    #[test]
    fn test_malformed_shape_is_no_match() {
        let err = resolver().resolve("unknown.type").unwrap_err();
        assert!(matches!(err, PricingError::NoPriceMatch { .. }));
    }

    #[test]
    fn test_family_missing_from_table_rows() {
        let err = resolver().resolve("c2-standard-4").unwrap_err();
        assert!(err.to_string().contains("Compute optimized Core running in Americas"));
    }

    #[test]
    fn test_invalid_list_price() {
        let err = resolver().resolve("n2-standard-2").unwrap_err();
        assert!(matches!(err, PricingError::InvalidPrice { ref value, .. } if value == "tbd"));
    }

    #[test]
    fn test_cluster_management_fee_uses_fixed_rate() {
        let fee = resolver().resolve_flat(FlatCharge::ClusterManagement).unwrap();
        assert_eq!(fee.monthly_price, Decimal::from(72));
        assert!(resolver().resolve_flat(FlatCharge::NatGateway).is_err());
    }
}
