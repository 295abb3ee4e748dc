//! Resolver over the AWS nested offer document.

use std::sync::Arc;
use tracing::{debug, warn};

use super::{parse_price, PriceResolver};
use crate::catalog::{AttributeFilter, AwsOfferCatalog, Product};
use crate::error::{PricingError, PricingResult};
use crate::models::{CloudProvider, FlatCharge, PriceEntry};

/// Offer term code of the on-demand term
pub const ON_DEMAND_TERM_CODE: &str = "JRTCKXETXF";
/// Rate code of the per-hour price dimension
pub const HOURLY_RATE_CODE: &str = "6YS6EN2CT7";

const PRICE_CURRENCY: &str = "USD";

/// Prices EC2 shapes from an [`AwsOfferCatalog`].
///
/// A shape matches products with `instanceType == shape`, Linux, no
/// pre-installed software and `usagetype == BoxUsage:<shape>`.
#[derive(Debug, Clone)]
pub struct NestedJsonResolver {
    catalog: Arc<AwsOfferCatalog>,
}

impl NestedJsonResolver {
    pub fn new(catalog: Arc<AwsOfferCatalog>) -> Self {
        Self { catalog }
    }

    fn instance_filters(shape: &str) -> Vec<AttributeFilter> {
        vec![
            AttributeFilter::eq("instanceType", shape),
            AttributeFilter::eq("operatingSystem", "Linux"),
            AttributeFilter::eq("preInstalledSw", "NA"),
            AttributeFilter::eq("usagetype", format!("BoxUsage:{shape}")),
        ]
    }

    fn nat_gateway_filters() -> Vec<AttributeFilter> {
        vec![
            AttributeFilter::eq("group", "NGW:NatGateway"),
            AttributeFilter::eq("operation", "NatGateway"),
            // usage types carry a region prefix outside us-east-1
            AttributeFilter::ends_with("usagetype", FlatCharge::NatGateway.to_string()),
        ]
    }

    /// First product matching `filters`, warning when the match is ambiguous
    fn first_match(&self, shape: &str, filters: &[AttributeFilter]) -> PricingResult<&Product> {
        let mut matches = self.catalog.filter(filters);
        let first = matches
            .next()
            .ok_or_else(|| PricingError::no_match(shape, "no matching SKU in the AWS offer file"))?;

        let extra = matches.count();
        if extra > 0 {
            warn!(
                shape,
                sku = %first.sku,
                candidates = extra + 1,
                "Multiple SKUs matched, continuing with the first"
            );
        }

        Ok(first)
    }

    fn hourly_on_demand_price(&self, shape: &str, sku: &str) -> PricingResult<PriceEntry> {
        let term_code = format!("{sku}.{ON_DEMAND_TERM_CODE}");
        let rate_code = format!("{term_code}.{HOURLY_RATE_CODE}");

        let raw_price = self
            .catalog
            .on_demand_term(sku, &term_code)
            .and_then(|term| term.price_dimensions.get(&rate_code))
            .and_then(|dimension| dimension.price_per_unit.get(PRICE_CURRENCY))
            .ok_or_else(|| {
                PricingError::no_match(shape, format!("SKU [{sku}] has no on-demand hourly rate"))
            })?;

        let hourly = parse_price(sku, raw_price)?;
        debug!(shape, sku, %hourly, "Resolved AWS on-demand price");

        Ok(PriceEntry::from_hourly(shape, sku, hourly))
    }
}

impl PriceResolver for NestedJsonResolver {
    fn provider(&self) -> CloudProvider {
        CloudProvider::Aws
    }

    fn resolve(&self, shape: &str) -> PricingResult<PriceEntry> {
        let product = self.first_match(shape, &Self::instance_filters(shape))?;
        self.hourly_on_demand_price(shape, &product.sku)
    }

    fn resolve_flat(&self, charge: FlatCharge) -> PricingResult<PriceEntry> {
        let label = charge.to_string();
        match charge {
            FlatCharge::NatGateway => {
                let product = self.first_match(&label, &Self::nat_gateway_filters())?;
                self.hourly_on_demand_price(&label, &product.sku)
            }
            FlatCharge::ClusterManagement => Err(PricingError::no_match(
                label,
                "AWS catalog does not price GKE cluster management",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use std::str::FromStr;

    fn product(sku: &str, attributes: Value) -> (String, Value) {
        (
            sku.to_string(),
            json!({ "sku": sku, "productFamily": "Compute Instance", "attributes": attributes }),
        )
    }

    fn on_demand(sku: &str, usd: &str) -> (String, Value) {
        let term = format!("{sku}.JRTCKXETXF");
        let rate = format!("{term}.6YS6EN2CT7");
        (
            sku.to_string(),
            json!({ term: { "priceDimensions": { rate: { "unit": "Hrs", "pricePerUnit": { "USD": usd } } } } }),
        )
    }

    fn linux(shape: &str) -> Value {
        json!({
            "instanceType": shape,
            "operatingSystem": "Linux",
            "preInstalledSw": "NA",
            "usagetype": format!("BoxUsage:{shape}"),
        })
    }

    fn resolver() -> NestedJsonResolver {
        let products: serde_json::Map<String, Value> = [
            product("WIN", json!({ "instanceType": "m5.large", "operatingSystem": "Windows", "preInstalledSw": "NA", "usagetype": "BoxUsage:m5.large" })),
            product("M5L", linux("m5.large")),
            product("M5L-DUP", linux("m5.large")),
            product("T3L", linux("t3.large")),
            product("NORATE", linux("c5.large")),
            product("BAD", linux("r5.large")),
            product("NGW", json!({ "group": "NGW:NatGateway", "operation": "NatGateway", "usagetype": "USE1-NatGateway-Hours" })),
        ]
        .into_iter()
        .collect();

        let terms: serde_json::Map<String, Value> = [
            on_demand("WIN", "0.1880000000"),
            on_demand("M5L", "0.0960000000"),
            on_demand("M5L-DUP", "9.9900000000"),
            on_demand("T3L", "0.0832000000"),
            on_demand("BAD", "n/a"),
            on_demand("NGW", "0.0450000000"),
        ]
        .into_iter()
        .collect();

        let document = json!({ "products": products, "terms": { "OnDemand": terms } });
        let catalog = AwsOfferCatalog::from_json_slice(document.to_string().as_bytes()).unwrap();
        NestedJsonResolver::new(Arc::new(catalog))
    }

    #[test]
    fn test_resolves_linux_on_demand_price() {
        let entry = resolver().resolve("t3.large").unwrap();

        assert_eq!(entry.sku, "T3L");
        assert_eq!(entry.hourly_price, Decimal::from_str("0.0832").unwrap());
        assert_eq!(entry.monthly_price, Decimal::from_str("59.904").unwrap());
    }

    #[test]
    fn test_ambiguous_match_takes_first_in_document_order() {
        let entry = resolver().resolve("m5.large").unwrap();
        assert_eq!(entry.sku, "M5L");
        assert_eq!(entry.hourly_price, Decimal::from_str("0.096").unwrap());
    }

    #[test]
    fn test_unknown_shape_is_no_match() {
        let err = resolver().resolve("unknown.type").unwrap_err();
        assert!(matches!(err, PricingError::NoPriceMatch { ref shape, .. } if shape == "unknown.type"));
    }

    #[test]
    fn test_missing_term_is_no_match() {
        let err = resolver().resolve("c5.large").unwrap_err();
        assert!(matches!(err, PricingError::NoPriceMatch { .. }));
        assert!(err.to_string().contains("NORATE"));
    }

    #[test]
    fn test_unparsable_price() {
        let err = resolver().resolve("r5.large").unwrap_err();
        assert!(matches!(err, PricingError::InvalidPrice { ref sku, .. } if sku == "BAD"));
    }

    #[test]
    fn test_nat_gateway_matches_region_prefixed_usage_type() {
        let entry = resolver().resolve_flat(FlatCharge::NatGateway).unwrap();
        assert_eq!(entry.sku, "NGW");
        assert_eq!(entry.monthly_price, Decimal::from_str("32.4").unwrap());
    }

    #[test]
    fn test_cluster_fee_not_in_aws_catalog() {
        let err = resolver().resolve_flat(FlatCharge::ClusterManagement).unwrap_err();
        assert!(err.is_recoverable());
    }
}
