use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Hours in a billing month. Fixed 24 × 30 approximation, not calendar accurate.
pub const HOURS_PER_MONTH: u32 = 24 * 30;

/// Cloud provider enumeration
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CloudProvider {
    #[default]
    Aws,
    Gcp,
}

/// Convert an hourly rate to the fixed 720-hour month
pub fn monthly_from_hourly(hourly: Decimal) -> Decimal {
    hourly * Decimal::from(HOURS_PER_MONTH)
}

/// Resolved on-demand price of one shape within one catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
    /// Shape descriptor the price was resolved for (e.g. "m5.large", "n1-standard-16")
    pub shape: String,
    /// Catalog SKU the price came from
    pub sku: String,
    /// On-demand USD per hour
    pub hourly_price: Decimal,
    /// `hourly_price × 720`
    pub monthly_price: Decimal,
}

impl PriceEntry {
    pub fn from_hourly(shape: impl Into<String>, sku: impl Into<String>, hourly_price: Decimal) -> Self {
        Self {
            shape: shape.into(),
            sku: sku.into(),
            hourly_price,
            monthly_price: monthly_from_hourly(hourly_price),
        }
    }
}

/// Billable charges that are not tied to a shape descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum FlatCharge {
    /// Managed NAT gateway, per gateway-hour
    #[strum(serialize = "NatGateway-Hours")]
    NatGateway,
    /// GKE cluster management fee, per cluster-hour
    #[strum(serialize = "GKE cluster management fee")]
    ClusterManagement,
}

impl FlatCharge {
    /// Published fixed hourly rate, for charges that have one
    pub fn fixed_hourly_rate(&self) -> Option<Decimal> {
        match self {
            FlatCharge::NatGateway => None,
            FlatCharge::ClusterManagement => Some(Decimal::new(10, 2)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_month_is_720_hours() {
        assert_eq!(HOURS_PER_MONTH, 720);
    }

    #[test]
    fn test_monthly_conversion_is_exact() {
        let hourly = Decimal::from_str("0.192").unwrap();
        assert_eq!(monthly_from_hourly(hourly), Decimal::from_str("138.24").unwrap());

        let entry = PriceEntry::from_hourly("m5.large", "SKU1", hourly);
        assert_eq!(entry.monthly_price, entry.hourly_price * Decimal::from(720));
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!(CloudProvider::from_str("aws").unwrap(), CloudProvider::Aws);
        assert_eq!(CloudProvider::from_str("GCP").unwrap(), CloudProvider::Gcp);
        assert!(CloudProvider::from_str("azure").is_err());
        assert_eq!(CloudProvider::Gcp.to_string(), "gcp");
    }

    #[test]
    fn test_cluster_management_fee() {
        let rate = FlatCharge::ClusterManagement.fixed_hourly_rate().unwrap();
        assert_eq!(monthly_from_hourly(rate), Decimal::from(72));
        assert_eq!(FlatCharge::NatGateway.fixed_hourly_rate(), None);
    }
}
