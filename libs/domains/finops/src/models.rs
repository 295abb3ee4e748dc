use domain_cloud_resources::ResourceKind;
use domain_pricing::Decimal;
use serde::Serialize;

/// Label of the grand-total line
pub const GRAND_TOTAL_LABEL: &str = "TOTAL";

/// A billable unit extracted from the resource graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub kind: ResourceKind,
    /// Shape descriptor; `None` when it could not be determined
    pub shape: Option<String>,
    pub quantity: u64,
}

impl ResourceRecord {
    pub fn new(kind: ResourceKind, shape: Option<String>, quantity: u64) -> Self {
        Self { kind, shape, quantity }
    }
}

/// One row of a cost breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostLineItem {
    /// Type token of the grouped resources, or `TOTAL`
    pub resource_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_monthly_cost: Option<Decimal>,
    pub total_monthly_cost: Decimal,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_grand_total: bool,
    /// Why the row could not be priced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CostLineItem {
    pub fn priced(kind: ResourceKind, shape: Option<String>, quantity: u64, unit_monthly_cost: Decimal) -> Self {
        Self {
            resource_kind: kind.to_string(),
            shape,
            quantity: Some(quantity),
            unit_monthly_cost: Some(unit_monthly_cost),
            total_monthly_cost: unit_monthly_cost * Decimal::from(quantity),
            is_grand_total: false,
            note: None,
        }
    }

    /// Zero-cost row for a group that could not be priced
    pub fn unpriced(kind: ResourceKind, shape: Option<String>, quantity: u64, reason: impl Into<String>) -> Self {
        Self {
            resource_kind: kind.to_string(),
            shape,
            quantity: Some(quantity),
            unit_monthly_cost: None,
            total_monthly_cost: Decimal::ZERO,
            is_grand_total: false,
            note: Some(reason.into()),
        }
    }

    /// Grand-total row summing `items`
    pub fn grand_total<'a>(items: impl IntoIterator<Item = &'a CostLineItem>) -> Self {
        Self {
            resource_kind: GRAND_TOTAL_LABEL.to_string(),
            shape: None,
            quantity: None,
            unit_monthly_cost: None,
            total_monthly_cost: items.into_iter().map(|item| item.total_monthly_cost).sum(),
            is_grand_total: true,
            note: None,
        }
    }
}

/// Grand total of a breakdown; `None` for an empty one
pub fn grand_total(items: &[CostLineItem]) -> Option<Decimal> {
    items
        .iter()
        .find(|item| item.is_grand_total)
        .map(|item| item.total_monthly_cost)
}
