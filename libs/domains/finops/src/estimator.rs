//! Cost Aggregator
//!
//! Turns a resource graph into a per-(kind, shape) cost breakdown for one
//! provider. Prices come through a [`PriceCache`] owned by the estimator, so
//! keeping an estimator alive across graphs reuses every resolved shape.

use domain_cloud_resources::{Resource, ResourceGraph, ResourceKind};
use domain_pricing::{
    resolver_for, CacheStats, CatalogLoader, CloudProvider, Decimal, FlatCharge, PriceCache,
    PriceLookup, PriceResolver, PricingError, PricingResult,
};
use observability::CostMetrics;
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::models::{CostLineItem, ResourceRecord};

/// Shape shown for groups whose shape could not be determined
const UNDEFINED_SHAPE: &str = "undefined";

/// GKE creates clusters with a single default node unless told otherwise
const DEFAULT_INITIAL_NODE_COUNT: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum GroupKey {
    Shape(Option<String>),
    Flat(FlatCharge),
}

/// Estimates the monthly cost of one provider's resources
#[derive(Debug)]
pub struct CostEstimator<R> {
    provider: CloudProvider,
    cache: PriceCache<R>,
}

impl CostEstimator<Box<dyn PriceResolver>> {
    /// Estimator backed by the provider's local catalog
    pub fn for_provider(provider: CloudProvider, loader: &CatalogLoader) -> PricingResult<Self> {
        Ok(Self::new(resolver_for(provider, loader)?))
    }
}

impl<R: PriceResolver> CostEstimator<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            provider: resolver.provider(),
            cache: PriceCache::new(resolver),
        }
    }

    pub fn provider(&self) -> CloudProvider {
        self.provider
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Cost breakdown of `graph`: one row per (kind, shape) group and flat
    /// charge, then a grand-total row. Empty when nothing is billable.
    ///
    /// Groups that cannot be priced become zero-cost rows with a note. Only
    /// catalog failures are returned as errors.
    pub fn estimate(&mut self, graph: &ResourceGraph) -> PricingResult<Vec<CostLineItem>> {
        let mut groups: BTreeMap<(ResourceKind, GroupKey), u64> = BTreeMap::new();

        for record in extract_records(self.provider, graph) {
            let quantity = groups
                .entry((record.kind, GroupKey::Shape(record.shape)))
                .or_default();
            *quantity = quantity.saturating_add(record.quantity);
        }
        for (kind, charge, count) in flat_charges(self.provider, graph) {
            let quantity = groups.entry((kind, GroupKey::Flat(charge))).or_default();
            *quantity = quantity.saturating_add(count);
        }

        if groups.is_empty() {
            CostMetrics::set_estimated_monthly_total(&self.provider.to_string(), 0.0);
            return Ok(Vec::new());
        }

        let mut items = Vec::with_capacity(groups.len() + 1);
        for ((kind, key), quantity) in groups {
            let item = match key {
                GroupKey::Shape(Some(shape)) => {
                    let lookup = self.cache.resolve(&shape)?;
                    line_item(kind, Some(shape), quantity, lookup)
                }
                GroupKey::Shape(None) => {
                    let reason = PricingError::no_match(
                        UNDEFINED_SHAPE,
                        "shape could not be determined from the resource properties",
                    );
                    CostLineItem::unpriced(kind, None, quantity, reason.to_string())
                }
                GroupKey::Flat(charge) => {
                    let lookup = self.cache.resolve_flat(charge)?;
                    line_item(kind, None, quantity, lookup)
                }
            };
            items.push(item);
        }

        let total = CostLineItem::grand_total(&items);
        info!(
            provider = %self.provider,
            groups = items.len(),
            total_monthly_cost = %total.total_monthly_cost,
            "Estimated monthly cost"
        );
        CostMetrics::set_estimated_monthly_total(
            &self.provider.to_string(),
            total.total_monthly_cost.to_f64().unwrap_or_default(),
        );
        items.push(total);

        Ok(items)
    }
}

fn line_item(kind: ResourceKind, shape: Option<String>, quantity: u64, lookup: PriceLookup) -> CostLineItem {
    match lookup {
        PriceLookup::Priced(entry) => CostLineItem::priced(kind, shape, quantity, entry.monthly_price),
        PriceLookup::Unpriced { reason } => CostLineItem::unpriced(kind, shape, quantity, reason),
    }
}

/// Billable shaped resources of `provider` in `graph`, one record per resource
pub fn extract_records(provider: CloudProvider, graph: &ResourceGraph) -> Vec<ResourceRecord> {
    graph
        .resources()
        .iter()
        .filter(|r| r.kind.provider() == Some(provider))
        .filter_map(|resource| match resource.kind {
            ResourceKind::AwsInstance => Some(ResourceRecord::new(
                resource.kind,
                resource.str_prop("instanceType").map(str::to_string),
                1,
            )),
            ResourceKind::AwsAutoscalingGroup => Some(ResourceRecord::new(
                resource.kind,
                autoscaling_instance_type(graph, resource),
                autoscaling_min_size(resource),
            )),
            ResourceKind::GcpInstance => Some(ResourceRecord::new(
                resource.kind,
                resource.str_prop("machineType").map(str::to_string),
                1,
            )),
            ResourceKind::GcpCluster if resource.bool_prop("removeDefaultNodePool") == Some(true) => None,
            ResourceKind::GcpCluster | ResourceKind::GcpNodePool => Some(ResourceRecord::new(
                resource.kind,
                resource.str_prop("nodeConfig.machineType").map(str::to_string),
                resource
                    .u64_prop("initialNodeCount")
                    .unwrap_or(DEFAULT_INITIAL_NODE_COUNT),
            )),
            _ => None,
        })
        .collect()
}

/// Flat charges of `provider` in `graph` as (kind, charge, count)
fn flat_charges(provider: CloudProvider, graph: &ResourceGraph) -> Vec<(ResourceKind, FlatCharge, u64)> {
    let charges = match provider {
        CloudProvider::Aws => [(ResourceKind::AwsNatGateway, FlatCharge::NatGateway)],
        CloudProvider::Gcp => [(ResourceKind::GcpCluster, FlatCharge::ClusterManagement)],
    };

    charges
        .into_iter()
        .map(|(kind, charge)| (kind, charge, graph.of_kind(kind).count() as u64))
        .filter(|(_, _, count)| *count > 0)
        .collect()
}

/// Instance type of the launch configuration or template an autoscaling group points at
fn autoscaling_instance_type(graph: &ResourceGraph, group: &Resource) -> Option<String> {
    let (sibling_kind, sibling_name) = if let Some(name) = group.str_prop("launchConfiguration") {
        (ResourceKind::AwsLaunchConfiguration, name)
    } else if let Some(name) = group.str_prop("launchTemplate.name") {
        (ResourceKind::AwsLaunchTemplate, name)
    } else {
        warn!(group = %group.name, "Autoscaling group has no launch configuration or template");
        return None;
    };

    let Some(sibling) = graph.find_named(sibling_kind, sibling_name) else {
        warn!(
            group = %group.name,
            sibling = sibling_name,
            kind = %sibling_kind,
            "Autoscaling group references a resource that is not in the graph"
        );
        return None;
    };

    let instance_type = sibling.str_prop("instanceType").map(str::to_string);
    if instance_type.is_none() {
        warn!(group = %group.name, sibling = sibling_name, "Launch definition has no instanceType");
    }
    instance_type
}

fn autoscaling_min_size(group: &Resource) -> u64 {
    group.u64_prop("minSize").unwrap_or_else(|| {
        warn!(group = %group.name, "Autoscaling group has no usable minSize, counting 0 instances");
        0
    })
}

/// Sum of every non-total row
pub fn sum_line_items(items: &[CostLineItem]) -> Decimal {
    items
        .iter()
        .filter(|item| !item.is_grand_total)
        .map(|item| item.total_monthly_cost)
        .sum()
}
