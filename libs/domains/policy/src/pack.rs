//! Policy pack: a named set of policies evaluated together against one graph.

use domain_cloud_resources::ResourceGraph;
use domain_finops::{CostEstimator, CostLineItem};
use domain_pricing::{CatalogLoader, CloudProvider, PriceResolver};
use observability::CostMetrics;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, info};

use crate::error::PolicyResult;
use crate::models::{EnforcementLevel, Finding, PolicyReport, Violation};

type Estimator = CostEstimator<Box<dyn PriceResolver>>;

/// A single check over a resource graph
pub trait Policy {
    /// Unique name, e.g. `aws-budget-limit`
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn enforcement_level(&self) -> EnforcementLevel;

    /// Inspect the graph and return every problem found
    fn validate(&self, ctx: &mut PolicyContext<'_>) -> PolicyResult<Vec<Finding>>;
}

/// What a policy can see during one evaluation.
///
/// Cost breakdowns are computed on first request per provider and shared by
/// every policy of the evaluation.
pub struct PolicyContext<'a> {
    graph: &'a ResourceGraph,
    loader: &'a CatalogLoader,
    estimators: &'a mut HashMap<CloudProvider, Estimator>,
    breakdowns: HashMap<CloudProvider, Vec<CostLineItem>>,
}

impl<'a> PolicyContext<'a> {
    pub fn graph(&self) -> &'a ResourceGraph {
        self.graph
    }

    /// Cost breakdown of the provider's resources in the graph.
    ///
    /// A graph without billable resources of `provider` yields an empty
    /// breakdown without touching that provider's catalog.
    pub fn breakdown(&mut self, provider: CloudProvider) -> PolicyResult<&[CostLineItem]> {
        if !self.breakdowns.contains_key(&provider) {
            let items = if self.has_billable_resources(provider) {
                let estimator = match self.estimators.entry(provider) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => {
                        entry.insert(CostEstimator::for_provider(provider, self.loader)?)
                    }
                };
                estimator.estimate(self.graph)?
            } else {
                debug!(provider = %provider, "No resources for provider, skipping estimate");
                Vec::new()
            };
            self.breakdowns.insert(provider, items);
        }

        Ok(self
            .breakdowns
            .get(&provider)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    fn has_billable_resources(&self, provider: CloudProvider) -> bool {
        self.graph
            .resources()
            .iter()
            .any(|r| r.kind.is_billable() && r.kind.provider() == Some(provider))
    }
}

/// Named collection of policies sharing one catalog loader
pub struct PolicyPack {
    name: String,
    policies: Vec<Box<dyn Policy>>,
    loader: CatalogLoader,
    estimators: HashMap<CloudProvider, Estimator>,
}

impl PolicyPack {
    pub fn new(name: impl Into<String>, loader: CatalogLoader) -> Self {
        Self {
            name: name.into(),
            policies: Vec::new(),
            loader,
            estimators: HashMap::new(),
        }
    }

    pub fn register(&mut self, policy: Box<dyn Policy>) {
        self.policies.push(policy);
    }

    pub fn with_policy(mut self, policy: impl Policy + 'static) -> Self {
        self.register(Box::new(policy));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn all_policies(&self) -> &[Box<dyn Policy>] {
        &self.policies
    }

    /// Run every enabled policy against `graph`.
    ///
    /// Estimators (and their price caches) persist across calls, so a batch
    /// of graphs scans each shape once.
    pub fn evaluate(&mut self, graph: &ResourceGraph) -> PolicyResult<PolicyReport> {
        let mut ctx = PolicyContext {
            graph,
            loader: &self.loader,
            estimators: &mut self.estimators,
            breakdowns: HashMap::new(),
        };

        let mut violations = Vec::new();
        for policy in &self.policies {
            let level = policy.enforcement_level();
            if level == EnforcementLevel::Disabled {
                debug!(policy = policy.name(), "Policy disabled, skipping");
                continue;
            }

            for finding in policy.validate(&mut ctx)? {
                CostMetrics::record_violation(policy.name(), &level.to_string());
                violations.push(Violation {
                    policy: policy.name().to_string(),
                    enforcement_level: level,
                    resource: finding.resource,
                    message: finding.message,
                });
            }
        }

        let report = PolicyReport {
            pack: self.name.clone(),
            violations,
        };
        info!(
            pack = %self.name,
            resources = graph.len(),
            violations = report.violations.len(),
            mandatory = report.mandatory().count(),
            "Policy pack evaluated"
        );

        Ok(report)
    }
}
