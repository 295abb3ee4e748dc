//! Cost policies: monthly budget limit and the advisory cost report.

use domain_finops::{format_amount, grand_total, render_table};
use domain_pricing::{CloudProvider, Decimal};

use crate::error::PolicyResult;
use crate::models::{EnforcementLevel, Finding};
use crate::pack::{Policy, PolicyContext};

/// Default `maxMonthlyCost` in USD
pub const DEFAULT_MAX_MONTHLY_COST: Decimal = Decimal::from_parts(500, 0, 0, false, 1);

/// Estimated monthly cost must not exceed `maxMonthlyCost`
pub struct BudgetLimit {
    name: String,
    provider: CloudProvider,
    max_monthly_cost: Decimal,
    level: EnforcementLevel,
}

impl BudgetLimit {
    pub fn new(provider: CloudProvider, max_monthly_cost: Decimal) -> Self {
        Self {
            name: format!("{provider}-budget-limit"),
            provider,
            max_monthly_cost,
            level: EnforcementLevel::Advisory,
        }
    }

    pub fn with_enforcement_level(mut self, level: EnforcementLevel) -> Self {
        self.level = level;
        self
    }

    pub fn max_monthly_cost(&self) -> Decimal {
        self.max_monthly_cost
    }
}

impl Policy for BudgetLimit {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Estimated costs must not exceed monthly budget."
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        self.level
    }

    fn validate(&self, ctx: &mut PolicyContext<'_>) -> PolicyResult<Vec<Finding>> {
        let Some(total) = grand_total(ctx.breakdown(self.provider)?) else {
            return Ok(Vec::new());
        };

        if total > self.max_monthly_cost {
            return Ok(vec![Finding::stack(format!(
                "Estimated monthly cost [{}] exceeds [{}].",
                format_amount(total),
                format_amount(self.max_monthly_cost)
            ))]);
        }

        Ok(Vec::new())
    }
}

/// Reports the cost breakdown as an advisory finding
pub struct CostEstimate {
    name: String,
    provider: CloudProvider,
}

impl CostEstimate {
    pub fn new(provider: CloudProvider) -> Self {
        Self {
            name: format!("{provider}-cost-estimate"),
            provider,
        }
    }
}

impl Policy for CostEstimate {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Estimated monthly costs."
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Advisory
    }

    fn validate(&self, ctx: &mut PolicyContext<'_>) -> PolicyResult<Vec<Finding>> {
        let items = ctx.breakdown(self.provider)?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![Finding::stack(format!("\n{}", render_table(items)))])
    }
}
