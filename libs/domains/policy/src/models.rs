use serde::Serialize;
use strum::{Display, EnumString};

/// How a violation affects the deployment
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EnforcementLevel {
    /// Reported, deployment proceeds
    #[default]
    Advisory,
    /// Blocks the deployment
    Mandatory,
    /// Policy is not evaluated
    Disabled,
}

/// A problem reported by a policy, before the pack attributes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Logical name of the offending resource; `None` for stack-level findings
    pub resource: Option<String>,
    pub message: String,
}

impl Finding {
    pub fn stack(message: impl Into<String>) -> Self {
        Self {
            resource: None,
            message: message.into(),
        }
    }

    pub fn resource(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            resource: Some(name.into()),
            message: message.into(),
        }
    }
}

/// A finding attributed to the policy that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub policy: String,
    pub enforcement_level: EnforcementLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    pub message: String,
}

/// Outcome of evaluating a policy pack against one graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PolicyReport {
    pub pack: String,
    pub violations: Vec<Violation>,
}

impl PolicyReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Whether any violation blocks the deployment
    pub fn has_mandatory(&self) -> bool {
        self.mandatory().next().is_some()
    }

    pub fn mandatory(&self) -> impl Iterator<Item = &Violation> {
        self.at_level(EnforcementLevel::Mandatory)
    }

    pub fn advisory(&self) -> impl Iterator<Item = &Violation> {
        self.at_level(EnforcementLevel::Advisory)
    }

    pub fn for_policy<'a>(&'a self, policy: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.policy == policy)
    }

    fn at_level(&self, level: EnforcementLevel) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |v| v.enforcement_level == level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn violation(policy: &str, level: EnforcementLevel) -> Violation {
        Violation {
            policy: policy.to_string(),
            enforcement_level: level,
            resource: None,
            message: "m".to_string(),
        }
    }

    #[test]
    fn test_enforcement_level_strings() {
        assert_eq!(EnforcementLevel::Mandatory.to_string(), "mandatory");
        assert_eq!(EnforcementLevel::from_str("Advisory").unwrap(), EnforcementLevel::Advisory);
        assert!(EnforcementLevel::from_str("strict").is_err());
    }

    #[test]
    fn test_report_levels() {
        let report = PolicyReport {
            pack: "p".to_string(),
            violations: vec![
                violation("aws-budget-limit", EnforcementLevel::Advisory),
                violation("subnet-sizing", EnforcementLevel::Mandatory),
            ],
        };

        assert!(!report.is_clean());
        assert!(report.has_mandatory());
        assert_eq!(report.advisory().count(), 1);
        assert_eq!(report.for_policy("subnet-sizing").count(), 1);
    }

    #[test]
    fn test_advisory_only_report_does_not_block() {
        let report = PolicyReport {
            pack: "p".to_string(),
            violations: vec![violation("aws-cost-estimate", EnforcementLevel::Advisory)],
        };
        assert!(!report.has_mandatory());
    }
}
