//! Network and instance hygiene policies.

use domain_cloud_resources::ResourceKind;
use tracing::debug;

use crate::error::PolicyResult;
use crate::models::{EnforcementLevel, Finding};
use crate::pack::{Policy, PolicyContext};

pub const DEFAULT_MAX_SUBNET_PREFIX_LENGTH: u8 = 22;
pub const DEFAULT_REQUIRED_INSTANCE_TAGS: [&str; 3] = ["Name", "BusinessUnit", "CostCenter"];

/// Subnet CIDR blocks must not be larger than `/max_prefix_length`
pub struct SubnetSizing {
    max_prefix_length: u8,
}

impl SubnetSizing {
    pub fn new(max_prefix_length: u8) -> Self {
        Self { max_prefix_length }
    }
}

impl Default for SubnetSizing {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SUBNET_PREFIX_LENGTH)
    }
}

/// Prefix length of a CIDR block; `None` when absent or not a number
fn prefix_length(cidr_block: &str) -> Option<u8> {
    cidr_block.split_once('/')?.1.trim().parse().ok()
}

impl Policy for SubnetSizing {
    fn name(&self) -> &str {
        "subnet-sizing"
    }

    fn description(&self) -> &str {
        "Subnets CIDR block size is too large."
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Mandatory
    }

    fn validate(&self, ctx: &mut PolicyContext<'_>) -> PolicyResult<Vec<Finding>> {
        let mut findings = Vec::new();
        for subnet in ctx.graph().of_kind(ResourceKind::AwsSubnet) {
            let Some(cidr_block) = subnet.str_prop("cidrBlock") else {
                debug!(subnet = %subnet.name, "Subnet has no cidrBlock");
                continue;
            };

            if prefix_length(cidr_block).is_some_and(|prefix| prefix < self.max_prefix_length) {
                findings.push(Finding::resource(
                    subnet.name.clone(),
                    format!(
                        "Address space [{cidr_block}] is too large. Must be [/{}] or smaller.",
                        self.max_prefix_length
                    ),
                ));
            }
        }
        Ok(findings)
    }
}

/// EC2 instances must carry every required tag
pub struct RequiredTags {
    tags: Vec<String>,
}

impl RequiredTags {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Default for RequiredTags {
    fn default() -> Self {
        Self::new(DEFAULT_REQUIRED_INSTANCE_TAGS)
    }
}

impl Policy for RequiredTags {
    fn name(&self) -> &str {
        "instance-required-tags"
    }

    fn description(&self) -> &str {
        "Instances must have required tags."
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Mandatory
    }

    fn validate(&self, ctx: &mut PolicyContext<'_>) -> PolicyResult<Vec<Finding>> {
        let findings = ctx
            .graph()
            .of_kind(ResourceKind::AwsInstance)
            .flat_map(|instance| {
                self.tags
                    .iter()
                    .filter(move |tag| instance.tag(tag).is_none())
                    .map(move |tag| Finding::resource(instance.name.clone(), format!("Tag [{tag}] must be defined.")))
            })
            .collect();
        Ok(findings)
    }
}
