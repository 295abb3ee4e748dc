use domain_pricing::CloudProvider;
use serde::Deserialize;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

/// Kind of a resource in a proposed deployment, tagged from its type token at ingestion.
///
/// Type tokens follow the `<provider>:<module>/<resource>:<Resource>` convention used by
/// infrastructure-as-code engines. Tokens this crate does not know map to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
pub enum ResourceKind {
    #[strum(serialize = "aws:ec2/instance:Instance")]
    AwsInstance,
    #[strum(serialize = "aws:autoscaling/group:Group")]
    AwsAutoscalingGroup,
    #[strum(serialize = "aws:ec2/launchConfiguration:LaunchConfiguration")]
    AwsLaunchConfiguration,
    #[strum(serialize = "aws:ec2/launchTemplate:LaunchTemplate")]
    AwsLaunchTemplate,
    #[strum(serialize = "aws:ec2/natGateway:NatGateway")]
    AwsNatGateway,
    #[strum(serialize = "aws:ec2/subnet:Subnet")]
    AwsSubnet,
    #[strum(serialize = "aws:ec2/vpc:Vpc")]
    AwsVpc,
    #[strum(serialize = "aws:s3/bucket:Bucket")]
    AwsBucket,
    #[strum(serialize = "gcp:compute/instance:Instance")]
    GcpInstance,
    #[strum(serialize = "gcp:container/cluster:Cluster")]
    GcpCluster,
    #[strum(serialize = "gcp:container/nodePool:NodePool")]
    GcpNodePool,
    #[strum(serialize = "unknown")]
    Unknown,
}

impl ResourceKind {
    /// Tag a raw type token. Never fails: unrecognised tokens become `Unknown`.
    pub fn from_type_token(token: &str) -> Self {
        token.parse().unwrap_or(ResourceKind::Unknown)
    }

    /// The cloud this kind of resource is billed by, if any
    pub fn provider(&self) -> Option<CloudProvider> {
        match self {
            ResourceKind::AwsInstance
            | ResourceKind::AwsAutoscalingGroup
            | ResourceKind::AwsLaunchConfiguration
            | ResourceKind::AwsLaunchTemplate
            | ResourceKind::AwsNatGateway
            | ResourceKind::AwsSubnet
            | ResourceKind::AwsVpc
            | ResourceKind::AwsBucket => Some(CloudProvider::Aws),
            ResourceKind::GcpInstance | ResourceKind::GcpCluster | ResourceKind::GcpNodePool => {
                Some(CloudProvider::Gcp)
            }
            ResourceKind::Unknown => None,
        }
    }

    /// Whether resources of this kind carry a cost of their own
    pub fn is_billable(&self) -> bool {
        matches!(
            self,
            ResourceKind::AwsInstance
                | ResourceKind::AwsAutoscalingGroup
                | ResourceKind::AwsNatGateway
                | ResourceKind::GcpInstance
                | ResourceKind::GcpCluster
                | ResourceKind::GcpNodePool
        )
    }
}

#[derive(Debug, Deserialize)]
struct RawResource {
    #[serde(rename = "type")]
    type_token: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    props: Value,
}

/// One declared resource: its kind, logical name and property bag
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawResource")]
pub struct Resource {
    pub kind: ResourceKind,
    /// Type token as declared, kept for unknown kinds and reporting
    pub type_token: String,
    /// Logical name in the deployment
    pub name: String,
    pub props: Value,
}

impl From<RawResource> for Resource {
    fn from(raw: RawResource) -> Self {
        Self {
            kind: ResourceKind::from_type_token(&raw.type_token),
            type_token: raw.type_token,
            name: raw.name,
            props: raw.props,
        }
    }
}

impl Resource {
    pub fn new(kind: ResourceKind, name: impl Into<String>, props: Value) -> Self {
        Self {
            kind,
            type_token: kind.to_string(),
            name: name.into(),
            props,
        }
    }

    /// Look up a property by dotted path (`launchTemplate.name`)
    pub fn prop(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.props, |value, key| value.get(key))
            .filter(|value| !value.is_null())
    }

    pub fn str_prop(&self, path: &str) -> Option<&str> {
        self.prop(path).and_then(Value::as_str)
    }

    /// Integer property; accepts JSON numbers (including `4.0`) and numeric strings.
    /// Values outside `u64` are treated as absent.
    pub fn u64_prop(&self, path: &str) -> Option<u64> {
        match self.prop(path)? {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0 && *f >= 0.0)
                    .and_then(|f| u64::try_from(f as u128).ok())
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn bool_prop(&self, path: &str) -> Option<bool> {
        match self.prop(path)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Name used by sibling references: the physical `name` property, else the logical name
    pub fn reference_name(&self) -> &str {
        self.str_prop("name").unwrap_or(&self.name)
    }

    /// Tag value, or `None` when the tag is absent
    pub fn tag(&self, key: &str) -> Option<&Value> {
        self.props.get("tags").and_then(|tags| tags.get(key))
    }
}
