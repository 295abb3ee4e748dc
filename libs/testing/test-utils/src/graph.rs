//! Resource graph documents for tests.

use serde_json::{json, Value};

/// Builds a `{ "resources": [...] }` resource graph document
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    resources: Vec<Value>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource of any type token
    pub fn resource(mut self, type_token: &str, name: &str, props: Value) -> Self {
        self.resources
            .push(json!({ "type": type_token, "name": name, "props": props }));
        self
    }

    pub fn aws_instance(self, name: &str, instance_type: &str) -> Self {
        self.resource(
            "aws:ec2/instance:Instance",
            name,
            json!({ "instanceType": instance_type }),
        )
    }

    /// EC2 instance carrying every tag in `tags`
    pub fn tagged_aws_instance(self, name: &str, instance_type: &str, tags: &[(&str, &str)]) -> Self {
        let tags: serde_json::Map<String, Value> = tags
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        self.resource(
            "aws:ec2/instance:Instance",
            name,
            json!({ "instanceType": instance_type, "tags": tags }),
        )
    }

    pub fn launch_configuration(self, name: &str, instance_type: &str) -> Self {
        self.resource(
            "aws:ec2/launchConfiguration:LaunchConfiguration",
            name,
            json!({ "name": name, "instanceType": instance_type }),
        )
    }

    pub fn launch_template(self, name: &str, instance_type: &str) -> Self {
        self.resource(
            "aws:ec2/launchTemplate:LaunchTemplate",
            name,
            json!({ "name": name, "instanceType": instance_type }),
        )
    }

    /// Autoscaling group referencing a launch configuration by name
    pub fn autoscaling_group(self, name: &str, launch_configuration: &str, min_size: u64) -> Self {
        self.resource(
            "aws:autoscaling/group:Group",
            name,
            json!({ "launchConfiguration": launch_configuration, "minSize": min_size, "maxSize": min_size * 2 }),
        )
    }

    /// Autoscaling group referencing a launch template by name
    pub fn autoscaling_group_with_template(self, name: &str, launch_template: &str, min_size: u64) -> Self {
        self.resource(
            "aws:autoscaling/group:Group",
            name,
            json!({ "launchTemplate": { "name": launch_template }, "minSize": min_size }),
        )
    }

    pub fn nat_gateway(self, name: &str) -> Self {
        self.resource("aws:ec2/natGateway:NatGateway", name, json!({ "subnetId": "subnet-1" }))
    }

    pub fn subnet(self, name: &str, cidr_block: &str) -> Self {
        self.resource("aws:ec2/subnet:Subnet", name, json!({ "cidrBlock": cidr_block }))
    }

    pub fn vpc(self, name: &str, cidr_block: &str) -> Self {
        self.resource("aws:ec2/vpc:Vpc", name, json!({ "cidrBlock": cidr_block }))
    }

    /// Private, versioned, KMS-encrypted bucket
    pub fn compliant_bucket(self, name: &str) -> Self {
        self.bucket(
            name,
            json!({
                "acl": "private",
                "versioning": { "enabled": true },
                "serverSideEncryptionConfiguration": {
                    "rule": { "applyServerSideEncryptionByDefault": { "sseAlgorithm": "aws:kms" } }
                }
            }),
        )
    }

    pub fn bucket(self, name: &str, props: Value) -> Self {
        self.resource("aws:s3/bucket:Bucket", name, props)
    }

    pub fn gcp_instance(self, name: &str, machine_type: &str) -> Self {
        self.resource(
            "gcp:compute/instance:Instance",
            name,
            json!({ "machineType": machine_type }),
        )
    }

    /// GKE cluster with a default node pool of `initial_node_count` nodes
    pub fn gke_cluster(self, name: &str, machine_type: &str, initial_node_count: u64) -> Self {
        self.resource(
            "gcp:container/cluster:Cluster",
            name,
            json!({
                "initialNodeCount": initial_node_count,
                "nodeConfig": { "machineType": machine_type },
            }),
        )
    }

    /// GKE cluster whose default node pool is removed after creation
    pub fn gke_cluster_without_default_pool(self, name: &str) -> Self {
        self.resource(
            "gcp:container/cluster:Cluster",
            name,
            json!({ "initialNodeCount": 1, "removeDefaultNodePool": true }),
        )
    }

    pub fn gke_node_pool(self, name: &str, machine_type: &str, initial_node_count: u64) -> Self {
        self.resource(
            "gcp:container/nodePool:NodePool",
            name,
            json!({
                "initialNodeCount": initial_node_count,
                "nodeConfig": { "machineType": machine_type },
            }),
        )
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn build(&self) -> Value {
        json!({ "resources": self.resources })
    }

    pub fn to_json(&self) -> String {
        self.build().to_string()
    }
}
