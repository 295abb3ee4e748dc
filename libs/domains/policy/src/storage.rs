//! S3 bucket policies. All mandatory.

use domain_cloud_resources::{Resource, ResourceKind};

use crate::error::PolicyResult;
use crate::models::{EnforcementLevel, Finding};
use crate::pack::{Policy, PolicyContext};

const PUBLIC_ACLS: [&str; 2] = ["public-read", "public-read-write"];
const KMS_ALGORITHM: &str = "aws:kms";
const SSE_ALGORITHM_PATH: &str =
    "serverSideEncryptionConfiguration.rule.applyServerSideEncryptionByDefault.sseAlgorithm";

/// One finding per bucket failing `is_compliant`
fn check_buckets(
    ctx: &PolicyContext<'_>,
    message: &str,
    is_compliant: impl Fn(&Resource) -> bool,
) -> Vec<Finding> {
    ctx.graph()
        .of_kind(ResourceKind::AwsBucket)
        .filter(|bucket| !is_compliant(bucket))
        .map(|bucket| Finding::resource(bucket.name.clone(), message))
        .collect()
}

macro_rules! bucket_policy {
    ($ty:ident, $name:literal, $description:literal) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl $ty {
            pub const NAME: &'static str = $name;
        }

        impl Policy for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn description(&self) -> &str {
                $description
            }

            fn enforcement_level(&self) -> EnforcementLevel {
                EnforcementLevel::Mandatory
            }

            fn validate(&self, ctx: &mut PolicyContext<'_>) -> PolicyResult<Vec<Finding>> {
                Ok(check_buckets(ctx, Self::MESSAGE, Self::is_compliant))
            }
        }
    };
}

bucket_policy!(
    PublicReadProhibited,
    "s3-bucket-public-read-prohibited",
    "S3 bucket must not be publicly accessible."
);

impl PublicReadProhibited {
    const MESSAGE: &'static str =
        "Bucket ACL must not be set to 'public-read' or 'public-read-write'.";

    fn is_compliant(bucket: &Resource) -> bool {
        !bucket
            .str_prop("acl")
            .is_some_and(|acl| PUBLIC_ACLS.contains(&acl))
    }
}

bucket_policy!(
    VersioningEnabled,
    "s3-bucket-versioning-enabled",
    "Object versioning must be enabled."
);

impl VersioningEnabled {
    const MESSAGE: &'static str = "Object versioning must be enabled.";

    fn is_compliant(bucket: &Resource) -> bool {
        bucket.prop("versioning").is_some() && bucket.bool_prop("versioning.enabled") != Some(false)
    }
}

bucket_policy!(
    StaticWebsiteProhibited,
    "s3-static-website-prohibited",
    "No static website hosting."
);

impl StaticWebsiteProhibited {
    const MESSAGE: &'static str = "Website hosting must not be enabled.";

    fn is_compliant(bucket: &Resource) -> bool {
        bucket.prop("website").is_none()
    }
}

bucket_policy!(
    KmsEncryptionEnabled,
    "s3-bucket-server-side-encryption-enabled",
    "Server-side encryption with KMS must be enabled."
);

impl KmsEncryptionEnabled {
    const MESSAGE: &'static str = "Server-side encryption with KMS must be enabled.";

    fn is_compliant(bucket: &Resource) -> bool {
        bucket.str_prop(SSE_ALGORITHM_PATH) == Some(KMS_ALGORITHM)
    }
}
