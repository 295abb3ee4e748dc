//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for all domain crates:
//! - `TestPricingData`: temporary pricing data directory with real catalog files
//! - `AwsOfferFixture` / `GcpSkuFixture`: builders for catalog contents
//! - `GraphBuilder`: resource graph documents
//! - `TestDataBuilder`: Deterministic test data generation
//! - `assertions`: Custom assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{GraphBuilder, TestPricingData};
//!
//! let data = TestPricingData::standard();
//! let graph = GraphBuilder::new()
//!     .aws_instance("web-1", "m5.large")
//!     .to_json();
//! // CatalogLoader::from_dir(data.path()) ...
//! ```

mod graph;
mod pricing;

pub use graph::GraphBuilder;
pub use pricing::{
    AwsOfferFixture, GcpSkuFixture, TestPricingData, AWS_OFFERS_FILE, GCP_CORE_TAXONOMY,
    GCP_SKUS_FILE,
};

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_estimate_asg");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique resource name for testing
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("asg", "main"), "test-asg-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Generate an AWS-style SKU code (11 upper-case alphanumerics)
    pub fn sku(&self, index: u32) -> String {
        const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
        let mut value = self.seed ^ (u64::from(index).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        (0..11)
            .map(|_| {
                let c = ALPHABET[(value % ALPHABET.len() as u64) as usize] as char;
                value = value / ALPHABET.len() as u64 + 0x5851_F42D;
                c
            })
            .collect()
    }
}

/// Test assertion helpers
pub mod assertions {
    use rust_decimal::Decimal;
    use std::str::FromStr;

    /// Assert that a decimal amount equals the expected literal
    pub fn assert_amount_eq(actual: Decimal, expected: &str, context: &str) {
        let expected = Decimal::from_str(expected)
            .unwrap_or_else(|e| panic!("{}: bad expected amount {}: {}", context, expected, e));
        assert_eq!(
            actual, expected,
            "{}: expected amount {}, got {}",
            context, expected, actual
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
