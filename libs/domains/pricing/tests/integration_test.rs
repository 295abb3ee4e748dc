//! Integration tests for the Pricing domain
//!
//! These tests read real catalog files from a temporary data directory to ensure:
//! - Both file formats load (gzip JSON, plain and gzip CSV)
//! - Resolvers are selected per provider
//! - Catalogs are loaded once and cached lookups never rescan

use domain_pricing::*;
use proptest::prelude::*;
use std::str::FromStr;
use std::sync::Arc;
use test_utils::{assertions::*, AwsOfferFixture, GcpSkuFixture, TestDataBuilder, TestPricingData};

// ============================================================================
// Catalog Loader Tests
// ============================================================================

#[test]
fn test_loads_gzip_offer_file() {
    let data = TestPricingData::standard();
    let loader = CatalogLoader::from_dir(data.path());

    let catalog = loader.aws().unwrap();
    assert_eq!(catalog.products().len(), 5);
}

#[test]
fn test_catalog_is_loaded_once() {
    let data = TestPricingData::standard();
    let loader = CatalogLoader::from_dir(data.path());

    let first = loader.aws().unwrap();
    std::fs::remove_file(data.aws_offers_path()).unwrap();
    let second = loader.aws().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_loads_gzipped_csv_under_csv_name() {
    let data = TestPricingData::new();
    data.write_gcp_skus_gzipped(&GcpSkuFixture::standard());
    let loader = CatalogLoader::from_dir(data.path());

    assert_eq!(loader.gcp().unwrap().rows().len(), 3);
}

#[test]
fn test_missing_catalog_is_fatal() {
    let data = TestPricingData::new();
    let loader = CatalogLoader::from_dir(data.path());

    let err = resolver_for(CloudProvider::Aws, &loader).err().unwrap();
    assert!(!err.is_recoverable());
    assert!(err.to_string().contains(AWS_OFFERS_FILE_NAME));
}

#[test]
fn test_truncated_offer_file_is_parse_error() {
    let data = TestPricingData::new();
    data.write_raw(test_utils::AWS_OFFERS_FILE, b"{\"products\": {");
    let loader = CatalogLoader::from_dir(data.path());

    assert!(matches!(loader.aws().unwrap_err(), PricingError::CatalogParse { .. }));
}

const AWS_OFFERS_FILE_NAME: &str = "offers-ec2-us-east-1.json.gz";

// ============================================================================
// Resolver Tests
// ============================================================================

#[test]
fn test_aws_resolver_from_files() {
    let data = TestPricingData::standard();
    let loader = CatalogLoader::from_dir(data.path());
    let resolver = resolver_for(CloudProvider::Aws, &loader).unwrap();

    assert_eq!(resolver.provider(), CloudProvider::Aws);

    let entry = resolver.resolve("m5.large").unwrap();
    assert_eq!(entry.sku, "M5LARGE0001");
    assert_amount_eq(entry.hourly_price, "0.096", "m5.large hourly");
    assert_amount_eq(entry.monthly_price, "69.12", "m5.large monthly");

    let nat = resolver.resolve_flat(FlatCharge::NatGateway).unwrap();
    assert_amount_eq(nat.monthly_price, "32.40", "nat gateway monthly");
}

#[test]
fn test_gcp_resolver_from_files() {
    let data = TestPricingData::standard();
    let loader = CatalogLoader::from_dir(data.path());
    let resolver = resolver_for(CloudProvider::Gcp, &loader).unwrap();

    let entry = resolver.resolve("n1-standard-4").unwrap();
    assert_eq!(entry.sku, "2E27-4F75-95CD");
    assert_amount_eq(entry.hourly_price, "0.126444", "n1-standard-4 hourly");

    let err = resolver.resolve("t2a-standard-4").unwrap_err();
    assert!(err.is_recoverable());
}

#[test]
fn test_generated_skus_resolve() {
    let builder = TestDataBuilder::from_test_name("generated_skus");
    let sku = builder.sku(1);

    let data = TestPricingData::new();
    data.write_aws_offers(&AwsOfferFixture::new().linux_instance(&sku, "c6g.large", "0.068"));
    let loader = CatalogLoader::from_dir(data.path());

    let entry = resolver_for(CloudProvider::Aws, &loader)
        .unwrap()
        .resolve("c6g.large")
        .unwrap();
    assert_eq!(entry.sku, sku);
}

// ============================================================================
// Price Cache Tests
// ============================================================================

#[test]
fn test_cache_over_real_catalog() {
    let data = TestPricingData::standard();
    let loader = CatalogLoader::from_dir(data.path());
    let mut cache = PriceCache::new(resolver_for(CloudProvider::Aws, &loader).unwrap());

    let first = cache.resolve("t3.large").unwrap();
    let again = cache.resolve("t3.large").unwrap();
    let unknown = cache.resolve("unknown.type").unwrap();

    assert_eq!(first, again);
    assert!(first.is_priced());
    assert!(!unknown.is_priced());
    assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 2 });
}

// ============================================================================
// Monthly Conversion Law
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn monthly_price_is_hourly_times_720(micros in 0u64..10_000_000_000) {
        let hourly = Decimal::new(micros as i64, 6);
        let entry = PriceEntry::from_hourly("shape", "sku", hourly);

        prop_assert_eq!(entry.monthly_price, hourly * Decimal::from(720));
        prop_assert_eq!(entry.monthly_price / Decimal::from(HOURS_PER_MONTH), hourly);
    }

    #[test]
    fn resolved_prices_follow_monthly_law(cents in 1u32..100_000) {
        let price = Decimal::new(i64::from(cents), 4).to_string();
        let data = TestPricingData::new();
        data.write_gcp_skus(
            &GcpSkuFixture::new().core_sku("SKU", "E2 Instance Core running in Americas", &price),
        );
        let loader = CatalogLoader::from_dir(data.path());
        let entry = resolver_for(CloudProvider::Gcp, &loader)
            .unwrap()
            .resolve("e2-standard-8")
            .unwrap();

        let per_core = Decimal::from_str(&price).unwrap();
        prop_assert_eq!(entry.hourly_price, per_core * Decimal::from(8));
        prop_assert_eq!(entry.monthly_price, entry.hourly_price * Decimal::from(720));
    }
}
