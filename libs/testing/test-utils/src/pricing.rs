//! Pricing catalog fixtures written to a temporary directory.
//!
//! Files use the same layout and formats as the real pricing dumps, so the
//! loader under test reads them exactly as it reads production data.

use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const AWS_OFFERS_FILE: &str = "aws/offers-ec2-us-east-1.json.gz";
pub const GCP_SKUS_FILE: &str = "gcp/ondemand-pricing.csv";

pub const GCP_CORE_TAXONOMY: &str = "GCP > Compute > GCE > VMs On Demand > Cores: Per Core";

/// Temporary pricing data directory, removed on drop
pub struct TestPricingData {
    dir: TempDir,
}

impl TestPricingData {
    /// Create an empty data directory (no catalog files)
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create pricing data directory");
        tracing::debug!(path = %dir.path().display(), "Created test pricing data directory");
        Self { dir }
    }

    /// Data directory with both catalogs populated from the standard fixtures
    pub fn standard() -> Self {
        let data = Self::new();
        data.write_aws_offers(&AwsOfferFixture::standard());
        data.write_gcp_skus(&GcpSkuFixture::standard());
        data
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn aws_offers_path(&self) -> PathBuf {
        self.path().join(AWS_OFFERS_FILE)
    }

    pub fn gcp_skus_path(&self) -> PathBuf {
        self.path().join(GCP_SKUS_FILE)
    }

    /// Write the AWS offer file as gzip JSON
    pub fn write_aws_offers(&self, offers: &AwsOfferFixture) -> PathBuf {
        let path = self.aws_offers_path();
        write_file(&path, &gzip(offers.to_json().as_bytes()));
        path
    }

    /// Write the GCP SKU table as plain CSV
    pub fn write_gcp_skus(&self, skus: &GcpSkuFixture) -> PathBuf {
        let path = self.gcp_skus_path();
        write_file(&path, skus.to_csv().as_bytes());
        path
    }

    /// Write the GCP SKU table gzip compressed, keeping the `.csv` name
    pub fn write_gcp_skus_gzipped(&self, skus: &GcpSkuFixture) -> PathBuf {
        let path = self.gcp_skus_path();
        write_file(&path, &gzip(skus.to_csv().as_bytes()));
        path
    }

    /// Write arbitrary bytes at `relative` under the data directory
    pub fn write_raw(&self, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path().join(relative);
        write_file(&path, bytes);
        path
    }
}

impl Default for TestPricingData {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(path, bytes).expect("Failed to write fixture file");
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).expect("Failed to compress fixture");
    encoder.finish().expect("Failed to compress fixture")
}

/// Builder for an AWS bulk offer document (`products` + `terms.OnDemand`)
#[derive(Debug, Clone, Default)]
pub struct AwsOfferFixture {
    products: Map<String, Value>,
    on_demand: Map<String, Value>,
}

impl AwsOfferFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// m5.large at $0.096/h, t3.large at $0.0832/h, m5.xlarge at $0.192/h and a NAT gateway at $0.045/h
    pub fn standard() -> Self {
        Self::new()
            .linux_instance("M5LARGE0001", "m5.large", "0.0960000000")
            .windows_instance("M5LARGEWIN1", "m5.large", "0.1880000000")
            .linux_instance("T3LARGE0001", "t3.large", "0.0832000000")
            .linux_instance("M5XLARGE001", "m5.xlarge", "0.1920000000")
            .nat_gateway("NATGATEWAY1", "NatGateway-Hours", "0.0450000000")
    }

    /// Linux, no pre-installed software, shared tenancy box usage
    pub fn linux_instance(self, sku: &str, instance_type: &str, hourly_usd: &str) -> Self {
        self.product(
            sku,
            json!({
                "instanceType": instance_type,
                "operatingSystem": "Linux",
                "preInstalledSw": "NA",
                "tenancy": "Shared",
                "usagetype": format!("BoxUsage:{instance_type}"),
            }),
            Some(hourly_usd),
        )
    }

    pub fn windows_instance(self, sku: &str, instance_type: &str, hourly_usd: &str) -> Self {
        self.product(
            sku,
            json!({
                "instanceType": instance_type,
                "operatingSystem": "Windows",
                "preInstalledSw": "NA",
                "tenancy": "Shared",
                "usagetype": format!("BoxUsage:{instance_type}"),
            }),
            Some(hourly_usd),
        )
    }

    pub fn nat_gateway(self, sku: &str, usage_type: &str, hourly_usd: &str) -> Self {
        self.product(
            sku,
            json!({
                "group": "NGW:NatGateway",
                "operation": "NatGateway",
                "usagetype": usage_type,
            }),
            Some(hourly_usd),
        )
    }

    /// Add a product with raw attributes; `None` leaves it without an on-demand term
    pub fn product(mut self, sku: &str, attributes: Value, hourly_usd: Option<&str>) -> Self {
        self.products.insert(
            sku.to_string(),
            json!({ "sku": sku, "productFamily": "Compute Instance", "attributes": attributes }),
        );

        if let Some(usd) = hourly_usd {
            let term_code = format!("{sku}.JRTCKXETXF");
            let rate_code = format!("{term_code}.6YS6EN2CT7");
            let mut dimensions = Map::new();
            dimensions.insert(
                rate_code,
                json!({ "unit": "Hrs", "description": "On Demand", "pricePerUnit": { "USD": usd } }),
            );
            let mut terms = Map::new();
            terms.insert(
                term_code,
                json!({ "sku": sku, "offerTermCode": "JRTCKXETXF", "priceDimensions": dimensions }),
            );
            self.on_demand.insert(sku.to_string(), Value::Object(terms));
        }

        self
    }

    pub fn to_value(&self) -> Value {
        json!({
            "formatVersion": "v1.0",
            "offerCode": "AmazonEC2",
            "products": self.products,
            "terms": { "OnDemand": self.on_demand },
        })
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

/// Builder for the GCP SKU CSV table
#[derive(Debug, Clone, Default)]
pub struct GcpSkuFixture {
    rows: Vec<[String; 6]>,
}

impl GcpSkuFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// N1 cores at $0.031611/h, E2 cores at $0.021811/h, plus an N1 memory row
    pub fn standard() -> Self {
        Self::new()
            .core_sku("2E27-4F75-95CD", "N1 Predefined Instance Core running in Americas", "0.031611")
            .row(
                "6B8F-E63D-832B",
                "N1 Predefined Instance Ram running in Americas",
                "GCP > Compute > GCE > VMs On Demand > Memory: Per GB",
                "gibibyte hour",
                "0.004237",
            )
            .core_sku("CF4E-A0C7-E3BF", "E2 Instance Core running in Americas", "0.021811")
    }

    /// Hourly per-core on-demand SKU
    pub fn core_sku(self, sku_id: &str, description: &str, list_price: &str) -> Self {
        self.row(sku_id, description, GCP_CORE_TAXONOMY, "hour", list_price)
    }

    pub fn row(
        mut self,
        sku_id: &str,
        description: &str,
        taxonomy: &str,
        unit: &str,
        list_price: &str,
    ) -> Self {
        self.rows.push([
            "Compute Engine".to_string(),
            sku_id.to_string(),
            description.to_string(),
            taxonomy.to_string(),
            unit.to_string(),
            list_price.to_string(),
        ]);
        self
    }

    pub fn to_csv(&self) -> String {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "Service description",
                "SKU ID",
                "SKU description",
                "Product taxonomy",
                "Unit description",
                "List price ($)",
            ])
            .expect("Failed to write CSV header");
        for row in &self.rows {
            writer.write_record(row).expect("Failed to write CSV row");
        }

        let bytes = writer.into_inner().expect("Failed to flush CSV");
        String::from_utf8(bytes).expect("CSV fixture is UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_files_are_written() {
        let data = TestPricingData::standard();
        assert!(data.aws_offers_path().is_file());
        assert!(data.gcp_skus_path().is_file());

        let raw = std::fs::read(data.aws_offers_path()).unwrap();
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn test_offer_fixture_shape() {
        let value = AwsOfferFixture::new()
            .linux_instance("SKU1", "m5.large", "0.096")
            .to_value();

        assert_eq!(value["products"]["SKU1"]["attributes"]["usagetype"], "BoxUsage:m5.large");
        assert_eq!(
            value["terms"]["OnDemand"]["SKU1"]["SKU1.JRTCKXETXF"]["priceDimensions"]
                ["SKU1.JRTCKXETXF.6YS6EN2CT7"]["pricePerUnit"]["USD"],
            "0.096"
        );
    }

    #[test]
    fn test_csv_fixture_quotes_taxonomy() {
        let csv = GcpSkuFixture::new().core_sku("X", "N1 Predefined Instance Core running in Americas", "0.03").to_csv();
        assert!(csv.starts_with("Service description,SKU ID,"));
        assert!(csv.contains(GCP_CORE_TAXONOMY));
    }

    #[test]
    fn test_directory_removed_on_drop() {
        let path = {
            let data = TestPricingData::new();
            data.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
