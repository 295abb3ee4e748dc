//! Integration tests for the FinOps domain
//!
//! These tests estimate real resource graphs against catalog files on disk to ensure:
//! - Breakdowns are deterministic and reproducible
//! - The grand-total row always sums the other rows
//! - Unpriceable resources degrade to zero-cost rows instead of failing

use domain_cloud_resources::ResourceGraph;
use domain_finops::*;
use domain_pricing::{CatalogLoader, CloudProvider, Decimal};
use proptest::prelude::*;
use test_utils::{assertions::*, AwsOfferFixture, GraphBuilder, TestDataBuilder, TestPricingData};

fn parse(builder: &GraphBuilder) -> ResourceGraph {
    ResourceGraph::from_json_str(&builder.to_json()).unwrap()
}

fn aws_estimator(data: &TestPricingData) -> CostEstimator<Box<dyn domain_pricing::PriceResolver>> {
    let loader = CatalogLoader::from_dir(data.path());
    CostEstimator::for_provider(CloudProvider::Aws, &loader).unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_budget_scenario_totals() {
    let data = TestPricingData::new();
    data.write_aws_offers(&AwsOfferFixture::new().linux_instance("M5L", "m5.large", "0.192"));

    let graph = parse(
        &GraphBuilder::new()
            .aws_instance("web-1", "m5.large")
            .aws_instance("web-2", "m5.large"),
    );
    let items = aws_estimator(&data).estimate(&graph).unwrap();

    assert_eq!(items.len(), 2);
    assert_amount_eq(items[0].unit_monthly_cost.unwrap(), "138.24", "unit cost");
    assert_amount_eq(grand_total(&items).unwrap(), "276.48", "grand total");
    assert_eq!(format_amount(grand_total(&items).unwrap()), "$276.48");
}

#[test]
fn test_autoscaling_join_scenario() {
    let data = TestPricingData::standard();
    let builder = TestDataBuilder::from_test_name("autoscaling_join");

    let graph = parse(
        &GraphBuilder::new()
            .launch_configuration("lc-1", "t3.large")
            .autoscaling_group(&builder.name("asg", "web"), "lc-1", 4),
    );
    let items = aws_estimator(&data).estimate(&graph).unwrap();

    let asg = &items[0];
    assert_eq!(asg.resource_kind, "aws:autoscaling/group:Group");
    assert_eq!(asg.shape.as_deref(), Some("t3.large"));
    assert_eq!(asg.quantity, Some(4));
    assert_amount_eq(asg.total_monthly_cost, "239.616", "asg total");
}

#[test]
fn test_launch_template_join() {
    let data = TestPricingData::standard();
    let graph = parse(
        &GraphBuilder::new()
            .launch_template("lt-web", "m5.large")
            .autoscaling_group_with_template("asg", "lt-web", 2),
    );

    let items = aws_estimator(&data).estimate(&graph).unwrap();
    assert_amount_eq(items[0].total_monthly_cost, "138.24", "template asg total");
}

#[test]
fn test_unknown_shape_scenario() {
    let data = TestPricingData::standard();
    let graph = parse(
        &GraphBuilder::new()
            .aws_instance("odd", "unknown.type")
            .aws_instance("web", "m5.large"),
    );

    let items = aws_estimator(&data).estimate(&graph).unwrap();
    let unknown = items
        .iter()
        .find(|item| item.shape.as_deref() == Some("unknown.type"))
        .unwrap();

    assert_eq!(unknown.total_monthly_cost, Decimal::ZERO);
    assert!(assert_some(unknown.note.as_deref(), "note").contains("unknown.type"));
    assert_amount_eq(grand_total(&items).unwrap(), "69.12", "grand total");
}

#[test]
fn test_empty_graph_law() {
    let data = TestPricingData::standard();
    let items = aws_estimator(&data).estimate(&ResourceGraph::default()).unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_gcp_breakdown_with_cluster_fee() {
    let data = TestPricingData::standard();
    let loader = CatalogLoader::from_dir(data.path());
    let mut estimator = CostEstimator::for_provider(CloudProvider::Gcp, &loader).unwrap();

    let graph = parse(
        &GraphBuilder::new()
            .gcp_instance("vm-1", "n1-standard-16")
            .gke_cluster("gke", "e2-standard-4", 3)
            .gke_cluster_without_default_pool("gke-2")
            .gke_node_pool("pool", "n1-standard-2", 2),
    );
    let items = estimator.estimate(&graph).unwrap();

    let rows: Vec<_> = items
        .iter()
        .map(|i| (i.resource_kind.as_str(), i.shape.as_deref(), i.quantity))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("gcp:compute/instance:Instance", Some("n1-standard-16"), Some(1)),
            ("gcp:container/cluster:Cluster", Some("e2-standard-4"), Some(3)),
            ("gcp:container/cluster:Cluster", None, Some(2)),
            ("gcp:container/nodePool:NodePool", Some("n1-standard-2"), Some(2)),
            ("TOTAL", None, None),
        ]
    );
    assert_amount_eq(items[2].total_monthly_cost, "144", "cluster management fee");
    assert_eq!(grand_total(&items).unwrap(), sum_line_items(&items));
}

#[test]
fn test_missing_catalog_aborts_estimate() {
    let data = TestPricingData::new();
    let loader = CatalogLoader::from_dir(data.path());

    let err = CostEstimator::for_provider(CloudProvider::Aws, &loader).err().unwrap();
    assert!(err.to_string().contains("Unable to load local pricing file"));
}

#[test]
fn test_report_renders_breakdown() {
    let data = TestPricingData::standard();
    let graph = parse(&GraphBuilder::new().aws_instance("web", "m5.large").nat_gateway("ngw"));

    let items = aws_estimator(&data).estimate(&graph).unwrap();
    let table = render_table(&items);

    assert!(table.contains("aws:ec2/natGateway:NatGateway"));
    assert!(table.contains("$32.40"));
    assert!(table.contains("$101.52"));
}

// ============================================================================
// Properties
// ============================================================================

const SHAPES: [&str; 4] = ["m5.large", "t3.large", "m5.xlarge", "unknown.type"];

fn arb_graph() -> impl Strategy<Value = GraphBuilder> {
    prop::collection::vec((0usize..SHAPES.len(), 0u64..6, prop::bool::ANY), 0..12).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .fold(GraphBuilder::new(), |graph, (i, (shape, min_size, as_group))| {
                let shape = SHAPES[shape];
                if as_group {
                    let lc = format!("lc-{i}");
                    graph
                        .launch_configuration(&lc, shape)
                        .autoscaling_group(&format!("asg-{i}"), &lc, min_size)
                } else {
                    graph.aws_instance(&format!("vm-{i}"), shape)
                }
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn grand_total_sums_every_other_row(builder in arb_graph()) {
        let data = TestPricingData::standard();
        let items = aws_estimator(&data).estimate(&parse(&builder)).unwrap();

        if builder.is_empty() {
            prop_assert!(items.is_empty());
        } else {
            prop_assert_eq!(items.iter().filter(|i| i.is_grand_total).count(), 1);
            prop_assert!(items.last().unwrap().is_grand_total);
            prop_assert_eq!(grand_total(&items).unwrap(), sum_line_items(&items));
        }
    }

    #[test]
    fn estimates_are_idempotent(builder in arb_graph()) {
        let data = TestPricingData::standard();
        let graph = parse(&builder);

        let mut shared = aws_estimator(&data);
        let first = shared.estimate(&graph).unwrap();
        let second = shared.estimate(&graph).unwrap();
        let fresh = aws_estimator(&data).estimate(&graph).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &fresh);
    }
}
