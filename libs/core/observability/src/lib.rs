//! Observability utilities for the cost estimation pipeline.
//!
//! This crate provides:
//! - Prometheus metrics recording and rendering
//! - Cost-specific metrics (catalog loads, price cache, estimates, violations)
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, CostMetrics};
//!
//! let handle = init_metrics()?;
//! CostMetrics::record_cache_hit("aws");
//! eprintln!("{}", handle.render());
//! ```

pub mod cost;

pub use cost::{CostMetrics, ResolutionTimer};

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

pub use metrics_exporter_prometheus::BuildError;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// Only the first call installs the recorder; later calls return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;

        info!("Prometheus metrics recorder initialized");

        register_metric_descriptions();

        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Render the Prometheus exposition text, or a placeholder when no recorder is installed
pub fn render_metrics() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

/// Register metric descriptions for documentation
fn register_metric_descriptions() {
    use metrics::describe_counter;
    use metrics::describe_gauge;
    use metrics::describe_histogram;

    // Catalog metrics
    describe_counter!(
        "cost_catalog_loads_total",
        "Pricing catalogs loaded from local storage by provider"
    );
    describe_counter!(
        "cost_catalog_failures_total",
        "Pricing catalogs that could not be loaded"
    );
    describe_histogram!(
        "cost_catalog_load_duration_seconds",
        "Time spent reading and decompressing a pricing catalog"
    );
    describe_gauge!(
        "cost_catalog_entries",
        "Entries in the loaded pricing catalog by provider"
    );

    // Price cache metrics
    describe_counter!(
        "cost_price_cache_lookups_total",
        "Memoized price lookups by provider and result (hit/miss)"
    );
    describe_histogram!(
        "cost_price_resolution_duration_seconds",
        "Duration of uncached catalog scans"
    );
    describe_counter!(
        "cost_unpriced_shapes_total",
        "Shapes that matched no catalog entry"
    );

    // Estimate and policy metrics
    describe_gauge!(
        "cost_estimated_monthly_usd",
        "Latest estimated monthly cost in USD by provider"
    );
    describe_counter!(
        "cost_policy_violations_total",
        "Policy violations by policy and enforcement level"
    );
}
