//! Cost-estimation metrics: catalog loads, price cache behaviour, estimates and verdicts.

use metrics::{counter, gauge, histogram};
use std::time::Instant;

/// Cost estimation metrics recorder
pub struct CostMetrics;

impl CostMetrics {
    // =========================================================================
    // Catalog Metrics
    // =========================================================================

    /// Record a pricing catalog load from local storage
    pub fn record_catalog_loaded(provider: &str, entries: usize, duration_secs: f64) {
        counter!("cost_catalog_loads_total", "provider" => provider.to_string()).increment(1);
        histogram!("cost_catalog_load_duration_seconds", "provider" => provider.to_string())
            .record(duration_secs);
        gauge!("cost_catalog_entries", "provider" => provider.to_string()).set(entries as f64);

        tracing::info!(
            provider = provider,
            entries = entries,
            duration_secs = duration_secs,
            "Pricing catalog loaded"
        );
    }

    /// Record a catalog that could not be loaded
    pub fn record_catalog_unavailable(provider: &str, path: &str) {
        counter!("cost_catalog_failures_total", "provider" => provider.to_string()).increment(1);

        tracing::error!(provider = provider, path = path, "Pricing catalog unavailable");
    }

    // =========================================================================
    // Price Cache Metrics
    // =========================================================================

    /// Record a memoized price lookup that was served from the cache
    pub fn record_cache_hit(provider: &str) {
        counter!(
            "cost_price_cache_lookups_total",
            "provider" => provider.to_string(),
            "result" => "hit"
        )
        .increment(1);
    }

    /// Record a price lookup that required a catalog scan
    pub fn record_cache_miss(provider: &str, duration_secs: f64) {
        counter!(
            "cost_price_cache_lookups_total",
            "provider" => provider.to_string(),
            "result" => "miss"
        )
        .increment(1);
        histogram!("cost_price_resolution_duration_seconds", "provider" => provider.to_string())
            .record(duration_secs);
    }

    /// Record a shape that could not be priced
    pub fn record_unpriced_shape(provider: &str) {
        counter!("cost_unpriced_shapes_total", "provider" => provider.to_string()).increment(1);
    }

    // =========================================================================
    // Estimate and Policy Metrics
    // =========================================================================

    /// Set the latest estimated monthly total for a provider (USD)
    pub fn set_estimated_monthly_total(provider: &str, amount: f64) {
        gauge!("cost_estimated_monthly_usd", "provider" => provider.to_string()).set(amount);
    }

    /// Record a policy violation
    pub fn record_violation(policy: &str, enforcement_level: &str) {
        counter!(
            "cost_policy_violations_total",
            "policy" => policy.to_string(),
            "enforcement_level" => enforcement_level.to_string()
        )
        .increment(1);
    }
}

/// Timer guard for price resolutions.
///
/// Records a cache miss with the elapsed duration when `stop()` is called or when dropped.
pub struct ResolutionTimer {
    start: Instant,
    provider: String,
    stopped: bool,
}

impl ResolutionTimer {
    pub fn new(provider: &str) -> Self {
        Self {
            start: Instant::now(),
            provider: provider.to_string(),
            stopped: false,
        }
    }

    /// Stop the timer and record the miss. Returns elapsed seconds.
    pub fn stop(&mut self) -> f64 {
        if self.stopped {
            return 0.0;
        }
        self.stopped = true;

        let elapsed = self.start.elapsed().as_secs_f64();
        CostMetrics::record_cache_miss(&self.provider, elapsed);
        elapsed
    }
}

impl Drop for ResolutionTimer {
    fn drop(&mut self) {
        if !self.stopped {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        CostMetrics::record_catalog_loaded("aws", 10, 0.5);
        CostMetrics::record_cache_hit("aws");
        CostMetrics::record_unpriced_shape("gcp");
        CostMetrics::set_estimated_monthly_total("aws", 276.48);
        CostMetrics::record_violation("aws-budget-limit", "advisory");
    }

    #[test]
    fn test_timer_stops_once() {
        let mut timer = ResolutionTimer::new("aws");
        let first = timer.stop();
        assert!(first >= 0.0);
        assert_eq!(timer.stop(), 0.0);
    }
}
