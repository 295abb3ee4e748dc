//! FinOps Domain
//!
//! Monthly cost estimation of a proposed deployment.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │     Report      │  ← Plain-text table of line items
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │  CostEstimator  │  ← Groups resources by (kind, shape), prices and sums them
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │   PriceCache    │  ← domain_pricing: one catalog scan per shape
//! └─────────────────┘
//! ```

pub mod estimator;
pub mod models;
pub mod report;

// Re-export commonly used types
pub use estimator::{extract_records, sum_line_items, CostEstimator};
pub use models::{grand_total, CostLineItem, ResourceRecord, GRAND_TOTAL_LABEL};
pub use report::{format_amount, format_optional_amount, render_table};
