//! Cloud Resources Domain
//!
//! The proposed deployment as seen by policy checks: a flat list of resource
//! declarations, each tagged with a closed [`ResourceKind`] at ingestion.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_cloud_resources::{ResourceGraph, ResourceKind};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = ResourceGraph::from_file("preview.json")?;
//! for instance in graph.of_kind(ResourceKind::AwsInstance) {
//!     println!("{} -> {:?}", instance.name, instance.str_prop("instanceType"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod graph;
pub mod models;

// Re-export commonly used types
pub use error::{ResourceError, ResourceResult};
pub use graph::ResourceGraph;
pub use models::{Resource, ResourceKind};
