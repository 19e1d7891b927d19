//! Metric-to-column resolution.

pub mod alias;
pub mod resolve;

pub use alias::AliasTable;
pub use resolve::{resolve_metrics, ResolvedMetric, ResolvedMetrics};
