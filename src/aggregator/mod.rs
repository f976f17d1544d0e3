//! Aggregation of trace records into per-task job statistics.
//!
//! This module transforms loaded trace files into:
//! - One chronological event sequence (k-way merge)
//! - Per-task timelines and task metadata
//! - Per-job timing metrics (response time, lateness, execution time)

pub mod filter;
pub mod merge;
pub mod metrics;
pub mod task_index;

// Re-export main types and functions
pub use filter::TaskFilter;
pub use merge::merge_events;
pub use metrics::{CorrelatorConfig, JobCorrelator, JobStats};
pub use task_index::{Task, TaskIndex, TaskMetadata};
