//! Report schema shared by the text and JSON writers.
//!
//! Schema is versioned to allow future evolution. All times are raw trace
//! units (nanoseconds); unit conversion happens in the writers.

use crate::aggregator::{JobStats, TaskMetadata};
use crate::utils::config::REPORT_SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Top-level report written by `stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Trace files that contributed records
    pub inputs: Vec<String>,

    /// Per-file problems met while loading
    #[serde(default)]
    pub warnings: Vec<String>,

    /// Task-system release time, if the trace announced one
    pub system_release: Option<u64>,

    /// Selected tasks in pid order
    pub tasks: Vec<TaskReport>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// One task and its jobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskReport {
    pub task: TaskMetadata,

    /// Number of trace records attributed to the task
    pub event_count: usize,

    pub jobs: Vec<JobStats>,
}

impl StatsReport {
    /// Assemble a report stamped with the current schema version and time
    pub fn new(
        inputs: Vec<String>,
        warnings: Vec<String>,
        system_release: Option<u64>,
        tasks: Vec<TaskReport>,
    ) -> Self {
        use chrono::Utc;

        Self {
            version: REPORT_SCHEMA_VERSION.to_string(),
            inputs,
            warnings,
            system_release,
            tasks,
            generated_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn job_count(&self) -> usize {
        self.tasks.iter().map(|t| t.jobs.len()).sum()
    }

    pub fn deadline_misses(&self) -> usize {
        self.tasks
            .iter()
            .flat_map(|t| &t.jobs)
            .filter(|j| j.deadline_missed)
            .count()
    }
}
