//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod stats;
pub mod tasks;
pub mod utils;

// Re-export main command functions
pub use models::{AnalysisOptions, StatsArgs};
pub use stats::{analyze, execute_stats, validate_args};
pub use tasks::execute_tasks;
pub use utils::{display_version, validate_report_file};
