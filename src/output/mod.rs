//! Report assembly and writers.
//!
//! This module handles:
//! - The versioned report schema
//! - JSON reports (write and read back)
//! - The plain-text job table

pub mod json;
pub mod report;
pub mod text;

// Re-export main functions
pub use json::{read_report, write_report};
pub use report::{StatsReport, TaskReport};
pub use text::{write_text_report, TimeUnit};
