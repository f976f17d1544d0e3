//! Sched Trace Stats
//!
//! Per-job timing statistics from binary real-time scheduling traces.
//!
//! The pipeline maps one trace file per CPU, merges the files into a
//! single chronological event sequence, splits that sequence into
//! per-task timelines, and correlates every job release with its
//! completion and context switches to derive response time, lateness,
//! tardiness and execution time.
//!
//! ## Getting Started
//!
//! ```bash
//! st-job-stats stats cpu0.bin cpu1.bin
//! st-job-stats --help
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
