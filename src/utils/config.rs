//! Configuration and constants for the trace pipeline.

/// Size in bytes of one encoded event record (header + payload)
pub const RECORD_SIZE: usize = 24;

/// Size in bytes of the record header
pub const HEADER_SIZE: usize = 8;

/// Length of the command name carried by a Name record
pub const TASK_NAME_LEN: usize = 16;

/// Number of events after a release that are searched for the job's
/// completion and context switches.
///
/// Recorders drop trailing events when their buffers overflow, so a job's
/// completion may never appear. The bound trades completeness for a fixed
/// amount of work per release.
pub const SEARCH_WINDOW: usize = 20;

/// Current JSON report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

// Unit conversion for millisecond output
pub const NS_PER_MS: u64 = 1_000_000;
