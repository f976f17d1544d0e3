//! Trace loading and record decoding.
//!
//! This module handles:
//! - Mapping trace files into memory
//! - Validating buffer sizes
//! - Decoding fixed-size binary event records

pub mod loader;
pub mod record_store;
pub mod schema;

// Re-export main types
pub use loader::{load_store, load_traces};
pub use record_store::{EventRef, RecordStore, TraceBuffer, TraceSet};
pub use schema::{EventHeader, EventKind, EventPayload, EventRecord, TaskParams};
