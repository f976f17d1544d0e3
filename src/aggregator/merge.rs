//! Chronological k-way merge of per-CPU record streams.
//!
//! Each trace file is already ordered by time, so the files are merged
//! with a min-heap holding at most one cursor per file instead of sorting
//! the union. Records with equal timestamps come out in file order: the
//! store with the lower index in the `TraceSet` wins.

use crate::parser::{EventRef, TraceSet};
use log::debug;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Cursor into one store, ordered for a min-heap on (timestamp, source)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    timestamp: u64,
    source: usize,
    index: usize,
}

// BinaryHeap is a max-heap; reverse the ordering so the earliest record
// (lowest source on ties) is on top.
impl Ord for Cursor {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.source.cmp(&self.source))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Cursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Merge all stores of a trace set into one chronological sequence
///
/// **Public** - main entry point for merging
///
/// # Arguments
/// * `traces` - Loaded trace files
///
/// # Returns
/// Handles to every record, ordered by timestamp, ties broken by store index.
/// Empty stores contribute nothing; an all-empty set yields an empty vector.
///
/// # Complexity
/// O(n log k) for n records across k files.
pub fn merge_events(traces: &TraceSet) -> Vec<EventRef> {
    let stores = traces.stores();
    let mut heap = BinaryHeap::with_capacity(stores.len());
    let mut merged = Vec::with_capacity(traces.total_records());

    for (source, store) in stores.iter().enumerate() {
        if let Some(first) = store.record_at(0) {
            heap.push(Cursor {
                timestamp: first.timestamp(),
                source,
                index: 0,
            });
        }
    }

    while let Some(cursor) = heap.pop() {
        merged.push(EventRef::new(cursor.source, cursor.index));

        let next = cursor.index + 1;
        if let Some(rec) = stores[cursor.source].record_at(next) {
            heap.push(Cursor {
                timestamp: rec.timestamp(),
                source: cursor.source,
                index: next,
            });
        }
    }

    debug!(
        "Merged {} records from {} stores",
        merged.len(),
        stores.len()
    );

    merged
}
