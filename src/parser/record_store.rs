//! Read-only storage for the records of one or more trace files.
//!
//! A `RecordStore` owns the bytes of a single trace file and hands out
//! decoded records by index. A `TraceSet` groups the stores of one run;
//! everything downstream refers to records through `EventRef` handles
//! into it, so the merged order and the per-task orders share the same
//! immutable data.

use super::schema::EventRecord;
use crate::utils::config::RECORD_SIZE;
use crate::utils::error::LoadError;
use memmap2::Mmap;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// Backing bytes of a record store
#[derive(Debug)]
pub enum TraceBuffer {
    /// File mapped read-only into memory
    Mapped(Mmap),
    /// Bytes owned on the heap (tests, in-memory traces)
    Owned(Vec<u8>),
}

impl Deref for TraceBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Mapped(map) => &map[..],
            Self::Owned(bytes) => &bytes[..],
        }
    }
}

/// Records of one trace file
#[derive(Debug)]
pub struct RecordStore {
    origin: PathBuf,
    buffer: TraceBuffer,
}

impl RecordStore {
    /// Wrap a buffer of encoded records
    ///
    /// **Public** - main constructor
    ///
    /// # Errors
    /// * `LoadError::EmptyBuffer` - the buffer has no bytes; callers may treat
    ///   this as a store with zero records (see `RecordStore::empty`)
    /// * `LoadError::TruncatedBuffer` - length is not a multiple of `RECORD_SIZE`
    pub fn new(origin: impl Into<PathBuf>, buffer: TraceBuffer) -> Result<Self, LoadError> {
        let origin = origin.into();
        let len = buffer.len();

        if len == 0 {
            return Err(LoadError::EmptyBuffer { path: origin });
        }
        if len % RECORD_SIZE != 0 {
            return Err(LoadError::TruncatedBuffer { path: origin, len });
        }

        Ok(Self { origin, buffer })
    }

    /// A store without records
    pub fn empty(origin: impl Into<PathBuf>) -> Self {
        Self {
            origin: origin.into(),
            buffer: TraceBuffer::Owned(Vec::new()),
        }
    }

    /// Build a store from already decoded records
    ///
    /// **Public** - handy for synthetic traces
    pub fn from_records(origin: impl Into<PathBuf>, records: &[EventRecord]) -> Self {
        let bytes = records.iter().flat_map(|r| r.encode()).collect();
        Self {
            origin: origin.into(),
            buffer: TraceBuffer::Owned(bytes),
        }
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn record_count(&self) -> usize {
        self.buffer.len() / RECORD_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Decode the record at `index`, or `None` past the end
    pub fn record_at(&self, index: usize) -> Option<EventRecord> {
        let start = index.checked_mul(RECORD_SIZE)?;
        let end = start.checked_add(RECORD_SIZE)?;
        let raw: &[u8; RECORD_SIZE] = self.buffer.get(start..end)?.try_into().ok()?;
        Some(EventRecord::decode(raw))
    }
}

/// Handle to one record inside a `TraceSet`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventRef {
    /// Index of the store in the trace set
    pub source: usize,
    /// Record index inside that store
    pub index: usize,
}

impl EventRef {
    pub fn new(source: usize, index: usize) -> Self {
        Self { source, index }
    }
}

/// All record stores of one run plus the per-file problems met loading them
#[derive(Debug, Default)]
pub struct TraceSet {
    stores: Vec<RecordStore>,
    warnings: Vec<LoadError>,
}

impl TraceSet {
    pub fn new(stores: Vec<RecordStore>) -> Self {
        Self {
            stores,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(stores: Vec<RecordStore>, warnings: Vec<LoadError>) -> Self {
        Self { stores, warnings }
    }

    pub fn stores(&self) -> &[RecordStore] {
        &self.stores
    }

    pub fn warnings(&self) -> &[LoadError] {
        &self.warnings
    }

    pub fn total_records(&self) -> usize {
        self.stores.iter().map(RecordStore::record_count).sum()
    }

    /// Resolve a handle to its record
    pub fn get(&self, event: EventRef) -> Option<EventRecord> {
        self.stores.get(event.source)?.record_at(event.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_buffer_rejected() {
        let result = RecordStore::new("cpu0", TraceBuffer::Owned(vec![0u8; RECORD_SIZE + 3]));
        assert!(matches!(
            result,
            Err(LoadError::TruncatedBuffer { len, .. }) if len == RECORD_SIZE + 3
        ));
    }

    #[test]
    fn test_empty_buffer_reported() {
        let result = RecordStore::new("cpu0", TraceBuffer::Owned(Vec::new()));
        assert!(matches!(result, Err(LoadError::EmptyBuffer { .. })));
        assert_eq!(RecordStore::empty("cpu0").record_count(), 0);
    }

    #[test]
    fn test_record_at_bounds() {
        let store = RecordStore::from_records(
            "cpu0",
            &[
                EventRecord::release(1, 1, 10, 20),
                EventRecord::completion(1, 1, 15, false),
            ],
        );
        assert_eq!(store.record_count(), 2);
        assert_eq!(store.record_at(1).map(|r| r.timestamp()), Some(15));
        assert!(store.record_at(2).is_none());
        assert!(store.record_at(usize::MAX).is_none());
    }

    #[test]
    fn test_garbage_bytes_decode_without_panicking() {
        let bytes: Vec<u8> = (0..RECORD_SIZE * 4).map(|i| (i * 37 % 251) as u8).collect();
        let store = RecordStore::new("noise", TraceBuffer::Owned(bytes)).unwrap();
        for index in 0..store.record_count() {
            assert!(store.record_at(index).is_some());
        }
    }

    #[test]
    fn test_trace_set_resolves_handles() {
        let set = TraceSet::new(vec![
            RecordStore::from_records("a", &[EventRecord::release(1, 1, 5, 9)]),
            RecordStore::from_records("b", &[EventRecord::release(2, 1, 3, 9)]),
        ]);
        assert_eq!(set.total_records(), 2);
        assert_eq!(set.get(EventRef::new(1, 0)).map(|r| r.pid()), Some(2));
        assert!(set.get(EventRef::new(2, 0)).is_none());
    }
}
