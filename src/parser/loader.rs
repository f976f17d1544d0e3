//! Map trace files into memory.
//!
//! Each path becomes one `RecordStore`. Problems are handled per file:
//! an empty file still counts as a (record-less) input, while truncated
//! or unreadable files are left out of the run. Only when nothing usable
//! remains does loading fail.

use super::record_store::{RecordStore, TraceBuffer, TraceSet};
use crate::utils::error::{LoadError, PipelineError};
use log::{debug, info, warn};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Load every trace file into a `TraceSet`
///
/// **Public** - main entry point for loading
///
/// # Arguments
/// * `paths` - Trace files, in the order that breaks timestamp ties
///
/// # Returns
/// The usable stores, in argument order, with per-file warnings attached
///
/// # Errors
/// * `PipelineError::NoInputFiles` - no path given, or none could be used
pub fn load_traces<P: AsRef<Path>>(paths: &[P]) -> Result<TraceSet, PipelineError> {
    let mut stores = Vec::with_capacity(paths.len());
    let mut warnings = Vec::new();

    for path in paths {
        let path = path.as_ref();
        match load_store(path) {
            Ok(store) => {
                debug!("Loaded {} records from {}", store.record_count(), path.display());
                stores.push(store);
            }
            Err(err @ LoadError::EmptyBuffer { .. }) => {
                warn!("{}", err);
                stores.push(RecordStore::empty(path));
                warnings.push(err);
            }
            Err(err) => {
                warn!("Skipping trace file: {}", err);
                warnings.push(err);
            }
        }
    }

    if stores.is_empty() {
        return Err(PipelineError::NoInputFiles);
    }

    let set = TraceSet::with_warnings(stores, warnings);
    info!(
        "Loaded {} records from {} trace file(s)",
        set.total_records(),
        set.stores().len()
    );
    Ok(set)
}

/// Map a single trace file
///
/// **Public** - also useful on its own for inspecting one file
///
/// # Errors
/// * `LoadError::UnreadableFile` - open, stat or mmap failed
/// * `LoadError::EmptyBuffer` - zero-length file (not mapped)
/// * `LoadError::TruncatedBuffer` - length is not a whole number of records
pub fn load_store(path: &Path) -> Result<RecordStore, LoadError> {
    let unreadable = |source| LoadError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(unreadable)?;
    let len = file.metadata().map_err(unreadable)?.len();

    // Zero-length mappings are rejected by the OS; report the file as empty instead.
    if len == 0 {
        return Err(LoadError::EmptyBuffer {
            path: path.to_path_buf(),
        });
    }

    // SAFETY: the mapping is read-only and trace files are not modified while analysed.
    let map = unsafe { Mmap::map(&file) }.map_err(unreadable)?;

    RecordStore::new(path, TraceBuffer::Mapped(map))
}
