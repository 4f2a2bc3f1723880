//! boxscout-reconcile — converges the output directory onto a snapshot.
//!
//! Each target list becomes one JSON file. Files are replaced atomically and
//! only when their content changed; files whose list left the snapshot are
//! deleted. The directory itself is the record of what was previously
//! emitted — there is no in-memory history, so a restart diffs correctly
//! against whatever is on disk.

pub mod writer;

pub use writer::{LIST_FILE_PREFIX, LIST_FILE_SUFFIX, ReconcileSummary, reconcile};
