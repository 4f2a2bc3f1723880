//! Derivation across the full record set.

use boxscout_core::{Record, TargetListsSnapshot};
use tracing::warn;

use crate::derive::derive_record;

/// Derive target lists for every record and merge them into one snapshot.
///
/// Groups for the same list name accumulate in record iteration order. A
/// record that fails derivation is logged and skipped; it never aborts the
/// cycle.
pub fn derive_snapshot(records: &[Record]) -> TargetListsSnapshot {
    let mut snapshot = TargetListsSnapshot::new();
    for record in records {
        match derive_record(record) {
            Ok(pairs) => {
                for (name, group) in pairs {
                    snapshot.entry(name).or_default().push(group);
                }
            }
            Err(error) => {
                warn!(
                    record = record.display_name(),
                    address = record.display_address(),
                    %error,
                    "record skipped"
                );
            }
        }
    }
    snapshot
}
