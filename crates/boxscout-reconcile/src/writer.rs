//! Snapshot-to-directory convergence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use boxscout_core::{TargetGroup, TargetListsSnapshot};
use tracing::{info, warn};

/// Prefix of every file the reconciler owns; the delete scan only ever
/// touches files carrying it.
pub const LIST_FILE_PREFIX: &str = "sd_";
/// Extension of canonical list files.
pub const LIST_FILE_SUFFIX: &str = ".json";
/// Suffix appended to the canonical name while a replacement is in flight.
const TMP_SUFFIX: &str = ".tmp";

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Lists whose file was created or replaced.
    pub written: Vec<String>,
    /// Stale files deleted, by list name.
    pub removed: Vec<String>,
    /// Lists whose on-disk content already matched.
    pub unchanged: usize,
    /// Lists (or stale files) whose I/O failed; their on-disk state is
    /// whatever the previous cycle left.
    pub failed: Vec<String>,
}

/// Converge `dir` onto `snapshot`.
///
/// Per-list I/O errors are recorded in the summary and do not abort the
/// remaining lists. Only directory-level failures (creating or scanning
/// `dir`) error out.
pub fn reconcile(dir: &Path, snapshot: &TargetListsSnapshot) -> io::Result<ReconcileSummary> {
    fs::create_dir_all(dir)?;

    let mut summary = ReconcileSummary::default();
    for (name, groups) in snapshot {
        match write_list(dir, name, groups) {
            Ok(true) => {
                info!(list = %name, "list file updated");
                summary.written.push(name.clone());
            }
            Ok(false) => summary.unchanged += 1,
            Err(error) => {
                warn!(list = %name, %error, "failed to write list file");
                summary.failed.push(name.clone());
            }
        }
    }

    // Stale scan runs strictly after every write above has completed, so a
    // file being (re)written this cycle can never be deleted.
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let Some(list) = file_name
            .strip_prefix(LIST_FILE_PREFIX)
            .and_then(|rest| rest.strip_suffix(LIST_FILE_SUFFIX))
        else {
            continue;
        };
        if snapshot.contains_key(list) {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => {
                info!(list, path = %entry.path().display(), "stale list file removed");
                summary.removed.push(list.to_string());
            }
            Err(error) => {
                warn!(list, %error, "failed to remove stale list file");
                summary.failed.push(list.to_string());
            }
        }
    }

    Ok(summary)
}

/// Write one list if its serialized content differs from the canonical file.
///
/// Returns `Ok(true)` when the canonical file was replaced, `Ok(false)` when
/// it already matched byte-for-byte.
fn write_list(dir: &Path, name: &str, groups: &[TargetGroup]) -> io::Result<bool> {
    let content = serde_json::to_vec(groups)?;
    let canonical = canonical_path(dir, name);

    if let Ok(existing) = fs::read(&canonical)
        && existing == content
    {
        return Ok(false);
    }

    let tmp = dir.join(format!("{LIST_FILE_PREFIX}{name}{LIST_FILE_SUFFIX}{TMP_SUFFIX}"));
    fs::write(&tmp, &content)?;
    if let Err(error) = fs::rename(&tmp, &canonical) {
        let _ = fs::remove_file(&tmp);
        return Err(error);
    }
    Ok(true)
}

fn canonical_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{LIST_FILE_PREFIX}{name}{LIST_FILE_SUFFIX}"))
}
