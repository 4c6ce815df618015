//! Best-effort backups before a checkpoint is overwritten or retired
//!
//! A backup is a rename of `<path>` to `<path>.bak`, replacing any earlier
//! backup. Failing to back up never blocks the caller: the failure is logged
//! and reported in the returned outcome.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::encoding::with_appended_extension;

/// Suffix appended to a checkpoint path to form its backup path.
pub const BACKUP_SUFFIX: &str = ".bak";

/// What happened when a backup was attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// The file was renamed to its backup path
    Moved { from: PathBuf, to: PathBuf },
    /// There was no file to back up
    Missing,
    /// The rename failed; the original file is left in place
    Failed { path: PathBuf, reason: String },
}

impl BackupOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, BackupOutcome::Moved { .. })
    }
}

/// Backup path for a checkpoint file.
pub fn backup_path(path: &Path) -> PathBuf {
    with_appended_extension(path, BACKUP_SUFFIX)
}

/// Move `path` aside to its backup path. Never fails.
pub fn backup_file(path: &Path) -> BackupOutcome {
    let to = backup_path(path);
    match fs::rename(path, &to) {
        Ok(()) => {
            tracing::debug!(from = %path.display(), to = %to.display(), "backed up checkpoint");
            BackupOutcome::Moved {
                from: path.to_path_buf(),
                to,
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => BackupOutcome::Missing,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to back up checkpoint; continuing");
            BackupOutcome::Failed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    }
}
