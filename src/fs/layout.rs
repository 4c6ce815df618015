//! Where checkpoint files live
//!
//! Checkpoints are stored one file per environment under a single directory:
//! `<workspace>/.waypoint/env/{name}.json` by default.

use std::path::{Path, PathBuf};

use crate::encoding::{with_appended_extension, SUPPORTED_EXTENSIONS};

/// Maps environment names to checkpoint file paths.
pub trait PathResolver {
    /// Directory holding every environment's checkpoint.
    fn env_dir(&self) -> PathBuf;

    /// Path of the checkpoint file for `name`. May lack an extension, in
    /// which case the default codec's extension is appended by the store.
    fn env_path(&self, name: &str) -> PathBuf;
}

/// Default layout: one file per environment in a fixed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    env_dir: PathBuf,
}

impl WorkspaceLayout {
    pub fn new<P: AsRef<Path>>(env_dir: P) -> Self {
        Self {
            env_dir: env_dir.as_ref().to_path_buf(),
        }
    }
}

impl PathResolver for WorkspaceLayout {
    fn env_dir(&self) -> PathBuf {
        self.env_dir.clone()
    }

    /// Prefers an existing file in any supported format; otherwise returns the
    /// extensionless path so new checkpoints get the default format.
    fn env_path(&self, name: &str) -> PathBuf {
        let base = self.env_dir.join(name);
        SUPPORTED_EXTENSIONS
            .iter()
            .map(|ext| with_appended_extension(&base, ext))
            .find(|candidate| candidate.is_file())
            .unwrap_or(base)
    }
}
