//! Checkpoint store
//!
//! Loads, persists and retires an environment's checkpoint file. Loading is a
//! two-pass protocol: the bytes are decoded leniently into a [`Checkpoint`],
//! then decoded again into a generic document which, minus its
//! `latest.resources` subtree, must pass strict structural validation. The
//! returned value always comes from the first pass.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::checkpoint::{
    deserialize_checkpoint, serialize_checkpoint, strip_resources, Checkpoint, SchemaValidator,
    StructuralValidator,
};
use crate::encoding::{
    dotted_extension, with_appended_extension, Codec, ExtensionResolver, FormatResolver,
    SUPPORTED_EXTENSIONS,
};
use crate::error::{Error, Result};
use crate::fs::private::{create_private_dir_all, read_whole, write_private};
use crate::fs::{backup_file, BackupOutcome, PathResolver, WorkspaceLayout};
use crate::models::{Snapshot, Target};
use crate::validation::validate_env_name;

/// Result of a successful [`CheckpointStore::get`].
#[derive(Debug, Clone)]
pub struct LoadedCheckpoint {
    /// File the checkpoint was read from
    pub path: PathBuf,
    pub target: Target,
    /// Absent when no deployment has been recorded yet
    pub snapshot: Option<Snapshot>,
    /// The typed document as decoded from disk
    pub checkpoint: Checkpoint,
}

/// Result of a successful [`CheckpointStore::save`].
#[derive(Debug, Clone)]
pub struct SavedCheckpoint {
    /// File the checkpoint was written to
    pub path: PathBuf,
    /// What happened to the file that was there before
    pub backup: BackupOutcome,
}

/// Reads and writes environment checkpoints.
///
/// Path resolution, format detection and structural validation are injected
/// so each can be replaced independently.
#[derive(Debug, Clone)]
pub struct CheckpointStore<P = WorkspaceLayout, F = ExtensionResolver, V = SchemaValidator> {
    paths: P,
    formats: F,
    validator: V,
}

impl CheckpointStore {
    /// Store rooted at `env_dir` with the default resolver and validator.
    pub fn open<D: AsRef<Path>>(env_dir: D) -> Self {
        Self::new(
            WorkspaceLayout::new(env_dir),
            ExtensionResolver::default(),
            SchemaValidator,
        )
    }
}

impl<P, F, V> CheckpointStore<P, F, V>
where
    P: PathResolver,
    F: FormatResolver,
    V: StructuralValidator,
{
    pub fn new(paths: P, formats: F, validator: V) -> Self {
        Self {
            paths,
            formats,
            validator,
        }
    }

    /// Load and validate the checkpoint for `name`.
    pub fn get(&self, name: &str) -> Result<LoadedCheckpoint> {
        validate_env_name(name)?;
        let (path, codec) = self.resolve(name)?;

        let bytes = match read_whole(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::error!(env = name, "environment could not be found in the workspace");
                return Err(Error::NotFound {
                    name: name.to_string(),
                    path,
                });
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to read checkpoint");
                return Err(Error::io(path, e));
            }
        };

        let checkpoint: Checkpoint = match codec.unmarshal(&bytes) {
            Ok(checkpoint) => checkpoint,
            Err(source) => {
                tracing::error!(path = %path.display(), error = %source, "could not decode checkpoint");
                return Err(Error::MalformedDocument { path, source });
            }
        };

        // Second, independent pass: the typed decode above ignores unknown
        // fields, the validator does not.
        let mut document: Value = match codec.unmarshal(&bytes) {
            Ok(document) => document,
            Err(source) => {
                tracing::error!(path = %path.display(), error = %source, "could not decode checkpoint");
                return Err(Error::MalformedDocument { path, source });
            }
        };
        strip_resources(&mut document);

        if let Err(source) = self.validator.validate(&document) {
            tracing::error!(path = %path.display(), error = %source, "checkpoint failed validation");
            return Err(Error::SchemaViolation { path, source });
        }

        let (target, snapshot) = deserialize_checkpoint(&checkpoint);
        assert!(
            !target.name.is_empty(),
            "validated checkpoint produced an unnamed target"
        );

        if let Some(snapshot) = &snapshot {
            if !snapshot.manifest.is_intact() {
                tracing::warn!(path = %path.display(), "checkpoint manifest magic does not match its contents");
            }
        }

        tracing::debug!(env = name, path = %path.display(), %codec, "loaded checkpoint");
        Ok(LoadedCheckpoint {
            path,
            target,
            snapshot,
            checkpoint,
        })
    }

    /// Persist `target` and `snapshot`, backing up any previous checkpoint.
    pub fn save(&self, target: &Target, snapshot: Option<&Snapshot>) -> Result<SavedCheckpoint> {
        validate_env_name(&target.name)?;
        let (path, codec) = self.resolve(&target.name)?;

        let checkpoint = serialize_checkpoint(target, snapshot);
        let bytes = codec.marshal(&checkpoint).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "failed to encode checkpoint");
            Error::io(&path, io::Error::new(io::ErrorKind::InvalidData, e))
        })?;

        let backup = backup_file(&path);

        if let Some(dir) = path.parent() {
            create_private_dir_all(dir).map_err(|e| {
                tracing::error!(dir = %dir.display(), error = %e, "failed to create checkpoint directory");
                Error::io(dir, e)
            })?;
        }

        write_private(&path, &bytes).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "failed to write checkpoint");
            Error::io(&path, e)
        })?;

        tracing::debug!(env = %target.name, path = %path.display(), %codec, "saved checkpoint");
        Ok(SavedCheckpoint { path, backup })
    }

    /// Retire the checkpoint for `target` by moving it to its backup path.
    /// Nothing new is written.
    pub fn remove(&self, target: &Target) -> Result<BackupOutcome> {
        validate_env_name(&target.name)?;
        let (path, _) = self.resolve(&target.name)?;
        let outcome = backup_file(&path);
        tracing::debug!(env = %target.name, ?outcome, "removed checkpoint");
        Ok(outcome)
    }

    /// Whether a checkpoint file exists for `name`.
    pub fn exists(&self, name: &str) -> Result<bool> {
        validate_env_name(name)?;
        let (path, _) = self.resolve(name)?;
        Ok(path.is_file())
    }

    /// Names of all environments with a checkpoint, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let dir = self.paths.env_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::io(&dir, e))?.path();
            if !path.is_file() {
                continue;
            }
            let ext = dotted_extension(&path);
            if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_env_name(stem).is_ok() {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Resolve the checkpoint path and codec for `name`, appending the
    /// codec's canonical extension when the path has none.
    fn resolve(&self, name: &str) -> Result<(PathBuf, Codec)> {
        let path = self.paths.env_path(name);
        let (codec, ext) = self.formats.detect(&path);
        let Some(codec) = codec else {
            tracing::error!(path = %path.display(), ext = %ext, "illegal markup extension");
            return Err(Error::UnsupportedFormat { path, ext });
        };

        let path = if path.extension().is_none() {
            with_appended_extension(&path, &ext)
        } else {
            path
        };
        Ok((path, codec))
    }
}
