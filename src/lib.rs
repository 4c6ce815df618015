//! Environment checkpoint store.
//!
//! A checkpoint is the on-disk record of a named environment: its target
//! configuration and the snapshot of resources left by its latest
//! deployment. [`CheckpointStore`] loads, validates, saves and retires these
//! files.

pub mod checkpoint;
pub mod commands;
pub mod config;
pub mod encoding;
pub mod error;
pub mod fs;
pub mod models;
pub mod store;
pub mod validation;
pub mod workspace;

pub use error::{Error, ErrorKind, Result};
pub use store::{CheckpointStore, LoadedCheckpoint, SavedCheckpoint};
