//! Checkpoint documents
//!
//! This module provides:
//! - The on-disk checkpoint document and its conversion to/from targets and snapshots
//! - The strict schema used to validate documents after the lenient typed decode

mod schema;
mod types;

pub use schema::{strip_resources, SchemaValidator, StructuralValidator, ValidationError};
pub use types::{deserialize_checkpoint, serialize_checkpoint, Checkpoint, Deployment};
