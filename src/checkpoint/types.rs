//! Checkpoint document types
//!
//! The typed decode is lenient: unknown fields are ignored so that newer
//! files still load. Strictness is enforced separately by the schema.

use serde::{Deserialize, Serialize};

use crate::models::{ConfigMap, Manifest, Resource, Snapshot, Target};

/// The on-disk form of an environment's target and latest snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Environment name
    pub target: String,
    #[serde(default, skip_serializing_if = "ConfigMap::is_empty")]
    pub config: ConfigMap,
    /// Most recent deployment, absent until the first one completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<Deployment>,
}

/// The `latest` section of a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub manifest: Manifest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
}

/// Build the document that `save` writes for a target and optional snapshot.
pub fn serialize_checkpoint(target: &Target, snapshot: Option<&Snapshot>) -> Checkpoint {
    let latest = snapshot.map(|snap| Deployment {
        manifest: snap.manifest.clone(),
        resources: if snap.resources.is_empty() {
            None
        } else {
            Some(snap.resources.clone())
        },
    });

    Checkpoint {
        target: target.name.clone(),
        config: target.config.clone(),
        latest,
    }
}

/// Split a loaded document back into its target and snapshot.
pub fn deserialize_checkpoint(checkpoint: &Checkpoint) -> (Target, Option<Snapshot>) {
    let target = Target::new(checkpoint.target.clone()).with_config(checkpoint.config.clone());

    let snapshot = checkpoint.latest.as_ref().map(|latest| {
        Snapshot::new(
            latest.manifest.clone(),
            latest.resources.clone().unwrap_or_default(),
        )
    });

    (target, snapshot)
}
