//! Snapshot of provisioned resources
//!
//! A snapshot records what the last deployment left behind: a manifest
//! describing the deployment itself and the ordered list of resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::property::PropertyMap;

/// The most recently known set of provisioned resources.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub manifest: Manifest,
    pub resources: Vec<Resource>,
}

impl Snapshot {
    pub fn new(manifest: Manifest, resources: Vec<Resource>) -> Self {
        Self {
            manifest,
            resources,
        }
    }

    /// Find a resource by URN.
    pub fn resource(&self, urn: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.urn == urn)
    }
}

/// Metadata about the deployment that produced a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// When the deployment finished
    pub time: DateTime<Utc>,
    /// Integrity digest over `version` and `plugins`
    pub magic: String,
    /// Version of the tool that performed the deployment
    pub version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginInfo>,
}

/// A plugin that took part in a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
}

impl Manifest {
    /// Create a manifest stamped with the current time and a fresh magic digest.
    pub fn new(version: impl Into<String>, plugins: Vec<PluginInfo>) -> Self {
        let version = version.into();
        let magic = compute_magic(&version, &plugins);
        Self {
            time: Utc::now(),
            magic,
            version,
            plugins,
        }
    }

    /// Whether `magic` still matches the version and plugin list.
    pub fn is_intact(&self) -> bool {
        self.magic == compute_magic(&self.version, &self.plugins)
    }
}

fn compute_magic(version: &str, plugins: &[PluginInfo]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(version.as_bytes());
    hasher.update(b"\n");
    for plugin in plugins {
        hasher.update(plugin.name.as_bytes());
        hasher.update(b"@");
        hasher.update(plugin.version.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

/// A provisioned resource and its last known state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource name within the environment
    pub urn: String,
    /// Resource type token (e.g. `aws:s3/bucket:Bucket`)
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Provider-assigned ID, absent until the resource is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Whether a provider manages this resource (as opposed to a component)
    #[serde(default)]
    pub custom: bool,
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub inputs: PropertyMap,
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub outputs: PropertyMap,
    /// URNs of resources this one depends on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl Resource {
    pub fn new(urn: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            urn: urn.into(),
            resource_type: resource_type.into(),
            id: None,
            custom: false,
            inputs: PropertyMap::new(),
            outputs: PropertyMap::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self.custom = true;
        self
    }

    pub fn with_inputs(mut self, inputs: PropertyMap) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_outputs(mut self, outputs: PropertyMap) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }
}
