//! Strict checkpoint schema
//!
//! Mirrors the checkpoint document with `deny_unknown_fields` everywhere, so a
//! generic document decoded into it surfaces unknown keys, wrong types and an
//! empty target. `latest.resources` is not part of the shape: resources use
//! their own marshaling rules and are removed before validation.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A generic document did not match the checkpoint schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Checks a generic document against a known shape, for the error only.
pub trait StructuralValidator {
    fn validate(&self, document: &Value) -> Result<(), ValidationError>;
}

/// Validates documents against the strict checkpoint shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl StructuralValidator for SchemaValidator {
    fn validate(&self, document: &Value) -> Result<(), ValidationError> {
        CheckpointShape::deserialize(document)
            .map(|_| ())
            .map_err(|e| ValidationError::new(e.to_string()))
    }
}

/// Remove `latest.resources` from a generic document. Returns whether a
/// resources entry was present.
pub fn strip_resources(document: &mut Value) -> bool {
    match document.get_mut("latest") {
        Some(Value::Object(latest)) => latest.remove("resources").is_some(),
        _ => false,
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)]
struct CheckpointShape {
    target: NonEmptyName,
    #[serde(default)]
    config: Option<BTreeMap<String, String>>,
    #[serde(default)]
    latest: Option<DeploymentShape>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)]
struct DeploymentShape {
    manifest: ManifestShape,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)]
struct ManifestShape {
    time: DateTime<Utc>,
    magic: String,
    version: String,
    #[serde(default)]
    plugins: Vec<PluginShape>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)]
struct PluginShape {
    name: String,
    version: String,
}

#[derive(Deserialize)]
#[serde(try_from = "String")]
struct NonEmptyName;

impl TryFrom<String> for NonEmptyName {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        if name.is_empty() {
            return Err("target name cannot be empty".to_string());
        }
        Ok(NonEmptyName)
    }
}
