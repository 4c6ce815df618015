//! Resource property values
//!
//! Properties are mostly plain data, but assets and archives are encoded as
//! objects tagged with a `__sig` key so they survive a trip through any markup
//! format. These rules are specific to resources; the checkpoint schema does
//! not know about them.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key that marks a tagged property object.
pub const SIG_KEY: &str = "__sig";
pub const ASSET_SIG: &str = "asset";
pub const ARCHIVE_SIG: &str = "archive";

pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// A single resource input or output value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<PropertyValue>),
    Object(PropertyMap),
    Asset(Asset),
    Archive(Archive),
}

/// A blob of data referenced by a resource, given inline or by location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Asset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// A collection of files referenced by a resource, by path or URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Archive {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Asset {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

impl Archive {
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
struct Signed<'a, T> {
    #[serde(rename = "__sig")]
    sig: &'a str,
    #[serde(flatten)]
    inner: &'a T,
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Null => serializer.serialize_unit(),
            PropertyValue::Bool(b) => serializer.serialize_bool(*b),
            PropertyValue::Number(n) if !n.is_finite() => Err(serde::ser::Error::custom(
                format!("number {n} cannot be stored in a checkpoint"),
            )),
            PropertyValue::Number(n) => serializer.serialize_f64(*n),
            PropertyValue::String(s) => serializer.serialize_str(s),
            PropertyValue::Array(items) => items.serialize(serializer),
            PropertyValue::Object(map) => map.serialize(serializer),
            PropertyValue::Asset(asset) => Signed {
                sig: ASSET_SIG,
                inner: asset,
            }
            .serialize(serializer),
            PropertyValue::Archive(archive) => Signed {
                sig: ARCHIVE_SIG,
                inner: archive,
            }
            .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        PropertyValue::from_json(value).map_err(D::Error::custom)
    }
}

impl PropertyValue {
    fn from_json(value: Value) -> Result<Self, String> {
        Ok(match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(b),
            Value::Number(n) => PropertyValue::Number(
                n.as_f64()
                    .ok_or_else(|| format!("number {n} is not representable"))?,
            ),
            Value::String(s) => PropertyValue::String(s),
            Value::Array(items) => PropertyValue::Array(
                items
                    .into_iter()
                    .map(PropertyValue::from_json)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => PropertyValue::from_object(map)?,
        })
    }

    fn from_object(mut map: Map<String, Value>) -> Result<Self, String> {
        let Some(sig) = map.remove(SIG_KEY) else {
            let props = map
                .into_iter()
                .map(|(k, v)| Ok((k, PropertyValue::from_json(v)?)))
                .collect::<Result<PropertyMap, String>>()?;
            return Ok(PropertyValue::Object(props));
        };

        let rest = Value::Object(map);
        match sig.as_str() {
            Some(ASSET_SIG) => serde_json::from_value(rest)
                .map(PropertyValue::Asset)
                .map_err(|e| format!("invalid asset: {e}")),
            Some(ARCHIVE_SIG) => serde_json::from_value(rest)
                .map(PropertyValue::Archive)
                .map_err(|e| format!("invalid archive: {e}")),
            _ => Err(format!("unrecognized property signature: {sig}")),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}
