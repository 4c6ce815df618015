use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Failure while encoding or decoding a document.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A markup format that checkpoints can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    #[default]
    Json,
    Yaml,
}

impl std::fmt::Display for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Codec::Json => write!(f, "json"),
            Codec::Yaml => write!(f, "yaml"),
        }
    }
}

impl std::str::FromStr for Codec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Codec::Json),
            "yaml" | "yml" => Ok(Codec::Yaml),
            _ => anyhow::bail!("Invalid checkpoint format: {s}. Use: json, yaml"),
        }
    }
}

impl Codec {
    /// Canonical extension for files written with this codec.
    pub fn extension(self) -> &'static str {
        match self {
            Codec::Json => ".json",
            Codec::Yaml => ".yaml",
        }
    }

    /// Look up the codec for a dotted extension such as `.yml`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            ".json" => Some(Codec::Json),
            ".yaml" | ".yml" => Some(Codec::Yaml),
            _ => None,
        }
    }

    pub fn marshal<T: Serialize>(self, value: &T) -> Result<Vec<u8>, CodecError> {
        match self {
            Codec::Json => {
                let mut bytes = serde_json::to_vec_pretty(value)?;
                bytes.push(b'\n');
                Ok(bytes)
            }
            Codec::Yaml => Ok(serde_yaml::to_string(value)?.into_bytes()),
        }
    }

    /// Decode `bytes` into `T`. Works for both typed shapes and generic
    /// `serde_json::Value` documents.
    pub fn unmarshal<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T, CodecError> {
        match self {
            Codec::Json => Ok(serde_json::from_slice(bytes)?),
            Codec::Yaml => Ok(serde_yaml::from_slice(bytes)?),
        }
    }
}
