//! Workspace settings, read from `waypoint.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::encoding::Codec;

/// Name of the settings file at the workspace root.
pub const SETTINGS_FILE: &str = "waypoint.toml";

/// Default checkpoint directory, relative to the workspace root.
pub const DEFAULT_CHECKPOINT_DIR: &str = ".waypoint/env";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub checkpoints: CheckpointSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckpointSettings {
    /// Checkpoint directory, relative to the workspace root
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Format for newly created checkpoints
    #[serde(default)]
    pub format: Codec,
}

fn default_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CHECKPOINT_DIR)
}

impl Default for CheckpointSettings {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            format: Codec::default(),
        }
    }
}

impl Settings {
    /// Load settings from `root/waypoint.toml`, or defaults if the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings)
    }

    /// Write settings to `root/waypoint.toml`.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join(SETTINGS_FILE);
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
