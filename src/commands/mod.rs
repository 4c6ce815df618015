pub mod check;
pub mod config;
pub mod init;
pub mod list;
pub mod rm;
pub mod show;

use anyhow::{bail, Result};

use crate::models::ConfigMap;
use crate::validation::validate_config_key;

/// Parse `key=value` arguments into a config map.
pub fn parse_config_pairs(pairs: &[String]) -> Result<ConfigMap> {
    let mut config = ConfigMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Invalid config entry '{pair}'. Expected key=value");
        };
        let key = key.trim();
        validate_config_key(key)?;
        config.insert(key.to_string(), value.to_string());
    }
    Ok(config)
}
