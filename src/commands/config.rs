//! Config command implementations for an environment's configuration.
//!
//! Commands:
//! - `waypoint config <env> ls` - List config values
//! - `waypoint config <env> get <key>` - Get a config value
//! - `waypoint config <env> set <key> <value>` - Set a config value
//! - `waypoint config <env> unset <key>` - Remove a config value
//!
//! Writes keep the environment's latest snapshot untouched.

use anyhow::{bail, Result};
use colored::Colorize;

use crate::models::ConfigMap;
use crate::validation::validate_config_key;
use crate::workspace::Workspace;

/// List all config values for an environment.
pub fn list(workspace: &Workspace, env: &str) -> Result<ConfigMap> {
    let loaded = workspace.store().get(env)?;
    let config = loaded.target.config;

    if config.is_empty() {
        println!("{} No configuration for '{}'", "ℹ".blue(), env);
        return Ok(config);
    }

    println!("{:30} {}", "KEY".bold(), "VALUE".bold());
    println!("{}", "─".repeat(60));
    for (key, value) in &config {
        println!("{:30} {}", key.cyan(), value);
    }
    Ok(config)
}

/// Get a single config value.
pub fn get(workspace: &Workspace, env: &str, key: &str) -> Result<String> {
    let loaded = workspace.store().get(env)?;
    match loaded.target.config.get(key) {
        Some(value) => {
            println!("{value}");
            Ok(value.clone())
        }
        None => bail!("Config key '{key}' is not set for environment '{env}'"),
    }
}

/// Set a config value and save the checkpoint.
pub fn set(workspace: &Workspace, env: &str, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    let store = workspace.store();
    let mut loaded = store.get(env)?;

    let previous = loaded.target.set_config(key, value);
    store.save(&loaded.target, loaded.snapshot.as_ref())?;

    match previous {
        Some(old) => println!(
            "{} Set '{}' = '{}' (was '{}')",
            "✓".green(),
            key.cyan(),
            value,
            old.dimmed()
        ),
        None => println!("{} Set '{}' = '{}'", "✓".green(), key.cyan(), value),
    }
    Ok(())
}

/// Remove a config value and save the checkpoint.
pub fn unset(workspace: &Workspace, env: &str, key: &str) -> Result<()> {
    let store = workspace.store();
    let mut loaded = store.get(env)?;

    if loaded.target.config.remove(key).is_none() {
        bail!("Config key '{key}' is not set for environment '{env}'");
    }
    store.save(&loaded.target, loaded.snapshot.as_ref())?;

    println!("{} Removed '{}'", "✓".green(), key.cyan());
    Ok(())
}
