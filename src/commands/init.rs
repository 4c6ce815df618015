//! Init command implementation
//!
//! Usage: waypoint init <env> [-c key=value]... [--force]

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::commands::parse_config_pairs;
use crate::models::Target;
use crate::workspace::Workspace;

/// Create a checkpoint for a new environment with no deployment recorded.
pub fn execute(workspace: &Workspace, env: &str, config: &[String], force: bool) -> Result<PathBuf> {
    workspace.initialize()?;
    let store = workspace.store();

    if store.exists(env)? && !force {
        bail!("Environment '{env}' already exists. Use --force to overwrite.");
    }

    let target = Target::new(env).with_config(parse_config_pairs(config)?);
    let saved = store.save(&target, None)?;

    println!(
        "{} Created environment '{}' at {}",
        "✓".green(),
        env.cyan(),
        saved.path.display()
    );
    if saved.backup.is_moved() {
        println!("  {} previous checkpoint kept as backup", "→".dimmed());
    }

    Ok(saved.path)
}
