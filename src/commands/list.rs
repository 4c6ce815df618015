//! List command implementation
//!
//! Usage: waypoint ls

use anyhow::Result;
use colored::Colorize;

use crate::workspace::Workspace;

/// Print every environment with a checkpoint in the workspace.
pub fn execute(workspace: &Workspace) -> Result<Vec<String>> {
    let names = workspace.store().list()?;

    if names.is_empty() {
        println!("{} No environments in {}", "ℹ".blue(), workspace.checkpoint_dir().display());
        return Ok(names);
    }

    for name in &names {
        println!("  {name}");
    }
    Ok(names)
}
