//! Check command implementation
//!
//! Usage: waypoint check <env>
//!
//! Loads the checkpoint, which runs the full decode and schema validation.
//! Failures are returned as the store's error and reported once by `main`.

use anyhow::Result;
use colored::Colorize;

use crate::workspace::Workspace;

pub fn execute(workspace: &Workspace, env: &str) -> Result<()> {
    let loaded = workspace.store().get(env)?;
    println!("{} {} is valid", "✓".green(), loaded.path.display());
    Ok(())
}
