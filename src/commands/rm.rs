//! Remove command implementation
//!
//! Usage: waypoint rm <env> [--force]
//!
//! The checkpoint is moved to its `.bak` path; nothing is deleted.

use anyhow::{bail, Result};
use colored::Colorize;

use crate::error::ErrorKind;
use crate::fs::BackupOutcome;
use crate::models::Target;
use crate::workspace::Workspace;

pub fn execute(workspace: &Workspace, env: &str, force: bool) -> Result<BackupOutcome> {
    let store = workspace.store();

    // --force retires the file without reading it, so broken checkpoints can go too.
    if !force {
        match store.get(env) {
            Ok(loaded) => {
                let live = loaded
                    .snapshot
                    .as_ref()
                    .map(|snap| snap.resources.len())
                    .unwrap_or(0);
                if live > 0 {
                    bail!(
                        "Environment '{env}' still has {live} resource(s) recorded. Destroy them first or use --force."
                    );
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Cannot inspect environment '{env}'; use --force to remove it anyway")));
            }
        }
    }

    let outcome = store.remove(&Target::new(env))?;
    match &outcome {
        BackupOutcome::Moved { to, .. } => println!(
            "{} Removed environment '{}' (backup at {})",
            "✓".green(),
            env.cyan(),
            to.display()
        ),
        BackupOutcome::Missing => println!("{} Environment '{}' had no checkpoint", "ℹ".blue(), env),
        BackupOutcome::Failed { reason, .. } => println!(
            "{} Could not move checkpoint for '{}' aside: {reason}",
            "⚠".yellow(),
            env
        ),
    }

    Ok(outcome)
}
