//! Show command implementation
//!
//! Usage: waypoint show <env>

use anyhow::Result;
use colored::Colorize;

use crate::models::{PropertyValue, Resource};
use crate::workspace::Workspace;

/// Print an environment's configuration and latest deployment.
pub fn execute(workspace: &Workspace, env: &str) -> Result<()> {
    let loaded = workspace.store().get(env)?;
    let target = &loaded.target;

    println!("{} {}", "Environment:".bold(), target.name.cyan());
    println!("{} {}", "File:".bold(), loaded.path.display());

    println!("\n{}", "Configuration".bold());
    if target.config.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for (key, value) in &target.config {
        println!("  {key} = {value}");
    }

    let Some(snapshot) = &loaded.snapshot else {
        println!("\n{}", "No deployments recorded".dimmed());
        return Ok(());
    };

    let manifest = &snapshot.manifest;
    println!("\n{}", "Latest deployment".bold());
    println!(
        "  time:    {}",
        manifest.time.format("%Y-%m-%dT%H:%M:%SZ")
    );
    println!("  version: {}", manifest.version);
    if !manifest.is_intact() {
        println!("  {} manifest magic does not match its contents", "⚠".yellow());
    }
    for plugin in &manifest.plugins {
        println!("  plugin:  {}@{}", plugin.name, plugin.version);
    }

    println!("\n{} ({})", "Resources".bold(), snapshot.resources.len());
    for resource in &snapshot.resources {
        print_resource(resource);
    }

    Ok(())
}

fn print_resource(resource: &Resource) {
    let id = resource.id.as_deref().unwrap_or("-");
    println!(
        "  {} {} {}",
        resource.urn.cyan(),
        resource.resource_type.dimmed(),
        id
    );
    for (key, value) in &resource.outputs {
        println!("      {key}: {}", describe(value));
    }
}

fn describe(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Null => "null".to_string(),
        PropertyValue::Bool(b) => b.to_string(),
        PropertyValue::Number(n) => n.to_string(),
        PropertyValue::String(s) => format!("{s:?}"),
        PropertyValue::Array(items) => format!("[{} items]", items.len()),
        PropertyValue::Object(map) => format!("{{{} keys}}", map.len()),
        PropertyValue::Asset(asset) => match (&asset.path, &asset.uri) {
            (Some(path), _) => format!("asset({path})"),
            (None, Some(uri)) => format!("asset({uri})"),
            (None, None) => "asset(inline)".to_string(),
        },
        PropertyValue::Archive(archive) => {
            let location = archive.path.as_deref().or(archive.uri.as_deref()).unwrap_or("-");
            format!("archive({location})")
        }
    }
}
