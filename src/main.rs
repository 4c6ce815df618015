use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use waypoint::commands::{check, config, init, list, rm, show};
use waypoint::validation::clap_env_name_validator;
use waypoint::workspace::Workspace;

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "Manage deployment environment checkpoints", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new environment
    Init {
        /// Environment name (alphanumeric, dash, underscore only; max 128 characters)
        #[arg(value_parser = clap_env_name_validator)]
        env: String,

        /// Initial configuration values (key=value, repeatable)
        #[arg(short, long = "config")]
        config: Vec<String>,

        /// Overwrite an existing environment (the old checkpoint is kept as a backup)
        #[arg(long)]
        force: bool,
    },

    /// List environments in the workspace
    Ls,

    /// Show an environment's configuration and latest deployment
    Show {
        #[arg(value_parser = clap_env_name_validator)]
        env: String,
    },

    /// Validate an environment's checkpoint file
    Check {
        #[arg(value_parser = clap_env_name_validator)]
        env: String,
    },

    /// Read or change an environment's configuration
    Config {
        #[arg(value_parser = clap_env_name_validator)]
        env: String,

        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Retire an environment (its checkpoint is moved to a .bak file)
    Rm {
        #[arg(value_parser = clap_env_name_validator)]
        env: String,

        /// Remove even if resources are still recorded
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all configuration values
    Ls,
    /// Print one configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// Remove a configuration value
    Unset { key: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("WAYPOINT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { env, config, force } => {
            let workspace = Workspace::discover_or_current()?;
            init::execute(&workspace, &env, &config, force).map(|_| ())
        }
        Commands::Ls => {
            let workspace = Workspace::discover_or_current()?;
            list::execute(&workspace).map(|_| ())
        }
        Commands::Show { env } => show::execute(&discover()?, &env),
        Commands::Check { env } => check::execute(&discover()?, &env),
        Commands::Config { env, command } => {
            let workspace = discover()?;
            match command.unwrap_or(ConfigCommands::Ls) {
                ConfigCommands::Ls => config::list(&workspace, &env).map(|_| ()),
                ConfigCommands::Get { key } => config::get(&workspace, &env, &key).map(|_| ()),
                ConfigCommands::Set { key, value } => config::set(&workspace, &env, &key, &value),
                ConfigCommands::Unset { key } => config::unset(&workspace, &env, &key),
            }
        }
        Commands::Rm { env, force } => rm::execute(&discover()?, &env, force).map(|_| ()),
    }
}

fn discover() -> Result<Workspace> {
    let cwd = std::env::current_dir()?;
    Workspace::discover(&cwd)
}
