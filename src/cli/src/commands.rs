use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "conhook", version, about = "Container lifecycle webhook agent")]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the agent daemon.
    Init {
        /// Run in the foreground instead of daemonizing.
        #[arg(long)]
        no_daemonize: bool,
    },
    /// Stop a running daemon.
    Terminate,
    /// Show daemon status.
    Info,
    /// Remove leftover daemon files.
    Cleanup,
    /// Manage webhook subscriptions.
    #[command(subcommand)]
    Hooks(HookCommands),
}

#[derive(Subcommand)]
pub enum HookCommands {
    /// List all stored hooks.
    List,
    /// Show one hook.
    Get { id: String },
    /// Register a hook from a JSON definition.
    Create {
        /// File containing the hook definition.
        #[arg(long, conflicts_with = "json")]
        file: Option<PathBuf>,
        /// Inline JSON hook definition.
        #[arg(long)]
        json: Option<String>,
    },
    /// Delete a hook.
    Delete { id: String },
}
