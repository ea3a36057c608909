use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use daemonize::{Daemonize, Outcome};

use conhook_client::config_manager::ConfigLoader;
use conhook_common::constants::{PID_FILE, STDERR_FILE, STDOUT_FILE, WORKING_DIR};
use conhook_common::types::hook::Hook;
use conhook_daemon::client::DaemonClient;
use conhook_daemon::daemon::run;

use crate::commands::{Cli, Commands, HookCommands};
use crate::logging::setup_logging;

fn start_daemon() -> Result<Outcome<()>> {
    std::fs::create_dir_all(WORKING_DIR).context("Failed to create working directory")?;

    let stdout = File::create(STDOUT_FILE).context("Failed to create stdout file")?;
    let stderr = File::create(STDERR_FILE).context("Failed to create stderr file")?;

    Ok(Daemonize::new()
        .pid_file(PID_FILE)
        .working_directory(WORKING_DIR)
        .stdout(stdout)
        .stderr(stderr)
        .umask(0o002)
        .execute())
}

pub fn clean_up_after_daemon() -> Result<()> {
    for path in [PID_FILE, STDOUT_FILE, STDERR_FILE] {
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err).with_context(|| format!("Failed to remove {path}")),
        }
    }

    Ok(())
}

pub fn process_cli() -> Result<()> {
    // Has to stay sync because of daemonizing.
    let cli = Cli::parse();
    let config = ConfigLoader::load_config(cli.config.as_deref())?;
    let api_client = DaemonClient::new(format!("http://{}", config.server));

    match cli.command {
        Commands::Init { no_daemonize } => {
            if !no_daemonize {
                println!("Starting daemon...");
                match start_daemon()? {
                    Outcome::Parent(Ok(_)) => {
                        println!("Daemon started successfully.");
                        return Ok(());
                    }
                    Outcome::Parent(Err(e)) => {
                        println!("Failed to start daemon. Maybe one is already running? If not, run `conhook cleanup` first.");
                        println!("{e}");
                        return Ok(());
                    }
                    Outcome::Child(Err(e)) => {
                        anyhow::bail!(e);
                    }
                    Outcome::Child(Ok(_)) => {
                        setup_logging()?;
                    }
                }
            } else {
                setup_logging()?;
            }

            run(config)?;
            clean_up_after_daemon()
        }
        Commands::Cleanup => {
            let result = clean_up_after_daemon();
            if result.is_ok() {
                println!("Daemon files cleaned up successfully.");
            }
            result
        }
        command => {
            let result = tokio::runtime::Runtime::new()?
                .block_on(run_async_command(command, &api_client));
            if let Err(e) = result {
                println!("Failed to talk to the daemon. Maybe it is not running? If so, run `conhook init` to start it.");
                println!("Error: {e:#}");
            }

            Ok(())
        }
    }
}

async fn run_async_command(command: Commands, api_client: &DaemonClient) -> Result<()> {
    match command {
        Commands::Terminate => {
            api_client.send_terminate_request().await?;
            println!("Daemon terminating.");
        }
        Commands::Info => {
            let info = api_client.send_info_request().await?;
            println!("conhook {} on {}", info.version, info.hostname);
            println!("cached hooks: {}", info.cached_hooks);
        }
        Commands::Hooks(hooks) => run_hook_command(hooks, api_client).await?,
        Commands::Init { .. } | Commands::Cleanup => unreachable!("handled in process_cli"),
    }

    Ok(())
}

async fn run_hook_command(command: HookCommands, api_client: &DaemonClient) -> Result<()> {
    match command {
        HookCommands::List => {
            let hooks = api_client.list_hooks().await?;
            println!("{}", serde_json::to_string_pretty(&hooks)?);
        }
        HookCommands::Get { id } => {
            let hook = api_client.get_hook(&id).await?;
            println!("{}", serde_json::to_string_pretty(&hook)?);
        }
        HookCommands::Create { file, json } => {
            let raw = match (file, json) {
                (Some(path), None) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read hook definition {path:?}"))?,
                (None, Some(inline)) => inline,
                _ => anyhow::bail!("provide a hook definition via --file or --json"),
            };

            let hook: Hook =
                serde_json::from_str(&raw).context("Invalid hook definition")?;
            let stored = api_client.create_hook(&hook).await?;
            println!("created hook {}", stored.id);
        }
        HookCommands::Delete { id } => {
            api_client.delete_hook(&id).await?;
            println!("deleted hook {id}");
        }
    }

    Ok(())
}
