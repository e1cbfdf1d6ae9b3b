mod command;
mod config;
mod transport;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use command::ActionExecutor;
use config::Settings;
use power_remote_shared::{timing, DeviceActionRequest};
use std::path::PathBuf;

use tracing::{info, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wake up or shut down a machine on the local network
#[derive(Debug, Parser)]
#[command(name = "power-remote", version)]
struct Cli {
    /// TOML file overriding packet cadence, shutdown port and timeouts
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Run a widget record, e.g. '{"actionType":0,"ip":"192.168.1.50","mac":"AA:BB:CC:DD:EE:FF"}'
    Trigger {
        config_json: String,
    },
    /// Broadcast a Wake-on-LAN magic packet
    Wake {
        #[arg(long)]
        ip: String,
        #[arg(long)]
        mac: String,
        #[arg(long, default_value_t = timing::DEFAULT_WAKE_PORT)]
        port: u16,
    },
    /// Ask the shutdown agent on a host to power off
    Shutdown {
        #[arg(long)]
        ip: String,
        #[arg(long, env = "POWER_REMOTE_KEY", hide_env_values = true)]
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::load(path)
            .await
            .with_context(|| format!("could not load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let executor = ActionExecutor::from_settings(settings)?;

    let pending = match cli.action {
        Action::Trigger { config_json } => executor.submit_trigger(config_json),
        Action::Wake { ip, mac, port } => {
            executor.submit(DeviceActionRequest::wake(ip, mac, port))
        }
        Action::Shutdown { ip, key } => executor.submit(DeviceActionRequest::shutdown(ip, key)),
    };

    let outcome = pending.await.context("action task ended without an outcome")?;

    if outcome.succeeded {
        info!("Done: {}", outcome.detail);
        println!("{}", outcome.detail);
        Ok(())
    } else {
        error!("Action {}", outcome);
        bail!("{}", outcome)
    }
}
