use anyhow::{Context, bail};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use coinpayments::core::{Config, GatewayConfig};
use coinpayments::{Command, GatewayClient, ParameterSet};

const USAGE: &str = "usage: coinpayments <command> [key=value ...]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,coinpayments=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(cmd) = args.next() else {
        bail!("{}\ncommands: {}", USAGE, command_list());
    };
    let command: Command = cmd.parse()?;

    let mut params = ParameterSet::new();
    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            bail!("expected key=value, got {:?}\n{}", arg, USAGE);
        };
        params.insert(key, value);
    }

    let config = match std::env::var_os("COINPAYMENTS_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            let config = Config::load(&path)?;
            tracing::info!("Loaded config from {}", path.display());
            config.gateway
        }
        None => GatewayConfig::from_env().context("no COINPAYMENTS_CONFIG file and no usable environment")?,
    };

    let client = GatewayClient::from_config(&config)?;
    let response = client
        .invoke(command, params)
        .await
        .with_context(|| format!("{} failed", command))?;

    if let Some(err) = coinpayments::gateway_api::remote_error(&response) {
        tracing::warn!("Gateway reported an error: {}", err);
    }

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn command_list() -> String {
    Command::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
}
