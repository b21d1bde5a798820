//! Sentinel daemon — entry point for replaying alert scenarios.

mod scenario;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use sentinel_node::{init_logging, AlertService, LogFormat, NodeConfig};
use sentinel_store::MemoryReportStore;
use sentinel_types::SystemClock;
use tokio::sync::broadcast::error::TryRecvError;

#[derive(Parser)]
#[command(name = "sentinel-daemon", about = "Sentinel community alert engine")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "SENTINEL_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "SENTINEL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "SENTINEL_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Danger-zone radius in meters.
    #[arg(long, env = "SENTINEL_DANGER_RADIUS_M")]
    danger_radius_m: Option<f64>,

    /// Confirmations required for CONFIRMED.
    #[arg(long, env = "SENTINEL_CONFIRMATION_THRESHOLD")]
    confirmation_threshold: Option<u32>,

    /// Print Prometheus metrics after a replay.
    #[arg(long, env = "SENTINEL_ENABLE_METRICS")]
    metrics: bool,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the effective configuration as TOML.
    Config,
    /// Replay a JSON scenario and print step results and events as JSON lines.
    Replay {
        /// Scenario file; reads stdin when omitted.
        scenario: Option<PathBuf>,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let base = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(path)?,
        None => NodeConfig::default(),
    };
    let config = NodeConfig {
        log_level: cli.log_level.clone().unwrap_or(base.log_level.clone()),
        log_format: cli.log_format.unwrap_or(base.log_format),
        danger_radius_m: cli.danger_radius_m.unwrap_or(base.danger_radius_m),
        confirmation_threshold: cli
            .confirmation_threshold
            .unwrap_or(base.confirmation_threshold),
        enable_metrics: cli.metrics || base.enable_metrics,
        ..base
    };
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level)?;

    if let Some(path) = &cli.config {
        tracing::info!("loaded config from {}", path.display());
    }

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Replay { scenario } => {
            let json = match scenario {
                Some(path) => std::fs::read_to_string(&path)?,
                None => std::io::read_to_string(std::io::stdin())?,
            };
            let steps = scenario::parse(&json)?;
            tracing::info!(steps = steps.len(), "replaying scenario");

            let enable_metrics = config.enable_metrics;
            let service = AlertService::new(
                config,
                Arc::new(MemoryReportStore::new()),
                Arc::new(SystemClock),
            )?;
            let mut events = service.subscribe();

            for (index, step) in steps.into_iter().enumerate() {
                let record = scenario::run_step(&service, index, step).await?;
                println!("{}", serde_json::to_string(&record)?);
                loop {
                    match events.try_recv() {
                        Ok(event) => println!("{}", serde_json::to_string(&event)?),
                        Err(TryRecvError::Lagged(missed)) => {
                            tracing::warn!(missed, "event output fell behind");
                        }
                        Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                    }
                }
            }

            service.shutdown().await;
            if enable_metrics {
                print!("{}", service.metrics().encode_text()?);
            }
            tracing::info!("replay finished");
        }
    }

    Ok(())
}
