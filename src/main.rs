//! # Dining Table
//!
//! Runs the table until Ctrl-C (or for `--run-for-secs`), logging a scoreboard of meal
//! counts every reporting interval, then shuts down and prints the final counts.

use clap::Parser;
use dining_table::events::EventSink;
use dining_table::lifecycle::{setup_tracing, TableConfig, TableSystem};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "dining-table", about = "Agents sharing resources around a ring")]
struct Args {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of agents, overriding the configuration.
    #[arg(long)]
    agents: Option<usize>,

    /// Stop after this many seconds instead of waiting for Ctrl-C.
    #[arg(long)]
    run_for_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let args = Args::parse();

    let mut config = TableConfig::load(args.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(agents) = args.agents {
        config.agents = agents;
    }

    info!(?config, "Starting table");
    let system = TableSystem::start(&config, EventSink::disabled()).map_err(|e| e.to_string())?;

    match args.run_for_secs {
        Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
        None => {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Could not listen for Ctrl-C, stopping now");
            }
        }
    }

    let summary = system.shutdown().await.map_err(|e| e.to_string())?;
    println!("{summary}");

    match summary.failures().count() {
        0 => {
            info!("Application completed successfully");
            Ok(())
        }
        failed => Err(format!("{failed} agent(s) left the table on a broken invariant")),
    }
}
