//! Terminal view for the germ energy-grid simulation.

mod app;
mod telemetry;

use anyhow::Result;
use clap::Parser;
use germ_core::NetworkConfig;
use germ_world::Network;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "germ", version, about = "A grid of cells trading energy, painted by heartbeat")]
struct Args {
    /// Rows in the cell grid
    #[arg(long, default_value_t = 10)]
    rows: usize,

    /// Columns in the cell grid
    #[arg(long, default_value_t = 10)]
    cols: usize,

    /// Seed for heartbeat assignment; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Sample this many frames without a terminal, then exit
    #[arg(long, value_name = "FRAMES")]
    headless: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init()?;
    let args = Args::parse();

    let mut config = NetworkConfig::default();
    config.grid.rows = args.rows;
    config.grid.cols = args.cols;
    config.seed = args.seed.unwrap_or_else(rand::random);
    config.validate()?;

    info!(
        rows = config.grid.rows,
        cols = config.grid.cols,
        seed = config.seed,
        "starting network"
    );

    let mut network = Network::build(config);
    network.start();

    let cells = network.cells().to_vec();
    let cols = network.cols();
    let view = match args.headless {
        Some(frames) => {
            tokio::task::spawn_blocking(move || app::run_headless(&cells, frames)).await?
        }
        None => tokio::task::spawn_blocking(move || app::run(&cells, cols)).await?,
    };

    network.stop().await;
    view
}
