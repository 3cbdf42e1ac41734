//! Network supervisor: builds the cell grid, runs one task per cell,
//! coordinates cooperative shutdown.

use crate::cell::Cell;
use crate::topology;
use germ_core::{CellIdSequence, Energy, NetworkConfig};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Built,
    Running,
    Stopped,
}

/// Owns the cell collection and the lifecycle of their actor tasks.
pub struct Network {
    config: NetworkConfig,
    cells: Vec<Arc<Cell>>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    phase: Phase,
}

impl Network {
    /// Create and link `rows * cols` cells. Ids come from a fresh sequence;
    /// cycle periods come from a generator seeded with `config.seed`, so a
    /// given configuration always builds the same network.
    ///
    /// Dimensions are trusted preconditions: a zero side panics.
    pub fn build(config: NetworkConfig) -> Self {
        assert!(
            config.grid.rows >= 1 && config.grid.cols >= 1,
            "grid dimensions must be at least 1x1"
        );

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut ids = CellIdSequence::new();
        let cell_count = config.grid.cell_count();

        let mut cells = Vec::with_capacity(cell_count);
        for _ in 0..cell_count {
            let period_ms = rng.gen_range(
                config.heartbeat.min_period_ms..=config.heartbeat.max_period_ms,
            );
            cells.push(Arc::new(Cell::new(
                ids.next_id(),
                config.energy.initial_energy,
                config.energy.unit_cost,
                Duration::from_millis(period_ms),
                config.inbox_capacity,
            )));
        }

        topology::link_grid(&cells, config.grid.rows, config.grid.cols);

        info!(
            rows = config.grid.rows,
            cols = config.grid.cols,
            cells = cell_count,
            seed = config.seed,
            "network built"
        );

        Self {
            config,
            cells,
            cancel: CancellationToken::new(),
            tasks: Vec::new(),
            phase: Phase::Built,
        }
    }

    /// Launch one actor task per cell. May only be called once on a freshly
    /// built network; restarting a stopped network is a programming error.
    pub fn start(&mut self) {
        assert_eq!(
            self.phase,
            Phase::Built,
            "network can only be started once"
        );
        self.phase = Phase::Running;

        for cell in &self.cells {
            let cell = Arc::clone(cell);
            let cancel = self.cancel.clone();
            self.tasks.push(tokio::spawn(cell.run(cancel)));
        }

        info!(tasks = self.tasks.len(), "network started");
    }

    /// Signal every cell to stop and block until all actor tasks have
    /// exited. Latency is bounded by the slowest cell's cycle period; a
    /// cell blocked on a full neighbor inbox is released when that inbox
    /// closes during shutdown.
    pub async fn stop(&mut self) {
        assert_eq!(self.phase, Phase::Running, "network is not running");
        self.phase = Phase::Stopped;

        self.cancel.cancel();
        for result in futures::future::join_all(self.tasks.drain(..)).await {
            if let Err(err) = result {
                error!(?err, "cell task failed");
            }
        }

        info!(total_energy = self.total_energy(), "network stopped");
    }

    /// Stable ordered cell handles; index-addressable, length fixed at
    /// `rows * cols`.
    pub fn cells(&self) -> &[Arc<Cell>] {
        &self.cells
    }

    pub fn rows(&self) -> usize {
        self.config.grid.rows
    }

    pub fn cols(&self) -> usize {
        self.config.grid.cols
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Best-effort sum of all ledgers; exact once the network has stopped,
    /// a racy point-in-time view while it runs.
    pub fn total_energy(&self) -> Energy {
        self.cells.iter().map(|c| c.energy()).sum()
    }
}
