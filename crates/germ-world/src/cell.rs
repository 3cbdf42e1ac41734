//! The cell actor: energy ledger, bounded inbox, heartbeat loop.

use germ_core::{CellId, Energy};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// An autonomous cell in the network.
///
/// The cell owns its energy ledger and the receiving half of its inbox.
/// Neighbors hold sending halves only; they deposit energy into the inbox
/// and never touch the ledger. The renderer reads `energy()` and friends
/// concurrently with the running actor; those reads are lock-free and
/// individually consistent, with no joint-snapshot guarantee.
pub struct Cell {
    id: CellId,
    cycle_period: Duration,
    unit_cost: Energy,
    /// Ledger value, readable without the guard.
    energy: AtomicU64,
    /// Gates emission only; absorption is unconditional.
    active: AtomicBool,
    started: AtomicBool,
    /// Serializes every read-modify-write of `energy`.
    ledger: Mutex<()>,
    inbox_tx: mpsc::Sender<Energy>,
    inbox_rx: Mutex<Option<mpsc::Receiver<Energy>>>,
    outputs: RwLock<Vec<mpsc::Sender<Energy>>>,
}

impl Cell {
    pub fn new(
        id: CellId,
        initial_energy: Energy,
        unit_cost: Energy,
        cycle_period: Duration,
        inbox_capacity: usize,
    ) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::channel(inbox_capacity);
        Self {
            id,
            cycle_period,
            unit_cost,
            energy: AtomicU64::new(initial_energy),
            active: AtomicBool::new(true),
            started: AtomicBool::new(false),
            ledger: Mutex::new(()),
            inbox_tx,
            inbox_rx: Mutex::new(Some(inbox_rx)),
            outputs: RwLock::new(Vec::with_capacity(8)),
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    /// Point-in-time ledger value.
    pub fn energy(&self) -> Energy {
        self.energy.load(Ordering::Relaxed)
    }

    pub fn cycle_period(&self) -> Duration {
        self.cycle_period
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }

    /// Number of linked neighbors.
    pub fn output_count(&self) -> usize {
        self.outputs.read().len()
    }

    /// Deposits sitting in this cell's inbox, not yet absorbed.
    ///
    /// Meaningful while the cell is live; each queued deposit carries
    /// exactly `unit_cost` energy.
    pub fn queued_deposits(&self) -> usize {
        self.inbox_tx.max_capacity() - self.inbox_tx.capacity()
    }

    /// Mutually register the two cells' inboxes.
    ///
    /// Topology construction only; linking a started cell is a programming
    /// error and panics.
    pub fn link(&self, other: &Cell) {
        assert!(
            !self.started.load(Ordering::Acquire) && !other.started.load(Ordering::Acquire),
            "cells {} and {} must be linked before starting",
            self.id,
            other.id,
        );
        self.outputs.write().push(other.inbox_tx.clone());
        other.outputs.write().push(self.inbox_tx.clone());
    }

    /// Add `amount` to the ledger. Never fails; overflowing the `u64`
    /// range is a programming error and panics rather than wrapping.
    pub fn absorb(&self, amount: Energy) {
        let _ledger = self.ledger.lock();
        let current = self.energy.load(Ordering::Relaxed);
        let next = current
            .checked_add(amount)
            .expect("cell energy overflowed u64");
        self.energy.store(next, Ordering::Relaxed);
    }

    /// Attempt one emission: deduct `unit_cost` per neighbor from the
    /// ledger, then deposit `unit_cost` into every neighbor inbox.
    ///
    /// All-or-nothing: if the ledger cannot cover the full cost, nothing is
    /// deducted and nothing is sent. Deposits happen outside the ledger
    /// guard; a full neighbor inbox suspends this cell until space frees up
    /// (backpressure, no drop policy). A deposit refused because the target
    /// inbox shut down is refunded to this cell's own ledger.
    ///
    /// Returns whether an emission took place.
    pub async fn emit(&self) -> bool {
        let outputs: Vec<mpsc::Sender<Energy>> = self.outputs.read().clone();
        let total_cost = self.unit_cost * outputs.len() as Energy;

        {
            let _ledger = self.ledger.lock();
            let current = self.energy.load(Ordering::Relaxed);
            if current < total_cost {
                trace!(cell = %self.id, energy = current, total_cost, "emission suppressed");
                return false;
            }
            self.energy.store(current - total_cost, Ordering::Relaxed);
        }

        for output in &outputs {
            if output.send(self.unit_cost).await.is_err() {
                self.absorb(self.unit_cost);
            }
        }
        true
    }

    /// The cell's actor loop. Services one event per iteration (whichever
    /// of cancellation, inbound deposit or heartbeat wins the wait; there
    /// is no ordering guarantee between them), then re-checks cancellation.
    ///
    /// May only run once per cell; a second call panics.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let mut inbox = self
            .inbox_rx
            .lock()
            .take()
            .expect("cell actor already running");
        self.started.store(true, Ordering::Release);

        let mut heartbeat =
            time::interval_at(Instant::now() + self.cycle_period, self.cycle_period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(
            cell = %self.id,
            period_ms = self.cycle_period.as_millis() as u64,
            neighbors = self.output_count(),
            "cell started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                deposit = inbox.recv() => {
                    if let Some(amount) = deposit {
                        self.absorb(amount);
                    }
                }
                _ = heartbeat.tick() => {
                    if self.is_active() {
                        self.emit().await;
                    }
                }
            }
            if cancel.is_cancelled() {
                break;
            }
        }

        // Shutdown drain: refuse further deposits, then absorb everything
        // already queued. Closing also wakes neighbors blocked on this
        // inbox; their failed sends are refunded on their side.
        inbox.close();
        while let Ok(amount) = inbox.try_recv() {
            self.absorb(amount);
        }

        debug!(cell = %self.id, energy = self.energy(), "cell stopped");
    }
}
