//! The cell network: one actor per cell, a bounded mailbox each, and a
//! heartbeat-driven absorb/emit protocol that moves energy through a fixed
//! grid topology.

pub mod cell;
pub mod network;
pub mod topology;

pub use cell::Cell;
pub use network::Network;
pub use topology::link_grid;
