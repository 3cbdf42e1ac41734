//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar energy quantity moved through the network.
pub type Energy = u64;

/// Unique identifier for a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub u32);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id generator, owned by whoever constructs the cells.
///
/// Ids are assigned in creation order starting at 0, so a fresh sequence
/// yields reproducible ids for a given build.
#[derive(Debug, Default)]
pub struct CellIdSequence {
    next: u32,
}

impl CellIdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> CellId {
        let id = CellId(self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic_from_zero() {
        let mut seq = CellIdSequence::new();
        assert_eq!(seq.next_id(), CellId(0));
        assert_eq!(seq.next_id(), CellId(1));
        assert_eq!(seq.next_id(), CellId(2));
    }

    #[test]
    fn test_cell_id_display() {
        assert_eq!(CellId(7).to_string(), "7");
    }
}
