//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::Energy;
use serde::{Deserialize, Serialize};

/// Grid dimensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of rows in the network
    pub rows: usize,
    /// Number of columns in the network
    pub cols: usize,
}

impl GridConfig {
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { rows: 10, cols: 10 }
    }
}

/// Energy ledger configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnergyConfig {
    /// Starting energy for every cell
    pub initial_energy: Energy,
    /// Energy sent to each neighbor per successful emission
    pub unit_cost: Energy,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            initial_energy: 300,
            unit_cost: 1,
        }
    }
}

/// Heartbeat period range; each cell draws its own fixed period from this.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeartbeatConfig {
    /// Shortest assignable cycle period (milliseconds)
    pub min_period_ms: u64,
    /// Longest assignable cycle period (milliseconds)
    pub max_period_ms: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            min_period_ms: 1,
            max_period_ms: 20,
        }
    }
}

/// Full network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Grid dimensions
    pub grid: GridConfig,
    /// Energy configuration
    pub energy: EnergyConfig,
    /// Heartbeat configuration
    pub heartbeat: HeartbeatConfig,
    /// Bounded inbox depth per cell; a full inbox suspends the sender
    pub inbox_capacity: usize,
    /// Random seed for cycle period assignment
    pub seed: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            energy: EnergyConfig::default(),
            heartbeat: HeartbeatConfig::default(),
            inbox_capacity: 10,
            seed: 0,
        }
    }
}

impl NetworkConfig {
    /// Check the parameters the core otherwise treats as trusted
    /// preconditions. Callers taking user input should reject bad
    /// configurations here instead of tripping asserts downstream.
    pub fn validate(&self) -> Result<()> {
        if self.grid.rows < 1 || self.grid.cols < 1 {
            return Err(Error::InvalidGrid {
                rows: self.grid.rows,
                cols: self.grid.cols,
            });
        }
        if self.heartbeat.min_period_ms < 1
            || self.heartbeat.min_period_ms > self.heartbeat.max_period_ms
        {
            return Err(Error::InvalidHeartbeat {
                min_ms: self.heartbeat.min_period_ms,
                max_ms: self.heartbeat.max_period_ms,
            });
        }
        if self.inbox_capacity < 1 {
            return Err(Error::InvalidInboxCapacity);
        }
        if self.energy.unit_cost < 1 {
            return Err(Error::InvalidUnitCost);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let grid = GridConfig::default();
        assert_eq!(grid.rows, 10);
        assert_eq!(grid.cols, 10);
        assert_eq!(grid.cell_count(), 100);

        let energy = EnergyConfig::default();
        assert_eq!(energy.initial_energy, 300);
        assert_eq!(energy.unit_cost, 1);

        let heartbeat = HeartbeatConfig::default();
        assert_eq!(heartbeat.min_period_ms, 1);
        assert_eq!(heartbeat.max_period_ms, 20);

        let config = NetworkConfig::default();
        assert_eq!(config.inbox_capacity, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let mut config = NetworkConfig::default();
        config.grid.rows = 0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidGrid { rows: 0, cols: 10 })
        ));

        let mut config = NetworkConfig::default();
        config.heartbeat.min_period_ms = 30;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidHeartbeat { .. })
        ));

        let mut config = NetworkConfig::default();
        config.inbox_capacity = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidInboxCapacity)));

        let mut config = NetworkConfig::default();
        config.energy.unit_cost = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidUnitCost)));
    }

    #[test]
    fn test_network_config_serialization() {
        let config = NetworkConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: NetworkConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.grid.rows, deserialized.grid.rows);
        assert_eq!(config.energy.initial_energy, deserialized.energy.initial_energy);
        assert_eq!(config.seed, deserialized.seed);
    }
}
