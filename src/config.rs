//! Simulation configuration.
//!
//! The market universe (student count, schools, seats) is an explicit value
//! passed to the generator and the driver. Nothing is global, so any number
//! of markets and simulations can run side by side.

use tracing::warn;

use crate::error::MarketError;
use crate::types::SchoolId;

/// Students in the reference setup
pub const DEFAULT_STUDENTS: usize = 18;

/// Schools in the reference setup
pub const DEFAULT_SCHOOLS: usize = 3;

/// Seats per school in the reference setup
pub const DEFAULT_CAPACITY: usize = 6;

/// Trials in a default Monte-Carlo run
pub const DEFAULT_TRIALS: usize = 1_000;

/// Seed of a default Monte-Carlo run
pub const DEFAULT_SEED: u64 = 42;

/// Shape of the markets to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    students: usize,
    capacities: Vec<usize>,
}

impl Default for MarketConfig {
    /// 18 students, 3 schools with 6 seats each
    fn default() -> Self {
        Self::uniform(DEFAULT_STUDENTS, DEFAULT_SCHOOLS, DEFAULT_CAPACITY)
    }
}

impl MarketConfig {
    /// Validate signed capacities coming from user input.
    ///
    /// # Errors
    ///
    /// [`MarketError::NegativeCapacity`] for the first negative entry.
    pub fn new(students: usize, capacities: &[i64]) -> Result<Self, MarketError> {
        let capacities = capacities
            .iter()
            .enumerate()
            .map(|(index, &capacity)| {
                usize::try_from(capacity).map_err(|_| MarketError::NegativeCapacity {
                    school: SchoolId::new(index),
                    capacity,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_capacities(students, capacities))
    }

    /// `schools` schools, each with `capacity` seats
    pub fn uniform(students: usize, schools: usize, capacity: usize) -> Self {
        Self::from_capacities(students, vec![capacity; schools])
    }

    fn from_capacities(students: usize, capacities: Vec<usize>) -> Self {
        let config = Self {
            students,
            capacities,
        };
        if config.total_capacity() < students {
            warn!(
                students,
                seats = config.total_capacity(),
                "fewer seats than students; some students will be unmatched"
            );
        }
        config
    }

    #[inline]
    pub fn students(&self) -> usize {
        self.students
    }

    #[inline]
    pub fn num_schools(&self) -> usize {
        self.capacities.len()
    }

    #[inline]
    pub fn capacities(&self) -> &[usize] {
        &self.capacities
    }

    pub fn total_capacity(&self) -> usize {
        self.capacities.iter().sum()
    }
}

/// A Monte-Carlo comparison run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Shape of every generated market
    pub market: MarketConfig,

    /// Number of independent markets
    pub trials: usize,

    /// Base seed; trial `t` draws from a generator derived from `(seed, t)`
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            market: MarketConfig::default(),
            trials: DEFAULT_TRIALS,
            seed: DEFAULT_SEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_market_config() {
        let config = MarketConfig::default();
        assert_eq!(config.students(), 18);
        assert_eq!(config.num_schools(), 3);
        assert_eq!(config.capacities(), &[6, 6, 6]);
        assert_eq!(config.total_capacity(), 18);
    }

    #[test]
    fn test_market_config_from_signed() {
        let config = MarketConfig::new(4, &[2, 0, 3]).expect("non-negative capacities");
        assert_eq!(config.capacities(), &[2, 0, 3]);
    }

    #[test]
    fn test_market_config_rejects_negative() {
        let err = MarketConfig::new(4, &[2, -1, 3]).unwrap_err();
        assert_eq!(
            err,
            MarketError::NegativeCapacity {
                school: SchoolId::new(1),
                capacity: -1
            }
        );
    }

    #[test]
    fn test_default_simulation_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.trials, 1_000);
        assert_eq!(config.seed, 42);
        assert_eq!(config.market, MarketConfig::default());
    }
}
