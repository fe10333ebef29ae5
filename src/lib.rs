//! # School Choice
//!
//! Simulator for two-sided school choice markets: students with strict
//! preferences over schools, schools with seats and strict priorities over
//! students.
//!
//! ## Architecture
//!
//! - **Types**: the market, the rank index, and matchings
//! - **Engine**: Deferred Acceptance, Immediate Acceptance (Boston), and Top
//!   Trading Cycles
//! - **Metrics**: average assigned rank and blocking-pair audit
//! - **Simulation**: random markets, Monte-Carlo comparison, text reports
//!
//! ## Design Principles
//!
//! 1. **Determinism**: mechanisms are pure functions of the market; a seeded
//!    simulation reproduces bit for bit
//! 2. **Validate once**: malformed markets are rejected at construction, so
//!    engines never re-check their inputs
//! 3. **No ambient state**: the market universe is an explicit
//!    [`config::MarketConfig`] value
//! 4. **Fixed-point metrics**: averages are `Decimal`, not `f64`

// ============================================================================
// Module declarations
// ============================================================================

/// Market, rank index, matching
pub mod types;

/// DA, IA, and TTC mechanisms
pub mod engine;

/// Average rank and stability audit
pub mod metrics;

/// Market generation and Monte-Carlo driver
pub mod simulation;

/// Market and simulation configuration
pub mod config;

/// Error types
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{MarketConfig, SimulationConfig};
pub use engine::{
    CycleResolution, DeferredAcceptance, ImmediateAcceptance, MatchResult, Mechanism,
    MechanismKind, TopTradingCycles,
};
pub use error::{EngineError, Error, MarketError};
pub use types::{Market, Matching, RankIndex, SchoolId, StudentId};
