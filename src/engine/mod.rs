//! Matching mechanisms.
//!
//! ## Mechanisms
//!
//! - [`DeferredAcceptance`]: student-proposing DA; stable
//! - [`ImmediateAcceptance`]: the Boston mechanism; acceptances are final
//! - [`TopTradingCycles`]: TTC with capacities; Pareto efficient
//!
//! ## Design Principles
//!
//! 1. **Purity**: a run depends only on `(&Market, &RankIndex)`; all working
//!    state (queues, remaining seats) is allocated per call and dropped
//! 2. **Determinism**: ties in iteration order are broken by student/school
//!    index, so identical inputs give identical matchings
//! 3. **Bounded**: every run reports its step count so termination bounds can
//!    be asserted
//!
//! ## Example
//!
//! ```
//! use school_choice::engine::{DeferredAcceptance, Mechanism};
//! use school_choice::types::{Market, RankIndex, SchoolId, StudentId};
//!
//! let s = SchoolId::new;
//! let i = StudentId::new;
//! let market = Market::new(
//!     vec![1, 1],
//!     vec![vec![s(0), s(1)], vec![s(0), s(1)], vec![s(1), s(0)]],
//!     vec![vec![i(1), i(0), i(2)], vec![i(2), i(0), i(1)]],
//! )
//! .unwrap();
//! let ranks = RankIndex::build(&market);
//!
//! let result = DeferredAcceptance.run(&market, &ranks).unwrap();
//! assert_eq!(result.matching.school_of(i(0)), None);
//! assert_eq!(result.matching.school_of(i(1)), Some(s(0)));
//! assert_eq!(result.matching.school_of(i(2)), Some(s(1)));
//! ```

pub mod cycle;
pub mod deferred_acceptance;
pub mod immediate_acceptance;
pub mod top_trading_cycles;

use std::fmt;

pub use deferred_acceptance::DeferredAcceptance;
pub use immediate_acceptance::ImmediateAcceptance;
pub use top_trading_cycles::{CycleResolution, TopTradingCycles};

use crate::error::EngineError;
use crate::types::{Market, Matching, RankIndex};

/// Output of a single mechanism run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Final assignment of every student
    pub matching: Matching,

    /// Work performed: proposals for DA, rounds for IA and TTC
    pub steps: usize,
}

impl MatchResult {
    pub fn new(matching: Matching, steps: usize) -> Self {
        Self { matching, steps }
    }
}

/// A mechanism maps a market to a matching.
pub trait Mechanism {
    /// Short label used in reports
    fn name(&self) -> &'static str;

    /// Run the mechanism to completion.
    ///
    /// # Errors
    ///
    /// Only internal-consistency failures; a validated market always yields
    /// a feasible matching.
    fn run(&self, market: &Market, ranks: &RankIndex) -> Result<MatchResult, EngineError>;
}

/// The three mechanisms under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MechanismKind {
    DeferredAcceptance,
    ImmediateAcceptance,
    TopTradingCycles,
}

impl MechanismKind {
    /// Every mechanism, in report order
    pub const ALL: [MechanismKind; 3] = [
        MechanismKind::DeferredAcceptance,
        MechanismKind::ImmediateAcceptance,
        MechanismKind::TopTradingCycles,
    ];

    /// Run this mechanism with its default settings
    pub fn run(self, market: &Market, ranks: &RankIndex) -> Result<MatchResult, EngineError> {
        match self {
            MechanismKind::DeferredAcceptance => DeferredAcceptance.run(market, ranks),
            MechanismKind::ImmediateAcceptance => ImmediateAcceptance.run(market, ranks),
            MechanismKind::TopTradingCycles => TopTradingCycles::default().run(market, ranks),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MechanismKind::DeferredAcceptance => DeferredAcceptance.name(),
            MechanismKind::ImmediateAcceptance => ImmediateAcceptance.name(),
            MechanismKind::TopTradingCycles => TopTradingCycles::default().name(),
        }
    }
}

impl fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SchoolId, StudentId};

    #[test]
    fn test_mechanism_names() {
        let names: Vec<_> = MechanismKind::ALL.iter().map(|m| m.to_string()).collect();
        assert_eq!(names, vec!["DA", "IA", "TTC"]);
    }

    #[test]
    fn test_kind_dispatch_matches_engine() {
        let s = SchoolId::new;
        let i = StudentId::new;
        let market = Market::new(
            vec![1, 2],
            vec![vec![s(0), s(1)], vec![s(0), s(1)], vec![s(1), s(0)]],
            vec![vec![i(2), i(1), i(0)], vec![i(0), i(1), i(2)]],
        )
        .expect("valid market");
        let ranks = RankIndex::build(&market);

        let via_kind = MechanismKind::ImmediateAcceptance.run(&market, &ranks).expect("run");
        let direct = ImmediateAcceptance.run(&market, &ranks).expect("run");
        assert_eq!(via_kind, direct);
    }
}
