//! Monte-Carlo comparison of the three mechanisms.
//!
//! ## Trials
//!
//! Trial `t` draws its market from a `ChaCha8Rng` keyed by the configured
//! seed and switched to stream `t`. Trials share nothing, so they run in
//! parallel on the rayon pool; results are collected in trial order and the
//! summary does not depend on the number of threads.
//!
//! ## Digest
//!
//! The summary carries a SHA-256 digest over every trial's matching
//! fingerprints (trial order, then mechanism order). Two runs with the same
//! configuration must produce the same digest.
//!
//! ## Example
//!
//! ```
//! use school_choice::config::{MarketConfig, SimulationConfig};
//! use school_choice::engine::MechanismKind;
//! use school_choice::simulation::run_simulation;
//!
//! let config = SimulationConfig {
//!     market: MarketConfig::default(),
//!     trials: 20,
//!     seed: 7,
//! };
//! let summary = run_simulation(&config).unwrap();
//!
//! let da = summary.stats_for(MechanismKind::DeferredAcceptance).unwrap();
//! assert_eq!(da.mean_blocking_pairs, rust_decimal::Decimal::ZERO);
//! ```

pub mod generator;
pub mod report;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::engine::{MatchResult, MechanismKind};
use crate::error::Error;
use crate::metrics::{average_rank, blocking_pairs, mean};
use crate::types::{Market, RankIndex};

pub use generator::generate_market;

/// RNG for trial `trial` of a run seeded with `seed`
pub fn trial_rng(seed: u64, trial: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(trial as u64);
    rng
}

/// Run every mechanism on one market, in [`MechanismKind::ALL`] order.
///
/// Each mechanism gets its own working state; only `market` and `ranks` are
/// shared.
pub fn solve_all(
    market: &Market,
    ranks: &RankIndex,
) -> Result<Vec<(MechanismKind, MatchResult)>, Error> {
    MechanismKind::ALL
        .iter()
        .map(|&kind| {
            kind.run(market, ranks)
                .map(|result| (kind, result))
                .map_err(Error::from)
        })
        .collect()
}

/// What one mechanism achieved on one market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MechanismRecord {
    pub mechanism: MechanismKind,
    pub average_rank: Decimal,
    pub unmatched: usize,
    pub blocking_pairs: usize,
    pub fingerprint: [u8; 32],
}

/// All mechanisms on one generated market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialOutcome {
    pub trial: usize,
    pub records: Vec<MechanismRecord>,
}

/// Generate the market for `trial` and evaluate every mechanism on it.
pub fn run_trial(config: &SimulationConfig, trial: usize) -> Result<TrialOutcome, Error> {
    let mut rng = trial_rng(config.seed, trial);
    let market = generate_market(&config.market, &mut rng)?;
    let ranks = RankIndex::build(&market);

    let records = solve_all(&market, &ranks)?
        .into_iter()
        .map(|(mechanism, result)| MechanismRecord {
            mechanism,
            average_rank: average_rank(&market, &result.matching),
            unmatched: result.matching.unmatched_count(),
            blocking_pairs: blocking_pairs(&market, &ranks, &result.matching).len(),
            fingerprint: result.matching.fingerprint(),
        })
        .collect();

    Ok(TrialOutcome { trial, records })
}

/// Aggregate of one mechanism over all trials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MechanismStats {
    pub mechanism: MechanismKind,
    /// Mean of per-trial average ranks (lower is better)
    pub mean_rank: Decimal,
    pub mean_unmatched: Decimal,
    pub mean_blocking_pairs: Decimal,
    /// Fraction of trials whose matching had no blocking pair
    pub stable_share: Decimal,
}

/// Result of a full Monte-Carlo run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationSummary {
    pub trials: usize,
    pub seed: u64,
    pub stats: Vec<MechanismStats>,
    pub digest: [u8; 32],
}

impl SimulationSummary {
    pub fn stats_for(&self, mechanism: MechanismKind) -> Option<&MechanismStats> {
        self.stats.iter().find(|stats| stats.mechanism == mechanism)
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// Run `config.trials` independent trials and aggregate per mechanism.
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationSummary, Error> {
    info!(
        trials = config.trials,
        seed = config.seed,
        students = config.market.students(),
        schools = config.market.num_schools(),
        "starting simulation"
    );

    let outcomes: Vec<TrialOutcome> = (0..config.trials)
        .into_par_iter()
        .map(|trial| run_trial(config, trial))
        .collect::<Result<Vec<_>, Error>>()?;

    let summary = summarize(config, &outcomes);
    info!(digest = %summary.digest_hex(), "simulation finished");
    Ok(summary)
}

fn summarize(config: &SimulationConfig, outcomes: &[TrialOutcome]) -> SimulationSummary {
    let mut hasher = Sha256::new();
    for outcome in outcomes {
        for record in &outcome.records {
            hasher.update(record.fingerprint);
        }
    }
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());

    let stats = MechanismKind::ALL
        .iter()
        .map(|&mechanism| {
            let records: Vec<&MechanismRecord> = outcomes
                .iter()
                .flat_map(|outcome| outcome.records.iter())
                .filter(|record| record.mechanism == mechanism)
                .collect();
            let count = records.len();

            let rank_sum: Decimal = records.iter().map(|r| r.average_rank).sum();
            let unmatched: usize = records.iter().map(|r| r.unmatched).sum();
            let blocking: usize = records.iter().map(|r| r.blocking_pairs).sum();
            let stable = records.iter().filter(|r| r.blocking_pairs == 0).count();

            let stats = MechanismStats {
                mechanism,
                mean_rank: mean(rank_sum, count),
                mean_unmatched: mean(Decimal::from(unmatched), count),
                mean_blocking_pairs: mean(Decimal::from(blocking), count),
                stable_share: mean(Decimal::from(stable), count),
            };
            debug!(
                %mechanism,
                mean_rank = %stats.mean_rank,
                stable_share = %stats.stable_share,
                "aggregated"
            );
            stats
        })
        .collect();

    SimulationSummary {
        trials: outcomes.len(),
        seed: config.seed,
        stats,
        digest,
    }
}
