//! Plain-text rendering of matchings and simulation summaries.
//!
//! Both reports implement `Display`; the binary simply prints them.

use std::fmt;

use crate::metrics::assigned_rank;
use crate::simulation::SimulationSummary;
use crate::types::{Market, Matching};

/// Digits shown after the decimal point in summary tables
const SUMMARY_DP: u32 = 3;

/// One matching, one line per student in index order.
///
/// ```text
/// DA
///   i1 -> s2 (rank 2)
///   i2 -> unmatched
/// ```
pub struct MatchingReport<'a> {
    title: &'a str,
    market: &'a Market,
    matching: &'a Matching,
}

impl<'a> MatchingReport<'a> {
    pub fn new(title: &'a str, market: &'a Market, matching: &'a Matching) -> Self {
        Self {
            title,
            market,
            matching,
        }
    }
}

impl fmt::Display for MatchingReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for (student, school) in self.matching.iter() {
            match school {
                Some(school) => writeln!(
                    f,
                    "  {} -> {} (rank {})",
                    student,
                    school,
                    assigned_rank(self.market, self.matching, student)
                )?,
                None => writeln!(f, "  {} -> unmatched", student)?,
            }
        }
        Ok(())
    }
}

/// Per-mechanism averages of a Monte-Carlo run.
pub struct SummaryTable<'a> {
    summary: &'a SimulationSummary,
}

impl<'a> SummaryTable<'a> {
    pub fn new(summary: &'a SimulationSummary) -> Self {
        Self { summary }
    }
}

impl fmt::Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:>10} {:>10} {:>10} {:>10}",
            "Mechanism", "Avg rank", "Unmatched", "Blocking", "Stable"
        )?;
        writeln!(f, "{:-<10} {:->10} {:->10} {:->10} {:->10}", "", "", "", "", "")?;

        for stats in &self.summary.stats {
            writeln!(
                f,
                "{:<10} {:>10} {:>10} {:>10} {:>10}",
                stats.mechanism.name(),
                stats.mean_rank.round_dp(SUMMARY_DP).to_string(),
                stats.mean_unmatched.round_dp(SUMMARY_DP).to_string(),
                stats.mean_blocking_pairs.round_dp(SUMMARY_DP).to_string(),
                stats.stable_share.round_dp(SUMMARY_DP).to_string(),
            )?;
        }

        writeln!(f)?;
        writeln!(f, "trials: {}  seed: {}", self.summary.trials, self.summary.seed)?;
        write!(f, "digest: {}", self.summary.digest_hex())
    }
}
