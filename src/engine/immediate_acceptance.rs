//! Immediate Acceptance (the Boston mechanism).
//!
//! In round `r` every still-unmatched student applies to the `r`-th school on
//! its list. Each school with seats left accepts applicants in priority order
//! until it is full. Acceptances are final: nobody is ever displaced, which
//! is why the outcome can be unstable.

use tracing::{debug, trace};

use crate::engine::{MatchResult, Mechanism};
use crate::error::EngineError;
use crate::types::{Market, Matching, RankIndex, SchoolId, StudentId};

/// The Boston mechanism.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateAcceptance;

impl Mechanism for ImmediateAcceptance {
    fn name(&self) -> &'static str {
        "IA"
    }

    fn run(&self, market: &Market, ranks: &RankIndex) -> Result<MatchResult, EngineError> {
        let num_schools = market.num_schools();

        let mut remaining = market.capacities().to_vec();
        let mut matching = Matching::unmatched(market.num_students());
        let mut unmatched: Vec<StudentId> = market.students().collect();
        let mut rounds = 0usize;

        for round in 0..num_schools {
            if unmatched.is_empty() {
                break;
            }
            rounds += 1;

            let mut applicants: Vec<Vec<StudentId>> = vec![Vec::new(); num_schools];
            for &student in &unmatched {
                let school = market.preferences(student)[round];
                applicants[school.index()].push(student);
            }

            for (index, mut pool) in applicants.into_iter().enumerate() {
                let seats = &mut remaining[index];
                if *seats == 0 || pool.is_empty() {
                    continue;
                }

                let school = SchoolId::new(index);
                ranks.sort_by_priority(school, &mut pool);

                let accepted = (*seats).min(pool.len());
                for &student in &pool[..accepted] {
                    trace!(%student, %school, round, "accepted");
                    matching.assign(student, school);
                }
                *seats -= accepted;
            }

            unmatched.retain(|&student| matching.school_of(student).is_none());
        }

        debug!(
            rounds,
            matched = matching.matched_count(),
            "immediate acceptance finished"
        );
        Ok(MatchResult::new(matching, rounds))
    }
}
