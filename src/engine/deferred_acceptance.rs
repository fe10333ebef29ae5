//! Student-proposing Deferred Acceptance.
//!
//! ## Algorithm
//!
//! Free students wait in a FIFO queue. The student at the front proposes to
//! the next school on its list; the school tentatively holds it. When a
//! school holds more students than it has seats, it keeps the
//! highest-priority ones and sends the rest to the back of the queue. A
//! student that has proposed to every school drops out unmatched.
//!
//! ## Termination
//!
//! Each student's proposal cursor only moves forward, so there are at most
//! `students x schools` proposals. The result is stable: no student prefers a
//! school that either has a free seat or holds someone of lower priority.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::engine::{MatchResult, Mechanism};
use crate::error::EngineError;
use crate::types::{Market, Matching, RankIndex, StudentId};

/// Student-proposing deferred acceptance.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferredAcceptance;

impl Mechanism for DeferredAcceptance {
    fn name(&self) -> &'static str {
        "DA"
    }

    fn run(&self, market: &Market, ranks: &RankIndex) -> Result<MatchResult, EngineError> {
        let num_schools = market.num_schools();

        let mut free: VecDeque<StudentId> = market.students().collect();
        let mut next_choice = vec![0usize; market.num_students()];
        let mut held: Vec<Vec<StudentId>> = vec![Vec::new(); num_schools];
        let mut proposals = 0usize;

        while let Some(student) = free.pop_front() {
            let cursor = &mut next_choice[student.index()];
            if *cursor >= num_schools {
                trace!(%student, "preference list exhausted");
                continue;
            }

            let school = market.preferences(student)[*cursor];
            *cursor += 1;
            proposals += 1;

            let pool = &mut held[school.index()];
            pool.push(student);

            let capacity = market.capacity(school);
            if pool.len() > capacity {
                ranks.sort_by_priority(school, pool);
                for rejected in pool.drain(capacity..) {
                    trace!(%rejected, %school, "rejected");
                    free.push_back(rejected);
                }
            }
        }

        let matching = Matching::from_rosters(market.num_students(), &held);
        debug!(
            proposals,
            matched = matching.matched_count(),
            "deferred acceptance finished"
        );
        Ok(MatchResult::new(matching, proposals))
    }
}
