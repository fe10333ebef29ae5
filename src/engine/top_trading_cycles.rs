//! Top Trading Cycles with school capacities.
//!
//! ## Pointing Graph
//!
//! Each round builds a bipartite functional graph:
//!
//! - every active student points to its most preferred school that still
//!   has a free seat
//! - every school with a free seat points to its highest-priority active
//!   student
//!
//! Every node has out-degree one, so a walk from any student ends in a
//! cycle. Students on the cycle get the seat they point to and leave.
//!
//! ## Cycle Resolution
//!
//! By default a single cycle, the one reached from the lowest-index pointing
//! student, is cleared per round and the graph is rebuilt.
//! [`CycleResolution::AllPerRound`] clears every disjoint cycle of the round
//! instead. Cycles in the same round share no nodes and clearing one leaves
//! the others intact, so both strategies produce the same matching; only the
//! round count differs.

use tracing::{debug, trace};

use crate::engine::cycle::{find_all_cycles, find_cycle};
use crate::engine::{MatchResult, Mechanism};
use crate::error::EngineError;
use crate::types::{Market, Matching, RankIndex, SchoolId, StudentId};

/// How many cycles to clear per pointing round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleResolution {
    /// Clear the first cycle found, then rebuild the pointing graph
    #[default]
    OnePerRound,
    /// Clear every cycle of the current pointing graph
    AllPerRound,
}

/// Top trading cycles.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopTradingCycles {
    resolution: CycleResolution,
}

impl TopTradingCycles {
    pub fn new(resolution: CycleResolution) -> Self {
        Self { resolution }
    }

    pub fn resolution(&self) -> CycleResolution {
        self.resolution
    }
}

/// Node of the pointing graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Node {
    Student(StudentId),
    School(SchoolId),
}

/// Working state of one TTC run.
struct TradingState<'a> {
    market: &'a Market,
    ranks: &'a RankIndex,
    remaining: Vec<usize>,
    active: Vec<bool>,
    next_choice: Vec<usize>,
    matching: Matching,
}

impl<'a> TradingState<'a> {
    fn new(market: &'a Market, ranks: &'a RankIndex) -> Self {
        let num_students = market.num_students();
        Self {
            market,
            ranks,
            remaining: market.capacities().to_vec(),
            active: vec![true; num_students],
            next_choice: vec![0; num_students],
            matching: Matching::unmatched(num_students),
        }
    }

    fn has_active_students(&self) -> bool {
        self.active.iter().any(|&active| active)
    }

    fn has_free_seats(&self) -> bool {
        self.remaining.iter().any(|&seats| seats > 0)
    }

    fn active_students(&self) -> impl Iterator<Item = StudentId> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter(|(_, active)| **active)
            .map(|(index, _)| StudentId::new(index))
    }

    /// Student side of the pointing graph.
    ///
    /// Advances cursors past full schools and deactivates students whose
    /// list is exhausted.
    fn point_students(&mut self) -> Vec<Option<SchoolId>> {
        let num_schools = self.market.num_schools();
        let mut pointers = vec![None; self.active.len()];

        for index in 0..self.active.len() {
            if !self.active[index] {
                continue;
            }
            let student = StudentId::new(index);
            let preferences = self.market.preferences(student);
            let cursor = &mut self.next_choice[index];

            while *cursor < num_schools && self.remaining[preferences[*cursor].index()] == 0 {
                *cursor += 1;
            }

            if *cursor >= num_schools {
                trace!(%student, "no school with free seats left");
                self.active[index] = false;
            } else {
                pointers[index] = Some(preferences[*cursor]);
            }
        }

        pointers
    }

    /// School side of the pointing graph
    fn point_schools(&self) -> Vec<Option<StudentId>> {
        self.market
            .schools()
            .map(|school| {
                if self.remaining[school.index()] == 0 {
                    None
                } else {
                    self.ranks.best_of(school, self.active_students())
                }
            })
            .collect()
    }

    /// Give every student on `cycle` the seat it points to.
    fn clear_cycle(
        &mut self,
        cycle: &[Node],
        student_pointers: &[Option<SchoolId>],
    ) -> Result<usize, EngineError> {
        let mut cleared = 0;
        for node in cycle {
            let Node::Student(student) = *node else {
                continue;
            };
            let Some(school) = student_pointers[student.index()] else {
                continue;
            };

            let seats = &mut self.remaining[school.index()];
            *seats = seats
                .checked_sub(1)
                .ok_or(EngineError::CapacityUnderflow { school })?;

            trace!(%student, %school, "traded");
            self.matching.assign(student, school);
            self.active[student.index()] = false;
            cleared += 1;
        }
        Ok(cleared)
    }
}

impl Mechanism for TopTradingCycles {
    fn name(&self) -> &'static str {
        "TTC"
    }

    fn run(&self, market: &Market, ranks: &RankIndex) -> Result<MatchResult, EngineError> {
        let mut state = TradingState::new(market, ranks);
        let mut rounds = 0usize;

        while state.has_active_students() && state.has_free_seats() {
            let student_pointers = state.point_students();
            let Some(start) = student_pointers
                .iter()
                .position(Option::is_some)
                .map(StudentId::new)
            else {
                break;
            };
            rounds += 1;

            let school_pointers = state.point_schools();
            let successor = |node: Node| match node {
                Node::Student(student) => student_pointers[student.index()].map(Node::School),
                Node::School(school) => school_pointers[school.index()].map(Node::Student),
            };

            let cycles = match self.resolution {
                CycleResolution::OnePerRound => {
                    let cycle = find_cycle(Node::Student(start), successor).ok_or(
                        EngineError::CycleNotFound {
                            round: rounds,
                            start,
                        },
                    )?;
                    vec![cycle]
                }
                CycleResolution::AllPerRound => {
                    let starts = student_pointers
                        .iter()
                        .enumerate()
                        .filter(|(_, pointer)| pointer.is_some())
                        .map(|(index, _)| Node::Student(StudentId::new(index)));
                    let cycles = find_all_cycles(starts, successor);
                    if cycles.is_empty() {
                        return Err(EngineError::CycleNotFound {
                            round: rounds,
                            start,
                        });
                    }
                    cycles
                }
            };

            for cycle in &cycles {
                let cleared = state.clear_cycle(cycle, &student_pointers)?;
                trace!(round = rounds, cleared, "cycle cleared");
            }
        }

        let matching = state.matching;
        debug!(
            rounds,
            matched = matching.matched_count(),
            resolution = ?self.resolution,
            "top trading cycles finished"
        );
        Ok(MatchResult::new(matching, rounds))
    }
}
