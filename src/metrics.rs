//! Outcome metrics: efficiency (average assigned rank) and stability.
//!
//! ## Rank Convention
//!
//! A student's assigned rank is the 1-based position of its school in its
//! own preference list. Unmatched students score `schools + 1`, strictly
//! worse than any real assignment.
//!
//! Averages are `Decimal` so that summing thousands of trials gives the same
//! digits on every platform.

use std::fmt;

use rust_decimal::Decimal;

use crate::types::{Market, Matching, RankIndex, SchoolId, StudentId};

/// 1-based rank of the school `student` received, or `schools + 1` if unmatched
pub fn assigned_rank(market: &Market, matching: &Matching, student: StudentId) -> usize {
    match matching.school_of(student) {
        Some(school) => market.preference_rank(student, school) + 1,
        None => market.num_schools() + 1,
    }
}

/// Mean assigned rank over all students (zero for a market without students)
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use school_choice::metrics::average_rank;
/// use school_choice::types::{Market, Matching, SchoolId, StudentId};
///
/// let s = SchoolId::new;
/// let i = StudentId::new;
/// let market = Market::new(
///     vec![1, 1],
///     vec![vec![s(0), s(1)], vec![s(0), s(1)]],
///     vec![vec![i(0), i(1)], vec![i(0), i(1)]],
/// )
/// .unwrap();
///
/// // ranks 1 and 2
/// let matching = Matching::from_assignments(vec![Some(s(0)), Some(s(1))]);
/// assert_eq!(average_rank(&market, &matching), Decimal::new(15, 1));
/// ```
pub fn average_rank(market: &Market, matching: &Matching) -> Decimal {
    let total: usize = market
        .students()
        .map(|student| assigned_rank(market, matching, student))
        .sum();
    mean(Decimal::from(total), market.num_students())
}

/// `sum / count`, or zero when `count` is zero
pub(crate) fn mean(sum: Decimal, count: usize) -> Decimal {
    sum.checked_div(Decimal::from(count)).unwrap_or(Decimal::ZERO)
}

/// A student and a school that would both rather be matched to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockingPair {
    pub student: StudentId,
    pub school: SchoolId,
}

impl fmt::Display for BlockingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.student, self.school)
    }
}

/// Every blocking pair of `matching`, by student then by the student's
/// preference order.
///
/// `(a, s)` blocks when `a` strictly prefers `s` to its assignment (any school
/// beats being unmatched) and `s` either has a free seat or holds a student
/// it ranks below `a`.
pub fn blocking_pairs(market: &Market, ranks: &RankIndex, matching: &Matching) -> Vec<BlockingPair> {
    let rosters = matching.rosters(market.num_schools());
    let mut pairs = Vec::new();

    for student in market.students() {
        let preferred = match matching.school_of(student) {
            Some(current) => market.preference_rank(student, current),
            None => market.num_schools(),
        };

        for &school in &market.preferences(student)[..preferred] {
            let roster = &rosters[school.index()];
            let has_seat = roster.len() < market.capacity(school);
            let would_displace = roster
                .iter()
                .any(|&held| ranks.prefers(school, student, held));

            if has_seat || would_displace {
                pairs.push(BlockingPair { student, school });
            }
        }
    }

    pairs
}

/// Whether `matching` admits no blocking pair
pub fn is_stable(market: &Market, ranks: &RankIndex, matching: &Matching) -> bool {
    blocking_pairs(market, ranks, matching).is_empty()
}
