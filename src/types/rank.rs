//! Priority rank lookup.
//!
//! ## Layout
//!
//! The index is a flat `schools x students` table (row-major by school), so
//! `rank(s, a)` is a single indexed load. Every engine compares students at
//! a school through this table instead of scanning priority lists.
//!
//! ## Invariant
//!
//! `rank(s, a) < rank(s, b)` iff `a` precedes `b` in `s`'s priority order.
//! Rank 0 is the highest priority.

use crate::error::PermutationError;
use crate::types::{Market, SchoolId, StudentId};

/// Inverts a permutation of `0..len` in one pass: `table[x] = position of x`.
///
/// # Errors
///
/// Fails if `order` has the wrong length, names an index outside `0..len`,
/// or repeats an index.
///
/// # Example
///
/// ```
/// use school_choice::types::position_table;
///
/// assert_eq!(position_table(&[2usize, 0, 1], 3), Ok(vec![1, 2, 0]));
/// assert!(position_table(&[0usize, 0, 1], 3).is_err());
/// ```
pub fn position_table<T>(order: &[T], len: usize) -> Result<Vec<usize>, PermutationError>
where
    T: Copy + Into<usize>,
{
    if order.len() != len {
        return Err(PermutationError::WrongLength {
            expected: len,
            actual: order.len(),
        });
    }

    let mut table = vec![usize::MAX; len];
    for (position, &entry) in order.iter().enumerate() {
        let index: usize = entry.into();
        let slot = table
            .get_mut(index)
            .ok_or(PermutationError::OutOfRange { index, len })?;
        if *slot != usize::MAX {
            return Err(PermutationError::Duplicate { index });
        }
        *slot = position;
    }
    Ok(table)
}

/// Per-school priority ranks for every student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankIndex {
    num_students: usize,
    ranks: Vec<usize>,
}

impl RankIndex {
    /// Build the index from a validated market.
    ///
    /// `Market::new` already checked every priority list is a permutation,
    /// so construction cannot fail here.
    pub fn build(market: &Market) -> Self {
        let num_students = market.num_students();
        let mut ranks = vec![0; market.num_schools() * num_students];

        for school in market.schools() {
            let row = school.index() * num_students;
            for (rank, student) in market.priorities(school).iter().enumerate() {
                ranks[row + student.index()] = rank;
            }
        }

        Self { num_students, ranks }
    }

    /// Priority rank of `student` at `school` (0 = highest priority)
    #[inline]
    pub fn rank(&self, school: SchoolId, student: StudentId) -> usize {
        debug_assert!(
            student.index() < self.num_students,
            "called `RankIndex::rank` with student out of bounds: the len is {} but the index is {}",
            self.num_students,
            student.index()
        );
        self.ranks[school.index() * self.num_students + student.index()]
    }

    /// Whether `school` ranks `a` strictly above `b`
    #[inline]
    pub fn prefers(&self, school: SchoolId, a: StudentId, b: StudentId) -> bool {
        self.rank(school, a) < self.rank(school, b)
    }

    /// The highest-priority student among `candidates`, if any
    pub fn best_of<I>(&self, school: SchoolId, candidates: I) -> Option<StudentId>
    where
        I: IntoIterator<Item = StudentId>,
    {
        candidates
            .into_iter()
            .min_by_key(|&student| self.rank(school, student))
    }

    /// Sort `students` into `school`'s priority order (best first)
    #[inline]
    pub fn sort_by_priority(&self, school: SchoolId, students: &mut [StudentId]) {
        students.sort_unstable_by_key(|&student| self.rank(school, student));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_market() -> Market {
        let s = SchoolId::new;
        let i = StudentId::new;
        Market::new(
            vec![1, 1],
            vec![vec![s(0), s(1)], vec![s(0), s(1)], vec![s(1), s(0)]],
            vec![vec![i(1), i(0), i(2)], vec![i(2), i(0), i(1)]],
        )
        .expect("valid market")
    }

    #[test]
    fn test_position_table_inverts_permutation() {
        let order = [StudentId::new(2), StudentId::new(0), StudentId::new(1)];
        assert_eq!(position_table(&order, 3), Ok(vec![1, 2, 0]));
    }

    #[test]
    fn test_position_table_rejects_malformed() {
        assert_eq!(
            position_table(&[0usize, 1], 3),
            Err(PermutationError::WrongLength { expected: 3, actual: 2 })
        );
        assert_eq!(
            position_table(&[0usize, 5, 1], 3),
            Err(PermutationError::OutOfRange { index: 5, len: 3 })
        );
        assert_eq!(
            position_table(&[1usize, 1, 0], 3),
            Err(PermutationError::Duplicate { index: 1 })
        );
    }

    #[test]
    fn test_position_table_empty() {
        let empty: [usize; 0] = [];
        assert_eq!(position_table(&empty, 0), Ok(vec![]));
    }

    #[test]
    fn test_rank_matches_priority_order() {
        let market = sample_market();
        let ranks = RankIndex::build(&market);

        for school in market.schools() {
            for (position, &student) in market.priorities(school).iter().enumerate() {
                assert_eq!(ranks.rank(school, student), position);
            }
        }
        assert!(ranks.prefers(SchoolId::new(0), StudentId::new(1), StudentId::new(0)));
        assert!(!ranks.prefers(SchoolId::new(1), StudentId::new(1), StudentId::new(0)));
    }

    #[test]
    fn test_best_of_and_sort() {
        let market = sample_market();
        let ranks = RankIndex::build(&market);
        let s2 = SchoolId::new(1);

        let best = ranks.best_of(s2, [StudentId::new(0), StudentId::new(1)]);
        assert_eq!(best, Some(StudentId::new(0)));
        assert_eq!(ranks.best_of(s2, std::iter::empty()), None);

        let mut pool = vec![StudentId::new(1), StudentId::new(0), StudentId::new(2)];
        ranks.sort_by_priority(s2, &mut pool);
        assert_eq!(pool, vec![StudentId::new(2), StudentId::new(0), StudentId::new(1)]);
    }
}
