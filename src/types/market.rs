//! The static market: capacities, preferences, and priorities.
//!
//! A `Market` can only be obtained through [`Market::new`], which checks
//! that every preference list is a permutation of the schools and every
//! priority list is a permutation of the students. Engines rely on this and
//! never re-validate.
//!
//! ## Example
//!
//! ```
//! use school_choice::types::{Market, SchoolId, StudentId};
//!
//! let s = SchoolId::new;
//! let i = StudentId::new;
//!
//! let market = Market::new(
//!     vec![1, 1],
//!     vec![vec![s(0), s(1)], vec![s(1), s(0)]],
//!     vec![vec![i(0), i(1)], vec![i(1), i(0)]],
//! )
//! .unwrap();
//!
//! assert_eq!(market.num_students(), 2);
//! assert_eq!(market.preference_rank(i(1), s(0)), 1);
//! ```

use crate::error::MarketError;
use crate::types::rank::position_table;
use crate::types::{SchoolId, StudentId};

/// An immutable two-sided school choice market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Market {
    /// Seats per school
    capacities: Vec<usize>,

    /// Strict preference order over all schools, per student
    preferences: Vec<Vec<SchoolId>>,

    /// Strict priority order over all students, per school
    priorities: Vec<Vec<StudentId>>,

    /// `preference_ranks[a * schools + s]` = 0-based position of `s` in `a`'s list
    preference_ranks: Vec<usize>,
}

impl Market {
    /// Validate and assemble a market.
    ///
    /// The number of students is `preferences.len()` and the number of
    /// schools is `capacities.len()`.
    ///
    /// # Errors
    ///
    /// - [`MarketError::PriorityCountMismatch`] if there is not exactly one
    ///   priority list per school
    /// - [`MarketError::MalformedPreferences`] / [`MarketError::MalformedPriorities`]
    ///   if any list is not a permutation
    pub fn new(
        capacities: Vec<usize>,
        preferences: Vec<Vec<SchoolId>>,
        priorities: Vec<Vec<StudentId>>,
    ) -> Result<Self, MarketError> {
        let num_schools = capacities.len();
        let num_students = preferences.len();

        if priorities.len() != num_schools {
            return Err(MarketError::PriorityCountMismatch {
                expected: num_schools,
                actual: priorities.len(),
            });
        }

        let mut preference_ranks = Vec::with_capacity(num_students * num_schools);
        for (index, order) in preferences.iter().enumerate() {
            let table = position_table(order, num_schools).map_err(|source| {
                MarketError::MalformedPreferences {
                    student: StudentId::new(index),
                    source,
                }
            })?;
            preference_ranks.extend(table);
        }

        for (index, order) in priorities.iter().enumerate() {
            position_table(order, num_students).map_err(|source| {
                MarketError::MalformedPriorities {
                    school: SchoolId::new(index),
                    source,
                }
            })?;
        }

        Ok(Self {
            capacities,
            preferences,
            priorities,
            preference_ranks,
        })
    }

    // ========================================================================
    // Sizes
    // ========================================================================

    #[inline]
    pub fn num_students(&self) -> usize {
        self.preferences.len()
    }

    #[inline]
    pub fn num_schools(&self) -> usize {
        self.capacities.len()
    }

    /// Total number of seats across all schools
    pub fn total_capacity(&self) -> usize {
        self.capacities.iter().sum()
    }

    /// All students in index order
    pub fn students(&self) -> impl Iterator<Item = StudentId> + '_ {
        (0..self.num_students()).map(StudentId::new)
    }

    /// All schools in index order
    pub fn schools(&self) -> impl Iterator<Item = SchoolId> + '_ {
        (0..self.num_schools()).map(SchoolId::new)
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    #[inline]
    pub fn capacity(&self, school: SchoolId) -> usize {
        self.capacities[school.index()]
    }

    #[inline]
    pub fn capacities(&self) -> &[usize] {
        &self.capacities
    }

    /// The student's schools, most preferred first
    #[inline]
    pub fn preferences(&self, student: StudentId) -> &[SchoolId] {
        &self.preferences[student.index()]
    }

    /// The school's students, highest priority first
    #[inline]
    pub fn priorities(&self, school: SchoolId) -> &[StudentId] {
        &self.priorities[school.index()]
    }

    /// 0-based position of `school` in `student`'s preference order
    #[inline]
    pub fn preference_rank(&self, student: StudentId, school: SchoolId) -> usize {
        self.preference_ranks[student.index() * self.num_schools() + school.index()]
    }

    /// Whether `student` strictly prefers `a` to `b`
    #[inline]
    pub fn prefers(&self, student: StudentId, a: SchoolId, b: SchoolId) -> bool {
        self.preference_rank(student, a) < self.preference_rank(student, b)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
