//! Matching produced by a mechanism.
//!
//! ## Fingerprint
//!
//! A matching can be reduced to a 32-byte SHA-256 fingerprint over its
//! little-endian school indices (`u64::MAX` for unmatched students). Equal
//! matchings always have equal fingerprints, which makes determinism checks
//! across runs and threads cheap.

use sha2::{Digest, Sha256};

use crate::types::{Market, SchoolId, StudentId};

/// Fingerprint encoding of an unmatched student
const UNMATCHED_TAG: u64 = u64::MAX;

/// Assignment of every student to a school or to nothing.
///
/// Indexed by student, so each student appears exactly once by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matching {
    assignments: Vec<Option<SchoolId>>,
}

impl Matching {
    /// A matching with every one of `num_students` students unmatched
    pub fn unmatched(num_students: usize) -> Self {
        Self {
            assignments: vec![None; num_students],
        }
    }

    /// Wrap an explicit per-student assignment vector
    pub fn from_assignments(assignments: Vec<Option<SchoolId>>) -> Self {
        Self { assignments }
    }

    /// Build a matching from per-school rosters.
    ///
    /// A student absent from every roster is unmatched. If a student shows
    /// up in more than one roster the last one wins; engines never do that.
    pub fn from_rosters(num_students: usize, rosters: &[Vec<StudentId>]) -> Self {
        let mut matching = Self::unmatched(num_students);
        for (index, roster) in rosters.iter().enumerate() {
            for &student in roster {
                matching.assign(student, SchoolId::new(index));
            }
        }
        matching
    }

    #[inline]
    pub(crate) fn assign(&mut self, student: StudentId, school: SchoolId) {
        self.assignments[student.index()] = Some(school);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of students covered (assigned or not)
    #[inline]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// The school `student` is assigned to, if any
    #[inline]
    pub fn school_of(&self, student: StudentId) -> Option<SchoolId> {
        self.assignments[student.index()]
    }

    /// `(student, assignment)` pairs in student index order
    pub fn iter(&self) -> impl Iterator<Item = (StudentId, Option<SchoolId>)> + '_ {
        self.assignments
            .iter()
            .enumerate()
            .map(|(index, &school)| (StudentId::new(index), school))
    }

    pub fn assignments(&self) -> &[Option<SchoolId>] {
        &self.assignments
    }

    pub fn matched_count(&self) -> usize {
        self.assignments.iter().filter(|school| school.is_some()).count()
    }

    pub fn unmatched_count(&self) -> usize {
        self.len() - self.matched_count()
    }

    /// Seats taken at each of `num_schools` schools
    pub fn occupancy(&self, num_schools: usize) -> Vec<usize> {
        let mut counts = vec![0; num_schools];
        for school in self.assignments.iter().flatten() {
            counts[school.index()] += 1;
        }
        counts
    }

    /// Students assigned to each of `num_schools` schools, in index order
    pub fn rosters(&self, num_schools: usize) -> Vec<Vec<StudentId>> {
        let mut rosters = vec![Vec::new(); num_schools];
        for (student, school) in self.iter() {
            if let Some(school) = school {
                rosters[school.index()].push(student);
            }
        }
        rosters
    }

    /// Whether this matching covers every student and respects every capacity
    pub fn is_feasible(&self, market: &Market) -> bool {
        if self.len() != market.num_students() {
            return false;
        }
        if self
            .assignments
            .iter()
            .flatten()
            .any(|school| school.index() >= market.num_schools())
        {
            return false;
        }
        self.occupancy(market.num_schools())
            .iter()
            .zip(market.capacities())
            .all(|(taken, capacity)| taken <= capacity)
    }

    // ========================================================================
    // Fingerprint
    // ========================================================================

    /// SHA-256 over the assignment vector
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for school in &self.assignments {
            let tag = school.map_or(UNMATCHED_TAG, |s| s.index() as u64);
            hasher.update(tag.to_le_bytes());
        }

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&hasher.finalize());
        hash
    }

    /// Fingerprint as a hex string
    pub fn fingerprint_hex(&self) -> String {
        hex::encode(self.fingerprint())
    }
}
