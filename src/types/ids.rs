//! Identifier types for students and schools.
//!
//! Both are zero-based indices into the market's tables. They render
//! one-based (`i1`, `s1`) to match the usual textbook labelling.

use std::fmt;

/// Index of a student (the proposing / applying side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StudentId(usize);

impl StudentId {
    /// Create a student id from a zero-based index
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Zero-based index into per-student tables
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<StudentId> for usize {
    #[inline]
    fn from(id: StudentId) -> usize {
        id.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.0 + 1)
    }
}

/// Index of a school (the capacity-constrained side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SchoolId(usize);

impl SchoolId {
    /// Create a school id from a zero-based index
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Zero-based index into per-school tables
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<SchoolId> for usize {
    #[inline]
    fn from(id: SchoolId) -> usize {
        id.0
    }
}

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0 + 1)
    }
}
