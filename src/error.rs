//! Error types for market construction and mechanism execution.
//!
//! Malformed markets are rejected before any engine runs, so the engines
//! only ever report internal-consistency failures.

use thiserror::Error;

use crate::types::{SchoolId, StudentId};

/// Why a sequence is not a permutation of `0..len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PermutationError {
    /// The sequence does not list every element exactly once.
    #[error("expected {expected} entries, found {actual}")]
    WrongLength { expected: usize, actual: usize },

    /// An entry names an index outside the universe.
    #[error("entry {index} is out of range (universe size {len})")]
    OutOfRange { index: usize, len: usize },

    /// An entry appears twice.
    #[error("entry {index} appears more than once")]
    Duplicate { index: usize },
}

/// A market description that violates a precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    #[error("expected {expected} school priority lists, found {actual}")]
    PriorityCountMismatch { expected: usize, actual: usize },

    #[error("preferences of {student} are not a permutation of the schools: {source}")]
    MalformedPreferences {
        student: StudentId,
        #[source]
        source: PermutationError,
    },

    #[error("priorities of {school} are not a permutation of the students: {source}")]
    MalformedPriorities {
        school: SchoolId,
        #[source]
        source: PermutationError,
    },

    #[error("capacity of {school} is negative ({capacity})")]
    NegativeCapacity { school: SchoolId, capacity: i64 },
}

/// An engine detected a violated graph or capacity invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The pointer walk hit a node with no outgoing pointer.
    #[error("no trading cycle reachable from {start} in round {round}")]
    CycleNotFound { round: usize, start: StudentId },

    /// A cycle tried to take a seat from a school with none left.
    #[error("remaining capacity of {school} would become negative")]
    CapacityUnderflow { school: SchoolId },
}

/// Crate-level error returned by the simulation driver.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

// ============================================================================
// Unit Tests
// ============================================================================
