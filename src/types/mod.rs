//! Core data types for the school choice market.
//!
//! ## Types
//!
//! - [`StudentId`] / [`SchoolId`]: zero-based agent and resource indices
//! - [`Market`]: capacities plus strict preference and priority orders
//! - [`RankIndex`]: `(school, student) -> priority rank` lookup
//! - [`Matching`]: student to school-or-unmatched assignment
//!
//! `Market` and `RankIndex` are built once per market and shared read-only
//! by every mechanism.

mod ids;
mod market;
mod matching;
mod rank;

pub use ids::{SchoolId, StudentId};
pub use market::Market;
pub use matching::Matching;
pub use rank::{position_table, RankIndex};
