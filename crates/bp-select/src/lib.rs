//! `bp-select` — choosing the one event of a round.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                         |
//! |-----------------|------------------------------------------------------------------|
//! | [`strategy`]    | `EventSelectionStrategy` trait, `Selection`                      |
//! | [`enumerative`] | `EnumerativeStrategy` — concrete events, priority tie-break      |
//! | [`symbolic`]    | `SymbolicStrategy` — joint assignment over shared variables      |
//! | [`solver`]      | `Solver` — deterministic backtracking over finite domains        |
//! | [`rng`]         | `SelectionRng` — seeded RNG for the optional random tie-break    |
//! | [`error`]       | `SelectError`, `SelectResult<T>`                                 |
//!
//! Both strategies report a round with no requests at all as
//! [`Selection::Quiescent`] and a round whose requests are all excluded as
//! [`Selection::Deadlocked`], so the program can tell a clean halt from a
//! conflict.

pub mod enumerative;
pub mod error;
pub mod rng;
pub mod solver;
pub mod strategy;
pub mod symbolic;

#[cfg(test)]
mod tests;

pub use enumerative::{EnumerativeStrategy, Tiebreak};
pub use error::{SelectError, SelectResult};
pub use rng::SelectionRng;
pub use solver::Solver;
pub use strategy::{EventSelectionStrategy, Selection};
pub use symbolic::SymbolicStrategy;
