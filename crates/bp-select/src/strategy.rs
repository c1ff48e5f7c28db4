//! The `EventSelectionStrategy` trait.

use bp_core::{Event, Statement};

use crate::SelectResult;

/// Result of one selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The round's event.
    Event(Event),
    /// Nobody requested anything.  Clean halt.
    Quiescent,
    /// Requests exist but every candidate is excluded.
    Deadlocked,
}

/// Picks one admissible event from the frozen statements of a round.
///
/// `statements` arrive in unit priority order (program admission order).
/// The program calls [`validate`][Self::validate] on every fresh statement at
/// collection time and only then calls [`select`][Self::select] once per
/// round.
///
/// Implementations must be deterministic for identical input and identical
/// internal state.
pub trait EventSelectionStrategy {
    fn name(&self) -> &'static str;

    /// Reject statements this strategy cannot interpret.
    fn validate(&self, statement: &Statement) -> SelectResult<()>;

    fn select(&mut self, statements: &[&Statement]) -> SelectResult<Selection>;
}

impl<S: EventSelectionStrategy + ?Sized> EventSelectionStrategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn validate(&self, statement: &Statement) -> SelectResult<()> {
        (**self).validate(statement)
    }

    fn select(&mut self, statements: &[&Statement]) -> SelectResult<Selection> {
        (**self).select(statements)
    }
}
