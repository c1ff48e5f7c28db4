//! The `TraceWriter` trait implemented by all backend writers.

use crate::{OutputResult, RoundRow, UnitFailureRow, UnitStateRow};

/// Trait implemented by the CSV and JSON-lines writers.
///
/// All methods are infallible from the observer's perspective.  Errors are
/// stored internally and retrieved with [`TraceObserver::take_error`][crate::TraceObserver::take_error].
pub trait TraceWriter {
    fn write_round(&mut self, row: &RoundRow) -> OutputResult<()>;

    /// Write the unit states of one round.
    fn write_unit_states(&mut self, rows: &[UnitStateRow]) -> OutputResult<()>;

    fn write_failure(&mut self, row: &UnitFailureRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Lets an application pick the backend at runtime.
impl<W: TraceWriter + ?Sized> TraceWriter for Box<W> {
    fn write_round(&mut self, row: &RoundRow) -> OutputResult<()> {
        (**self).write_round(row)
    }

    fn write_unit_states(&mut self, rows: &[UnitStateRow]) -> OutputResult<()> {
        (**self).write_unit_states(rows)
    }

    fn write_failure(&mut self, row: &UnitFailureRow) -> OutputResult<()> {
        (**self).write_failure(row)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}
