//! `TraceObserver<W>` — bridges `ProgramObserver` to a `TraceWriter`.

use bp_core::Round;
use bp_program::{ProgramObserver, RoundStatus, RunOutcome, UnitFailure, UnitSnapshot};

use crate::row::{RoundRow, UnitFailureRow, UnitStateRow};
use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult};

/// A [`ProgramObserver`] that writes every round, unit state and failure to
/// any [`TraceWriter`] backend.
///
/// Errors from the writer are stored internally because `ProgramObserver`
/// methods have no return value.  After `program.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct TraceObserver<W: TraceWriter> {
    writer:      W,
    unit_states: bool,
    last_error:  Option<OutputError>,
}

impl<W: TraceWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, unit_states: true, last_error: None }
    }

    /// Skip the per-unit rows and record only one row per round.
    pub fn rounds_only(mut self) -> Self {
        self.unit_states = false;
        self
    }

    /// Take the stored write error (if any) after `program.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TraceWriter> ProgramObserver for TraceObserver<W> {
    fn on_unit_failed(&mut self, failure: &UnitFailure) {
        let row = UnitFailureRow {
            round:   failure.round.0,
            unit_id: failure.unit.0,
            name:    failure.name.clone(),
            cause:   failure.cause.to_string(),
        };
        let result = self.writer.write_failure(&row);
        self.store_err(result);
    }

    fn on_round_end(&mut self, round: Round, status: &RoundStatus, units: &[UnitSnapshot]) {
        let resumed = match status {
            RoundStatus::Progressing { resumed, .. } => resumed.len() as u64,
            _ => 0,
        };
        let row = RoundRow {
            round:   round.0,
            status:  status.label().to_owned(),
            event:   status.event().map(ToString::to_string).unwrap_or_default(),
            resumed,
            live:    units.len() as u64,
        };
        let result = self.writer.write_round(&row);
        self.store_err(result);

        if self.unit_states && !units.is_empty() {
            let rows: Vec<UnitStateRow> = units
                .iter()
                .map(|u| UnitStateRow {
                    round:     round.0,
                    unit_id:   u.id.0,
                    name:      u.name.clone(),
                    phase:     u.phase.to_string(),
                    statement: u.statement.as_ref().map(ToString::to_string).unwrap_or_default(),
                })
                .collect();
            let result = self.writer.write_unit_states(&rows);
            self.store_err(result);
        }
    }

    fn on_program_end(&mut self, _outcome: &RunOutcome) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
