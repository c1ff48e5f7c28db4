//! Program observer trait for progress reporting and trace collection.

use bp_core::Round;

use crate::{RoundStatus, RunOutcome, UnitFailure, UnitSnapshot};

/// Callbacks invoked by [`Program`][crate::Program] at key points in the
/// round loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observers see state only; they cannot
/// influence selection.
///
/// # Example: event printer
///
/// ```rust,ignore
/// struct EventPrinter;
///
/// impl ProgramObserver for EventPrinter {
///     fn on_round_end(&mut self, round: Round, status: &RoundStatus, _: &[UnitSnapshot]) {
///         if let Some(e) = status.event() {
///             println!("{round}: {e}");
///         }
///     }
/// }
/// ```
pub trait ProgramObserver {
    /// Called once by `run` before the first round.
    fn on_program_start(&mut self, _units: usize) {}

    /// Called at the very start of each round, before any unit is polled.
    fn on_round_start(&mut self, _round: Round) {}

    /// Called once per failing unit, as soon as the failure is seen.
    fn on_unit_failed(&mut self, _failure: &UnitFailure) {}

    /// Called at the end of each round with the admitted units' states.
    fn on_round_end(&mut self, _round: Round, _status: &RoundStatus, _units: &[UnitSnapshot]) {}

    /// Called once by `run` after the final round.
    fn on_program_end(&mut self, _outcome: &RunOutcome) {}
}

/// A [`ProgramObserver`] that does nothing.
pub struct NoopObserver;

impl ProgramObserver for NoopObserver {}

/// Logs every selected event through `tracing`.
///
/// The program already logs halts and failures; this adds one `info` line
/// per round, which is the usual "event trace" of a behavioral program.
#[derive(Default)]
pub struct TracingObserver {
    events: u64,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events seen so far.
    pub fn events(&self) -> u64 {
        self.events
    }
}

impl ProgramObserver for TracingObserver {
    fn on_program_start(&mut self, units: usize) {
        tracing::info!(units, "program start");
    }

    fn on_round_start(&mut self, round: Round) {
        tracing::debug!(%round, "round start");
    }

    fn on_round_end(&mut self, round: Round, status: &RoundStatus, units: &[UnitSnapshot]) {
        for u in units {
            tracing::trace!(%round, unit = %u.id, name = %u.name, phase = %u.phase, statement = ?u.statement.as_ref().map(ToString::to_string));
        }
        match status {
            RoundStatus::Progressing { event, resumed } => {
                self.events += 1;
                tracing::info!(%round, %event, resumed = resumed.len(), live = units.len(), "event");
            }
            RoundStatus::Admitted { units: admitted } => {
                tracing::debug!(%round, admitted = admitted.len(), "spawned units admitted");
            }
            other => tracing::info!(%round, status = other.label(), "halt"),
        }
    }

    fn on_program_end(&mut self, outcome: &RunOutcome) {
        tracing::info!(events = self.events, %outcome, "program end");
    }
}
