//! Round and run results.

use std::fmt;

use bp_core::{Event, Round, Statement, UnitId};
use bp_thread::UnitError;

// ── Unit snapshots ────────────────────────────────────────────────────────────

/// Life-cycle phase of a unit, as seen between rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitPhase {
    /// Will be polled for a fresh statement next round.
    Runnable,
    /// Still holding a statement whose event has not fired.
    Parked,
    Terminated,
}

impl fmt::Display for UnitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnitPhase::Runnable => "runnable",
            UnitPhase::Parked => "parked",
            UnitPhase::Terminated => "terminated",
        })
    }
}

/// Read-only view of one unit for observers.
#[derive(Clone, Debug)]
pub struct UnitSnapshot {
    pub id:        UnitId,
    pub name:      String,
    pub phase:     UnitPhase,
    /// The parked statement, if any.
    pub statement: Option<Statement>,
}

// ── Failures ──────────────────────────────────────────────────────────────────

/// A unit whose pause-point body returned an error.
#[derive(Clone, Debug)]
pub struct UnitFailure {
    pub unit:  UnitId,
    pub name:  String,
    pub round: Round,
    pub cause: UnitError,
}

impl fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) failed in {}: {}", self.unit, self.name, self.round, self.cause)
    }
}

/// One unit taking part in a deadlock.
#[derive(Clone, Debug)]
pub struct StalledUnit {
    pub unit:      UnitId,
    pub name:      String,
    pub statement: Statement,
}

/// The statements that left no admissible event.
///
/// Only units that request or block something are listed; pure waiters
/// cannot cause a deadlock.
#[derive(Clone, Debug)]
pub struct DeadlockReport {
    pub round: Round,
    pub units: Vec<StalledUnit>,
}

impl fmt::Display for DeadlockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deadlock in {}:", self.round)?;
        for u in &self.units {
            write!(f, "\n  {} ({}): {}", u.unit, u.name, u.statement)?;
        }
        Ok(())
    }
}

// ── RoundStatus ───────────────────────────────────────────────────────────────

/// What one call to [`Program::step`][crate::Program::step] did.
#[derive(Clone, Debug)]
pub enum RoundStatus {
    /// An event was selected and broadcast.
    Progressing { event: Event, resumed: Vec<UnitId> },
    /// No event this round, but units spawned while polling were admitted.
    /// They are polled next round, so the program has not halted.
    Admitted { units: Vec<UnitId> },
    /// No unit requested anything.  Clean halt.
    Quiescent,
    /// Requests pending, none admissible.  Fatal.
    Deadlocked(DeadlockReport),
    /// No units left.  Clean halt.
    Drained,
    /// A unit failed while the program runs with `fail_fast`.
    UnitFailed(UnitFailure),
}

impl RoundStatus {
    pub fn is_halt(&self) -> bool {
        !matches!(self, RoundStatus::Progressing { .. } | RoundStatus::Admitted { .. })
    }

    pub fn event(&self) -> Option<&Event> {
        match self {
            RoundStatus::Progressing { event, .. } => Some(event),
            _ => None,
        }
    }

    /// Short label for logs and trace files.
    pub fn label(&self) -> &'static str {
        match self {
            RoundStatus::Progressing { .. } => "progressing",
            RoundStatus::Admitted { .. } => "admitted",
            RoundStatus::Quiescent => "quiescent",
            RoundStatus::Deadlocked(_) => "deadlocked",
            RoundStatus::Drained => "drained",
            RoundStatus::UnitFailed(_) => "unit_failed",
        }
    }
}

// ── RunOutcome ────────────────────────────────────────────────────────────────

/// Why a run ended cleanly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Quiescent,
    Drained,
    RoundLimit,
}

/// Result of [`Program::run`][crate::Program::run].
#[derive(Clone, Debug)]
pub enum RunOutcome {
    Completed(Completion),
    Deadlocked(DeadlockReport),
    UnitFailed(UnitFailure),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Completed(c) => write!(f, "completed ({c:?})"),
            RunOutcome::Deadlocked(report) => write!(f, "{report}"),
            RunOutcome::UnitFailed(failure) => write!(f, "{failure}"),
        }
    }
}
