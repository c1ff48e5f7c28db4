//! The `Program` struct and its round loop.

use bp_core::{Event, Round, Statement, UnitId};
use bp_select::{EventSelectionStrategy, Selection};
use bp_thread::{BThread, UnitContext, UnitError};

use crate::{
    Completion, DeadlockReport, ProgramConfig, ProgramError, ProgramObserver, ProgramResult,
    RoundStatus, RunOutcome, StalledUnit, UnitFailure, UnitPhase, UnitSnapshot,
};

// ── Unit slots ────────────────────────────────────────────────────────────────

enum UnitState {
    Runnable,
    Parked(Statement),
    Terminated,
}

struct Slot {
    id:     UnitId,
    thread: Box<dyn BThread>,
    state:  UnitState,
}

impl Slot {
    fn statement(&self) -> Option<&Statement> {
        match &self.state {
            UnitState::Parked(s) => Some(s),
            _ => None,
        }
    }

    fn failure(&self, round: Round, cause: UnitError) -> UnitFailure {
        UnitFailure { unit: self.id, name: self.thread.name().to_owned(), round, cause }
    }
}

// ── Program ───────────────────────────────────────────────────────────────────

/// A set of behavior units plus the strategy that synchronizes them.
///
/// Each call to [`step`][Self::step] runs one round: collect statements,
/// select one event, resume the units that asked for it, admit spawned
/// units.  [`run`][Self::run] repeats that until the program halts.
///
/// Units are kept in admission order, which is also the order statements
/// are handed to the strategy.
///
/// Create via [`ProgramBuilder`][crate::ProgramBuilder].
pub struct Program<S: EventSelectionStrategy> {
    config:   ProgramConfig,
    strategy: S,
    units:    Vec<Slot>,
    next_id:  u32,
    round:    Round,
    /// Failures isolated so far (empty under `fail_fast`).
    failures: Vec<UnitFailure>,
    /// Set once a round halts; further steps repeat it.
    halted:   Option<RoundStatus>,
}

impl<S: EventSelectionStrategy> Program<S> {
    pub(crate) fn new(strategy: S, config: ProgramConfig) -> Self {
        Self {
            config,
            strategy,
            units: Vec::new(),
            next_id: 0,
            round: Round::ZERO,
            failures: Vec::new(),
            halted: None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    /// The next round to run.
    pub fn round(&self) -> Round {
        self.round
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Mutable access between rounds, e.g. to declare more variables.
    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    /// Number of live (not yet removed) units.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn failures(&self) -> &[UnitFailure] {
        &self.failures
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    /// Current state of every live unit, in admission order.
    pub fn snapshot(&self) -> Vec<UnitSnapshot> {
        self.units
            .iter()
            .map(|s| UnitSnapshot {
                id:        s.id,
                name:      s.thread.name().to_owned(),
                phase:     match s.state {
                    UnitState::Runnable => UnitPhase::Runnable,
                    UnitState::Parked(_) => UnitPhase::Parked,
                    UnitState::Terminated => UnitPhase::Terminated,
                },
                statement: s.statement().cloned(),
            })
            .collect()
    }

    /// Admit a unit from outside the round loop.  It is polled in the next
    /// round.
    pub fn spawn(&mut self, thread: impl BThread + 'static) -> UnitId {
        self.admit(Box::new(thread))
    }

    pub(crate) fn admit(&mut self, thread: Box<dyn BThread>) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.units.push(Slot { id, thread, state: UnitState::Runnable });
        id
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run rounds until the program halts or `config.max_rounds` is reached.
    ///
    /// Calls observer hooks at every round boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    ///
    /// # Errors
    ///
    /// A malformed statement or a strategy failure aborts the run; nothing
    /// a unit does at runtime can make this return `Err` otherwise.
    pub fn run<O: ProgramObserver>(&mut self, observer: &mut O) -> ProgramResult<RunOutcome> {
        observer.on_program_start(self.units.len());
        let outcome = loop {
            if self.config.max_rounds.is_some_and(|max| self.round.0 >= max) {
                break RunOutcome::Completed(Completion::RoundLimit);
            }
            match self.step(observer)? {
                RoundStatus::Progressing { .. } | RoundStatus::Admitted { .. } => continue,
                RoundStatus::Quiescent => break RunOutcome::Completed(Completion::Quiescent),
                RoundStatus::Drained => break RunOutcome::Completed(Completion::Drained),
                RoundStatus::Deadlocked(report) => break RunOutcome::Deadlocked(report),
                RoundStatus::UnitFailed(failure) => break RunOutcome::UnitFailed(failure),
            }
        };
        tracing::info!(rounds = self.round.0, %outcome, "run finished");
        observer.on_program_end(&outcome);
        Ok(outcome)
    }

    /// Run at most `n` rounds, stopping early on a halt.
    ///
    /// Useful for tests and incremental stepping.  Ignores `max_rounds`.
    pub fn run_rounds<O: ProgramObserver>(
        &mut self,
        n: u64,
        observer: &mut O,
    ) -> ProgramResult<Vec<RoundStatus>> {
        let mut statuses = Vec::new();
        for _ in 0..n {
            let status = self.step(observer)?;
            let halt = status.is_halt();
            statuses.push(status);
            if halt {
                break;
            }
        }
        Ok(statuses)
    }

    /// Run exactly one round.
    ///
    /// After a halt every further call returns the same halt status without
    /// touching any unit.
    pub fn step<O: ProgramObserver>(&mut self, observer: &mut O) -> ProgramResult<RoundStatus> {
        if let Some(halt) = &self.halted {
            return Ok(halt.clone());
        }

        let now = self.round;
        observer.on_round_start(now);
        let status = self.process_round(now, observer)?;
        tracing::debug!(round = %now, status = status.label(), event = ?status.event().map(ToString::to_string), "round end");
        observer.on_round_end(now, &status, &self.snapshot());

        if status.is_halt() {
            self.halted = Some(status.clone());
        }
        self.round = now.next();
        Ok(status)
    }

    // ── Core round processing ─────────────────────────────────────────────

    fn process_round<O: ProgramObserver>(
        &mut self,
        now: Round,
        observer: &mut O,
    ) -> ProgramResult<RoundStatus> {
        let mut spawned: Vec<Box<dyn BThread>> = Vec::new();
        let mut failed: Vec<UnitFailure> = Vec::new();

        // ── Phase 1: collect ──────────────────────────────────────────────
        //
        // Parked units keep the statement they already hold; only runnable
        // ones are polled, and each fresh statement is validated once.
        for slot in self.units.iter_mut() {
            if !matches!(slot.state, UnitState::Runnable) {
                continue;
            }
            let mut ctx = UnitContext::new(slot.id, now, &mut spawned);
            match slot.thread.poll(&mut ctx) {
                Ok(Some(statement)) => {
                    if let Err(source) = self.strategy.validate(&statement) {
                        return Err(ProgramError::MalformedStatement {
                            unit: slot.id,
                            name: slot.thread.name().to_owned(),
                            source,
                        });
                    }
                    slot.state = UnitState::Parked(statement);
                }
                Ok(None) => slot.state = UnitState::Terminated,
                Err(cause) => {
                    slot.state = UnitState::Terminated;
                    failed.push(slot.failure(now, cause));
                }
            }
        }
        if let Some(status) = self.report_failures(failed, observer) {
            self.admit_round_end(spawned);
            return Ok(status);
        }

        if !self.units.iter().any(|s| s.statement().is_some()) {
            let admitted = self.admit_round_end(spawned);
            return Ok(if admitted.is_empty() {
                RoundStatus::Drained
            } else {
                RoundStatus::Admitted { units: admitted }
            });
        }

        // ── Phase 2: select ───────────────────────────────────────────────
        let statements: Vec<&Statement> = self.units.iter().filter_map(Slot::statement).collect();
        let selection = self.strategy.select(&statements)?;
        let event = match selection {
            Selection::Event(event) => event,
            // Units spawned while polling have not voted yet.
            _ if !spawned.is_empty() => {
                let admitted = self.admit_round_end(spawned);
                return Ok(RoundStatus::Admitted { units: admitted });
            }
            Selection::Quiescent => {
                self.admit_round_end(spawned);
                return Ok(RoundStatus::Quiescent);
            }
            Selection::Deadlocked => {
                let report = self.deadlock_report(now);
                tracing::error!(round = %now, units = report.units.len(), "deadlock");
                self.admit_round_end(spawned);
                return Ok(RoundStatus::Deadlocked(report));
            }
        };

        // ── Phase 3: resume ───────────────────────────────────────────────
        let (resumed, failed) = self.broadcast(&event, now, &mut spawned);
        let halt = self.report_failures(failed, observer);

        // ── Phase 4: admit ────────────────────────────────────────────────
        self.admit_round_end(spawned);
        Ok(halt.unwrap_or(RoundStatus::Progressing { event, resumed }))
    }

    /// Resume every parked unit whose request or waitFor matches `event`.
    fn broadcast(
        &mut self,
        event: &Event,
        now: Round,
        spawned: &mut Vec<Box<dyn BThread>>,
    ) -> (Vec<UnitId>, Vec<UnitFailure>) {
        let mut resumed = Vec::new();
        let mut failed = Vec::new();
        for slot in self.units.iter_mut() {
            if !slot.statement().is_some_and(|s| s.observes(event)) {
                continue;
            }
            resumed.push(slot.id);
            let mut ctx = UnitContext::new(slot.id, now, spawned);
            match slot.thread.resume(event, &mut ctx) {
                Ok(()) if slot.thread.is_terminated() => slot.state = UnitState::Terminated,
                Ok(()) => slot.state = UnitState::Runnable,
                Err(cause) => {
                    slot.state = UnitState::Terminated;
                    failed.push(slot.failure(now, cause));
                }
            }
        }
        (resumed, failed)
    }

    /// Log and record failures.  Returns the halt status under `fail_fast`.
    fn report_failures<O: ProgramObserver>(
        &mut self,
        failed: Vec<UnitFailure>,
        observer: &mut O,
    ) -> Option<RoundStatus> {
        let mut first = None;
        for failure in failed {
            tracing::warn!(unit = %failure.unit, name = %failure.name, cause = %failure.cause, "unit failed");
            observer.on_unit_failed(&failure);
            if self.config.fail_fast {
                first.get_or_insert(failure);
            } else {
                self.failures.push(failure);
            }
        }
        first.map(RoundStatus::UnitFailed)
    }

    /// Drop terminated units, then admit the ones spawned this round.
    fn admit_round_end(&mut self, spawned: Vec<Box<dyn BThread>>) -> Vec<UnitId> {
        self.units.retain(|s| !matches!(s.state, UnitState::Terminated));
        spawned
            .into_iter()
            .map(|thread| {
                let id = self.admit(thread);
                tracing::debug!(unit = %id, "admitted spawned unit");
                id
            })
            .collect()
    }

    fn deadlock_report(&self, now: Round) -> DeadlockReport {
        let units = self
            .units
            .iter()
            .filter_map(|s| {
                let statement = s.statement()?;
                (statement.request.is_some() || statement.block.is_some()).then(|| StalledUnit {
                    unit:      s.id,
                    name:      s.thread.name().to_owned(),
                    statement: statement.clone(),
                })
            })
            .collect();
        DeadlockReport { round: now, units }
    }
}
