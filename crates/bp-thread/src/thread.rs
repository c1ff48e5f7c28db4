//! The `BThread` capability and the `StepThread` adapter.

use bp_core::{Event, Statement};

use crate::{Behavior, Pause, UnitContext, UnitError, UnitResult};

/// What the program needs from a behavior unit.
///
/// - `poll` runs a runnable unit to its next pause point and returns the
///   statement yielded there, or `None` if the unit finished instead.
/// - `resume` feeds back the selected event; the program only calls it with
///   an event the last statement requested or waited for.
/// - `is_terminated` reports that no further pause points exist.
pub trait BThread {
    fn name(&self) -> &str {
        "bthread"
    }

    fn poll(&mut self, ctx: &mut UnitContext<'_>) -> UnitResult<Option<Statement>>;

    fn resume(&mut self, event: &Event, ctx: &mut UnitContext<'_>) -> UnitResult<()>;

    fn is_terminated(&self) -> bool;
}

impl<T: BThread + ?Sized> BThread for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn poll(&mut self, ctx: &mut UnitContext<'_>) -> UnitResult<Option<Statement>> {
        (**self).poll(ctx)
    }

    fn resume(&mut self, event: &Event, ctx: &mut UnitContext<'_>) -> UnitResult<()> {
        (**self).resume(event, ctx)
    }

    fn is_terminated(&self) -> bool {
        (**self).is_terminated()
    }
}

// ── StepThread ────────────────────────────────────────────────────────────────

enum Phase {
    /// Never stepped.
    Start,
    /// Resumed; the next statement is already computed and waits for `poll`.
    Ready(Statement),
    /// Statement handed out; waiting for `resume`.
    Parked,
    Finished,
}

/// Adapts a [`Behavior`] to the [`BThread`] protocol.
///
/// `resume` advances the behavior to its next pause point immediately, so
/// side effects between pause points happen while the round's event is being
/// broadcast; `poll` then hands out the statement computed there.
pub struct StepThread<B: Behavior> {
    name:     String,
    behavior: B,
    phase:    Phase,
}

/// Wrap `behavior` as a named unit.
pub fn thread<B: Behavior>(name: impl Into<String>, behavior: B) -> StepThread<B> {
    StepThread::new(name, behavior)
}

impl<B: Behavior> StepThread<B> {
    pub fn new(name: impl Into<String>, behavior: B) -> Self {
        Self { name: name.into(), behavior, phase: Phase::Start }
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    fn advance(&mut self, resumed: Option<&Event>, ctx: &mut UnitContext<'_>) -> UnitResult<Option<Statement>> {
        match self.behavior.step(resumed, ctx) {
            Ok(Pause::Sync(s)) => Ok(Some(s)),
            Ok(Pause::Done) => {
                self.phase = Phase::Finished;
                Ok(None)
            }
            Err(e) => {
                self.phase = Phase::Finished;
                Err(e)
            }
        }
    }
}

impl<B: Behavior> BThread for StepThread<B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn poll(&mut self, ctx: &mut UnitContext<'_>) -> UnitResult<Option<Statement>> {
        match std::mem::replace(&mut self.phase, Phase::Parked) {
            Phase::Start => self.advance(None, ctx),
            Phase::Ready(s) => Ok(Some(s)),
            Phase::Parked => Err(UnitError::Protocol("poll on a parked unit")),
            Phase::Finished => {
                self.phase = Phase::Finished;
                Ok(None)
            }
        }
    }

    fn resume(&mut self, event: &Event, ctx: &mut UnitContext<'_>) -> UnitResult<()> {
        match self.phase {
            Phase::Parked => {
                if let Some(s) = self.advance(Some(event), ctx)? {
                    self.phase = Phase::Ready(s);
                }
                Ok(())
            }
            _ => Err(UnitError::Protocol("resume on a unit that is not parked")),
        }
    }

    fn is_terminated(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }
}
