//! Building blocks for composing behaviors.
//!
//! | Combinator   | Pause points                                                 |
//! |--------------|--------------------------------------------------------------|
//! | [`from_fn`]  | whatever the closure yields                                  |
//! | [`once`]     | exactly one, then done                                       |
//! | [`Chain`]    | each child's pause points in order (delegation)              |
//! | [`defer`]    | those of a behavior built on first entry                     |
//! | [`fork`]     | none; spawns units for the next round, then done             |

use std::collections::VecDeque;

use bp_core::{Event, Statement};

use crate::{BThread, Behavior, Pause, UnitContext, UnitResult};

// ── from_fn ───────────────────────────────────────────────────────────────────

/// A behavior backed by a closure.
pub struct FnBehavior<F> {
    f: F,
}

/// Turn `f` into a [`Behavior`].  The closure keeps its own state by capture.
pub fn from_fn<F>(f: F) -> FnBehavior<F>
where
    F: FnMut(Option<&Event>, &mut UnitContext<'_>) -> UnitResult<Pause>,
{
    FnBehavior { f }
}

impl<F> Behavior for FnBehavior<F>
where
    F: FnMut(Option<&Event>, &mut UnitContext<'_>) -> UnitResult<Pause>,
{
    fn step(&mut self, resumed: Option<&Event>, ctx: &mut UnitContext<'_>) -> UnitResult<Pause> {
        (self.f)(resumed, ctx)
    }
}

// ── once ──────────────────────────────────────────────────────────────────────

/// Yields one statement, then finishes.
pub struct Once {
    statement: Option<Statement>,
}

pub fn once(statement: Statement) -> Once {
    Once { statement: Some(statement) }
}

impl Behavior for Once {
    fn step(&mut self, _resumed: Option<&Event>, _ctx: &mut UnitContext<'_>) -> UnitResult<Pause> {
        Ok(match self.statement.take() {
            Some(s) => Pause::Sync(s),
            None => Pause::Done,
        })
    }
}

// ── Chain ─────────────────────────────────────────────────────────────────────

/// Runs child behaviors one after another.
///
/// A child that finishes hands over to the next child within the same step,
/// and the next child starts fresh (`resumed = None`), so nesting chains is
/// invisible to the program.
#[derive(Default)]
pub struct Chain {
    parts: VecDeque<Box<dyn Behavior>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, part: impl Behavior + 'static) -> Self {
        self.parts.push_back(Box::new(part));
        self
    }

    /// Number of children not yet finished.
    pub fn remaining(&self) -> usize {
        self.parts.len()
    }
}

impl Behavior for Chain {
    fn step(&mut self, resumed: Option<&Event>, ctx: &mut UnitContext<'_>) -> UnitResult<Pause> {
        let mut resumed = resumed;
        while let Some(part) = self.parts.front_mut() {
            match part.step(resumed, ctx)? {
                Pause::Sync(s) => return Ok(Pause::Sync(s)),
                Pause::Done => {
                    self.parts.pop_front();
                    resumed = None;
                }
            }
        }
        Ok(Pause::Done)
    }
}

// ── defer ─────────────────────────────────────────────────────────────────────

enum DeferState<F> {
    Pending(F),
    Running(Box<dyn Behavior>),
    Spent,
}

/// A behavior built lazily on first entry.
///
/// Lets a chain capture runtime values at the moment a phase starts, e.g. the
/// lane a leader is in once the follower has fallen behind it.
pub struct Deferred<F> {
    state: DeferState<F>,
}

pub fn defer<F>(build: F) -> Deferred<F>
where
    F: FnOnce(&mut UnitContext<'_>) -> UnitResult<Box<dyn Behavior>>,
{
    Deferred { state: DeferState::Pending(build) }
}

impl<F> Behavior for Deferred<F>
where
    F: FnOnce(&mut UnitContext<'_>) -> UnitResult<Box<dyn Behavior>>,
{
    fn step(&mut self, resumed: Option<&Event>, ctx: &mut UnitContext<'_>) -> UnitResult<Pause> {
        if let DeferState::Pending(_) = self.state {
            if let DeferState::Pending(build) = std::mem::replace(&mut self.state, DeferState::Spent) {
                self.state = DeferState::Running(build(ctx)?);
            }
        }
        match &mut self.state {
            DeferState::Running(inner) => inner.step(resumed, ctx),
            _ => Ok(Pause::Done),
        }
    }
}

// ── fork ──────────────────────────────────────────────────────────────────────

/// Spawns a set of units, then finishes without pausing.
pub struct Fork {
    threads: Vec<Box<dyn BThread>>,
}

/// "Run these concurrently": the units join the program at the next round
/// boundary.
pub fn fork(threads: Vec<Box<dyn BThread>>) -> Fork {
    Fork { threads }
}

impl Behavior for Fork {
    fn step(&mut self, _resumed: Option<&Event>, ctx: &mut UnitContext<'_>) -> UnitResult<Pause> {
        for t in self.threads.drain(..) {
            ctx.spawn_boxed(t);
        }
        Ok(Pause::Done)
    }
}
