//! Per-call context handed to units by the program.

use bp_core::{Round, UnitId};

use crate::BThread;

/// What a unit may see of, and do to, the program while it runs one step.
///
/// The only write access is [`spawn`][Self::spawn]: new units go to a pending
/// queue that the program flushes at the next round boundary, so a unit
/// spawned mid-round is first polled in the following round.
pub struct UnitContext<'a> {
    unit:    UnitId,
    round:   Round,
    spawned: &'a mut Vec<Box<dyn BThread>>,
}

impl<'a> UnitContext<'a> {
    pub fn new(unit: UnitId, round: Round, spawned: &'a mut Vec<Box<dyn BThread>>) -> Self {
        Self { unit, round, spawned }
    }

    /// The unit currently running.
    #[inline]
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    /// The round in progress.
    #[inline]
    pub fn round(&self) -> Round {
        self.round
    }

    /// Queue `thread` for admission at the next round boundary.
    pub fn spawn(&mut self, thread: impl BThread + 'static) {
        self.spawned.push(Box::new(thread));
    }

    pub fn spawn_boxed(&mut self, thread: Box<dyn BThread>) {
        self.spawned.push(thread);
    }

    /// Units queued so far during this call chain.
    pub fn pending_spawns(&self) -> usize {
        self.spawned.len()
    }
}
