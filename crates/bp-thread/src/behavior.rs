//! The `Behavior` trait, the main extension point for user code.

use bp_core::{Event, Statement};

use crate::{UnitContext, UnitResult};

/// Outcome of one [`Behavior::step`].
#[derive(Debug, Clone)]
pub enum Pause {
    /// Park on this statement until the program resumes the unit.
    Sync(Statement),
    /// No more pause points.
    Done,
}

/// A resumable sequence of pause points written as a state machine.
///
/// `step` is called with `None` on first entry and afterwards with the event
/// the program selected from the previous statement.  It runs the unit's
/// body up to the next pause point.  Local state (phase counters, captured
/// lanes, …) lives in `self` and is owned exclusively by the unit.
///
/// # Example
///
/// ```rust,ignore
/// struct CountTo { n: u32, left: u32 }
///
/// impl Behavior for CountTo {
///     fn step(&mut self, _resumed: Option<&Event>, _ctx: &mut UnitContext<'_>) -> UnitResult<Pause> {
///         if self.left == 0 {
///             return Ok(Pause::Done);
///         }
///         self.left -= 1;
///         Ok(Pause::Sync(Statement::new().request(Event::named("TICK"))))
///     }
/// }
/// ```
pub trait Behavior {
    fn step(&mut self, resumed: Option<&Event>, ctx: &mut UnitContext<'_>) -> UnitResult<Pause>;
}

impl<B: Behavior + ?Sized> Behavior for Box<B> {
    fn step(&mut self, resumed: Option<&Event>, ctx: &mut UnitContext<'_>) -> UnitResult<Pause> {
        (**self).step(resumed, ctx)
    }
}
