//! The unit that steps the simulator.

use bp_core::{Event, Expr, Statement};
use bp_thread::{Behavior, Pause, UnitContext, UnitError, UnitResult};

use crate::{Action, Controlled, RoadContext, Simulator};

/// Waits for every joint action, applies it to the simulator and advances
/// the shared step counter.  Finishes once the simulator reports done.
///
/// It is the only writer of the [`RoadContext`]; admit it before any
/// maneuver.
pub struct SimulatorDriver<S> {
    road:       RoadContext<S>,
    controlled: Vec<Controlled>,
}

impl<S: Simulator> SimulatorDriver<S> {
    /// `controlled` must list the vehicles in the simulator's control order.
    pub fn new(road: &RoadContext<S>, controlled: Vec<Controlled>) -> Self {
        Self { road: road.clone(), controlled }
    }

    fn actions(&self, event: &Event) -> UnitResult<Vec<Action>> {
        let assignment = event.assignment().ok_or_else(|| UnitError::UnexpectedEvent {
            expected: "a joint action".into(),
            got:      event.to_string(),
        })?;
        Ok(self.controlled.iter().map(|c| Action::from_symbol(assignment.get(c.var()))).collect())
    }
}

impl<S: Simulator> Behavior for SimulatorDriver<S> {
    fn step(&mut self, resumed: Option<&Event>, _ctx: &mut UnitContext<'_>) -> UnitResult<Pause> {
        if let Some(event) = resumed {
            let actions = self.actions(event)?;
            tracing::debug!(step = self.road.steps(), ?actions, "driving");
            self.road.advance(&actions)?;
        }
        if self.road.is_done() {
            tracing::info!(steps = self.road.steps(), "simulation done");
            return Ok(Pause::Done);
        }
        Ok(Pause::Sync(Statement::new().wait_for(Expr::True)))
    }
}
