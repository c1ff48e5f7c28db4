//! Keeps two controlled vehicles apart when they share a lane.

use bp_core::{Event, Expr, Statement};
use bp_thread::{Behavior, Pause, UnitContext, UnitResult};

use crate::{Action, Controlled, RoadContext, Simulator};

/// Whenever both vehicles are in one lane and the gap between them is below
/// `same_lane_gap`, makes the trailing one slow down: SLOWER is requested and
/// every other action of that vehicle is blocked, so no maneuver can outvote
/// it.  Otherwise it only lets time pass.  Finishes when the simulation does.
pub struct SafeDistanceMonitor<S> {
    road: RoadContext<S>,
    a:    Controlled,
    b:    Controlled,
}

impl<S: Simulator> SafeDistanceMonitor<S> {
    pub fn new(road: &RoadContext<S>, a: Controlled, b: Controlled) -> Self {
        Self { road: road.clone(), a, b }
    }
}

impl<S: Simulator> Behavior for SafeDistanceMonitor<S> {
    fn step(&mut self, _resumed: Option<&Event>, _ctx: &mut UnitContext<'_>) -> UnitResult<Pause> {
        if self.road.is_done() {
            return Ok(Pause::Done);
        }
        let va = self.road.vehicle(self.a.index())?;
        let vb = self.road.vehicle(self.b.index())?;
        if va.lane != vb.lane {
            return Ok(Pause::Sync(Statement::new().request(Expr::True)));
        }

        let (trailing, gap) = if va.position[0] < vb.position[0] {
            (&self.a, vb.position[0] - va.position[0])
        } else {
            (&self.b, va.position[0] - vb.position[0])
        };
        tracing::debug!(trailing = trailing.name(), gap, "same lane");
        if gap >= self.road.config().same_lane_gap {
            return Ok(Pause::Sync(Statement::new().request(Expr::True)));
        }
        tracing::info!(vehicle = trailing.name(), gap, "too close, slowing down");
        let statement = trailing.request(Action::Slower).block(!trailing.does(Action::Slower));
        Ok(Pause::Sync(statement))
    }
}
