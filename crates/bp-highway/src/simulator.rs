//! The simulator collaborator.

use crate::{Action, HighwayError, HighwayResult, VehicleState};

/// A stepped traffic simulator.
///
/// Controlled vehicles come first in [`vehicles`][Self::vehicles]; `step`
/// takes one action per controlled vehicle in that order.
pub trait Simulator {
    fn vehicles(&self) -> &[VehicleState];

    /// Number of controlled vehicles.
    fn controlled(&self) -> usize;

    /// Advance one step.
    fn step(&mut self, actions: &[Action]) -> HighwayResult<()>;

    /// The episode is over; further steps have no effect.
    fn is_done(&self) -> bool;

    fn vehicle(&self, index: usize) -> HighwayResult<&VehicleState> {
        self.vehicles().get(index).ok_or(HighwayError::UnknownVehicle(index))
    }
}
