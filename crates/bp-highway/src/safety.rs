//! Safety predicates over a set of vehicles.
//!
//! Both checks use a Euclidean radius: a vehicle counts as in the way if it
//! is in the lane of interest and closer than `safe_distance`, ahead or
//! behind.

use crate::{Vehicle, VehicleState};

/// `true` if no other vehicle in `target_lane` is within `safe_distance` of
/// vehicle `me`.
pub fn is_safe_to_change_lane(
    vehicles:      &[VehicleState],
    me:            usize,
    target_lane:   usize,
    safe_distance: f64,
) -> bool {
    let Some(v) = vehicles.get(me) else {
        return false;
    };
    vehicles
        .iter()
        .enumerate()
        .filter(|(i, other)| *i != me && other.lane_index() == target_lane)
        .all(|(_, other)| v.distance_to(other) >= safe_distance)
}

/// `true` if no other vehicle in `me`'s own lane is within `safe_distance`.
pub fn is_safe_to_accelerate(vehicles: &[VehicleState], me: usize, safe_distance: f64) -> bool {
    vehicles
        .get(me)
        .is_some_and(|v| is_safe_to_change_lane(vehicles, me, v.lane_index(), safe_distance))
}
