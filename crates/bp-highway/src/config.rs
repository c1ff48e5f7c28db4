//! Tunables for maneuvers, monitors and the kinematic simulator.

use crate::{HighwayError, HighwayResult};

/// Distances in metres, speeds in m/s, durations in seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ManeuverConfig {
    /// Simulator steps per second; converts step counts to seconds.
    pub simulation_frequency:  u32,
    /// Radius around a vehicle that must be free before a lane change or an
    /// acceleration.
    pub safe_distance:         f64,
    /// Gap `fall_behind` opens before the follower may change lanes.
    pub fall_behind_distance:  f64,
    /// Gap `close_distance` closes down to.
    pub close_distance:        f64,
    /// Speed band that decides between FASTER, SLOWER and IDLE.
    pub speed_margin:          f64,
    /// Speeds closer than this count as equal.
    pub speed_tolerance:       f64,
    /// Minimum gap between two controlled vehicles sharing a lane.
    pub same_lane_gap:         f64,
    /// How far ahead of the overtaken vehicle to get before pulling back in.
    pub pass_margin:           f64,
    /// Pause between overtake phases.
    pub wait_after_phase_secs: f64,
}

impl Default for ManeuverConfig {
    fn default() -> Self {
        Self {
            simulation_frequency:  20,
            safe_distance:         10.0,
            fall_behind_distance:  25.0,
            close_distance:        25.0,
            speed_margin:          2.0,
            speed_tolerance:       0.1,
            same_lane_gap:         15.0,
            pass_margin:           10.0,
            wait_after_phase_secs: 0.5,
        }
    }
}

impl ManeuverConfig {
    /// Rejects settings that would make step/second conversion meaningless.
    pub fn validate(&self) -> HighwayResult<()> {
        if self.simulation_frequency == 0 {
            return Err(HighwayError::Config("simulation_frequency must be > 0".into()));
        }
        Ok(())
    }

    pub fn seconds(&self, steps: u64) -> f64 {
        steps as f64 / f64::from(self.simulation_frequency)
    }

    pub fn steps(&self, seconds: f64) -> u64 {
        (seconds * f64::from(self.simulation_frequency)) as u64
    }
}

/// Acceptance window of the abstract overtake check.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OvertakeLimits {
    pub min_steps:               u64,
    pub max_steps:               u64,
    /// Relative position (to the overtaken vehicle) the agent starts at.
    pub start_relative_position: f64,
    /// Relative position the agent ends at.
    pub end_relative_position:   f64,
    /// Allowed step distance between a lane change and the following speed-up.
    pub min_action_interval:     u64,
    pub max_action_interval:     u64,
    pub min_speed:               f64,
    pub max_speed:               f64,
}

impl Default for OvertakeLimits {
    fn default() -> Self {
        Self {
            min_steps:               10,
            max_steps:               40,
            start_relative_position: -50.0,
            end_relative_position:   50.0,
            min_action_interval:     10,
            max_action_interval:     30,
            min_speed:               13.9,
            max_speed:               27.8,
        }
    }
}

/// Geometry and dynamics of [`KinematicHighway`][crate::KinematicHighway].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HighwayConfig {
    pub lanes:          usize,
    pub lane_width:     f64,
    /// Seconds advanced per step.
    pub step_secs:      f64,
    /// Speed change per FASTER/SLOWER.
    pub speed_step:     f64,
    pub min_speed:      f64,
    pub max_speed:      f64,
    /// Bumper-to-bumper distance under which two vehicles in one lane crash.
    pub vehicle_length: f64,
    /// The episode ends after this many steps.
    pub max_steps:      u64,
}

impl Default for HighwayConfig {
    fn default() -> Self {
        Self {
            lanes:          3,
            lane_width:     4.0,
            step_secs:      0.05,
            speed_step:     1.0,
            min_speed:      0.0,
            max_speed:      40.0,
            vehicle_length: 5.0,
            max_steps:      20_000,
        }
    }
}
