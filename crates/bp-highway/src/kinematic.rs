//! `KinematicHighway` — a straight multi-lane road with point-mass vehicles.
//!
//! Each step applies one meta-action per controlled vehicle, then moves every
//! vehicle `speed * step_secs` metres along `x`.  Lane changes complete within
//! the step.  Uncontrolled vehicles keep lane and speed.

use crate::{Action, HighwayConfig, HighwayError, HighwayResult, Simulator, Vehicle, VehicleState};

pub struct KinematicHighway {
    config:     HighwayConfig,
    vehicles:   Vec<VehicleState>,
    controlled: usize,
    steps:      u64,
    crashed:    bool,
}

impl KinematicHighway {
    pub fn new(config: HighwayConfig) -> HighwayResult<Self> {
        if config.lanes == 0 {
            return Err(HighwayError::Config("lanes must be > 0".into()));
        }
        if config.step_secs <= 0.0 {
            return Err(HighwayError::Config("step_secs must be > 0".into()));
        }
        if config.min_speed > config.max_speed {
            return Err(HighwayError::Config("min_speed must be <= max_speed".into()));
        }
        Ok(Self { config, vehicles: Vec::new(), controlled: 0, steps: 0, crashed: false })
    }

    /// Add a vehicle driven by actions.  Returns its index.
    ///
    /// Controlled vehicles must be added before any traffic so that indices
    /// stay stable.
    pub fn add_controlled(&mut self, name: &str, x: f64, lane: usize, speed: f64) -> HighwayResult<usize> {
        if self.vehicles.len() > self.controlled {
            return Err(HighwayError::Config("add controlled vehicles before traffic".into()));
        }
        let state = self.place(name, x, lane, speed)?;
        self.vehicles.push(state);
        self.controlled += 1;
        Ok(self.controlled - 1)
    }

    /// Add an uncontrolled vehicle that cruises in its lane.  Returns its
    /// index.
    pub fn add_traffic(&mut self, name: &str, x: f64, lane: usize, speed: f64) -> HighwayResult<usize> {
        let state = self.place(name, x, lane, speed)?;
        self.vehicles.push(state);
        Ok(self.vehicles.len() - 1)
    }

    pub fn config(&self) -> &HighwayConfig {
        &self.config
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn crashed(&self) -> bool {
        self.crashed
    }

    fn place(&self, name: &str, x: f64, lane: usize, speed: f64) -> HighwayResult<VehicleState> {
        if lane >= self.config.lanes {
            return Err(HighwayError::Config(format!(
                "lane {lane} out of range (road has {} lanes)",
                self.config.lanes
            )));
        }
        let speed = speed.clamp(self.config.min_speed, self.config.max_speed);
        Ok(VehicleState::new(name, x, lane, speed, self.config.lane_width))
    }

    fn apply(&self, v: &mut VehicleState, action: Action) {
        let cfg = &self.config;
        match action {
            Action::LaneLeft => v.lane = v.lane.saturating_sub(1),
            Action::LaneRight => v.lane = (v.lane + 1).min(cfg.lanes - 1),
            Action::Faster => v.speed = (v.speed + cfg.speed_step).min(cfg.max_speed),
            Action::Slower => v.speed = (v.speed - cfg.speed_step).max(cfg.min_speed),
            Action::Idle => {}
        }
        v.position[0] += v.speed * cfg.step_secs;
        v.position[1] = v.lane as f64 * cfg.lane_width;
    }

    fn detect_crash(&self) -> bool {
        self.vehicles.iter().enumerate().any(|(i, a)| {
            self.vehicles[i + 1..].iter().any(|b| {
                a.lane_index() == b.lane_index()
                    && (a.position()[0] - b.position()[0]).abs() < self.config.vehicle_length
            })
        })
    }
}

impl Simulator for KinematicHighway {
    fn vehicles(&self) -> &[VehicleState] {
        &self.vehicles
    }

    fn controlled(&self) -> usize {
        self.controlled
    }

    fn step(&mut self, actions: &[Action]) -> HighwayResult<()> {
        if actions.len() != self.controlled {
            return Err(HighwayError::ActionCount { expected: self.controlled, got: actions.len() });
        }
        if self.is_done() {
            return Ok(());
        }

        let mut vehicles = std::mem::take(&mut self.vehicles);
        for (i, v) in vehicles.iter_mut().enumerate() {
            self.apply(v, actions.get(i).copied().unwrap_or(Action::Idle));
        }
        self.vehicles = vehicles;
        self.steps += 1;

        if self.detect_crash() {
            tracing::warn!(step = self.steps, "collision");
            self.crashed = true;
        }
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.crashed || self.steps >= self.config.max_steps
    }
}
