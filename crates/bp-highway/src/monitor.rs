//! Event-stream constraint monitors for the abstract overtake check.
//!
//! A concrete run reports itself through named events:
//!
//! | Event             | Payload                   | When                        |
//! |-------------------|---------------------------|-----------------------------|
//! | `POSITION_UPDATE` | `agent_relative_position` | every step                  |
//! | `STEP`            | —                         | every step                  |
//! | `SPEED_UPDATE`    | `speed`                   | every step                  |
//! | `LANE_CHANGE`     | `step`                    | the agent changed lanes     |
//! | `SPEED_UP`        | `step`                    | the agent accelerated       |
//! | `END`             | —                         | once, after the last step   |
//!
//! Every monitor waits for all events, feeds them to its [`Constraint`], and
//! renders a [`Verdict`] when `END` arrives.

use std::cell::RefCell;
use std::rc::Rc;

use bp_core::{Event, EventSet, Statement, Value};
use bp_thread::{Behavior, Pause, StepThread, UnitContext, UnitResult, thread};

use crate::OvertakeLimits;

pub const POSITION_UPDATE: &str = "POSITION_UPDATE";
pub const STEP: &str = "STEP";
pub const SPEED_UPDATE: &str = "SPEED_UPDATE";
pub const LANE_CHANGE: &str = "LANE_CHANGE";
pub const SPEED_UP: &str = "SPEED_UP";
pub const END: &str = "END";

pub const RELATIVE_POSITION_KEY: &str = "agent_relative_position";
pub const STEP_KEY: &str = "step";
pub const SPEED_KEY: &str = "speed";

const POSITION_EPSILON: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Satisfied,
    Violated(String),
}

impl Verdict {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Verdict::Satisfied)
    }
}

/// A property checked over the whole event stream.
pub trait Constraint {
    fn name(&self) -> &'static str;

    fn observe(&mut self, event: &Event);

    fn verdict(&self) -> Verdict;
}

// ── Constraints ───────────────────────────────────────────────────────────────

/// The first reported position must be the start position, and the end
/// position must be reported at some point.
pub struct PositionConstraint {
    start:       f64,
    end:         f64,
    start_valid: Option<bool>,
    end_valid:   bool,
}

impl PositionConstraint {
    pub fn new(limits: &OvertakeLimits) -> Self {
        Self {
            start:       limits.start_relative_position,
            end:         limits.end_relative_position,
            start_valid: None,
            end_valid:   false,
        }
    }
}

impl Constraint for PositionConstraint {
    fn name(&self) -> &'static str {
        "position"
    }

    fn observe(&mut self, event: &Event) {
        if !event.is(POSITION_UPDATE) {
            return;
        }
        let Some(pos) = event.get(RELATIVE_POSITION_KEY).and_then(Value::as_f64) else {
            return;
        };
        self.start_valid.get_or_insert((pos - self.start).abs() < POSITION_EPSILON);
        if (pos - self.end).abs() < POSITION_EPSILON {
            self.end_valid = true;
        }
    }

    fn verdict(&self) -> Verdict {
        if self.start_valid == Some(true) && self.end_valid {
            Verdict::Satisfied
        } else {
            Verdict::Violated(format!(
                "start position {} reached: {:?}, end position {} reached: {}",
                self.start, self.start_valid, self.end, self.end_valid
            ))
        }
    }
}

/// The number of `STEP` events must lie within `[min_steps, max_steps]`.
pub struct DurationConstraint {
    min:   u64,
    max:   u64,
    steps: u64,
}

impl DurationConstraint {
    pub fn new(limits: &OvertakeLimits) -> Self {
        Self { min: limits.min_steps, max: limits.max_steps, steps: 0 }
    }
}

impl Constraint for DurationConstraint {
    fn name(&self) -> &'static str {
        "duration"
    }

    fn observe(&mut self, event: &Event) {
        if event.is(STEP) {
            self.steps += 1;
        }
    }

    fn verdict(&self) -> Verdict {
        if (self.min..=self.max).contains(&self.steps) {
            Verdict::Satisfied
        } else {
            Verdict::Violated(format!("{} steps, expected {}..={}", self.steps, self.min, self.max))
        }
    }
}

/// Every `SPEED_UP` must follow a `LANE_CHANGE` within the action interval,
/// and at least one of each must happen.
#[derive(Default)]
pub struct ActionOrderConstraint {
    min_interval:     i64,
    max_interval:     i64,
    lane_change_step: Option<i64>,
    lane_changes:     u64,
    speed_ups:        u64,
    valid_interval:   bool,
    order_violation:  bool,
}

impl ActionOrderConstraint {
    pub fn new(limits: &OvertakeLimits) -> Self {
        Self {
            min_interval: limits.min_action_interval as i64,
            max_interval: limits.max_action_interval as i64,
            ..Self::default()
        }
    }
}

fn step_of(event: &Event) -> i64 {
    event.get(STEP_KEY).and_then(Value::as_i64).unwrap_or(0)
}

impl Constraint for ActionOrderConstraint {
    fn name(&self) -> &'static str {
        "functional action order"
    }

    fn observe(&mut self, event: &Event) {
        if event.is(LANE_CHANGE) {
            self.lane_change_step = Some(step_of(event));
            self.lane_changes += 1;
        } else if event.is(SPEED_UP) {
            match self.lane_change_step.take() {
                None => self.order_violation = true,
                Some(at) => {
                    let interval = step_of(event) - at;
                    if (self.min_interval..=self.max_interval).contains(&interval) {
                        self.valid_interval = true;
                    } else {
                        self.order_violation = true;
                    }
                }
            }
            self.speed_ups += 1;
        }
    }

    fn verdict(&self) -> Verdict {
        if self.lane_changes >= 1 && self.speed_ups >= 1 && self.valid_interval && !self.order_violation {
            Verdict::Satisfied
        } else {
            Verdict::Violated(format!(
                "lane_changes={} speed_ups={} valid_interval={} order_violation={}",
                self.lane_changes, self.speed_ups, self.valid_interval, self.order_violation
            ))
        }
    }
}

/// Every reported speed must lie within `[min_speed, max_speed]`.
pub struct SpeedLimitConstraint {
    min:        f64,
    max:        f64,
    violations: u64,
}

impl SpeedLimitConstraint {
    pub fn new(limits: &OvertakeLimits) -> Self {
        Self { min: limits.min_speed, max: limits.max_speed, violations: 0 }
    }
}

impl Constraint for SpeedLimitConstraint {
    fn name(&self) -> &'static str {
        "speed limit"
    }

    fn observe(&mut self, event: &Event) {
        if !event.is(SPEED_UPDATE) {
            return;
        }
        if let Some(speed) = event.get(SPEED_KEY).and_then(Value::as_f64) {
            if !(self.min..=self.max).contains(&speed) {
                tracing::warn!(speed, min = self.min, max = self.max, "speed out of range");
                self.violations += 1;
            }
        }
    }

    fn verdict(&self) -> Verdict {
        if self.violations == 0 {
            Verdict::Satisfied
        } else {
            Verdict::Violated(format!("{} speed updates out of range", self.violations))
        }
    }
}

// ── Monitor unit ──────────────────────────────────────────────────────────────

/// Where a monitor leaves its verdict.  Empty until `END` is seen.
#[derive(Clone, Default)]
pub struct VerdictSlot(Rc<RefCell<Option<Verdict>>>);

impl VerdictSlot {
    pub fn get(&self) -> Option<Verdict> {
        self.0.borrow().clone()
    }

    fn set(&self, verdict: Verdict) {
        *self.0.borrow_mut() = Some(verdict);
    }
}

pub struct Monitor {
    constraint: Box<dyn Constraint>,
    slot:       VerdictSlot,
}

impl Behavior for Monitor {
    fn step(&mut self, resumed: Option<&Event>, _ctx: &mut UnitContext<'_>) -> UnitResult<Pause> {
        if let Some(event) = resumed {
            if event.is(END) {
                let verdict = self.constraint.verdict();
                match &verdict {
                    Verdict::Satisfied => tracing::info!(constraint = self.constraint.name(), "satisfied"),
                    Verdict::Violated(why) => {
                        tracing::error!(constraint = self.constraint.name(), %why, "violated")
                    }
                }
                self.slot.set(verdict);
                return Ok(Pause::Done);
            }
            self.constraint.observe(event);
        }
        Ok(Pause::Sync(Statement::new().wait_for(EventSet::All)))
    }
}

/// Wrap `constraint` in a unit.  The slot is filled when `END` is selected.
pub fn monitor(constraint: impl Constraint + 'static) -> (StepThread<Monitor>, VerdictSlot) {
    let slot = VerdictSlot::default();
    let name = format!("{} constraint", constraint.name());
    let unit = thread(name, Monitor { constraint: Box::new(constraint), slot: slot.clone() });
    (unit, slot)
}

/// The four overtake constraints, in reporting order.
pub fn overtake_monitors(limits: &OvertakeLimits) -> Vec<(StepThread<Monitor>, VerdictSlot)> {
    vec![
        monitor(PositionConstraint::new(limits)),
        monitor(DurationConstraint::new(limits)),
        monitor(ActionOrderConstraint::new(limits)),
        monitor(SpeedLimitConstraint::new(limits)),
    ]
}
