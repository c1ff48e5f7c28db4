//! Scripted event streams for exercising the overtake monitors.

use std::collections::VecDeque;

use bp_core::{Event, Statement};
use bp_thread::{Behavior, Pause, StepThread, UnitContext, UnitResult, thread};

use crate::OvertakeLimits;
use crate::monitor::{
    END, LANE_CHANGE, POSITION_UPDATE, RELATIVE_POSITION_KEY, SPEED_KEY, SPEED_UP, SPEED_UPDATE,
    STEP, STEP_KEY,
};

/// Which run to replay.  Each invalid variant breaks exactly one constraint
/// on purpose (the short run also breaks the action interval).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScenarioKind {
    Valid,
    InvalidPosition,
    InvalidDuration,
    InvalidActionOrder,
    InvalidSpeed,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 5] = [
        ScenarioKind::Valid,
        ScenarioKind::InvalidPosition,
        ScenarioKind::InvalidDuration,
        ScenarioKind::InvalidActionOrder,
        ScenarioKind::InvalidSpeed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScenarioKind::Valid => "valid",
            ScenarioKind::InvalidPosition => "invalid_position",
            ScenarioKind::InvalidDuration => "invalid_duration",
            ScenarioKind::InvalidActionOrder => "invalid_action_order",
            ScenarioKind::InvalidSpeed => "invalid_speed",
        }
    }

    pub fn from_label(label: &str) -> Option<ScenarioKind> {
        ScenarioKind::ALL.into_iter().find(|k| k.label() == label)
    }

    /// The full event script, ending with `END`.
    pub fn script(self, limits: &OvertakeLimits) -> Vec<Event> {
        let lane_change_at = 2;
        let interval = match self {
            ScenarioKind::InvalidActionOrder => limits.min_action_interval.saturating_sub(1),
            ScenarioKind::InvalidDuration => 1,
            _ => (limits.min_action_interval + limits.max_action_interval) / 2,
        };
        let speed_up_at = lane_change_at + interval;
        let steps = match self {
            ScenarioKind::InvalidDuration => limits.min_steps / 2,
            _ => limits.max_steps,
        };
        let (start, end) = match self {
            ScenarioKind::InvalidPosition => (0.0, 0.0),
            _ => (limits.start_relative_position, limits.end_relative_position),
        };
        let speed = match self {
            ScenarioKind::InvalidSpeed => limits.max_speed + 2.2,
            _ => (limits.min_speed + limits.max_speed) / 2.0,
        };

        let position = |p: f64| Event::with_payload(POSITION_UPDATE, [(RELATIVE_POSITION_KEY, p)]);
        let mut script = vec![position(start)];
        for step in 1..=steps {
            script.push(Event::named(STEP));
            script.push(position(if step == steps { end } else { 0.0 }));
            if step == lane_change_at {
                script.push(Event::with_payload(LANE_CHANGE, [(STEP_KEY, step)]));
            }
            if step == speed_up_at {
                script.push(Event::with_payload(SPEED_UP, [(STEP_KEY, step)]));
            }
            script.push(Event::with_payload(SPEED_UPDATE, [(SPEED_KEY, speed)]));
        }
        script.push(Event::named(END));
        script
    }
}

/// Requests a fixed list of events one by one.
pub struct ScriptedScenario {
    events: VecDeque<Event>,
}

impl ScriptedScenario {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self { events: events.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl Behavior for ScriptedScenario {
    fn step(&mut self, _resumed: Option<&Event>, _ctx: &mut UnitContext<'_>) -> UnitResult<Pause> {
        Ok(match self.events.pop_front() {
            Some(e) => Pause::Sync(Statement::new().request(e)),
            None => Pause::Done,
        })
    }
}

pub fn scripted(kind: ScenarioKind, limits: &OvertakeLimits) -> StepThread<ScriptedScenario> {
    thread(format!("{} scenario", kind.label()), ScriptedScenario::new(kind.script(limits)))
}
