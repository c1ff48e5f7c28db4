//! Maneuver behaviors for controlled vehicles.
//!
//! Each maneuver re-reads the road at every pause point and requests one
//! action for its vehicle.  Composite maneuvers are plain [`Chain`]s of the
//! smaller ones; phases that depend on where the vehicles are when the phase
//! starts are built with [`defer`].
//!
//! | Maneuver               | Ends when                                              |
//! |------------------------|--------------------------------------------------------|
//! | [`wait_seconds`]       | the given time has passed                              |
//! | [`fall_behind`]        | the vehicle is `fall_behind_distance` behind the other |
//! | [`change_to_same_lane`]| the vehicle is in the target lane                      |
//! | [`close_distance`]     | the gap is down to `close_distance`                    |
//! | [`equalize_speeds`]    | speeds match within `speed_tolerance`                  |
//! | [`get_behind`]         | all four of the above, in order                        |
//! | [`overtake`]           | the vehicle is back in its lane ahead of the other     |
//! | [`idle_lock`]          | never                                                  |
//!
//! Every maneuver also ends as soon as the simulation is done, whatever
//! phase it is in.
//!
//! The driver must be admitted before any maneuver so that a maneuver
//! resumed in the same round already sees the stepped simulator.

use std::cell::Cell;
use std::rc::Rc;

use bp_core::{Event, Expr, Statement};
use bp_thread::{Behavior, Chain, Pause, UnitContext, UnitResult, defer, from_fn, once};

use crate::{Action, Controlled, RoadContext, Simulator, Vehicle, VehicleRef};

fn drive(me: &Controlled, action: Action) -> UnitResult<Pause> {
    Ok(Pause::Sync(me.request(action)))
}

/// Let one step pass without asking for anything in particular.
fn pass_time() -> Pause {
    Pause::Sync(Statement::new().request(Expr::True))
}

/// Logs `message` and finishes without pausing.
pub fn announce(message: impl Into<String>) -> impl Behavior {
    let message = message.into();
    from_fn(move |_, _| {
        tracing::info!("{message}");
        Ok(Pause::Done)
    })
}

/// Optional time budget of a phase, started on its first step.
struct Budget {
    limit: Option<f64>,
    start: Option<u64>,
}

impl Budget {
    fn new(limit: Option<f64>) -> Self {
        Self { limit, start: None }
    }

    fn expired<S: Simulator>(&mut self, road: &RoadContext<S>) -> bool {
        match self.start {
            None => {
                self.start = Some(road.steps());
                false
            }
            Some(t0) => self.limit.is_some_and(|limit| road.seconds_since(t0) >= limit),
        }
    }
}

/// Runs `inner` until it finishes or the simulation is done.
pub struct WhileRunning<S, B> {
    road:  RoadContext<S>,
    inner: B,
}

pub fn while_running<S: Simulator, B: Behavior>(road: &RoadContext<S>, inner: B) -> WhileRunning<S, B> {
    WhileRunning { road: road.clone(), inner }
}

impl<S: Simulator, B: Behavior> Behavior for WhileRunning<S, B> {
    fn step(&mut self, resumed: Option<&Event>, ctx: &mut UnitContext<'_>) -> UnitResult<Pause> {
        if self.road.is_done() {
            return Ok(Pause::Done);
        }
        self.inner.step(resumed, ctx)
    }
}

// ── Timing ────────────────────────────────────────────────────────────────────

pub fn wait_seconds<S: Simulator + 'static>(road: &RoadContext<S>, secs: f64) -> impl Behavior + use<S> {
    let clock = road.clone();
    let mut target = None;
    while_running(
        road,
        from_fn(move |_, _| {
            let until = *target.get_or_insert_with(|| clock.steps() + clock.config().steps(secs));
            Ok(if clock.steps() < until { pass_time() } else { Pause::Done })
        }),
    )
}

/// Requests IDLE for as long as the simulation runs.
pub fn idle_lock<S: Simulator + 'static>(road: &RoadContext<S>, me: &Controlled) -> impl Behavior + use<S> {
    let me = me.clone();
    while_running(road, from_fn(move |_, _| drive(&me, Action::Idle)))
}

// ── Gap keeping ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Gap {
    Open,
    Close,
}

impl Gap {
    fn label(self) -> &'static str {
        match self {
            Gap::Open => "fall_behind",
            Gap::Close => "close_distance",
        }
    }
}

fn keep_gap<S: Simulator + 'static>(
    road:         &RoadContext<S>,
    me:           &Controlled,
    front:        &VehicleRef,
    gap:          Gap,
    max_duration: Option<f64>,
) -> impl Behavior + use<S> {
    let running = road.clone();
    let (road, me, front) = (road.clone(), me.clone(), front.clone());
    let mut budget = Budget::new(max_duration);
    let mut settled = false;
    let body = from_fn(move |_, _| {
        if settled {
            return Ok(Pause::Done);
        }
        let cfg = road.config();
        let v = road.vehicle(me.index())?;
        let f = road.vehicle(front.index)?;
        let expired = budget.expired(&road);
        let active = match gap {
            Gap::Open => !v.is_behind(&f, cfg.fall_behind_distance),
            Gap::Close => v.is_behind(&f, cfg.close_distance),
        };
        if active && !expired {
            tracing::debug!(
                maneuver = gap.label(),
                vehicle = me.name(),
                speed = v.speed,
                front = %front.name,
                front_speed = f.speed,
                "adjusting gap"
            );
            let too_fast = v.speed + cfg.speed_margin > f.speed;
            let too_slow = v.speed - cfg.speed_margin < f.speed;
            let action = match gap {
                Gap::Open if too_fast => Action::Slower,
                Gap::Open if too_slow => Action::Faster,
                Gap::Close if too_slow => Action::Faster,
                Gap::Close if too_fast => Action::Slower,
                _ => Action::Idle,
            };
            if action == Action::Faster && !road.is_safe_to_accelerate(me.index()) {
                tracing::info!(maneuver = gap.label(), vehicle = me.name(), "not safe to accelerate");
                return drive(&me, Action::Idle);
            }
            return drive(&me, action);
        }
        if expired {
            tracing::warn!(maneuver = gap.label(), vehicle = me.name(), "timed interrupt");
        }
        settled = true;
        drive(&me, Action::Idle)
    });
    while_running(&running, body)
}

/// Drop back until `me` is `fall_behind_distance` behind `front`.
pub fn fall_behind<S: Simulator + 'static>(
    road:         &RoadContext<S>,
    me:           &Controlled,
    front:        &VehicleRef,
    max_duration: Option<f64>,
) -> impl Behavior + use<S> {
    keep_gap(road, me, front, Gap::Open, max_duration)
}

/// Catch up until `me` is no more than `close_distance` behind `front`.
pub fn close_distance<S: Simulator + 'static>(
    road:         &RoadContext<S>,
    me:           &Controlled,
    front:        &VehicleRef,
    max_duration: Option<f64>,
) -> impl Behavior + use<S> {
    keep_gap(road, me, front, Gap::Close, max_duration)
}

pub fn equalize_speeds<S: Simulator + 'static>(
    road:  &RoadContext<S>,
    me:    &Controlled,
    other: &VehicleRef,
) -> impl Behavior + use<S> {
    let running = road.clone();
    let (road, me, other) = (road.clone(), me.clone(), other.clone());
    let mut settled = false;
    let body = from_fn(move |_, _| {
        if settled {
            return Ok(Pause::Done);
        }
        let v = road.vehicle(me.index())?;
        let o = road.vehicle(other.index)?;
        if (v.speed - o.speed).abs() <= road.config().speed_tolerance {
            settled = true;
            return drive(&me, Action::Idle);
        }
        tracing::debug!(
            maneuver = "equalize_speeds",
            vehicle = me.name(),
            speed = v.speed,
            other_speed = o.speed,
            "adjusting speed"
        );
        if v.speed > o.speed {
            drive(&me, Action::Slower)
        } else if road.is_safe_to_accelerate(me.index()) {
            drive(&me, Action::Faster)
        } else {
            tracing::info!(maneuver = "equalize_speeds", vehicle = me.name(), "not safe to accelerate");
            drive(&me, Action::Idle)
        }
    });
    while_running(&running, body)
}

// ── Lanes ─────────────────────────────────────────────────────────────────────

/// Move lane by lane to `target_lane`, idling one step after every change.
///
/// A change is only requested while the next lane is clear; otherwise the
/// vehicle idles and tries again.
pub fn change_to_same_lane<S: Simulator + 'static>(
    road:        &RoadContext<S>,
    me:          &Controlled,
    target_lane: usize,
) -> impl Behavior + use<S> {
    let running = road.clone();
    let (road, me) = (road.clone(), me.clone());
    let mut settling = false;
    let mut settled = false;
    let body = from_fn(move |_, _| {
        if settled {
            return Ok(Pause::Done);
        }
        if settling {
            settling = false;
            return drive(&me, Action::Idle);
        }
        let lane = road.vehicle(me.index())?.lane;
        if lane == target_lane {
            settled = true;
            return drive(&me, Action::Idle);
        }
        let (action, next) =
            if lane > target_lane { (Action::LaneLeft, lane - 1) } else { (Action::LaneRight, lane + 1) };
        tracing::debug!(maneuver = "change_to_same_lane", vehicle = me.name(), lane, target_lane, "changing lane");
        if road.is_safe_to_change_lane(me.index(), next) {
            settling = true;
            drive(&me, action)
        } else {
            tracing::info!(vehicle = me.name(), lane = next, "not safe to change lane");
            drive(&me, Action::Idle)
        }
    });
    while_running(&running, body)
}

// ── Composite maneuvers ───────────────────────────────────────────────────────

/// Fall behind `front`, move into its lane, close up, and match its speed.
///
/// The lane is the one `front` is in once the follower has fallen behind.
pub fn get_behind<S: Simulator + 'static>(
    road:  &RoadContext<S>,
    me:    &Controlled,
    front: &VehicleRef,
) -> impl Behavior + use<S> {
    let lane_phase = {
        let (road, me, front) = (road.clone(), me.clone(), front.clone());
        defer(move |_| {
            let lane = road.vehicle(front.index)?.lane;
            tracing::info!(vehicle = me.name(), target_lane = lane, "get_behind: changing lane");
            Ok(Box::new(change_to_same_lane(&road, &me, lane)) as Box<dyn Behavior>)
        })
    };
    let phases = Chain::new()
        .then(announce(format!("get_behind: {} starting to get behind {}", me.name(), front.name)))
        .then(fall_behind(road, me, front, None))
        .then(lane_phase)
        .then(close_distance(road, me, front, None))
        .then(equalize_speeds(road, me, front))
        .then(announce(format!("get_behind: {} is behind {}", me.name(), front.name)));
    while_running(road, phases)
}

/// Position behind `other`, pull out, pass it, pull back in, match speed.
pub fn overtake<S: Simulator + 'static>(
    road:  &RoadContext<S>,
    me:    &Controlled,
    other: &VehicleRef,
) -> impl Behavior + use<S> {
    let original_lane = Rc::new(Cell::new(0usize));
    let pause = road.config().wait_after_phase_secs;

    let pull_out = {
        let (road, me, original_lane) = (road.clone(), me.clone(), original_lane.clone());
        defer(move |_| {
            let lane = road.vehicle(me.index())?.lane;
            original_lane.set(lane);
            let (action, next) =
                if lane > 0 { (Action::LaneLeft, lane - 1) } else { (Action::LaneRight, lane + 1) };
            tracing::info!(vehicle = me.name(), original_lane = lane, "overtake: pulling out");
            if road.is_safe_to_change_lane(me.index(), next) {
                Ok(Box::new(once(me.request(action))) as Box<dyn Behavior>)
            } else {
                tracing::info!(vehicle = me.name(), lane = next, "not safe to pull out");
                Ok(Box::new(Chain::new()) as Box<dyn Behavior>)
            }
        })
    };

    let pass = {
        let (road, me, other) = (road.clone(), me.clone(), other.clone());
        from_fn(move |_, _| {
            let v = road.vehicle(me.index())?;
            let o = road.vehicle(other.index)?;
            if v.position()[0] > o.position()[0] + road.config().pass_margin {
                return Ok(Pause::Done);
            }
            tracing::debug!(vehicle = me.name(), x = v.position()[0], other_x = o.position()[0], "overtake: passing");
            if road.is_safe_to_accelerate(me.index()) {
                drive(&me, Action::Faster)
            } else {
                tracing::info!(vehicle = me.name(), "not safe to accelerate while passing");
                drive(&me, Action::Idle)
            }
        })
    };

    let pull_in = {
        let (road, me) = (road.clone(), me.clone());
        defer(move |_| {
            tracing::info!(vehicle = me.name(), lane = original_lane.get(), "overtake: pulling back in");
            Ok(Box::new(change_to_same_lane(&road, &me, original_lane.get())) as Box<dyn Behavior>)
        })
    };

    let phases = Chain::new()
        .then(announce(format!("{}: starting overtaking maneuver", me.name())))
        .then(get_behind(road, me, other))
        .then(wait_seconds(road, pause))
        .then(pull_out)
        .then(wait_seconds(road, pause))
        .then(pass)
        .then(pull_in)
        .then(equalize_speeds(road, me, other))
        .then(once(me.request(Action::Idle)))
        .then(announce(format!("{}: overtaking maneuver completed", me.name())));
    while_running(road, phases)
}
