//! Unit tests for bp-highway.

use bp_core::Vocabulary;
use bp_program::{Completion, NoopObserver, Program, ProgramBuilder, ProgramConfig, RunOutcome};
use bp_select::{EnumerativeStrategy, SymbolicStrategy};
use bp_thread::{Behavior, Pause, from_fn, thread};

use crate::{
    Action, Controlled, HighwayConfig, KinematicHighway, ManeuverConfig, RoadContext, Simulator,
    SimulatorDriver, VehicleRef, VehicleState,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn highway() -> KinematicHighway {
    KinematicHighway::new(HighwayConfig::default()).unwrap()
}

/// One controlled vehicle `v1` plus the traffic built by `traffic`.
fn single(
    v1: (f64, usize, f64),
    traffic: &[(&str, f64, usize, f64)],
) -> (Vocabulary, Controlled, RoadContext<KinematicHighway>) {
    let mut sim = highway();
    sim.add_controlled("v1", v1.0, v1.1, v1.2).unwrap();
    for (name, x, lane, speed) in traffic {
        sim.add_traffic(name, *x, *lane, *speed).unwrap();
    }
    let mut vocab = Vocabulary::new();
    let c = Controlled::declare(&mut vocab, 0, "v1").unwrap();
    (vocab, c, RoadContext::new(sim, ManeuverConfig::default()).unwrap())
}

/// Driver first, then the maneuver under test.
fn program(
    vocab: Vocabulary,
    road: &RoadContext<KinematicHighway>,
    controlled: Vec<Controlled>,
    maneuver: impl Behavior + 'static,
    max_rounds: u64,
) -> Program<SymbolicStrategy> {
    ProgramBuilder::new(SymbolicStrategy::new(vocab))
        .config(ProgramConfig::default().max_rounds(max_rounds))
        .unit(thread("driver", SimulatorDriver::new(road, controlled)))
        .unit(thread("maneuver", maneuver))
        .build()
        .unwrap()
}

// ── Actions ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod action_tests {
    use bp_core::Symbol;

    use super::*;

    #[test]
    fn indices_follow_simulator_order() {
        let idx: Vec<usize> = Action::ALL.iter().map(|a| a.index()).collect();
        assert_eq!(idx, [0, 1, 2, 3, 4]);
        assert_eq!(Action::DOMAIN[0], Action::Idle);
    }

    #[test]
    fn labels_map_back() {
        for a in Action::ALL {
            assert_eq!(Action::from_label(a.label()), Some(a));
        }
        assert_eq!(Action::from_symbol(Some(&Symbol::new("FASTER"))), Action::Faster);
        assert_eq!(Action::from_symbol(Some(&Symbol::new("HONK"))), Action::Idle);
        assert_eq!(Action::from_symbol(None), Action::Idle);
    }
}

// ── Kinematic simulator ───────────────────────────────────────────────────────

#[cfg(test)]
mod kinematic_tests {
    use super::*;
    use crate::HighwayError;

    #[test]
    fn actions_move_and_clamp() {
        let mut sim = highway();
        sim.add_controlled("a", 0.0, 0, 20.0).unwrap();
        sim.step(&[Action::LaneLeft]).unwrap();
        assert_eq!(sim.vehicles()[0].lane, 0);
        sim.step(&[Action::LaneRight]).unwrap();
        sim.step(&[Action::LaneRight]).unwrap();
        sim.step(&[Action::LaneRight]).unwrap();
        assert_eq!(sim.vehicles()[0].lane, 2);
        assert_eq!(sim.vehicles()[0].position[1], 8.0);

        sim.step(&[Action::Faster]).unwrap();
        assert_eq!(sim.vehicles()[0].speed, 21.0);
        // 4 steps at 20 m/s, 1 at 21 m/s.
        assert!((sim.vehicles()[0].position[0] - 5.05).abs() < 1e-9);
        assert_eq!(sim.steps(), 5);
    }

    #[test]
    fn traffic_cruises() {
        let mut sim = highway();
        sim.add_controlled("a", 0.0, 0, 20.0).unwrap();
        sim.add_traffic("t", 100.0, 1, 10.0).unwrap();
        sim.step(&[Action::Slower]).unwrap();
        assert_eq!(sim.vehicles()[1].speed, 10.0);
        assert!((sim.vehicles()[1].position[0] - 100.5).abs() < 1e-9);
    }

    #[test]
    fn same_lane_overlap_is_a_crash() {
        let mut sim = highway();
        sim.add_controlled("a", 0.0, 1, 30.0).unwrap();
        sim.add_traffic("t", 6.0, 1, 0.0).unwrap();
        assert!(!sim.is_done());
        sim.step(&[Action::Idle]).unwrap();
        assert!(sim.crashed());
        assert!(sim.is_done());
    }

    #[test]
    fn rejects_bad_input() {
        let mut sim = highway();
        assert!(matches!(sim.add_controlled("a", 0.0, 7, 20.0), Err(HighwayError::Config(_))));
        sim.add_controlled("a", 0.0, 0, 20.0).unwrap();
        sim.add_traffic("t", 50.0, 0, 20.0).unwrap();
        assert!(sim.add_controlled("b", 0.0, 1, 20.0).is_err());
        assert!(matches!(
            sim.step(&[]),
            Err(HighwayError::ActionCount { expected: 1, got: 0 })
        ));
        let zero_lanes = HighwayConfig { lanes: 0, ..HighwayConfig::default() };
        assert!(KinematicHighway::new(zero_lanes).is_err());
    }

    #[test]
    fn road_rejects_zero_frequency() {
        let frozen = ManeuverConfig { simulation_frequency: 0, ..ManeuverConfig::default() };
        assert!(matches!(frozen.validate(), Err(HighwayError::Config(_))));
        assert!(matches!(RoadContext::new(highway(), frozen), Err(HighwayError::Config(_))));
        assert!(RoadContext::new(highway(), ManeuverConfig::default()).is_ok());
    }
}

// ── Safety predicates ─────────────────────────────────────────────────────────

#[cfg(test)]
mod safety_tests {
    use super::*;
    use crate::safety::{is_safe_to_accelerate, is_safe_to_change_lane};

    fn at(name: &str, x: f64, lane: usize) -> VehicleState {
        VehicleState::new(name, x, lane, 20.0, 4.0)
    }

    #[test]
    fn lane_change_needs_a_clear_radius() {
        let vehicles = [at("me", 0.0, 1), at("near", 5.0, 0), at("far", 40.0, 2)];
        assert!(!is_safe_to_change_lane(&vehicles, 0, 0, 10.0));
        assert!(is_safe_to_change_lane(&vehicles, 0, 2, 10.0));
    }

    #[test]
    fn radius_is_euclidean() {
        // dx = 9, dy = 4 → 9.85 < 10; dx = 10 → 10.77.
        let close = [at("me", 0.0, 1), at("o", 9.0, 0)];
        let clear = [at("me", 0.0, 1), at("o", 10.0, 0)];
        assert!(!is_safe_to_change_lane(&close, 0, 0, 10.0));
        assert!(is_safe_to_change_lane(&clear, 0, 0, 10.0));
    }

    #[test]
    fn acceleration_only_looks_at_own_lane() {
        let vehicles = [at("me", 0.0, 1), at("beside", 2.0, 0), at("ahead", 30.0, 1)];
        assert!(is_safe_to_accelerate(&vehicles, 0, 10.0));
        let crowded = [at("me", 0.0, 1), at("ahead", 8.0, 1)];
        assert!(!is_safe_to_accelerate(&crowded, 0, 10.0));
        assert!(!is_safe_to_accelerate(&crowded, 5, 10.0));
    }
}

// ── Maneuvers ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod maneuver_tests {
    use super::*;
    use crate::{Vehicle, change_to_same_lane, idle_lock, overtake, wait_seconds};

    #[test]
    fn wait_seconds_lets_steps_pass() {
        let (vocab, v1, road) = single((0.0, 1, 20.0), &[]);
        let wait = wait_seconds(&road, 0.5);
        let mut p = program(vocab, &road, vec![v1], wait, 100);
        let outcome = p.run(&mut NoopObserver).unwrap();

        assert!(matches!(outcome, RunOutcome::Completed(Completion::Quiescent)));
        assert_eq!(road.steps(), 10);
        // Unconstrained vehicles idle.
        assert_eq!(road.vehicle(0).unwrap().speed, 20.0);
        assert_eq!(road.vehicle(0).unwrap().lane, 1);
    }

    #[test]
    fn lane_change_waits_for_a_gap() {
        let (vocab, v1, road) = single((0.0, 1, 20.0), &[("blocker", 2.0, 0, 20.0)]);
        let change = change_to_same_lane(&road, &v1, 0);
        let mut p = program(vocab, &road, vec![v1], change, 30);
        let outcome = p.run(&mut NoopObserver).unwrap();

        assert!(matches!(outcome, RunOutcome::Completed(Completion::RoundLimit)));
        assert_eq!(road.vehicle(0).unwrap().lane, 1);
        assert!(!road.simulator().crashed());
    }

    #[test]
    fn lane_change_moves_one_lane_per_phase() {
        let (vocab, v1, road) = single((0.0, 0, 20.0), &[]);
        let change = change_to_same_lane(&road, &v1, 2);
        let mut p = program(vocab, &road, vec![v1], change, 100);
        let outcome = p.run(&mut NoopObserver).unwrap();

        assert!(outcome.is_completed());
        assert_eq!(road.vehicle(0).unwrap().lane, 2);
        // change, settle, change, settle, final idle
        assert_eq!(road.steps(), 5);
    }

    #[test]
    fn overtake_ends_ahead_in_the_original_lane() {
        let (vocab, v1, road) = single((0.0, 1, 20.0), &[("vut", 50.0, 1, 20.0)]);
        let vut = VehicleRef::new(1, "vut");
        let maneuver = overtake(&road, &v1, &vut);
        let mut p = program(vocab, &road, vec![v1], maneuver, 5_000);
        let outcome = p.run(&mut NoopObserver).unwrap();

        assert!(matches!(outcome, RunOutcome::Completed(Completion::Quiescent)), "{outcome}");
        let me = road.vehicle(0).unwrap();
        let other = road.vehicle(1).unwrap();
        assert_eq!(me.lane, other.lane);
        assert!(!me.is_behind(&other, 0.0));
        assert!(me.position[0] > other.position[0] + ManeuverConfig::default().pass_margin);
        assert!((me.speed - other.speed).abs() <= 0.1);
        assert!(!road.simulator().crashed());
    }

    /// A road that ends after `max_steps`, with `v1` cruising in lane 1 and
    /// a slower `vut` ahead of it.
    fn short_road(max_steps: u64) -> (Vocabulary, Controlled, RoadContext<KinematicHighway>) {
        let mut sim = KinematicHighway::new(HighwayConfig { max_steps, ..HighwayConfig::default() })
            .unwrap();
        sim.add_controlled("v1", 0.0, 1, 20.0).unwrap();
        sim.add_traffic("vut", 50.0, 1, 18.0).unwrap();
        let mut vocab = Vocabulary::new();
        let v1 = Controlled::declare(&mut vocab, 0, "v1").unwrap();
        (vocab, v1, RoadContext::new(sim, ManeuverConfig::default()).unwrap())
    }

    #[test]
    fn driver_stops_with_the_simulation() {
        let (vocab, v1, road) = short_road(5);
        let wait = wait_seconds(&road, 10.0);
        let mut p = program(vocab, &road, vec![v1], wait, 20);
        let outcome = p.run(&mut NoopObserver).unwrap();

        // The wait ends in the same round as the driver.
        assert!(matches!(outcome, RunOutcome::Completed(Completion::Drained)), "{outcome}");
        assert_eq!(road.steps(), 5);
        assert_eq!(p.unit_count(), 0);
    }

    #[test]
    fn idle_lock_ends_with_the_simulation() {
        let (vocab, v1, road) = short_road(3);
        let lock = idle_lock(&road, &v1);
        let mut p = program(vocab, &road, vec![v1], lock, 20);
        let outcome = p.run(&mut NoopObserver).unwrap();

        assert!(matches!(outcome, RunOutcome::Completed(Completion::Drained)), "{outcome}");
        assert_eq!(road.steps(), 3);
    }

    #[test]
    fn overtake_is_cut_short_by_the_end_of_the_episode() {
        let (vocab, v1, road) = short_road(40);
        let vut = VehicleRef::new(1, "vut");
        let maneuver = overtake(&road, &v1, &vut);
        let mut p = program(vocab, &road, vec![v1], maneuver, 200);
        let outcome = p.run(&mut NoopObserver).unwrap();

        assert!(matches!(outcome, RunOutcome::Completed(Completion::Drained)), "{outcome}");
        assert_eq!(road.steps(), 40);
        assert_eq!(p.unit_count(), 0);
    }

    #[test]
    fn guard_slows_the_trailing_vehicle() {
        let mut sim = highway();
        sim.add_controlled("v1", 0.0, 1, 20.0).unwrap();
        sim.add_controlled("v2", 8.0, 1, 20.0).unwrap();
        let mut vocab = Vocabulary::new();
        let v1 = Controlled::declare(&mut vocab, 0, "v1").unwrap();
        let v2 = Controlled::declare(&mut vocab, 1, "v2").unwrap();
        let road = RoadContext::new(sim, ManeuverConfig::default()).unwrap();

        let guard = crate::SafeDistanceMonitor::new(&road, v1.clone(), v2.clone());
        let mut p = program(vocab, &road, vec![v1.clone(), v2.clone()], guard, 10);
        let status = p.step(&mut NoopObserver).unwrap();
        let a = status.event().and_then(|e| e.assignment()).unwrap();

        assert_eq!(a.get(v1.var()).map(|s| s.as_str()), Some("SLOWER"));
        assert_eq!(a.get(v2.var()).map(|s| s.as_str()), Some("IDLE"));
        assert_eq!(road.vehicle(0).unwrap().speed, 19.0);
    }

    /// `v1` at the origin and `v2` `gap` metres ahead in the same lane,
    /// guarded, while another unit keeps asking `v1` to speed up.
    fn guarded_chase(gap: f64) -> (Controlled, RoadContext<KinematicHighway>, Program<SymbolicStrategy>) {
        let mut sim = highway();
        sim.add_controlled("v1", 0.0, 1, 25.0).unwrap();
        sim.add_controlled("v2", gap, 1, 20.0).unwrap();
        let mut vocab = Vocabulary::new();
        let v1 = Controlled::declare(&mut vocab, 0, "v1").unwrap();
        let v2 = Controlled::declare(&mut vocab, 1, "v2").unwrap();
        let road = RoadContext::new(sim, ManeuverConfig::default()).unwrap();

        let chaser = v1.clone();
        let p = ProgramBuilder::new(SymbolicStrategy::new(vocab))
            .config(ProgramConfig::default().max_rounds(10))
            .unit(thread("driver", SimulatorDriver::new(&road, vec![v1.clone(), v2.clone()])))
            .unit(thread("guard", crate::SafeDistanceMonitor::new(&road, v1.clone(), v2)))
            .unit(thread("chase", from_fn(move |_, _| Ok(Pause::Sync(chaser.request(Action::Faster))))))
            .build()
            .unwrap();
        (v1, road, p)
    }

    #[test]
    fn guard_overrules_a_competing_request() {
        let (v1, road, mut p) = guarded_chase(8.0);
        let status = p.step(&mut NoopObserver).unwrap();
        let a = status.event().and_then(|e| e.assignment()).unwrap();

        assert_eq!(a.get(v1.var()).map(|s| s.as_str()), Some("SLOWER"));
        assert_eq!(road.vehicle(0).unwrap().speed, 24.0);
    }

    #[test]
    fn guard_stays_out_of_the_way_at_a_safe_gap() {
        let (v1, road, mut p) = guarded_chase(40.0);
        let status = p.step(&mut NoopObserver).unwrap();
        let a = status.event().and_then(|e| e.assignment()).unwrap();

        assert_eq!(a.get(v1.var()).map(|s| s.as_str()), Some("FASTER"));
        assert_eq!(road.vehicle(0).unwrap().speed, 26.0);
    }

    #[test]
    fn guarded_chase_never_crashes() {
        let (_, road, mut p) = guarded_chase(16.0);
        for _ in 0..10 {
            p.step(&mut NoopObserver).unwrap();
        }
        let gap = road.vehicle(1).unwrap().position[0] - road.vehicle(0).unwrap().position[0];
        assert!(gap > 5.0, "gap {gap}");
        assert!(!road.simulator().crashed());
    }
}

// ── Constraint monitors ───────────────────────────────────────────────────────

#[cfg(test)]
mod monitor_tests {
    use super::*;
    use crate::{OvertakeLimits, ScenarioKind, Verdict, overtake_monitors, scripted};

    fn verdicts(kind: ScenarioKind) -> Vec<bool> {
        let limits = OvertakeLimits::default();
        let mut builder = ProgramBuilder::new(EnumerativeStrategy::new());
        let mut slots = Vec::new();
        for (unit, slot) in overtake_monitors(&limits) {
            builder = builder.unit(unit);
            slots.push(slot);
        }
        let mut program = builder.unit(scripted(kind, &limits)).build().unwrap();
        let outcome = program.run(&mut NoopObserver).unwrap();
        assert!(matches!(outcome, RunOutcome::Completed(Completion::Drained)));
        slots.iter().map(|s| s.get().is_some_and(|v| v.is_satisfied())).collect()
    }

    #[test]
    fn valid_run_satisfies_everything() {
        assert_eq!(verdicts(ScenarioKind::Valid), [true, true, true, true]);
    }

    #[test]
    fn each_invalid_run_trips_its_constraint() {
        // position, duration, action order, speed
        assert_eq!(verdicts(ScenarioKind::InvalidPosition), [false, true, true, true]);
        assert_eq!(verdicts(ScenarioKind::InvalidDuration), [true, false, false, true]);
        assert_eq!(verdicts(ScenarioKind::InvalidActionOrder), [true, true, false, true]);
        assert_eq!(verdicts(ScenarioKind::InvalidSpeed), [true, true, true, false]);
    }

    #[test]
    fn speed_up_before_lane_change_is_an_order_violation() {
        use bp_core::Event;

        use crate::Constraint;
        use crate::monitor::{ActionOrderConstraint, LANE_CHANGE, SPEED_UP, STEP_KEY};

        let mut c = ActionOrderConstraint::new(&OvertakeLimits::default());
        c.observe(&Event::with_payload(SPEED_UP, [(STEP_KEY, 1u64)]));
        c.observe(&Event::with_payload(LANE_CHANGE, [(STEP_KEY, 2u64)]));
        c.observe(&Event::with_payload(SPEED_UP, [(STEP_KEY, 20u64)]));
        assert!(matches!(c.verdict(), Verdict::Violated(_)));
    }

    #[test]
    fn scenario_hands_out_its_script_one_event_per_round() {
        use bp_core::{Round, UnitId};
        use bp_thread::{BThread, UnitContext};

        let limits = OvertakeLimits::default();
        let script = ScenarioKind::Valid.script(&limits);
        let mut unit = scripted(ScenarioKind::Valid, &limits);
        assert_eq!(unit.behavior().remaining(), script.len());

        let mut spawned = Vec::new();
        let mut ctx = UnitContext::new(UnitId(0), Round(0), &mut spawned);
        let first = unit.poll(&mut ctx).unwrap().unwrap();
        assert!(first.observes(&script[0]));
        assert_eq!(unit.behavior().remaining(), script.len() - 1);
        unit.resume(&script[0], &mut ctx).unwrap();
        assert_eq!(unit.behavior().remaining(), script.len() - 2);
    }

    #[test]
    fn scenario_labels_round_trip() {
        for kind in ScenarioKind::ALL {
            assert_eq!(ScenarioKind::from_label(kind.label()), Some(kind));
        }
    }
}
