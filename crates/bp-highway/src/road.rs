//! Shared road context and vehicle handles.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use bp_core::{Expr, Statement, Var, Vocabulary};

use crate::{Action, HighwayResult, ManeuverConfig, Simulator, VehicleState, safety};

// ── Vehicle handles ───────────────────────────────────────────────────────────

/// Names a vehicle of the simulator by index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VehicleRef {
    pub index: usize,
    pub name:  String,
}

impl VehicleRef {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self { index, name: name.into() }
    }
}

/// A vehicle whose next action is a symbolic variable.
#[derive(Clone, Debug)]
pub struct Controlled {
    vehicle: VehicleRef,
    var:     Var,
}

impl Controlled {
    /// Declare `<name>_action` over the action domain.
    pub fn declare(vocabulary: &mut Vocabulary, index: usize, name: &str) -> HighwayResult<Self> {
        let var = vocabulary.declare(format!("{name}_action"), Action::DOMAIN.map(Action::label))?;
        Ok(Self { vehicle: VehicleRef::new(index, name), var })
    }

    pub fn vehicle(&self) -> &VehicleRef {
        &self.vehicle
    }

    pub fn index(&self) -> usize {
        self.vehicle.index
    }

    pub fn name(&self) -> &str {
        &self.vehicle.name
    }

    pub fn var(&self) -> &Var {
        &self.var
    }

    /// "This vehicle takes `action`."
    pub fn does(&self, action: Action) -> Expr {
        self.var.is(action.label())
    }

    pub fn request(&self, action: Action) -> Statement {
        Statement::new().request(self.does(action))
    }
}

// ── RoadContext ───────────────────────────────────────────────────────────────

struct Road<S> {
    simulator: RefCell<S>,
    steps:     Cell<u64>,
    config:    ManeuverConfig,
}

/// The simulator and step counter every highway unit shares.
///
/// Cloning is cheap and yields another handle to the same road.  Only the
/// [`SimulatorDriver`][crate::SimulatorDriver] advances it; every other unit
/// only reads.
pub struct RoadContext<S> {
    inner: Rc<Road<S>>,
}

impl<S> Clone for RoadContext<S> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<S: Simulator> RoadContext<S> {
    pub fn new(simulator: S, config: ManeuverConfig) -> HighwayResult<Self> {
        config.validate()?;
        Ok(Self {
            inner: Rc::new(Road { simulator: RefCell::new(simulator), steps: Cell::new(0), config }),
        })
    }

    pub fn config(&self) -> &ManeuverConfig {
        &self.inner.config
    }

    /// Steps driven so far.
    pub fn steps(&self) -> u64 {
        self.inner.steps.get()
    }

    pub fn seconds_since(&self, step: u64) -> f64 {
        self.config().seconds(self.steps().saturating_sub(step))
    }

    /// Borrow the simulator for reading.
    pub fn simulator(&self) -> Ref<'_, S> {
        self.inner.simulator.borrow()
    }

    pub fn vehicle(&self, index: usize) -> HighwayResult<VehicleState> {
        self.simulator().vehicle(index).cloned()
    }

    pub fn is_done(&self) -> bool {
        self.simulator().is_done()
    }

    pub fn is_safe_to_change_lane(&self, me: usize, target_lane: usize) -> bool {
        let sim = self.simulator();
        safety::is_safe_to_change_lane(sim.vehicles(), me, target_lane, self.config().safe_distance)
    }

    pub fn is_safe_to_accelerate(&self, me: usize) -> bool {
        let sim = self.simulator();
        safety::is_safe_to_accelerate(sim.vehicles(), me, self.config().safe_distance)
    }

    pub(crate) fn advance(&self, actions: &[Action]) -> HighwayResult<()> {
        self.inner.simulator.borrow_mut().step(actions)?;
        self.inner.steps.set(self.steps() + 1);
        Ok(())
    }
}
