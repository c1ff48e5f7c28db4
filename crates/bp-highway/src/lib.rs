//! `bp-highway` — highway driving expressed as behavior units.
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`action`]     | The five discrete meta-actions                                  |
//! | [`vehicle`]    | `Vehicle` capability trait and `VehicleState` snapshot          |
//! | [`simulator`]  | `Simulator` collaborator trait                                  |
//! | [`kinematic`]  | `KinematicHighway`, a minimal straight-road simulator           |
//! | [`road`]       | `RoadContext` shared by all units; `Controlled` vehicle handles |
//! | [`safety`]     | Lane-change and acceleration safety predicates                  |
//! | [`maneuver`]   | Maneuver behaviors (symbolic strategy)                          |
//! | [`driver`]     | `SimulatorDriver`, the unit that steps the simulator            |
//! | [`guard`]      | `SafeDistanceMonitor` for two controlled vehicles               |
//! | [`monitor`]    | Overtake constraint monitors (enumerative strategy)             |
//! | [`scenario`]   | Scripted event streams for the monitors                         |
//!
//! # Wiring an overtake
//!
//! ```rust,ignore
//! let mut vocab = Vocabulary::new();
//! let v1 = Controlled::declare(&mut vocab, 0, "v1")?;
//! let road = RoadContext::new(highway, ManeuverConfig::default())?;
//!
//! let mut program = ProgramBuilder::new(SymbolicStrategy::new(vocab))
//!     .unit(thread("driver", SimulatorDriver::new(&road, vec![v1.clone()])))
//!     .unit(thread("overtake", overtake(&road, &v1, &vut)))
//!     .build()?;
//! program.run(&mut TracingObserver::new())?;
//! ```

pub mod action;
pub mod config;
pub mod driver;
pub mod error;
pub mod guard;
pub mod kinematic;
pub mod maneuver;
pub mod monitor;
pub mod road;
pub mod safety;
pub mod scenario;
pub mod simulator;
pub mod vehicle;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use config::{HighwayConfig, ManeuverConfig, OvertakeLimits};
pub use driver::SimulatorDriver;
pub use error::{HighwayError, HighwayResult};
pub use guard::SafeDistanceMonitor;
pub use kinematic::KinematicHighway;
pub use maneuver::{
    announce, change_to_same_lane, close_distance, equalize_speeds, fall_behind, get_behind,
    idle_lock, overtake, wait_seconds, while_running,
};
pub use monitor::{
    ActionOrderConstraint, Constraint, DurationConstraint, Monitor, PositionConstraint,
    SpeedLimitConstraint, Verdict, VerdictSlot, monitor, overtake_monitors,
};
pub use road::{Controlled, RoadContext, VehicleRef};
pub use scenario::{ScenarioKind, ScriptedScenario, scripted};
pub use simulator::Simulator;
pub use vehicle::{Vehicle, VehicleState};
