//! overtake — two controlled vehicles overtake a slower vehicle under test.
//!
//! Every controlled vehicle runs its own overtake maneuver; a safe-distance
//! unit keeps the two apart whenever they share a lane.  Selection is
//! symbolic: each round picks one joint action for both vehicles.
//!
//! ```text
//! overtake [config.json]
//! RUST_LOG=info overtake
//! ```

mod setup;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use bp_core::{Round, Vocabulary};
use bp_highway::{
    Controlled, KinematicHighway, RoadContext, SafeDistanceMonitor, Simulator, SimulatorDriver,
    Vehicle, VehicleRef, overtake,
};
use bp_output::{CsvTraceWriter, JsonTraceWriter, TraceObserver, TraceWriter};
use bp_program::{
    ProgramBuilder, ProgramObserver, RoundStatus, RunOutcome, TracingObserver, UnitFailure,
    UnitSnapshot,
};
use bp_select::SymbolicStrategy;
use bp_thread::thread;

use setup::{DemoConfig, TraceFormat};

// ── Observer fan-out ──────────────────────────────────────────────────────────

/// Logs through `tracing` and, when configured, also writes a trace file.
struct DemoObserver {
    log:   TracingObserver,
    trace: Option<TraceObserver<Box<dyn TraceWriter>>>,
}

impl ProgramObserver for DemoObserver {
    fn on_program_start(&mut self, units: usize) {
        self.log.on_program_start(units);
    }

    fn on_round_start(&mut self, round: Round) {
        self.log.on_round_start(round);
    }

    fn on_unit_failed(&mut self, failure: &UnitFailure) {
        self.log.on_unit_failed(failure);
        if let Some(t) = &mut self.trace {
            t.on_unit_failed(failure);
        }
    }

    fn on_round_end(&mut self, round: Round, status: &RoundStatus, units: &[UnitSnapshot]) {
        self.log.on_round_end(round, status, units);
        if let Some(t) = &mut self.trace {
            t.on_round_end(round, status, units);
        }
    }

    fn on_program_end(&mut self, outcome: &RunOutcome) {
        self.log.on_program_end(outcome);
        if let Some(t) = &mut self.trace {
            t.on_program_end(outcome);
        }
    }
}

fn trace_observer(config: &DemoConfig) -> Result<Option<TraceObserver<Box<dyn TraceWriter>>>> {
    let Some(dir) = &config.output_dir else {
        return Ok(None);
    };
    let dir = PathBuf::from(dir);
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let writer: Box<dyn TraceWriter> = match config.format {
        TraceFormat::Csv => Box::new(CsvTraceWriter::new(&dir)?),
        TraceFormat::Json => Box::new(JsonTraceWriter::new(&dir)?),
    };
    let observer = TraceObserver::new(writer);
    Ok(Some(if config.unit_states { observer } else { observer.rounds_only() }))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => DemoConfig::load(&path)?,
        None => DemoConfig::default(),
    };

    // 1. Road: controlled vehicles first, then the vehicle under test.
    let mut highway = KinematicHighway::new(config.highway.clone())?;
    let mut vocab = Vocabulary::new();
    let mut controlled = Vec::new();
    for v in &config.controlled {
        let index = highway.add_controlled(&v.name, v.x, v.lane, v.speed)?;
        controlled.push(Controlled::declare(&mut vocab, index, &v.name)?);
    }
    let vut = &config.vut;
    let vut = VehicleRef::new(highway.add_traffic(&vut.name, vut.x, vut.lane, vut.speed)?, &vut.name);
    let road = RoadContext::new(highway, config.maneuver.clone())?;

    println!("=== overtake — behavioral-programming highway demo ===");
    println!(
        "Controlled: {}  |  vehicle under test: {}  |  joint actions per round: {}",
        controlled.len(),
        vut.name,
        vocab.space_size()
    );
    println!();

    // 2. Units.  The driver goes first so maneuvers see each step's result.
    let mut builder = ProgramBuilder::new(SymbolicStrategy::new(vocab))
        .config(config.program.clone())
        .unit(thread("driver", SimulatorDriver::new(&road, controlled.clone())));
    for c in &controlled {
        builder = builder.unit(thread(format!("{} overtake", c.name()), overtake(&road, c, &vut)));
    }
    if let [a, b, ..] = controlled.as_slice() {
        builder = builder.unit(thread("safe distance", SafeDistanceMonitor::new(&road, a.clone(), b.clone())));
    }
    let mut program = builder.build()?;

    // 3. Run.
    let mut observer = DemoObserver { log: TracingObserver::new(), trace: trace_observer(&config)? };
    let t0 = Instant::now();
    let outcome = program.run(&mut observer)?;
    let elapsed = t0.elapsed();

    if let Some(e) = observer.trace.as_mut().and_then(TraceObserver::take_error) {
        eprintln!("output error: {e}");
    }

    // 4. Summary.
    let sim = road.simulator();
    println!("Outcome: {outcome}");
    println!(
        "Rounds: {}  |  steps: {}  |  simulated: {:.2} s  |  wall: {:.3} s",
        program.round().0,
        road.steps(),
        road.seconds_since(0),
        elapsed.as_secs_f64()
    );
    println!("Crashed: {}", if sim.crashed() { "yes" } else { "no" });
    println!();

    println!("{:<10} {:<6} {:>10} {:>8}", "Vehicle", "Lane", "x (m)", "v (m/s)");
    println!("{}", "-".repeat(37));
    for v in sim.vehicles() {
        println!("{:<10} {:<6} {:>10.1} {:>8.1}", v.name(), v.lane_index(), v.position()[0], v.speed());
    }

    Ok(())
}
