//! checker — replays scripted overtake reports against the constraint
//! monitors and prints each monitor's verdict.
//!
//! ```text
//! checker                       # every scenario
//! checker invalid_speed         # one scenario
//! checker valid limits.json     # custom limits
//! ```

use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result, bail};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use bp_highway::{OvertakeLimits, ScenarioKind, Verdict, overtake_monitors, scripted};
use bp_program::{NoopObserver, ProgramBuilder, RunOutcome};
use bp_select::EnumerativeStrategy;

const MONITORS: [&str; 4] = ["position", "duration", "action order", "speed limit"];

fn load_limits(path: &str) -> Result<OvertakeLimits> {
    let file = File::open(path).with_context(|| format!("opening {path}"))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {path}"))
}

/// Run one scenario; returns the outcome and one verdict per monitor.
fn check(kind: ScenarioKind, limits: &OvertakeLimits) -> Result<(RunOutcome, Vec<Option<Verdict>>)> {
    let mut builder = ProgramBuilder::new(EnumerativeStrategy::new());
    let mut slots = Vec::new();
    for (unit, slot) in overtake_monitors(limits) {
        builder = builder.unit(unit);
        slots.push(slot);
    }
    let mut program = builder.unit(scripted(kind, limits)).build()?;
    let outcome = program.run(&mut NoopObserver)?;
    Ok((outcome, slots.iter().map(|s| s.get()).collect()))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let kinds = match args.next() {
        None => ScenarioKind::ALL.to_vec(),
        Some(label) => match ScenarioKind::from_label(&label) {
            Some(kind) => vec![kind],
            None => bail!("unknown scenario {label:?}"),
        },
    };
    let limits = match args.next() {
        Some(path) => load_limits(&path)?,
        None => OvertakeLimits::default(),
    };

    println!("{:<22} {:<14} {:<8}", "Scenario", "Monitor", "Verdict");
    println!("{}", "-".repeat(46));
    let mut violations = 0;
    for kind in kinds {
        let (outcome, verdicts) = check(kind, &limits)?;
        if !outcome.is_completed() {
            println!("{:<22} program did not complete: {outcome}", kind.label());
        }
        for (name, verdict) in MONITORS.iter().zip(verdicts) {
            let text = match verdict {
                Some(Verdict::Satisfied) => "ok".to_owned(),
                Some(Verdict::Violated(why)) => {
                    violations += 1;
                    format!("VIOLATED ({why})")
                }
                None => "no verdict".to_owned(),
            };
            println!("{:<22} {:<14} {}", kind.label(), name, text);
        }
    }
    println!();
    println!("{violations} violation(s)");
    Ok(())
}
