use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use serde::Deserialize;

use bp_highway::{HighwayConfig, ManeuverConfig};
use bp_program::ProgramConfig;

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VehicleSpec {
    pub name:  String,
    pub x:     f64,
    pub lane:  usize,
    pub speed: f64,
}

impl VehicleSpec {
    fn new(name: &str, x: f64, lane: usize, speed: f64) -> Self {
        Self { name: name.to_owned(), x, lane, speed }
    }
}

/// Everything the demo reads from its optional JSON file.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub highway:     HighwayConfig,
    pub maneuver:    ManeuverConfig,
    pub program:     ProgramConfig,
    pub controlled:  Vec<VehicleSpec>,
    pub vut:         VehicleSpec,
    /// Write a round trace here.  No trace when unset.
    pub output_dir:  Option<String>,
    pub format:      TraceFormat,
    pub unit_states: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            // One minute of driving; the safe-distance unit keeps the
            // program going until the episode ends.
            highway:     HighwayConfig { max_steps: 1_200, ..HighwayConfig::default() },
            maneuver:    ManeuverConfig::default(),
            program:     ProgramConfig::default().max_rounds(2_000),
            controlled:  vec![
                VehicleSpec::new("v1", 0.0, 1, 20.0),
                VehicleSpec::new("v2", -40.0, 2, 20.0),
            ],
            vut:         VehicleSpec::new("vut", 50.0, 1, 18.0),
            output_dir:  Some("output/overtake".into()),
            format:      TraceFormat::Csv,
            unit_states: false,
        }
    }
}

impl DemoConfig {
    pub fn load(path: &str) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening {path}"))?;
        serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {path}"))
    }
}
