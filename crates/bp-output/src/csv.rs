//! CSV trace backend.
//!
//! Creates three files in the configured output directory:
//! - `rounds.csv`
//! - `unit_states.csv`
//! - `unit_failures.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TraceWriter;
use crate::{OutputResult, RoundRow, UnitFailureRow, UnitStateRow};

/// Writes a round trace to three CSV files.
pub struct CsvTraceWriter {
    rounds:   Writer<File>,
    units:    Writer<File>,
    failures: Writer<File>,
    finished: bool,
}

impl CsvTraceWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut rounds = Writer::from_path(dir.join("rounds.csv"))?;
        rounds.write_record(["round", "status", "event", "resumed", "live"])?;

        let mut units = Writer::from_path(dir.join("unit_states.csv"))?;
        units.write_record(["round", "unit_id", "name", "phase", "statement"])?;

        let mut failures = Writer::from_path(dir.join("unit_failures.csv"))?;
        failures.write_record(["round", "unit_id", "name", "cause"])?;

        Ok(Self { rounds, units, failures, finished: false })
    }
}

impl TraceWriter for CsvTraceWriter {
    fn write_round(&mut self, row: &RoundRow) -> OutputResult<()> {
        self.rounds.write_record(&[
            row.round.to_string(),
            row.status.clone(),
            row.event.clone(),
            row.resumed.to_string(),
            row.live.to_string(),
        ])?;
        Ok(())
    }

    fn write_unit_states(&mut self, rows: &[UnitStateRow]) -> OutputResult<()> {
        for row in rows {
            self.units.write_record(&[
                row.round.to_string(),
                row.unit_id.to_string(),
                row.name.clone(),
                row.phase.clone(),
                row.statement.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_failure(&mut self, row: &UnitFailureRow) -> OutputResult<()> {
        self.failures.write_record(&[
            row.round.to_string(),
            row.unit_id.to_string(),
            row.name.clone(),
            row.cause.clone(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.rounds.flush()?;
        self.units.flush()?;
        self.failures.flush()?;
        Ok(())
    }
}
