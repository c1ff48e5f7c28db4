//! JSON-lines trace backend.
//!
//! Writes `trace.jsonl`, one object per line, tagged by `kind`:
//!
//! ```text
//! {"kind":"round","round":0,"status":"progressing","event":"X","resumed":1,"live":2}
//! {"kind":"unit","round":0,"unit_id":1,"name":"waiter","phase":"parked","statement":"sync(waitFor=Z)"}
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::writer::TraceWriter;
use crate::{OutputResult, RoundRow, UnitFailureRow, UnitStateRow};

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Record<'a> {
    Round(&'a RoundRow),
    Unit(&'a UnitStateRow),
    Failure(&'a UnitFailureRow),
}

/// Writes a round trace as JSON lines.
pub struct JsonTraceWriter {
    out:      BufWriter<File>,
    finished: bool,
}

impl JsonTraceWriter {
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let out = BufWriter::new(File::create(dir.join("trace.jsonl"))?);
        Ok(Self { out, finished: false })
    }

    fn line(&mut self, record: &Record<'_>) -> OutputResult<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

impl TraceWriter for JsonTraceWriter {
    fn write_round(&mut self, row: &RoundRow) -> OutputResult<()> {
        self.line(&Record::Round(row))
    }

    fn write_unit_states(&mut self, rows: &[UnitStateRow]) -> OutputResult<()> {
        rows.iter().try_for_each(|row| self.line(&Record::Unit(row)))
    }

    fn write_failure(&mut self, row: &UnitFailureRow) -> OutputResult<()> {
        self.line(&Record::Failure(row))
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}
