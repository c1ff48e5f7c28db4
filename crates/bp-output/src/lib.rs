//! `bp-output` — round-trace writers for behavioral programs.
//!
//! Two backends are provided:
//!
//! | Writer              | Files created                                          |
//! |---------------------|--------------------------------------------------------|
//! | [`CsvTraceWriter`]  | `rounds.csv`, `unit_states.csv`, `unit_failures.csv`   |
//! | [`JsonTraceWriter`] | `trace.jsonl` (one tagged JSON object per line)        |
//!
//! Both implement [`TraceWriter`] and are driven by [`TraceObserver`], which
//! implements `bp_program::ProgramObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bp_output::{CsvTraceWriter, TraceObserver};
//!
//! let writer = CsvTraceWriter::new(Path::new("./trace"))?;
//! let mut obs = TraceObserver::new(writer);
//! program.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("trace error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvTraceWriter;
pub use error::{OutputError, OutputResult};
pub use json::JsonTraceWriter;
pub use observer::TraceObserver;
pub use row::{RoundRow, UnitFailureRow, UnitStateRow};
pub use writer::TraceWriter;
