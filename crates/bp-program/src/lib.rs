//! `bp-program` — the round loop.
//!
//! # One round
//!
//! ```text
//! ① Collect    poll every Runnable unit for a fresh statement; Parked units
//!              keep the statement they already submitted.  Every fresh
//!              statement is validated by the strategy.
//! ② Select     hand the frozen statements (admission order) to the strategy.
//! ③ Decide     Quiescent: nobody requested anything → clean halt.
//!              Deadlocked: requests exist, none admissible → halt + report.
//!              Either way, if ① spawned units the round ends as Admitted
//!              instead and the program goes on.
//! ④ Resume     resume every unit whose request/waitFor matches the event;
//!              the others stay Parked with their statement untouched.
//! ⑤ Admit      drop Terminated units, then admit units spawned during ①/④.
//!              They are first polled in the next round.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bp_program::{NoopObserver, ProgramBuilder};
//! use bp_select::EnumerativeStrategy;
//!
//! let mut program = ProgramBuilder::new(EnumerativeStrategy::new())
//!     .unit(producer)
//!     .unit(monitor)
//!     .build()?;
//! let outcome = program.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod program;
pub mod status;


pub use builder::ProgramBuilder;
pub use config::ProgramConfig;
pub use error::{ProgramError, ProgramResult};
pub use observer::{NoopObserver, ProgramObserver, TracingObserver};
pub use program::Program;
pub use status::{
    Completion, DeadlockReport, RoundStatus, RunOutcome, StalledUnit, UnitFailure, UnitPhase,
    UnitSnapshot,
};
