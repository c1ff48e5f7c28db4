//! `bp-thread` — behavior units and how to write them.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                         |
//! |----------------|------------------------------------------------------------------|
//! | [`thread`]     | `BThread` trait (`poll`/`resume`/`is_terminated`), `StepThread`  |
//! | [`behavior`]   | `Behavior` trait (one resumable step function) and `Pause`       |
//! | [`combinator`] | `Chain`, `defer`, `from_fn`, `once`, `fork`                       |
//! | [`context`]    | `UnitContext<'a>`: unit id, round, spawn queue                   |
//! | [`error`]      | `UnitError`, `UnitResult<T>`                                     |
//!
//! # Design notes
//!
//! The engine only talks to [`BThread`].  Most units are written as a
//! [`Behavior`], a hand-written state machine whose `step` is called with the
//! event that resumed it (or `None` on first entry) and returns the next
//! [`Pause`].  A [`StepThread`] wraps it and tracks the
//! `Runnable → Parked → Runnable … → Terminated` life cycle.
//!
//! Delegation ("run this sub-sequence, then continue") is ordinary
//! composition of behaviors through [`Chain`]: when a child finishes, the
//! parent moves on to the next child inside the same `step` call, so the
//! engine still sees exactly one statement per pause point.

pub mod behavior;
pub mod combinator;
pub mod context;
pub mod error;
pub mod thread;


pub use behavior::{Behavior, Pause};
pub use combinator::{Chain, Deferred, Fork, FnBehavior, Once, defer, fork, from_fn, once};
pub use context::UnitContext;
pub use error::{UnitError, UnitResult};
pub use thread::{BThread, StepThread, thread};
