//! `bp-core` — the vocabulary every other `bp-*` crate speaks.
//!
//! Events, symbolic variables and statements are plain data here; nothing in
//! this crate knows how a round runs.  External dependencies are `thiserror`
//! and, behind the `serde` feature, `serde`.
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `UnitId`, `Round`                                          |
//! | [`symbol`]      | `Symbol` — cheap-to-clone interned-style name              |
//! | [`event`]       | `Event`, `Payload`, `Value`                                |
//! | [`event_set`]   | `EventSet`, `Matcher` — concrete and predicate event sets  |
//! | [`symbolic`]    | `Var`, `VarDecl`, `Vocabulary`, `Assignment`, `Expr`       |
//! | [`statement`]   | `Formula`, `Statement` — the per-round sync declaration    |
//! | [`error`]       | `BpError`, `BpResult`                                      |
//!
//! # Two kinds of formula
//!
//! A [`Statement`] field is a [`Formula`], which is either a set of concrete
//! events (enumerative mode) or a boolean [`Expr`] over shared symbolic
//! variables (symbolic mode).  Which kind a program uses is decided by the
//! event-selection strategy it runs with; `bp-select` rejects the other kind
//! at round-collection time.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to events and assignments.  |

pub mod error;
pub mod event;
pub mod event_set;
pub mod ids;
pub mod statement;
pub mod symbol;
pub mod symbolic;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{BpError, BpResult};
pub use event::{Event, Payload, Value};
pub use event_set::{EventSet, Matcher};
pub use ids::{Round, UnitId};
pub use statement::{Formula, Statement};
pub use symbol::Symbol;
pub use symbolic::{Assignment, Expr, Var, VarDecl, Vocabulary};
