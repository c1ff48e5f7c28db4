//! Plain data row types written by trace backends.

use serde::Serialize;

/// One line per round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundRow {
    pub round:   u64,
    /// `progressing`, `admitted`, `quiescent`, `deadlocked`, `drained` or
    /// `unit_failed`.
    pub status:  String,
    /// The selected event; empty when the round halted.
    pub event:   String,
    pub resumed: u64,
    /// Units still admitted after the round.
    pub live:    u64,
}

/// The state of one unit at the end of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitStateRow {
    pub round:     u64,
    pub unit_id:   u32,
    pub name:      String,
    pub phase:     String,
    /// Parked statement; empty if the unit is runnable.
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailureRow {
    pub round:   u64,
    pub unit_id: u32,
    pub name:    String,
    pub cause:   String,
}
