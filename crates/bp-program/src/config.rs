//! Program configuration.

/// Knobs for one program run.
///
/// Typically built in code; with the `serde` feature it can also be loaded
/// from a JSON/TOML file by the application crate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgramConfig {
    /// Halt the whole program with `UnitFailed` on the first unit failure
    /// instead of isolating the failing unit.
    pub fail_fast: bool,

    /// Stop `run()` after this many rounds.  Needed for programs whose units
    /// loop forever (simulator drivers, idle locks).  `None` = unbounded.
    pub max_rounds: Option<u64>,
}

impl ProgramConfig {
    pub fn fail_fast(mut self, yes: bool) -> Self {
        self.fail_fast = yes;
        self
    }

    pub fn max_rounds(mut self, n: u64) -> Self {
        self.max_rounds = Some(n);
        self
    }
}
