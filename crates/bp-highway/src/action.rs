//! The discrete meta-actions a controlled vehicle can take.

use std::fmt;

use bp_core::Symbol;

/// One step's command for a controlled vehicle.
///
/// The discriminant is the simulator's action index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    LaneLeft = 0,
    Idle = 1,
    LaneRight = 2,
    Faster = 3,
    Slower = 4,
}

impl Action {
    /// All actions in simulator index order.
    pub const ALL: [Action; 5] =
        [Action::LaneLeft, Action::Idle, Action::LaneRight, Action::Faster, Action::Slower];

    /// Order of the symbolic domain.  `IDLE` comes first so that a vehicle no
    /// unit constrains keeps its course under lexicographic solving.
    pub const DOMAIN: [Action; 5] =
        [Action::Idle, Action::LaneLeft, Action::LaneRight, Action::Faster, Action::Slower];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::LaneLeft => "LANE_LEFT",
            Action::Idle => "IDLE",
            Action::LaneRight => "LANE_RIGHT",
            Action::Faster => "FASTER",
            Action::Slower => "SLOWER",
        }
    }

    pub fn from_label(label: &str) -> Option<Action> {
        Action::ALL.into_iter().find(|a| a.label() == label)
    }

    /// Map a solved value back to an action; anything unknown idles.
    pub fn from_symbol(value: Option<&Symbol>) -> Action {
        value.and_then(|s| Action::from_label(s.as_str())).unwrap_or(Action::Idle)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
