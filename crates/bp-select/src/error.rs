use bp_core::BpError;
use thiserror::Error;

/// A statement the active strategy cannot interpret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("malformed {role}: {reason}")]
    Malformed { role: &'static str, reason: String },

    #[error("{role} refers to an undeclared symbol: {source}")]
    Undeclared {
        role: &'static str,
        #[source]
        source: BpError,
    },
}

pub type SelectResult<T> = Result<T, SelectError>;
