use thiserror::Error;

/// Failure raised from inside a unit's pause-point body.
///
/// The program isolates it to the failing unit unless configured to fail fast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("unit failed: {0}")]
    Failed(String),

    #[error("unexpected event {got} (expected {expected})")]
    UnexpectedEvent { expected: String, got: String },

    #[error("protocol violation: {0}")]
    Protocol(&'static str),

    #[error("domain error: {0}")]
    Domain(String),
}

pub type UnitResult<T> = Result<T, UnitError>;
