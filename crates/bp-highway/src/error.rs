use bp_core::BpError;
use bp_thread::UnitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HighwayError {
    #[error("no vehicle at index {0}")]
    UnknownVehicle(usize),

    #[error("expected {expected} actions, got {got}")]
    ActionCount { expected: usize, got: usize },

    #[error("invalid highway configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Vocabulary(#[from] BpError),
}

pub type HighwayResult<T> = Result<T, HighwayError>;

/// Maneuver bodies run inside units; surface highway errors as unit failures.
impl From<HighwayError> for UnitError {
    fn from(e: HighwayError) -> Self {
        UnitError::Domain(e.to_string())
    }
}
