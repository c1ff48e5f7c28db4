use bp_core::UnitId;
use bp_select::SelectError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("program configuration error: {0}")]
    Config(String),

    #[error("unit {unit} ({name}) yielded a malformed statement: {source}")]
    MalformedStatement {
        unit:   UnitId,
        name:   String,
        #[source]
        source: SelectError,
    },

    #[error("event selection failed: {0}")]
    Select(#[from] SelectError),
}

pub type ProgramResult<T> = Result<T, ProgramError>;
