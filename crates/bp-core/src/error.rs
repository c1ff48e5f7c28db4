//! Core error type.
//!
//! Raised when symbolic variables are declared inconsistently or a formula
//! refers to something the vocabulary does not know about.

use thiserror::Error;

use crate::Symbol;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BpError {
    #[error("variable `{0}` is not declared")]
    UnknownVariable(Symbol),

    #[error("value `{value}` is not in the domain of `{var}`")]
    UnknownValue { var: Symbol, value: Symbol },

    #[error("variable `{0}` is declared twice")]
    DuplicateVariable(Symbol),

    #[error("variable `{0}` has an empty domain")]
    EmptyDomain(Symbol),

    #[error("value `{value}` appears twice in the domain of `{var}`")]
    DuplicateValue { var: Symbol, value: Symbol },
}

/// Shorthand result type for `bp-core`.
pub type BpResult<T> = Result<T, BpError>;
