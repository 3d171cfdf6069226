use thiserror::Error;

/// Errors raised by the lattice builders, the energy model and the
/// Monte Carlo engine. All of them are caller or configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IsingError {
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("operation requires a non-empty structure")]
    EmptyStructure,

    #[error("unknown structure type: {0}")]
    InvalidStructureType(String),

    #[error("invalid simulation parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, IsingError>;
