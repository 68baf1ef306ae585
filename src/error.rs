use thiserror::Error;

/// Errors produced by grid lookups and path queries
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A coordinate outside the warehouse grid
    #[error("cell ({row}, {col}) is outside the warehouse grid")]
    InvalidCell { row: usize, col: usize },

    /// An opted-into step budget ran out before a terminal cell was reached
    #[error("no terminal cell reached within {limit} steps")]
    StepLimit { limit: usize },
}

/// Result type alias for warehouse operations
pub type Result<T> = std::result::Result<T, Error>;
