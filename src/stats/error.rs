use thiserror::Error;

/// Statistics computation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),
}
