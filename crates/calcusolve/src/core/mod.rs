//! Calculator core: expression evaluation, the input state machine and the
//! bounded history cache.
//!
//! Everything in this module is synchronous and free of I/O. Persistence and
//! notifications live in [`crate::session`].

pub mod engine;
pub mod evaluator;
pub mod event;
pub mod format;
pub mod history;
mod operations;
pub mod parser;
pub mod scientific;

pub use operations::{Arithmetic, BinaryOperator};

use thiserror::Error;

/// Result type for expression evaluation
pub type CalcResult<T> = Result<T, CalcError>;

/// Expression evaluation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Division by zero attempted
    #[error("Division by zero")]
    DivisionByZero,
    /// Result overflowed (infinity)
    #[error("Overflow: result exceeds maximum value")]
    Overflow,
    /// Invalid expression syntax
    #[error("Invalid expression: {0}")]
    ParseError(String),
    /// Empty expression provided
    #[error("Empty expression")]
    EmptyExpression,
    /// Invalid result (NaN or other)
    #[error("Invalid result: {0}")]
    InvalidResult(String),
}

/// A scientific function was applied outside of its domain.
///
/// The display text of each variant is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Square root of a negative number
    #[error("Cannot calculate square root of negative number")]
    NegativeSquareRoot,
    /// Reciprocal of zero
    #[error("Cannot divide by zero")]
    ZeroReciprocal,
    /// Logarithm of zero or a negative number
    #[error("{message}")]
    NonPositiveLogarithm {
        /// Function symbol (`log` or `ln`)
        function: &'static str,
        /// User-facing message
        message: &'static str,
    },
    /// Any other non-finite result
    #[error("Result of {function} is not a finite number")]
    NonFinite {
        /// Function symbol
        function: &'static str,
    },
}
