//! Core error types for the rebalancer.
//!
//! The valuation and optimizer functions never fail: degenerate numeric input
//! yields a neutral result. Errors only arise while validating or editing a
//! user supplied input bundle.

use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the rebalancer.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fund '{0}' not found")]
    FundNotFound(String),

    #[error("Country '{0}' not found")]
    CountryNotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Validation errors for user input.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("{subject} must sum to 100% (current: {total}%)")]
    PercentageSum { subject: String, total: Decimal },

    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: String, value: Decimal },

    #[error("{field} must not exceed {limit} (got {value})")]
    AmountTooLarge {
        field: String,
        value: Decimal,
        limit: Decimal,
    },

    #[error("Growth investment of {budget} in steps of {step} needs more than {limit} optimizer steps")]
    TooManySteps {
        budget: Decimal,
        step: Decimal,
        limit: Decimal,
    },

    #[error("Invalid amount expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },
}
