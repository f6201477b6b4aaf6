//! # Error Types Module
//!
//! This module defines the typed errors surfaced by the calculator and the
//! recipe editing session. Ratio and cost computations never fail; they
//! resolve degenerate math to a placeholder instead.

use thiserror::Error;

/// Errors raised while evaluating a calculator expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// The expression is malformed (empty, starts or ends with a non-digit,
    /// consecutive operators, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A divisor evaluated to zero
    #[error("Division by zero")]
    DivisionByZero,
}

impl CalcError {
    pub(crate) fn invalid(reason: &str) -> Self {
        CalcError::InvalidInput(reason.to_string())
    }
}

/// Errors raised by structural edits on a recipe form
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    /// A recipe always keeps at least one line item
    #[error("Cannot remove the last line item of a recipe")]
    LastItem,

    /// The referenced row does not exist
    #[error("Line item index {index} is out of range (recipe has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },
}
