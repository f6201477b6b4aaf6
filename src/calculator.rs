//! # Calculator Module
//!
//! Evaluates the arithmetic typed into the recipe calculator: non-negative
//! decimal numbers joined by `+ - * /`, with multiplication and division
//! binding tighter than addition and subtraction, left to right within a level.
//!
//! ## Usage
//!
//! ```rust
//! use recipe_costing::calculator::evaluate;
//!
//! assert_eq!(evaluate("2+3*4").unwrap(), 14.0);
//! assert!(evaluate("5+").is_err());
//! ```

use log::{debug, trace};
use std::fmt;

use crate::errors::CalcError;
use crate::expression_patterns::TOKEN_REGEX;

/// Binary operators understood by the calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// A lexical unit of an expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
}

impl Operator {
    /// Parse a single operator character
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Whether this operator is folded in the first (precedence) pass
    pub fn is_multiplicative(&self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }

    /// Apply the operator, refusing to divide by zero
    pub fn apply(&self, left: f64, right: f64) -> Result<f64, CalcError> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Subtract => Ok(left - right),
            Operator::Multiply => Ok(left * right),
            Operator::Divide => {
                if right == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                Ok(left / right)
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Split an expression into numerals and operators.
///
/// Characters that are neither part of a numeral nor an operator are dropped,
/// so `"2a+3"` tokenizes the same as `"2+3"`.
pub fn tokenize(expression: &str) -> Vec<Token> {
    TOKEN_REGEX
        .find_iter(expression)
        .filter_map(|m| {
            let text = m.as_str();
            match text.parse::<f64>() {
                Ok(value) => Some(Token::Number(value)),
                Err(_) => text.chars().next().and_then(Operator::from_char).map(Token::Operator),
            }
        })
        .collect()
}

/// Evaluate an arithmetic expression.
///
/// # Errors
///
/// * [`CalcError::InvalidInput`] when the expression is empty, does not start
///   and end with a digit, does not alternate numbers and operators, or
///   overflows to a non-finite result
/// * [`CalcError::DivisionByZero`] when any divisor is zero
///
/// # Examples
///
/// ```rust
/// use recipe_costing::calculator::evaluate;
/// use recipe_costing::errors::CalcError;
///
/// assert_eq!(evaluate("100/5/4"), Ok(5.0));
/// assert_eq!(evaluate("4/0"), Err(CalcError::DivisionByZero));
/// ```
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    let compact: String = expression.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.is_empty() {
        return Err(CalcError::invalid("expression is empty"));
    }
    if !compact.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(CalcError::invalid("expression must start with a digit"));
    }
    if !compact.ends_with(|c: char| c.is_ascii_digit()) {
        return Err(CalcError::invalid("expression must end with a digit"));
    }

    let mut tokens = tokenize(&compact);
    if tokens.is_empty() {
        return Err(CalcError::invalid("expression has no tokens"));
    }
    check_alternation(&tokens)?;
    trace!("Tokenized '{}' into {} tokens", compact, tokens.len());

    fold_multiplicative(&mut tokens)?;
    let result = accumulate_additive(&tokens)?;
    if !result.is_finite() {
        return Err(CalcError::invalid("result is out of range"));
    }

    debug!("Evaluated '{}' = {}", compact, result);
    Ok(result)
}

/// Tokens must read number, operator, number, ... and end on a number
fn check_alternation(tokens: &[Token]) -> Result<(), CalcError> {
    for (position, token) in tokens.iter().enumerate() {
        let expects_number = position % 2 == 0;
        match (expects_number, token) {
            (true, Token::Number(_)) | (false, Token::Operator(_)) => {}
            (true, Token::Operator(op)) => {
                return Err(CalcError::InvalidInput(format!(
                    "unexpected operator '{}' at token {}",
                    op, position
                )));
            }
            (false, Token::Number(_)) => {
                return Err(CalcError::InvalidInput(format!(
                    "missing operator before token {}",
                    position
                )));
            }
        }
    }
    if tokens.len() % 2 == 0 {
        return Err(CalcError::invalid("expression ends with an operator"));
    }
    Ok(())
}

/// First pass: collapse every `a * b` and `a / b` triple into its result.
///
/// The index is not advanced after a fold, so `a * b * c` folds left to right.
fn fold_multiplicative(tokens: &mut Vec<Token>) -> Result<(), CalcError> {
    let mut i = 1;
    while i + 1 < tokens.len() {
        match (tokens[i - 1], tokens[i], tokens[i + 1]) {
            (Token::Number(left), Token::Operator(op), Token::Number(right))
                if op.is_multiplicative() =>
            {
                let folded = op.apply(left, right)?;
                tokens.splice(i - 1..=i + 1, [Token::Number(folded)]);
            }
            _ => i += 1,
        }
    }
    Ok(())
}

/// Second pass: only `+` and `-` remain, accumulate them in order
fn accumulate_additive(tokens: &[Token]) -> Result<f64, CalcError> {
    let mut iter = tokens.iter();
    let mut accumulator = match iter.next() {
        Some(Token::Number(value)) => *value,
        _ => return Err(CalcError::invalid("expression must start with a number")),
    };

    while let Some(token) = iter.next() {
        let op = match token {
            Token::Operator(op) => *op,
            Token::Number(_) => return Err(CalcError::invalid("missing operator")),
        };
        let operand = match iter.next() {
            Some(Token::Number(value)) => *value,
            _ => return Err(CalcError::invalid("operator without operand")),
        };
        accumulator = op.apply(accumulator, operand)?;
    }

    Ok(accumulator)
}

/// Format a result for display: whole numbers without a fraction,
/// everything else with trailing zeros trimmed.
pub fn format_result(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.10}", value)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
