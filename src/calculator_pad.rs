//! # Calculator Pad
//!
//! Keypad state behind the recipe calculator: an input line built from key
//! presses and a display showing the last result or an error indicator.

use log::{debug, warn};

use crate::calculator::{evaluate, format_result, Operator};
use crate::expression_patterns::WEIGHT_INPUT_REGEX;

/// Shown in place of a result when evaluation fails
pub const ERROR_INDICATOR: &str = "Error";

/// A key on the pad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Operator(Operator),
    DecimalPoint,
    Backspace,
    Clear,
    Equals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorPad {
    input: String,
    display: String,
}

impl CalculatorPad {
    /// A closed pad: empty input and empty display
    pub fn new() -> Self {
        Self {
            input: String::new(),
            display: String::new(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// Apply a key press
    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(digit) if digit <= 9 => self.input.push(char::from(b'0' + digit)),
            Key::Digit(digit) => warn!("Ignoring out of range digit key {}", digit),
            Key::Operator(op) => self.input.push(op.symbol()),
            Key::DecimalPoint => self.input.push('.'),
            Key::Backspace => {
                self.input.pop();
            }
            Key::Clear => {
                self.input.clear();
                self.display = "0".to_string();
            }
            Key::Equals => self.calculate(),
        }
    }

    /// Replace the input with typed text; only plain digit runs are accepted
    pub fn set_input(&mut self, text: &str) -> bool {
        if !WEIGHT_INPUT_REGEX.is_match(text) {
            debug!("Rejected typed calculator input '{}'", text);
            return false;
        }
        self.input = text.to_string();
        true
    }

    /// Evaluate the current input; the input is kept either way
    pub fn calculate(&mut self) {
        self.display = match evaluate(&self.input) {
            Ok(value) => format_result(value),
            Err(err) => {
                warn!("Calculator could not evaluate '{}': {}", self.input, err);
                ERROR_INDICATOR.to_string()
            }
        };
    }

    /// Opening or closing the pad starts from scratch
    pub fn reset(&mut self) {
        self.input.clear();
        self.display.clear();
    }
}

impl Default for CalculatorPad {
    fn default() -> Self {
        Self::new()
    }
}
