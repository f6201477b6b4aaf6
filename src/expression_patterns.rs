//! # Expression Patterns Module
//!
//! This module contains the regex patterns used to tokenize calculator input
//! and to filter raw weight input.

use lazy_static::lazy_static;
use regex::Regex;

// A numeral is a run of ASCII digits with at most one decimal point; operators are single characters.
// Anything else in the input is skipped by the scan.
pub const TOKEN_PATTERN: &str = r"([0-9]+\.?[0-9]*)|[+\-*/]";

// Weight fields only accept plain digit runs when committed
pub const WEIGHT_INPUT_PATTERN: &str = r"^[0-9]*$";

lazy_static! {
    pub static ref TOKEN_REGEX: Regex =
        Regex::new(TOKEN_PATTERN).expect("Token pattern should be valid");
    pub static ref WEIGHT_INPUT_REGEX: Regex =
        Regex::new(WEIGHT_INPUT_PATTERN).expect("Weight input pattern should be valid");
}
