//! # Recipe Costing
//!
//! Computational core of a recipe-management application: a calculator for
//! quick arithmetic, the ratio reconciler that keeps ingredient weights and
//! batch percentages in sync, and the cost aggregator that prices a recipe per
//! batch and per portion from a purchase catalog.

pub mod app_config;
pub mod calculator;
pub mod calculator_pad;
pub mod catalog;
pub mod costing;
pub mod error_tracking;
pub mod errors;
pub mod expression_patterns;
pub mod ratio;
pub mod recipe_form;
pub mod recipe_model;
