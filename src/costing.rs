//! # Cost Aggregator
//!
//! Derives the cost view of a recipe from its line items, their attached
//! purchases and the portion count. Nothing here mutates state; callers
//! recompute by calling [`summarize`] after every edit.

use log::debug;
use serde::Serialize;
use std::fmt;

use crate::recipe_model::{RawAmount, RecipeLineItem, PLACEHOLDER};

/// Decimal places used when displaying a single line item cost
pub const LINE_COST_DECIMALS: usize = 0;
/// Decimal places used when displaying totals and cost per portion
pub const TOTAL_COST_DECIMALS: usize = 2;

/// A derived cost that may be undefined
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CostValue {
    Amount(f64),
    Undefined,
}

/// Cost view of a whole recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    /// One entry per line item, in table order
    pub line_costs: Vec<CostValue>,
    /// Sum of every defined line cost
    pub total_cost: f64,
    pub cost_per_portion: CostValue,
}

impl CostValue {
    pub fn amount(&self) -> Option<f64> {
        match self {
            CostValue::Amount(value) => Some(*value),
            CostValue::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, CostValue::Amount(_))
    }

    /// Format with a fixed number of decimals, or the placeholder
    pub fn format(&self, decimals: usize) -> String {
        match self {
            CostValue::Amount(value) => format!("{:.*}", decimals, value),
            CostValue::Undefined => PLACEHOLDER.to_string(),
        }
    }
}

impl fmt::Display for CostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(TOTAL_COST_DECIMALS))
    }
}

/// Cost of one line item: unit price of its purchase times its weight.
///
/// Undefined when no purchase is attached, the purchase has no usable price or
/// package weight, or the row weight is not a number.
pub fn line_item_cost(item: &RecipeLineItem) -> CostValue {
    let unit_price = match item.purchase.as_ref().and_then(|p| p.unit_price()) {
        Some(unit_price) => unit_price,
        None => return CostValue::Undefined,
    };
    match item.weight_value() {
        Some(weight) => CostValue::Amount(unit_price * weight),
        None => CostValue::Undefined,
    }
}

/// Sum of all defined line costs; undefined rows count as zero
pub fn total_cost(items: &[RecipeLineItem]) -> f64 {
    items
        .iter()
        .filter_map(|item| line_item_cost(item).amount())
        .fold(0.0, |total, cost| total + cost)
}

/// Total cost divided by the portion count; undefined for a zero, missing or non-numeric portion
pub fn cost_per_portion(total: f64, portion: &RawAmount) -> CostValue {
    match portion.positive_value() {
        Some(portions) if total.is_finite() => CostValue::Amount(total / portions),
        _ => CostValue::Undefined,
    }
}

/// Compute the full cost view
///
/// # Examples
///
/// ```rust
/// use recipe_costing::costing::summarize;
/// use recipe_costing::recipe_model::{Purchase, RawAmount, RecipeLineItem};
///
/// let flour = Purchase::new("p-1", "flour").with_price(128.0).with_weight(1024.0);
/// let items = vec![
///     RecipeLineItem::new("flour").with_weight(400.0).with_purchase(flour),
///     RecipeLineItem::new("water").with_weight(350.0),
/// ];
/// let summary = summarize(&items, &RawAmount::parse("5"));
///
/// assert_eq!(summary.total_cost, 50.0);
/// assert_eq!(summary.per_portion_label(), "10.00");
/// assert_eq!(summary.line_cost_labels(), vec!["50", "--"]);
/// ```
pub fn summarize(items: &[RecipeLineItem], portion: &RawAmount) -> CostSummary {
    let line_costs: Vec<CostValue> = items.iter().map(line_item_cost).collect();
    // Folded from +0.0: an empty f64 sum is -0.0 and would display as "-0.00"
    let total_cost = line_costs
        .iter()
        .filter_map(|cost| cost.amount())
        .fold(0.0, |total, cost| total + cost);
    let cost_per_portion = cost_per_portion(total_cost, portion);

    debug!(
        "Cost summary: {} of {} rows priced, total {:.2}, per portion {}",
        line_costs.iter().filter(|cost| cost.is_defined()).count(),
        line_costs.len(),
        total_cost,
        cost_per_portion
    );

    CostSummary {
        line_costs,
        total_cost,
        cost_per_portion,
    }
}

impl CostSummary {
    pub fn line_cost_labels(&self) -> Vec<String> {
        self.line_costs
            .iter()
            .map(|cost| cost.format(LINE_COST_DECIMALS))
            .collect()
    }

    pub fn total_label(&self) -> String {
        CostValue::Amount(self.total_cost).format(TOTAL_COST_DECIMALS)
    }

    pub fn per_portion_label(&self) -> String {
        self.cost_per_portion.format(TOTAL_COST_DECIMALS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_model::Purchase;

    fn priced(name: &str, weight: f64, price: f64, package: f64) -> RecipeLineItem {
        RecipeLineItem::new(name)
            .with_weight(weight)
            .with_purchase(Purchase::new(name, name).with_price(price).with_weight(package))
    }

    #[test]
    fn test_line_item_cost() {
        let butter = priced("butter", 200.0, 250.0, 500.0);
        assert_eq!(line_item_cost(&butter), CostValue::Amount(100.0));
    }

    #[test]
    fn test_line_item_without_purchase_is_undefined() {
        let item = RecipeLineItem::new("water").with_weight(300.0);
        assert_eq!(line_item_cost(&item), CostValue::Undefined);
        assert_eq!(line_item_cost(&item).format(0), "--");
    }

    #[test]
    fn test_zero_package_weight_is_undefined() {
        let item = priced("salt", 10.0, 20.0, 0.0);
        assert_eq!(line_item_cost(&item), CostValue::Undefined);
    }

    #[test]
    fn test_row_without_weight_is_undefined() {
        let item = RecipeLineItem::new("eggs")
            .with_weight_text("")
            .with_purchase(Purchase::new("e", "eggs").with_price(60.0).with_weight(10.0));
        assert_eq!(line_item_cost(&item), CostValue::Undefined);
    }

    #[test]
    fn test_total_skips_undefined_rows() {
        let items = vec![
            priced("flour", 512.0, 64.0, 1024.0),
            RecipeLineItem::new("water").with_weight(350.0),
            priced("yeast", 8.0, 32.0, 128.0),
        ];
        assert_eq!(total_cost(&items), 34.0);
    }

    #[test]
    fn test_cost_per_portion() {
        assert_eq!(cost_per_portion(30.0, &RawAmount::parse("4")), CostValue::Amount(7.5));
        assert_eq!(cost_per_portion(30.0, &RawAmount::parse("0")), CostValue::Undefined);
        assert_eq!(cost_per_portion(30.0, &RawAmount::parse("four")), CostValue::Undefined);
        assert_eq!(cost_per_portion(30.0, &RawAmount::Empty), CostValue::Undefined);
    }

    #[test]
    fn test_summary_labels() {
        let items = vec![
            priced("flour", 333.0, 10.0, 1000.0),
            RecipeLineItem::new("water").with_weight(200.0),
        ];
        let summary = summarize(&items, &RawAmount::parse("3"));
        assert_eq!(summary.line_cost_labels(), vec!["3", "--"]);
        assert_eq!(summary.total_label(), "3.33");
        assert_eq!(summary.per_portion_label(), "1.11");
    }

    #[test]
    fn test_unpriced_recipe_totals_positive_zero() {
        let items = vec![RecipeLineItem::new("water").with_weight(300.0)];
        assert!(total_cost(&items).is_sign_positive());

        let summary = summarize(&items, &RawAmount::parse("4"));
        assert!(summary.total_cost.is_sign_positive());
        assert_eq!(summary.total_label(), "0.00");
        assert_eq!(summary.per_portion_label(), "0.00");
        assert_eq!(
            serde_json::to_string(&summary).unwrap(),
            r#"{"lineCosts":[null],"totalCost":0.0,"costPerPortion":0.0}"#
        );
    }

    #[test]
    fn test_summary_serializes_placeholder_as_null() {
        let summary = summarize(&[RecipeLineItem::new("water")], &RawAmount::Empty);
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["lineCosts"][0], serde_json::Value::Null);
        assert_eq!(value["totalCost"], 0.0);
    }
}
