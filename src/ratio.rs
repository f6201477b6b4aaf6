//! # Ratio Reconciler
//!
//! Keeps every line item's weight and its share of the batch consistent when a
//! weight edit is committed. Two modes:
//!
//! - **Unlocked**: weights are free, every ratio is recomputed from the new total
//! - **Locked**: ratios are held, the edited row's weight-to-ratio factor is
//!   propagated to every other row's weight
//!
//! Degenerate math (zero totals, undefined anchors) never fails; it resolves to
//! [`RatioValue::Undefined`] or leaves rows untouched.

use log::{debug, info, warn};

use crate::recipe_model::{RatioValue, RawWeight, RecipeLineItem};

/// Reconciliation mode selected for one editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatioLock {
    #[default]
    Unlocked,
    Locked,
}

/// Why a committed weight edit was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Weight is zero, negative, fractional or not finite
    RejectedWeight,
    /// No row at the edited index
    IndexOutOfRange,
}

/// Outcome of [`reconcile`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Ratios were recomputed from the new total
    RatiosUpdated,
    /// Sibling weights were rescaled from the locked anchor
    WeightsRescaled,
    /// The edited weight was stored but the anchor ratio is zero or undefined,
    /// so sibling weights were left as they were
    Degenerate,
    /// Nothing changed
    Skipped(SkipReason),
}

impl RatioLock {
    pub fn from_locked(locked: bool) -> Self {
        if locked {
            RatioLock::Locked
        } else {
            RatioLock::Unlocked
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, RatioLock::Locked)
    }

    pub fn toggled(&self) -> Self {
        Self::from_locked(!self.is_locked())
    }
}

impl Reconciliation {
    pub fn is_applied(&self) -> bool {
        !matches!(self, Reconciliation::Skipped(_))
    }
}

/// Sum of every valid line item weight
pub fn total_weight(items: &[RecipeLineItem]) -> f64 {
    items
        .iter()
        .filter_map(|item| item.weight_value())
        .fold(0.0, |total, weight| total + weight)
}

/// Percentage of `total` held by `weight`, rounded to the nearest integer
pub fn ratio_for(weight: f64, total: f64) -> RatioValue {
    if total <= 0.0 || !total.is_finite() || !weight.is_finite() {
        return RatioValue::Undefined;
    }
    RatioValue::Percent((weight / total * 100.0).round())
}

/// Ratio labels computed against the live total, as the ingredient table shows them
pub fn ratio_labels(items: &[RecipeLineItem]) -> Vec<String> {
    let total = total_weight(items);
    items
        .iter()
        .map(|item| match item.weight_value() {
            Some(weight) => ratio_for(weight, total).to_string(),
            None => RatioValue::Undefined.to_string(),
        })
        .collect()
}

/// Apply a committed weight edit to the row at `edited_index`.
///
/// `new_weight` must be a positive whole number; anything else, or an index
/// outside `items`, leaves the rows untouched and reports
/// [`Reconciliation::Skipped`].
///
/// # Examples
///
/// ```rust
/// use recipe_costing::ratio::{reconcile, RatioLock};
/// use recipe_costing::recipe_model::{RatioValue, RecipeLineItem};
///
/// let mut items = vec![
///     RecipeLineItem::new("flour").with_weight(200.0),
///     RecipeLineItem::new("milk").with_weight(300.0),
///     RecipeLineItem::new("sugar").with_weight(100.0),
/// ];
/// reconcile(&mut items, 2, 500.0, RatioLock::Unlocked);
///
/// assert_eq!(items[0].ratio, RatioValue::Percent(20.0));
/// assert_eq!(items[2].ratio, RatioValue::Percent(50.0));
/// ```
pub fn reconcile(
    items: &mut [RecipeLineItem],
    edited_index: usize,
    new_weight: f64,
    lock: RatioLock,
) -> Reconciliation {
    if !is_acceptable_weight(new_weight) {
        warn!("Ignoring weight edit with unusable value {}", new_weight);
        return Reconciliation::Skipped(SkipReason::RejectedWeight);
    }
    if edited_index >= items.len() {
        warn!(
            "Ignoring weight edit for row {} of a {}-row recipe",
            edited_index,
            items.len()
        );
        return Reconciliation::Skipped(SkipReason::IndexOutOfRange);
    }

    items[edited_index].original_weight = RawWeight::Valid(new_weight);

    match lock {
        RatioLock::Unlocked => {
            recompute_ratios(items);
            Reconciliation::RatiosUpdated
        }
        RatioLock::Locked => rescale_siblings(items, edited_index, new_weight),
    }
}

fn is_acceptable_weight(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0 && weight.fract() == 0.0
}

/// Set every ratio from the current weights
pub fn recompute_ratios(items: &mut [RecipeLineItem]) {
    let total = total_weight(items);
    debug!("Recomputing ratios for {} rows, total weight {}", items.len(), total);

    for item in items.iter_mut() {
        item.ratio = match item.weight_value() {
            Some(weight) => ratio_for(weight, total),
            None => RatioValue::Undefined,
        };
    }
}

fn rescale_siblings(
    items: &mut [RecipeLineItem],
    edited_index: usize,
    new_weight: f64,
) -> Reconciliation {
    let anchor = match items[edited_index].ratio.percent() {
        Some(anchor) if anchor > 0.0 && anchor.is_finite() => anchor,
        _ => {
            warn!(
                "Row {} has no usable ratio to anchor on, sibling weights unchanged",
                edited_index
            );
            return Reconciliation::Degenerate;
        }
    };

    let factor = new_weight / anchor;
    for (index, item) in items.iter_mut().enumerate() {
        if index == edited_index {
            continue;
        }
        if let Some(ratio) = item.ratio.percent() {
            item.original_weight = RawWeight::from_value((factor * ratio).round());
        }
    }

    info!(
        "Rescaled {} sibling weights at {} per percent",
        items.len() - 1,
        factor
    );
    Reconciliation::WeightsRescaled
}
