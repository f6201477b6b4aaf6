//! Recipe editing session.
//!
//! A [`RecipeForm`] owns the in-memory state of one recipe being edited: its
//! rows, the ratio lock and the bake settings. Structural edits keep at least
//! one row; committed weight edits go through the ratio reconciler; costs and
//! ratio labels are pulled on demand.

use log::{debug, info};

use crate::costing::{summarize, CostSummary};
use crate::errors::FormError;
use crate::expression_patterns::WEIGHT_INPUT_REGEX;
use crate::ratio::{ratio_labels, reconcile, RatioLock, Reconciliation, SkipReason};
use crate::recipe_model::{
    Purchase, RatioValue, RawAmount, RawWeight, Recipe, RecipeLineItem, Tag, WeightUnit,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeForm {
    recipe: Recipe,
    lock: RatioLock,
}

impl RecipeForm {
    /// A blank form with a single empty row
    pub fn new(recipe_name: &str) -> Self {
        Self {
            recipe: Recipe::new(recipe_name),
            lock: RatioLock::Unlocked,
        }
    }

    /// Start editing an existing recipe
    pub fn from_recipe(mut recipe: Recipe) -> Self {
        if recipe.recipe_items.is_empty() {
            recipe.recipe_items.push(RecipeLineItem::default());
        }
        let mut form = Self {
            recipe,
            lock: RatioLock::Unlocked,
        };
        form.renumber();
        form
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Hand the edited recipe back for saving
    pub fn into_recipe(self) -> Recipe {
        self.recipe
    }

    pub fn items(&self) -> &[RecipeLineItem] {
        &self.recipe.recipe_items
    }

    pub fn lock(&self) -> RatioLock {
        self.lock
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.lock = RatioLock::from_locked(locked);
        info!("Ratio lock set to {:?}", self.lock);
    }

    pub fn toggle_lock(&mut self) -> RatioLock {
        self.set_locked(!self.lock.is_locked());
        self.lock
    }

    /// Append an empty row and return its index
    pub fn add_item(&mut self) -> usize {
        self.recipe.recipe_items.push(RecipeLineItem::default());
        self.renumber();
        self.recipe.recipe_items.len() - 1
    }

    /// Remove a row; the last remaining row cannot be removed
    pub fn remove_item(&mut self, index: usize) -> Result<RecipeLineItem, FormError> {
        self.check_index(index)?;
        if self.recipe.recipe_items.len() == 1 {
            return Err(FormError::LastItem);
        }
        let removed = self.recipe.recipe_items.remove(index);
        self.renumber();
        debug!("Removed row {} ('{}')", index, removed.name);
        Ok(removed)
    }

    /// Move a row from `from` to `to`, shifting the rows in between
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), FormError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from != to {
            let item = self.recipe.recipe_items.remove(from);
            self.recipe.recipe_items.insert(to, item);
            self.renumber();
        }
        Ok(())
    }

    pub fn set_item_name(&mut self, index: usize, name: &str) -> Result<(), FormError> {
        self.item_mut(index)?.name = name.to_string();
        Ok(())
    }

    pub fn set_item_unit(&mut self, index: usize, unit: WeightUnit) -> Result<(), FormError> {
        self.item_mut(index)?.original_weight_unit = unit;
        Ok(())
    }

    /// Record weight text as it is typed; nothing is reconciled
    pub fn set_weight_text(&mut self, index: usize, text: &str) -> Result<(), FormError> {
        self.item_mut(index)?.original_weight = RawWeight::parse(text);
        Ok(())
    }

    /// Commit a weight edit (field blur) and reconcile with the current lock.
    ///
    /// Text that is not a plain, non-zero digit run is ignored and the form
    /// keeps its prior state.
    pub fn commit_weight(&mut self, index: usize, text: &str) -> Result<Reconciliation, FormError> {
        self.check_index(index)?;
        let trimmed = text.trim();
        if trimmed.is_empty() || !WEIGHT_INPUT_REGEX.is_match(trimmed) {
            debug!("Ignoring committed weight '{}' for row {}", text, index);
            return Ok(Reconciliation::Skipped(SkipReason::RejectedWeight));
        }
        let weight = match RawWeight::parse(trimmed).value() {
            Some(weight) => weight,
            None => return Ok(Reconciliation::Skipped(SkipReason::RejectedWeight)),
        };

        let outcome = reconcile(&mut self.recipe.recipe_items, index, weight, self.lock);
        debug!("Committed weight {} on row {}: {:?}", weight, index, outcome);
        Ok(outcome)
    }

    /// Set a row's ratio directly, the anchor used in locked mode
    pub fn set_ratio(&mut self, index: usize, percent: f64) -> Result<(), FormError> {
        self.item_mut(index)?.ratio = if percent.is_finite() {
            RatioValue::Percent(percent)
        } else {
            RatioValue::Undefined
        };
        Ok(())
    }

    pub fn attach_purchase(&mut self, index: usize, purchase: Purchase) -> Result<(), FormError> {
        let item = self.item_mut(index)?;
        debug!("Attaching purchase '{}' to row '{}'", purchase.id, item.name);
        item.purchase = Some(purchase);
        Ok(())
    }

    pub fn detach_purchase(&mut self, index: usize) -> Result<Option<Purchase>, FormError> {
        Ok(self.item_mut(index)?.purchase.take())
    }

    pub fn set_portion(&mut self, text: &str) {
        self.recipe.portion = RawAmount::parse(text);
    }

    pub fn set_bake_settings(&mut self, top_temperature: &str, bottom_temperature: &str, baking_time: &str) {
        self.recipe.top_temperature = top_temperature.trim().to_string();
        self.recipe.bottom_temperature = bottom_temperature.trim().to_string();
        self.recipe.baking_time = baking_time.trim().to_string();
    }

    pub fn set_note(&mut self, note: &str) {
        let note = note.trim();
        self.recipe.note = if note.is_empty() { None } else { Some(note.to_string()) };
    }

    /// Attach a tag unless one with the same name is already present
    pub fn add_tag(&mut self, tag: Tag) -> bool {
        if self.recipe.tags.iter().any(|existing| existing.matches(&tag.name)) {
            return false;
        }
        self.recipe.tags.push(tag);
        true
    }

    /// Ratio column as displayed, computed against the live total
    pub fn ratio_labels(&self) -> Vec<String> {
        ratio_labels(&self.recipe.recipe_items)
    }

    /// Cost view of the current state
    pub fn cost_summary(&self) -> CostSummary {
        summarize(&self.recipe.recipe_items, &self.recipe.portion)
    }

    fn check_index(&self, index: usize) -> Result<(), FormError> {
        let len = self.recipe.recipe_items.len();
        if index >= len {
            return Err(FormError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut RecipeLineItem, FormError> {
        self.check_index(index)?;
        Ok(&mut self.recipe.recipe_items[index])
    }

    fn renumber(&mut self) {
        for (position, item) in self.recipe.recipe_items.iter_mut().enumerate() {
            item.order = position as u32;
        }
    }
}
