//! # Purchase Catalog
//!
//! In-memory view over purchase records, the source of unit prices for recipe
//! line items. Fetching the records is left to the caller; the catalog only
//! indexes and groups what it is given.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error_tracking::AppError;
use crate::recipe_model::Purchase;

/// Purchases sharing one ingredient type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseGroup {
    pub ingredient_type: String,
    pub purchases: Vec<Purchase>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseCatalog {
    purchases: Vec<Purchase>,
}

impl PurchaseCatalog {
    pub fn new(purchases: Vec<Purchase>) -> Self {
        info!("Purchase catalog holds {} records", purchases.len());
        Self { purchases }
    }

    /// Parse a JSON array of purchase records
    pub fn from_json_str(data: &str) -> Result<Self> {
        let purchases: Vec<Purchase> =
            serde_json::from_str(data).context("Failed to parse purchase catalog")?;
        Ok(Self::new(purchases))
    }

    /// Load a JSON array of purchase records from disk
    pub fn load_json(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read purchase catalog {}", path.display()))?;
        Self::from_json_str(&data)
    }

    pub fn len(&self) -> usize {
        self.purchases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.purchases.is_empty()
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    pub fn find(&self, id: &str) -> Option<&Purchase> {
        self.purchases.iter().find(|purchase| purchase.id == id)
    }

    /// Like [`find`](Self::find) but reports a missing record as `NOT_FOUND`
    pub fn require(&self, id: &str) -> Result<&Purchase, AppError> {
        self.find(id).ok_or_else(|| AppError::not_found("Purchase", id))
    }

    pub fn for_ingredient_type(&self, ingredient_type: &str) -> Vec<&Purchase> {
        let matches: Vec<&Purchase> = self
            .purchases
            .iter()
            .filter(|purchase| purchase.ingredient_type == ingredient_type)
            .collect();
        debug!("{} purchases for ingredient type '{}'", matches.len(), ingredient_type);
        matches
    }

    /// Distinct ingredient types, in the order they first appear
    pub fn ingredient_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for purchase in &self.purchases {
            if !types.contains(&purchase.ingredient_type.as_str()) {
                types.push(&purchase.ingredient_type);
            }
        }
        types
    }

    /// Purchases grouped by ingredient type, groups in first-seen order
    pub fn grouped_by_ingredient_type(&self) -> Vec<PurchaseGroup> {
        let mut groups: Vec<PurchaseGroup> = Vec::new();
        for purchase in &self.purchases {
            match groups
                .iter_mut()
                .find(|group| group.ingredient_type == purchase.ingredient_type)
            {
                Some(group) => group.purchases.push(purchase.clone()),
                None => groups.push(PurchaseGroup {
                    ingredient_type: purchase.ingredient_type.clone(),
                    purchases: vec![purchase.clone()],
                }),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_tracking::ErrorCode;

    fn catalog() -> PurchaseCatalog {
        PurchaseCatalog::new(vec![
            Purchase::new("p1", "flour").with_brand("Mill A").with_price(50.0).with_weight(1000.0),
            Purchase::new("p2", "butter").with_price(120.0).with_weight(250.0),
            Purchase::new("p3", "flour").with_brand("Mill B").with_price(65.0).with_weight(1000.0),
        ])
    }

    #[test]
    fn test_find_and_require() {
        let catalog = catalog();
        assert_eq!(catalog.find("p2").map(|p| p.ingredient_type.as_str()), Some("butter"));
        assert!(catalog.find("nope").is_none());

        let err = catalog.require("nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Purchase not found: nope");
    }

    #[test]
    fn test_grouping_keeps_first_seen_order() {
        let groups = catalog().grouped_by_ingredient_type();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].ingredient_type, "flour");
        assert_eq!(groups[0].purchases.len(), 2);
        assert_eq!(groups[1].ingredient_type, "butter");
    }

    #[test]
    fn test_for_ingredient_type() {
        let catalog = catalog();
        let flour: Vec<_> = catalog.for_ingredient_type("flour").iter().map(|p| p.brand.clone()).collect();
        assert_eq!(flour, vec!["Mill A", "Mill B"]);
        assert!(catalog.for_ingredient_type("eggs").is_empty());
        assert_eq!(catalog.ingredient_types(), vec!["flour", "butter"]);
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"[
            {"id": "a", "ingredientType": "milk", "price": "80", "weight": "1000", "unit": "ml"}
        ]"#;
        let catalog = PurchaseCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("a").and_then(|p| p.unit_price()), Some(0.08));
        assert!(PurchaseCatalog::from_json_str("{").is_err());
    }
}
