//! # Integration Tests
//!
//! End-to-end checks over a stored recipe document: parse it, edit it through
//! a [`RecipeForm`], price it against a purchase catalog and save it back.

use recipe_costing::catalog::PurchaseCatalog;
use recipe_costing::recipe_form::RecipeForm;
use recipe_costing::recipe_model::{RatioValue, RawAmount, Recipe, WeightUnit};

const RECIPE_JSON: &str = r#"{
    "id": "r-1",
    "recipeName": "Brioche",
    "portion": "8",
    "topTemperature": "180",
    "bottomTemperature": "170",
    "bakingTime": "35",
    "recipeItems": [
        {"order": 0, "name": "flour", "originalWeight": "500", "originalWeightUnit": "g", "ratio": 50},
        {"order": 1, "name": "milk", "originalWeight": 200, "originalWeightUnit": "ml", "ratio": "20"},
        {"order": 2, "name": "butter", "originalWeight": "250", "ratio": 25},
        {"order": 3, "name": "sugar", "originalWeight": "50", "ratio": "--"},
        {"order": 4, "name": "vanilla", "originalWeight": "a pinch"}
    ],
    "tags": [{"id": "t-1", "name": "Viennoiserie", "aliases": ["pastry"]}]
}"#;

const CATALOG_JSON: &str = r#"[
    {"id": "p-flour", "ingredientType": "flour", "brand": "Moulin", "price": "128", "weight": "1024", "unit": "g"},
    {"id": "p-butter", "ingredientType": "butter", "price": 40, "weight": 250, "unit": "g"},
    {"id": "p-milk", "ingredientType": "milk", "price": "", "weight": "1000", "unit": "ml"}
]"#;

#[test]
fn test_stored_recipe_parses_with_stringly_fields() {
    let recipe: Recipe = serde_json::from_str(RECIPE_JSON).unwrap();

    assert_eq!(recipe.recipe_name, "Brioche");
    assert_eq!(recipe.portion, RawAmount::Valid(8.0));
    assert_eq!(recipe.recipe_items.len(), 5);
    assert_eq!(recipe.recipe_items[0].weight_value(), Some(500.0));
    assert_eq!(recipe.recipe_items[1].original_weight_unit, WeightUnit::Milliliters);
    assert_eq!(recipe.recipe_items[1].ratio, RatioValue::Percent(20.0));
    assert_eq!(recipe.recipe_items[3].ratio, RatioValue::Undefined);
    assert_eq!(
        recipe.recipe_items[4].original_weight,
        RawAmount::InvalidText("a pinch".to_string())
    );
    assert_eq!(recipe.recipe_items[4].ratio, RatioValue::Percent(0.0));
    assert!(recipe.tags[0].matches("Pastry"));
    assert_eq!(recipe.total_weight(), 1000.0);
}

#[test]
fn test_edit_price_and_save_round_trip() {
    let recipe: Recipe = serde_json::from_str(RECIPE_JSON).unwrap();
    let catalog = PurchaseCatalog::from_json_str(CATALOG_JSON).unwrap();
    let mut form = RecipeForm::from_recipe(recipe);

    // Free edit: sugar doubles, every ratio follows the new 1050 total
    form.commit_weight(3, "100").unwrap();
    assert_eq!(form.ratio_labels(), vec!["48%", "19%", "24%", "10%", "--"]);

    // Locked edit: scaling flour to 960 rescales the batch
    form.set_locked(true);
    form.commit_weight(0, "960").unwrap();
    let weights: Vec<_> = form.items().iter().map(|item| item.weight_value()).collect();
    assert_eq!(
        weights,
        vec![Some(960.0), Some(380.0), Some(480.0), Some(200.0), None]
    );

    for (row, id) in [(0, "p-flour"), (1, "p-milk"), (2, "p-butter")] {
        let purchase = catalog.require(id).unwrap().clone();
        form.attach_purchase(row, purchase).unwrap();
    }

    let summary = form.cost_summary();
    assert_eq!(summary.line_cost_labels(), vec!["120", "--", "77", "--", "--"]);
    assert_eq!(summary.total_label(), "196.80");
    assert_eq!(summary.per_portion_label(), "24.60");

    let saved = serde_json::to_string(form.recipe()).unwrap();
    let reloaded: Recipe = serde_json::from_str(&saved).unwrap();
    assert_eq!(&reloaded, form.recipe());
}

#[test]
fn test_missing_purchase_is_not_found() {
    let catalog = PurchaseCatalog::from_json_str(CATALOG_JSON).unwrap();
    let err = catalog.require("p-eggs").unwrap_err();
    assert_eq!(err.status_code, 404);
    assert_eq!(err.to_string(), "Purchase not found: p-eggs");
}
