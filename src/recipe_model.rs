//! # Recipe Data Model
//!
//! This module defines the data structures for recipes, their weighted line
//! items and the purchase records that price them. Numeric form fields are kept
//! as [`RawAmount`] so partially typed input survives until computation time.
//!
//! ## Core Concepts
//!
//! - **Line item**: one ingredient row with a weight, a unit and a ratio
//! - **Ratio**: the row's weight as a percentage of the whole batch
//! - **Purchase**: a priced, weighed package used to derive unit cost
//! - **Portion**: number of servings the batch yields
//!
//! ## Usage
//!
//! ```rust
//! use recipe_costing::recipe_model::{Purchase, RecipeLineItem, WeightUnit};
//!
//! let butter = Purchase::new("p-1", "butter").with_price(250.0).with_weight(500.0);
//! let item = RecipeLineItem::new("butter")
//!     .with_weight(200.0)
//!     .with_unit(WeightUnit::Grams)
//!     .with_purchase(butter);
//!
//! assert_eq!(item.weight_value(), Some(200.0));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const PLACEHOLDER: &str = "--";

/// A numeric form field as typed by the user
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawAmount {
    /// Nothing entered yet
    #[default]
    Empty,
    /// Text that is not a non-negative number
    InvalidText(String),
    /// A finite, non-negative number
    Valid(f64),
}

/// Line item weights use the same representation as any other numeric field
pub type RawWeight = RawAmount;

/// Unit the line item weight is entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "g")]
    Grams,
    #[serde(rename = "ml")]
    Milliliters,
}

/// Share of the batch weight held by one line item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatioValue {
    /// Percentage, 0-100
    Percent(f64),
    /// Degenerate ratio (zero total, missing weight); shown as a placeholder
    Undefined,
}

/// A priced, weighed package of a raw ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub ingredient_type: String,
    #[serde(default)]
    pub ingredient_type_name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub price: RawAmount,
    #[serde(default)]
    pub weight: RawAmount,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub purchase_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One ingredient row of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLineItem {
    /// Position of the row in the table
    #[serde(default)]
    pub order: u32,

    /// Display name of the row (e.g., "flour", "butter")
    #[serde(default)]
    pub name: String,

    /// Weight as entered
    #[serde(default)]
    pub original_weight: RawWeight,

    #[serde(default)]
    pub original_weight_unit: WeightUnit,

    /// Percentage of the total batch weight
    #[serde(default)]
    pub ratio: RatioValue,

    /// Purchase record providing the unit price
    #[serde(default)]
    pub purchase: Option<Purchase>,
}

/// Lifecycle state of a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStatus {
    Active,
    Archived,
    Pending,
}

/// Free-form label attached to recipes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TagStatus>,
}

/// A complete recipe document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub id: String,
    pub recipe_name: String,
    pub recipe_items: Vec<RecipeLineItem>,
    #[serde(default)]
    pub portion: RawAmount,
    /// Oven top heat in °C, as typed
    #[serde(default)]
    pub top_temperature: String,
    /// Oven bottom heat in °C, as typed
    #[serde(default)]
    pub bottom_temperature: String,
    /// Baking time in minutes, as typed
    #[serde(default)]
    pub baking_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RawAmount {
    /// Parse text typed into a numeric field
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return RawAmount::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => RawAmount::Valid(value),
            _ => RawAmount::InvalidText(text.to_string()),
        }
    }

    /// Wrap an already numeric value; negative and non-finite values are kept as invalid text
    pub fn from_value(value: f64) -> Self {
        if value.is_finite() && value >= 0.0 {
            RawAmount::Valid(value)
        } else {
            RawAmount::InvalidText(value.to_string())
        }
    }

    /// The numeric value, if any
    pub fn value(&self) -> Option<f64> {
        match self {
            RawAmount::Valid(value) => Some(*value),
            _ => None,
        }
    }

    /// The numeric value when strictly positive
    pub fn positive_value(&self) -> Option<f64> {
        self.value().filter(|value| *value > 0.0)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, RawAmount::Valid(_))
    }
}

impl RatioValue {
    /// The percentage when defined
    pub fn percent(&self) -> Option<f64> {
        match self {
            RatioValue::Percent(value) => Some(*value),
            RatioValue::Undefined => None,
        }
    }
}

impl Default for RatioValue {
    fn default() -> Self {
        RatioValue::Percent(0.0)
    }
}

impl Purchase {
    /// Create a purchase record for an ingredient type
    pub fn new(id: &str, ingredient_type: &str) -> Self {
        Self {
            id: id.to_string(),
            ingredient_type: ingredient_type.to_string(),
            ingredient_type_name: ingredient_type.to_string(),
            brand: String::new(),
            price: RawAmount::Empty,
            weight: RawAmount::Empty,
            unit: WeightUnit::Grams.display_name().to_string(),
            purchase_date: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = RawAmount::from_value(price);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = RawAmount::from_value(weight);
        self
    }

    pub fn with_brand(mut self, brand: &str) -> Self {
        self.brand = brand.to_string();
        self
    }

    /// Price of one unit of weight; `None` when price or package weight is unusable
    pub fn unit_price(&self) -> Option<f64> {
        let price = self.price.value()?;
        let weight = self.weight.positive_value()?;
        Some(price / weight)
    }
}

impl RecipeLineItem {
    /// Create a row with a name, an empty weight and a zero ratio
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.original_weight = RawWeight::from_value(weight);
        self
    }

    /// Set the weight from raw field text
    pub fn with_weight_text(mut self, text: &str) -> Self {
        self.original_weight = RawWeight::parse(text);
        self
    }

    pub fn with_unit(mut self, unit: WeightUnit) -> Self {
        self.original_weight_unit = unit;
        self
    }

    pub fn with_ratio(mut self, percent: f64) -> Self {
        self.ratio = RatioValue::Percent(percent);
        self
    }

    pub fn with_purchase(mut self, purchase: Purchase) -> Self {
        self.purchase = Some(purchase);
        self
    }

    pub fn weight_value(&self) -> Option<f64> {
        self.original_weight.value()
    }

    pub fn has_purchase(&self) -> bool {
        self.purchase.is_some()
    }
}

impl Default for RecipeLineItem {
    fn default() -> Self {
        Self {
            order: 0,
            name: String::new(),
            original_weight: RawWeight::Empty,
            original_weight_unit: WeightUnit::Grams,
            ratio: RatioValue::Percent(0.0),
            purchase: None,
        }
    }
}

impl WeightUnit {
    pub fn display_name(&self) -> &'static str {
        match self {
            WeightUnit::Grams => "g",
            WeightUnit::Milliliters => "ml",
        }
    }
}

impl Tag {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            group: None,
            aliases: Vec::new(),
            color: None,
            icon: None,
            visible: None,
            status: None,
        }
    }

    /// Whether `query` matches the name or one of the aliases, ignoring case
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        self.name.to_lowercase() == query
            || self.aliases.iter().any(|alias| alias.to_lowercase() == query)
    }
}

impl Recipe {
    /// Create a recipe holding a single empty row
    pub fn new(recipe_name: &str) -> Self {
        Self {
            id: String::new(),
            recipe_name: recipe_name.to_string(),
            recipe_items: vec![RecipeLineItem::default()],
            portion: RawAmount::Empty,
            top_temperature: String::new(),
            bottom_temperature: String::new(),
            baking_time: String::new(),
            note: None,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Sum of all valid line item weights
    pub fn total_weight(&self) -> f64 {
        crate::ratio::total_weight(&self.recipe_items)
    }
}

impl Serialize for RawAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RawAmount::Empty => serializer.serialize_str(""),
            RawAmount::InvalidText(text) => serializer.serialize_str(text),
            RawAmount::Valid(value) => serializer.serialize_f64(*value),
        }
    }
}

/// Stored documents carry numeric fields either as numbers or as strings
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for RawAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(value) => RawAmount::from_value(value),
            NumberOrText::Text(text) => RawAmount::parse(&text),
        })
    }
}

impl Serialize for RatioValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RatioValue::Percent(value) => serializer.serialize_f64(*value),
            RatioValue::Undefined => serializer.serialize_str(PLACEHOLDER),
        }
    }
}

impl<'de> Deserialize<'de> for RatioValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ratio = match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(value) => Some(value),
            NumberOrText::Text(text) => text.trim().parse::<f64>().ok(),
        };
        Ok(ratio
            .filter(|value| value.is_finite())
            .map(RatioValue::Percent)
            .unwrap_or(RatioValue::Undefined))
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAmount::Empty => Ok(()),
            RawAmount::InvalidText(text) => write!(f, "{}", text),
            RawAmount::Valid(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{}", value)
                }
            }
        }
    }
}

impl fmt::Display for RatioValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatioValue::Percent(value) => write!(f, "{}%", value),
            RatioValue::Undefined => write!(f, "{}", PLACEHOLDER),
        }
    }
}

impl fmt::Display for RecipeLineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.original_weight {
            RawAmount::Valid(_) => write!(
                f,
                "{} {} {}",
                self.original_weight,
                self.original_weight_unit.display_name(),
                self.name
            )?,
            _ => write!(f, "{} {}", PLACEHOLDER, self.name)?,
        }
        write!(f, " ({})", self.ratio)
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} items, {} portions)",
            self.recipe_name,
            self.recipe_items.len(),
            self.portion.value().map(|p| p.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string())
        )?;
        for item in &self.recipe_items {
            writeln!(f, "  • {}", item)?;
        }
        Ok(())
    }
}
