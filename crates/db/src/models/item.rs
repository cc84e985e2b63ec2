//! Catalogued items belonging to a job.

use haulage_core::catalog::{needs_manual_verification, ItemCategory, ItemCondition};
use haulage_core::report::ReportItem;
use haulage_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub job_id: DbId,
    pub delivery_id: Option<i32>,
    pub item_name: String,
    pub category: String,
    pub quantity: i32,
    pub condition: String,
    pub item_value: Option<f64>,
    pub dimensions: Option<String>,
    pub weight_estimate: Option<String>,
    pub handling_instructions: Option<String>,
    pub fragile: bool,
    pub ai_confidence_score: Option<f64>,
    pub manual_verification: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Item> for ReportItem {
    fn from(item: &Item) -> Self {
        ReportItem {
            id: Some(item.id),
            item_name: item.item_name.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            condition: ItemCondition::parse(&item.condition).unwrap_or(ItemCondition::Good),
            item_value: item.item_value,
            dimensions: item.dimensions.clone(),
            weight_estimate: item.weight_estimate.clone(),
            handling_instructions: item.handling_instructions.clone(),
            fragile: item.fragile,
            ai_confidence_score: item.ai_confidence_score,
            manual_verification: item.manual_verification,
        }
    }
}

fn validate_category(value: &str) -> Result<(), ValidationError> {
    match ItemCategory::parse(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("invalid_category")),
    }
}

fn validate_condition(value: &str) -> Result<(), ValidationError> {
    match ItemCondition::parse(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("invalid_condition")),
    }
}

fn default_quantity() -> i32 {
    1
}

fn default_condition() -> String {
    ItemCondition::Good.as_str().to_string()
}

/// DTO for adding an item to a job.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateItem {
    #[validate(length(min = 1, max = 200, message = "Item name is required"))]
    pub item_name: String,
    #[validate(custom(function = "validate_category"))]
    pub category: String,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, max = 10000))]
    pub quantity: i32,
    #[serde(default = "default_condition")]
    #[validate(custom(function = "validate_condition"))]
    pub condition: String,
    #[validate(range(min = 0.0))]
    pub item_value: Option<f64>,
    pub dimensions: Option<String>,
    pub weight_estimate: Option<String>,
    pub handling_instructions: Option<String>,
    #[serde(default)]
    pub fragile: bool,
    #[validate(range(min = 0.0, max = 1.0))]
    pub ai_confidence_score: Option<f64>,
    /// Caller-requested review flag; low AI confidence sets it regardless.
    #[serde(default)]
    pub manual_verification: bool,
    #[validate(range(min = 1))]
    pub delivery_id: Option<i32>,
}

impl CreateItem {
    pub fn requires_verification(&self) -> bool {
        needs_manual_verification(self.ai_confidence_score, self.manual_verification)
    }
}

/// DTO for editing an item. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateItem {
    #[validate(length(min = 1, max = 200))]
    pub item_name: Option<String>,
    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,
    #[validate(range(min = 1, max = 10000))]
    pub quantity: Option<i32>,
    #[validate(custom(function = "validate_condition"))]
    pub condition: Option<String>,
    #[validate(range(min = 0.0))]
    pub item_value: Option<f64>,
    pub dimensions: Option<String>,
    pub weight_estimate: Option<String>,
    pub handling_instructions: Option<String>,
    pub fragile: Option<bool>,
    pub manual_verification: Option<bool>,
    #[validate(range(min = 1))]
    pub delivery_id: Option<i32>,
}
