//! AI-assisted item identification: upload limits, time budget, and
//! normalization of the model's guesses.
//!
//! The vision model is an external collaborator. Whatever it returns is
//! coerced into the closed category/condition sets here, and a failed or
//! unparseable image yields a low-confidence placeholder instead of failing
//! the whole batch.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::{ItemCategory, ItemCondition};
use crate::error::CoreError;

/// Maximum size of a single uploaded image.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Maximum combined size of all images in one request.
pub const MAX_TOTAL_BYTES: usize = 50 * 1024 * 1024;

/// Total time the batch may spend calling the model.
pub const BATCH_BUDGET: Duration = Duration::from_secs(280);

/// Time kept in reserve for building the response.
pub const RESPONSE_RESERVE: Duration = Duration::from_secs(30);

/// Confidence assigned to a response that could not be parsed.
const UNPARSEABLE_CONFIDENCE: f64 = 0.1;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Check per-image and total upload sizes.
pub fn validate_upload_sizes(sizes: &[usize]) -> Result<(), CoreError> {
    if sizes.is_empty() {
        return Err(CoreError::Validation("No image file(s) provided".to_string()));
    }

    for (index, size) in sizes.iter().enumerate() {
        if *size > MAX_IMAGE_BYTES {
            return Err(CoreError::Validation(format!(
                "Image {} is too large (max 10MB per file)",
                index + 1
            )));
        }
    }

    if sizes.iter().sum::<usize>() > MAX_TOTAL_BYTES {
        return Err(CoreError::Validation(
            "Total image size too large (max 50MB total)".to_string(),
        ));
    }

    Ok(())
}

/// Whether another image may be started after `elapsed` of the batch.
pub fn can_start_next(elapsed: Duration) -> bool {
    BATCH_BUDGET.saturating_sub(elapsed) >= RESPONSE_RESERVE
}

// ---------------------------------------------------------------------------
// ItemGuess
// ---------------------------------------------------------------------------

/// One identification result, in the model's JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemGuess {
    pub item_name: String,
    pub category: String,
    pub condition: String,
    #[serde(default = "one")]
    pub quantity: i32,
    #[serde(default)]
    pub estimated_weight: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub estimated_value: Option<f64>,
    #[serde(default)]
    pub handling_instructions: Option<String>,
    #[serde(default)]
    pub is_fragile: bool,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub suggested_description: Option<String>,
}

fn one() -> i32 {
    1
}

impl ItemGuess {
    /// Coerce into the closed sets: unknown category becomes `Other`,
    /// unknown condition becomes `good`, confidence is clamped to [0, 1],
    /// quantity is at least 1.
    pub fn normalize(mut self) -> Self {
        if ItemCategory::parse(&self.category).is_none() {
            self.category = ItemCategory::Other.label().to_string();
        }
        if ItemCondition::parse(&self.condition).is_none() {
            self.condition = ItemCondition::Good.as_str().to_string();
        }
        self.confidence_score = if self.confidence_score.is_finite() {
            self.confidence_score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.quantity = self.quantity.max(1);
        self
    }

    /// Placeholder for a model response that was not valid JSON.
    /// `position` is 1-based.
    pub fn unparseable(position: usize) -> Self {
        Self::placeholder(
            format!("Unknown Item {position}"),
            "Unable to assess condition",
            UNPARSEABLE_CONFIDENCE,
            format!("Item {position} requiring manual identification"),
        )
    }

    /// Placeholder for an image whose model call failed outright.
    pub fn failed(position: usize) -> Self {
        Self::placeholder(
            format!("Failed to Process Image {position}"),
            "Processing failed - manual review required",
            0.0,
            format!("Image {position} could not be processed"),
        )
    }

    fn placeholder(name: String, handling: &str, confidence: f64, description: String) -> Self {
        Self {
            item_name: name,
            category: ItemCategory::Other.label().to_string(),
            condition: ItemCondition::Good.as_str().to_string(),
            quantity: 1,
            estimated_weight: Some("Unknown".to_string()),
            dimensions: Some("Unknown".to_string()),
            estimated_value: Some(0.0),
            handling_instructions: Some(handling.to_string()),
            is_fragile: false,
            confidence_score: confidence,
            suggested_description: Some(description),
        }
    }
}

/// Parse a model response for the image at 1-based `position`.
///
/// Markdown code fences are stripped first; anything that still does not
/// parse becomes [`ItemGuess::unparseable`].
pub fn parse_model_response(text: &str, position: usize) -> ItemGuess {
    let cleaned = strip_code_fences(text);
    match serde_json::from_str::<ItemGuess>(&cleaned) {
        Ok(guess) => guess.normalize(),
        Err(_) => ItemGuess::unparseable(position),
    }
}

fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Instruction sent alongside each image.
pub fn build_prompt(room_type: &str) -> String {
    let categories: Vec<&str> = ItemCategory::ALL.iter().map(|c| c.label()).collect();
    let conditions: Vec<&str> = ItemCondition::ALL.iter().map(|c| c.as_str()).collect();

    format!(
        "You are an expert in identifying household and office items for moving and packing \
services in India.\n\
Analyze this image and describe the most prominent item. The item is located in a {room_type} room.\n\
Return only JSON with these fields:\n\
itemName (basic item type plus one descriptive word, no brands), \
category (one of: {categories}), \
condition (one of: {conditions}), \
quantity (count of identical items visible), \
estimatedWeight (kilograms, e.g. '25-35 kg'), \
dimensions (centimeters), \
estimatedValue (Indian Rupees, number), \
handlingInstructions (only visible damage, marks, scratches or color loss), \
isFragile (true for glass, electronics or delicate materials), \
confidenceScore (0.0-1.0), \
suggestedDescription (short packing-list description).",
        categories = categories.join(", "),
        conditions = conditions.join(", "),
    )
}
