//! Item catalogue rules: categories, conditions, and verification flags.

use serde::{Deserialize, Serialize};

/// Items identified below this confidence need a human to confirm them.
pub const VERIFICATION_CONFIDENCE_THRESHOLD: f64 = 0.8;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Closed set of item categories used by the moving/packing trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Furniture,
    Electronics,
    Appliances,
    Kitchenware,
    Clothing,
    #[serde(rename = "Books & Documents")]
    BooksAndDocuments,
    #[serde(rename = "Artwork & Decorations")]
    ArtworkAndDecorations,
    #[serde(rename = "Sports Equipment")]
    SportsEquipment,
    #[serde(rename = "Tools & Hardware")]
    ToolsAndHardware,
    #[serde(rename = "Personal Items")]
    PersonalItems,
    #[serde(rename = "Fragile Items")]
    FragileItems,
    Other,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 12] = [
        ItemCategory::Furniture,
        ItemCategory::Electronics,
        ItemCategory::Appliances,
        ItemCategory::Kitchenware,
        ItemCategory::Clothing,
        ItemCategory::BooksAndDocuments,
        ItemCategory::ArtworkAndDecorations,
        ItemCategory::SportsEquipment,
        ItemCategory::ToolsAndHardware,
        ItemCategory::PersonalItems,
        ItemCategory::FragileItems,
        ItemCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ItemCategory::Furniture => "Furniture",
            ItemCategory::Electronics => "Electronics",
            ItemCategory::Appliances => "Appliances",
            ItemCategory::Kitchenware => "Kitchenware",
            ItemCategory::Clothing => "Clothing",
            ItemCategory::BooksAndDocuments => "Books & Documents",
            ItemCategory::ArtworkAndDecorations => "Artwork & Decorations",
            ItemCategory::SportsEquipment => "Sports Equipment",
            ItemCategory::ToolsAndHardware => "Tools & Hardware",
            ItemCategory::PersonalItems => "Personal Items",
            ItemCategory::FragileItems => "Fragile Items",
            ItemCategory::Other => "Other",
        }
    }

    /// Exact-label lookup.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

/// Observed physical condition of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCondition {
    Excellent,
    Good,
    Fair,
    Poor,
    Damaged,
}

impl ItemCondition {
    pub const ALL: [ItemCondition; 5] = [
        ItemCondition::Excellent,
        ItemCondition::Good,
        ItemCondition::Fair,
        ItemCondition::Poor,
        ItemCondition::Damaged,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemCondition::Excellent => "excellent",
            ItemCondition::Good => "good",
            ItemCondition::Fair => "fair",
            ItemCondition::Poor => "poor",
            ItemCondition::Damaged => "damaged",
        }
    }

    /// Capitalized label for display ("Good", "Damaged").
    pub fn display_label(self) -> &'static str {
        match self {
            ItemCondition::Excellent => "Excellent",
            ItemCondition::Good => "Good",
            ItemCondition::Fair => "Fair",
            ItemCondition::Poor => "Poor",
            ItemCondition::Damaged => "Damaged",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    /// Poor and damaged items count toward damage totals.
    pub fn is_damaged(self) -> bool {
        matches!(self, ItemCondition::Poor | ItemCondition::Damaged)
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Whether an item must be flagged for manual verification.
///
/// Manual entries (`confidence == None`) are only flagged when the caller
/// asks for it.
pub fn needs_manual_verification(confidence: Option<f64>, flagged: bool) -> bool {
    flagged || confidence.is_some_and(|c| c < VERIFICATION_CONFIDENCE_THRESHOLD)
}

/// Whether an AI identification is confident enough to show as verified.
pub fn is_confident(confidence: Option<f64>) -> bool {
    confidence.is_some_and(|c| c >= VERIFICATION_CONFIDENCE_THRESHOLD)
}

/// Validate that a category label belongs to [`ItemCategory`].
pub fn validate_category(label: &str) -> Result<ItemCategory, String> {
    ItemCategory::parse(label).ok_or_else(|| format!("Invalid category '{label}'"))
}

/// Validate that a condition string belongs to [`ItemCondition`].
pub fn validate_condition(value: &str) -> Result<ItemCondition, String> {
    ItemCondition::parse(value).ok_or_else(|| {
        let names: Vec<&str> = ItemCondition::ALL.iter().map(|c| c.as_str()).collect();
        format!(
            "Invalid condition '{value}'. Must be one of: {}",
            names.join(", ")
        )
    })
}
