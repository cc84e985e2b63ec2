//! Report input model and naming rules.
//!
//! [`ReportData`] is an ephemeral snapshot of one job and its items. It is
//! built per request (from the store, or straight from a client payload) and
//! never persisted.

use serde::{Deserialize, Serialize};

use crate::catalog::{is_confident, ItemCondition};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// ReportType
// ---------------------------------------------------------------------------

/// The four report layouts, plus a catch-all for unrecognized tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Completion,
    Insurance,
    Delivery,
    Picking,
    #[serde(other)]
    Unknown,
}

impl ReportType {
    pub const SUPPORTED: [ReportType; 4] = [
        ReportType::Completion,
        ReportType::Insurance,
        ReportType::Delivery,
        ReportType::Picking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::Completion => "completion",
            ReportType::Insurance => "insurance",
            ReportType::Delivery => "delivery",
            ReportType::Picking => "picking",
            ReportType::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Self {
        Self::SUPPORTED
            .into_iter()
            .find(|t| t.as_str() == value)
            .unwrap_or(ReportType::Unknown)
    }

    /// Title printed under the company header.
    pub fn title(self) -> &'static str {
        match self {
            ReportType::Completion => "Job Completion Report",
            ReportType::Insurance => "Insurance Claim Report",
            ReportType::Delivery => "Delivery Receipt",
            ReportType::Picking => "Picking List",
            ReportType::Unknown => "Inventory Report",
        }
    }

    /// Leading part of the download filename.
    pub fn file_label(self) -> &'static str {
        match self {
            ReportType::Completion => "Completion_Report",
            ReportType::Insurance => "Insurance_Report",
            ReportType::Delivery => "Delivery_Receipt",
            ReportType::Picking => "Picking_List",
            ReportType::Unknown => "Report",
        }
    }
}

/// `{Label}_{job_number}_{YYYY-MM-DD}.pdf`, with spaces replaced by `_`.
///
/// The date is the UTC calendar date of generation.
pub fn report_filename(report_type: ReportType, job_number: &str, generated_at: Timestamp) -> String {
    format!(
        "{}_{}_{}.pdf",
        report_type.file_label(),
        job_number,
        generated_at.format("%Y-%m-%d")
    )
    .replace(' ', "_")
}

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

/// Job fields printed on a report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportJob {
    #[serde(default)]
    pub id: Option<DbId>,
    #[serde(default)]
    pub job_number: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub pickup_location: Option<String>,
    #[serde(default)]
    pub delivery_location: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
}

/// One catalogued item as printed on a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportItem {
    #[serde(default)]
    pub id: Option<DbId>,
    pub item_name: String,
    pub category: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub condition: ItemCondition,
    #[serde(default)]
    pub item_value: Option<f64>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub weight_estimate: Option<String>,
    #[serde(default)]
    pub handling_instructions: Option<String>,
    #[serde(default)]
    pub fragile: bool,
    #[serde(default)]
    pub ai_confidence_score: Option<f64>,
    #[serde(default)]
    pub manual_verification: bool,
}

fn default_quantity() -> i32 {
    1
}

impl ReportItem {
    /// Short tags for the Notes column: `AI✓`, `Review`, `Fragile`.
    pub fn notes(&self) -> String {
        let mut notes = Vec::new();
        if is_confident(self.ai_confidence_score) {
            notes.push("AI✓");
        }
        if self.manual_verification {
            notes.push("Review");
        }
        if self.fragile {
            notes.push("Fragile");
        }
        notes.join(", ")
    }

    /// Extra detail parts (size, fragile marker, special handling), in
    /// print order. Empty when the row needs only one line.
    pub fn detail_parts(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if let Some(dimensions) = non_blank(self.dimensions.as_deref()) {
            parts.push(format!("Size: {dimensions}"));
        }
        if self.fragile {
            parts.push("⚠ FRAGILE".to_string());
        }
        if let Some(handling) = non_blank(self.handling_instructions.as_deref()) {
            parts.push(format!("Special: {handling}"));
        }
        parts
    }
}

/// Optional signature images as data URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Signatures {
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub staff: Option<String>,
}

/// One report request: job snapshot, items, type, and generator identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportData {
    #[serde(default)]
    pub job: Option<ReportJob>,
    #[serde(default)]
    pub items: Option<Vec<ReportItem>>,
    #[serde(default, alias = "reportType")]
    pub report_type: ReportType,
    #[serde(default, alias = "generatedBy")]
    pub generated_by: String,
    #[serde(default, alias = "generatedAt")]
    pub generated_at: Option<Timestamp>,
    #[serde(default)]
    pub signatures: Option<Signatures>,
}

/// Return the trimmed string if it has any content.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
