//! Pickup and delivery locations attached to a job.

use chrono::NaiveDate;
use haulage_core::locations::LocationType;
use haulage_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A row from the `job_locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: DbId,
    pub job_id: DbId,
    pub location_type: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub special_instructions: Option<String>,
    pub sequence_order: i32,
    pub created_at: Timestamp,
}

impl Location {
    pub fn is_pickup(&self) -> bool {
        LocationType::parse(&self.location_type) == Some(LocationType::Pickup)
    }

    pub fn is_delivery(&self) -> bool {
        LocationType::parse(&self.location_type) == Some(LocationType::Delivery)
    }

    /// One-line address for report headers: `address, city, state`.
    pub fn display_address(&self) -> String {
        [Some(self.address.as_str()), self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn validate_location_type(value: &str) -> Result<(), ValidationError> {
    match LocationType::parse(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("invalid_location_type")),
    }
}

/// DTO for one location in a create or replace request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocation {
    #[validate(custom(function = "validate_location_type"))]
    pub location_type: String,
    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub special_instructions: Option<String>,
    pub sequence_order: Option<i32>,
}
