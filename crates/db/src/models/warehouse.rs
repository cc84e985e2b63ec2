use haulage_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A storage facility a job can hold goods in between pickup and delivery.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Warehouse {
    pub id: DbId,
    pub name: String,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWarehouse {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub address: Option<String>,
}
