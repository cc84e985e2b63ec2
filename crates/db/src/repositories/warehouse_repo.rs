//! Repository for the `warehouses` table.

use haulage_core::types::DbId;
use sqlx::PgPool;

use crate::models::warehouse::{CreateWarehouse, Warehouse};

const COLUMNS: &str = "id, name, address, is_active, created_at, updated_at";

pub struct WarehouseRepo;

impl WarehouseRepo {
    pub async fn create(pool: &PgPool, input: &CreateWarehouse) -> Result<Warehouse, sqlx::Error> {
        let query = format!(
            "INSERT INTO warehouses (name, address) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Warehouse>(&query)
            .bind(input.name.trim())
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Warehouse>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM warehouses WHERE id = $1");
        sqlx::query_as::<_, Warehouse>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Active warehouses offered at job intake, by name.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Warehouse>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM warehouses WHERE is_active = true ORDER BY name"
        );
        sqlx::query_as::<_, Warehouse>(&query).fetch_all(pool).await
    }
}
