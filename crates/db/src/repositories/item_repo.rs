//! Repository for the `items` table.

use haulage_core::catalog::VERIFICATION_CONFIDENCE_THRESHOLD;
use haulage_core::inventory::{quantities_by_delivery, DeliveryTotals};
use haulage_core::types::DbId;
use sqlx::PgPool;

use crate::models::item::{CreateItem, Item, UpdateItem};

const COLUMNS: &str = "id, job_id, delivery_id, item_name, category, quantity, condition, \
    item_value, dimensions, weight_estimate, handling_instructions, fragile, \
    ai_confidence_score, manual_verification, created_by, created_at, updated_at";

/// Items catalogued against a job. Writes are last-write-wins and never
/// touch the job's status.
pub struct ItemRepo;

impl ItemRepo {
    pub async fn create(
        pool: &PgPool,
        job_id: DbId,
        created_by: DbId,
        input: &CreateItem,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items \
                (job_id, delivery_id, item_name, category, quantity, condition, item_value, \
                 dimensions, weight_estimate, handling_instructions, fragile, \
                 ai_confidence_score, manual_verification, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(job_id)
            .bind(input.delivery_id)
            .bind(input.item_name.trim())
            .bind(&input.category)
            .bind(input.quantity)
            .bind(&input.condition)
            .bind(input.item_value)
            .bind(&input.dimensions)
            .bind(&input.weight_estimate)
            .bind(&input.handling_instructions)
            .bind(input.fragile)
            .bind(input.ai_confidence_score)
            .bind(input.requires_verification())
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// All items of a job in insertion order.
    pub async fn list_for_job(pool: &PgPool, job_id: DbId) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE job_id = $1 ORDER BY id");
        sqlx::query_as::<_, Item>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }

    /// Update an item. Only non-`None` fields are applied.
    ///
    /// Low-confidence AI items keep their verification flag regardless of
    /// the input. Returns `None` if the item does not belong to the job.
    pub async fn update(
        pool: &PgPool,
        job_id: DbId,
        item_id: DbId,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET \
                item_name = COALESCE($3, item_name), \
                category = COALESCE($4, category), \
                quantity = COALESCE($5, quantity), \
                condition = COALESCE($6, condition), \
                item_value = COALESCE($7, item_value), \
                dimensions = COALESCE($8, dimensions), \
                weight_estimate = COALESCE($9, weight_estimate), \
                handling_instructions = COALESCE($10, handling_instructions), \
                fragile = COALESCE($11, fragile), \
                manual_verification = COALESCE($12, manual_verification) \
                    OR COALESCE(ai_confidence_score < $13, false), \
                delivery_id = COALESCE($14, delivery_id) \
             WHERE id = $2 AND job_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(job_id)
            .bind(item_id)
            .bind(input.item_name.as_deref().map(str::trim))
            .bind(&input.category)
            .bind(input.quantity)
            .bind(&input.condition)
            .bind(input.item_value)
            .bind(&input.dimensions)
            .bind(&input.weight_estimate)
            .bind(&input.handling_instructions)
            .bind(input.fragile)
            .bind(input.manual_verification)
            .bind(VERIFICATION_CONFIDENCE_THRESHOLD)
            .bind(input.delivery_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, job_id: DbId, item_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $2 AND job_id = $1")
            .bind(job_id)
            .bind(item_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Item quantities per delivery stop for a job.
    pub async fn delivery_totals(pool: &PgPool, job_id: DbId) -> Result<DeliveryTotals, sqlx::Error> {
        let rows: Vec<(Option<i32>, i32)> =
            sqlx::query_as("SELECT delivery_id, quantity FROM items WHERE job_id = $1")
                .bind(job_id)
                .fetch_all(pool)
                .await?;
        Ok(quantities_by_delivery(
            rows.into_iter().map(|(delivery, quantity)| (delivery, Some(quantity))),
        ))
    }
}
