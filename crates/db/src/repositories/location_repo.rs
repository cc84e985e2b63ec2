//! Repository for the `job_locations` table.

use haulage_core::job_lifecycle::JobStatus;
use haulage_core::locations::LocationType;
use haulage_core::types::DbId;
use sqlx::PgPool;

use crate::models::location::{CreateLocation, Location};

const COLUMNS: &str = "id, job_id, location_type, address, city, state, \
    contact_name, contact_phone, contact_email, scheduled_date, \
    special_instructions, sequence_order, created_at";

/// Pickup and delivery stops of a job.
pub struct LocationRepo;

impl LocationRepo {
    /// All locations of a job in `sequence_order`.
    pub async fn list_for_job(pool: &PgPool, job_id: DbId) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM job_locations \
             WHERE job_id = $1 \
             ORDER BY sequence_order, id"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }

    /// The first location of the given type, by `sequence_order`.
    pub async fn first_of_type(
        pool: &PgPool,
        job_id: DbId,
        location_type: LocationType,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM job_locations \
             WHERE job_id = $1 AND location_type = $2 \
             ORDER BY sequence_order, id \
             LIMIT 1"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(job_id)
            .bind(location_type.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Replace every location of a draft job.
    ///
    /// The job row is locked for the duration of the transaction. Returns
    /// `None` without touching anything when the job is missing or no longer
    /// in draft.
    pub async fn replace_for_draft(
        pool: &PgPool,
        job_id: DbId,
        locations: &[CreateLocation],
    ) -> Result<Option<Vec<Location>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let status: Option<(i16,)> =
            sqlx::query_as("SELECT status_id FROM jobs WHERE id = $1 FOR UPDATE")
                .bind(job_id)
                .fetch_optional(&mut *tx)
                .await?;
        if status.map(|(id,)| id) != Some(JobStatus::Draft.id()) {
            return Ok(None);
        }

        sqlx::query("DELETE FROM job_locations WHERE job_id = $1")
            .bind(job_id)
            .execute(&mut *tx)
            .await?;
        let inserted = Self::insert_all(&mut tx, job_id, locations).await?;

        tx.commit().await?;
        Ok(Some(inserted))
    }

    /// Insert locations within an existing transaction.
    ///
    /// A missing `sequence_order` falls back to the position in `locations`.
    pub async fn insert_all(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        job_id: DbId,
        locations: &[CreateLocation],
    ) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!(
            "INSERT INTO job_locations \
                (job_id, location_type, address, city, state, contact_name, \
                 contact_phone, contact_email, scheduled_date, special_instructions, \
                 sequence_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );

        let mut inserted = Vec::with_capacity(locations.len());
        for (position, location) in locations.iter().enumerate() {
            let sequence_order = location.sequence_order.unwrap_or(position as i32);
            let row = sqlx::query_as::<_, Location>(&query)
                .bind(job_id)
                .bind(&location.location_type)
                .bind(location.address.trim())
                .bind(&location.city)
                .bind(&location.state)
                .bind(&location.contact_name)
                .bind(&location.contact_phone)
                .bind(&location.contact_email)
                .bind(location.scheduled_date)
                .bind(&location.special_instructions)
                .bind(sequence_order)
                .fetch_one(&mut **tx)
                .await?;
            inserted.push(row);
        }

        inserted.sort_by_key(|l| (l.sequence_order, l.id));
        Ok(inserted)
    }
}
