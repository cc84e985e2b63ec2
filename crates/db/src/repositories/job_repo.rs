//! Repository for the `jobs` table.
//!
//! Status changes go through [`JobRepo::apply_transition`], a
//! compare-and-swap keyed on the status the caller planned against. A
//! `None` result means another writer got there first.

use chrono::Utc;
use haulage_core::job_lifecycle::{JobSnapshot, JobStatus, ReasonUpdate, Transition};
use haulage_core::job_number::{daily_prefix, format_job_number, parse_sequence};
use haulage_core::locations::{LOCATION_DELIVERY, LOCATION_PICKUP};
use haulage_core::types::DbId;
use sqlx::PgPool;

use super::location_repo::LocationRepo;
use super::{clamp_limit, clamp_offset};
use crate::models::job::{CreateJob, Job, UpdateJob};
use crate::models::location::{CreateLocation, Location};

/// Column list for `jobs` queries.
const COLUMNS: &str = "\
    id, job_number, client_name, client_phone, client_email, job_type, notes, \
    status_id, warehouse_holding, warehouse_id, storage_start_date, storage_end_date, \
    created_by, decided_by, submitted_at, decided_at, completed_at, cancelled_at, \
    rejection_reason, created_at, updated_at";

/// Transaction-scoped advisory lock serializing job number allocation.
const JOB_NUMBER_LOCK: i64 = 0x4A4F_424E;

/// Provides persistence for moving jobs.
pub struct JobRepo;

impl JobRepo {
    /// Create a draft job and its initial locations in one transaction.
    ///
    /// The job number is the next daily sequence, allocated under an
    /// advisory lock so concurrent creates never collide.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateJob,
        locations: &[CreateLocation],
    ) -> Result<(Job, Vec<Location>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(JOB_NUMBER_LOCK)
            .execute(&mut *tx)
            .await?;

        let today = Utc::now().date_naive();
        let existing: Vec<(String,)> =
            sqlx::query_as("SELECT job_number FROM jobs WHERE job_number LIKE $1")
                .bind(format!("{}%", daily_prefix(today)))
                .fetch_all(&mut *tx)
                .await?;
        let sequence = existing
            .iter()
            .filter_map(|(number,)| parse_sequence(number))
            .max()
            .unwrap_or(0)
            + 1;
        let job_number = format_job_number(today, sequence);

        let query = format!(
            "INSERT INTO jobs \
                (job_number, client_name, client_phone, client_email, job_type, notes, \
                 status_id, warehouse_holding, warehouse_id, storage_start_date, \
                 storage_end_date, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(&job_number)
            .bind(&input.client_name)
            .bind(&input.client_phone)
            .bind(&input.client_email)
            .bind(&input.job_type)
            .bind(&input.notes)
            .bind(JobStatus::Draft.id())
            .bind(input.warehouse_holding)
            .bind(input.warehouse_id)
            .bind(input.storage_start_date)
            .bind(input.storage_end_date)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        let locations = LocationRepo::insert_all(&mut tx, job.id, locations).await?;

        tx.commit().await?;
        tracing::info!(job_id = job.id, job_number = %job.job_number, "Job created");
        Ok((job, locations))
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List jobs newest first, optionally filtered by status and creator.
    pub async fn list(
        pool: &PgPool,
        status: Option<JobStatus>,
        created_by: Option<DbId>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx: u32 = 1;

        if status.is_some() {
            conditions.push(format!("status_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if created_by.is_some() {
            conditions.push(format!("created_by = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Job>(&query);
        if let Some(status) = status {
            q = q.bind(status.id());
        }
        if let Some(uid) = created_by {
            q = q.bind(uid);
        }
        q.bind(clamp_limit(limit))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// The review queue: jobs awaiting a decision, oldest submission first.
    pub async fn list_pending_review(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             WHERE status_id = $1 \
             ORDER BY submitted_at ASC NULLS LAST, id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(JobStatus::PendingReview.id())
            .bind(clamp_limit(limit))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Load what the lifecycle planner needs: status, owner and location
    /// counts.
    pub async fn snapshot(pool: &PgPool, id: DbId) -> Result<Option<JobSnapshot>, sqlx::Error> {
        let row: Option<(DbId, i16, DbId, i64, i64)> = sqlx::query_as(
            "SELECT j.id, j.status_id, j.created_by, \
                    COUNT(l.id) FILTER (WHERE l.location_type = $2), \
                    COUNT(l.id) FILTER (WHERE l.location_type = $3) \
             FROM jobs j \
             LEFT JOIN job_locations l ON l.job_id = j.id \
             WHERE j.id = $1 \
             GROUP BY j.id",
        )
        .bind(id)
        .bind(LOCATION_PICKUP)
        .bind(LOCATION_DELIVERY)
        .fetch_optional(pool)
        .await?;

        let Some((id, status_id, created_by, pickups, deliveries)) = row else {
            return Ok(None);
        };
        let status = JobStatus::from_id(status_id).ok_or_else(|| {
            sqlx::Error::Protocol(format!("job {id} has unknown status_id {status_id}"))
        })?;

        Ok(Some(JobSnapshot {
            id,
            status,
            created_by,
            pickup_count: pickups as usize,
            delivery_count: deliveries as usize,
        }))
    }

    /// Apply a field edit while the job is still in draft.
    ///
    /// Turning `warehouse_holding` off nulls the warehouse fields. Returns
    /// `None` if the job is missing or has left draft.
    pub async fn update_if_draft(
        pool: &PgPool,
        id: DbId,
        input: &UpdateJob,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs SET \
                client_name = COALESCE($3, client_name), \
                client_phone = COALESCE($4, client_phone), \
                client_email = COALESCE($5, client_email), \
                job_type = COALESCE($6, job_type), \
                notes = COALESCE($7, notes), \
                warehouse_holding = COALESCE($8, warehouse_holding), \
                warehouse_id = CASE WHEN COALESCE($8, warehouse_holding) \
                    THEN COALESCE($9, warehouse_id) END, \
                storage_start_date = CASE WHEN COALESCE($8, warehouse_holding) \
                    THEN COALESCE($10, storage_start_date) END, \
                storage_end_date = CASE WHEN COALESCE($8, warehouse_holding) \
                    THEN COALESCE($11, storage_end_date) END, \
                updated_at = NOW() \
             WHERE id = $1 AND status_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(JobStatus::Draft.id())
            .bind(&input.client_name)
            .bind(&input.client_phone)
            .bind(&input.client_email)
            .bind(&input.job_type)
            .bind(&input.notes)
            .bind(input.warehouse_holding)
            .bind(input.warehouse_id)
            .bind(input.storage_start_date)
            .bind(input.storage_end_date)
            .fetch_optional(pool)
            .await
    }

    /// Write a planned status change if the job is still in the expected
    /// status.
    ///
    /// Returns the updated row, or `None` when the compare-and-swap matched
    /// zero rows (a concurrent writer moved the job first).
    pub async fn apply_transition(
        pool: &PgPool,
        transition: &Transition,
    ) -> Result<Option<Job>, sqlx::Error> {
        let fields = &transition.fields;
        let (keep_reason, reason) = match &fields.rejection_reason {
            ReasonUpdate::Keep => (true, None),
            ReasonUpdate::Clear => (false, None),
            ReasonUpdate::Set(reason) => (false, Some(reason.as_str())),
        };

        let query = format!(
            "UPDATE jobs SET \
                status_id = $3, \
                submitted_at = COALESCE($4, submitted_at), \
                decided_by = COALESCE($5, decided_by), \
                decided_at = COALESCE($6, decided_at), \
                rejection_reason = CASE WHEN $7 THEN rejection_reason ELSE $8 END, \
                completed_at = COALESCE($9, completed_at), \
                cancelled_at = COALESCE($10, cancelled_at), \
                updated_at = $11 \
             WHERE id = $1 AND status_id = $2 \
             RETURNING {COLUMNS}"
        );
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(transition.job_id)
            .bind(transition.expected.id())
            .bind(transition.target.id())
            .bind(fields.submitted_at)
            .bind(fields.decision.map(|d| d.decided_by))
            .bind(fields.decision.map(|d| d.decided_at))
            .bind(keep_reason)
            .bind(reason)
            .bind(fields.completed_at)
            .bind(fields.cancelled_at)
            .bind(fields.updated_at)
            .fetch_optional(pool)
            .await?;

        match &job {
            Some(_) => tracing::info!(
                job_id = transition.job_id,
                action = transition.action,
                from = %transition.expected,
                to = %transition.target,
                "Job status changed",
            ),
            None => tracing::warn!(
                job_id = transition.job_id,
                action = transition.action,
                expected = %transition.expected,
                "Job status changed concurrently; transition not applied",
            ),
        }
        Ok(job)
    }
}
