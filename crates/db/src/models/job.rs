//! Moving-job entity models and DTOs.

use chrono::NaiveDate;
use haulage_core::error::CoreError;
use haulage_core::job_lifecycle::{JobStatus, StatusId};
use haulage_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

pub const JOB_TYPE_DIRECT_MOVE: &str = "direct_move";
pub const JOB_TYPE_MULTI_LOCATION: &str = "multi_location";
pub const JOB_TYPE_WAREHOUSE_STORAGE: &str = "warehouse_storage";

pub const VALID_JOB_TYPES: &[&str] = &[
    JOB_TYPE_DIRECT_MOVE,
    JOB_TYPE_MULTI_LOCATION,
    JOB_TYPE_WAREHOUSE_STORAGE,
];

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub job_number: String,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub client_email: Option<String>,
    pub job_type: String,
    pub notes: Option<String>,
    pub status_id: StatusId,
    pub warehouse_holding: bool,
    pub warehouse_id: Option<DbId>,
    pub storage_start_date: Option<NaiveDate>,
    pub storage_end_date: Option<NaiveDate>,
    pub created_by: DbId,
    pub decided_by: Option<DbId>,
    pub submitted_at: Option<Timestamp>,
    pub decided_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    pub fn status(&self) -> Option<JobStatus> {
        JobStatus::from_id(self.status_id)
    }

    /// Status label for API payloads and reports.
    pub fn status_label(&self) -> &'static str {
        self.status().map(JobStatus::as_str).unwrap_or("unknown")
    }
}

/// A job with its status resolved to a label.
#[derive(Debug, Clone, Serialize)]
pub struct JobResponse {
    #[serde(flatten)]
    pub job: Job,
    pub status: &'static str,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        let status = job.status_label();
        Self { job, status }
    }
}

fn validate_job_type(value: &str) -> Result<(), ValidationError> {
    if VALID_JOB_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_job_type"))
    }
}

fn default_job_type() -> String {
    JOB_TYPE_DIRECT_MOVE.to_string()
}

/// DTO for creating a job.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateJob {
    #[validate(length(min = 1, max = 200, message = "Client name is required"))]
    pub client_name: String,
    #[validate(length(max = 30))]
    pub client_phone: Option<String>,
    #[validate(email)]
    pub client_email: Option<String>,
    #[serde(default = "default_job_type")]
    #[validate(custom(function = "validate_job_type"))]
    pub job_type: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub warehouse_holding: bool,
    pub warehouse_id: Option<DbId>,
    pub storage_start_date: Option<NaiveDate>,
    pub storage_end_date: Option<NaiveDate>,
}

impl CreateJob {
    /// Trim the client name, drop warehouse fields when no storage leg is
    /// booked, and check the storage window.
    pub fn normalized(mut self) -> Result<Self, CoreError> {
        self.client_name = self.client_name.trim().to_string();
        if self.client_name.is_empty() {
            return Err(CoreError::Validation("Client name is required".to_string()));
        }

        if !self.warehouse_holding {
            self.warehouse_id = None;
            self.storage_start_date = None;
            self.storage_end_date = None;
        }
        check_storage_window(self.storage_start_date, self.storage_end_date)?;
        Ok(self)
    }
}

/// DTO for editing a draft job. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateJob {
    #[validate(length(min = 1, max = 200))]
    pub client_name: Option<String>,
    #[validate(length(max = 30))]
    pub client_phone: Option<String>,
    #[validate(email)]
    pub client_email: Option<String>,
    #[validate(custom(function = "validate_job_type"))]
    pub job_type: Option<String>,
    pub notes: Option<String>,
    pub warehouse_holding: Option<bool>,
    pub warehouse_id: Option<DbId>,
    pub storage_start_date: Option<NaiveDate>,
    pub storage_end_date: Option<NaiveDate>,
}

impl UpdateJob {
    pub fn normalized(mut self) -> Result<Self, CoreError> {
        if let Some(name) = self.client_name.as_mut() {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Err(CoreError::Validation("Client name is required".to_string()));
            }
        }
        if self.warehouse_holding == Some(false) {
            self.warehouse_id = None;
            self.storage_start_date = None;
            self.storage_end_date = None;
        }
        check_storage_window(self.storage_start_date, self.storage_end_date)?;
        Ok(self)
    }
}

fn check_storage_window(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), CoreError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(CoreError::Validation(
            "Storage end date cannot be before start date".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Query parameters for `GET /api/v1/jobs`.
#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    /// Filter by status label (legacy spellings accepted).
    pub status: Option<String>,
    /// Only jobs created by the caller.
    #[serde(default)]
    pub mine: bool,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
