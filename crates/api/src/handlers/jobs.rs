//! Handlers for the `/jobs` resource.
//!
//! All endpoints require authentication via [`AuthUser`]. Status changes are
//! planned by `haulage_core::job_lifecycle::plan` against a fresh snapshot
//! and written with a compare-and-swap; losing the race is a 409.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use haulage_core::error::CoreError;
use haulage_core::inventory::DeliveryTotals;
use haulage_core::job_lifecycle::{plan, JobAction, JobSnapshot, JobStatus, Transition};
use haulage_core::locations::LocationType;
use haulage_core::report::{ReportData, ReportItem, ReportJob, ReportType};
use haulage_core::types::DbId;
use haulage_db::models::job::{CreateJob, Job, JobListQuery, JobResponse, UpdateJob};
use haulage_db::models::location::{CreateLocation, Location};
use haulage_db::models::warehouse::Warehouse;
use haulage_db::repositories::{ItemRepo, JobRepo, LocationRepo, UserRepo, WarehouseRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::reports::{pdf_response, render_report};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireChecker;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /jobs`.
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    #[serde(flatten)]
    pub job: CreateJob,
    #[serde(default)]
    pub locations: Vec<CreateLocation>,
    /// Run the submit transition right after creation.
    #[serde(default)]
    pub submit_for_review: bool,
}

/// Request body for `PUT /jobs/{id}/locations`.
#[derive(Debug, Deserialize)]
pub struct ReplaceLocationsRequest {
    pub locations: Vec<CreateLocation>,
}

/// Checker decision on a job awaiting review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

/// Request body for `POST /jobs/{id}/approve`.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub action: Decision,
    pub rejection_reason: Option<String>,
}

/// Query parameters for `GET /jobs/{id}/report`.
#[derive(Debug, Deserialize)]
pub struct JobReportQuery {
    #[serde(rename = "type")]
    pub report_type: Option<String>,
}

/// A job with its locations, warehouse and item totals.
#[derive(Debug, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: JobResponse,
    pub locations: Vec<Location>,
    pub warehouse: Option<Warehouse>,
    pub item_totals: DeliveryTotals,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Job", id })
}

fn lost_race(id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Job {id} was changed by another request; reload and try again"
    )))
}

fn validate_locations(locations: &[CreateLocation]) -> AppResult<()> {
    for location in locations {
        location.validate()?;
    }
    Ok(())
}

/// Snapshot of a job that has not been stored yet.
fn intake_snapshot(created_by: DbId, locations: &[CreateLocation]) -> JobSnapshot {
    let count = |kind: LocationType| {
        locations
            .iter()
            .filter(|l| LocationType::parse(&l.location_type) == Some(kind))
            .count()
    };
    JobSnapshot {
        id: 0,
        status: JobStatus::Draft,
        created_by,
        pickup_count: count(LocationType::Pickup),
        delivery_count: count(LocationType::Delivery),
    }
}

/// Plan `action` against the job's current state and apply it.
async fn transition(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
    action: JobAction,
) -> AppResult<Job> {
    let planned = plan_action(state, auth, id, &action).await?;
    JobRepo::apply_transition(&state.pool, &planned)
        .await?
        .ok_or_else(|| lost_race(id))
}

async fn plan_action(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
    action: &JobAction,
) -> AppResult<Transition> {
    let snapshot = JobRepo::snapshot(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(plan(&snapshot, action, &auth.actor(), Utc::now())?)
}

fn transitioned(job: Job, auth: &AuthUser, action: &str) -> Json<DataResponse<JobResponse>> {
    tracing::info!(
        job_id = job.id,
        job_number = %job.job_number,
        status = job.status_label(),
        user_id = auth.user_id,
        action,
        "Job transition applied",
    );
    Json(DataResponse {
        data: JobResponse::from(job),
    })
}

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs
///
/// Create a draft job with its locations. With `submit_for_review` the
/// submit transition is planned against the incoming locations before
/// anything is stored, then applied once the draft exists.
pub async fn create_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateJobRequest>,
) -> AppResult<impl IntoResponse> {
    input.job.validate()?;
    validate_locations(&input.locations)?;
    let job_input = input.job.normalized()?;

    if input.submit_for_review {
        let draft = intake_snapshot(auth.user_id, &input.locations);
        plan(&draft, &JobAction::Submit, &auth.actor(), Utc::now())?;
    }

    let (job, _locations) =
        JobRepo::create(&state.pool, auth.user_id, &job_input, &input.locations).await?;

    let job = if input.submit_for_review {
        transition(&state, &auth, job.id, JobAction::Submit).await?
    } else {
        job
    };

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: JobResponse::from(job),
        }),
    ))
}

/// GET /api/v1/jobs
///
/// List jobs newest first. `?status=` accepts canonical and legacy labels;
/// `?mine=true` limits the list to the caller's own jobs.
pub async fn list_jobs(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> AppResult<impl IntoResponse> {
    let status = params
        .status
        .as_deref()
        .map(|label| {
            JobStatus::parse(label).ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!("Unknown job status '{label}'")))
            })
        })
        .transpose()?;
    let created_by = params.mine.then_some(auth.user_id);

    let jobs = JobRepo::list(&state.pool, status, created_by, params.limit, params.offset).await?;
    let data: Vec<JobResponse> = jobs.into_iter().map(JobResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/jobs/approvals
///
/// The review queue, oldest submission first.
pub async fn list_pending_review(
    RequireChecker(_checker): RequireChecker,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let jobs = JobRepo::list_pending_review(&state.pool, params.limit, params.offset).await?;
    let data: Vec<JobResponse> = jobs.into_iter().map(JobResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/jobs/{id}
pub async fn get_job(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = JobRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let locations = LocationRepo::list_for_job(&state.pool, id).await?;
    let warehouse = match job.warehouse_id {
        Some(warehouse_id) => WarehouseRepo::find_by_id(&state.pool, warehouse_id).await?,
        None => None,
    };
    let item_totals = ItemRepo::delivery_totals(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: JobDetail {
            job: JobResponse::from(job),
            locations,
            warehouse,
            item_totals,
        },
    }))
}

/// PUT /api/v1/jobs/{id}
///
/// Edit job fields. Only the owner or a checker may edit, and only while the
/// job is in draft.
pub async fn update_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateJob>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let input = input.normalized()?;
    plan_action(&state, &auth, id, &JobAction::Edit).await?;

    let job = JobRepo::update_if_draft(&state.pool, id, &input)
        .await?
        .ok_or_else(|| lost_race(id))?;

    tracing::info!(job_id = id, user_id = auth.user_id, "Job updated");
    Ok(Json(DataResponse {
        data: JobResponse::from(job),
    }))
}

/// PUT /api/v1/jobs/{id}/locations
///
/// Replace every location of a draft job.
pub async fn replace_locations(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReplaceLocationsRequest>,
) -> AppResult<impl IntoResponse> {
    validate_locations(&input.locations)?;
    plan_action(&state, &auth, id, &JobAction::Edit).await?;

    let locations = LocationRepo::replace_for_draft(&state.pool, id, &input.locations)
        .await?
        .ok_or_else(|| lost_race(id))?;

    tracing::info!(
        job_id = id,
        user_id = auth.user_id,
        count = locations.len(),
        "Job locations replaced",
    );
    Ok(Json(DataResponse { data: locations }))
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs/{id}/submit
pub async fn submit_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = transition(&state, &auth, id, JobAction::Submit).await?;
    Ok(transitioned(job, &auth, "submit"))
}

/// POST /api/v1/jobs/{id}/approve
///
/// Approve or reject a job awaiting review. Rejection needs a non-blank
/// reason and returns the job to draft.
pub async fn decide_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DecisionRequest>,
) -> AppResult<impl IntoResponse> {
    let action = match input.action {
        Decision::Approve => JobAction::Approve,
        Decision::Reject => JobAction::Reject {
            reason: input.rejection_reason.unwrap_or_default(),
        },
    };
    let name = action.name();
    let job = transition(&state, &auth, id, action).await?;
    Ok(transitioned(job, &auth, name))
}

/// POST /api/v1/jobs/{id}/complete
pub async fn complete_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = transition(&state, &auth, id, JobAction::Complete).await?;
    Ok(transitioned(job, &auth, "complete"))
}

/// POST /api/v1/jobs/{id}/cancel
pub async fn cancel_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = transition(&state, &auth, id, JobAction::Cancel).await?;
    Ok(transitioned(job, &auth, "cancel"))
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/{id}/report?type=completion
///
/// Build a report from the stored job, its first pickup and delivery
/// addresses and all of its items, and return the PDF.
pub async fn job_report(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<JobReportQuery>,
) -> AppResult<Response> {
    let job = JobRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let pickup = LocationRepo::first_of_type(&state.pool, id, LocationType::Pickup).await?;
    let delivery = LocationRepo::first_of_type(&state.pool, id, LocationType::Delivery).await?;
    let items = ItemRepo::list_for_job(&state.pool, id).await?;
    let generated_by = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .map(|u| u.full_name.unwrap_or(u.username))
        .unwrap_or_default();

    let report_type = params
        .report_type
        .as_deref()
        .map(ReportType::parse)
        .unwrap_or_default();

    let data = ReportData {
        job: Some(ReportJob {
            id: Some(job.id),
            job_number: Some(job.job_number.clone()),
            client_name: Some(job.client_name.clone()),
            client_phone: job.client_phone.clone(),
            client_email: job.client_email.clone(),
            pickup_location: pickup.as_ref().map(Location::display_address),
            delivery_location: delivery.as_ref().map(Location::display_address),
            status: job.status_label().to_string(),
            created_at: Some(job.created_at),
            completed_at: job.completed_at,
        }),
        items: Some(items.iter().map(ReportItem::from).collect()),
        report_type,
        generated_by,
        generated_at: Some(Utc::now()),
        signatures: None,
    };

    let report = render_report(&state, data).await?;
    tracing::info!(
        job_id = id,
        user_id = auth.user_id,
        report_type = report_type.as_str(),
        items = items.len(),
        pages = report.page_count,
        "Job report generated",
    );
    Ok(pdf_response(report))
}
