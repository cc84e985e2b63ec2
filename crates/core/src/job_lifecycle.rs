//! Job lifecycle state machine.
//!
//! A job moves through a fixed set of states:
//!
//! ```text
//! draft --submit--> pending_review --approve--> in_progress --complete--> completed
//!   ^                     |
//!   +------reject---------+
//!
//! draft | pending_review --cancel--> cancelled
//! ```
//!
//! [`plan`] validates a requested action against a job snapshot and returns
//! a [`Transition`]: the status the store must still observe (`expected`),
//! the status to write (`target`), and the side-effect fields. The store
//! applies it as a compare-and-swap (`WHERE id = $1 AND status_id =
//! expected`) and must treat a zero-row update as a conflict.

use serde::Serialize;

use crate::error::CoreError;
use crate::roles::{can_decide, ROLE_SUPER_ADMIN};
use crate::types::{DbId, Timestamp};

/// Status ID type matching SMALLINT in the `job_statuses` lookup table.
pub type StatusId = i16;

// ---------------------------------------------------------------------------
// JobStatus
// ---------------------------------------------------------------------------

/// Job lifecycle status.
///
/// Discriminants match the seed order of the `job_statuses` table.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft = 1,
    PendingReview = 2,
    InProgress = 3,
    Completed = 4,
    Cancelled = 5,
}

impl JobStatus {
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Draft,
        JobStatus::PendingReview,
        JobStatus::InProgress,
        JobStatus::Completed,
        JobStatus::Cancelled,
    ];

    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Resolve a database status ID.
    pub fn from_id(id: StatusId) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Canonical label used in API payloads and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::PendingReview => "pending_review",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a status label, accepting the legacy spellings `pending`,
    /// `pending_approval` and `approved`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "draft" => Some(JobStatus::Draft),
            "pending_review" | "pending_approval" | "pending" => Some(JobStatus::PendingReview),
            "in_progress" | "approved" => Some(JobStatus::InProgress),
            "completed" => Some(JobStatus::Completed),
            "cancelled" => Some(JobStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }
}

impl From<JobStatus> for StatusId {
    fn from(value: JobStatus) -> Self {
        value as StatusId
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The parts of a job the state machine needs to decide a transition.
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    pub id: DbId,
    pub status: JobStatus,
    pub created_by: DbId,
    pub pickup_count: usize,
    pub delivery_count: usize,
}

/// The authenticated user requesting a transition.
#[derive(Debug, Clone, Copy)]
pub struct Actor<'a> {
    pub user_id: DbId,
    pub role: &'a str,
}

impl Actor<'_> {
    fn is_super_admin(&self) -> bool {
        self.role == ROLE_SUPER_ADMIN
    }

    fn owns(&self, job: &JobSnapshot) -> bool {
        self.user_id == job.created_by
    }
}

/// A requested lifecycle action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobAction {
    Submit,
    Approve,
    Reject { reason: String },
    Complete,
    Cancel,
    Edit,
}

impl JobAction {
    pub fn name(&self) -> &'static str {
        match self {
            JobAction::Submit => "submit",
            JobAction::Approve => "approve",
            JobAction::Reject { .. } => "reject",
            JobAction::Complete => "complete",
            JobAction::Cancel => "cancel",
            JobAction::Edit => "edit",
        }
    }

    /// The only state this action may start from, or `None` when several
    /// source states are legal.
    fn required_source(&self) -> Option<JobStatus> {
        match self {
            JobAction::Submit | JobAction::Edit => Some(JobStatus::Draft),
            JobAction::Approve | JobAction::Reject { .. } => Some(JobStatus::PendingReview),
            JobAction::Complete => Some(JobStatus::InProgress),
            JobAction::Cancel => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// How a transition touches `rejection_reason`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasonUpdate {
    Keep,
    Clear,
    Set(String),
}

/// Who recorded an approve/reject decision, and when.
///
/// Written on both outcomes: this is decision metadata, not proof of approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub decided_by: DbId,
    pub decided_at: Timestamp,
}

/// Side-effect columns a transition writes alongside the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionFields {
    pub submitted_at: Option<Timestamp>,
    pub decision: Option<Decision>,
    pub rejection_reason: ReasonUpdate,
    pub completed_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl TransitionFields {
    fn touch(now: Timestamp) -> Self {
        Self {
            submitted_at: None,
            decision: None,
            rejection_reason: ReasonUpdate::Keep,
            completed_at: None,
            cancelled_at: None,
            updated_at: now,
        }
    }
}

/// A validated, not-yet-applied status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub job_id: DbId,
    pub action: &'static str,
    pub expected: JobStatus,
    pub target: JobStatus,
    pub fields: TransitionFields,
}

impl Transition {
    /// Whether the store's current status still permits this transition.
    pub fn matches(&self, current: JobStatus) -> bool {
        current == self.expected
    }
}

// ---------------------------------------------------------------------------
// plan
// ---------------------------------------------------------------------------

/// Validate `action` against `job` and return the transition to apply.
///
/// Checks run in a fixed order: payload validation, authorization, state
/// legality, then preconditions. Nothing is persisted here.
pub fn plan(
    job: &JobSnapshot,
    action: &JobAction,
    actor: &Actor<'_>,
    now: Timestamp,
) -> Result<Transition, CoreError> {
    let reason = match action {
        JobAction::Reject { reason } => Some(validate_rejection_reason(reason)?),
        _ => None,
    };

    authorize(job, action, actor)?;
    check_source_state(job, action)?;

    let mut fields = TransitionFields::touch(now);
    let target = match action {
        JobAction::Submit => {
            check_locations(job)?;
            fields.submitted_at = Some(now);
            fields.rejection_reason = ReasonUpdate::Clear;
            JobStatus::PendingReview
        }
        JobAction::Approve => {
            fields.decision = Some(Decision {
                decided_by: actor.user_id,
                decided_at: now,
            });
            fields.rejection_reason = ReasonUpdate::Clear;
            JobStatus::InProgress
        }
        JobAction::Reject { .. } => {
            fields.decision = Some(Decision {
                decided_by: actor.user_id,
                decided_at: now,
            });
            fields.rejection_reason = ReasonUpdate::Set(reason.unwrap_or_default());
            JobStatus::Draft
        }
        JobAction::Complete => {
            fields.completed_at = Some(now);
            JobStatus::Completed
        }
        JobAction::Cancel => {
            fields.cancelled_at = Some(now);
            fields.rejection_reason = ReasonUpdate::Clear;
            JobStatus::Cancelled
        }
        JobAction::Edit => JobStatus::Draft,
    };

    Ok(Transition {
        job_id: job.id,
        action: action.name(),
        expected: job.status,
        target,
        fields,
    })
}

/// Trim a rejection reason and require it to be non-empty.
pub fn validate_rejection_reason(reason: &str) -> Result<String, CoreError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Rejection reason is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn authorize(job: &JobSnapshot, action: &JobAction, actor: &Actor<'_>) -> Result<(), CoreError> {
    let allowed = match action {
        JobAction::Approve | JobAction::Reject { .. } => can_decide(actor.role),
        JobAction::Submit | JobAction::Cancel => actor.owns(job) || actor.is_super_admin(),
        JobAction::Edit => actor.owns(job) || can_decide(actor.role),
        JobAction::Complete => true,
    };

    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Insufficient permissions to {} this job",
            action.name()
        )))
    }
}

fn check_source_state(job: &JobSnapshot, action: &JobAction) -> Result<(), CoreError> {
    let legal = match action.required_source() {
        Some(source) => job.status == source,
        None => matches!(job.status, JobStatus::Draft | JobStatus::PendingReview),
    };
    if legal {
        return Ok(());
    }

    match action {
        JobAction::Edit => Err(CoreError::Forbidden(format!(
            "Job can only be edited while in draft (current status: {})",
            job.status
        ))),
        _ => Err(CoreError::Conflict(format!(
            "Cannot {} a job in status '{}'",
            action.name(),
            job.status
        ))),
    }
}

fn check_locations(job: &JobSnapshot) -> Result<(), CoreError> {
    if job.pickup_count == 0 || job.delivery_count == 0 {
        return Err(CoreError::Validation(
            "A job needs at least one pickup and one delivery location before submission"
                .to_string(),
        ));
    }
    Ok(())
}
