//! Job persistence: numbering, compare-and-swap transitions, draft edits
//! and location replacement.

use std::time::Duration;

use chrono::Utc;
use haulage_core::job_lifecycle::{plan, Actor, JobAction, JobStatus};
use haulage_core::job_number::{daily_prefix, parse_sequence};
use haulage_core::roles::{ROLE_CHECKER, ROLE_MAKER};
use haulage_core::types::DbId;
use haulage_db::models::job::{CreateJob, UpdateJob, JOB_TYPE_DIRECT_MOVE};
use haulage_db::models::location::CreateLocation;
use haulage_db::models::user::CreateUser;
use haulage_db::repositories::{JobRepo, LocationRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn user(pool: &PgPool, username: &str, role: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            full_name: None,
            password_hash: "not-a-real-hash".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn new_job(client: &str) -> CreateJob {
    CreateJob {
        client_name: client.to_string(),
        client_phone: None,
        client_email: None,
        job_type: JOB_TYPE_DIRECT_MOVE.to_string(),
        notes: None,
        warehouse_holding: false,
        warehouse_id: None,
        storage_start_date: None,
        storage_end_date: None,
    }
}

fn location(location_type: &str, address: &str, order: Option<i32>) -> CreateLocation {
    CreateLocation {
        location_type: location_type.to_string(),
        address: address.to_string(),
        city: Some("Mumbai".to_string()),
        state: None,
        contact_name: None,
        contact_phone: None,
        contact_email: None,
        scheduled_date: None,
        special_instructions: None,
        sequence_order: order,
    }
}

fn both_stops() -> Vec<CreateLocation> {
    vec![
        location("pickup", "1 Hill Road", None),
        location("delivery", "9 Marine Drive", None),
    ]
}

// ---------------------------------------------------------------------------
// Numbering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn job_numbers_follow_the_daily_sequence(pool: PgPool) {
    let maker = user(&pool, "maker", ROLE_MAKER).await;
    let prefix = daily_prefix(Utc::now().date_naive());

    let mut numbers = Vec::new();
    for n in 0..3 {
        let (job, _) = JobRepo::create(&pool, maker, &new_job(&format!("Client {n}")), &[])
            .await
            .unwrap();
        assert!(job.job_number.starts_with(&prefix));
        assert_eq!(job.status(), Some(JobStatus::Draft));
        numbers.push(parse_sequence(&job.job_number).unwrap());
    }
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_creates_get_distinct_numbers(pool: PgPool) {
    let maker = user(&pool, "maker", ROLE_MAKER).await;
    let a = new_job("A");
    let b = new_job("B");

    let (first, second) = tokio::join!(
        JobRepo::create(&pool, maker, &a, &[]),
        JobRepo::create(&pool, maker, &b, &[]),
    );
    let (first, _) = first.unwrap();
    let (second, _) = second.unwrap();
    assert_ne!(first.job_number, second.job_number);
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn snapshot_counts_locations(pool: PgPool) {
    let maker = user(&pool, "maker", ROLE_MAKER).await;
    let mut stops = both_stops();
    stops.push(location("delivery", "2 Carter Road", None));
    let (job, locations) = JobRepo::create(&pool, maker, &new_job("Asha"), &stops)
        .await
        .unwrap();
    assert_eq!(locations.len(), 3);

    let snapshot = JobRepo::snapshot(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(snapshot.pickup_count, 1);
    assert_eq!(snapshot.delivery_count, 2);
    assert_eq!(snapshot.created_by, maker);

    assert!(JobRepo::snapshot(&pool, job.id + 999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_transition_is_not_applied(pool: PgPool) {
    let maker = user(&pool, "maker", ROLE_MAKER).await;
    let (job, _) = JobRepo::create(&pool, maker, &new_job("Asha"), &both_stops())
        .await
        .unwrap();
    let actor = Actor { user_id: maker, role: ROLE_MAKER };

    let snapshot = JobRepo::snapshot(&pool, job.id).await.unwrap().unwrap();
    let submit = plan(&snapshot, &JobAction::Submit, &actor, Utc::now()).unwrap();

    let updated = JobRepo::apply_transition(&pool, &submit).await.unwrap().unwrap();
    assert_eq!(updated.status(), Some(JobStatus::PendingReview));
    assert!(updated.submitted_at.is_some());

    // Replaying the same plan expects draft, which no longer holds.
    assert!(JobRepo::apply_transition(&pool, &submit).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_approvals_have_one_winner(pool: PgPool) {
    let maker = user(&pool, "maker", ROLE_MAKER).await;
    let checker_a = user(&pool, "checker_a", ROLE_CHECKER).await;
    let checker_b = user(&pool, "checker_b", ROLE_CHECKER).await;
    let (job, _) = JobRepo::create(&pool, maker, &new_job("Asha"), &both_stops())
        .await
        .unwrap();

    let snapshot = JobRepo::snapshot(&pool, job.id).await.unwrap().unwrap();
    let owner = Actor { user_id: maker, role: ROLE_MAKER };
    let submit = plan(&snapshot, &JobAction::Submit, &owner, Utc::now()).unwrap();
    JobRepo::apply_transition(&pool, &submit).await.unwrap().unwrap();

    let pending = JobRepo::snapshot(&pool, job.id).await.unwrap().unwrap();
    let a = plan(
        &pending,
        &JobAction::Approve,
        &Actor { user_id: checker_a, role: ROLE_CHECKER },
        Utc::now(),
    )
    .unwrap();
    let b = plan(
        &pending,
        &JobAction::Approve,
        &Actor { user_id: checker_b, role: ROLE_CHECKER },
        Utc::now(),
    )
    .unwrap();

    let (ra, rb) = tokio::join!(
        JobRepo::apply_transition(&pool, &a),
        JobRepo::apply_transition(&pool, &b),
    );
    let winners: Vec<_> = [ra.unwrap(), rb.unwrap()].into_iter().flatten().collect();
    assert_eq!(winners.len(), 1);

    let stored = JobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(stored.status(), Some(JobStatus::InProgress));
    assert!(stored.decided_by == Some(checker_a) || stored.decided_by == Some(checker_b));
    assert_eq!(stored.decided_by, winners[0].decided_by);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reject_then_resubmit_clears_reason(pool: PgPool) {
    let maker = user(&pool, "maker", ROLE_MAKER).await;
    let checker = user(&pool, "checker", ROLE_CHECKER).await;
    let owner = Actor { user_id: maker, role: ROLE_MAKER };
    let reviewer = Actor { user_id: checker, role: ROLE_CHECKER };
    let (job, _) = JobRepo::create(&pool, maker, &new_job("Asha"), &both_stops())
        .await
        .unwrap();

    let snap = JobRepo::snapshot(&pool, job.id).await.unwrap().unwrap();
    let submit = plan(&snap, &JobAction::Submit, &owner, Utc::now()).unwrap();
    JobRepo::apply_transition(&pool, &submit).await.unwrap().unwrap();

    let snap = JobRepo::snapshot(&pool, job.id).await.unwrap().unwrap();
    let reject = JobAction::Reject { reason: "  missing floor plan ".to_string() };
    let rejected = JobRepo::apply_transition(&pool, &plan(&snap, &reject, &reviewer, Utc::now()).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rejected.status(), Some(JobStatus::Draft));
    assert_eq!(rejected.rejection_reason.as_deref(), Some("missing floor plan"));
    assert_eq!(rejected.decided_by, Some(checker));

    let snap = JobRepo::snapshot(&pool, job.id).await.unwrap().unwrap();
    let resubmit = plan(&snap, &JobAction::Submit, &owner, Utc::now()).unwrap();
    let resubmitted = JobRepo::apply_transition(&pool, &resubmit).await.unwrap().unwrap();
    assert_eq!(resubmitted.status(), Some(JobStatus::PendingReview));
    assert_eq!(resubmitted.rejection_reason, None);
}

// ---------------------------------------------------------------------------
// Draft edits
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn edits_only_apply_in_draft(pool: PgPool) {
    let maker = user(&pool, "maker", ROLE_MAKER).await;
    let (job, _) = JobRepo::create(&pool, maker, &new_job("Asha"), &both_stops())
        .await
        .unwrap();

    let edit = UpdateJob {
        notes: Some("Piano on second floor".to_string()),
        ..UpdateJob::default()
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    let edited = JobRepo::update_if_draft(&pool, job.id, &edit).await.unwrap().unwrap();
    assert_eq!(edited.notes.as_deref(), Some("Piano on second floor"));
    assert_eq!(edited.client_name, "Asha");
    assert!(edited.updated_at > job.updated_at);

    let snap = JobRepo::snapshot(&pool, job.id).await.unwrap().unwrap();
    let owner = Actor { user_id: maker, role: ROLE_MAKER };
    let submit = plan(&snap, &JobAction::Submit, &owner, Utc::now()).unwrap();
    JobRepo::apply_transition(&pool, &submit).await.unwrap().unwrap();

    assert!(JobRepo::update_if_draft(&pool, job.id, &edit).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn locations_are_replaced_wholesale(pool: PgPool) {
    let maker = user(&pool, "maker", ROLE_MAKER).await;
    let (job, _) = JobRepo::create(&pool, maker, &new_job("Asha"), &both_stops())
        .await
        .unwrap();

    let replacement = vec![
        location("delivery", "5 Linking Road", Some(2)),
        location("pickup", "3 Juhu Tara Road", Some(1)),
    ];
    let stored = LocationRepo::replace_for_draft(&pool, job.id, &replacement)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.len(), 2);

    let listed = LocationRepo::list_for_job(&pool, job.id).await.unwrap();
    let addresses: Vec<_> = listed.iter().map(|l| l.address.as_str()).collect();
    assert_eq!(addresses, vec!["3 Juhu Tara Road", "5 Linking Road"]);

    let snap = JobRepo::snapshot(&pool, job.id).await.unwrap().unwrap();
    let owner = Actor { user_id: maker, role: ROLE_MAKER };
    let submit = plan(&snap, &JobAction::Submit, &owner, Utc::now()).unwrap();
    JobRepo::apply_transition(&pool, &submit).await.unwrap().unwrap();

    assert!(LocationRepo::replace_for_draft(&pool, job.id, &both_stops())
        .await
        .unwrap()
        .is_none());
    assert_eq!(LocationRepo::list_for_job(&pool, job.id).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_status_and_owner(pool: PgPool) {
    let maker = user(&pool, "maker", ROLE_MAKER).await;
    let other = user(&pool, "other", ROLE_MAKER).await;
    JobRepo::create(&pool, maker, &new_job("A"), &[]).await.unwrap();
    JobRepo::create(&pool, maker, &new_job("B"), &[]).await.unwrap();
    JobRepo::create(&pool, other, &new_job("C"), &[]).await.unwrap();

    let mine = JobRepo::list(&pool, None, Some(maker), None, None).await.unwrap();
    assert_eq!(mine.len(), 2);

    let drafts = JobRepo::list(&pool, Some(JobStatus::Draft), None, Some(1), None)
        .await
        .unwrap();
    assert_eq!(drafts.len(), 1);

    let pending = JobRepo::list_pending_review(&pool, None, None).await.unwrap();
    assert!(pending.is_empty());
}
