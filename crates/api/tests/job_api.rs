//! HTTP-level integration tests for the job lifecycle, locations and items.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use chrono::{DateTime, Utc};
use common::{
    body_json, create_user, delete_auth, get_auth, login, post_json_auth, put_json_auth,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Crew {
    maker: String,
    other_maker: String,
    checker: String,
}

async fn crew(pool: &PgPool) -> Crew {
    create_user(pool, "maker", "maker").await;
    create_user(pool, "maker2", "maker").await;
    create_user(pool, "checker", "checker").await;
    Crew {
        maker: login(app(pool), "maker").await,
        other_maker: login(app(pool), "maker2").await,
        checker: login(app(pool), "checker").await,
    }
}

fn app(pool: &PgPool) -> Router {
    common::build_test_app(pool.clone())
}

fn job_body() -> serde_json::Value {
    serde_json::json!({
        "client_name": "Asha Rao",
        "client_phone": "+91 98200 00000",
        "client_email": "asha@example.com",
        "job_type": "direct_move",
        "locations": [
            { "location_type": "pickup", "address": "12 MG Road", "city": "Pune" },
            { "location_type": "delivery", "address": "4 Marine Drive", "city": "Mumbai" }
        ]
    })
}

async fn create_job(pool: &PgPool, token: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(app(pool), "/api/v1/jobs", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn post_action(
    pool: &PgPool,
    token: &str,
    id: i64,
    action: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let uri = format!("/api/v1/jobs/{id}/{action}");
    let response = post_json_auth(app(pool), &uri, body, token).await;
    let status = response.status();
    (status, body_json(response).await)
}

fn timestamp(value: &serde_json::Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

fn approve() -> serde_json::Value {
    serde_json::json!({ "action": "approve" })
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_lifecycle(pool: PgPool) {
    let crew = crew(&pool).await;

    let job = create_job(&pool, &crew.maker, job_body()).await;
    assert_eq!(job["status"], "draft");
    assert!(job["job_number"].as_str().unwrap().starts_with("JOB-"));
    let id = job["id"].as_i64().unwrap();

    let (status, json) = post_action(&pool, &crew.maker, id, "submit", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "pending_review");
    assert!(json["data"]["submitted_at"].is_string());

    let (status, json) = post_action(&pool, &crew.checker, id, "approve", approve()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "in_progress");
    assert!(json["data"]["decided_by"].is_number());

    let (status, json) =
        post_action(&pool, &crew.maker, id, "complete", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "completed");
    assert!(json["data"]["completed_at"].is_string());

    // Terminal: nothing further is allowed.
    let (status, _) = post_action(&pool, &crew.maker, id, "cancel", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_immediate_submit(pool: PgPool) {
    let crew = crew(&pool).await;

    let mut body = job_body();
    body["submit_for_review"] = serde_json::json!(true);
    let job = create_job(&pool, &crew.maker, body).await;

    assert_eq!(job["status"], "pending_review");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_immediate_submit_without_delivery_stores_nothing(pool: PgPool) {
    let crew = crew(&pool).await;

    let mut body = job_body();
    body["locations"] = serde_json::json!([
        { "location_type": "pickup", "address": "12 MG Road", "city": "Pune" }
    ]);
    body["submit_for_review"] = serde_json::json!(true);
    let response = post_json_auth(app(&pool), "/api/v1/jobs", body, &crew.maker).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let jobs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
        .fetch_one(&pool)
        .await
        .unwrap();
    let locations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_locations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(jobs, 0);
    assert_eq!(locations, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_job_numbers_are_sequential(pool: PgPool) {
    let crew = crew(&pool).await;

    let first = create_job(&pool, &crew.maker, job_body()).await;
    let second = create_job(&pool, &crew.maker, job_body()).await;

    let first = first["job_number"].as_str().unwrap();
    let second = second["job_number"].as_str().unwrap();
    assert!(first.ends_with("-0001"), "got {first}");
    assert!(second.ends_with("-0002"), "got {second}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_approval_conflicts(pool: PgPool) {
    let crew = crew(&pool).await;
    let id = create_job(&pool, &crew.maker, job_body()).await["id"]
        .as_i64()
        .unwrap();
    post_action(&pool, &crew.maker, id, "submit", serde_json::json!({})).await;

    let (status, _) = post_action(&pool, &crew.checker, id, "approve", approve()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = post_action(&pool, &crew.checker, id, "approve", approve()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_maker_cannot_approve(pool: PgPool) {
    let crew = crew(&pool).await;
    let id = create_job(&pool, &crew.maker, job_body()).await["id"]
        .as_i64()
        .unwrap();
    post_action(&pool, &crew.maker, id, "submit", serde_json::json!({})).await;

    let (status, _) = post_action(&pool, &crew.maker, id, "approve", approve()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_requires_reason_and_returns_to_draft(pool: PgPool) {
    let crew = crew(&pool).await;
    let id = create_job(&pool, &crew.maker, job_body()).await["id"]
        .as_i64()
        .unwrap();
    post_action(&pool, &crew.maker, id, "submit", serde_json::json!({})).await;

    let blank = serde_json::json!({ "action": "reject", "rejection_reason": "   " });
    let (status, json) = post_action(&pool, &crew.checker, id, "approve", blank).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Rejection reason is required");

    let reject = serde_json::json!({ "action": "reject", "rejection_reason": " Missing inventory " });
    let (status, json) = post_action(&pool, &crew.checker, id, "approve", reject).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "draft");
    assert_eq!(json["data"]["rejection_reason"], "Missing inventory");

    // Resubmitting clears the reason.
    let (status, json) = post_action(&pool, &crew.maker, id, "submit", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["rejection_reason"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_without_delivery_is_rejected(pool: PgPool) {
    let crew = crew(&pool).await;
    let body = serde_json::json!({
        "client_name": "No Delivery",
        "locations": [{ "location_type": "pickup", "address": "1 Dock Rd" }]
    });
    let id = create_job(&pool, &crew.maker, body).await["id"].as_i64().unwrap();

    let (status, json) = post_action(&pool, &crew.maker, id, "submit", serde_json::json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_owner_may_submit(pool: PgPool) {
    let crew = crew(&pool).await;
    let id = create_job(&pool, &crew.maker, job_body()).await["id"]
        .as_i64()
        .unwrap();

    let (status, _) =
        post_action(&pool, &crew.other_maker, id, "submit", serde_json::json!({})).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancel_from_pending_review(pool: PgPool) {
    let crew = crew(&pool).await;
    let id = create_job(&pool, &crew.maker, job_body()).await["id"]
        .as_i64()
        .unwrap();
    post_action(&pool, &crew.maker, id, "submit", serde_json::json!({})).await;

    let (status, json) = post_action(&pool, &crew.maker, id, "cancel", serde_json::json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "cancelled");
    assert!(json["data"]["cancelled_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_job_is_404(pool: PgPool) {
    let crew = crew(&pool).await;

    let (status, json) =
        post_action(&pool, &crew.maker, 9999, "submit", serde_json::json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Job with id 9999 not found");
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_only_while_draft(pool: PgPool) {
    let crew = crew(&pool).await;
    let job = create_job(&pool, &crew.maker, job_body()).await;
    let id = job["id"].as_i64().unwrap();
    let created_at = timestamp(&job["updated_at"]);
    let uri = format!("/api/v1/jobs/{id}");

    tokio::time::sleep(Duration::from_millis(20)).await;
    let edit = serde_json::json!({ "client_name": "Asha R. Rao", "notes": "Piano on 3rd floor" });
    let response = put_json_auth(app(&pool), &uri, edit.clone(), &crew.maker).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["client_name"], "Asha R. Rao");
    assert_eq!(json["data"]["notes"], "Piano on 3rd floor");
    assert!(timestamp(&json["data"]["updated_at"]) > created_at);

    post_action(&pool, &crew.maker, id, "submit", serde_json::json!({})).await;

    let response = put_json_auth(app(&pool), &uri, edit, &crew.maker).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_locations(pool: PgPool) {
    let crew = crew(&pool).await;
    let id = create_job(&pool, &crew.maker, job_body()).await["id"]
        .as_i64()
        .unwrap();

    let body = serde_json::json!({
        "locations": [
            { "location_type": "pickup", "address": "1 Old Lane" },
            { "location_type": "delivery", "address": "2 New Street" },
            { "location_type": "delivery", "address": "3 Other Street" }
        ]
    });
    let uri = format!("/api/v1/jobs/{id}/locations");
    let response = put_json_auth(app(&pool), &uri, body, &crew.maker).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    let response = get_auth(app(&pool), &format!("/api/v1/jobs/{id}"), &crew.maker).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["locations"].as_array().unwrap().len(), 3);
    assert_eq!(json["data"]["locations"][0]["address"], "1 Old Lane");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_location_type_is_rejected(pool: PgPool) {
    let crew = crew(&pool).await;
    let body = serde_json::json!({
        "client_name": "Bad Location",
        "locations": [{ "location_type": "depot", "address": "1 Dock Rd" }]
    });

    let response = post_json_auth(app(&pool), "/api/v1/jobs", body, &crew.maker).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_approval_queue(pool: PgPool) {
    let crew = crew(&pool).await;
    let submitted = create_job(&pool, &crew.maker, job_body()).await["id"]
        .as_i64()
        .unwrap();
    create_job(&pool, &crew.other_maker, job_body()).await;
    post_action(&pool, &crew.maker, submitted, "submit", serde_json::json!({})).await;

    let response = get_auth(app(&pool), "/api/v1/jobs", &crew.maker).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = get_auth(app(&pool), "/api/v1/jobs?mine=true", &crew.other_maker).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = get_auth(app(&pool), "/api/v1/jobs?status=pending_review", &crew.maker).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"], submitted);

    let response = get_auth(app(&pool), "/api/v1/jobs?status=teleported", &crew.maker).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(app(&pool), "/api/v1/jobs/approvals", &crew.checker).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = get_auth(app(&pool), "/api/v1/jobs/approvals", &crew.maker).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_item_crud_and_totals(pool: PgPool) {
    let crew = crew(&pool).await;
    let id = create_job(&pool, &crew.maker, job_body()).await["id"]
        .as_i64()
        .unwrap();
    let items_uri = format!("/api/v1/jobs/{id}/items");

    let sofa = serde_json::json!({
        "item_name": "Three-seat Sofa",
        "category": "Furniture",
        "quantity": 1,
        "condition": "good",
        "ai_confidence_score": 0.62
    });
    let response = post_json_auth(app(&pool), &items_uri, sofa, &crew.maker).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let sofa = body_json(response).await["data"].clone();
    assert_eq!(sofa["manual_verification"], true);

    let plates = serde_json::json!({
        "item_name": "Dinner Plates",
        "category": "Kitchenware",
        "quantity": 12,
        "fragile": true,
        "delivery_id": 2
    });
    let response = post_json_auth(app(&pool), &items_uri, plates, &crew.maker).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let item_uri = format!("{items_uri}/{}", sofa["id"]);
    let update = serde_json::json!({ "quantity": 2, "condition": "fair" });
    let response = put_json_auth(app(&pool), &item_uri, update, &crew.checker).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["quantity"], 2);
    assert_eq!(json["data"]["condition"], "fair");

    let response = get_auth(app(&pool), &format!("/api/v1/jobs/{id}"), &crew.maker).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["item_totals"]["total"], 14);
    assert_eq!(json["data"]["item_totals"]["per_delivery"]["1"], 2);
    assert_eq!(json["data"]["item_totals"]["per_delivery"]["2"], 12);

    let response = delete_auth(app(&pool), &item_uri, &crew.maker).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(app(&pool), &item_uri, &crew.maker).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app(&pool), &items_uri, &crew.maker).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_item_validation(pool: PgPool) {
    let crew = crew(&pool).await;
    let id = create_job(&pool, &crew.maker, job_body()).await["id"]
        .as_i64()
        .unwrap();

    let bad = serde_json::json!({ "item_name": "Car", "category": "Vehicles", "quantity": 0 });
    let uri = format!("/api/v1/jobs/{id}/items");
    let response = post_json_auth(app(&pool), &uri, bad, &crew.maker).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let ok = serde_json::json!({ "item_name": "Lamp", "category": "Electronics" });
    let response = post_json_auth(app(&pool), "/api/v1/jobs/9999/items", ok, &crew.maker).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Warehouses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_warehouse_storage_job(pool: PgPool) {
    let crew = crew(&pool).await;
    create_user(&pool, "root", "super_admin").await;
    let admin = login(app(&pool), "root").await;

    let body = serde_json::json!({ "name": "Bhiwandi Depot", "address": "NH 3" });
    let response = post_json_auth(app(&pool), "/api/v1/warehouses", body.clone(), &crew.maker).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = post_json_auth(app(&pool), "/api/v1/warehouses", body, &admin).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let warehouse_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = get_auth(app(&pool), "/api/v1/warehouses", &crew.maker).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let mut job = job_body();
    job["job_type"] = serde_json::json!("warehouse_storage");
    job["warehouse_holding"] = serde_json::json!(true);
    job["warehouse_id"] = serde_json::json!(warehouse_id);
    job["storage_start_date"] = serde_json::json!("2025-03-01");
    job["storage_end_date"] = serde_json::json!("2025-02-01");
    let response = post_json_auth(app(&pool), "/api/v1/jobs", job.clone(), &crew.maker).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    job["storage_end_date"] = serde_json::json!("2025-06-01");
    let id = create_job(&pool, &crew.maker, job).await["id"].as_i64().unwrap();
    let response = get_auth(app(&pool), &format!("/api/v1/jobs/{id}"), &crew.maker).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["warehouse"]["name"], "Bhiwandi Depot");
}
