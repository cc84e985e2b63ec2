//! HTTP-level integration tests for `POST /ai/identify-item`.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{body_json, create_user, login, post_multipart_auth};
use haulage_api::vision::{ItemIdentifier, VisionError};
use sqlx::PgPool;

const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

/// Answers every image with the same model reply and counts calls.
struct FixedReply {
    reply: &'static str,
    calls: AtomicUsize,
}

#[async_trait]
impl ItemIdentifier for FixedReply {
    async fn identify(&self, _: &[u8], _: &str, prompt: &str) -> Result<String, VisionError> {
        assert!(prompt.contains("bedroom"), "room type should reach the prompt");
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.to_string())
    }
}

fn fixed(reply: &'static str) -> Arc<FixedReply> {
    Arc::new(FixedReply {
        reply,
        calls: AtomicUsize::new(0),
    })
}

async fn token(pool: &PgPool) -> String {
    create_user(pool, "surveyor", "maker").await;
    login(common::build_test_app(pool.clone()), "surveyor").await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_api_key_is_internal_error(pool: PgPool) {
    let token = token(&pool).await;

    let app = common::build_test_app(pool);
    let parts: &[(&str, Option<&str>, &[u8])] = &[("image", Some("image/jpeg"), JPEG)];
    let response = post_multipart_auth(app, "/api/v1/ai/identify-item", parts, &token).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_single_image_returns_one_guess(pool: PgPool) {
    let token = token(&pool).await;
    let identifier = fixed(
        r#"```json
{"itemName":"Queen Bed","category":"Furniture","condition":"good","confidenceScore":0.91,"fragile":false}
```"#,
    );

    let app = common::build_test_app_with_identifier(pool, identifier.clone());
    let parts: &[(&str, Option<&str>, &[u8])] = &[
        ("image", Some("image/jpeg"), JPEG),
        ("roomType", None, &b"bedroom"[..]),
    ];
    let response = post_multipart_auth(app, "/api/v1/ai/identify-item", parts, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"]["itemName"], "Queen Bed");
    assert_eq!(json["metadata"]["processed_count"], 1);
    assert_eq!(json["metadata"]["total_files"], 1);
    assert_eq!(identifier.calls.load(Ordering::SeqCst), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_several_images_return_a_list(pool: PgPool) {
    let token = token(&pool).await;
    let identifier = fixed("I could not tell what this is.");

    let app = common::build_test_app_with_identifier(pool, identifier.clone());
    let parts: &[(&str, Option<&str>, &[u8])] = &[
        ("image1", Some("image/jpeg"), JPEG),
        ("image2", Some("image/png"), JPEG),
        ("roomType", None, &b"bedroom"[..]),
    ];
    let response = post_multipart_auth(app, "/api/v1/ai/identify-item", parts, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 2);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data[0]["itemName"], "Unknown Item 1");
    assert_eq!(data[1]["itemName"], "Unknown Item 2");
    assert_eq!(identifier.calls.load(Ordering::SeqCst), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_images_is_bad_request(pool: PgPool) {
    let token = token(&pool).await;

    let app = common::build_test_app_with_identifier(pool, fixed("{}"));
    let parts: &[(&str, Option<&str>, &[u8])] = &[("roomType", None, &b"kitchen"[..])];
    let response = post_multipart_auth(app, "/api/v1/ai/identify-item", parts, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
