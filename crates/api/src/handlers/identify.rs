//! Handler for `POST /ai/identify-item`: AI-assisted item identification.
//!
//! Images are sent to the vision model one at a time under a fixed batch
//! budget. A failed or unparseable image yields a placeholder guess; running
//! out of budget returns 408 with whatever was identified so far.

use std::time::{Duration, Instant};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use haulage_core::identification::{
    build_prompt, can_start_next, parse_model_response, validate_upload_sizes, ItemGuess,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::vision::ItemIdentifier;

const DEFAULT_ROOM_TYPE: &str = "general";
const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// One uploaded image.
#[derive(Debug)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Result of a batch run.
#[derive(Debug)]
pub enum BatchOutcome {
    Complete(Vec<ItemGuess>),
    /// The budget ran out before every image was started.
    OutOfTime(Vec<ItemGuess>),
}

/// `data` is a single guess for a one-image upload, a list otherwise.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Identified {
    One(ItemGuess),
    Many(Vec<ItemGuess>),
}

#[derive(Debug, Serialize)]
pub struct BatchMetadata {
    pub processed_count: usize,
    pub total_files: usize,
    pub processing_time_ms: u128,
}

#[derive(Debug, Serialize)]
pub struct IdentifyResponse {
    pub success: bool,
    pub data: Identified,
    pub metadata: BatchMetadata,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct PartialIdentifyResponse {
    pub error: String,
    pub code: &'static str,
    pub partial_results: Vec<ItemGuess>,
    pub processed_count: usize,
}

/// Identify each image in order.
///
/// `elapsed` reports time spent on the batch so far; before each image the
/// remaining budget is checked and the batch stops early if it is too small.
pub async fn run_batch<F>(
    identifier: &dyn ItemIdentifier,
    images: &[UploadedImage],
    room_type: &str,
    mut elapsed: F,
) -> BatchOutcome
where
    F: FnMut() -> Duration,
{
    let prompt = build_prompt(room_type);
    let mut results = Vec::with_capacity(images.len());

    for (index, image) in images.iter().enumerate() {
        let position = index + 1;
        if !can_start_next(elapsed()) {
            tracing::warn!(
                processed = index,
                total = images.len(),
                "Identification budget exhausted",
            );
            return BatchOutcome::OutOfTime(results);
        }

        let guess = match identifier
            .identify(&image.bytes, &image.mime_type, &prompt)
            .await
        {
            Ok(text) => parse_model_response(&text, position),
            Err(e) => {
                tracing::error!(position, error = %e, "Vision model call failed");
                ItemGuess::failed(position)
            }
        };
        tracing::debug!(
            position,
            item = %guess.item_name,
            confidence = guess.confidence_score,
            "Image identified",
        );
        results.push(guess);
    }

    BatchOutcome::Complete(results)
}

/// POST /api/v1/ai/identify-item
///
/// Multipart form: one or more `image*` file fields and an optional
/// `roomType` text field.
pub async fn identify_item(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let started = Instant::now();

    let identifier = state
        .identifier
        .clone()
        .ok_or_else(|| AppError::InternalError("Google AI API key not configured".into()))?;

    let mut images: Vec<UploadedImage> = Vec::new();
    let mut room_type = DEFAULT_ROOM_TYPE.to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "roomType" {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if !text.trim().is_empty() {
                room_type = text.trim().to_string();
            }
        } else if name.starts_with("image") {
            let mime_type = field
                .content_type()
                .unwrap_or(DEFAULT_MIME_TYPE)
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            images.push(UploadedImage {
                bytes: bytes.to_vec(),
                mime_type,
            });
        }
    }

    let sizes: Vec<usize> = images.iter().map(|i| i.bytes.len()).collect();
    validate_upload_sizes(&sizes)?;

    tracing::info!(
        user_id = auth.user_id,
        images = images.len(),
        total_bytes = sizes.iter().sum::<usize>(),
        room_type = %room_type,
        "Identifying items",
    );

    let total_files = images.len();
    let outcome = run_batch(identifier.as_ref(), &images, &room_type, || started.elapsed()).await;

    match outcome {
        BatchOutcome::Complete(mut results) => {
            let count = results.len();
            let data = if count == 1 {
                Identified::One(results.remove(0))
            } else {
                Identified::Many(results)
            };
            Ok(Json(IdentifyResponse {
                success: true,
                data,
                metadata: BatchMetadata {
                    processed_count: count,
                    total_files,
                    processing_time_ms: started.elapsed().as_millis(),
                },
                count,
            })
            .into_response())
        }
        BatchOutcome::OutOfTime(partial) => {
            let processed_count = partial.len();
            Ok((
                StatusCode::REQUEST_TIMEOUT,
                Json(PartialIdentifyResponse {
                    error: format!(
                        "Processing timeout. Completed {processed_count} of {total_files} images."
                    ),
                    code: "TIMEOUT",
                    partial_results: partial,
                    processed_count,
                }),
            )
                .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use haulage_core::identification::BATCH_BUDGET;

    use super::*;
    use crate::vision::VisionError;

    struct Scripted {
        replies: Vec<Result<&'static str, u16>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ItemIdentifier for Scripted {
        async fn identify(&self, _: &[u8], _: &str, _: &str) -> Result<String, VisionError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.replies[n] {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(VisionError::HttpStatus(status)),
            }
        }
    }

    fn images(n: usize) -> Vec<UploadedImage> {
        (0..n)
            .map(|_| UploadedImage {
                bytes: vec![0xFF, 0xD8],
                mime_type: "image/jpeg".to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn failures_become_placeholders_without_aborting() {
        let identifier = Scripted {
            replies: vec![
                Ok("```json\n{\"itemName\":\"Brown Table\",\"category\":\"Furniture\",\"condition\":\"fair\",\"confidenceScore\":0.9}\n```"),
                Ok("not json"),
                Err(503),
            ],
            calls: AtomicUsize::new(0),
        };

        let outcome = run_batch(&identifier, &images(3), "bedroom", || Duration::ZERO).await;
        let BatchOutcome::Complete(results) = outcome else {
            panic!("expected a complete batch");
        };
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].item_name, "Brown Table");
        assert_eq!(results[1].item_name, "Unknown Item 2");
        assert_eq!(results[2].item_name, "Failed to Process Image 3");
        assert_eq!(results[2].confidence_score, 0.0);
    }

    #[tokio::test]
    async fn stops_when_budget_runs_low() {
        let identifier = Scripted {
            replies: vec![Ok("{}"), Ok("{}"), Ok("{}")],
            calls: AtomicUsize::new(0),
        };

        // The second check already sees only 20 s of budget left.
        let mut ticks = vec![Duration::ZERO, BATCH_BUDGET - Duration::from_secs(20)].into_iter();
        let outcome = run_batch(&identifier, &images(3), "general", move || {
            ticks.next().unwrap_or(BATCH_BUDGET)
        })
        .await;

        let BatchOutcome::OutOfTime(partial) = outcome else {
            panic!("expected the batch to run out of time");
        };
        assert_eq!(partial.len(), 1);
        assert_eq!(identifier.calls.load(Ordering::SeqCst), 1);
    }
}
