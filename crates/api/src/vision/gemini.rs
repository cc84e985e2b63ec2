//! Gemini `generateContent` REST client.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::{ItemIdentifier, VisionError};

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Per-image request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);

/// Configuration for the vision model.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl VisionConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `GOOGLE_AI_API_KEY` is not set or empty.
    ///
    /// | Variable             | Required | Default                                              |
    /// |----------------------|----------|------------------------------------------------------|
    /// | `GOOGLE_AI_API_KEY`  | yes      | --                                                   |
    /// | `GOOGLE_AI_MODEL`    | no       | `gemini-2.5-flash`                                   |
    /// | `GOOGLE_AI_BASE_URL` | no       | `https://generativelanguage.googleapis.com/v1beta`   |
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GOOGLE_AI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        Some(Self {
            api_key,
            model: std::env::var("GOOGLE_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: std::env::var("GOOGLE_AI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text { text: &'a str },
    Image { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

// ---------------------------------------------------------------------------
// GeminiIdentifier
// ---------------------------------------------------------------------------

/// Calls Gemini with one inline image per request.
pub struct GeminiIdentifier {
    config: VisionConfig,
    client: reqwest::Client,
}

impl GeminiIdentifier {
    pub fn new(config: VisionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }
}

#[async_trait]
impl ItemIdentifier for GeminiIdentifier {
    async fn identify(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, VisionError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    RequestPart::Text { text: prompt },
                    RequestPart::Image {
                        inline_data: InlineData {
                            mime_type,
                            data: STANDARD.encode(image),
                        },
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VisionError::HttpStatus(status.as_u16()));
        }

        response
            .json::<GenerateResponse>()
            .await?
            .text()
            .ok_or(VisionError::EmptyResponse)
    }
}
