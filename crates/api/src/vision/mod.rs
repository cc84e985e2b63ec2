//! Vision model client used by AI item identification.
//!
//! Handlers depend on the [`ItemIdentifier`] trait only; [`gemini`] provides
//! the production implementation. The response text is normalized by
//! `haulage_core::identification`, not here.

use async_trait::async_trait;

pub mod gemini;

/// Error type for a single model call.
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The model endpoint returned a non-2xx status code.
    #[error("Vision model returned HTTP {0}")]
    HttpStatus(u16),

    /// The response carried no text candidate.
    #[error("Vision model returned no text")]
    EmptyResponse,
}

/// Sends one image plus an instruction to a vision model and returns its
/// raw text answer.
#[async_trait]
pub trait ItemIdentifier: Send + Sync {
    async fn identify(&self, image: &[u8], mime_type: &str, prompt: &str)
        -> Result<String, VisionError>;
}
