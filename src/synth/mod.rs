pub mod azure;

use async_trait::async_trait;
use thiserror::Error;

/// One utterance handed to a synthesizer. Built fresh on every accepted
/// trigger and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtteranceRequest {
    pub text: String,
    pub language: String,
    pub voice: String,
}

impl UtteranceRequest {
    pub fn new(text: &str, language: &str, voice: &str) -> Self {
        Self {
            text: text.to_string(),
            language: language.to_string(),
            voice: voice.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SynthError {
    #[error("synthesis transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status (bad credentials,
    /// rate limiting, malformed SSML, outage).
    #[error("synthesis service returned {status}: {body}")]
    Service { status: u16, body: String },
}

/// Trait that all speech synthesis backends must implement.
/// The control only ever holds one, but the seam keeps the orchestration
/// independent of any particular speech service.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesizes the utterance and returns the opaque audio payload.
    async fn synthesize(&self, request: &UtteranceRequest) -> Result<Vec<u8>, SynthError>;

    /// Unique ID of the backend (e.g., "azure-tts").
    fn id(&self) -> &'static str;
}
