//! External model adapters and their capability traits
//!
//! Orchestration depends only on the [`SpeechSynthesizer`] and
//! [`Curator`] traits; the REST clients here are the production
//! implementations and tests substitute deterministic fakes.

pub mod curation;
mod gemini;
pub mod speech;

pub use curation::{CurationClient, CurationError, CurationInput};
pub use speech::{SpeechClient, SpeechError};

use async_trait::async_trait;
use kiy_common::{CurationResult, Voice};

use crate::prompt::SpeechSynthesisPrompt;

/// Named synthetic voices for one request: the primary voice plus the
/// secondary used by two-speaker scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceConfig {
    pub primary: &'static str,
    pub secondary: &'static str,
}

impl VoiceConfig {
    /// Fixed voice catalogue, selected by the requested gender.
    pub fn for_voice(voice: Voice) -> Self {
        match voice {
            Voice::Male => Self {
                primary: "Algenib",
                secondary: "Puck",
            },
            Voice::Female => Self {
                primary: "Achernar",
                secondary: "Kore",
            },
        }
    }
}

/// Capability: render a prompt to a complete WAV byte stream
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Invoke the generative audio model and return finished WAV
    /// bytes (container header plus PCM payload).
    async fn synthesize(
        &self,
        prompt: &SpeechSynthesisPrompt,
        voices: &VoiceConfig,
    ) -> Result<Vec<u8>, SpeechError>;
}

/// Capability: pick which generated metadata to surface
#[async_trait]
pub trait Curator: Send + Sync {
    /// Invoke the curation model and return the curated subset.
    async fn curate(&self, input: &CurationInput) -> Result<CurationResult, CurationError>;
}
