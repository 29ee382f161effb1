//! Generation workflow orchestration
//!
//! Sequences the pipeline for one user action: speech synthesis and
//! motion resolution (independent of each other), then curation over
//! their merged outputs, then assembly of the persistable song
//! record. Any adapter failure is logged with its cause and surfaced
//! as the single generic user-facing error; partial results are
//! discarded, never persisted.

pub mod generator;

pub use generator::SongGenerator;

use uuid::Uuid;

/// Progress events emitted while a generation runs, for UI feedback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorEvent {
    /// Pipeline accepted the request
    Started { genre: String },
    /// Motion forces resolved to a style
    MotionResolved { resolved_style: String },
    /// Speech model returned audio (finished WAV length in bytes)
    SpeechSynthesized { wav_bytes: usize },
    /// Curation model selected the display metadata
    Curated,
    /// Song record assembled
    Completed { song_id: Uuid },
    /// Pipeline failed at the named stage
    Failed { stage: &'static str },
}
