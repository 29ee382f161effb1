//! # KIY Harmonic Engine
//!
//! Song-generation pipeline: turns a genre selection (plus optional
//! title, lyrics, and voice choice) into a persistable song record by
//! sequencing speech synthesis, motion-force resolution, and
//! AI-assisted display curation.
//!
//! The engine exposes only function-call boundaries. The surrounding
//! application (UI, auth, document store, config loading) supplies
//! implementations of the capability traits in [`services`] and
//! [`persist`].

pub mod motion;
pub mod persist;
pub mod prompt;
pub mod services;
pub mod wav;
pub mod workflow;

pub use motion::{ForceContribution, ResolvedMotion};
pub use prompt::SpeechSynthesisPrompt;
pub use services::{Curator, SpeechSynthesizer, VoiceConfig};
pub use workflow::{GeneratorEvent, SongGenerator};
