//! # KIY Common Library
//!
//! Shared code for the KIY Harmonic engine:
//! - Generation request and song record types
//! - Curation result shape
//! - Crate-level error type

pub mod error;
pub mod model;

pub use error::{Error, Result};
pub use model::{CurationResult, GenerationRequest, Song, Voice};
