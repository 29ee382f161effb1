//! Core data model: generation requests, curation results, song records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Synthetic voice gender requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Male,
    Female,
}

/// One song-generation request, produced fresh per user action
///
/// Immutable once constructed. Only `genre` is required; title and
/// lyrics refine the result when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Primary genre selected by the user
    pub genre: String,
    /// Optional song title
    pub title: Option<String>,
    /// Optional lyrics, possibly containing bracketed section tags
    /// such as `[Verse]` or `[Chorus]`
    pub lyrics: Option<String>,
    /// Requested synthetic voice
    pub voice: Voice,
}

impl GenerationRequest {
    /// Request with genre only, defaults elsewhere
    pub fn new(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
            title: None,
            lyrics: None,
            voice: Voice::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = Some(lyrics.into());
        self
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = voice;
        self
    }
}

/// Curated display metadata chosen by the curation model
///
/// Field names match the collaborator document store's record shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurationResult {
    /// Whether the song title should be shown
    pub title_included: bool,
    /// Genre tags selected for display
    pub displayed_tags: Vec<String>,
    /// Audio features worth highlighting (tempo, mood, key, ...)
    pub highlighted_features: BTreeMap<String, Value>,
    /// Whether the cover image should be shown
    pub image_included: bool,
}

/// Persisted song record, one per successful generation
///
/// Never mutated after creation; deleted only by explicit user action.
/// Owned exclusively by the requesting user's session or account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Client-generated unique identifier
    pub id: Uuid,
    /// Resolved title (user-supplied or generated fallback)
    pub title: String,
    /// Genre the song was generated from
    pub genre: String,
    /// Base64-encoded WAV bytes (44-byte header + PCM payload)
    pub audio_data: String,
    /// Display metadata selected by the curation model
    pub curated_info: CurationResult,
    /// Creation timestamp, assigned once
    pub created_at: DateTime<Utc>,
}

impl Song {
    /// Assemble a record, assigning the identifier and timestamp
    pub fn new(
        title: impl Into<String>,
        genre: impl Into<String>,
        audio_data: String,
        curated_info: CurationResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            genre: genre.into(),
            audio_data,
            curated_info,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_male_voice() {
        let request = GenerationRequest::new("jazz");
        assert_eq!(request.voice, Voice::Male);
        assert!(request.title.is_none());
        assert!(request.lyrics.is_none());
    }

    #[test]
    fn song_record_serializes_with_camel_case_fields() {
        let song = Song::new(
            "Night Drive",
            "electronic",
            "UklGRg==".to_string(),
            CurationResult {
                title_included: true,
                displayed_tags: vec!["electronic".to_string()],
                highlighted_features: BTreeMap::new(),
                image_included: false,
            },
        );

        let json = serde_json::to_value(&song).unwrap();
        assert!(json.get("audioData").is_some());
        assert!(json.get("curatedInfo").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json["curatedInfo"].get("titleIncluded").is_some());
        assert!(json["curatedInfo"].get("displayedTags").is_some());
    }

    #[test]
    fn voice_round_trips_through_lowercase_strings() {
        assert_eq!(serde_json::to_string(&Voice::Female).unwrap(), "\"female\"");
        let voice: Voice = serde_json::from_str("\"male\"").unwrap();
        assert_eq!(voice, Voice::Male);
    }
}
