//! Display-curation adapter
//!
//! Asks the language model which of a generated song's features are
//! worth surfacing: title visibility, which genre tags to show, which
//! audio features to highlight, and whether to show the cover image.
//! The model is trusted to return JSON conforming to the declared
//! shape; anything else is a [`CurationError::MalformedResponse`].

use async_trait::async_trait;
use kiy_common::CurationResult;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::gemini::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    GEMINI_BASE_URL, USER_AGENT,
};
use super::Curator;

const DEFAULT_CURATION_MODEL: &str = "gemini-2.0-flash";

/// Curation adapter errors
#[derive(Debug, Error)]
pub enum CurationError {
    /// The model reply did not conform to the curation result shape
    #[error("Malformed curation response: {0}")]
    MalformedResponse(String),

    /// The model reply carried no text part at all
    #[error("Empty curation response")]
    EmptyResponse,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),
}

/// Song metadata handed to the curation model
#[derive(Debug, Clone, PartialEq)]
pub struct CurationInput {
    /// Title of the generated song
    pub song_title: String,
    /// Candidate genre/style tags
    pub genre_tags: Vec<String>,
    /// Computed audio features (tempo, mood, key, resolved style, ...)
    pub audio_features: BTreeMap<String, Value>,
    /// Cover image as a `data:<mimetype>;base64,<data>` URI
    pub image_data_uri: String,
}

/// REST client for the curation model
pub struct CurationClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl CurationClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, CurationError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CurationError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            model: DEFAULT_CURATION_MODEL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{GEMINI_BASE_URL}/{}:generateContent?key={}",
            self.model, self.api_key
        )
    }
}

/// Render the structured curation prompt for one song.
fn build_prompt_text(input: &CurationInput) -> String {
    format!(
        "You are an AI-powered music curation expert. Your task is to analyze a \
         generated song and decide which of its features are most important to \
         display to the user.\n\n\
         Here's information about the song:\n\
         Title: {title}\n\
         Genre Tags: {tags}\n\
         Audio Features: {features}\n\
         Image: {image}\n\n\
         Based on this information, decide:\n\
         - Should the song title be included in the display? (titleIncluded: true/false)\n\
         - Which genre tags are most relevant to display? (displayedTags: array of strings)\n\
         - Which audio features should be highlighted? (highlightedFeatures: object)\n\
         - Should the image be included? (imageIncluded: true/false)\n\n\
         Respond with a JSON object that includes exactly these fields. Be concise \
         and only include the most important information for the user. Focus on \
         features that make this song unique and interesting.",
        title = input.song_title,
        tags = input.genre_tags.join(", "),
        features = serde_json::to_string(&input.audio_features).unwrap_or_default(),
        image = input.image_data_uri,
    )
}

fn build_request(input: &CurationInput) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part::text(build_prompt_text(input))],
        }],
        generation_config: GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            ..Default::default()
        },
    }
}

/// Parse the model's reply into a [`CurationResult`].
///
/// Tolerates a Markdown code fence around the JSON, which some models
/// emit even in JSON mode.
fn parse_curation(text: &str) -> Result<CurationResult, CurationError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(body.trim()).map_err(|e| CurationError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl Curator for CurationClient {
    async fn curate(&self, input: &CurationInput) -> Result<CurationResult, CurationError> {
        let request = build_request(input);

        let response = self
            .http_client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| CurationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CurationError::Api(status.as_u16(), body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CurationError::MalformedResponse(e.to_string()))?;

        let text = parsed.first_text().ok_or(CurationError::EmptyResponse)?;
        debug!(len = text.len(), "parsing curation reply");
        parse_curation(text)
    }
}
