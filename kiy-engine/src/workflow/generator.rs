//! Song generator: the orchestration action behind `generate()`

use base64::{engine::general_purpose::STANDARD, Engine as _};
use kiy_common::{Error, GenerationRequest, Result, Song};
use rand::Rng;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

use super::GeneratorEvent;
use crate::motion;
use crate::prompt::{self, SpeechSynthesisPrompt};
use crate::services::{CurationInput, Curator, SpeechSynthesizer, VoiceConfig};

/// Transparent 1x1 PNG handed to the curation model as the cover
/// image placeholder; the model decides whether an image is shown.
const PLACEHOLDER_IMAGE_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

const MOODS: [&str; 4] = ["Uplifting", "Melancholic", "Energetic", "Calm"];
const KEYS: [&str; 5] = ["C", "G", "D", "A", "E"];
const SCALES: [&str; 2] = ["Major", "Minor"];

/// Orchestrates one generation per user action.
///
/// Holds the two capability adapters; concurrent in-flight
/// generations are independent (no shared mutable state, no
/// deduplication). There is no retry and no internal timeout; timeout
/// policy lives inside the adapters.
pub struct SongGenerator {
    speech: Arc<dyn SpeechSynthesizer>,
    curator: Arc<dyn Curator>,
    event_tx: Option<mpsc::Sender<GeneratorEvent>>,
}

impl SongGenerator {
    pub fn new(speech: Arc<dyn SpeechSynthesizer>, curator: Arc<dyn Curator>) -> Self {
        Self {
            speech,
            curator,
            event_tx: None,
        }
    }

    /// Attach a progress-event channel for UI feedback.
    pub fn with_events(mut self, event_tx: mpsc::Sender<GeneratorEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// Run the full pipeline for one request.
    ///
    /// On any adapter failure the original cause is logged here and
    /// the caller receives only [`Error::GenerationFailed`]; no
    /// partial song record is ever returned.
    pub async fn generate(&self, request: GenerationRequest) -> Result<Song> {
        if request.genre.trim().is_empty() {
            return Err(Error::InvalidInput("genre must not be empty".to_string()));
        }

        info!(genre = %request.genre, "starting song generation");
        self.emit(GeneratorEvent::Started {
            genre: request.genre.clone(),
        })
        .await;

        // Motion resolution is synchronous and independent of the
        // speech call; run it first so curation has the style ready.
        let motion = motion::resolve(&request);
        self.emit(GeneratorEvent::MotionResolved {
            resolved_style: motion.resolved_style.clone(),
        })
        .await;

        let prompt = speech_prompt(&request);
        let voices = VoiceConfig::for_voice(request.voice);

        let wav = match self.speech.synthesize(&prompt, &voices).await {
            Ok(wav) => wav,
            Err(cause) => {
                error!(%cause, "speech synthesis failed");
                self.emit(GeneratorEvent::Failed { stage: "speech" }).await;
                return Err(Error::GenerationFailed);
            }
        };
        self.emit(GeneratorEvent::SpeechSynthesized {
            wav_bytes: wav.len(),
        })
        .await;

        let title = request
            .title
            .clone()
            .unwrap_or_else(|| format!("Untitled {} Track", request.genre));

        let curation_input = CurationInput {
            song_title: title.clone(),
            genre_tags: display_tags(&request.genre, &motion.resolved_style),
            audio_features: audio_features(&motion.resolved_style),
            image_data_uri: PLACEHOLDER_IMAGE_DATA_URI.to_string(),
        };

        let curated_info = match self.curator.curate(&curation_input).await {
            Ok(curated) => curated,
            Err(cause) => {
                error!(%cause, "curation failed");
                self.emit(GeneratorEvent::Failed { stage: "curation" }).await;
                return Err(Error::GenerationFailed);
            }
        };
        self.emit(GeneratorEvent::Curated).await;

        let song = Song::new(title, request.genre, STANDARD.encode(wav), curated_info);
        info!(song_id = %song.id, title = %song.title, "song generated");
        self.emit(GeneratorEvent::Completed { song_id: song.id }).await;

        Ok(song)
    }

    async fn emit(&self, event: GeneratorEvent) {
        if let Some(tx) = &self.event_tx {
            // A dropped receiver must not fail the pipeline.
            let _ = tx.send(event).await;
        }
    }
}

/// Prompt for the speech model: transformed lyrics when supplied,
/// otherwise a short instrumental direction for the genre.
fn speech_prompt(request: &GenerationRequest) -> SpeechSynthesisPrompt {
    match &request.lyrics {
        Some(lyrics) => prompt::transform(lyrics),
        None => SpeechSynthesisPrompt::single(format!(
            "A short, instrumental piece in the style of {}",
            request.genre
        )),
    }
}

/// Candidate display tags: the chosen genre plus the resolved style,
/// deduplicated.
fn display_tags(genre: &str, resolved_style: &str) -> Vec<String> {
    let mut tags = vec![genre.to_string()];
    if resolved_style != genre {
        tags.push(resolved_style.to_string());
    }
    tags
}

/// Placeholder audio features for the curation model: a plausible
/// tempo, mood, and key, plus the resolved style.
fn audio_features(resolved_style: &str) -> BTreeMap<String, Value> {
    let mut rng = rand::thread_rng();
    let mut features = BTreeMap::new();
    features.insert("tempo".to_string(), json!(rng.gen_range(90..150)));
    features.insert(
        "mood".to_string(),
        json!(MOODS[rng.gen_range(0..MOODS.len())]),
    );
    features.insert(
        "key".to_string(),
        json!(format!(
            "{} {}",
            KEYS[rng.gen_range(0..KEYS.len())],
            SCALES[rng.gen_range(0..SCALES.len())]
        )),
    );
    features.insert("resolvedStyle".to_string(), json!(resolved_style));
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_deduplicate_genre_and_style() {
        assert_eq!(display_tags("jazz", "jazz"), vec!["jazz"]);
        assert_eq!(
            display_tags("jazz", "Atmospheric"),
            vec!["jazz", "Atmospheric"]
        );
    }

    #[test]
    fn features_carry_the_resolved_style_and_plausible_tempo() {
        let features = audio_features("Energetic");
        assert_eq!(features["resolvedStyle"], json!("Energetic"));
        let tempo = features["tempo"].as_i64().unwrap();
        assert!((90..150).contains(&tempo));
        assert!(features.contains_key("mood"));
        assert!(features.contains_key("key"));
    }

    #[test]
    fn instrumental_prompt_is_used_without_lyrics() {
        let request = GenerationRequest::new("classical");
        let prompt = speech_prompt(&request);
        assert!(!prompt.multi_speaker);
        assert_eq!(
            prompt.text,
            "A short, instrumental piece in the style of classical"
        );
    }

    #[test]
    fn lyrics_are_transformed_for_the_speech_model() {
        let request =
            GenerationRequest::new("pop").with_lyrics("[Verse] Hello [Chorus] World");
        let prompt = speech_prompt(&request);
        assert!(prompt.multi_speaker);
        assert_eq!(prompt.text, "Speaker1: Hello\nSpeaker2: World");
    }
}
