//! Generative speech adapter
//!
//! Invokes the external text-to-speech model requesting audio-only
//! output, decodes the returned payload to raw PCM, and wraps it in a
//! WAV container at the 24 kHz / mono / 16-bit synthesis profile.
//! This is the single network-bound step of the pipeline and is
//! awaited to completion; no streaming playback.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::gemini::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    MultiSpeakerVoiceConfig, Part, SpeakerVoiceConfig, SpeechConfig, VoiceSelection,
    GEMINI_BASE_URL, USER_AGENT,
};
use super::{SpeechSynthesizer, VoiceConfig};
use crate::prompt::{SpeechSynthesisPrompt, PRIMARY_SPEAKER, SECONDARY_SPEAKER};
use crate::wav::{self, WavSpec};

const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Speech adapter errors
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The model response carried no audio payload
    #[error("No media returned from audio generation")]
    NoAudio,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Audio payload was not valid base64
    #[error("Invalid audio payload: {0}")]
    InvalidPayload(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// REST client for the generative speech model
pub struct SpeechClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl SpeechClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, SpeechError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            model: DEFAULT_SPEECH_MODEL.to_string(),
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

/// Build the audio-only request: single prebuilt voice for plain
/// prompts, a Speaker1/Speaker2 map for two-speaker scripts.
fn build_request(prompt: &SpeechSynthesisPrompt, voices: &VoiceConfig) -> GenerateContentRequest {
    let speech_config = if prompt.multi_speaker {
        SpeechConfig {
            voice_config: None,
            multi_speaker_voice_config: Some(MultiSpeakerVoiceConfig {
                speaker_voice_configs: vec![
                    SpeakerVoiceConfig {
                        speaker: PRIMARY_SPEAKER.to_string(),
                        voice_config: VoiceSelection::prebuilt(voices.primary),
                    },
                    SpeakerVoiceConfig {
                        speaker: SECONDARY_SPEAKER.to_string(),
                        voice_config: VoiceSelection::prebuilt(voices.secondary),
                    },
                ],
            }),
        }
    } else {
        SpeechConfig {
            voice_config: Some(VoiceSelection::prebuilt(voices.primary)),
            multi_speaker_voice_config: None,
        }
    };

    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part::text(&prompt.text)],
        }],
        generation_config: GenerationConfig {
            response_modalities: Some(vec!["AUDIO".to_string()]),
            speech_config: Some(speech_config),
            ..Default::default()
        },
    }
}

/// Decode an audio payload that is either bare base64 or a data URI
/// (`data:<mimetype>;base64,<data>`): everything through the first
/// comma is a media-type prefix, the remainder is base64.
pub fn decode_audio_payload(payload: &str) -> Result<Vec<u8>, SpeechError> {
    let encoded = match payload.find(',') {
        Some(comma) => &payload[comma + 1..],
        None => payload,
    };
    STANDARD
        .decode(encoded)
        .map_err(|e| SpeechError::InvalidPayload(e.to_string()))
}

/// Extract the PCM bytes from a model response, or `NoAudio`.
fn extract_pcm(response: &GenerateContentResponse) -> Result<Vec<u8>, SpeechError> {
    let inline = response.first_inline_data().ok_or(SpeechError::NoAudio)?;
    debug!(mime_type = %inline.mime_type, "decoding synthesized audio payload");
    decode_audio_payload(&inline.data)
}

#[async_trait]
impl SpeechSynthesizer for SpeechClient {
    async fn synthesize(
        &self,
        prompt: &SpeechSynthesisPrompt,
        voices: &VoiceConfig,
    ) -> Result<Vec<u8>, SpeechError> {
        let request = build_request(prompt, voices);

        let response = self
            .http_client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Api(status.as_u16(), body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Parse(e.to_string()))?;

        let pcm = extract_pcm(&parsed)?;
        Ok(wav::encode(&pcm, WavSpec::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_bare_base64_payload() {
        let payload = STANDARD.encode([1u8, 2, 3, 4]);
        assert_eq!(decode_audio_payload(&payload).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn decodes_data_uri_after_comma_delimiter() {
        let payload = format!(
            "data:audio/L16;rate=24000;base64,{}",
            STANDARD.encode([9u8, 8, 7])
        );
        assert_eq!(decode_audio_payload(&payload).unwrap(), vec![9, 8, 7]);
    }

    #[test]
    fn rejects_non_base64_payload() {
        assert!(matches!(
            decode_audio_payload("not base64!!!"),
            Err(SpeechError::InvalidPayload(_))
        ));
    }

    #[test]
    fn missing_audio_part_is_no_audio() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "sorry, words only"}]}}]
        }))
        .unwrap();
        assert!(matches!(extract_pcm(&response), Err(SpeechError::NoAudio)));
    }

    #[test]
    fn empty_response_is_no_audio() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(extract_pcm(&response), Err(SpeechError::NoAudio)));
    }

    #[test]
    fn extracts_pcm_from_inline_data() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{
                "inlineData": {
                    "mimeType": "audio/L16;codec=pcm;rate=24000",
                    "data": STANDARD.encode([0u8, 1, 0, 2]),
                }
            }]}}]
        }))
        .unwrap();
        assert_eq!(extract_pcm(&response).unwrap(), vec![0, 1, 0, 2]);
    }

    #[test]
    fn single_voice_request_names_the_primary_voice() {
        let prompt = SpeechSynthesisPrompt::single("A short, instrumental piece");
        let voices = VoiceConfig::for_voice(kiy_common::Voice::Female);
        let body = serde_json::to_value(build_request(&prompt, &voices)).unwrap();

        assert_eq!(
            body["generationConfig"]["responseModalities"],
            json!(["AUDIO"])
        );
        assert_eq!(
            body["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Achernar"
        );
        assert!(body["generationConfig"]["speechConfig"]
            .get("multiSpeakerVoiceConfig")
            .is_none());
    }

    #[test]
    fn multi_speaker_request_maps_both_speakers() {
        let prompt = SpeechSynthesisPrompt {
            text: "Speaker1: Hello\nSpeaker2: World".to_string(),
            multi_speaker: true,
        };
        let voices = VoiceConfig::for_voice(kiy_common::Voice::Male);
        let body = serde_json::to_value(build_request(&prompt, &voices)).unwrap();

        let speakers =
            &body["generationConfig"]["speechConfig"]["multiSpeakerVoiceConfig"]["speakerVoiceConfigs"];
        assert_eq!(speakers[0]["speaker"], "Speaker1");
        assert_eq!(
            speakers[0]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Algenib"
        );
        assert_eq!(speakers[1]["speaker"], "Speaker2");
        assert_eq!(
            speakers[1]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Puck"
        );
    }
}
