//! Google Speech-to-Text v1 REST backend.
//!
//! Submits LINEAR16 audio as a base64 JSON body to the `speech:recognize`
//! endpoint and returns the top alternative of each result. One HTTP request
//! per call, no retries; connect and request timeouts bound every call.

use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::audio::AudioBuffer;
use crate::config::AppConfig;

use super::recognizer::Recognizer;

/// Time allowed to establish the TCP/TLS connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Time allowed for the whole request, covering upload and recognition of a
/// full 30s window.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeRequest {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: &'static str,
    sample_rate_hertz: u32,
    language_code: String,
}

#[derive(Serialize)]
struct RecognitionAudio {
    content: String, // base64 LINEAR16
}

#[derive(Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechRecognitionResult>,
}

#[derive(Deserialize)]
struct SpeechRecognitionResult {
    #[serde(default)]
    alternatives: Vec<SpeechRecognitionAlternative>,
}

#[derive(Deserialize)]
struct SpeechRecognitionAlternative {
    #[serde(default)]
    transcript: String,
    confidence: Option<f32>,
}

/// Speech recognizer backed by the Google Speech-to-Text v1 REST API.
pub struct GoogleRecognizer {
    client: reqwest::blocking::Client, // HTTP client with connect/request timeouts
    url: String,                       // Endpoint with the key query parameter applied
    language: String,                  // BCP-47 language code
}

impl GoogleRecognizer {
    /// Create a recognizer from the application configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self> {
        info!("Using recognition backend: {} (language {})", config.api_url, config.language);

        let client = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        let url = format!("{}?key={}", config.api_url, urlencoding::encode(&config.api_key));

        Ok(Self { client, url, language: config.language.clone() })
    }

    fn build_request(&self, buffer: &AudioBuffer) -> RecognizeRequest {
        RecognizeRequest {
            config: RecognitionConfig { encoding: "LINEAR16", sample_rate_hertz: buffer.sample_rate, language_code: self.language.clone() },
            audio: RecognitionAudio { content: STANDARD.encode(buffer.to_pcm16()) },
        }
    }
}

impl Recognizer for GoogleRecognizer {
    fn recognize(&self, buffer: &AudioBuffer) -> Result<Option<String>> {
        let request = self.build_request(buffer);
        debug!("Submitting {} samples at {} Hz for recognition", buffer.samples.len(), buffer.sample_rate);

        let response = self.client.post(&self.url).json(&request).send().context("Recognition request failed")?;

        let status = response.status();
        let body = response.text().context("Failed to read recognition response")?;

        if !status.is_success() {
            anyhow::bail!("Recognition API returned HTTP {}: {}", status, truncate(&body, 200));
        }

        parse_response(&body)
    }

    fn name(&self) -> &str {
        "google-speech-v1"
    }
}

/// Extract the transcript from a `speech:recognize` response body.
///
/// Joins the top alternative of each result. An empty result list means the
/// backend found no speech, which is `Ok(None)` rather than an error.
fn parse_response(body: &str) -> Result<Option<String>> {
    let response: RecognizeResponse = serde_json::from_str(body).context("Malformed recognition response")?;

    let mut parts = Vec::new();
    for result in &response.results {
        if let Some(alternative) = result.alternatives.first() {
            let text = alternative.transcript.trim();
            if !text.is_empty() {
                if let Some(confidence) = alternative.confidence {
                    debug!("Recognized \"{}\" (confidence {:.2})", text, confidence);
                }
                parts.push(text.to_string());
            }
        }
    }

    if parts.is_empty() { Ok(None) } else { Ok(Some(parts.join(" "))) }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
