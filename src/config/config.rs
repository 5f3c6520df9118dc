//! Application configuration and CLI argument parsing.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::runner::AudioSource;

/// Default endpoint for the Google Speech-to-Text v1 REST API.
pub const DEFAULT_API_URL: &str = "https://speech.googleapis.com/v1/speech:recognize";

/// Transcriber application configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "voice-transcriber")]
#[command(author, version, about = "One-shot speech-to-text for the microphone or WAV/MP3 files", long_about = None)]
pub struct AppConfig {
    /// Audio file to transcribe (.wav or .mp3); records from the default microphone when omitted
    pub audio_file: Option<PathBuf>,

    /// Microphone recording length in seconds (ignored when a file is given)
    #[arg(long, short = 's', default_value = "10")]
    pub seconds: f32,

    /// Recognition language code (BCP-47, e.g. en-US, en-IN, de-DE)
    #[arg(long, short = 'l', default_value = "en-IN")]
    pub language: String,

    /// Sample rate audio is normalized to before recognition
    #[arg(long, default_value = "16000")]
    pub sample_rate: u32,

    /// Recognition window length in milliseconds
    #[arg(long, default_value = "30000")]
    pub chunk_ms: u64,

    /// Overlap between consecutive windows in milliseconds (avoids cutting words at boundaries)
    #[arg(long, default_value = "1000")]
    pub overlap_ms: u64,

    /// Recognition API endpoint
    #[arg(long, env = "GOOGLE_SPEECH_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// API key for the recognition backend
    #[arg(long, short = 'k', env = "GOOGLE_SPEECH_API_KEY")]
    pub api_key: String,

    /// Where to write the plain-text transcript
    #[arg(long, default_value = "transcript.txt")]
    pub transcript_out: PathBuf,

    /// Where to write the SRT subtitle file
    #[arg(long, default_value = "subtitles.srt")]
    pub srt_out: PathBuf,

    /// Save the microphone recording to this WAV file
    #[arg(long)]
    pub save_recording: Option<PathBuf>,

    /// Print the transcript only; skip writing transcript and subtitle files
    #[arg(long)]
    pub no_save: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl AppConfig {
    /// Parse configuration from command line arguments.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// The audio source this invocation will transcribe.
    pub fn source(&self) -> AudioSource {
        match &self.audio_file {
            Some(path) => AudioSource::File(path.clone()),
            None => AudioSource::Microphone { seconds: self.seconds },
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.audio_file {
            let supported = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("wav") || ext.eq_ignore_ascii_case("mp3"))
                .unwrap_or(false);
            if !supported {
                anyhow::bail!("Unsupported audio file '{}': expected a .wav or .mp3 extension", path.display());
            }
        }

        if !self.seconds.is_finite() || self.seconds <= 0.0 {
            anyhow::bail!("Recording length must be a positive number of seconds");
        }

        if self.chunk_ms == 0 || self.chunk_ms <= self.overlap_ms {
            anyhow::bail!("Chunk length ({}ms) must be greater than the overlap ({}ms)", self.chunk_ms, self.overlap_ms);
        }

        if !(8_000..=48_000).contains(&self.sample_rate) {
            anyhow::bail!("Sample rate must be between 8000 and 48000 Hz");
        }

        if self.api_key.trim().is_empty() {
            anyhow::bail!("API key is required (--api-key or GOOGLE_SPEECH_API_KEY)");
        }

        if self.save_recording.is_some() && self.audio_file.is_some() {
            anyhow::bail!("--save-recording only applies to microphone input");
        }

        Ok(())
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        info!("Configuration:");
        match &self.audio_file {
            Some(path) => info!("  Input: file {}", path.display()),
            None => info!("  Input: microphone ({}s)", self.seconds),
        }
        info!("  Language: {}", self.language);
        info!("  Sample rate: {} Hz", self.sample_rate);
        info!("  Chunk: {}ms (overlap {}ms)", self.chunk_ms, self.overlap_ms);
        info!("  API endpoint: {}", self.api_url);
        if !self.no_save {
            info!("  Transcript: {}", self.transcript_out.display());
            info!("  Subtitles: {}", self.srt_out.display());
        }
        if let Some(ref path) = self.save_recording {
            info!("  Saving recording to: {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig::parse_from(["voice-transcriber", "--api-key", "test-key"])
    }

    #[test]
    fn test_defaults() {
        let config = base_config();
        assert!(config.audio_file.is_none());
        assert_eq!(config.seconds, 10.0);
        assert_eq!(config.language, "en-IN");
        assert_eq!(config.sample_rate, 16_000);
        assert_eq!(config.chunk_ms, 30_000);
        assert_eq!(config.overlap_ms, 1_000);
        assert!(config.validate().is_ok());
        assert!(matches!(config.source(), AudioSource::Microphone { seconds } if seconds == 10.0));
    }

    #[test]
    fn test_file_source() {
        let config = AppConfig::parse_from(["voice-transcriber", "--api-key", "k", "sample.wav"]);
        assert!(config.validate().is_ok());
        assert!(matches!(config.source(), AudioSource::File(path) if path == PathBuf::from("sample.wav")));
    }

    #[test]
    fn test_rejects_unsupported_extension() {
        let config = AppConfig::parse_from(["voice-transcriber", "--api-key", "k", "notes.txt"]);
        assert!(config.validate().unwrap_err().to_string().contains("wav"));
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_chunk() {
        let config = AppConfig::parse_from(["voice-transcriber", "--api-key", "k", "--chunk-ms", "1000", "--overlap-ms", "1000"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_missing_api_key() {
        let config = AppConfig::parse_from(["voice-transcriber", "--api-key", "  "]);
        assert!(config.validate().unwrap_err().to_string().contains("API key"));
    }

    #[test]
    fn test_rejects_save_recording_with_file_input() {
        let config = AppConfig::parse_from(["voice-transcriber", "--api-key", "k", "--save-recording", "out.wav", "sample.mp3"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nonpositive_seconds() {
        let config = AppConfig::parse_from(["voice-transcriber", "--api-key", "k", "--seconds", "0"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nonfinite_seconds() {
        // NaN and infinity parse as valid f32 values but must not reach the
        // capture path, where a non-finite duration panics
        for value in ["NaN", "inf", "-inf"] {
            let config = AppConfig::parse_from(["voice-transcriber", "--api-key", "k", "--seconds", value]);
            assert!(config.validate().is_err(), "--seconds {} should be rejected", value);
        }
    }
}
