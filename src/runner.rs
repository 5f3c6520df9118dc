//! Transcription runner: one audio source in, one transcript out.
//!
//! The runner acquires a bounded audio buffer from its source, normalizes it
//! to the recognition rate, splits it into overlapping windows, and submits
//! each window to the recognition backend exactly once. It holds no state
//! across calls; every invocation is independent.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::audio::{self, AudioBuffer, chunk_windows};
use crate::error::TranscribeError;
use crate::stt::Recognizer;

/// Where the audio for one transcription request comes from.
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Record a fixed-length clip from the default microphone.
    Microphone { seconds: f32 },
    /// Read and decode a WAV or MP3 file.
    File(PathBuf),
}

/// One recognized window with its position in the source audio.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

/// The result of a successful transcription.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Full text, windows joined with single spaces.
    pub text: String,
    /// Timed segments for subtitle output. Windows the backend found no
    /// speech in are omitted.
    pub segments: Vec<Segment>,
}

/// Single-shot transcription runner over a recognition backend.
pub struct TranscriptionRunner<'a, R: Recognizer> {
    recognizer: &'a R,
    target_rate: u32, // Rate audio is normalized to before recognition
    chunk_ms: u64,    // Window length
    overlap_ms: u64,  // Overlap between consecutive windows
}

impl<'a, R: Recognizer> TranscriptionRunner<'a, R> {
    pub fn new(recognizer: &'a R, target_rate: u32, chunk_ms: u64, overlap_ms: u64) -> Self {
        Self { recognizer, target_rate, chunk_ms, overlap_ms }
    }

    /// Acquire the audio buffer for a source.
    ///
    /// Microphone capture returns audio already at the target rate; file
    /// decoding returns audio at the file's native rate, which
    /// [`transcribe_buffer`](Self::transcribe_buffer) normalizes.
    ///
    /// # Errors
    /// `UnreadableSource` when the file cannot be opened or decoded, or the
    /// microphone is unavailable.
    pub fn acquire(&self, source: &AudioSource) -> Result<AudioBuffer, TranscribeError> {
        match source {
            AudioSource::Microphone { seconds } => audio::record(*seconds, self.target_rate).map_err(TranscribeError::unreadable),
            AudioSource::File(path) => audio::decode_file(path).map_err(TranscribeError::unreadable),
        }
    }

    /// Transcribe a source end to end: acquire, normalize, recognize.
    pub fn transcribe(&self, source: &AudioSource) -> Result<Transcript, TranscribeError> {
        let buffer = self.acquire(source)?;
        self.transcribe_buffer(buffer)
    }

    /// Transcribe an already-acquired buffer.
    ///
    /// # Errors
    /// `UnreadableSource` if the audio cannot be resampled to the
    /// recognition rate; `RecognitionFailure` if the buffer is empty, the
    /// backend fails on any window, or no window yields text.
    pub fn transcribe_buffer(&self, buffer: AudioBuffer) -> Result<Transcript, TranscribeError> {
        let buffer = self.normalize(buffer)?;

        if buffer.is_empty() {
            return Err(TranscribeError::RecognitionFailure("audio buffer is empty".to_string()));
        }

        let total_ms = buffer.duration_ms();
        let windows = chunk_windows(total_ms, self.chunk_ms, self.overlap_ms);
        info!("Transcribing {:.1}s of audio in {} window(s) via {}", total_ms as f32 / 1000.0, windows.len(), self.recognizer.name());

        let mut segments = Vec::new();
        let mut parts = Vec::new();

        for (index, &(start_ms, end_ms)) in windows.iter().enumerate() {
            debug!("Window {}/{}: {}ms - {}ms", index + 1, windows.len(), start_ms, end_ms);
            let window = buffer.slice_ms(start_ms, end_ms);

            match self.recognizer.recognize(&window).map_err(TranscribeError::recognition)? {
                Some(text) => {
                    info!("🗣️  [{} - {}] {}", start_ms, end_ms, text);
                    parts.push(text.clone());
                    segments.push(Segment { start_ms, end_ms, text });
                }
                None => {
                    debug!("No speech in window {}ms - {}ms", start_ms, end_ms);
                }
            }
        }

        if parts.is_empty() {
            return Err(TranscribeError::RecognitionFailure("no speech recognized in any window".to_string()));
        }

        Ok(Transcript { text: parts.join(" "), segments })
    }

    /// Resample to the recognition rate when the buffer rate differs.
    fn normalize(&self, buffer: AudioBuffer) -> Result<AudioBuffer, TranscribeError> {
        if buffer.sample_rate == self.target_rate {
            return Ok(buffer);
        }

        warn!("Resampling audio from {} Hz to {} Hz", buffer.sample_rate, self.target_rate);
        let samples = audio::resampler::resample(&buffer.samples, buffer.sample_rate, self.target_rate).map_err(TranscribeError::unreadable)?;
        Ok(AudioBuffer::new(samples, self.target_rate))
    }
}
