//! Audio resampling using the rubato FFT-based resampler.
//!
//! Two entry points: a streaming `ResamplerState` used inside the capture
//! callback when the device rate differs from the recognition rate, and a
//! batch `resample` used for decoded files.

use std::sync::Arc;

use anyhow::{Context, Result};
use audioadapter_buffers::direct::InterleavedSlice;
use parking_lot::Mutex;
use rubato::{Fft, FixedSync, Resampler};

/// Chunk size for FFT-based resampling.
const CHUNK_SIZE: usize = 1024;

/// Number of sub-chunks for FFT processing (higher = better quality, more CPU).
const SUB_CHUNKS: usize = 2;

/// Streaming resampler state shared with the audio callback.
///
/// Accumulates samples across callback invocations until a full chunk is
/// available, so input size does not have to match the FFT chunk size.
pub struct ResamplerState {
    resampler: Fft<f32>,
    output_buffer: Vec<f32>,
    output_frames_max: usize,
    input_buffer: Vec<f32>,
}

impl ResamplerState {
    /// Create a streaming resampler from `from_rate` to `to_rate`, wrapped
    /// for thread-safe access from the audio callback.
    pub fn new(from_rate: u32, to_rate: u32) -> Result<Arc<Mutex<Self>>> {
        let resampler = Fft::<f32>::new(from_rate as usize, to_rate as usize, CHUNK_SIZE, SUB_CHUNKS, 1, FixedSync::Input)
            .context("Failed to create resampler")?;

        let output_frames_max = resampler.output_frames_max();

        Ok(Arc::new(Mutex::new(Self {
            resampler,
            output_buffer: vec![0.0f32; output_frames_max],
            output_frames_max,
            input_buffer: Vec::with_capacity(CHUNK_SIZE * 2),
        })))
    }

    /// Feed samples in; returns resampled output once a full chunk has
    /// accumulated, or `None` while more input is needed.
    pub fn process_samples(&mut self, samples: &[f32]) -> Option<Vec<f32>> {
        self.input_buffer.extend_from_slice(samples);

        if self.input_buffer.len() < CHUNK_SIZE {
            return None;
        }

        let chunk: Vec<f32> = self.input_buffer.drain(..CHUNK_SIZE).collect();

        let input_adapter = InterleavedSlice::new(&chunk, 1, CHUNK_SIZE).ok()?;
        let mut output_adapter = InterleavedSlice::new_mut(&mut self.output_buffer, 1, self.output_frames_max).ok()?;

        let (_, frames_written) = self.resampler.process_into_buffer(&input_adapter, &mut output_adapter, None).ok()?;

        if frames_written > 0 { Some(self.output_buffer[..frames_written].to_vec()) } else { None }
    }
}

/// Resample a whole buffer of mono audio from one rate to another.
///
/// Used on decoded file audio before recognition (e.g. 44.1kHz MP3 down to
/// 16kHz). Returns the input unchanged when the rates already match.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }

    let mut resampler = Fft::<f32>::new(from_rate as usize, to_rate as usize, CHUNK_SIZE, SUB_CHUNKS, 1, FixedSync::Input)
        .context("Failed to create resampler")?;

    let output_frames_max = resampler.output_frames_max();
    let mut output_buffer = vec![0.0f32; output_frames_max];

    let expected_len = (samples.len() as f64 * to_rate as f64 / from_rate as f64) as usize;
    let mut output = Vec::with_capacity(expected_len + CHUNK_SIZE);

    for chunk in samples.chunks(CHUNK_SIZE) {
        // Zero-pad the last partial chunk to the FFT size
        let input_chunk: Vec<f32> = if chunk.len() < CHUNK_SIZE {
            let mut padded = chunk.to_vec();
            padded.resize(CHUNK_SIZE, 0.0);
            padded
        } else {
            chunk.to_vec()
        };

        let input_adapter = InterleavedSlice::new(&input_chunk, 1, CHUNK_SIZE).context("Failed to create input adapter")?;
        let mut output_adapter = InterleavedSlice::new_mut(&mut output_buffer, 1, output_frames_max).context("Failed to create output adapter")?;

        let (_, frames_written) = resampler
            .process_into_buffer(&input_adapter, &mut output_adapter, None)
            .map_err(|e| anyhow::anyhow!("Resampling error: {}", e))?;
        output.extend_from_slice(&output_buffer[..frames_written]);
    }

    // Trim the tail introduced by padding, keeping a small safety margin
    output.truncate(expected_len + 100);

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_noop_when_rates_match() {
        let samples = vec![0.5f32; 1234];
        let result = resample(&samples, 16000, 16000).unwrap();
        assert_eq!(result, samples);
    }

    #[test]
    fn test_resample_downsampling() {
        // 44.1kHz -> 16kHz, a typical MP3-to-recognition conversion
        let samples = vec![0.0; 44100]; // 1 second
        let result = resample(&samples, 44100, 16000).unwrap();
        assert!(result.len() >= 15900 && result.len() <= 16100, "Expected length 15900-16100, got {}", result.len());
    }

    #[test]
    fn test_resample_upsampling() {
        let samples = vec![0.0; 8000]; // 1 second at 8kHz
        let result = resample(&samples, 8000, 16000).unwrap();
        assert!(result.len() >= 16000 && result.len() <= 16100);
    }

    #[test]
    fn test_streaming_state_accumulates_chunks() {
        let state = ResamplerState::new(48000, 16000).unwrap();
        let mut state = state.lock();

        // Feed less than one chunk: no output yet
        assert!(state.process_samples(&vec![0.0; 512]).is_none());

        // Completing the chunk yields resampled output
        let out = state.process_samples(&vec![0.0; 512]).expect("full chunk should produce output");
        assert!(!out.is_empty());
    }
}
