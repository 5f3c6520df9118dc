//! In-memory audio buffer and chunk windowing.
//!
//! An `AudioBuffer` holds mono f32 samples plus the sample rate they were
//! captured or decoded at. Buffers are owned by a single transcription
//! request and dropped when it completes; nothing is cached across calls.

/// Mono audio samples with their sample rate.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    pub samples: Vec<f32>, // Mono, interleaving already resolved
    pub sample_rate: u32,  // Hz
}

impl AudioBuffer {
    /// Create a buffer from mono samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Total duration in milliseconds, rounded up so a window ending at the
    /// duration covers every sample (slicing clamps to the buffer length).
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000).div_ceil(self.sample_rate as u64)
    }

    /// Extract the samples covering `[start_ms, end_ms)`.
    ///
    /// The end is clamped to the buffer length, so the last window of a
    /// chunked transcription may be shorter than requested.
    pub fn slice_ms(&self, start_ms: u64, end_ms: u64) -> AudioBuffer {
        let start = (start_ms * self.sample_rate as u64 / 1000) as usize;
        let end = ((end_ms * self.sample_rate as u64 / 1000) as usize).min(self.samples.len());
        let start = start.min(end);
        AudioBuffer::new(self.samples[start..end].to_vec(), self.sample_rate)
    }

    /// Convert to little-endian 16-bit PCM bytes (the LINEAR16 wire encoding).
    ///
    /// Samples are clamped to [-1.0, 1.0] before scaling, matching how the
    /// capture path already bounds device output.
    pub fn to_pcm16(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.samples.len() * 2);
        for &sample in &self.samples {
            let value = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }
}

/// Build `(start_ms, end_ms)` windows covering `total_ms`.
///
/// Windows are `chunk_ms` long and overlap by `overlap_ms` so words spoken
/// across a boundary appear in at least one window intact. The last window
/// ends exactly at `total_ms`. Callers validate `chunk_ms > overlap_ms`; the
/// step is clamped to at least 1ms so the loop always advances.
pub fn chunk_windows(total_ms: u64, chunk_ms: u64, overlap_ms: u64) -> Vec<(u64, u64)> {
    let mut windows = Vec::new();
    if total_ms == 0 || chunk_ms == 0 {
        return windows;
    }

    let mut start = 0u64;
    loop {
        let end = (start + chunk_ms).min(total_ms);
        windows.push((start, end));
        if end == total_ms {
            break;
        }
        let next = end.saturating_sub(overlap_ms);
        start = if next > start { next } else { end };
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_audio_single_window() {
        let windows = chunk_windows(5_000, 30_000, 1_000);
        assert_eq!(windows, vec![(0, 5_000)]);
    }

    #[test]
    fn test_windows_overlap_and_cover() {
        let windows = chunk_windows(70_000, 30_000, 1_000);
        assert_eq!(windows, vec![(0, 30_000), (29_000, 59_000), (58_000, 70_000)]);
        // Consecutive windows share exactly the overlap
        for pair in windows.windows(2) {
            assert_eq!(pair[0].1 - pair[1].0, 1_000);
        }
    }

    #[test]
    fn test_exact_chunk_boundary() {
        let windows = chunk_windows(30_000, 30_000, 1_000);
        assert_eq!(windows, vec![(0, 30_000)]);
    }

    #[test]
    fn test_empty_audio_has_no_windows() {
        assert!(chunk_windows(0, 30_000, 1_000).is_empty());
    }

    #[test]
    fn test_degenerate_overlap_still_advances() {
        // overlap >= chunk is rejected by config validation, but the
        // windowing itself must not loop forever if it ever gets through
        let windows = chunk_windows(100, 10, 10);
        assert_eq!(windows.last(), Some(&(90, 100)));
        assert!(windows.len() <= 10);
    }

    #[test]
    fn test_slice_ms() {
        let buffer = AudioBuffer::new((0..16_000).map(|i| i as f32 / 16_000.0).collect(), 16_000);
        let slice = buffer.slice_ms(250, 500);
        assert_eq!(slice.samples.len(), 4_000);
        assert_eq!(slice.samples[0], buffer.samples[4_000]);
        assert_eq!(slice.sample_rate, 16_000);
    }

    #[test]
    fn test_slice_ms_clamps_to_end() {
        let buffer = AudioBuffer::new(vec![0.0; 1_600], 16_000);
        let slice = buffer.slice_ms(50, 5_000);
        assert_eq!(slice.samples.len(), 800);
    }

    #[test]
    fn test_duration_ms() {
        let buffer = AudioBuffer::new(vec![0.0; 24_000], 16_000);
        assert_eq!(buffer.duration_ms(), 1_500);
    }

    #[test]
    fn test_duration_rounds_up_partial_millisecond() {
        let buffer = AudioBuffer::new(vec![0.0; 16_010], 16_000);
        assert_eq!(buffer.duration_ms(), 1_001);
    }

    #[test]
    fn test_windows_cover_every_sample() {
        // Tail samples past the last whole millisecond must still land in
        // the final window
        let buffer = AudioBuffer::new(vec![0.0; 16_010], 16_000);
        let windows = chunk_windows(buffer.duration_ms(), 1_000, 100);
        let covered: usize = {
            let (start_ms, end_ms) = *windows.last().unwrap();
            let last = buffer.slice_ms(start_ms, end_ms);
            (start_ms as usize * 16) + last.samples.len()
        };
        assert_eq!(covered, buffer.samples.len());
    }

    #[test]
    fn test_to_pcm16_clamps_and_scales() {
        let buffer = AudioBuffer::new(vec![0.0, 1.0, -1.0, 2.0], 16_000);
        let bytes = buffer.to_pcm16();
        assert_eq!(bytes.len(), 8);
        assert_eq!(i16::from_le_bytes([bytes[0], bytes[1]]), 0);
        assert_eq!(i16::from_le_bytes([bytes[2], bytes[3]]), 32767);
        assert_eq!(i16::from_le_bytes([bytes[4], bytes[5]]), -32767);
        assert_eq!(i16::from_le_bytes([bytes[6], bytes[7]]), 32767); // clamped
    }
}
