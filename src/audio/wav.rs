//! 16-bit PCM WAV encoding for saved recordings.

use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::info;

use super::buffer::AudioBuffer;

/// Write a mono buffer to disk as 16-bit PCM WAV.
pub fn write_wav(path: &Path, buffer: &AudioBuffer) -> Result<()> {
    let spec = WavSpec { channels: 1, sample_rate: buffer.sample_rate, bits_per_sample: 16, sample_format: SampleFormat::Int };

    let mut writer = WavWriter::create(path, spec).with_context(|| format!("Failed to create {}", path.display()))?;

    for &sample in &buffer.samples {
        let value = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer.write_sample(value).context("Failed to write WAV sample")?;
    }

    writer.finalize().context("Failed to finalize WAV file")?;
    info!("Saved recording: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_round_trip() {
        let dir = std::env::temp_dir().join("voice-transcriber-wav-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("roundtrip.wav");

        let buffer = AudioBuffer::new(vec![0.0, 0.5, -0.5, 1.0], 16_000);
        write_wav(&path, &buffer).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 16_000);
        assert_eq!(reader.spec().channels, 1);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, 16383, -16383, 32767]);

        std::fs::remove_file(&path).ok();
    }
}
