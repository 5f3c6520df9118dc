//! Audio file decoding using symphonia.
//!
//! Loads a WAV or MP3 file into an `AudioBuffer` (mono, at the file's
//! native sample rate). The caller resamples to the recognition rate.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info};

use super::buffer::AudioBuffer;
use super::util::mix_to_mono;

/// Decode an audio file to a mono `AudioBuffer` at the file's sample rate.
///
/// # Errors
/// Returns an error if the file cannot be opened, its container format is
/// not recognized, it has no decodable audio track, or decoding fails with
/// something other than a recoverable per-packet error.
pub fn decode_file(path: &Path) -> Result<AudioBuffer> {
    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .with_context(|| format!("Unrecognized audio format: {}", path.display()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .with_context(|| format!("No decodable audio track in {}", path.display()))?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.context("Audio track has no sample rate")?;
    let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    debug!("Decoding {}: {} Hz, {} channel(s)", path.display(), sample_rate, channels);

    let mut interleaved = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(_)) => break, // End of stream
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(anyhow::anyhow!("Failed to read audio packet: {}", err)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
                sample_buf.copy_interleaved_ref(decoded);
                interleaved.extend_from_slice(sample_buf.samples());
            }
            // Per-packet IO/decode errors are recoverable; skip the packet
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::DecodeError(_)) => continue,
            Err(err) => return Err(anyhow::anyhow!("Failed to decode audio: {}", err)),
        }
    }

    let samples = mix_to_mono(&interleaved, channels);
    let buffer = AudioBuffer::new(samples, sample_rate);

    info!("Decoded {}: {:.1}s at {} Hz", path.display(), buffer.duration_ms() as f32 / 1000.0, sample_rate);
    Ok(buffer)
}
