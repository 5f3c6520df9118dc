//! One-shot microphone recording using cpal.
//!
//! Records a fixed number of seconds from the default input device into an
//! `AudioBuffer`. The cpal callback mixes to mono, resamples to the target
//! rate when the device rate differs, and pushes into a lock-free ring
//! buffer; the calling thread drains the ring buffer until the requested
//! duration has been collected. The stream is dropped before returning, so
//! the device is held only for the duration of the recording.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::StreamConfig;
use ringbuf::HeapRb;
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use tracing::{debug, info, warn};

use super::buffer::AudioBuffer;
use super::resampler::ResamplerState;
use super::util::{find_best_config, get_device_name, mix_to_mono};

/// Extra time allowed beyond the recording length before giving up on a
/// device that stops delivering samples (covers stream startup latency).
const CAPTURE_GRACE: Duration = Duration::from_secs(3);

/// Record `seconds` of mono audio at `target_rate` from the default microphone.
///
/// Blocks until the recording completes. The returned buffer is already at
/// `target_rate`, resampled from the device rate if necessary.
///
/// # Errors
/// Returns an error if no input device is available, the device has no
/// usable F32 configuration, the stream cannot be built or started, or the
/// device stops delivering samples before the recording completes.
pub fn record(seconds: f32, target_rate: u32) -> Result<AudioBuffer> {
    let host = cpal::default_host();
    let device = host.default_input_device().context("No input device available")?;

    info!("Using input device: {}", get_device_name(&device));

    let supported_configs = device.supported_input_configs().context("Failed to get supported input configs")?;
    let config = find_best_config(supported_configs, target_rate)?;
    let device_sample_rate = config.sample_rate();
    let channels = config.channels() as usize;

    let needs_resampling = device_sample_rate != target_rate;
    if needs_resampling {
        info!("Device sample rate {} Hz differs from target {} Hz - resampling will be applied", device_sample_rate, target_rate);
    }

    debug!("Capture config: {} Hz, {} channels, {:?}", device_sample_rate, channels, config.sample_format());

    let stream_config: StreamConfig = config.config();

    // Ring buffer sized for the whole recording at the target rate, plus
    // headroom so the callback never has to drop samples mid-recording
    let target_samples = (seconds * target_rate as f32) as usize;
    let ring = HeapRb::<f32>::new(target_samples + target_rate as usize);
    let (mut producer, mut consumer) = ring.split();

    let resampler_state = if needs_resampling { Some(ResamplerState::new(device_sample_rate, target_rate)?) } else { None };

    let err_fn = |err| {
        tracing::error!("Audio capture error: {}", err);
    };

    // F32 input guaranteed by find_best_config
    let stream = device.build_input_stream(
        &stream_config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            let samples = mix_to_mono(data, channels);

            let final_samples = match &resampler_state {
                Some(state) => state.lock().process_samples(&samples),
                None => Some(samples),
            };

            if let Some(samples) = final_samples {
                let written = producer.push_slice(&samples);
                if written < samples.len() {
                    warn!("Capture ring buffer full, dropped {} samples", samples.len() - written);
                }
            }
        },
        err_fn,
        None,
    )?;

    info!("🎙️  Recording {}s from microphone...", seconds);
    stream.play().context("Failed to start audio stream")?;

    // Drain the ring buffer until the recording is complete
    let mut samples = Vec::with_capacity(target_samples);
    let mut read_buffer = vec![0.0f32; 2048];
    let deadline = Instant::now() + Duration::from_secs_f32(seconds) + CAPTURE_GRACE;

    while samples.len() < target_samples {
        let available = consumer.occupied_len();
        if available == 0 {
            if Instant::now() >= deadline {
                anyhow::bail!("Microphone stopped delivering audio ({} of {} samples captured)", samples.len(), target_samples);
            }
            std::thread::sleep(Duration::from_millis(5));
            continue;
        }

        let to_read = available.min(read_buffer.len());
        let read = consumer.pop_slice(&mut read_buffer[..to_read]);
        samples.extend_from_slice(&read_buffer[..read]);
    }

    drop(stream); // Release the device before returning
    samples.truncate(target_samples);

    info!("Recording complete: {} samples at {} Hz", samples.len(), target_rate);
    Ok(AudioBuffer::new(samples, target_rate))
}
