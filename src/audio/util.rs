//! Shared audio helpers for device selection and channel mixdown.

use anyhow::Result;
use cpal::traits::DeviceTrait;
use cpal::{Device, SampleFormat, SupportedStreamConfig, SupportedStreamConfigRange};

/// Get a human-readable device name, or "Unknown" if it cannot be retrieved.
pub fn get_device_name(device: &Device) -> String {
    device.description().ok().map(|desc| desc.name().to_string()).unwrap_or_else(|| "Unknown".to_string())
}

/// Find the best matching input configuration for recording.
///
/// Only mono/stereo F32 configurations are considered (F32 is universally
/// supported on modern hardware). Prefers a configuration covering the
/// target sample rate; otherwise picks the closest available rate and the
/// capture path resamples.
///
/// # Arguments
/// * `configs` - Iterator of supported stream configurations
/// * `target_sample_rate` - Desired sample rate (16000 for recognition)
///
/// # Returns
/// The best matching `SupportedStreamConfig`, or an error if no suitable config exists.
pub fn find_best_config(configs: impl Iterator<Item = SupportedStreamConfigRange>, target_sample_rate: u32) -> Result<SupportedStreamConfig> {
    let f32_configs: Vec<SupportedStreamConfigRange> =
        configs.filter(|config| config.channels() <= 2 && config.sample_format() == SampleFormat::F32).collect();

    if f32_configs.is_empty() {
        anyhow::bail!("No mono/stereo F32 input configuration available on this device");
    }

    for config in &f32_configs {
        if target_sample_rate >= config.min_sample_rate() && target_sample_rate <= config.max_sample_rate() {
            return Ok((*config).with_sample_rate(target_sample_rate));
        }
    }

    // No config covers the target rate: take the first and clamp to its range
    let config = &f32_configs[0];
    let rate = if target_sample_rate < config.min_sample_rate() {
        config.min_sample_rate()
    } else {
        config.max_sample_rate()
    };
    Ok((*config).with_sample_rate(rate))
}

/// Mix interleaved f32 samples down to mono by averaging channels.
///
/// Mono input is returned as a copy; stereo frames are averaged.
pub fn mix_to_mono(data: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        data.to_vec()
    } else {
        data.chunks(channels).map(|frame| frame.iter().sum::<f32>() / channels as f32).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_passthrough() {
        let data = vec![0.25f32, -0.5, 0.75];
        assert_eq!(mix_to_mono(&data, 1), data);
    }

    #[test]
    fn test_stereo_mixdown() {
        let data = vec![0.5f32, 1.0, -0.5, -1.0];
        let result = mix_to_mono(&data, 2);
        assert_eq!(result, vec![0.75, -0.75]);
    }
}
