//! Voice Transcriber - one-shot speech-to-text for the microphone or audio files.
//!
//! Acquires a bounded audio buffer (fixed-length microphone recording or a
//! decoded WAV/MP3 file), submits it to the Google Speech-to-Text API in
//! overlapping windows, prints the transcript, and writes transcript and
//! SRT subtitle files.

mod audio;
mod config;
mod error;
mod output;
mod runner;
mod stt;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use config::AppConfig;
use runner::{AudioSource, TranscriptionRunner};
use stt::GoogleRecognizer;

fn main() -> Result<()> {
    // Parse command line arguments
    let config = AppConfig::from_args();

    // Initialize logging with time-only format
    // Respect RUST_LOG env var, fallback to verbose flag, default to info
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| if config.verbose { EnvFilter::try_new("debug") } else { EnvFilter::try_new("info") })
        .unwrap();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(LocalTime::new(time::macros::format_description!("[hour]:[minute]:[second]")))
        .with_writer(std::io::stderr)
        .init();

    info!("🎤 Voice Transcriber v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("❌ Configuration error: {}", e);
        std::process::exit(1);
    }

    config.log_config();

    let recognizer = GoogleRecognizer::new(&config)?;
    let runner = TranscriptionRunner::new(&recognizer, config.sample_rate, config.chunk_ms, config.overlap_ms);

    let source = config.source();

    // Acquire once, so a microphone recording can be saved before recognition
    let buffer = runner.acquire(&source)?;

    if let Some(ref path) = config.save_recording
        && matches!(source, AudioSource::Microphone { .. })
    {
        audio::write_wav(path, &buffer)?;
    }

    let transcript = runner.transcribe_buffer(buffer)?;

    // The transcript itself goes to stdout; logs go to stderr
    println!("{}", transcript.text);

    if !config.no_save {
        output::write_transcript(&config.transcript_out, &transcript.text)?;
        output::write_srt(&config.srt_out, &transcript.segments)?;
    }

    info!("✅ Done");
    Ok(())
}
