//! Audio acquisition module: microphone capture and file decoding.
//!
//! Provides cross-platform audio capture using cpal, WAV/MP3 decoding using
//! symphonia, and high-quality resampling via rubato.

mod buffer;
mod capture;
mod decode;
pub mod resampler;
pub mod util;
mod wav;

pub use buffer::{AudioBuffer, chunk_windows};
pub use capture::record;
pub use decode::decode_file;
pub use wav::write_wav;
