//! Recognition backend contract.

use anyhow::Result;

use crate::audio::AudioBuffer;

/// A speech recognition backend.
///
/// The transcriber treats recognition as an opaque capability: one buffer
/// in, one result out. `Ok(None)` means the backend processed the audio but
/// found no speech in it (silence, noise); `Err` means the backend could not
/// be reached or rejected the request. Implementations must not retry.
pub trait Recognizer {
    /// Recognize speech in a mono audio buffer.
    fn recognize(&self, buffer: &AudioBuffer) -> Result<Option<String>>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}
