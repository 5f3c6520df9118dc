//! Error taxonomy for transcription requests.

use thiserror::Error;

/// Errors a transcription request can end with.
///
/// Every failure of `TranscriptionRunner::transcribe` maps to one of these
/// two variants, which are displayed to the user as-is. A single attempt is
/// made per request; there is no retry on either variant.
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// The audio source could not be opened, decoded, or captured
    /// (bad path, unsupported codec, no input device).
    #[error("unreadable source: {0}")]
    UnreadableSource(String),

    /// The recognition backend could not produce text (silence,
    /// unintelligible audio, network or API failure).
    #[error("recognition failure: {0}")]
    RecognitionFailure(String),
}

impl TranscribeError {
    /// Wrap an error chain as `UnreadableSource`, preserving causes in the message.
    pub fn unreadable(err: anyhow::Error) -> Self {
        Self::UnreadableSource(format!("{:#}", err))
    }

    /// Wrap an error chain as `RecognitionFailure`, preserving causes in the message.
    pub fn recognition(err: anyhow::Error) -> Self {
        Self::RecognitionFailure(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_keeps_error_chain() {
        let err = anyhow::anyhow!("no such file").context("failed to open missing.wav");
        let mapped = TranscribeError::unreadable(err);
        let msg = mapped.to_string();
        assert!(msg.starts_with("unreadable source:"));
        assert!(msg.contains("missing.wav"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_recognition_display() {
        let mapped = TranscribeError::recognition(anyhow::anyhow!("HTTP 403 from backend"));
        assert_eq!(mapped.to_string(), "recognition failure: HTTP 403 from backend");
    }
}
