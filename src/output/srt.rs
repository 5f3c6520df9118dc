//! Transcript and SRT subtitle output.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::runner::Segment;

/// Format milliseconds as an SRT timestamp (`HH:MM:SS,mmm`).
fn srt_timestamp(ms: u64) -> String {
    let (seconds, millis) = (ms / 1000, ms % 1000);
    let (hours, seconds) = (seconds / 3600, seconds % 3600);
    let (minutes, seconds) = (seconds / 60, seconds % 60);
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Render timed segments as SRT subtitle entries.
pub fn render_srt(segments: &[Segment]) -> String {
    let mut lines = Vec::new();
    for (index, segment) in segments.iter().enumerate() {
        lines.push((index + 1).to_string());
        lines.push(format!("{} --> {}", srt_timestamp(segment.start_ms), srt_timestamp(segment.end_ms)));
        lines.push(segment.text.trim().to_string());
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Write the SRT subtitle file.
pub fn write_srt(path: &Path, segments: &[Segment]) -> Result<()> {
    std::fs::write(path, render_srt(segments)).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved subtitles: {}", path.display());
    Ok(())
}

/// Write the plain-text transcript.
pub fn write_transcript(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved transcript: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srt_timestamp() {
        assert_eq!(srt_timestamp(0), "00:00:00,000");
        assert_eq!(srt_timestamp(1_234), "00:00:01,234");
        assert_eq!(srt_timestamp(3_661_234), "01:01:01,234");
    }

    #[test]
    fn test_render_srt() {
        let segments = vec![
            Segment { start_ms: 0, end_ms: 30_000, text: "hello world".to_string() },
            Segment { start_ms: 29_000, end_ms: 45_500, text: " and again ".to_string() },
        ];
        let srt = render_srt(&segments);
        let expected = "1\n00:00:00,000 --> 00:00:30,000\nhello world\n\n2\n00:00:29,000 --> 00:00:45,500\nand again\n";
        assert_eq!(srt, expected);
    }

    #[test]
    fn test_render_srt_empty() {
        assert_eq!(render_srt(&[]), "");
    }
}
