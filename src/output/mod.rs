//! Output writers for transcripts and subtitles.

mod srt;

pub use srt::{write_srt, write_transcript};
