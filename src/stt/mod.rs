//! Speech-to-text module.
//!
//! Defines the `Recognizer` contract and the Google Speech-to-Text backend.

mod google;
mod recognizer;

pub use google::GoogleRecognizer;
pub use recognizer::Recognizer;
