//! sevoice: Stack Exchange data dumps as voice-reader transcripts
//!
//! Converts a per-site Stack Exchange data-dump archive into one plain-text
//! transcript per question, suitable for text-to-speech apps:
//! - External 7-Zip invocation for archive extraction
//! - Streaming XML table loading (Posts, Comments) via quick-xml
//! - Thread reconstruction with multimap indexing
//! - Voice-friendly body normalization (link/image placeholders, tag strip)
//! - Atomic per-question transcript files with progress reporting

pub mod config;
pub mod dump;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod threads;
pub mod transcript;

pub use config::Config;
pub use pipeline::{ConvertError, Converter, RunContext};
