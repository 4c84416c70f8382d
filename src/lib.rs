// ytscribe
// Transcript processing, storage, and search for downloaded YouTube
// captions. Raw snippet payloads come in from a downloader collaborator;
// this crate normalizes them, derives clean/timestamped/structured
// renderings, detects chapters, scores content quality, and persists
// everything into a searchable SQLite store.

pub mod config;
pub mod database;
pub mod pipeline;
pub mod processing;
pub mod snippet;

pub use config::ProcessingConfig;
pub use database::{DatabaseManager, SaveTranscript};
pub use pipeline::process_and_store;
pub use processing::{ChapterDetector, ContentAnalyzer, TextNormalizer, TranscriptFormatter};
pub use snippet::{parse_snippets, Snippet, VideoInfo};
