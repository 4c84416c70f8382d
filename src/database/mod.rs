// Database module
// Provides SQLite persistence for videos, transcript segments, chapters,
// and raw transcript assets

pub mod manager;
pub mod migrations;
pub mod models;
pub mod search;
pub mod transcripts_repo;
pub mod videos_repo;

pub use manager::DatabaseManager;
pub use models::*;
pub use transcripts_repo::{sha256_text, SaveTranscript};
pub use videos_repo::parse_upload_date;
