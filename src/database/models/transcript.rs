// Database models - Transcript segments and chapters
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stored timed transcript segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub id: i64,
    pub video_ref: i64,
    pub start_time_s: f64,
    pub duration_s: f64,
    pub text: String,
    pub is_generated: Option<bool>,
    pub source: String,
    /// SHA-256 of the trimmed raw text, used for dedup checks.
    pub text_hash: String,
    /// Snippet fields not otherwise modeled, `{}` when none.
    pub extra: Value,
}

/// A stored chapter boundary with its accumulated text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: i64,
    pub video_ref: i64,
    pub start_time_s: f64,
    pub end_time_s: Option<f64>,
    pub text: String,
    pub summary: Option<String>,
}
