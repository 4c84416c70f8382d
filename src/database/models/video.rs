// Database models - Video
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored video with its processing-derived metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    /// Surrogate row id; `(owner, video_id)` is the logical key.
    pub id: i64,
    pub owner: String,
    pub video_id: String,
    pub title: String,
    pub duration_s: Option<i64>,
    /// ISO date string, null when the source date was unparseable.
    pub upload_date: Option<String>,
    pub uploader: Option<String>,
    pub language_code: Option<String>,
    pub is_generated: Option<bool>,
    /// Structured transcript document as saved, `{}` when absent.
    pub metadata: Value,
    pub text_word_count: Option<i64>,
    pub text_char_count: Option<i64>,
    pub processed_at: String,
    pub updated_at: String,
}

/// A video annotated with its chapter and segment counts, the shape
/// returned inside search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSummary {
    #[serde(flatten)]
    pub video: Video,
    pub chapters_count: i64,
    pub segments_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

/// Per-owner corpus aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_videos: i64,
    pub total_segments: i64,
    pub total_chapters: i64,
    pub languages: Vec<String>,
    pub date_range: DateRange,
    pub total_duration_s: i64,
}
