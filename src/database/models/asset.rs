// Database models - Raw transcript assets
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The raw rendering kinds stored per video, one row per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    CleanText,
    Timestamped,
    StructuredJson,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::CleanText => "clean_text",
            AssetKind::Timestamped => "timestamped",
            AssetKind::StructuredJson => "structured_json",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "clean_text" => Some(AssetKind::CleanText),
            "timestamped" => Some(AssetKind::Timestamped),
            "structured_json" => Some(AssetKind::StructuredJson),
            _ => None,
        }
    }
}

/// A stored raw rendering of one video's transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAsset {
    pub id: i64,
    pub video_ref: i64,
    pub kind: AssetKind,
    pub content_text: Option<String>,
    pub content_json: Option<Value>,
    pub stored_at: String,
}

/// Full-transcript payload returned to display layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptContent {
    pub video_id: String,
    pub title: String,
    pub format: AssetKind,
    pub content: Value,
    pub is_json: bool,
    pub stored_at: String,
    pub language_code: Option<String>,
    pub is_generated: Option<bool>,
}
