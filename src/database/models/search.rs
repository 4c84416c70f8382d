// Database models - Search requests and result envelopes
use serde::{Deserialize, Serialize};

use super::VideoSummary;

/// Segment text match mode. `Fuzzy` currently behaves like `Exact`;
/// similarity search needs a trigram index that is not wired up yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    FullText,
    Exact,
    Fuzzy,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::FullText => "full_text",
            SearchType::Exact => "exact",
            SearchType::Fuzzy => "fuzzy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    Relevance,
    Date,
    Duration,
    Title,
}

/// Video-level filters applied before any text matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoFilters {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub duration_min: Option<i64>,
    #[serde(default)]
    pub duration_max: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub search_type: SearchType,
    pub video_filters: Option<VideoFilters>,
    /// Inclusive segment start-time window, seconds.
    pub time_range: Option<(f64, f64)>,
    pub language: Option<String>,
    pub is_generated: Option<bool>,
    pub sort_by: SortBy,
    pub page: usize,
    pub page_size: usize,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            search_type: SearchType::FullText,
            video_filters: None,
            time_range: None,
            language: None,
            is_generated: None,
            sort_by: SortBy::Relevance,
            page: 1,
            page_size: 20,
        }
    }
}

/// One matching segment as surfaced in search results. Mock segments
/// synthesized from raw assets carry id 0, zero start time, and source
/// `"raw_asset"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentHit {
    pub id: i64,
    pub start_time_s: f64,
    pub duration_s: f64,
    pub text: String,
    pub is_generated: Option<bool>,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub video: VideoSummary,
    pub matching_segments: Vec<SegmentHit>,
    pub total_segments: usize,
    pub relevance_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiltersApplied {
    pub video_filters: VideoFilters,
    pub time_range: Option<(f64, f64)>,
    pub language: Option<String>,
    pub is_generated: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub query: String,
    pub search_type: String,
    pub filters_applied: FiltersApplied,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterHit {
    pub id: i64,
    pub video_id: String,
    pub video_title: String,
    pub start_time_s: f64,
    pub end_time_s: Option<f64>,
    pub text: String,
    pub summary: Option<String>,
    pub duration_s: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterSearchResponse {
    pub results: Vec<ChapterHit>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub query: String,
}
