// Database models

mod asset;
mod search;
mod transcript;
mod video;

pub use asset::{AssetKind, RawAsset, TranscriptContent};
pub use search::{
    ChapterHit, ChapterSearchResponse, FiltersApplied, SearchRequest, SearchResponse,
    SearchResult, SearchType, SegmentHit, SortBy, VideoFilters,
};
pub use transcript::{Chapter, TranscriptSegment};
pub use video::{DateRange, UserStats, Video, VideoSummary};
