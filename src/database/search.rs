// Search
// Filtered, ranked, paginated queries over stored videos and segments,
// with a raw-asset fallback when no structured segments match

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::{
    AssetKind, ChapterHit, ChapterSearchResponse, FiltersApplied, SearchRequest, SearchResponse,
    SearchResult, SearchType, SegmentHit, SortBy, TranscriptContent, Video,
};
use super::transcripts_repo::get_raw_asset_impl;
use super::videos_repo::{get_video_impl, video_from_row, video_summary, VIDEO_COLUMNS};
use super::DatabaseManager;

const MAX_PAGE_SIZE: usize = 100;
/// Characters of context taken on each side of a raw-asset match.
const MOCK_CONTEXT: usize = 100;

impl DatabaseManager {
    /// Search one owner's transcript corpus
    pub fn search_transcripts(&self, owner: &str, request: &SearchRequest) -> Result<SearchResponse> {
        self.with_connection(|conn| search_transcripts_impl(conn, owner, request))
    }

    /// Substring search over chapter text and summaries
    pub fn search_chapters(
        &self,
        owner: &str,
        query: &str,
        video_id: Option<&str>,
        page: usize,
        page_size: usize,
    ) -> Result<ChapterSearchResponse> {
        self.with_connection(|conn| search_chapters_impl(conn, owner, query, video_id, page, page_size))
    }

    /// Get a stored transcript rendering for display
    pub fn get_video_transcript(
        &self,
        owner: &str,
        video_id: &str,
        format: AssetKind,
    ) -> Result<Option<TranscriptContent>> {
        self.with_connection(|conn| get_video_transcript_impl(conn, owner, video_id, format))
    }

    /// Suggest completions from titles and segment words
    pub fn get_search_suggestions(
        &self,
        owner: &str,
        partial_query: &str,
        limit: usize,
    ) -> Result<Vec<String>> {
        self.with_connection(|conn| get_search_suggestions_impl(conn, owner, partial_query, limit))
    }
}

fn search_transcripts_impl(
    conn: &Connection,
    owner: &str,
    request: &SearchRequest,
) -> Result<SearchResponse> {
    let filtered = filtered_videos(conn, owner, request)?;
    let query = request.query.trim();

    // No query: return the filtered videos themselves
    if query.is_empty() {
        return video_results(conn, filtered, request);
    }

    let filtered_ids: Vec<i64> = filtered.iter().map(|v| v.id).collect();
    let mut segment_hits =
        matching_segments(conn, &filtered_ids, query, request.search_type, request.time_range)?;

    let matched_ids: HashSet<i64> = segment_hits.keys().copied().collect();
    let mut matched: Vec<Video> = filtered
        .iter()
        .filter(|v| matched_ids.contains(&v.id))
        .cloned()
        .collect();

    // Fallback: no segment matched, search the stored raw renderings
    if matched.is_empty() {
        let asset_ids = raw_asset_matches(conn, &filtered_ids, query)?;
        matched = filtered
            .iter()
            .filter(|v| asset_ids.contains(&v.id))
            .cloned()
            .collect();
    }

    sort_videos(&mut matched, request.sort_by);

    let total_count = matched.len();
    let (page, page_size, total_pages, start, end) =
        paginate(total_count, request.page, request.page_size);

    let mut results = Vec::with_capacity(end - start);
    for video in matched.drain(..).skip(start).take(end - start) {
        let mut segments = segment_hits.remove(&video.id).unwrap_or_default();
        segments.sort_by(|a, b| a.start_time_s.total_cmp(&b.start_time_s));

        let total_segments;
        if segments.is_empty() {
            segments = mock_segments(conn, &video, query)?;
            // reached via the raw-asset fallback, so at least one match exists
            total_segments = 1;
        } else {
            total_segments = segments.len();
        }

        let relevance_score = relevance(&video, query);
        results.push(SearchResult {
            video: video_summary(conn, video)?,
            matching_segments: segments,
            total_segments,
            relevance_score,
        });
    }

    log::debug!(
        "search for {:?} matched {} video(s), returning page {}/{}",
        query,
        total_count,
        page,
        total_pages
    );

    Ok(SearchResponse {
        results,
        total_count,
        page,
        page_size,
        total_pages,
        has_next: page < total_pages,
        has_previous: page > 1,
        query: query.to_string(),
        search_type: request.search_type.as_str().to_string(),
        filters_applied: FiltersApplied {
            video_filters: request.video_filters.clone().unwrap_or_default(),
            time_range: request.time_range,
            language: request.language.clone(),
            is_generated: request.is_generated,
        },
    })
}

/// Apply the video-level filters and return the candidate set.
fn filtered_videos(conn: &Connection, owner: &str, request: &SearchRequest) -> Result<Vec<Video>> {
    let mut sql = format!("SELECT {} FROM videos WHERE owner = ?1", VIDEO_COLUMNS);
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(owner.to_string())];

    if let Some(filters) = &request.video_filters {
        if let Some(title) = &filters.title {
            params_vec.push(Box::new(like_pattern(title)));
            sql.push_str(&format!(" AND title LIKE ?{} ESCAPE '\\'", params_vec.len()));
        }
        if let Some(uploader) = &filters.uploader {
            params_vec.push(Box::new(like_pattern(uploader)));
            sql.push_str(&format!(" AND uploader LIKE ?{} ESCAPE '\\'", params_vec.len()));
        }
        if let Some(date_from) = &filters.date_from {
            params_vec.push(Box::new(date_from.clone()));
            sql.push_str(&format!(" AND date(processed_at) >= ?{}", params_vec.len()));
        }
        if let Some(date_to) = &filters.date_to {
            params_vec.push(Box::new(date_to.clone()));
            sql.push_str(&format!(" AND date(processed_at) <= ?{}", params_vec.len()));
        }
        if let Some(duration_min) = filters.duration_min {
            params_vec.push(Box::new(duration_min));
            sql.push_str(&format!(" AND duration_s >= ?{}", params_vec.len()));
        }
        if let Some(duration_max) = filters.duration_max {
            params_vec.push(Box::new(duration_max));
            sql.push_str(&format!(" AND duration_s <= ?{}", params_vec.len()));
        }
    }

    if let Some(language) = &request.language {
        params_vec.push(Box::new(language.clone()));
        sql.push_str(&format!(" AND language_code = ?{}", params_vec.len()));
    }
    if let Some(is_generated) = request.is_generated {
        params_vec.push(Box::new(is_generated));
        sql.push_str(&format!(" AND is_generated = ?{}", params_vec.len()));
    }

    let mut stmt = conn.prepare(&sql).context("Failed to prepare video filter query")?;
    let videos = stmt
        .query_map(rusqlite::params_from_iter(params_vec.iter().map(|p| p.as_ref())), video_from_row)
        .context("Failed to query filtered videos")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to collect filtered videos")?;
    Ok(videos)
}

/// Matching segments grouped by video, per the requested match mode.
fn matching_segments(
    conn: &Connection,
    video_ids: &[i64],
    query: &str,
    search_type: SearchType,
    time_range: Option<(f64, f64)>,
) -> Result<HashMap<i64, Vec<SegmentHit>>> {
    let mut hits: HashMap<i64, Vec<SegmentHit>> = HashMap::new();
    if video_ids.is_empty() {
        return Ok(hits);
    }

    let id_list = video_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
    let mut sql = match search_type {
        SearchType::FullText => {
            params_vec.push(Box::new(fts_phrase(query)));
            format!(
                "SELECT s.id, s.video_ref, s.start_time_s, s.duration_s, s.text, s.is_generated, s.source
                 FROM segment_fts
                 JOIN transcript_segments s ON s.id = segment_fts.rowid
                 WHERE segment_fts MATCH ?1 AND s.video_ref IN ({})",
                id_list
            )
        }
        SearchType::Exact | SearchType::Fuzzy => {
            params_vec.push(Box::new(like_pattern(query)));
            format!(
                "SELECT s.id, s.video_ref, s.start_time_s, s.duration_s, s.text, s.is_generated, s.source
                 FROM transcript_segments s
                 WHERE s.text LIKE ?1 ESCAPE '\\' AND s.video_ref IN ({})",
                id_list
            )
        }
    };

    if let Some((start, end)) = time_range {
        params_vec.push(Box::new(start));
        sql.push_str(&format!(" AND s.start_time_s >= ?{}", params_vec.len()));
        params_vec.push(Box::new(end));
        sql.push_str(&format!(" AND s.start_time_s <= ?{}", params_vec.len()));
    }

    let mut stmt = conn.prepare(&sql).context("Failed to prepare segment search")?;
    let rows = stmt
        .query_map(
            rusqlite::params_from_iter(params_vec.iter().map(|p| p.as_ref())),
            |row| {
                Ok((
                    row.get::<_, i64>(1)?,
                    SegmentHit {
                        id: row.get(0)?,
                        start_time_s: row.get(2)?,
                        duration_s: row.get(3)?,
                        text: row.get(4)?,
                        is_generated: row.get(5)?,
                        source: row.get(6)?,
                    },
                ))
            },
        )
        .context("Failed to run segment search")?;

    for row in rows {
        let (video_ref, hit) = row.context("Failed to read segment hit")?;
        hits.entry(video_ref).or_default().push(hit);
    }
    Ok(hits)
}

/// Videos whose clean or timestamped rendering contains the query.
fn raw_asset_matches(conn: &Connection, video_ids: &[i64], query: &str) -> Result<HashSet<i64>> {
    if video_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let id_list = video_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT DISTINCT video_ref FROM raw_assets
         WHERE kind IN ('clean_text', 'timestamped')
           AND content_text LIKE ?1 ESCAPE '\\'
           AND video_ref IN ({})",
        id_list
    );

    let mut stmt = conn.prepare(&sql).context("Failed to prepare raw-asset search")?;
    let ids = stmt
        .query_map(params![like_pattern(query)], |row| row.get::<_, i64>(0))
        .context("Failed to run raw-asset search")?
        .collect::<rusqlite::Result<HashSet<i64>>>()
        .context("Failed to collect raw-asset matches")?;
    Ok(ids)
}

/// Synthesize one display segment from the clean-text asset: a window of
/// context around the first case-insensitive occurrence of the query.
/// Time fields are placeholders, marked by the `raw_asset` source.
fn mock_segments(conn: &Connection, video: &Video, query: &str) -> Result<Vec<SegmentHit>> {
    let asset: Option<String> = conn
        .query_row(
            "SELECT content_text FROM raw_assets WHERE video_ref = ?1 AND kind = 'clean_text'",
            params![video.id],
            |row| row.get(0),
        )
        .unwrap_or(None);
    let Some(content) = asset else {
        return Ok(Vec::new());
    };

    let content_lower = content.to_lowercase();
    let query_lower = query.to_lowercase();
    let Some(start_pos) = content_lower.find(&query_lower) else {
        return Ok(Vec::new());
    };

    // Byte offsets come from the lowercased copy, so clamp to boundaries
    let context_start = floor_char_boundary(&content, start_pos.saturating_sub(MOCK_CONTEXT));
    let context_end = floor_char_boundary(
        &content,
        (start_pos + query_lower.len() + MOCK_CONTEXT).min(content.len()),
    );
    let text = content[context_start..context_end].to_string();

    Ok(vec![SegmentHit {
        id: 0,
        start_time_s: 0.0,
        duration_s: 3.0,
        text,
        is_generated: video.is_generated,
        source: "raw_asset".to_string(),
    }])
}

fn video_results(
    conn: &Connection,
    mut videos: Vec<Video>,
    request: &SearchRequest,
) -> Result<SearchResponse> {
    sort_videos(&mut videos, request.sort_by);

    let total_count = videos.len();
    let (page, page_size, total_pages, start, end) =
        paginate(total_count, request.page, request.page_size);

    let mut results = Vec::with_capacity(end - start);
    for video in videos.drain(..).skip(start).take(end - start) {
        let summary = video_summary(conn, video)?;
        let total_segments = summary.segments_count as usize;
        results.push(SearchResult {
            video: summary,
            matching_segments: Vec::new(),
            total_segments,
            relevance_score: 0.0,
        });
    }

    Ok(SearchResponse {
        results,
        total_count,
        page,
        page_size,
        total_pages,
        has_next: page < total_pages,
        has_previous: page > 1,
        query: String::new(),
        search_type: "none".to_string(),
        filters_applied: FiltersApplied::default(),
    })
}

fn search_chapters_impl(
    conn: &Connection,
    owner: &str,
    query: &str,
    video_id: Option<&str>,
    page: usize,
    page_size: usize,
) -> Result<ChapterSearchResponse> {
    let mut sql = String::from(
        "SELECT c.id, v.video_id, v.title, c.start_time_s, c.end_time_s, c.text, c.summary
         FROM chapters c
         JOIN videos v ON v.id = c.video_ref
         WHERE v.owner = ?1",
    );
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(owner.to_string())];

    if let Some(video_id) = video_id {
        params_vec.push(Box::new(video_id.to_string()));
        sql.push_str(&format!(" AND v.video_id = ?{}", params_vec.len()));
    }

    let query = query.trim();
    if !query.is_empty() {
        params_vec.push(Box::new(like_pattern(query)));
        let idx = params_vec.len();
        sql.push_str(&format!(
            " AND (c.text LIKE ?{idx} ESCAPE '\\' OR c.summary LIKE ?{idx} ESCAPE '\\')",
        ));
    }
    sql.push_str(" ORDER BY v.video_id, c.start_time_s");

    let mut stmt = conn.prepare(&sql).context("Failed to prepare chapter search")?;
    let hits = stmt
        .query_map(
            rusqlite::params_from_iter(params_vec.iter().map(|p| p.as_ref())),
            |row| {
                let start_time_s: f64 = row.get(3)?;
                let end_time_s: Option<f64> = row.get(4)?;
                Ok(ChapterHit {
                    id: row.get(0)?,
                    video_id: row.get(1)?,
                    video_title: row.get(2)?,
                    start_time_s,
                    end_time_s,
                    text: row.get(5)?,
                    summary: row.get(6)?,
                    duration_s: end_time_s.map(|end| end - start_time_s),
                })
            },
        )
        .context("Failed to run chapter search")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to collect chapter hits")?;

    let total_count = hits.len();
    let (page, page_size, total_pages, start, end) = paginate(total_count, page, page_size);

    Ok(ChapterSearchResponse {
        results: hits.into_iter().skip(start).take(end - start).collect(),
        total_count,
        page,
        page_size,
        total_pages,
        has_next: page < total_pages,
        has_previous: page > 1,
        query: query.to_string(),
    })
}

fn get_video_transcript_impl(
    conn: &Connection,
    owner: &str,
    video_id: &str,
    format: AssetKind,
) -> Result<Option<TranscriptContent>> {
    let Some(video) = get_video_impl(conn, owner, video_id)? else {
        return Ok(None);
    };
    let Some(asset) = get_raw_asset_impl(conn, owner, video_id, format)? else {
        return Ok(None);
    };

    let is_json = asset.content_json.is_some();
    let content = match asset.content_json {
        Some(json) => json,
        None => serde_json::Value::String(asset.content_text.unwrap_or_default()),
    };

    Ok(Some(TranscriptContent {
        video_id: video.video_id,
        title: video.title,
        format,
        content,
        is_json,
        stored_at: asset.stored_at,
        language_code: video.language_code,
        is_generated: video.is_generated,
    }))
}

fn get_search_suggestions_impl(
    conn: &Connection,
    owner: &str,
    partial_query: &str,
    limit: usize,
) -> Result<Vec<String>> {
    let partial = partial_query.trim();
    if partial.chars().count() < 2 || limit == 0 {
        return Ok(Vec::new());
    }

    let half = (limit / 2).max(1);
    let pattern = like_pattern(partial);

    let mut stmt = conn
        .prepare(
            "SELECT title FROM videos
             WHERE owner = ?1 AND title LIKE ?2 ESCAPE '\\' LIMIT ?3",
        )
        .context("Failed to prepare title suggestions")?;
    let mut suggestions = stmt
        .query_map(params![owner, pattern, half as i64], |row| row.get::<_, String>(0))
        .context("Failed to query title suggestions")?
        .collect::<rusqlite::Result<Vec<String>>>()
        .context("Failed to collect title suggestions")?;

    let mut stmt = conn
        .prepare(
            "SELECT s.text FROM transcript_segments s
             JOIN videos v ON v.id = s.video_ref
             WHERE v.owner = ?1 AND s.text LIKE ?2 ESCAPE '\\' LIMIT ?3",
        )
        .context("Failed to prepare segment suggestions")?;
    let texts = stmt
        .query_map(params![owner, pattern, half as i64], |row| row.get::<_, String>(0))
        .context("Failed to query segment suggestions")?
        .collect::<rusqlite::Result<Vec<String>>>()
        .context("Failed to collect segment suggestions")?;

    // Words from matching segments that extend the partial query
    let partial_lower = partial.to_lowercase();
    for text in texts {
        for word in text.to_lowercase().split_whitespace() {
            if word.contains(&partial_lower)
                && word.len() > partial_lower.len()
                && !suggestions.iter().any(|s| s == word)
            {
                suggestions.push(word.to_string());
            }
        }
    }

    suggestions.truncate(limit);
    Ok(suggestions)
}

fn sort_videos(videos: &mut [Video], sort_by: SortBy) {
    match sort_by {
        // Relevance sorting over videos reduces to recency; per-video
        // relevance scores are attached during hydration
        SortBy::Relevance | SortBy::Date => {
            videos.sort_by(|a, b| b.processed_at.cmp(&a.processed_at));
        }
        SortBy::Duration => {
            videos.sort_by(|a, b| b.duration_s.unwrap_or(0).cmp(&a.duration_s.unwrap_or(0)));
        }
        SortBy::Title => {
            videos.sort_by(|a, b| a.title.cmp(&b.title));
        }
    }
}

fn relevance(video: &Video, query: &str) -> f64 {
    if query.is_empty() {
        return 0.0;
    }
    if video.title.to_lowercase().contains(&query.to_lowercase()) {
        1.0
    } else {
        0.5
    }
}

/// Clamp the requested page into range and compute the slice bounds.
/// An out-of-range page yields the nearest valid page rather than an
/// error; an empty result set still has one (empty) page.
fn paginate(total: usize, page: usize, page_size: usize) -> (usize, usize, usize, usize, usize) {
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    let total_pages = if total == 0 {
        1
    } else {
        (total + page_size - 1) / page_size
    };
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total);
    (page, page_size, total_pages, start, end)
}

/// Largest char boundary at or below `index`.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Quote the query as an FTS5 phrase so user input is never parsed as
/// match syntax.
fn fts_phrase(query: &str) -> String {
    format!("\"{}\"", query.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::VideoFilters;
    use crate::database::transcripts_repo::SaveTranscript;
    use crate::database::DatabaseManager;
    use crate::snippet::{Snippet, VideoInfo};

    fn seed_video(db: &DatabaseManager, video_id: &str, title: &str, texts: &[(&str, f64)]) {
        let save = SaveTranscript {
            video_info: VideoInfo {
                title: Some(title.to_string()),
                duration: Some(300.0),
                language: Some("en".to_string()),
                ..VideoInfo::default()
            },
            segments: texts
                .iter()
                .map(|(text, start)| Snippet::new(*text, *start))
                .collect(),
            clean_text: Some(
                texts.iter().map(|(t, _)| *t).collect::<Vec<_>>().join(" "),
            ),
            ..SaveTranscript::default()
        };
        db.save_transcript("alice", video_id, &save).unwrap();
    }

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            ..SearchRequest::default()
        }
    }

    #[test]
    fn test_full_text_search_finds_segments() {
        let db = DatabaseManager::in_memory().unwrap();
        seed_video(&db, "v1", "Rust talk", &[("the borrow checker explained", 0.0)]);
        seed_video(&db, "v2", "Cooking show", &[("how to make pasta", 0.0)]);

        let response = db.search_transcripts("alice", &request("borrow")).unwrap();
        assert_eq!(response.total_count, 1);
        assert_eq!(response.results[0].video.video.video_id, "v1");
        assert_eq!(response.results[0].matching_segments.len(), 1);
        assert_eq!(response.results[0].total_segments, 1);
        assert_eq!(response.search_type, "full_text");
    }

    #[test]
    fn test_title_match_boosts_relevance() {
        let db = DatabaseManager::in_memory().unwrap();
        seed_video(&db, "v1", "Rust talk", &[("rust ownership basics", 0.0)]);
        seed_video(&db, "v2", "Unrelated title", &[("more rust content", 10.0)]);

        let response = db.search_transcripts("alice", &request("rust")).unwrap();
        assert_eq!(response.total_count, 2);
        for result in &response.results {
            let expected = if result.video.video.video_id == "v1" { 1.0 } else { 0.5 };
            assert_eq!(result.relevance_score, expected);
        }
    }

    #[test]
    fn test_empty_query_short_circuits() {
        let db = DatabaseManager::in_memory().unwrap();
        seed_video(&db, "v1", "First", &[("alpha", 0.0), ("beta", 5.0)]);

        let response = db.search_transcripts("alice", &request("   ")).unwrap();
        assert_eq!(response.search_type, "none");
        assert_eq!(response.query, "");
        assert_eq!(response.total_count, 1);
        assert!(response.results[0].matching_segments.is_empty());
        assert_eq!(response.results[0].total_segments, 2);
        assert_eq!(response.results[0].relevance_score, 0.0);
    }

    #[test]
    fn test_raw_asset_fallback_synthesizes_mock_segment() {
        let db = DatabaseManager::in_memory().unwrap();
        // Asset text present, but no stored segments
        let save = SaveTranscript {
            video_info: VideoInfo {
                title: Some("Asset only".to_string()),
                ..VideoInfo::default()
            },
            clean_text: Some(format!(
                "{} needle in the middle {}",
                "padding ".repeat(30),
                "padding ".repeat(30)
            )),
            ..SaveTranscript::default()
        };
        db.save_transcript("alice", "v1", &save).unwrap();

        let response = db.search_transcripts("alice", &request("needle")).unwrap();
        assert_eq!(response.total_count, 1);
        let result = &response.results[0];
        assert_eq!(result.total_segments, 1);
        assert_eq!(result.matching_segments.len(), 1);
        let hit = &result.matching_segments[0];
        assert_eq!(hit.id, 0);
        assert_eq!(hit.start_time_s, 0.0);
        assert_eq!(hit.duration_s, 3.0);
        assert_eq!(hit.source, "raw_asset");
        assert!(hit.text.contains("needle"));
        // roughly a two-hundred-character window
        assert!(hit.text.len() <= 2 * MOCK_CONTEXT + "needle".len());
    }

    #[test]
    fn test_full_text_matches_text_not_row_ids() {
        let db = DatabaseManager::in_memory().unwrap();
        seed_video(&db, "v1", "T", &[("no digits in this text at all", 0.0)]);

        // a numeric query must not hit the segment via its video_ref value
        let response = db.search_transcripts("alice", &request("1")).unwrap();
        assert_eq!(response.total_count, 0);

        let response = db.search_transcripts("alice", &request("digits")).unwrap();
        assert_eq!(response.total_count, 1);
    }

    #[test]
    fn test_exact_search_is_case_insensitive() {
        let db = DatabaseManager::in_memory().unwrap();
        seed_video(&db, "v1", "T", &[("The Quick Brown Fox", 0.0)]);

        let mut req = request("quick brown");
        req.search_type = SearchType::Exact;
        let response = db.search_transcripts("alice", &req).unwrap();
        assert_eq!(response.total_count, 1);
    }

    #[test]
    fn test_zero_matches_is_empty_success() {
        let db = DatabaseManager::in_memory().unwrap();
        seed_video(&db, "v1", "T", &[("something else entirely", 0.0)]);

        let response = db.search_transcripts("alice", &request("nonexistent")).unwrap();
        assert_eq!(response.total_count, 0);
        assert!(response.results.is_empty());
        assert_eq!(response.total_pages, 1);
        assert!(!response.has_next);
        assert!(!response.has_previous);
    }

    #[test]
    fn test_video_filters_restrict_candidates() {
        let db = DatabaseManager::in_memory().unwrap();
        seed_video(&db, "v1", "Rust stream", &[("shared topic", 0.0)]);
        seed_video(&db, "v2", "Go stream", &[("shared topic", 0.0)]);

        let mut req = request("shared");
        req.video_filters = Some(VideoFilters {
            title: Some("rust".to_string()),
            ..VideoFilters::default()
        });
        let response = db.search_transcripts("alice", &req).unwrap();
        assert_eq!(response.total_count, 1);
        assert_eq!(response.results[0].video.video.video_id, "v1");
        assert_eq!(response.filters_applied.video_filters.title.as_deref(), Some("rust"));
    }

    #[test]
    fn test_time_range_filters_segments() {
        let db = DatabaseManager::in_memory().unwrap();
        seed_video(&db, "v1", "T", &[("needle early", 5.0), ("needle late", 500.0)]);

        let mut req = request("needle");
        req.time_range = Some((0.0, 100.0));
        let response = db.search_transcripts("alice", &req).unwrap();
        assert_eq!(response.results[0].matching_segments.len(), 1);
        assert_eq!(response.results[0].matching_segments[0].start_time_s, 5.0);
    }

    #[test]
    fn test_pagination_invariants() {
        let db = DatabaseManager::in_memory().unwrap();
        for i in 0..5 {
            seed_video(&db, &format!("v{}", i), &format!("Video {}", i), &[("common term", 0.0)]);
        }

        let mut req = request("common");
        req.page_size = 2;
        let mut seen = 0;
        for page in 1..=3 {
            req.page = page;
            let response = db.search_transcripts("alice", &req).unwrap();
            assert_eq!(response.total_count, 5);
            assert_eq!(response.total_pages, 3);
            assert_eq!(response.has_previous, page > 1);
            assert_eq!(response.has_next, page < 3);
            seen += response.results.len();
        }
        assert_eq!(seen, 5);

        // out-of-range page clamps to the last page
        req.page = 99;
        let response = db.search_transcripts("alice", &req).unwrap();
        assert_eq!(response.page, 3);
        assert_eq!(response.results.len(), 1);
    }

    #[test]
    fn test_page_size_is_capped() {
        let (_, page_size, _, _, _) = paginate(10, 1, 100_000);
        assert_eq!(page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_title_sort() {
        let db = DatabaseManager::in_memory().unwrap();
        seed_video(&db, "v1", "Zebra", &[("term", 0.0)]);
        seed_video(&db, "v2", "Apple", &[("term", 0.0)]);

        let mut req = request("term");
        req.sort_by = SortBy::Title;
        let response = db.search_transcripts("alice", &req).unwrap();
        let titles: Vec<&str> = response
            .results
            .iter()
            .map(|r| r.video.video.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Apple", "Zebra"]);
    }

    #[test]
    fn test_search_chapters() {
        let db = DatabaseManager::in_memory().unwrap();
        let save = SaveTranscript {
            video_info: VideoInfo {
                title: Some("Chaptered".to_string()),
                ..VideoInfo::default()
            },
            segments: vec![Snippet::new("intro words", 0.0)],
            chapters: vec![crate::processing::chapters::DetectedChapter {
                start_time_s: 0.0,
                end_time_s: 60.0,
                duration_s: 60.0,
                text: "introduction to the topic".to_string(),
                summary: Some("introduction...".to_string()),
                word_count: 4,
            }],
            ..SaveTranscript::default()
        };
        db.save_transcript("alice", "v1", &save).unwrap();

        let response = db.search_chapters("alice", "introduction", None, 1, 20).unwrap();
        assert_eq!(response.total_count, 1);
        assert_eq!(response.results[0].video_id, "v1");
        assert_eq!(response.results[0].duration_s, Some(60.0));

        let response = db.search_chapters("alice", "introduction", Some("other"), 1, 20).unwrap();
        assert_eq!(response.total_count, 0);
    }

    #[test]
    fn test_get_video_transcript() {
        let db = DatabaseManager::in_memory().unwrap();
        seed_video(&db, "v1", "T", &[("full transcript text", 0.0)]);

        let content = db
            .get_video_transcript("alice", "v1", AssetKind::CleanText)
            .unwrap()
            .unwrap();
        assert!(!content.is_json);
        assert_eq!(
            content.content,
            serde_json::Value::String("full transcript text".to_string())
        );

        assert!(db
            .get_video_transcript("alice", "v1", AssetKind::StructuredJson)
            .unwrap()
            .is_none());
        assert!(db
            .get_video_transcript("alice", "missing", AssetKind::CleanText)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_suggestions() {
        let db = DatabaseManager::in_memory().unwrap();
        seed_video(&db, "v1", "Programming basics", &[("programming is programmatic", 0.0)]);

        let suggestions = db.get_search_suggestions("alice", "program", 10).unwrap();
        assert!(suggestions.contains(&"Programming basics".to_string()));
        assert!(suggestions.iter().any(|s| s == "programming"));

        assert!(db.get_search_suggestions("alice", "p", 10).unwrap().is_empty());
    }

    #[test]
    fn test_owner_scoping() {
        let db = DatabaseManager::in_memory().unwrap();
        seed_video(&db, "v1", "Mine", &[("secret term", 0.0)]);

        let response = db.search_transcripts("mallory", &request("secret")).unwrap();
        assert_eq!(response.total_count, 0);
    }
}
