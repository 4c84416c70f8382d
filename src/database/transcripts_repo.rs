// Transcripts repository
// Handles the atomic transcript save and reads of segments, chapters,
// and raw assets

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use sha2::{Digest, Sha256};

use super::models::{AssetKind, Chapter, RawAsset, TranscriptSegment};
use super::videos_repo::upsert_video_impl;
use super::DatabaseManager;
use crate::processing::chapters::DetectedChapter;
use crate::processing::formatter::StructuredTranscript;
use crate::snippet::{Snippet, VideoInfo};

/// Everything one transcript save carries.
#[derive(Debug, Clone, Default)]
pub struct SaveTranscript {
    pub video_info: VideoInfo,
    pub structured: Option<StructuredTranscript>,
    pub segments: Vec<Snippet>,
    pub chapters: Vec<DetectedChapter>,
    pub clean_text: Option<String>,
    pub timestamped_text: Option<String>,
    pub source: Option<String>,
    pub is_generated: Option<bool>,
}

impl DatabaseManager {
    /// Save a full transcript in one transaction: video upsert, chapter
    /// and segment replacement, raw-asset upserts. Any failure rolls the
    /// whole save back.
    pub fn save_transcript(
        &self,
        owner: &str,
        video_id: &str,
        save: &SaveTranscript,
    ) -> Result<i64> {
        self.with_connection(|conn| save_transcript_impl(conn, owner, video_id, save))
    }

    /// Get all segments for a video ordered by start time
    pub fn get_transcript_segments(
        &self,
        owner: &str,
        video_id: &str,
    ) -> Result<Vec<TranscriptSegment>> {
        self.with_connection(|conn| get_transcript_segments_impl(conn, owner, video_id))
    }

    /// Get all chapters for a video ordered by start time
    pub fn get_chapters(&self, owner: &str, video_id: &str) -> Result<Vec<Chapter>> {
        self.with_connection(|conn| get_chapters_impl(conn, owner, video_id))
    }

    /// Get one raw asset by kind
    pub fn get_raw_asset(
        &self,
        owner: &str,
        video_id: &str,
        kind: AssetKind,
    ) -> Result<Option<RawAsset>> {
        self.with_connection(|conn| get_raw_asset_impl(conn, owner, video_id, kind))
    }
}

/// SHA-256 hex digest of the trimmed text.
pub fn sha256_text(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

fn save_transcript_impl(
    conn: &Connection,
    owner: &str,
    video_id: &str,
    save: &SaveTranscript,
) -> Result<i64> {
    let tx = conn
        .unchecked_transaction()
        .context("Failed to start save transaction")?;

    // Word/char counts derived from the segment texts
    let (word_count, char_count) = if save.segments.is_empty() {
        (None, None)
    } else {
        let all_text = save
            .segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        (
            Some(all_text.split_whitespace().count() as i64),
            Some(all_text.chars().count() as i64),
        )
    };

    let metadata_json = match &save.structured {
        Some(structured) => {
            serde_json::to_string(structured).context("Failed to serialize structured document")?
        }
        None => "{}".to_string(),
    };

    let video_ref = upsert_video_impl(
        &tx,
        owner,
        video_id,
        &save.video_info,
        &metadata_json,
        word_count,
        char_count,
    )?;

    replace_chapters(&tx, video_ref, &save.chapters)?;
    replace_segments(
        &tx,
        video_ref,
        &save.segments,
        save.source.as_deref().unwrap_or("youtube"),
        save.is_generated.or(save.video_info.is_generated),
    )?;
    upsert_raw_assets(&tx, video_ref, save, &metadata_json)?;

    tx.commit().context("Failed to commit transcript save")?;

    log::info!(
        "Saved transcript for {} ({} segments, {} chapters)",
        video_id,
        save.segments.len(),
        save.chapters.len()
    );
    Ok(video_ref)
}

fn replace_chapters(conn: &Connection, video_ref: i64, chapters: &[DetectedChapter]) -> Result<()> {
    conn.execute("DELETE FROM chapters WHERE video_ref = ?1", params![video_ref])
        .context("Failed to delete old chapters")?;

    let mut stmt = conn
        .prepare(
            "INSERT INTO chapters (video_ref, start_time_s, end_time_s, text, summary)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .context("Failed to prepare chapter insert")?;
    for chapter in chapters {
        stmt.execute(params![
            video_ref,
            chapter.start_time_s,
            chapter.end_time_s,
            chapter.text.trim(),
            chapter.summary,
        ])
        .context("Failed to insert chapter")?;
    }
    Ok(())
}

fn replace_segments(
    conn: &Connection,
    video_ref: i64,
    segments: &[Snippet],
    source: &str,
    is_generated: Option<bool>,
) -> Result<()> {
    conn.execute(
        "DELETE FROM transcript_segments WHERE video_ref = ?1",
        params![video_ref],
    )
    .context("Failed to delete old segments")?;

    let mut stmt = conn
        .prepare(
            "INSERT INTO transcript_segments (
                video_ref, start_time_s, duration_s, text, is_generated,
                source, text_hash, extra
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .context("Failed to prepare segment insert")?;

    for snippet in segments {
        let text = snippet.text.trim();
        if text.is_empty() {
            continue;
        }

        let start = snippet.start.unwrap_or(0.0);
        let mut duration = snippet.duration.unwrap_or(0.0);
        if duration <= 0.0 {
            if let Some(end) = snippet.end {
                duration = (end - start).max(0.5);
            }
        }
        if duration <= 0.0 {
            duration = 3.0;
        }

        let extra = serde_json::Value::Object(snippet.extra.clone()).to_string();

        stmt.execute(params![
            video_ref,
            start,
            duration,
            text,
            is_generated,
            source,
            sha256_text(text),
            extra,
        ])
        .context("Failed to insert segment")?;
    }
    Ok(())
}

fn upsert_raw_assets(
    conn: &Connection,
    video_ref: i64,
    save: &SaveTranscript,
    metadata_json: &str,
) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    let mut upsert = |kind: AssetKind, text: Option<&str>, json: Option<&str>| -> Result<()> {
        conn.execute(
            "INSERT INTO raw_assets (video_ref, kind, content_text, content_json, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(video_ref, kind) DO UPDATE SET
                 content_text = excluded.content_text,
                 content_json = excluded.content_json,
                 stored_at = excluded.stored_at",
            params![video_ref, kind.as_str(), text, json, now],
        )
        .with_context(|| format!("Failed to upsert {} asset", kind.as_str()))?;
        Ok(())
    };

    if let Some(clean) = save.clean_text.as_deref() {
        if !clean.is_empty() {
            upsert(AssetKind::CleanText, Some(clean), None)?;
        }
    }
    if let Some(timestamped) = save.timestamped_text.as_deref() {
        if !timestamped.is_empty() {
            upsert(AssetKind::Timestamped, Some(timestamped), None)?;
        }
    }
    if save.structured.is_some() {
        upsert(AssetKind::StructuredJson, None, Some(metadata_json))?;
    }
    Ok(())
}

pub(super) const SEGMENT_COLUMNS: &str =
    "id, video_ref, start_time_s, duration_s, text, is_generated, source, text_hash, extra";

pub(super) fn segment_from_row(row: &Row) -> rusqlite::Result<TranscriptSegment> {
    let extra: String = row.get(8)?;
    Ok(TranscriptSegment {
        id: row.get(0)?,
        video_ref: row.get(1)?,
        start_time_s: row.get(2)?,
        duration_s: row.get(3)?,
        text: row.get(4)?,
        is_generated: row.get(5)?,
        source: row.get(6)?,
        text_hash: row.get(7)?,
        extra: serde_json::from_str(&extra).unwrap_or_default(),
    })
}

fn get_transcript_segments_impl(
    conn: &Connection,
    owner: &str,
    video_id: &str,
) -> Result<Vec<TranscriptSegment>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM transcript_segments s
             WHERE s.video_ref = (SELECT id FROM videos WHERE owner = ?1 AND video_id = ?2)
             ORDER BY s.start_time_s",
            SEGMENT_COLUMNS
                .split(", ")
                .map(|c| format!("s.{}", c))
                .collect::<Vec<_>>()
                .join(", ")
        ))
        .context("Failed to prepare segment query")?;
    let segments = stmt
        .query_map(params![owner, video_id], segment_from_row)
        .context("Failed to query segments")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to collect segments")?;
    Ok(segments)
}

fn get_chapters_impl(conn: &Connection, owner: &str, video_id: &str) -> Result<Vec<Chapter>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, video_ref, start_time_s, end_time_s, text, summary FROM chapters
             WHERE video_ref = (SELECT id FROM videos WHERE owner = ?1 AND video_id = ?2)
             ORDER BY start_time_s",
        )
        .context("Failed to prepare chapter query")?;
    let chapters = stmt
        .query_map(params![owner, video_id], |row| {
            Ok(Chapter {
                id: row.get(0)?,
                video_ref: row.get(1)?,
                start_time_s: row.get(2)?,
                end_time_s: row.get(3)?,
                text: row.get(4)?,
                summary: row.get(5)?,
            })
        })
        .context("Failed to query chapters")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to collect chapters")?;
    Ok(chapters)
}

pub(super) fn get_raw_asset_impl(
    conn: &Connection,
    owner: &str,
    video_id: &str,
    kind: AssetKind,
) -> Result<Option<RawAsset>> {
    conn.query_row(
        "SELECT id, video_ref, kind, content_text, content_json, stored_at FROM raw_assets
         WHERE video_ref = (SELECT id FROM videos WHERE owner = ?1 AND video_id = ?2)
           AND kind = ?3",
        params![owner, video_id, kind.as_str()],
        raw_asset_from_row,
    )
    .optional()
    .context("Failed to get raw asset")
}

pub(super) fn raw_asset_from_row(row: &Row) -> rusqlite::Result<RawAsset> {
    let kind: String = row.get(2)?;
    let content_json: Option<String> = row.get(4)?;
    Ok(RawAsset {
        id: row.get(0)?,
        video_ref: row.get(1)?,
        kind: AssetKind::from_str(&kind).unwrap_or(AssetKind::CleanText),
        content_text: row.get(3)?,
        content_json: content_json.and_then(|j| serde_json::from_str(&j).ok()),
        stored_at: row.get(5)?,
    })
}
