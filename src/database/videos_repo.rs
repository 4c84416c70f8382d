// Videos repository
// Handles video row upserts, lookups, deletion, and per-owner aggregates

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{DateRange, UserStats, Video, VideoSummary};
use super::DatabaseManager;
use crate::snippet::{UploadDate, VideoInfo};

impl DatabaseManager {
    /// Get a video by its logical key
    pub fn get_video(&self, owner: &str, video_id: &str) -> Result<Option<Video>> {
        self.with_connection(|conn| get_video_impl(conn, owner, video_id))
    }

    /// Delete a video and everything hanging off it. Returns whether a
    /// row existed.
    pub fn delete_video(&self, owner: &str, video_id: &str) -> Result<bool> {
        self.with_connection(|conn| delete_video_impl(conn, owner, video_id))
    }

    /// Aggregate corpus statistics for one owner
    pub fn get_user_stats(&self, owner: &str) -> Result<UserStats> {
        self.with_connection(|conn| get_user_stats_impl(conn, owner))
    }
}

pub(super) const VIDEO_COLUMNS: &str =
    "id, owner, video_id, title, duration_s, upload_date, uploader, language_code, \
     is_generated, metadata, text_word_count, text_char_count, processed_at, updated_at";

pub(super) fn video_from_row(row: &Row) -> rusqlite::Result<Video> {
    let metadata: String = row.get(9)?;
    Ok(Video {
        id: row.get(0)?,
        owner: row.get(1)?,
        video_id: row.get(2)?,
        title: row.get(3)?,
        duration_s: row.get(4)?,
        upload_date: row.get(5)?,
        uploader: row.get(6)?,
        language_code: row.get(7)?,
        is_generated: row.get(8)?,
        metadata: serde_json::from_str(&metadata).unwrap_or_default(),
        text_word_count: row.get(10)?,
        text_char_count: row.get(11)?,
        processed_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

/// Insert or update the video row for `(owner, video_id)` and return its
/// row id. `processed_at` is set on first insert only.
pub(super) fn upsert_video_impl(
    conn: &Connection,
    owner: &str,
    video_id: &str,
    info: &VideoInfo,
    metadata_json: &str,
    text_word_count: Option<i64>,
    text_char_count: Option<i64>,
) -> Result<i64> {
    let title = info
        .title
        .clone()
        .unwrap_or_else(|| format!("Video {}", video_id));
    let upload_date = parse_upload_date(info.upload_date.as_ref());
    let now = Utc::now().to_rfc3339();

    conn.execute(
        r#"
        INSERT INTO videos (
            owner, video_id, title, duration_s, upload_date, uploader,
            language_code, is_generated, metadata, text_word_count,
            text_char_count, processed_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
        ON CONFLICT(owner, video_id) DO UPDATE SET
            title = excluded.title,
            duration_s = excluded.duration_s,
            upload_date = excluded.upload_date,
            uploader = excluded.uploader,
            language_code = excluded.language_code,
            is_generated = excluded.is_generated,
            metadata = excluded.metadata,
            text_word_count = excluded.text_word_count,
            text_char_count = excluded.text_char_count,
            updated_at = excluded.updated_at
        "#,
        params![
            owner,
            video_id,
            title,
            info.duration.map(|d| d as i64),
            upload_date,
            info.uploader,
            info.language,
            info.is_generated,
            metadata_json,
            text_word_count,
            text_char_count,
            now,
        ],
    )
    .context("Failed to upsert video")?;

    let id: i64 = conn
        .query_row(
            "SELECT id FROM videos WHERE owner = ?1 AND video_id = ?2",
            params![owner, video_id],
            |row| row.get(0),
        )
        .context("Failed to read back video id")?;

    Ok(id)
}

pub(super) fn get_video_impl(
    conn: &Connection,
    owner: &str,
    video_id: &str,
) -> Result<Option<Video>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM videos WHERE owner = ?1 AND video_id = ?2",
            VIDEO_COLUMNS
        ),
        params![owner, video_id],
        video_from_row,
    )
    .optional()
    .context("Failed to get video")
}

fn delete_video_impl(conn: &Connection, owner: &str, video_id: &str) -> Result<bool> {
    let Some(video) = get_video_impl(conn, owner, video_id)? else {
        return Ok(false);
    };

    let tx = conn
        .unchecked_transaction()
        .context("Failed to start delete transaction")?;

    // Explicit child deletes so the FTS sync triggers fire
    tx.execute(
        "DELETE FROM transcript_segments WHERE video_ref = ?1",
        params![video.id],
    )
    .context("Failed to delete segments")?;
    tx.execute("DELETE FROM chapters WHERE video_ref = ?1", params![video.id])
        .context("Failed to delete chapters")?;
    tx.execute("DELETE FROM raw_assets WHERE video_ref = ?1", params![video.id])
        .context("Failed to delete raw assets")?;
    tx.execute("DELETE FROM videos WHERE id = ?1", params![video.id])
        .context("Failed to delete video")?;

    tx.commit().context("Failed to commit video delete")?;

    log::info!("Deleted video {} for owner {}", video_id, owner);
    Ok(true)
}

/// A video together with its chapter and segment counts
pub(super) fn video_summary(conn: &Connection, video: Video) -> Result<VideoSummary> {
    let chapters_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM chapters WHERE video_ref = ?1",
            params![video.id],
            |row| row.get(0),
        )
        .context("Failed to count chapters")?;
    let segments_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transcript_segments WHERE video_ref = ?1",
            params![video.id],
            |row| row.get(0),
        )
        .context("Failed to count segments")?;

    Ok(VideoSummary {
        video,
        chapters_count,
        segments_count,
    })
}

fn get_user_stats_impl(conn: &Connection, owner: &str) -> Result<UserStats> {
    let total_videos: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM videos WHERE owner = ?1",
            params![owner],
            |row| row.get(0),
        )
        .context("Failed to count videos")?;
    let total_segments: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transcript_segments s
             JOIN videos v ON v.id = s.video_ref WHERE v.owner = ?1",
            params![owner],
            |row| row.get(0),
        )
        .context("Failed to count segments")?;
    let total_chapters: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM chapters c
             JOIN videos v ON v.id = c.video_ref WHERE v.owner = ?1",
            params![owner],
            |row| row.get(0),
        )
        .context("Failed to count chapters")?;

    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT language_code FROM videos
             WHERE owner = ?1 AND language_code IS NOT NULL ORDER BY language_code",
        )
        .context("Failed to prepare language query")?;
    let languages = stmt
        .query_map(params![owner], |row| row.get::<_, String>(0))
        .context("Failed to query languages")?
        .collect::<rusqlite::Result<Vec<String>>>()
        .context("Failed to collect languages")?;

    let (earliest, latest): (Option<String>, Option<String>) = conn
        .query_row(
            "SELECT MIN(processed_at), MAX(processed_at) FROM videos WHERE owner = ?1",
            params![owner],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .context("Failed to read processed-at range")?;

    let total_duration_s: i64 = conn
        .query_row(
            "SELECT COALESCE(SUM(duration_s), 0) FROM videos WHERE owner = ?1",
            params![owner],
            |row| row.get(0),
        )
        .context("Failed to sum durations")?;

    Ok(UserStats {
        total_videos,
        total_segments,
        total_chapters,
        languages,
        date_range: DateRange { earliest, latest },
        total_duration_s,
    })
}

/// Parse an upload date given as YYYYMMDD, an ISO date/datetime, or an
/// epoch timestamp. Unparseable input yields `None`.
pub fn parse_upload_date(upload_date: Option<&UploadDate>) -> Option<String> {
    let date = match upload_date? {
        UploadDate::Epoch(seconds) => {
            DateTime::<Utc>::from_timestamp(*seconds as i64, 0).map(|dt| dt.date_naive())?
        }
        UploadDate::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            if text.len() == 8 && text.bytes().all(|b| b.is_ascii_digit()) {
                NaiveDate::parse_from_str(text, "%Y%m%d").ok()?
            } else if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                date
            } else {
                DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive())?
            }
        }
    };
    Some(date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upload_date_compact() {
        let date = parse_upload_date(Some(&UploadDate::Text("20250130".to_string())));
        assert_eq!(date.as_deref(), Some("2025-01-30"));
    }

    #[test]
    fn test_parse_upload_date_iso() {
        let date = parse_upload_date(Some(&UploadDate::Text("2024-06-01".to_string())));
        assert_eq!(date.as_deref(), Some("2024-06-01"));
        let date = parse_upload_date(Some(&UploadDate::Text(
            "2024-06-01T10:30:00+00:00".to_string(),
        )));
        assert_eq!(date.as_deref(), Some("2024-06-01"));
    }

    #[test]
    fn test_parse_upload_date_epoch() {
        // 2021-01-01T00:00:00Z
        let date = parse_upload_date(Some(&UploadDate::Epoch(1609459200.0)));
        assert_eq!(date.as_deref(), Some("2021-01-01"));
    }

    #[test]
    fn test_parse_upload_date_garbage_is_none() {
        assert_eq!(
            parse_upload_date(Some(&UploadDate::Text("next tuesday".to_string()))),
            None
        );
        assert_eq!(parse_upload_date(None), None);
    }
}
