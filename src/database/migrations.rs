// Database migrations
// Creates and updates the database schema

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all necessary migrations to bring the database up to date
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    debug_assert!(get_schema_version(conn)? == SCHEMA_VERSION);
    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
        [],
        |row| row.get(0),
    ).unwrap_or(false);

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT MAX(version) FROM schema_version",
        [],
        |row| row.get(0),
    ).unwrap_or(0);

    Ok(version)
}

/// Initial schema creation (version 1)
fn migrate_v1(conn: &Connection) -> Result<()> {
    log::info!("Running database migration v1");

    conn.execute_batch(r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Videos table: One row per processed video per owner
        CREATE TABLE IF NOT EXISTS videos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner TEXT NOT NULL,
            video_id TEXT NOT NULL,
            title TEXT NOT NULL,
            duration_s INTEGER,
            upload_date TEXT,
            uploader TEXT,
            language_code TEXT,
            is_generated INTEGER,
            metadata TEXT NOT NULL DEFAULT '{}',
            text_word_count INTEGER,
            text_char_count INTEGER,
            processed_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(owner, video_id)
        );

        CREATE INDEX IF NOT EXISTS idx_videos_owner ON videos(owner);
        CREATE INDEX IF NOT EXISTS idx_videos_processed_at ON videos(processed_at);

        -- Chapters table: Detected chapter boundaries per video
        CREATE TABLE IF NOT EXISTS chapters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            video_ref INTEGER NOT NULL,
            start_time_s REAL NOT NULL,
            end_time_s REAL,
            text TEXT NOT NULL,
            summary TEXT,
            FOREIGN KEY (video_ref) REFERENCES videos(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_chapters_video ON chapters(video_ref, start_time_s);

        -- Transcript segments table: Individual timed text units
        CREATE TABLE IF NOT EXISTS transcript_segments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            video_ref INTEGER NOT NULL,
            start_time_s REAL NOT NULL,
            duration_s REAL NOT NULL,
            text TEXT NOT NULL,
            is_generated INTEGER,
            source TEXT NOT NULL DEFAULT 'youtube',
            text_hash TEXT NOT NULL,
            extra TEXT NOT NULL DEFAULT '{}',
            FOREIGN KEY (video_ref) REFERENCES videos(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_segments_video ON transcript_segments(video_ref, start_time_s);
        CREATE INDEX IF NOT EXISTS idx_segments_hash ON transcript_segments(text_hash);

        -- Raw assets table: Rendered transcript formats, one per kind
        CREATE TABLE IF NOT EXISTS raw_assets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            video_ref INTEGER NOT NULL,
            kind TEXT NOT NULL,
            content_text TEXT,
            content_json TEXT,
            stored_at TEXT NOT NULL,
            FOREIGN KEY (video_ref) REFERENCES videos(id) ON DELETE CASCADE,
            UNIQUE(video_ref, kind)
        );

        -- Full-text search virtual table for segment text. video_ref is
        -- carried for trigger symmetry only; indexing it would let MATCH
        -- hit row-id values instead of text.
        CREATE VIRTUAL TABLE IF NOT EXISTS segment_fts USING fts5(
            video_ref UNINDEXED,
            text,
            content='transcript_segments',
            content_rowid='id'
        );

        -- Triggers to keep FTS in sync with transcript_segments
        CREATE TRIGGER IF NOT EXISTS segment_fts_insert AFTER INSERT ON transcript_segments BEGIN
            INSERT INTO segment_fts(rowid, video_ref, text)
            VALUES (new.id, new.video_ref, new.text);
        END;

        CREATE TRIGGER IF NOT EXISTS segment_fts_delete AFTER DELETE ON transcript_segments BEGIN
            INSERT INTO segment_fts(segment_fts, rowid, video_ref, text)
            VALUES('delete', old.id, old.video_ref, old.text);
        END;

        CREATE TRIGGER IF NOT EXISTS segment_fts_update AFTER UPDATE ON transcript_segments BEGIN
            INSERT INTO segment_fts(segment_fts, rowid, video_ref, text)
            VALUES('delete', old.id, old.video_ref, old.text);
            INSERT INTO segment_fts(rowid, video_ref, text)
            VALUES (new.id, new.video_ref, new.text);
        END;

        -- Record migration
        INSERT INTO schema_version (version) VALUES (1);
    "#).context("Failed to run migration v1")?;

    log::info!("Migration v1 completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("PRAGMA foreign_keys = ON", []).unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_migrations_create_all_tables() {
        let conn = open();
        for table in ["videos", "chapters", "transcript_segments", "raw_assets"] {
            let exists: bool = conn
                .query_row(
                    "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert!(exists, "missing table {}", table);
        }
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = open();
        run_migrations(&conn).unwrap();
        let version: i32 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_fts_triggers_track_segments() {
        let conn = open();
        conn.execute(
            "INSERT INTO videos (owner, video_id, title, processed_at, updated_at)
             VALUES ('u', 'v', 'T', datetime('now'), datetime('now'))",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO transcript_segments (video_ref, start_time_s, duration_s, text, text_hash)
             VALUES (1, 0.0, 3.0, 'hello full text search', 'h')",
            [],
        )
        .unwrap();

        let hits: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM segment_fts WHERE segment_fts MATCH 'hello'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(hits, 1);

        conn.execute("DELETE FROM transcript_segments", []).unwrap();
        let hits: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM segment_fts WHERE segment_fts MATCH 'hello'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(hits, 0);
    }
}
