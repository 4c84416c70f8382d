// Processing pipeline
// Runs the full process-and-store flow for one downloaded transcript:
// formatting, chapter detection, and the atomic save.

use anyhow::{Context, Result};
use log::info;

use crate::config::ProcessingConfig;
use crate::database::{DatabaseManager, SaveTranscript};
use crate::processing::chapters::ChapterDetector;
use crate::processing::formatter::{FormatKind, TranscriptFormatter};
use crate::snippet::{Snippet, VideoInfo};

/// Process a raw snippet payload and persist every derived artifact.
/// Returns the stored video row id.
pub fn process_and_store(
    db: &DatabaseManager,
    owner: &str,
    video_id: &str,
    snippets: &[Snippet],
    video_info: &VideoInfo,
    config: &ProcessingConfig,
) -> Result<i64> {
    info!(
        "Processing transcript for {} ({} snippets)",
        video_id,
        snippets.len()
    );

    let formatter = TranscriptFormatter::new(config);
    let formats = formatter.format(snippets, video_info, FormatKind::all());
    let chapters = ChapterDetector::new(&config.chapters).detect(snippets);

    let save = SaveTranscript {
        video_info: video_info.clone(),
        structured: formats.structured,
        segments: snippets.to_vec(),
        chapters,
        clean_text: formats.clean,
        timestamped_text: formats.timestamped,
        source: None,
        is_generated: video_info.is_generated,
    };

    db.save_transcript(owner, video_id, &save)
        .with_context(|| format!("Failed to store transcript for {}", video_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::AssetKind;

    fn snippets() -> Vec<Snippet> {
        vec![
            Snippet::new("welcome to the show", 0.0).with_duration(3.0),
            Snippet::new("um today we talk about rust", 3.0).with_duration(4.0),
            Snippet::new("after a long pause", 60.0).with_duration(3.0),
            Snippet::new("closing remarks", 62.0).with_duration(2.0),
        ]
    }

    fn info() -> VideoInfo {
        VideoInfo {
            id: Some("vid1".to_string()),
            title: Some("Pipeline Test".to_string()),
            duration: Some(65.0),
            language: Some("en".to_string()),
            ..VideoInfo::default()
        }
    }

    #[test]
    fn test_process_and_store_end_to_end() {
        let _ = env_logger::builder().is_test(true).try_init();
        let db = DatabaseManager::in_memory().unwrap();
        let config = ProcessingConfig::default();

        process_and_store(&db, "alice", "vid1", &snippets(), &info(), &config).unwrap();

        let video = db.get_video("alice", "vid1").unwrap().unwrap();
        assert_eq!(video.title, "Pipeline Test");
        assert!(video.text_word_count.is_some());

        let segments = db.get_transcript_segments("alice", "vid1").unwrap();
        assert_eq!(segments.len(), 4);

        // minimum chapter length keeps the early gap from splitting
        let chapters = db.get_chapters("alice", "vid1").unwrap();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].start_time_s, 0.0);
        assert_eq!(chapters[0].end_time_s, Some(62.0));

        let clean = db
            .get_raw_asset("alice", "vid1", AssetKind::CleanText)
            .unwrap()
            .unwrap();
        // filler word removed from the clean rendering
        assert!(!clean.content_text.unwrap().contains("um "));

        assert!(db
            .get_raw_asset("alice", "vid1", AssetKind::StructuredJson)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_reprocessing_is_idempotent() {
        let db = DatabaseManager::in_memory().unwrap();
        let config = ProcessingConfig::default();

        let first = process_and_store(&db, "alice", "vid1", &snippets(), &info(), &config).unwrap();
        let word_count = db.get_video("alice", "vid1").unwrap().unwrap().text_word_count;
        let second = process_and_store(&db, "alice", "vid1", &snippets(), &info(), &config).unwrap();

        assert_eq!(first, second);
        let video = db.get_video("alice", "vid1").unwrap().unwrap();
        assert_eq!(video.text_word_count, word_count);
        assert_eq!(db.get_transcript_segments("alice", "vid1").unwrap().len(), 4);
        assert_eq!(db.get_chapters("alice", "vid1").unwrap().len(), 1);
    }

    #[test]
    fn test_stored_transcript_is_searchable() {
        let db = DatabaseManager::in_memory().unwrap();
        process_and_store(
            &db,
            "alice",
            "vid1",
            &snippets(),
            &info(),
            &ProcessingConfig::default(),
        )
        .unwrap();

        let response = db
            .search_transcripts(
                "alice",
                &crate::database::models::SearchRequest {
                    query: "closing".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(response.total_count, 1);
        assert_eq!(response.results[0].matching_segments[0].text, "closing remarks");
    }
}
