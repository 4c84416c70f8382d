// Gap-based chapter detection
//
// Walks snippets in time order accumulating text; a silence gap of at
// least `min_silence_gap_s` closes the current chapter, but only once the
// accumulated span reaches `min_chapter_length_s`. Under-length
// accumulations keep merging forward instead of producing tiny chapters.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ChapterConfig;
use crate::snippet::Snippet;

const SUMMARY_WORDS: usize = 8;

/// A detected contiguous span of transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedChapter {
    pub start_time_s: f64,
    pub end_time_s: f64,
    pub duration_s: f64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub word_count: usize,
}

pub struct ChapterDetector {
    config: ChapterConfig,
}

impl ChapterDetector {
    pub fn new(config: &ChapterConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Detect chapters in a time-ordered snippet sequence. Snippets with
    /// missing start times are skipped; empty input produces no chapters.
    pub fn detect(&self, snippets: &[Snippet]) -> Vec<DetectedChapter> {
        if !self.config.enabled {
            return Vec::new();
        }

        let timed: Vec<(f64, &str)> = snippets
            .iter()
            .filter_map(|s| s.start.map(|start| (start, s.text.as_str())))
            .collect();

        let min_gap = self.config.min_silence_gap_s;
        let min_length = self.config.min_chapter_length_s;

        let mut chapters = Vec::new();
        let mut chapter_start = 0.0_f64;
        let mut chapter_text: Vec<&str> = Vec::new();

        for (i, &(start, text)) in timed.iter().enumerate() {
            chapter_text.push(text);

            let mut is_break = false;
            if let Some(&(next_start, _)) = timed.get(i + 1) {
                let gap = next_start - start;
                if gap >= min_gap && start - chapter_start >= min_length {
                    is_break = true;
                }
            } else {
                // final snippet always attempts closure
                is_break = true;
            }

            if is_break && start - chapter_start >= min_length {
                let text = chapter_text.join(" ").trim().to_string();
                let word_count = text.split_whitespace().count();
                let summary = if self.config.include_summaries && !text.is_empty() {
                    Some(summarize(&text))
                } else {
                    None
                };

                debug!(
                    "chapter detected: {:.1}s-{:.1}s ({} chars)",
                    chapter_start,
                    start,
                    text.len()
                );

                chapters.push(DetectedChapter {
                    start_time_s: chapter_start,
                    end_time_s: start,
                    duration_s: start - chapter_start,
                    text,
                    summary,
                    word_count,
                });

                chapter_start = start;
                chapter_text.clear();
            }
        }

        chapters
    }
}

/// First eight words, with an ellipsis when the summary was cut.
fn summarize(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(SUMMARY_WORDS).collect();
    let mut summary = words.join(" ");
    if words.len() == SUMMARY_WORDS {
        summary.push_str("...");
    }
    summary
}
