// Transcript rendering
//
// Turns a snippet sequence into the three output formats: clean prose,
// timestamped lines, and a structured document embedding both plus
// chapters and statistics.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ProcessingConfig;
use crate::processing::analyzer::{
    assess_llm_suitability, ContentAnalyzer, LlmSuitability, TranscriptAnalysis,
};
use crate::processing::chapters::{ChapterDetector, DetectedChapter};
use crate::processing::normalizer::TextNormalizer;
use crate::snippet::{Snippet, VideoInfo};

pub const PROCESSOR_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    Clean,
    Timestamped,
    Structured,
}

impl FormatKind {
    pub fn all() -> &'static [FormatKind] {
        &[FormatKind::Clean, FormatKind::Timestamped, FormatKind::Structured]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptFormats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamped: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<StructuredTranscript>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredMetadata {
    pub video_id: String,
    pub title: String,
    pub duration: f64,
    pub upload_date: String,
    pub uploader: String,
    pub processed_at: Option<DateTime<Utc>>,
    pub processor_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredStatistics {
    pub total_entries: usize,
    pub word_count: usize,
    pub character_count: usize,
    pub estimated_reading_time_minutes: f64,
    pub chapters_detected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaking_rate_wpm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexical_diversity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_words_per_sentence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredBody {
    pub entries: Vec<Snippet>,
    pub chapters: Vec<DetectedChapter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedFormats {
    pub clean_text: String,
    pub timestamped_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveAnalysis {
    pub transcript_analysis: TranscriptAnalysis,
    pub llm_suitability: LlmSuitability,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredTranscript {
    pub metadata: StructuredMetadata,
    pub statistics: StructuredStatistics,
    pub transcript: StructuredBody,
    pub formats: EmbeddedFormats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comprehensive_analysis: Option<ComprehensiveAnalysis>,
}

pub struct TranscriptFormatter {
    config: ProcessingConfig,
    normalizer: TextNormalizer,
    chapter_detector: ChapterDetector,
    analyzer: ContentAnalyzer,
}

impl TranscriptFormatter {
    pub fn new(config: &ProcessingConfig) -> Self {
        Self {
            config: config.clone(),
            normalizer: TextNormalizer::new(&config.text_cleaning),
            chapter_detector: ChapterDetector::new(&config.chapters),
            analyzer: ContentAnalyzer::new(&config.analysis),
        }
    }

    pub fn format(
        &self,
        snippets: &[Snippet],
        video_info: &VideoInfo,
        requested: &[FormatKind],
    ) -> TranscriptFormats {
        let mut formats = TranscriptFormats::default();

        if requested.contains(&FormatKind::Clean) {
            formats.clean = Some(self.clean_transcript(snippets));
        }
        if requested.contains(&FormatKind::Timestamped) {
            formats.timestamped = Some(self.timestamped_transcript(snippets));
        }
        if requested.contains(&FormatKind::Structured) {
            formats.structured = Some(self.structured_transcript(snippets, video_info));
        }

        debug!("generated {} transcript format(s)", requested.len());
        formats
    }

    /// One prose block: non-empty snippet texts joined and cleaned.
    pub fn clean_transcript(&self, snippets: &[Snippet]) -> String {
        let raw = snippets
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        self.normalizer.clean(&raw)
    }

    /// One line per timed snippet, `[<start>s] text`. Snippets without a
    /// start offset or with empty text are skipped.
    pub fn timestamped_transcript(&self, snippets: &[Snippet]) -> String {
        snippets
            .iter()
            .filter_map(|s| {
                let text = s.text.trim();
                match s.start {
                    Some(start) if !text.is_empty() => {
                        Some(format!("[{:.2}s] {}", start, text))
                    }
                    _ => None,
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn structured_transcript(
        &self,
        snippets: &[Snippet],
        video_info: &VideoInfo,
    ) -> StructuredTranscript {
        let chapters = self.chapter_detector.detect(snippets);

        let total_text = snippets
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let word_count = total_text.split_whitespace().count();

        let mut statistics = StructuredStatistics {
            total_entries: snippets.len(),
            word_count,
            character_count: total_text.chars().count(),
            estimated_reading_time_minutes: (word_count as f64 / 200.0 * 10.0).round() / 10.0,
            chapters_detected: chapters.len(),
            ..StructuredStatistics::default()
        };

        let comprehensive_analysis = if self.config.deep_analysis {
            let analysis = self.analyzer.analyze(snippets);
            statistics.speaking_rate_wpm = Some(analysis.content_metrics.speaking_rate_wpm);
            statistics.lexical_diversity = Some(analysis.content_metrics.lexical_diversity);
            statistics.average_words_per_sentence =
                Some(analysis.content_metrics.average_words_per_sentence);
            let llm_suitability = assess_llm_suitability(
                &analysis.content_metrics,
                &analysis.quality_assessment,
            );
            Some(ComprehensiveAnalysis {
                transcript_analysis: analysis,
                llm_suitability,
            })
        } else {
            None
        };

        StructuredTranscript {
            metadata: StructuredMetadata {
                video_id: video_info.id.clone().unwrap_or_default(),
                title: video_info.title.clone().unwrap_or_default(),
                duration: video_info.duration.unwrap_or(0.0),
                upload_date: video_info
                    .upload_date
                    .as_ref()
                    .map(|d| d.as_display_string())
                    .unwrap_or_default(),
                uploader: video_info.uploader.clone().unwrap_or_default(),
                processed_at: None,
                processor_version: PROCESSOR_VERSION.to_string(),
            },
            statistics,
            transcript: StructuredBody {
                entries: snippets.to_vec(),
                chapters,
            },
            formats: EmbeddedFormats {
                clean_text: self.clean_transcript(snippets),
                timestamped_text: self.timestamped_transcript(snippets),
            },
            comprehensive_analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessingConfig;
    use crate::snippet::Snippet;

    fn formatter() -> TranscriptFormatter {
        TranscriptFormatter::new(&ProcessingConfig::default())
    }

    fn snippets() -> Vec<Snippet> {
        vec![
            Snippet::new("hello world", 0.0),
            Snippet::new("um this is great", 4.5),
            Snippet::new("", 8.0),
            Snippet::new("goodbye", 12.25),
        ]
    }

    #[test]
    fn test_clean_format_drops_fillers_and_empties() {
        let clean = formatter().clean_transcript(&snippets());
        assert_eq!(clean, "hello world this is great goodbye");
    }

    #[test]
    fn test_timestamped_format() {
        let text = formatter().timestamped_transcript(&snippets());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "[0.00s] hello world");
        assert_eq!(lines[1], "[4.50s] um this is great");
        assert_eq!(lines[2], "[12.25s] goodbye");
    }

    #[test]
    fn test_timestamped_skips_startless() {
        let input = vec![
            Snippet::new("timed", 1.0),
            Snippet {
                text: "untimed".to_string(),
                ..Snippet::default()
            },
        ];
        let text = formatter().timestamped_transcript(&input);
        assert_eq!(text, "[1.00s] timed");
    }

    #[test]
    fn test_structured_document_shape() {
        let info = VideoInfo {
            id: Some("abc123".to_string()),
            title: Some("A Video".to_string()),
            duration: Some(120.0),
            ..VideoInfo::default()
        };
        let doc = formatter().structured_transcript(&snippets(), &info);
        assert_eq!(doc.metadata.video_id, "abc123");
        assert_eq!(doc.metadata.processor_version, PROCESSOR_VERSION);
        assert_eq!(doc.statistics.total_entries, 4);
        assert_eq!(doc.statistics.word_count, 7);
        assert_eq!(doc.transcript.entries.len(), 4);
        assert!(!doc.formats.clean_text.is_empty());
        assert!(doc.comprehensive_analysis.is_none());
    }

    #[test]
    fn test_deep_analysis_enriches_statistics() {
        let config = ProcessingConfig {
            deep_analysis: true,
            ..ProcessingConfig::default()
        };
        let doc = TranscriptFormatter::new(&config)
            .structured_transcript(&snippets(), &VideoInfo::default());
        assert!(doc.comprehensive_analysis.is_some());
        assert!(doc.statistics.lexical_diversity.is_some());
        assert!(doc.statistics.speaking_rate_wpm.is_some());
    }

    #[test]
    fn test_requested_formats_are_selective() {
        let formats = formatter().format(
            &snippets(),
            &VideoInfo::default(),
            &[FormatKind::Clean],
        );
        assert!(formats.clean.is_some());
        assert!(formats.timestamped.is_none());
        assert!(formats.structured.is_none());
    }

    #[test]
    fn test_empty_input_yields_empty_formats() {
        let formats = formatter().format(&[], &VideoInfo::default(), FormatKind::all());
        assert_eq!(formats.clean.as_deref(), Some(""));
        assert_eq!(formats.timestamped.as_deref(), Some(""));
        let doc = formats.structured.unwrap();
        assert_eq!(doc.statistics.word_count, 0);
        assert!(doc.transcript.chapters.is_empty());
    }
}
