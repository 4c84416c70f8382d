// Processing configuration
//
// All tunables are injected explicitly - components never read ambient
// global state. Defaults mirror the shipped configuration.

use serde::{Deserialize, Serialize};

/// Default filler words removed during text cleaning.
pub const DEFAULT_FILLER_WORDS: &[&str] = &[
    "um", "uh", "like", "you know", "so", "well", "actually", "basically", "literally",
];

/// Default stop words excluded from keyword extraction.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with",
    "by", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must",
    "this", "that", "these", "those", "i", "you", "he", "she", "it", "we", "they",
    "me", "him", "her", "us", "them", "my", "your", "his", "its", "our", "their",
];

/// Text cleaning options. Each sub-step can be toggled independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextCleaningConfig {
    pub enabled: bool,
    pub remove_filler_words: bool,
    pub normalize_whitespace: bool,
    pub fix_transcription_artifacts: bool,
    pub filler_words: Vec<String>,
}

impl Default for TextCleaningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remove_filler_words: true,
            normalize_whitespace: true,
            fix_transcription_artifacts: true,
            filler_words: DEFAULT_FILLER_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Gap-based chapter detection thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterConfig {
    pub enabled: bool,
    /// Minimum silence gap between snippets to consider a chapter boundary.
    pub min_silence_gap_s: f64,
    /// Minimum chapter span; shorter accumulations keep merging forward.
    pub min_chapter_length_s: f64,
    pub include_summaries: bool,
}

impl Default for ChapterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_silence_gap_s: 3.0,
            min_chapter_length_s: 30.0,
            include_summaries: true,
        }
    }
}

/// Content analysis toggles for the analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub extract_keywords: bool,
    pub extract_topics: bool,
    pub detect_language: bool,
    pub categorize_content: bool,
    pub max_keywords: usize,
    pub stop_words: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extract_keywords: true,
            extract_topics: true,
            detect_language: true,
            categorize_content: true,
            max_keywords: 20,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Top-level configuration for the transcript processing pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub text_cleaning: TextCleaningConfig,
    pub chapters: ChapterConfig,
    pub analysis: AnalysisConfig,
    /// When set, the structured format carries the full content analysis
    /// and LLM-suitability assessment.
    pub deep_analysis: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_enabled() {
        let config = ProcessingConfig::default();
        assert!(config.text_cleaning.enabled);
        assert!(config.chapters.enabled);
        assert!(!config.text_cleaning.filler_words.is_empty());
        assert!(!config.analysis.stop_words.is_empty());
        assert_eq!(config.chapters.min_silence_gap_s, 3.0);
        assert_eq!(config.chapters.min_chapter_length_s, 30.0);
        assert!(!config.deep_analysis);
    }
}
