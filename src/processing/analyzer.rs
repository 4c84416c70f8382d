// Content analysis
//
// Quantitative metrics, quality scoring, and keyword/topic heuristics over
// a snippet sequence. Every sub-analysis tolerates empty input by
// returning zero-valued structures.

use std::collections::HashMap;

use log::debug;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::snippet::Snippet;

/// Transcription artifact vocabulary counted for quality scoring.
const ARTIFACT_TOKENS: &[&str] = &[
    "[music]", "[applause]", "[laughter]", "[noise]", "[inaudible]",
    "um", "uh", "er", "ah", "...", "--",
];

/// Incompleteness indicators (substring counts).
const INCOMPLETE_TOKENS: &[&str] = &["[", "]", "...", "--", "inaudible", "unclear"];

const COMMON_ENGLISH_WORDS: &[&str] =
    &["the", "and", "to", "of", "a", "in", "is", "it", "you", "that"];

const EDUCATIONAL_KEYWORDS: &[&str] =
    &["learn", "tutorial", "explain", "how to", "guide", "lesson", "course", "teach"];
const ENTERTAINMENT_KEYWORDS: &[&str] =
    &["funny", "entertainment", "comedy", "music", "game", "play", "fun"];
const NEWS_KEYWORDS: &[&str] =
    &["news", "report", "documentary", "interview", "analysis", "breaking"];
const TECHNICAL_KEYWORDS: &[&str] =
    &["technology", "software", "programming", "computer", "technical", "development"];

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]{3,}\b").expect("static regex"));
static SENTENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("static regex"));
static CAPITALIZED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-zA-Z]*(?:\s+[A-Z][a-zA-Z]*){0,2}\b").expect("static regex"));
static TOPIC_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(?:about|regarding|concerning|discussing|topic|subject)\s+([a-zA-Z\s]{3,20})",
        r"\b(?:today we'll|we're going to|let's talk about|focus on)\s+([a-zA-Z\s]{3,20})",
        r"\b(?:introduction to|overview of|guide to|tutorial on)\s+([a-zA-Z\s]{3,20})",
    ]
    .iter()
    .filter_map(|p| RegexBuilder::new(p).case_insensitive(true).build().ok())
    .collect()
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentMetrics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub character_count: usize,
    pub character_count_no_spaces: usize,
    pub average_words_per_sentence: f64,
    pub average_sentence_length: f64,
    pub speaking_rate_wpm: f64,
    pub estimated_reading_time_minutes: f64,
    pub lexical_diversity: f64,
    pub total_duration_seconds: f64,
    pub transcript_entries_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub quality_score: f64,
    pub artifact_count: usize,
    pub artifact_ratio: f64,
    pub incomplete_indicators: usize,
    pub incomplete_ratio: f64,
    pub average_entry_length: f64,
    pub entry_consistency: f64,
    pub quality_category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub frequency: usize,
    pub relevance_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageAnalysis {
    pub detected_language: String,
    pub english_probability: f64,
    pub average_words_per_sentence: f64,
    pub complexity_ratio: f64,
    pub readability_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentCategory {
    pub primary_category: String,
    pub category_scores: HashMap<String, usize>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub keywords: Vec<Keyword>,
    pub topics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_analysis: Option<LanguageAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentCategory>,
}

/// Full analyzer output over one transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptAnalysis {
    pub content_metrics: ContentMetrics,
    pub quality_assessment: QualityAssessment,
    pub content_analysis: ContentAnalysis,
}

/// Heuristic estimate of how usable a transcript is for downstream LLM
/// analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmSuitability {
    pub overall_score: f64,
    pub length_suitability: String,
    pub recommended_for_llm: bool,
    pub processing_notes: Vec<String>,
}

pub struct ContentAnalyzer {
    config: AnalysisConfig,
}

impl ContentAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn analyze(&self, snippets: &[Snippet]) -> TranscriptAnalysis {
        if snippets.is_empty() {
            return TranscriptAnalysis::default();
        }

        let full_text = snippets
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let content_metrics = self.content_metrics(&full_text, snippets);
        let quality_assessment = self.assess_quality(&full_text, snippets);

        let mut content_analysis = ContentAnalysis::default();
        if self.config.extract_keywords {
            content_analysis.keywords = self.extract_keywords(&full_text);
        }
        if self.config.extract_topics {
            content_analysis.topics = extract_topics(&full_text);
        }
        if self.config.detect_language {
            content_analysis.language_analysis = Some(analyze_language(&full_text));
        }
        if self.config.categorize_content {
            content_analysis.content_type = Some(categorize_content(&full_text));
        }

        debug!(
            "content analysis complete: {} words, quality {:.1}",
            content_metrics.word_count, quality_assessment.quality_score
        );

        TranscriptAnalysis {
            content_metrics,
            quality_assessment,
            content_analysis,
        }
    }

    fn content_metrics(&self, full_text: &str, snippets: &[Snippet]) -> ContentMetrics {
        let words: Vec<&str> = full_text.split_whitespace().collect();
        let sentences: Vec<&str> = SENTENCE_RE
            .split(full_text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        // duration taken from the last snippet's start offset
        let total_duration = snippets
            .last()
            .and_then(|s| s.start)
            .unwrap_or(0.0)
            .max(0.0);

        let speaking_rate = if total_duration > 0.0 {
            words.len() as f64 / (total_duration / 60.0)
        } else {
            0.0
        };

        let unique_words: std::collections::HashSet<&str> = words.iter().copied().collect();

        ContentMetrics {
            word_count: words.len(),
            sentence_count: sentences.len(),
            character_count: full_text.chars().count(),
            character_count_no_spaces: full_text.chars().filter(|c| *c != ' ').count(),
            average_words_per_sentence: if sentences.is_empty() {
                0.0
            } else {
                words.len() as f64 / sentences.len() as f64
            },
            average_sentence_length: if sentences.is_empty() {
                0.0
            } else {
                sentences.iter().map(|s| s.chars().count()).sum::<usize>() as f64
                    / sentences.len() as f64
            },
            speaking_rate_wpm: round1(speaking_rate),
            estimated_reading_time_minutes: round1(words.len() as f64 / 200.0),
            lexical_diversity: if words.is_empty() {
                0.0
            } else {
                unique_words.len() as f64 / words.len() as f64
            },
            total_duration_seconds: total_duration,
            transcript_entries_count: snippets.len(),
        }
    }

    fn assess_quality(&self, full_text: &str, snippets: &[Snippet]) -> QualityAssessment {
        let text_lower = full_text.to_lowercase();

        let artifact_count: usize = ARTIFACT_TOKENS
            .iter()
            .map(|token| text_lower.matches(token).count())
            .sum();
        let incomplete_count: usize = INCOMPLETE_TOKENS
            .iter()
            .map(|token| text_lower.matches(token).count())
            .sum();

        let word_count = full_text.split_whitespace().count();
        let artifact_ratio = if word_count > 0 {
            artifact_count as f64 / word_count as f64
        } else {
            0.0
        };
        let incomplete_ratio = if word_count > 0 {
            incomplete_count as f64 / word_count as f64
        } else {
            0.0
        };

        let quality_score =
            (100.0 - artifact_ratio * 100.0 - incomplete_ratio * 50.0).clamp(0.0, 100.0);

        let entry_lengths: Vec<usize> = snippets.iter().map(|s| s.text.chars().count()).collect();
        let average_entry_length = if entry_lengths.is_empty() {
            0.0
        } else {
            entry_lengths.iter().sum::<usize>() as f64 / entry_lengths.len() as f64
        };
        let entry_consistency = match (entry_lengths.iter().max(), entry_lengths.iter().min()) {
            (Some(&max), Some(&min)) if max > 0 => 1.0 - (max - min) as f64 / max as f64,
            _ => 0.0,
        };

        QualityAssessment {
            quality_score: round1(quality_score),
            artifact_count,
            artifact_ratio: round3(artifact_ratio),
            incomplete_indicators: incomplete_count,
            incomplete_ratio: round3(incomplete_ratio),
            average_entry_length: round1(average_entry_length),
            entry_consistency: round2(entry_consistency),
            quality_category: categorize_quality(quality_score).to_string(),
        }
    }

    fn extract_keywords(&self, text: &str) -> Vec<Keyword> {
        let text_lower = text.to_lowercase();
        let meaningful: Vec<&str> = WORD_RE
            .find_iter(&text_lower)
            .map(|m| m.as_str())
            .filter(|word| !self.config.stop_words.iter().any(|s| s == word))
            .collect();

        if meaningful.is_empty() {
            return Vec::new();
        }

        let mut frequencies: HashMap<&str, usize> = HashMap::new();
        for word in &meaningful {
            *frequencies.entry(*word).or_insert(0) += 1;
        }

        let mut ranked: Vec<(&str, usize)> = frequencies.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

        let total = meaningful.len() as f64;
        ranked
            .into_iter()
            .take(self.config.max_keywords)
            .map(|(word, frequency)| Keyword {
                keyword: word.to_string(),
                frequency,
                relevance_score: round2(frequency as f64 / total * 100.0),
            })
            .collect()
    }
}

/// Derived LLM-suitability assessment. Rewards 1000-2000 word transcripts
/// and blends in the quality score.
pub fn assess_llm_suitability(
    metrics: &ContentMetrics,
    quality: &QualityAssessment,
) -> LlmSuitability {
    let word_count = metrics.word_count;
    let quality_score = quality.quality_score;

    let length_suitability = match word_count {
        0..=49 => "Too Short",
        50..=199 => "Short but Usable",
        200..=1999 => "Ideal Length",
        2000..=4999 => "Long but Manageable",
        _ => "Very Long - Consider Chunking",
    };

    let length_score = if word_count <= 2000 {
        ((word_count as f64 / 1000.0) * 50.0).min(100.0)
    } else {
        (100.0 - (word_count as f64 - 2000.0) / 100.0).max(50.0)
    };
    let overall_score = length_score * 0.3 + quality_score * 0.7;

    let mut notes = Vec::new();
    if word_count > 3000 {
        notes.push("Consider breaking into smaller chunks for better LLM processing".to_string());
    }
    if quality_score < 70.0 {
        notes.push("Low quality transcript - may need manual review".to_string());
    }
    if quality.artifact_ratio > 0.1 {
        notes.push("High artifact content - clean format recommended".to_string());
    }
    if metrics.speaking_rate_wpm > 200.0 {
        notes.push("Fast-paced content - may have accuracy issues".to_string());
    }
    if notes.is_empty() {
        notes.push("Good quality content suitable for direct LLM analysis".to_string());
    }

    LlmSuitability {
        overall_score: round1(overall_score),
        length_suitability: length_suitability.to_string(),
        recommended_for_llm: overall_score >= 70.0,
        processing_notes: notes,
    }
}

fn extract_topics(text: &str) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();

    for re in TOPIC_RES.iter() {
        for captures in re.captures_iter(text) {
            if let Some(m) = captures.get(1) {
                topics.push(title_case(m.as_str().trim()));
            }
        }
    }

    for m in CAPITALIZED_RE.find_iter(text) {
        topics.push(m.as_str().to_string());
    }

    // first-seen dedup, then drop single words and very short phrases
    let mut seen = std::collections::HashSet::new();
    topics
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .filter(|t| t.split_whitespace().count() > 1 && t.len() > 5)
        .take(10)
        .collect()
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn analyze_language(text: &str) -> LanguageAnalysis {
    let words: Vec<&str> = text.split_whitespace().collect();
    let total_words = words.len();

    let english_count = text
        .to_lowercase()
        .split_whitespace()
        .filter(|word| COMMON_ENGLISH_WORDS.contains(word))
        .count();
    let english_probability = if total_words > 0 {
        english_count as f64 / total_words as f64
    } else {
        0.0
    };

    let sentences: Vec<&str> = SENTENCE_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let avg_words_per_sentence = if sentences.is_empty() {
        0.0
    } else {
        total_words as f64 / sentences.len() as f64
    };

    let complex_words = words.iter().filter(|w| w.chars().count() > 6).count();
    let complexity_ratio = if total_words > 0 {
        complex_words as f64 / total_words as f64
    } else {
        0.0
    };

    LanguageAnalysis {
        detected_language: if english_probability > 0.1 {
            "English".to_string()
        } else {
            "Unknown".to_string()
        },
        english_probability: round2(english_probability),
        average_words_per_sentence: round1(avg_words_per_sentence),
        complexity_ratio: round2(complexity_ratio),
        readability_level: assess_readability(avg_words_per_sentence, complexity_ratio).to_string(),
    }
}

fn categorize_content(text: &str) -> ContentCategory {
    let text_lower = text.to_lowercase();
    let presence = |keywords: &[&str]| -> usize {
        keywords.iter().filter(|k| text_lower.contains(*k)).count()
    };

    let scores: Vec<(&str, usize)> = vec![
        ("Educational", presence(EDUCATIONAL_KEYWORDS)),
        ("Entertainment", presence(ENTERTAINMENT_KEYWORDS)),
        ("News/Documentary", presence(NEWS_KEYWORDS)),
        ("Technical", presence(TECHNICAL_KEYWORDS)),
    ];

    let total: usize = scores.iter().map(|(_, s)| s).sum();
    let primary = match scores.iter().max_by_key(|(_, score)| *score) {
        Some((name, score)) if *score > 0 => *name,
        _ => "General",
    };
    let max = scores.iter().map(|(_, s)| *s).max().unwrap_or(0);

    ContentCategory {
        primary_category: primary.to_string(),
        category_scores: scores
            .into_iter()
            .map(|(name, score)| (name.to_string(), score))
            .collect(),
        confidence: if total > 0 {
            round1(max as f64 / total as f64 * 100.0)
        } else {
            0.0
        },
    }
}

fn categorize_quality(score: f64) -> &'static str {
    if score >= 90.0 {
        "Excellent"
    } else if score >= 80.0 {
        "Very Good"
    } else if score >= 70.0 {
        "Good"
    } else if score >= 60.0 {
        "Fair"
    } else if score >= 50.0 {
        "Poor"
    } else {
        "Very Poor"
    }
}

fn assess_readability(avg_words_per_sentence: f64, complexity_ratio: f64) -> &'static str {
    if avg_words_per_sentence < 15.0 && complexity_ratio < 0.2 {
        "Easy"
    } else if avg_words_per_sentence < 20.0 && complexity_ratio < 0.3 {
        "Moderate"
    } else if avg_words_per_sentence < 25.0 && complexity_ratio < 0.4 {
        "Difficult"
    } else {
        "Very Difficult"
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
