// Transcript processing: cleaning, chapter detection, content analysis,
// and output formatting.

pub mod analyzer;
pub mod chapters;
pub mod formatter;
pub mod normalizer;

pub use analyzer::{
    assess_llm_suitability, ContentAnalyzer, ContentMetrics, LlmSuitability, QualityAssessment,
    TranscriptAnalysis,
};
pub use chapters::{ChapterDetector, DetectedChapter};
pub use formatter::{FormatKind, StructuredTranscript, TranscriptFormats, TranscriptFormatter};
pub use normalizer::TextNormalizer;
