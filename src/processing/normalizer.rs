// Transcript text cleaning
//
// Pure text normalization: filler-word removal, whitespace collapse, and
// duplicate-word repair. Deterministic and idempotent - cleaning an
// already-clean string is a no-op.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::config::TextCleaningConfig;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

pub struct TextNormalizer {
    config: TextCleaningConfig,
    filler_re: Option<Regex>,
}

impl TextNormalizer {
    pub fn new(config: &TextCleaningConfig) -> Self {
        let filler_re = if config.remove_filler_words && !config.filler_words.is_empty() {
            let pattern = format!(
                r"\b(?:{})\b",
                config
                    .filler_words
                    .iter()
                    .map(|word| regex::escape(word))
                    .collect::<Vec<_>>()
                    .join("|")
            );
            RegexBuilder::new(&pattern).case_insensitive(true).build().ok()
        } else {
            None
        };

        Self {
            config: config.clone(),
            filler_re,
        }
    }

    /// Clean transcript text. Empty input yields empty output; a disabled
    /// config returns the input untouched.
    pub fn clean(&self, text: &str) -> String {
        if !self.config.enabled || text.is_empty() {
            return text.to_string();
        }

        let mut cleaned = text.to_string();

        if let Some(re) = &self.filler_re {
            cleaned = re.replace_all(&cleaned, "").into_owned();
        }

        if self.config.normalize_whitespace {
            cleaned = WHITESPACE_RE.replace_all(&cleaned, " ").into_owned();
        }

        if self.config.fix_transcription_artifacts {
            cleaned = collapse_duplicates(&cleaned);
        }

        cleaned.trim().to_string()
    }
}

/// Collapse immediately-repeated words ("the the" -> "the") and
/// dash-joined duplicates ("word - word" -> "word"). Runs are collapsed
/// fully in a single walk, which keeps the operation idempotent.
fn collapse_duplicates(text: &str) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut kept: Vec<String> = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];

        // "word - word" spread across three tokens
        if token == "-" {
            if let (Some(prev), Some(next)) = (kept.last(), tokens.get(i + 1)) {
                if prev.eq_ignore_ascii_case(next) {
                    i += 2;
                    continue;
                }
            }
            kept.push(token.to_string());
            i += 1;
            continue;
        }

        // "word-word" as a single token
        let token = match token.split_once('-') {
            Some((left, right)) if !left.is_empty() && left.eq_ignore_ascii_case(right) => left,
            _ => token,
        };

        // adjacent repeated word
        if kept.last().map(|prev| prev.eq_ignore_ascii_case(token)) == Some(true) {
            i += 1;
            continue;
        }

        kept.push(token.to_string());
        i += 1;
    }

    kept.join(" ")
}
