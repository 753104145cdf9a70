//! Confidence-gated OCR text correction
//!
//! Low-confidence spans are checked against the domain table, then the
//! confusion table, then fuzzily against every key of both. High-confidence
//! spans pass through untouched.

use std::cmp::Ordering;
use tracing::{debug, info};

use super::dictionary::{CorrectionDictionary, DictionaryStats, TableKind};
use super::similarity::similarity;
use crate::vision::RecognizedSpan;

/// Confidence below which correction is attempted, when the caller has no preference
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.8;

/// Minimum similarity for a fuzzy match, independent of the confidence threshold
pub const SIMILARITY_CUTOFF: f64 = 0.8;

/// Decision for one span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionResult {
    /// Text after correction (unchanged when nothing applied)
    pub text: String,
    /// Whether the text was replaced with a different form
    pub was_corrected: bool,
}

impl CorrectionResult {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            was_corrected: false,
        }
    }

    /// Apply a dictionary value; a value equal to the input is a known-correct term
    fn replaced(original: &str, replacement: &str) -> Self {
        Self {
            text: replacement.to_string(),
            was_corrected: replacement != original,
        }
    }
}

/// Output of a batch pass
#[derive(Debug, Clone)]
pub struct CorrectionReport {
    /// Spans in input order, with corrected text
    pub spans: Vec<RecognizedSpan>,
    /// Number of spans whose text was replaced
    pub correction_count: usize,
}

/// Dictionary-backed corrector for recognized text
#[derive(Debug, Clone)]
pub struct Corrector {
    dictionary: CorrectionDictionary,
}

impl Default for Corrector {
    fn default() -> Self {
        Self::new()
    }
}

impl Corrector {
    /// Corrector with the built-in vocabulary
    pub fn new() -> Self {
        Self::with_dictionary(CorrectionDictionary::with_builtin())
    }

    /// Corrector over a caller-supplied dictionary
    pub fn with_dictionary(dictionary: CorrectionDictionary) -> Self {
        Self { dictionary }
    }

    /// Correct a single recognized text.
    ///
    /// Empty or whitespace-only text and anything at or above `threshold` is
    /// returned as is. Confidence is not clamped; NaN never clears the
    /// threshold and so counts as low confidence. The first strategy that
    /// finds an entry decides the outcome, even when the entry maps the text
    /// to itself.
    pub fn correct(&self, text: &str, confidence: f32, threshold: f32) -> CorrectionResult {
        if text.trim().is_empty() {
            return CorrectionResult::unchanged(text);
        }

        if confidence >= threshold {
            return CorrectionResult::unchanged(text);
        }

        if let Some(replacement) = self.dictionary.domain_lookup(text) {
            debug!("Domain match for '{}'", text);
            return CorrectionResult::replaced(text, replacement);
        }

        if let Some(replacement) = self.dictionary.confusion_lookup(text) {
            debug!("Confusion match for '{}'", text);
            return CorrectionResult::replaced(text, replacement);
        }

        match self.best_fuzzy_match(text) {
            Some(candidate) => {
                debug!(
                    "Fuzzy match for '{}': '{}' ({:.3})",
                    text, candidate.key, candidate.score
                );
                CorrectionResult::replaced(text, candidate.value)
            }
            None => CorrectionResult::unchanged(text),
        }
    }

    /// Correct every span, keeping order, regions and confidences
    pub fn correct_all(&self, spans: &[RecognizedSpan], threshold: f32) -> CorrectionReport {
        let mut correction_count = 0;

        let spans = spans
            .iter()
            .map(|span| {
                let result = self.correct(&span.text, span.confidence, threshold);
                if result.was_corrected {
                    correction_count += 1;
                    info!(
                        "Corrected '{}' -> '{}' (confidence: {:.2}%)",
                        span.text,
                        result.text,
                        span.confidence * 100.0
                    );
                }
                span.with_text(result.text)
            })
            .collect();

        CorrectionReport {
            spans,
            correction_count,
        }
    }

    /// Insert or overwrite a domain entry; applies to later calls only
    pub fn add_custom_word(&mut self, original: impl Into<String>, corrected: impl Into<String>) {
        self.dictionary.add_custom_word(original, corrected);
    }

    /// Current dictionary sizes
    pub fn dictionary_stats(&self) -> DictionaryStats {
        self.dictionary.stats()
    }

    /// Highest-scoring key at or above the cutoff.
    ///
    /// Equal scores resolve to the domain table first, then the smaller key.
    fn best_fuzzy_match(&self, text: &str) -> Option<FuzzyCandidate<'_>> {
        let mut best: Option<FuzzyCandidate<'_>> = None;

        for (table, key, value) in self.dictionary.candidates() {
            let score = similarity(text, key);
            if score < SIMILARITY_CUTOFF {
                continue;
            }

            let candidate = FuzzyCandidate {
                table,
                key,
                value,
                score,
            };
            best = match best {
                Some(current) if current.ranks_above(&candidate) => Some(current),
                _ => Some(candidate),
            };
        }

        best
    }
}

#[derive(Debug, Clone, Copy)]
struct FuzzyCandidate<'a> {
    table: TableKind,
    key: &'a str,
    value: &'a str,
    score: f64,
}

impl FuzzyCandidate<'_> {
    fn ranks_above(&self, other: &Self) -> bool {
        match self.score.total_cmp(&other.score) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => (self.table, self.key) < (other.table, other.key),
        }
    }
}
