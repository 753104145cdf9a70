//! Text Correction Layer
//!
//! Repairs low-confidence OCR output using a curated vehicle UI vocabulary,
//! a table of common Hangul misreadings and a fuzzy fallback.

pub mod corrector;
pub mod dictionary;
pub mod similarity;

pub use corrector::{Corrector, DEFAULT_CONFIDENCE_THRESHOLD};
