//! String similarity used for fuzzy dictionary lookups

use strsim::normalized_levenshtein;
use unicode_normalization::UnicodeNormalization;

/// Similarity in [0, 1] between two tokens.
///
/// Both sides are compared in canonical decomposition (NFD), so a Hangul
/// syllable counts as its two or three jamo. A single misread final consonant
/// then costs one edit out of the whole jamo sequence instead of a whole
/// syllable. Case and whitespace are significant.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: String = a.nfd().collect();
    let b: String = b.nfd().collect();
    normalized_levenshtein(&a, &b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert!((similarity("설정", "설정") - 1.0).abs() < 1e-9);
        assert!((similarity("Profile", "Profile") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_jamo_substitution() {
        // ㅅㅓㄴㅈㅓㅇ vs ㅅㅓㄹㅈㅓㅇ: one edit over six jamo
        let score = similarity("선정", "설정");
        assert!((score - 5.0 / 6.0).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_unrelated_short_words() {
        assert!(similarity("화면", "밝기") < 0.5);
        assert!(similarity("ON", "OFF") < 0.8);
    }

    #[test]
    fn test_case_sensitive() {
        assert!(similarity("off", "OFF") < 0.5);
    }

    #[test]
    fn test_latin_single_deletion() {
        // One deletion out of seven characters
        let score = similarity("Profle", "Profile");
        assert!((score - 6.0 / 7.0).abs() < 1e-9, "got {}", score);
    }
}
