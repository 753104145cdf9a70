//! Correction tables for OCR output
//!
//! Two provenance classes are kept apart: the domain vocabulary (vehicle UI
//! terms and their known misreadings) and generic Hangul OCR confusions.
//! Exact lookups consult the domain table first.

use serde::Serialize;
use std::collections::HashMap;

/// Built-in domain vocabulary: misrecognized form -> canonical form.
/// Self-mapped entries mark known-correct terms.
const VEHICLE_TERMS: &[(&str, &str)] = &[
    // General UI
    ("내비게이선", "내비게이션"),
    ("내비게이쎤", "내비게이션"),
    ("내비게이이선", "내비게이션"),
    ("블루림크", "블루링크"),
    ("불루림크", "블루링크"),
    ("끌루림크", "블루링크"),
    ("붙무림크", "블루링크"),
    ("중림", "중립"),
    ("끊어칭", "끊어져"),
    ("끊어적", "끊어져"),
    ("비닐번호", "비밀번호"),
    ("비닐번호름", "비밀번호를"),
    ("비닐번호지", "비밀번호를"),
    // Vehicle
    ("공조", "공조"),
    ("라이트", "라이트"),
    ("라미트", "라이트"),
    ("시트", "시트"),
    ("도어", "도어"),
    ("창문", "창문"),
    ("잠금", "잠금"),
    ("주차", "주차"),
    ("운전자", "운전자"),
    ("보조", "보조"),
    // Settings
    ("일반", "일반"),
    ("설정", "설정"),
    ("선정", "설정"),
    ("화면", "화면"),
    ("사운드", "사운드"),
    ("사운트", "사운드"),
    ("밝기", "밝기"),
    ("연결", "연결"),
    ("편의", "편의"),
    ("정보", "정보"),
    // Latin
    ("업", "앱"),
    ("Profile", "Profile"),
    ("OFF", "OFF"),
    ("ON", "ON"),
];

/// Built-in generic confusions
const COMMON_CONFUSIONS: &[(&str, &str)] = &[
    ("잠킴", "잠김"),
    ("해재", "해제"),
    ("해체", "해제"),
    ("초기와", "초기화"),
    ("확인한", "확인한"),
];

/// Which table an entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TableKind {
    /// Domain vocabulary
    Domain,
    /// Common confusions
    Confusion,
}

/// Table sizes at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DictionaryStats {
    pub domain_terms: usize,
    pub confusion_terms: usize,
    pub total: usize,
}

/// Owned pair of correction tables
#[derive(Debug, Clone, Default)]
pub struct CorrectionDictionary {
    domain: HashMap<String, String>,
    confusions: HashMap<String, String>,
}

impl CorrectionDictionary {
    /// Dictionary seeded with the built-in vehicle vocabulary and confusions
    pub fn with_builtin() -> Self {
        Self::from_pairs(VEHICLE_TERMS, COMMON_CONFUSIONS)
    }

    /// Build a dictionary from explicit domain and confusion pairs
    pub fn from_pairs(domain: &[(&str, &str)], confusions: &[(&str, &str)]) -> Self {
        Self {
            domain: to_map(domain),
            confusions: to_map(confusions),
        }
    }

    /// Exact lookup in the domain table
    pub fn domain_lookup(&self, text: &str) -> Option<&str> {
        self.domain.get(text).map(String::as_str)
    }

    /// Exact lookup in the confusion table
    pub fn confusion_lookup(&self, text: &str) -> Option<&str> {
        self.confusions.get(text).map(String::as_str)
    }

    /// Every key of both tables with the value it maps to.
    ///
    /// A key present in both tables is yielded once, with the confusion value.
    pub fn candidates(&self) -> impl Iterator<Item = (TableKind, &str, &str)> + '_ {
        let domain = self
            .domain
            .iter()
            .filter(|(key, _)| !self.confusions.contains_key(key.as_str()))
            .map(|(k, v)| (TableKind::Domain, k.as_str(), v.as_str()));
        let confusions = self
            .confusions
            .iter()
            .map(|(k, v)| (TableKind::Confusion, k.as_str(), v.as_str()));
        domain.chain(confusions)
    }

    /// Insert or overwrite a domain entry
    pub fn add_custom_word(&mut self, original: impl Into<String>, corrected: impl Into<String>) {
        self.domain.insert(original.into(), corrected.into());
    }

    /// Current table sizes
    pub fn stats(&self) -> DictionaryStats {
        DictionaryStats {
            domain_terms: self.domain.len(),
            confusion_terms: self.confusions.len(),
            total: self.domain.len() + self.confusions.len(),
        }
    }
}

fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_stats() {
        let dict = CorrectionDictionary::with_builtin();
        let stats = dict.stats();
        assert_eq!(stats.domain_terms, VEHICLE_TERMS.len());
        assert_eq!(stats.confusion_terms, COMMON_CONFUSIONS.len());
        assert_eq!(stats.total, stats.domain_terms + stats.confusion_terms);
    }

    #[test]
    fn test_builtin_has_no_duplicate_keys() {
        let dict = CorrectionDictionary::with_builtin();
        assert_eq!(dict.stats().domain_terms, 37);
        assert_eq!(dict.stats().confusion_terms, 5);
    }

    #[test]
    fn test_lookups_are_separate() {
        let dict = CorrectionDictionary::with_builtin();
        assert_eq!(dict.domain_lookup("내비게이선"), Some("내비게이션"));
        assert_eq!(dict.domain_lookup("잠킴"), None);
        assert_eq!(dict.confusion_lookup("잠킴"), Some("잠김"));
        assert_eq!(dict.confusion_lookup("내비게이선"), None);
    }

    #[test]
    fn test_keys_are_exact() {
        let dict = CorrectionDictionary::with_builtin();
        assert_eq!(dict.domain_lookup("off"), None);
        assert_eq!(dict.domain_lookup(" OFF"), None);
        assert_eq!(dict.domain_lookup("OFF"), Some("OFF"));
    }

    #[test]
    fn test_add_custom_word_inserts_and_overwrites() {
        let mut dict = CorrectionDictionary::with_builtin();
        let before = dict.stats().domain_terms;

        dict.add_custom_word("끌람", "클램");
        assert_eq!(dict.domain_lookup("끌람"), Some("클램"));
        assert_eq!(dict.stats().domain_terms, before + 1);

        dict.add_custom_word("업", "업");
        assert_eq!(dict.domain_lookup("업"), Some("업"));
        assert_eq!(dict.stats().domain_terms, before + 1);
    }

    #[test]
    fn test_candidates_prefer_confusion_value_on_shared_key() {
        let dict = CorrectionDictionary::from_pairs(&[("abc", "domain")], &[("abc", "confusion")]);
        let candidates: Vec<_> = dict.candidates().collect();
        assert_eq!(candidates, vec![(TableKind::Confusion, "abc", "confusion")]);
    }

    #[test]
    fn test_empty_dictionary() {
        let dict = CorrectionDictionary::default();
        assert_eq!(dict.candidates().count(), 0);
        assert_eq!(dict.stats().total, 0);
    }
}
