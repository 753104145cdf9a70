//! Vision/OCR Layer
//!
//! Image preparation and text recognition on captured screenshots.
//! Recognition itself is delegated to an external engine:
//! - An EasyOCR-style command printing JSON results on stdout
//! - A precomputed JSON results file

pub mod ocr;
pub mod preprocess;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use ocr::{CommandOcr, JsonFileOcr, OcrEngine};
pub use preprocess::{process_image, ProcessSettings};

/// A 2D point in image coordinates
pub type Point = (f32, f32);

/// Quadrilateral text region (top-left, top-right, bottom-right, bottom-left)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    /// Build an axis-aligned quad from a bounding box (x, y, width, height)
    #[cfg(test)]
    pub fn from_bounds(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self([
            (x, y),
            (x + width, y),
            (x + width, y + height),
            (x, y + height),
        ])
    }

    /// Corner points in drawing order
    pub fn points(&self) -> &[Point; 4] {
        &self.0
    }

    /// Axis-aligned bounding box (x, y, width, height)
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        polygon_to_bounds(&self.0)
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (x, y)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{}, {}]", x, y)?;
        }
        write!(f, "]")
    }
}

/// One OCR-detected text region
///
/// Serialized in the EasyOCR tuple shape `[[[x, y] x4], "text", confidence]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SpanTuple", into = "SpanTuple")]
pub struct RecognizedSpan {
    /// Bounding quadrilateral
    pub region: Quad,
    /// Recognized text content
    pub text: String,
    /// Recognition confidence (0.0 - 1.0)
    pub confidence: f32,
}

type SpanTuple = (Quad, String, f32);

impl From<SpanTuple> for RecognizedSpan {
    fn from((region, text, confidence): SpanTuple) -> Self {
        Self::new(region, text, confidence)
    }
}

impl From<RecognizedSpan> for SpanTuple {
    fn from(span: RecognizedSpan) -> Self {
        (span.region, span.text, span.confidence)
    }
}

impl RecognizedSpan {
    pub fn new(region: Quad, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            region,
            text: text.into(),
            confidence,
        }
    }

    /// Same region and confidence, different text
    pub fn with_text(&self, text: String) -> Self {
        Self {
            region: self.region,
            text,
            confidence: self.confidence,
        }
    }
}

/// Convert polygon points to bounding box
fn polygon_to_bounds(polygon: &[Point]) -> (u32, u32, u32, u32) {
    if polygon.is_empty() {
        return (0, 0, 0, 0);
    }

    let min_x = polygon.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
    let min_y = polygon.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
    let max_x = polygon.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
    let max_y = polygon.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);

    (
        min_x.max(0.0) as u32,
        min_y.max(0.0) as u32,
        (max_x - min_x) as u32,
        (max_y - min_y) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_to_bounds() {
        let quad = Quad([(10.0, 20.0), (50.0, 22.0), (52.0, 40.0), (8.0, 38.0)]);
        assert_eq!(quad.bounds(), (8, 20, 44, 20));
        assert_eq!(polygon_to_bounds(&[]), (0, 0, 0, 0));
    }

    #[test]
    fn test_quad_from_bounds() {
        let quad = Quad::from_bounds(1.0, 2.0, 10.0, 5.0);
        assert_eq!(quad.points()[0], (1.0, 2.0));
        assert_eq!(quad.points()[2], (11.0, 7.0));
    }

    #[test]
    fn test_quad_display() {
        let quad = Quad::from_bounds(0.0, 0.0, 4.0, 2.5);
        assert_eq!(quad.to_string(), "[[0, 0], [4, 0], [4, 2.5], [0, 2.5]]");
    }

    #[test]
    fn test_span_json_tuple_shape() {
        let json = r#"[[[1, 2], [30, 2], [30, 12], [1, 12]], "설정", 0.42]"#;
        let span: RecognizedSpan = serde_json::from_str(json).unwrap();
        assert_eq!(span.text, "설정");
        assert_eq!(span.region.points()[0], (1.0, 2.0));
        assert!((span.confidence - 0.42).abs() < 1e-6);

        let value = serde_json::to_value(&span).unwrap();
        assert!(value.is_array());
        assert_eq!(value[1], "설정");
    }

    #[test]
    fn test_with_text_keeps_region_and_confidence() {
        let span = RecognizedSpan::new(Quad::from_bounds(0.0, 0.0, 1.0, 1.0), "선정", 0.4);
        let updated = span.with_text("설정".to_string());
        assert_eq!(updated.region, span.region);
        assert_eq!(updated.confidence, span.confidence);
        assert_eq!(updated.text, "설정");
    }
}
