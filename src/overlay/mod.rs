//! Overlay Presentation Layer
//!
//! Draws recognized regions on top of the processed screenshot. Each
//! quadrilateral is outlined in its confidence band color, with a small bar
//! above it whose length shows the confidence.

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::vision::{Point, RecognizedSpan};

/// Recognition quality band, derived from the original OCR confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    /// confidence > 0.8
    High,
    /// 0.6 < confidence <= 0.8
    Medium,
    /// confidence <= 0.6
    Low,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence > 0.8 {
            ConfidenceBand::High
        } else if confidence > 0.6 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    /// Outline color for this band
    pub fn color(&self) -> Rgba<u8> {
        match self {
            ConfidenceBand::High => Rgba([0, 255, 0, 255]),
            ConfidenceBand::Medium => Rgba([255, 165, 0, 255]),
            ConfidenceBand::Low => Rgba([255, 0, 0, 255]),
        }
    }
}

/// Drawing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Outline thickness in pixels
    pub line_width: u32,
    /// Height of the confidence bar
    pub marker_height: u32,
    /// Length of the bar at confidence 1.0
    pub marker_width: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            line_width: 3,
            marker_height: 6,
            marker_width: 40,
        }
    }
}

/// Draw every span onto a copy of `image`
pub fn draw_ocr_results(
    image: &DynamicImage,
    spans: &[RecognizedSpan],
    style: &OverlayStyle,
) -> RgbaImage {
    info!("Drawing OCR results on image...");

    let mut canvas = image.to_rgba8();
    for span in spans {
        let color = ConfidenceBand::from_confidence(span.confidence).color();
        draw_outline(&mut canvas, span.region.points(), color, style.line_width);
        draw_confidence_marker(&mut canvas, span.region.bounds(), span.confidence, color, style);
    }

    info!("Drew {} text regions", spans.len());
    canvas
}

/// Closed polygon outline, thickened by drawing offset copies
fn draw_outline(canvas: &mut RgbaImage, points: &[Point; 4], color: Rgba<u8>, line_width: u32) {
    let half = (line_width.max(1) as i32 - 1) / 2;
    for offset in -half..=(line_width.max(1) as i32 - 1 - half) {
        let d = offset as f32;
        for i in 0..points.len() {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % points.len()];
            draw_line_segment_mut(canvas, (x0 + d, y0 + d), (x1 + d, y1 + d), color);
        }
    }
}

/// Bar just above the region's bounding box
fn draw_confidence_marker(
    canvas: &mut RgbaImage,
    (x, y, _, _): (u32, u32, u32, u32),
    confidence: f32,
    color: Rgba<u8>,
    style: &OverlayStyle,
) {
    let length = (style.marker_width as f32 * confidence.clamp(0.0, 1.0)).round() as u32;
    if length == 0 || style.marker_height == 0 {
        return;
    }

    let top = y as i32 - style.marker_height as i32 - 2;
    let rect = Rect::at(x as i32, top.max(0)).of_size(length, style.marker_height);
    draw_filled_rect_mut(canvas, rect, color);
}
