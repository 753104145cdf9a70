//! Image preparation before OCR
//!
//! Crops the left edge of the screenshot (the side panel is never read),
//! scales the remainder and optionally boosts contrast and sharpness.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};
use imageproc::filter::filter3x3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Contrast boost applied by the enhancement pass (+30%)
const CONTRAST_PERCENT: f32 = 30.0;
/// Unsharp mask blur radius
const UNSHARP_SIGMA: f32 = 1.0;
/// Unsharp mask difference threshold
const UNSHARP_THRESHOLD: i32 = 3;
/// Sharpness x1.5: `1.5 * image - 0.5 * smooth(image)`, where smooth is the
/// 3x3 kernel [1 1 1; 1 5 1; 1 1 1] / 13
#[rustfmt::skip]
const SHARPEN_KERNEL: [f32; 9] = [
    -0.5 / 13.0, -0.5 / 13.0, -0.5 / 13.0,
    -0.5 / 13.0, 17.0 / 13.0, -0.5 / 13.0,
    -0.5 / 13.0, -0.5 / 13.0, -0.5 / 13.0,
];

/// Geometry and enhancement settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessSettings {
    /// Pixels removed from the left edge
    pub crop_left: u32,
    /// Scaling factor applied after cropping
    pub scale_factor: f32,
    /// Apply contrast and sharpening
    pub enhance: bool,
}

impl Default for ProcessSettings {
    fn default() -> Self {
        Self {
            crop_left: 850,
            scale_factor: 0.6,
            enhance: false,
        }
    }
}

/// Crop, scale and optionally enhance an image
pub fn process_image(image: &DynamicImage, settings: &ProcessSettings) -> DynamicImage {
    info!(
        "Processing image: crop_left={}px, scale={}x",
        settings.crop_left, settings.scale_factor
    );

    let (width, height) = image.dimensions();
    debug!("Original size: {}x{}", width, height);

    // Never crop the whole image away
    let crop_left = settings.crop_left.min(width.saturating_sub(1));
    let cropped = image.crop_imm(crop_left, 0, width - crop_left, height);
    debug!("After crop: {}x{}", cropped.width(), cropped.height());

    let scaled = scale(&cropped, settings.scale_factor);
    debug!("After scaling: {}x{}", scaled.width(), scaled.height());

    if settings.enhance {
        debug!("Applying enhancements");
        enhance(&scaled)
    } else {
        scaled
    }
}

fn scale(image: &DynamicImage, factor: f32) -> DynamicImage {
    if !(factor > 0.0) || (factor - 1.0).abs() < f32::EPSILON {
        return image.clone();
    }

    let new_width = ((image.width() as f32 * factor) as u32).max(1);
    let new_height = ((image.height() as f32 * factor) as u32).max(1);
    image.resize_exact(new_width, new_height, FilterType::Lanczos3)
}

fn enhance(image: &DynamicImage) -> DynamicImage {
    let rgba = image.to_rgba8();
    let contrasted = imageops::contrast(&rgba, CONTRAST_PERCENT);
    let sharpened = sharpen(&contrasted);
    let masked = imageops::unsharpen(&sharpened, UNSHARP_SIGMA, UNSHARP_THRESHOLD);
    DynamicImage::ImageRgba8(masked)
}

fn sharpen(image: &RgbaImage) -> RgbaImage {
    let mut sharpened: RgbaImage = filter3x3::<_, f32, u8>(image, &SHARPEN_KERNEL);
    // Keep transparency as is
    for (out, source) in sharpened.pixels_mut().zip(image.pixels()) {
        out[3] = source[3];
    }
    sharpened
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        }))
    }

    #[test]
    fn test_crop_and_scale() {
        let settings = ProcessSettings {
            crop_left: 100,
            scale_factor: 0.5,
            enhance: false,
        };
        let processed = process_image(&test_image(300, 200), &settings);
        assert_eq!(processed.dimensions(), (100, 100));
    }

    #[test]
    fn test_crop_larger_than_image() {
        let settings = ProcessSettings {
            crop_left: 5000,
            scale_factor: 1.0,
            enhance: false,
        };
        let processed = process_image(&test_image(40, 20), &settings);
        assert_eq!(processed.dimensions(), (1, 20));
    }

    #[test]
    fn test_invalid_scale_is_ignored() {
        let settings = ProcessSettings {
            crop_left: 0,
            scale_factor: 0.0,
            enhance: false,
        };
        let processed = process_image(&test_image(40, 20), &settings);
        assert_eq!(processed.dimensions(), (40, 20));
    }

    #[test]
    fn test_enhance_keeps_dimensions() {
        let settings = ProcessSettings {
            crop_left: 10,
            scale_factor: 1.0,
            enhance: true,
        };
        let processed = process_image(&test_image(50, 30), &settings);
        assert_eq!(processed.dimensions(), (40, 30));
    }

    #[test]
    fn test_sharpen_boosts_local_contrast() {
        let mut image = RgbaImage::from_pixel(5, 5, Rgba([100, 100, 100, 255]));
        image.put_pixel(2, 2, Rgba([200, 200, 200, 255]));

        let sharpened = sharpen(&image);
        // Bright pixel gets brighter, its neighbours darker, flat areas stay put
        assert!(sharpened.get_pixel(2, 2)[0] > 200);
        assert!(sharpened.get_pixel(2, 1)[0] < 100);
        assert_eq!(sharpened.get_pixel(2, 2)[3], 255);
        let corner = sharpened.get_pixel(0, 0)[0];
        assert!((99..=101).contains(&corner));
    }

    #[test]
    fn test_default_settings() {
        let settings = ProcessSettings::default();
        assert_eq!(settings.crop_left, 850);
        assert!((settings.scale_factor - 0.6).abs() < 0.001);
        assert!(!settings.enhance);
    }
}
