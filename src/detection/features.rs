use image::{imageops::FilterType, DynamicImage, RgbImage};

use crate::error::ClassifierError;

/// Side length of the square canvas every image is resized to.
pub const CANVAS_SIZE: u32 = 224;

/// Mean channel intensities over one quadrant of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionFeature {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// Converts to RGB and stretches to `CANVAS_SIZE` x `CANVAS_SIZE`, ignoring
/// the source aspect ratio.
pub fn normalize(image: &DynamicImage) -> Result<RgbImage, ClassifierError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(ClassifierError::EmptyImage(width, height));
    }

    let rgb = image.to_rgb8();
    Ok(image::imageops::resize(
        &rgb,
        CANVAS_SIZE,
        CANVAS_SIZE,
        FilterType::CatmullRom,
    ))
}

/// Quadrant means in top-left, top-right, bottom-left, bottom-right order.
pub fn quadrant_features(image: &RgbImage) -> [RegionFeature; 4] {
    let (width, height) = image.dimensions();
    let (mid_x, mid_y) = (width / 2, height / 2);

    [
        region_mean(image, 0, 0, mid_x, mid_y),
        region_mean(image, mid_x, 0, width, mid_y),
        region_mean(image, 0, mid_y, mid_x, height),
        region_mean(image, mid_x, mid_y, width, height),
    ]
}

fn region_mean(image: &RgbImage, x0: u32, y0: u32, x1: u32, y1: u32) -> RegionFeature {
    let mut sums = [0u64; 3];
    for y in y0..y1 {
        for x in x0..x1 {
            let p = image.get_pixel(x, y);
            sums[0] += p[0] as u64;
            sums[1] += p[1] as u64;
            sums[2] += p[2] as u64;
        }
    }

    let count = ((x1 - x0) as u64 * (y1 - y0) as u64).max(1) as f64;
    RegionFeature {
        red: sums[0] as f64 / count,
        green: sums[1] as f64 / count,
        blue: sums[2] as f64 / count,
    }
}

/// Sum of the population standard deviations of the three channels over the
/// whole image.
pub fn texture_score(image: &RgbImage) -> f64 {
    // One-pass mean/variance per channel (Welford)
    let mut n = 0f64;
    let mut mean = [0f64; 3];
    let mut m2 = [0f64; 3];

    for p in image.pixels() {
        n += 1.0;
        for c in 0..3 {
            let v = p[c] as f64;
            let delta = v - mean[c];
            mean[c] += delta / n;
            m2[c] += delta * (v - mean[c]);
        }
    }

    if n == 0.0 {
        return 0.0;
    }

    m2.iter().map(|m| (m / n).sqrt()).sum()
}
