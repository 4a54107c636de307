use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;

use crate::config::ChangeConfig;

pub const CHANGED: u8 = 255;
pub const UNCHANGED: u8 = 0;

/// Binary mask produced by thresholding a dissimilarity map
#[derive(Debug, Clone)]
pub struct ThresholdedMask {
    pub mask: GrayImage,
    /// Otsu level; pixels strictly above it are marked as changed
    pub level: u8,
    /// The map held a single value, so no split was possible
    pub degenerate: bool,
}

/// Split a dissimilarity map into changed / unchanged with Otsu's method.
///
/// High dissimilarity becomes foreground. A constant map yields an
/// all-background mask.
pub fn otsu_threshold(dissimilarity: &GrayImage) -> ThresholdedMask {
    let (width, height) = dissimilarity.dimensions();

    if is_constant(dissimilarity) {
        return ThresholdedMask {
            mask: GrayImage::from_pixel(width, height, Luma([UNCHANGED])),
            level: dissimilarity.get_pixel_checked(0, 0).map_or(0, |p| p[0]),
            degenerate: true,
        };
    }

    let level = otsu_level(dissimilarity);
    let mut mask = GrayImage::new(width, height);
    for (src, dst) in dissimilarity.pixels().zip(mask.pixels_mut()) {
        *dst = if src[0] > level {
            Luma([CHANGED])
        } else {
            Luma([UNCHANGED])
        };
    }

    ThresholdedMask {
        mask,
        level,
        degenerate: false,
    }
}

/// Grow foreground with a square `kernel_size` neighbourhood, `iterations` times
pub fn dilate_mask(mask: &GrayImage, kernel_size: u32, iterations: u32) -> GrayImage {
    let radius = (kernel_size / 2).min(u8::MAX as u32) as u8;

    let mut grown = mask.clone();
    if radius == 0 {
        return grown;
    }
    for _ in 0..iterations {
        grown = dilate(&grown, Norm::LInf, radius);
    }
    grown
}

/// Threshold then consolidate, returning the final mask.
/// The pre-dilation mask is released before returning.
pub fn build_change_mask(dissimilarity: &GrayImage, config: &ChangeConfig) -> ThresholdedMask {
    let thresholded = otsu_threshold(dissimilarity);
    if thresholded.degenerate {
        return thresholded;
    }

    let dilated = dilate_mask(
        &thresholded.mask,
        config.dilation_kernel_size,
        config.dilation_iterations,
    );

    ThresholdedMask {
        mask: dilated,
        ..thresholded
    }
}

/// Count of foreground pixels
pub fn changed_pixels(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] != UNCHANGED).count()
}

fn is_constant(img: &GrayImage) -> bool {
    let raw = img.as_raw();
    match raw.first() {
        Some(&first) => raw.iter().all(|&v| v == first),
        None => true,
    }
}
