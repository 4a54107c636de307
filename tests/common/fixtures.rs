#![allow(dead_code)]

use changemark::{ChangeConfig, ChangeDetector};
use image::{GrayImage, Luma, Rgb, RgbImage};
use std::path::{Path, PathBuf};

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const GRAY: Rgb<u8> = Rgb([128, 128, 128]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

/// Solid colour image
pub fn solid(width: u32, height: u32, color: Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(width, height, color)
}

/// Copy of `img` with a filled square painted at (x, y)
pub fn with_square(img: &RgbImage, x: u32, y: u32, size: u32, color: Rgb<u8>) -> RgbImage {
    let mut out = img.clone();
    for yy in y..y + size {
        for xx in x..x + size {
            out.put_pixel(xx, yy, color);
        }
    }
    out
}

/// Deterministic textured image (diagonal gradient plus a checker pattern)
pub fn textured(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let base = ((x * 3 + y * 2) % 200) as u8;
        let checker = if (x / 4 + y / 4) % 2 == 0 { 40 } else { 0 };
        let v = base.saturating_add(checker);
        Rgb([v, v / 2, 255 - v])
    })
}

/// Empty binary mask
pub fn blank_mask(width: u32, height: u32) -> GrayImage {
    GrayImage::new(width, height)
}

/// Fill a rectangle of a mask with foreground
pub fn fill_mask(mask: &mut GrayImage, x: u32, y: u32, width: u32, height: u32) {
    for yy in y..y + height {
        for xx in x..x + width {
            mask.put_pixel(xx, yy, Luma([255]));
        }
    }
}

/// Clear a rectangle of a mask back to background
pub fn clear_mask(mask: &mut GrayImage, x: u32, y: u32, width: u32, height: u32) {
    for yy in y..y + height {
        for xx in x..x + width {
            mask.put_pixel(xx, yy, Luma([0]));
        }
    }
}

/// Pair of 100x100 black images, the after one holding a 20x20 white square at (40, 40)
pub fn square_on_black_pair() -> ImagePairParts {
    let before = solid(100, 100, BLACK);
    let after = with_square(&before, 40, 40, 20, WHITE);
    ImagePairParts { before, after }
}

pub struct ImagePairParts {
    pub before: RgbImage,
    pub after: RgbImage,
}

/// Save an image into `dir` and return its path
pub fn write_image(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save(&path).expect("Failed to save test image");
    path
}

/// Detector with default configuration
pub fn default_detector() -> ChangeDetector {
    ChangeDetector::new(ChangeConfig::default()).expect("Default config must be valid")
}
