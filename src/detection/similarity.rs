//! Windowed structural similarity (SSIM) between two grayscale images.
//!
//! For every pixel the means, variances and covariance of both images are
//! taken over a square window centred on it and combined into the usual
//! SSIM ratio. The overall score is the mean of that map over the interior
//! of the image (a border of half a window is left out, since those windows
//! are partly made of reflected pixels).

use image::{GrayImage, Luma};

use crate::error::{ChangeError, Result};

const K1: f64 = 0.01;
const K2: f64 = 0.03;
const DATA_RANGE: f64 = 255.0;

/// Output of the similarity mapper
#[derive(Debug, Clone)]
pub struct SimilarityMap {
    /// Mean SSIM, 1.0 for identical images
    pub score: f64,
    /// Per-pixel dissimilarity, 0 = identical, 255 = nothing in common
    pub dissimilarity: GrayImage,
}

/// Compute the SSIM score and dissimilarity map of two equally sized images
pub fn structural_similarity(
    before: &GrayImage,
    after: &GrayImage,
    window: u32,
) -> Result<SimilarityMap> {
    if before.dimensions() != after.dimensions() {
        return Err(ChangeError::DimensionMismatch {
            before_width: before.width(),
            before_height: before.height(),
            after_width: after.width(),
            after_height: after.height(),
        });
    }

    let (width, height) = before.dimensions();
    if width < window || height < window {
        return Err(ChangeError::ImageTooSmall {
            width,
            height,
            window,
        });
    }

    let w = width as usize;
    let h = height as usize;
    let win = window as usize;

    let x: Vec<f64> = before.as_raw().iter().map(|&v| v as f64).collect();
    let y: Vec<f64> = after.as_raw().iter().map(|&v| v as f64).collect();
    let xx: Vec<f64> = x.iter().map(|v| v * v).collect();
    let yy: Vec<f64> = y.iter().map(|v| v * v).collect();
    let xy: Vec<f64> = x.iter().zip(&y).map(|(a, b)| a * b).collect();

    let ux = box_mean(&x, w, h, win);
    let uy = box_mean(&y, w, h, win);
    let uxx = box_mean(&xx, w, h, win);
    let uyy = box_mean(&yy, w, h, win);
    let uxy = box_mean(&xy, w, h, win);

    // Unbiased (sample) variance over the window
    let np = (win * win) as f64;
    let cov_norm = np / (np - 1.0);
    let c1 = (K1 * DATA_RANGE).powi(2);
    let c2 = (K2 * DATA_RANGE).powi(2);

    let ssim: Vec<f64> = (0..w * h)
        .map(|i| {
            let vx = cov_norm * (uxx[i] - ux[i] * ux[i]);
            let vy = cov_norm * (uyy[i] - uy[i] * uy[i]);
            let vxy = cov_norm * (uxy[i] - ux[i] * uy[i]);

            let a1 = 2.0 * ux[i] * uy[i] + c1;
            let a2 = 2.0 * vxy + c2;
            let b1 = ux[i] * ux[i] + uy[i] * uy[i] + c1;
            let b2 = vx + vy + c2;

            (a1 * a2) / (b1 * b2)
        })
        .collect();

    let pad = win / 2;
    let mut sum = 0.0;
    let mut count = 0usize;
    for row in pad..h - pad {
        for col in pad..w - pad {
            sum += ssim[row * w + col];
            count += 1;
        }
    }
    let score = sum / count as f64;

    let dissimilarity = GrayImage::from_fn(width, height, |col, row| {
        let s = ssim[row as usize * w + col as usize];
        Luma([to_dissimilarity_level(s)])
    });

    Ok(SimilarityMap {
        score,
        dissimilarity,
    })
}

/// Map an SSIM value onto the 8-bit dissimilarity scale.
/// Negative similarity (anti-correlated structure) saturates at 255.
fn to_dissimilarity_level(s: f64) -> u8 {
    ((1.0 - s).clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Mean over a `win`x`win` window centred on every pixel.
/// Pixels beyond the border are mirrored (`d c b a | a b c d`).
fn box_mean(data: &[f64], width: usize, height: usize, win: usize) -> Vec<f64> {
    let half = (win / 2) as isize;
    let norm = 1.0 / win as f64;

    let mut horizontal = vec![0.0; data.len()];
    for row in 0..height {
        let line = &data[row * width..(row + 1) * width];
        for col in 0..width {
            let mut acc = 0.0;
            for offset in -half..=half {
                acc += line[reflect(col as isize + offset, width)];
            }
            horizontal[row * width + col] = acc * norm;
        }
    }

    let mut out = vec![0.0; data.len()];
    for row in 0..height {
        for col in 0..width {
            let mut acc = 0.0;
            for offset in -half..=half {
                acc += horizontal[reflect(row as isize + offset, height) * width + col];
            }
            out[row * width + col] = acc * norm;
        }
    }

    out
}

fn reflect(i: isize, len: usize) -> usize {
    let n = len as isize;
    let mut i = i;
    // Windows never exceed the image, so at most one bounce per side
    if i < 0 {
        i = -i - 1;
    }
    if i >= n {
        i = 2 * n - i - 1;
    }
    i as usize
}
