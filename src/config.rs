use image::Rgb;

use crate::error::{ChangeError, Result};

pub const DEFAULT_MIN_REGION_AREA: u32 = 30;
pub const DEFAULT_DILATION_KERNEL_SIZE: u32 = 5;
pub const DEFAULT_DILATION_ITERATIONS: u32 = 3;
pub const DEFAULT_BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const DEFAULT_BOX_THICKNESS: u32 = 2;
pub const DEFAULT_SIMILARITY_WINDOW: u32 = 7;

/// Tunables for the change-detection pipeline.
///
/// Passed by value into [`crate::ChangeDetector`]; shared read-only between
/// pairs when the orchestrator runs them in parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeConfig {
    /// Regions whose contour area is at or below this are dropped.
    pub minimum_region_area: u32,
    /// Side of the square dilation neighbourhood. Must be odd.
    pub dilation_kernel_size: u32,
    pub dilation_iterations: u32,
    pub box_color: Rgb<u8>,
    pub box_thickness: u32,
    /// Side of the square SSIM window. Must be odd and at least 3.
    pub similarity_window: u32,
}

impl ChangeConfig {
    pub fn new() -> Self {
        Self {
            minimum_region_area: DEFAULT_MIN_REGION_AREA,
            dilation_kernel_size: DEFAULT_DILATION_KERNEL_SIZE,
            dilation_iterations: DEFAULT_DILATION_ITERATIONS,
            box_color: DEFAULT_BOX_COLOR,
            box_thickness: DEFAULT_BOX_THICKNESS,
            similarity_window: DEFAULT_SIMILARITY_WINDOW,
        }
    }

    pub fn with_minimum_region_area(mut self, area: u32) -> Self {
        self.minimum_region_area = area;
        self
    }

    pub fn with_dilation(mut self, kernel_size: u32, iterations: u32) -> Self {
        self.dilation_kernel_size = kernel_size;
        self.dilation_iterations = iterations;
        self
    }

    pub fn with_box_color(mut self, color: Rgb<u8>) -> Self {
        self.box_color = color;
        self
    }

    pub fn with_box_thickness(mut self, thickness: u32) -> Self {
        self.box_thickness = thickness;
        self
    }

    pub fn with_similarity_window(mut self, window: u32) -> Self {
        self.similarity_window = window;
        self
    }

    /// Radius of the dilation neighbourhood in the L-infinity norm.
    pub fn dilation_radius(&self) -> u32 {
        self.dilation_kernel_size / 2
    }

    pub fn validate(&self) -> Result<()> {
        if self.dilation_kernel_size == 0 || self.dilation_kernel_size % 2 == 0 {
            return Err(ChangeError::InvalidConfig(format!(
                "dilation kernel size must be a positive odd number, got {}",
                self.dilation_kernel_size
            )));
        }
        if self.dilation_radius() > u8::MAX as u32 {
            return Err(ChangeError::InvalidConfig(format!(
                "dilation kernel size {} is too large",
                self.dilation_kernel_size
            )));
        }
        if self.box_thickness == 0 {
            return Err(ChangeError::InvalidConfig(
                "box thickness must be at least 1".to_string(),
            ));
        }
        if self.similarity_window < 3 || self.similarity_window % 2 == 0 {
            return Err(ChangeError::InvalidConfig(format!(
                "similarity window must be an odd number >= 3, got {}",
                self.similarity_window
            )));
        }
        Ok(())
    }
}

impl Default for ChangeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a box colour given as `#rrggbb`, `rrggbb` or `r,g,b`.
pub fn parse_color(s: &str) -> std::result::Result<Rgb<u8>, String> {
    let s = s.trim();

    if s.contains(',') {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(format!("expected three components in '{}'", s));
        }
        let mut rgb = [0u8; 3];
        for (slot, part) in rgb.iter_mut().zip(&parts) {
            *slot = part
                .parse::<u8>()
                .map_err(|e| format!("invalid colour component '{}': {}", part, e))?;
        }
        return Ok(Rgb(rgb));
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(format!("expected #rrggbb, got '{}'", s));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|e| format!("invalid hex colour '{}': {}", s, e))
    };
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}
