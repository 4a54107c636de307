use image::{ImageReader, RgbImage};
use std::path::Path;

use crate::error::{ChangeError, Result};

/// Axis-aligned bounding box in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Build from inclusive min/max corners
    pub fn from_corners(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        }
    }

    /// Last column covered by the box (inclusive)
    pub fn max_x(&self) -> u32 {
        self.x + self.width - 1
    }

    /// Last row covered by the box (inclusive)
    pub fn max_y(&self) -> u32 {
        self.y + self.height - 1
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x <= self.max_x() && y >= self.y && y <= self.max_y()
    }

    /// Whether `other` lies completely inside this box
    pub fn encloses(&self, other: &BoundingBox) -> bool {
        self.contains(other.x, other.y) && self.contains(other.max_x(), other.max_y())
    }
}

/// One changed area of the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub bbox: BoundingBox,
    /// Polygon area enclosed by the traced external contour
    pub area: f64,
}

/// Before/after images of the same fixed viewpoint.
///
/// Both sides always have identical dimensions; construction fails otherwise.
#[derive(Debug, Clone)]
pub struct ImagePair {
    id: String,
    before: RgbImage,
    after: RgbImage,
}

impl ImagePair {
    pub fn new(id: impl Into<String>, before: RgbImage, after: RgbImage) -> Result<Self> {
        if before.dimensions() != after.dimensions() {
            return Err(ChangeError::DimensionMismatch {
                before_width: before.width(),
                before_height: before.height(),
                after_width: after.width(),
                after_height: after.height(),
            });
        }

        Ok(Self {
            id: id.into(),
            before,
            after,
        })
    }

    /// Decode both images from disk and pair them
    pub fn open(
        id: impl Into<String>,
        before_path: impl AsRef<Path>,
        after_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let before = load_rgb(before_path.as_ref())?;
        let after = load_rgb(after_path.as_ref())?;
        Self::new(id, before, after)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn before(&self) -> &RgbImage {
        &self.before
    }

    pub fn after(&self) -> &RgbImage {
        &self.after
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.before.dimensions()
    }

    pub fn into_parts(self) -> (String, RgbImage, RgbImage) {
        (self.id, self.before, self.after)
    }
}

fn load_rgb(path: &Path) -> Result<RgbImage> {
    if !path.exists() {
        return Err(ChangeError::MissingImage(path.to_path_buf()));
    }

    let decoded = ImageReader::open(path)
        .map_err(|e| ChangeError::Decode {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?
        .with_guessed_format()
        .map_err(|e| ChangeError::Decode {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?
        .decode()
        .map_err(|e| ChangeError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(decoded.to_rgb8())
}

/// Result of running the pipeline over one pair
#[derive(Debug, Clone)]
pub struct ChangeDetection {
    pub id: String,
    /// The before image, untouched
    pub before: RgbImage,
    /// Copy of the after image with every region outlined
    pub annotated: RgbImage,
    /// Mean structural similarity in [-1, 1]
    pub score: f64,
    pub regions: Vec<Region>,
    /// Set when the dissimilarity map was constant (nothing to separate)
    pub degenerate: bool,
}

impl ChangeDetection {
    pub fn has_changes(&self) -> bool {
        !self.regions.is_empty()
    }
}
