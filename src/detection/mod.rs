pub mod similarity;
pub mod mask;
pub mod contours;
pub mod annotate;

use image::{GrayImage, RgbImage, imageops};

use crate::config::ChangeConfig;
use crate::error::Result;
use crate::models::{ChangeDetection, ImagePair, Region};
use similarity::SimilarityMap;

/// Per-pair change detection: similarity map, change mask, regions, annotation.
///
/// Holds only read-only configuration, so one detector can be shared by any
/// number of threads working on different pairs.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    config: ChangeConfig,
}

impl ChangeDetector {
    pub fn new(config: ChangeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChangeConfig {
        &self.config
    }

    /// Run the full pipeline on a pair.
    ///
    /// The before image is handed back untouched; the after image is copied
    /// and annotated. Each intermediate buffer is dropped as soon as the
    /// next stage has consumed it.
    pub fn detect(&self, pair: ImagePair) -> Result<ChangeDetection> {
        let (id, before, after) = pair.into_parts();

        let (score, regions, degenerate) = {
            let gray_before = to_grayscale(&before);
            let gray_after = to_grayscale(&after);
            let SimilarityMap {
                score,
                dissimilarity,
            } = similarity::structural_similarity(
                &gray_before,
                &gray_after,
                self.config.similarity_window,
            )?;
            drop(gray_before);
            drop(gray_after);

            let change = mask::build_change_mask(&dissimilarity, &self.config);
            drop(dissimilarity);

            let regions = contours::find_regions(&change.mask, self.config.minimum_region_area);
            (score, regions, change.degenerate)
        };

        let annotated = annotate::draw_regions(
            &after,
            &regions,
            self.config.box_color,
            self.config.box_thickness,
        );

        Ok(ChangeDetection {
            id,
            before,
            annotated,
            score,
            regions,
            degenerate,
        })
    }

    /// Similarity stage only (for debugging)
    pub fn similarity(&self, pair: &ImagePair) -> Result<SimilarityMap> {
        similarity::structural_similarity(
            &to_grayscale(pair.before()),
            &to_grayscale(pair.after()),
            self.config.similarity_window,
        )
    }

    /// Dilated change mask of a pair (for debugging)
    pub fn change_mask(&self, pair: &ImagePair) -> Result<GrayImage> {
        let map = self.similarity(pair)?;
        Ok(mask::build_change_mask(&map.dissimilarity, &self.config).mask)
    }

    /// Accepted regions of a pair without drawing them (for debugging)
    pub fn regions(&self, pair: &ImagePair) -> Result<Vec<Region>> {
        let change_mask = self.change_mask(pair)?;
        Ok(contours::find_regions(&change_mask, self.config.minimum_region_area))
    }
}

/// Convert a colour image to single-channel intensity
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    imageops::grayscale(img)
}
