//! Integration tests for the structural similarity mapper.

mod common;

use changemark::detection::{similarity::structural_similarity, to_grayscale};
use common::*;

#[test]
fn test_identical_images_score_one_and_zero_map() -> anyhow::Result<()> {
    let img = to_grayscale(&textured(64, 48));
    let map = structural_similarity(&img, &img, 7)?;

    assert!((map.score - 1.0).abs() < 1e-9, "score was {}", map.score);
    assert!(map.dissimilarity.pixels().all(|p| p[0] == 0));
    Ok(())
}

#[test]
fn test_map_has_input_dimensions() -> anyhow::Result<()> {
    let parts = square_on_black_pair();
    let map = structural_similarity(&to_grayscale(&parts.before), &to_grayscale(&parts.after), 7)?;

    assert_eq!(map.dissimilarity.dimensions(), (100, 100));
    Ok(())
}

#[test]
fn test_new_object_is_dissimilar_background_is_not() -> anyhow::Result<()> {
    let parts = square_on_black_pair();
    let map = structural_similarity(&to_grayscale(&parts.before), &to_grayscale(&parts.after), 7)?;

    // Centre of the inserted square
    assert!(map.dissimilarity.get_pixel(50, 50)[0] > 200);
    // Far corner, untouched by any window covering the square
    assert_eq!(map.dissimilarity.get_pixel(5, 5)[0], 0);
    assert_eq!(map.dissimilarity.get_pixel(95, 95)[0], 0);
    assert!(map.score < 1.0);
    assert!(map.score >= -1.0);
    Ok(())
}

#[test]
fn test_change_direction_is_symmetric() -> anyhow::Result<()> {
    let parts = square_on_black_pair();
    let before = to_grayscale(&parts.before);
    let after = to_grayscale(&parts.after);

    let forward = structural_similarity(&before, &after, 7)?;
    let backward = structural_similarity(&after, &before, 7)?;

    assert!((forward.score - backward.score).abs() < 1e-9);
    assert_eq!(forward.dissimilarity, backward.dissimilarity);
    Ok(())
}

#[test]
fn test_uniform_brightness_shift_is_tolerated_better_than_new_object() -> anyhow::Result<()> {
    let base = textured(64, 64);
    let brighter = image::RgbImage::from_fn(64, 64, |x, y| {
        let p = base.get_pixel(x, y);
        image::Rgb([p[0].saturating_add(6), p[1].saturating_add(6), p[2].saturating_add(6)])
    });
    let with_object = with_square(&base, 20, 20, 16, WHITE);

    let shifted = structural_similarity(&to_grayscale(&base), &to_grayscale(&brighter), 7)?;
    let changed = structural_similarity(&to_grayscale(&base), &to_grayscale(&with_object), 7)?;

    assert!(shifted.score > changed.score);
    assert!(shifted.score > 0.9, "score was {}", shifted.score);
    Ok(())
}

#[test]
fn test_dimension_mismatch_is_rejected() {
    let a = to_grayscale(&solid(40, 40, GRAY));
    let b = to_grayscale(&solid(40, 39, GRAY));

    let err = structural_similarity(&a, &b, 7).unwrap_err();
    assert!(matches!(err, ChangeError::DimensionMismatch { .. }));
    assert!(err.is_input_mismatch());
}

#[test]
fn test_image_smaller_than_window_is_rejected() {
    let a = to_grayscale(&solid(5, 20, GRAY));

    let err = structural_similarity(&a, &a, 7).unwrap_err();
    assert!(matches!(
        err,
        ChangeError::ImageTooSmall { width: 5, height: 20, window: 7 }
    ));
    assert!(!err.is_input_mismatch());
}
