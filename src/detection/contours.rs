use image::{GrayImage, imageops};
use imageproc::contours::{BorderType, Contour, find_contours};
use imageproc::point::Point;

use crate::models::{BoundingBox, Region};

/// Trace external contours in a binary mask and keep those enclosing more
/// than `min_area` pixels. Holes and anything nested inside them are ignored.
pub fn find_regions(mask: &GrayImage, min_area: u32) -> Vec<Region> {
    external_contours(mask)
        .iter()
        .filter_map(|contour| region_from_points(&contour.points))
        .filter(|region| region.area > min_area as f64)
        .collect()
}

/// Outermost borders only: outer borders that no other border encloses.
///
/// Tracing runs on a copy with a one pixel background frame, so components
/// touching the image edge are traced like any other. Points are returned
/// in mask coordinates.
pub fn external_contours(mask: &GrayImage) -> Vec<Contour<i32>> {
    let (width, height) = mask.dimensions();
    let mut framed = GrayImage::new(width + 2, height + 2);
    imageops::replace(&mut framed, mask, 1, 1);

    find_contours::<i32>(&framed)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|mut c| {
            for p in &mut c.points {
                p.x -= 1;
                p.y -= 1;
            }
            c
        })
        .collect()
}

/// Area of the polygon traced by `points` (shoelace formula)
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let n = points.len();
    let mut twice_area: i64 = 0;
    for i in 0..n {
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        twice_area += p1.x as i64 * p2.y as i64 - p2.x as i64 * p1.y as i64;
    }

    (twice_area.abs() as f64) / 2.0
}

/// Smallest axis-aligned box covering every point
pub fn bounding_rect(points: &[Point<i32>]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    // Contours of an image never leave its pixel grid
    if min_x < 0 || min_y < 0 {
        return None;
    }

    Some(BoundingBox::from_corners(
        min_x as u32,
        min_y as u32,
        max_x as u32,
        max_y as u32,
    ))
}

fn region_from_points(points: &[Point<i32>]) -> Option<Region> {
    let bbox = bounding_rect(points)?;
    Some(Region {
        bbox,
        area: contour_area(points),
    })
}
