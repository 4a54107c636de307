use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::models::Region;

/// Outline every region on a copy of `after`.
///
/// The stroke grows outward from the box edge, so the first ring of the
/// outline sits exactly on the region's bounding box. Strokes running past
/// the image border are clipped.
pub fn draw_regions(after: &RgbImage, regions: &[Region], color: Rgb<u8>, thickness: u32) -> RgbImage {
    let mut canvas = after.clone();
    for region in regions {
        draw_box(&mut canvas, region, color, thickness);
    }
    canvas
}

fn draw_box(canvas: &mut RgbImage, region: &Region, color: Rgb<u8>, thickness: u32) {
    let bbox = &region.bbox;
    if bbox.width == 0 || bbox.height == 0 {
        return;
    }
    for offset in 0..thickness {
        let rect = Rect::at(bbox.x as i32 - offset as i32, bbox.y as i32 - offset as i32)
            .of_size(bbox.width + 2 * offset, bbox.height + 2 * offset);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}
