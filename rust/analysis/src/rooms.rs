// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room detection on the closed wall mask
//!
//! Once every opening is painted shut, each enclosed region of free space is
//! a room. Regions touching the image border are outside the building.

use crate::image_ops::invert;
use floorplan3d_scene::{Point2D, Polygon};
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::approximate_polygon_dp;
use imageproc::region_labelling::{connected_components, Connectivity};
use rustc_hash::FxHashMap;

/// Pixel extent and size of one labelled region
#[derive(Debug, Clone, Copy)]
struct Region {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    pixels: u32,
}

impl Region {
    fn new(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            pixels: 0,
        }
    }

    fn add(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.pixels += 1;
    }

    fn touches_border(&self, width: u32, height: u32) -> bool {
        self.min_x == 0 || self.min_y == 0 || self.max_x + 1 >= width || self.max_y + 1 >= height
    }
}

/// Room outlines in output units, ordered by their topmost-leftmost pixel
///
/// `closed_walls` must have every opening painted as wall.
pub fn detect_rooms(closed_walls: &GrayImage, min_area: f64, epsilon: f64, scale: f64) -> Vec<Polygon> {
    let (width, height) = closed_walls.dimensions();
    let free = invert(closed_walls);
    let labels = connected_components(&free, Connectivity::Four, Luma([0u8]));

    let mut regions: FxHashMap<u32, Region> = FxHashMap::default();
    let mut order = Vec::new();
    for (x, y, label) in labels.enumerate_pixels() {
        let label = label.0[0];
        if label == 0 {
            continue;
        }
        regions
            .entry(label)
            .or_insert_with(|| {
                order.push(label);
                Region::new(x, y)
            })
            .add(x, y);
    }

    let mut rooms = Vec::new();
    for label in order {
        let Some(region) = regions.get(&label) else {
            continue;
        };
        if region.touches_border(width, height) || (region.pixels as f64) < min_area {
            continue;
        }
        match outline(&labels, label, region, epsilon) {
            Some(points) => rooms.push(Polygon::new(
                points
                    .into_iter()
                    .map(|(x, y)| Point2D::new(x * scale, y * scale))
                    .collect(),
            )),
            None => tracing::debug!(label, pixels = region.pixels, "Room has no usable outline"),
        }
    }
    rooms
}

/// Simplified outer boundary of one region in pixel coordinates
fn outline(
    labels: &image::ImageBuffer<Luma<u32>, Vec<u32>>,
    label: u32,
    region: &Region,
    epsilon: f64,
) -> Option<Vec<(f64, f64)>> {
    // One pixel of padding keeps the contour off the image edge
    let width = region.max_x - region.min_x + 3;
    let height = region.max_y - region.min_y + 3;
    let mut mask = GrayImage::new(width, height);
    for y in region.min_y..=region.max_y {
        for x in region.min_x..=region.max_x {
            if labels.get_pixel(x, y).0[0] == label {
                mask.put_pixel(x - region.min_x + 1, y - region.min_y + 1, Luma([255]));
            }
        }
    }

    let contour = find_contours::<i32>(&mask)
        .into_iter()
        .find(|c| c.border_type == BorderType::Outer && c.parent.is_none())?;
    let simplified = approximate_polygon_dp(&contour.points, epsilon, true);

    let offset_x = region.min_x as f64 - 1.0;
    let offset_y = region.min_y as f64 - 1.0;
    let mut points: Vec<(f64, f64)> = Vec::with_capacity(simplified.len());
    for p in simplified {
        let point = (p.x as f64 + offset_x, p.y as f64 + offset_y);
        if points.last() != Some(&point) {
            points.push(point);
        }
    }
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    drop_collinear(&mut points, epsilon);

    (points.len() >= 3).then_some(points)
}

/// Remove vertices within `epsilon` of the line through their neighbours
///
/// The simplification keeps the contour's start pixel even when it lies in
/// the middle of an edge.
fn drop_collinear(points: &mut Vec<(f64, f64)>, epsilon: f64) {
    let mut i = 0;
    while points.len() > 3 && i < points.len() {
        let n = points.len();
        let prev = points[(i + n - 1) % n];
        let next = points[(i + 1) % n];
        if distance_to_line(points[i], prev, next) <= epsilon {
            points.remove(i);
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }
}

fn distance_to_line(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length < 1e-12 {
        return ((p.0 - a.0).powi(2) + (p.1 - a.1).powi(2)).sqrt();
    }
    ((p.0 - a.0) * dy - (p.1 - a.1) * dx).abs() / length
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_ops::fill_rect;
    use crate::segments::PixelRect;

    fn bounds(polygon: &Polygon) -> (f64, f64, f64, f64) {
        polygon.points.iter().fold(
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
            |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        )
    }

    fn boxed(width: u32, height: u32, thickness: u32) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        fill_rect(&mut mask, &PixelRect::new(0, 0, width, thickness));
        fill_rect(&mut mask, &PixelRect::new(0, height - thickness, width, height));
        fill_rect(&mut mask, &PixelRect::new(0, 0, thickness, height));
        fill_rect(&mut mask, &PixelRect::new(width - thickness, 0, width, height));
        mask
    }

    #[test]
    fn test_single_room() {
        let mask = boxed(60, 40, 5);
        let rooms = detect_rooms(&mask, 10.0, 1.0, 1.0);

        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].len(), 4);
        assert_eq!(bounds(&rooms[0]), (5.0, 5.0, 54.0, 34.0));
    }

    #[test]
    fn test_divided_rooms_and_scale() {
        let mut mask = boxed(60, 40, 5);
        fill_rect(&mut mask, &PixelRect::new(28, 0, 32, 40));

        let rooms = detect_rooms(&mask, 10.0, 1.0, 0.5);
        assert_eq!(rooms.len(), 2);
        assert_eq!(bounds(&rooms[0]), (2.5, 2.5, 13.5, 17.0));
        assert_eq!(bounds(&rooms[1]), (16.0, 2.5, 27.0, 17.0));
    }

    #[test]
    fn test_open_and_small_regions_are_not_rooms() {
        // Gap in the top wall connects the inside to the border
        let mut open = boxed(60, 40, 5);
        for y in 0..5 {
            for x in 20..30 {
                open.put_pixel(x, y, Luma([0]));
            }
        }
        assert!(detect_rooms(&open, 10.0, 1.0, 1.0).is_empty());

        // 6x6 interior
        let closet = boxed(12, 12, 3);
        assert!(detect_rooms(&closet, 40.0, 1.0, 1.0).is_empty());
        assert_eq!(detect_rooms(&closet, 30.0, 1.0, 1.0).len(), 1);
    }

    #[test]
    fn test_l_shaped_room() {
        let mut mask = boxed(60, 60, 5);
        fill_rect(&mut mask, &PixelRect::new(30, 30, 60, 60));

        let rooms = detect_rooms(&mask, 10.0, 1.0, 1.0);
        assert_eq!(rooms.len(), 1);
        // The inner corner may keep one extra pixel-sized step
        assert!((6..=7).contains(&rooms[0].len()), "got {} points", rooms[0].len());
        assert_eq!(bounds(&rooms[0]), (5.0, 5.0, 54.0, 54.0));
    }

    #[test]
    fn test_drop_collinear() {
        let mut points = vec![(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 1.0)];
        drop_collinear(&mut points, 0.5);
        assert_eq!(points, vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);

        let mut triangle = vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        drop_collinear(&mut triangle, 5.0);
        assert_eq!(triangle.len(), 3);
    }
}
