// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Splitting a wall mask into axis-aligned pieces
//!
//! Rows are scanned top to bottom. A run of wall pixels continues the piece
//! above it when both of its ends line up within `run_tolerance`; otherwise
//! the piece above is closed and a new one starts. An L-shaped wall thus
//! becomes two rectangles and a ring becomes four.

use floorplan3d_scene::Polygon;
use image::GrayImage;
use serde::Serialize;

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    #[inline]
    pub fn area(&self) -> u32 {
        self.width() * self.height()
    }

    /// Outline in output units, counter-clockwise in image coordinates
    pub fn to_polygon(&self, scale: f64) -> Polygon {
        let (x0, y0) = (self.x0 as f64 * scale, self.y0 as f64 * scale);
        let (x1, y1) = (self.x1 as f64 * scale, self.y1 as f64 * scale);
        Polygon::from_coords(&[[x0, y0], [x1, y0], [x1, y1], [x0, y1]])
    }
}

/// Runs of wall pixels in row `y` as `[start, end)` pairs
fn row_runs(mask: &GrayImage, y: u32) -> Vec<(u32, u32)> {
    let mut runs = Vec::new();
    let mut start = None;
    for x in 0..mask.width() {
        let wall = mask.get_pixel(x, y).0[0] > 0;
        match (wall, start) {
            (true, None) => start = Some(x),
            (false, Some(s)) => {
                runs.push((s, x));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, mask.width()));
    }
    runs
}

#[inline]
fn within(a: u32, b: u32, tolerance: u32) -> bool {
    a.abs_diff(b) <= tolerance
}

/// Decompose a wall mask into rectangles of at least `min_area` pixels
///
/// Results are ordered by `(y0, x0)`.
pub fn extract_wall_rects(mask: &GrayImage, run_tolerance: u32, min_area: u32) -> Vec<PixelRect> {
    let mut open: Vec<PixelRect> = Vec::new();
    let mut closed = Vec::new();

    for y in 0..mask.height() {
        let mut next_open = Vec::with_capacity(open.len());
        for (start, end) in row_runs(mask, y) {
            let continued = open
                .iter()
                .position(|r| within(r.x0, start, run_tolerance) && within(r.x1, end, run_tolerance));
            match continued {
                Some(i) => {
                    let mut rect = open.swap_remove(i);
                    rect.y1 = y + 1;
                    next_open.push(rect);
                }
                None => next_open.push(PixelRect::new(start, y, end, y + 1)),
            }
        }
        closed.append(&mut open);
        open = next_open;
    }
    closed.append(&mut open);

    closed.retain(|r| r.area() >= min_area);
    closed.sort_by_key(|r| (r.y0, r.x0));
    closed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_ops::{fill_rect, WALL};

    #[test]
    fn test_rect_polygon() {
        let rect = PixelRect::new(10, 20, 30, 25);
        assert_eq!(rect.width(), 20);
        assert_eq!(rect.height(), 5);
        assert_eq!(rect.area(), 100);

        let polygon = rect.to_polygon(0.5);
        let coords: Vec<[f64; 2]> = polygon.points.iter().map(|p| [p.x, p.y]).collect();
        assert_eq!(coords, vec![[5.0, 10.0], [15.0, 10.0], [15.0, 12.5], [5.0, 12.5]]);
    }

    #[test]
    fn test_ring_becomes_four_rects() {
        let mut mask = GrayImage::new(50, 50);
        fill_rect(&mut mask, &PixelRect::new(5, 5, 45, 10));
        fill_rect(&mut mask, &PixelRect::new(5, 40, 45, 45));
        fill_rect(&mut mask, &PixelRect::new(5, 5, 10, 45));
        fill_rect(&mut mask, &PixelRect::new(40, 5, 45, 45));

        let rects = extract_wall_rects(&mask, 2, 10);
        assert_eq!(
            rects,
            vec![
                PixelRect::new(5, 5, 45, 10),
                PixelRect::new(5, 10, 10, 40),
                PixelRect::new(40, 10, 45, 40),
                PixelRect::new(5, 40, 45, 45),
            ]
        );
        let covered: u32 = rects.iter().map(PixelRect::area).sum();
        assert_eq!(covered, mask.pixels().filter(|p| p.0[0] > 0).count() as u32);
    }

    #[test]
    fn test_ragged_edges_are_tolerated() {
        let mut mask = GrayImage::new(30, 30);
        fill_rect(&mut mask, &PixelRect::new(10, 0, 16, 30));
        // Anti-aliasing leftovers along one edge
        mask.put_pixel(16, 12, WALL);
        mask.put_pixel(9, 20, WALL);

        let rects = extract_wall_rects(&mask, 1, 1);
        assert_eq!(rects, vec![PixelRect::new(10, 0, 16, 30)]);

        let strict = extract_wall_rects(&mask, 0, 1);
        assert!(strict.len() > 1);
    }

    #[test]
    fn test_small_pieces_are_dropped() {
        let mut mask = GrayImage::new(20, 20);
        mask.put_pixel(3, 3, WALL);
        fill_rect(&mut mask, &PixelRect::new(0, 10, 20, 14));
        mask.put_pixel(19, 19, WALL);

        let rects = extract_wall_rects(&mask, 0, 4);
        assert_eq!(rects, vec![PixelRect::new(0, 10, 20, 14)]);
        assert!(extract_wall_rects(&GrayImage::new(5, 5), 0, 0).is_empty());
    }
}
