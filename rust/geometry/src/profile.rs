// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D profile definitions and triangulation

use crate::error::{Error, Result};
use crate::triangulation::triangulate_polygon;
use nalgebra::{Point2, Vector2};

/// Coincidence tolerance for ring cleanup
const POINT_EPSILON: f64 = 1e-9;
const AREA_EPSILON: f64 = 1e-9;

/// Closed 2D outline in the XY plane
///
/// The ring is implicitly closed: the last point connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile2D {
    /// Outer boundary
    pub outer: Vec<Point2<f64>>,
}

impl Profile2D {
    /// Create a profile from points taken as-is
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self { outer }
    }

    /// Create a profile from a raw ring, dropping repeated points
    ///
    /// Consecutive duplicates and a trailing point equal to the first one are
    /// removed. Floor plan rings frequently repeat their start point.
    pub fn from_ring<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point2<f64>>,
    {
        let mut outer: Vec<Point2<f64>> = Vec::new();
        for p in points {
            match outer.last() {
                Some(last) if coincident(last, &p) => {}
                _ => outer.push(p),
            }
        }
        while outer.len() > 1 && coincident(&outer[0], &outer[outer.len() - 1]) {
            outer.pop();
        }
        Self { outer }
    }

    /// Number of boundary points
    #[inline]
    pub fn len(&self) -> usize {
        self.outer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.outer.is_empty()
    }

    /// Signed area (shoelace), positive for counter-clockwise rings
    pub fn signed_area(&self) -> f64 {
        let n = self.outer.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0.0;
        for i in 0..n {
            let a = &self.outer[i];
            let b = &self.outer[(i + 1) % n];
            twice += a.x * b.y - b.x * a.y;
        }
        twice / 2.0
    }

    /// Enclosed area
    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[inline]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Reverse the ring in place if it winds clockwise
    pub fn ensure_ccw(&mut self) {
        if self.signed_area() < 0.0 {
            self.outer.reverse();
        }
    }

    /// Whether the ring has at least three points and a non-zero area
    pub fn encloses_area(&self) -> bool {
        self.outer.len() >= 3 && self.area() > AREA_EPSILON
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        let first = self.outer.first()?;
        let init = (*first, *first);
        Some(self.outer.iter().fold(init, |(min, max), p| {
            (
                Point2::new(min.x.min(p.x), min.y.min(p.y)),
                Point2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }

    /// Outward bevel vectors, one per boundary point
    ///
    /// Moving point `i` by `vectors[i] * d` offsets both adjacent edges
    /// outward by exactly `d`. The ring must be counter-clockwise.
    pub fn bevel_vectors(&self) -> Vec<Vector2<f64>> {
        let n = self.outer.len();
        let mut vectors = Vec::with_capacity(n);
        for i in 0..n {
            let prev = &self.outer[(i + n - 1) % n];
            let curr = &self.outer[i];
            let next = &self.outer[(i + 1) % n];

            let n1 = edge_normal(prev, curr);
            let n2 = edge_normal(curr, next);
            let vector = match (n1, n2) {
                (Some(a), Some(b)) => {
                    let denom = 1.0 + a.dot(&b);
                    if denom > 1e-6 {
                        (a + b) / denom
                    } else {
                        // Hairpin turn: the miter is unbounded, so push the
                        // tip out along the incoming edge as well
                        let along = (curr - prev).try_normalize(1e-12).unwrap_or_else(Vector2::zeros);
                        a + along
                    }
                }
                (Some(a), None) | (None, Some(a)) => a,
                (None, None) => Vector2::zeros(),
            };
            vectors.push(vector);
        }
        vectors
    }

    /// Ring offset outward by `distance` using the bevel vectors
    pub fn offset(&self, vectors: &[Vector2<f64>], distance: f64) -> Vec<Point2<f64>> {
        self.outer
            .iter()
            .zip(vectors)
            .map(|(p, v)| p + v * distance)
            .collect()
    }

    /// Triangulate the profile
    ///
    /// Returns triangle indices into `outer`.
    pub fn triangulate(&self) -> Result<Vec<usize>> {
        if self.outer.len() < 3 {
            return Err(Error::InvalidProfile(format!(
                "Profile must have at least 3 distinct vertices, got {}",
                self.outer.len()
            )));
        }
        triangulate_polygon(&self.outer)
    }
}

#[inline]
fn coincident(a: &Point2<f64>, b: &Point2<f64>) -> bool {
    (a.x - b.x).abs() <= POINT_EPSILON && (a.y - b.y).abs() <= POINT_EPSILON
}

/// Outward unit normal of edge a->b for a counter-clockwise ring
#[inline]
fn edge_normal(a: &Point2<f64>, b: &Point2<f64>) -> Option<Vector2<f64>> {
    Vector2::new(b.y - a.y, a.x - b.x).try_normalize(1e-12)
}

/// Create an axis-aligned rectangle profile from its corners
pub fn create_rectangle(min: Point2<f64>, max: Point2<f64>) -> Profile2D {
    Profile2D::new(vec![
        Point2::new(min.x, min.y),
        Point2::new(max.x, min.y),
        Point2::new(max.x, max.y),
        Point2::new(min.x, max.y),
    ])
}
