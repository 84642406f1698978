// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint bounds of the wall outlines and the floor slab derived from them

use crate::types::{Point2D, Polygon};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounds of a point set in plan coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingRectangle {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingRectangle {
    /// Degenerate rectangle at a single point
    pub fn at(point: &Point2D) -> Self {
        Self {
            min_x: point.x,
            min_y: point.y,
            max_x: point.x,
            max_y: point.y,
        }
    }

    /// Bounds of all points; `None` when there are none
    ///
    /// The first point seeds both extremes, so zero coordinates are ordinary
    /// values rather than an "unset" marker.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2D>,
    {
        let mut points = points.into_iter();
        let mut rect = Self::at(points.next()?);
        for p in points {
            rect.include(p);
        }
        Some(rect)
    }

    /// Bounds of every point of every polygon
    pub fn from_polygons(polygons: &[Polygon]) -> Option<Self> {
        Self::from_points(polygons.iter().flat_map(|p| p.points.iter()))
    }

    /// Grow to contain `point`
    pub fn include(&mut self, point: &Point2D) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Rectangle covering the bounds, walked (minX,minY), (minX,maxY),
    /// (maxX,maxY), (maxX,minY)
    pub fn floor_polygon(&self) -> Polygon {
        Polygon::new(vec![
            Point2D::new(self.min_x, self.min_y),
            Point2D::new(self.min_x, self.max_y),
            Point2D::new(self.max_x, self.max_y),
            Point2D::new(self.max_x, self.min_y),
        ])
    }
}
