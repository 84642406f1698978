// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Solid construction from plan polygons

use crate::bounds::BoundingRectangle;
use crate::types::{Color, Point2D, Polygon, SolidKind};
use floorplan3d_geometry::{extrude, ExtrudeSettings, Mesh, Placement, Point3};
use thiserror::Error;

/// Errors that can occur while building a solid
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Polygon has no points")]
    EmptyPolygon,

    #[error(transparent)]
    Geometry(#[from] floorplan3d_geometry::Error),
}

/// An extruded polygon with its material color and placement in the group
#[derive(Debug, Clone)]
pub struct Solid {
    pub kind: SolidKind,
    /// Index of the source polygon within its category, if any
    pub source_index: Option<usize>,
    /// Geometry in local (plan) coordinates
    pub mesh: Mesh,
    pub color: Color,
    pub settings: ExtrudeSettings,
    pub placement: Placement,
}

impl Solid {
    /// Mesh with the placement applied
    pub fn world_mesh(&self) -> Mesh {
        if self.placement.is_identity() {
            return self.mesh.clone();
        }
        self.mesh.transformed(&self.placement.matrix())
    }

    /// Bounds after placement
    pub fn world_bounds(&self) -> (Point3<f32>, Point3<f32>) {
        self.world_mesh().bounds()
    }

    /// Plan outline bounds in local coordinates, read from the top cap
    ///
    /// The cap carries the un-grown outline, so this matches the source
    /// polygon even when the body is bevelled.
    pub fn footprint_bounds(&self) -> Option<BoundingRectangle> {
        let (_, max) = self.mesh.bounds();
        let top: Vec<Point2D> = self
            .mesh
            .positions
            .chunks_exact(3)
            .filter(|p| (p[2] - max.z).abs() < 1e-4)
            .map(|p| Point2D::new(p[0] as f64, p[1] as f64))
            .collect();
        BoundingRectangle::from_points(&top)
    }
}

/// Extrude a polygon into a solid at the origin
///
/// Repeated points are ignored. Outlines with fewer than three distinct
/// points, or no enclosed area, still produce their side faces but no caps.
/// Only a polygon without points is an error. Self-intersecting outlines are
/// not rejected.
pub fn build_solid(
    kind: SolidKind,
    polygon: &Polygon,
    settings: &ExtrudeSettings,
    color: Color,
) -> Result<Solid, BuildError> {
    if polygon.is_empty() {
        return Err(BuildError::EmptyPolygon);
    }

    let mesh = extrude(&polygon.to_profile(), settings)?;

    tracing::debug!(
        kind = kind.as_str(),
        points = polygon.len(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        depth = settings.depth,
        "Built solid"
    );

    Ok(Solid {
        kind,
        source_index: None,
        mesh,
        color,
        settings: *settings,
        placement: Placement::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use floorplan3d_geometry::Vector3;

    fn square(size: f64) -> Polygon {
        Polygon::from_coords(&[[0.0, 0.0], [size, 0.0], [size, size], [0.0, size]])
    }

    #[test]
    fn test_cross_section_matches_polygon_area() {
        let polygon = Polygon::from_coords(&[
            [0.0, 0.0],
            [120.0, 0.0],
            [120.0, 15.0],
            [15.0, 15.0],
            [15.0, 90.0],
            [0.0, 90.0],
        ]);
        let solid = build_solid(
            SolidKind::Wall,
            &polygon,
            &ExtrudeSettings::flat(200.0),
            Color::from_hex(0xf08000),
        )
        .unwrap();

        let expected = polygon.to_profile().area();
        assert_relative_eq!(solid.mesh.projected_area(&Vector3::z()), expected, epsilon = 1e-3);

        let (min, max) = solid.mesh.bounds();
        assert_relative_eq!(max.z - min.z, 200.0);
    }

    #[test]
    fn test_bevelled_thickness() {
        let settings = ExtrudeSettings::new(40.0);
        let solid = build_solid(SolidKind::Window, &square(50.0), &settings, Color::WHITE).unwrap();

        let (min, max) = solid.mesh.bounds();
        // Straight body covers exactly the depth; bevels add one unit per end
        assert_relative_eq!(min.z, -1.0, epsilon = 1e-5);
        assert_relative_eq!(max.z, 41.0, epsilon = 1e-5);
        assert_relative_eq!((max.z - min.z) as f64, settings.total_thickness(), epsilon = 1e-5);
    }

    #[test]
    fn test_footprint_ignores_bevel_growth() {
        let solid =
            build_solid(SolidKind::Wall, &square(100.0), &ExtrudeSettings::new(200.0), Color::WHITE)
                .unwrap();
        let footprint = solid.footprint_bounds().unwrap();
        assert_relative_eq!(footprint.min_x, 0.0);
        assert_relative_eq!(footprint.min_y, 0.0);
        assert_relative_eq!(footprint.max_x, 100.0);
        assert_relative_eq!(footprint.max_y, 100.0);

        // Body outline is wider than the footprint
        let (min, _) = solid.mesh.bounds();
        assert_relative_eq!(min.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_closing_point_is_tolerated() {
        let ring = Polygon::from_coords(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 0.0]]);
        let solid = build_solid(SolidKind::Door, &ring, &ExtrudeSettings::flat(1.0), Color::WHITE)
            .unwrap();
        assert_relative_eq!(solid.mesh.projected_area(&Vector3::z()), 50.0, epsilon = 1e-4);
    }

    #[test]
    fn test_empty_and_degenerate_polygons() {
        let settings = ExtrudeSettings::new(200.0);
        assert_eq!(
            build_solid(SolidKind::Wall, &Polygon::default(), &settings, Color::WHITE).unwrap_err(),
            BuildError::EmptyPolygon
        );

        let line = Polygon::from_coords(&[[0.0, 0.0], [5.0, 0.0], [5.0, 0.0]]);
        let solid = build_solid(SolidKind::Wall, &line, &settings, Color::WHITE).unwrap();
        assert!(!solid.mesh.is_empty());
        assert_relative_eq!(solid.mesh.projected_area(&Vector3::z()), 0.0);
    }

    #[test]
    fn test_world_mesh_applies_placement() {
        let mut solid =
            build_solid(SolidKind::Floor, &square(10.0), &ExtrudeSettings::flat(10.0), Color::WHITE)
                .unwrap();
        solid.placement = Placement::at(-750.0, -750.0, -10.0);

        let (min, max) = solid.world_bounds();
        assert_relative_eq!(min.x, -750.0);
        assert_relative_eq!(max.y, -740.0);
        assert_relative_eq!(min.z, -10.0);
        assert_relative_eq!(max.z, 0.0);
    }
}
