// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floorplan3D Geometry
//!
//! Shape and extrusion primitives for turning floor plan outlines into
//! solids, using earcutr triangulation and nalgebra for transformations.

pub mod error;
pub mod extrusion;
pub mod mesh;
pub mod profile;
pub mod transform;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector2, Vector3};

pub use error::{Error, Result};
pub use extrusion::{extrude, ExtrudeSettings};
pub use mesh::Mesh;
pub use profile::{create_rectangle, Profile2D};
pub use transform::Placement;
pub use triangulation::triangulate_polygon;
