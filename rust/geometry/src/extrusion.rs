// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - converting 2D profiles to bevelled 3D meshes
//!
//! The profile is swept along +Z. With bevels enabled the straight body spans
//! `[0, depth]` with its outline grown by `bevel_size`, and each end receives
//! `bevel_segments` rings that round the outline back to its original size at
//! `-bevel_thickness` and `depth + bevel_thickness`, where the caps sit.
//!
//! Outlines with fewer than three distinct points, or with no enclosed area,
//! are swept the same way but receive no caps.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::profile::Profile2D;
use nalgebra::{Point2, Point3, Vector2, Vector3};
use smallvec::SmallVec;
use std::f64::consts::FRAC_PI_2;

/// Extrusion parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeSettings {
    /// Length of the straight body along +Z
    pub depth: f64,
    pub bevel_enabled: bool,
    /// Rings per bevelled end
    pub bevel_segments: u32,
    /// Outward growth of the body outline
    pub bevel_size: f64,
    /// How far each bevel reaches past the body along Z
    pub bevel_thickness: f64,
    /// Slices of the straight body
    pub steps: u32,
}

impl ExtrudeSettings {
    /// Bevelled extrusion with two segments, unit bevel and two steps
    pub fn new(depth: f64) -> Self {
        Self {
            depth,
            bevel_enabled: true,
            bevel_segments: 2,
            bevel_size: 1.0,
            bevel_thickness: 1.0,
            steps: 2,
        }
    }

    /// Plain prism without bevels
    pub fn flat(depth: f64) -> Self {
        Self {
            depth,
            bevel_enabled: false,
            bevel_segments: 0,
            bevel_size: 0.0,
            bevel_thickness: 0.0,
            steps: 1,
        }
    }

    /// Overall extent along Z including bevels
    pub fn total_thickness(&self) -> f64 {
        if self.bevel_enabled {
            self.depth + 2.0 * self.bevel_thickness
        } else {
            self.depth
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.depth.is_finite() && self.depth > 0.0) {
            return Err(Error::InvalidExtrusion(format!(
                "Depth must be positive, got {}",
                self.depth
            )));
        }
        if self.steps == 0 {
            return Err(Error::InvalidExtrusion("Steps must be at least 1".to_string()));
        }
        if self.bevel_enabled {
            if self.bevel_segments == 0 {
                return Err(Error::InvalidExtrusion(
                    "Bevel segments must be at least 1".to_string(),
                ));
            }
            if self.bevel_size < 0.0 || self.bevel_thickness < 0.0 {
                return Err(Error::InvalidExtrusion(
                    "Bevel size and thickness must not be negative".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Z level and outline growth of every ring, bottom to top
    fn rings(&self) -> SmallVec<[Ring; 8]> {
        let mut rings = SmallVec::new();

        if !self.bevel_enabled {
            for s in 0..=self.steps {
                rings.push(Ring {
                    z: self.depth * s as f64 / self.steps as f64,
                    grow: 0.0,
                });
            }
            return rings;
        }

        let segments = self.bevel_segments as f64;
        for b in 0..self.bevel_segments {
            let t = b as f64 / segments * FRAC_PI_2;
            rings.push(Ring {
                z: -self.bevel_thickness * t.cos(),
                grow: self.bevel_size * t.sin(),
            });
        }
        for s in 0..=self.steps {
            rings.push(Ring {
                z: self.depth * s as f64 / self.steps as f64,
                grow: self.bevel_size,
            });
        }
        for b in (0..self.bevel_segments).rev() {
            let t = b as f64 / segments * FRAC_PI_2;
            rings.push(Ring {
                z: self.depth + self.bevel_thickness * t.cos(),
                grow: self.bevel_size * t.sin(),
            });
        }
        rings
    }
}

#[derive(Debug, Clone, Copy)]
struct Ring {
    z: f64,
    grow: f64,
}

/// Extrude a 2D profile along the Z axis
pub fn extrude(profile: &Profile2D, settings: &ExtrudeSettings) -> Result<Mesh> {
    settings.validate()?;

    if profile.is_empty() {
        return Err(Error::InvalidProfile("Profile has no points".to_string()));
    }

    let mut profile = profile.clone();
    profile.ensure_ccw();
    // Outlines that enclose nothing still get their side bands, just no caps
    let triangles = if profile.encloses_area() {
        profile.triangulate()?
    } else {
        Vec::new()
    };

    let vectors = profile.bevel_vectors();
    let rings = settings.rings();
    let n = profile.len();

    let mut mesh = Mesh::with_capacity(
        n * 2 + n * 4 * (rings.len() - 1),
        triangles.len() * 2 + n * 6 * (rings.len() - 1),
    );

    let (bottom, top) = match (rings.first(), rings.last()) {
        (Some(b), Some(t)) => (*b, *t),
        _ => return Err(Error::InvalidExtrusion("No rings generated".to_string())),
    };

    if !triangles.is_empty() {
        create_cap(&profile.offset(&vectors, bottom.grow), &triangles, bottom.z, false, &mut mesh);
        create_cap(&profile.offset(&vectors, top.grow), &triangles, top.z, true, &mut mesh);
    }

    for pair in rings.windows(2) {
        create_side_band(&profile, &vectors, pair[0], pair[1], &mut mesh);
    }

    Ok(mesh)
}

/// Create a cap from a triangulation, oriented to face +Z or -Z
fn create_cap(ring: &[Point2<f64>], triangles: &[usize], z: f64, facing_up: bool, mesh: &mut Mesh) {
    let base_index = mesh.vertex_count() as u32;
    let normal = if facing_up {
        Vector3::new(0.0, 0.0, 1.0)
    } else {
        Vector3::new(0.0, 0.0, -1.0)
    };

    for point in ring {
        mesh.add_vertex(Point3::new(point.x, point.y, z), normal);
    }

    for tri in triangles.chunks_exact(3) {
        let (a, b, c) = (ring[tri[0]], ring[tri[1]], ring[tri[2]]);
        let ccw = (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y) > 0.0;
        let (i0, i1, i2) = (
            base_index + tri[0] as u32,
            base_index + tri[1] as u32,
            base_index + tri[2] as u32,
        );
        if ccw == facing_up {
            mesh.add_triangle(i0, i1, i2);
        } else {
            mesh.add_triangle(i0, i2, i1);
        }
    }
}

/// Create the side quads between two rings
fn create_side_band(
    profile: &Profile2D,
    vectors: &[Vector2<f64>],
    lower: Ring,
    upper: Ring,
    mesh: &mut Mesh,
) {
    let low = profile.offset(vectors, lower.grow);
    let high = profile.offset(vectors, upper.grow);
    let n = low.len();

    for i in 0..n {
        let j = (i + 1) % n;

        let v0 = Point3::new(low[i].x, low[i].y, lower.z);
        let v1 = Point3::new(low[j].x, low[j].y, lower.z);
        let v2 = Point3::new(high[j].x, high[j].y, upper.z);
        let v3 = Point3::new(high[i].x, high[i].y, upper.z);

        // Skip degenerate quads (zero-length edges or coincident rings)
        let normal = match (v1 - v0).cross(&(v3 - v0)).try_normalize(1e-12) {
            Some(n) => n,
            None => continue,
        };

        let idx = mesh.vertex_count() as u32;
        mesh.add_vertex(v0, normal);
        mesh.add_vertex(v1, normal);
        mesh.add_vertex(v2, normal);
        mesh.add_vertex(v3, normal);

        mesh.add_triangle(idx, idx + 1, idx + 2);
        mesh.add_triangle(idx, idx + 2, idx + 3);
    }
}
