// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ/MTL export of a composed scene

use floorplan3d_scene::{Color, SceneGroup};
use std::collections::BTreeSet;
use std::io::{self, Write};

/// Counts of what was written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjStats {
    pub objects: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub materials: usize,
}

fn material_name(color: Color) -> String {
    format!("color_{:06x}", color.hex())
}

/// Write every solid as its own `o` object
///
/// Solids are written with their placement applied and converted from
/// plan Z-up to Y-up. With `mtllib` set, each object references the
/// material for its color.
pub fn write_obj<W: Write>(group: &SceneGroup, mtllib: Option<&str>, out: &mut W) -> io::Result<ObjStats> {
    writeln!(out, "# Generated by floorplan-to-obj (floorplan3d)")?;
    writeln!(out, "# Solids: {}", group.len())?;
    writeln!(out, "# Coordinate system: Y-up (OBJ convention)")?;
    if let Some(mtllib) = mtllib {
        writeln!(out, "mtllib {}", mtllib)?;
    }
    writeln!(out)?;

    let mut stats = ObjStats {
        materials: distinct_colors(group).len(),
        ..ObjStats::default()
    };
    let mut per_kind = [0usize; 4];
    let mut vertex_offset = 0u32;

    for solid in group.solids() {
        let mesh = solid.world_mesh();

        let ordinal = &mut per_kind[solid.kind as usize];
        writeln!(out, "o {}_{}", solid.kind.as_str(), ordinal)?;
        *ordinal += 1;
        if mtllib.is_some() {
            writeln!(out, "usemtl {}", material_name(solid.color))?;
        }

        // OBJ X = X, OBJ Y = height, OBJ Z = -plan Y
        for p in mesh.positions.chunks_exact(3) {
            writeln!(out, "v {:.6} {:.6} {:.6}", p[0], p[2], -p[1])?;
        }
        for n in mesh.normals.chunks_exact(3) {
            writeln!(out, "vn {:.6} {:.6} {:.6}", n[0], n[2], -n[1])?;
        }
        // The axis change is a proper rotation, so winding is kept
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i + vertex_offset + 1);
            writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
        writeln!(out)?;

        vertex_offset += mesh.vertex_count() as u32;
        stats.objects += 1;
        stats.vertices += mesh.vertex_count();
        stats.triangles += mesh.triangle_count();
    }

    Ok(stats)
}

fn distinct_colors(group: &SceneGroup) -> BTreeSet<u32> {
    group.solids().iter().map(|s| s.color.hex()).collect()
}

/// Write one Phong material per distinct solid color
pub fn write_mtl<W: Write>(group: &SceneGroup, out: &mut W) -> io::Result<usize> {
    writeln!(out, "# Generated by floorplan-to-obj (floorplan3d)")?;
    let colors = distinct_colors(group);
    for hex in &colors {
        let color = Color::from_hex(*hex);
        let [r, g, b] = color.to_rgb_f32();
        writeln!(out)?;
        writeln!(out, "newmtl {}", material_name(color))?;
        writeln!(out, "Ka 0.000000 0.000000 0.000000")?;
        writeln!(out, "Kd {:.6} {:.6} {:.6}", r, g, b)?;
        writeln!(out, "Ks 0.066667 0.066667 0.066667")?;
        writeln!(out, "Ns 30")?;
        writeln!(out, "d 1")?;
        writeln!(out, "illum 2")?;
    }
    Ok(colors.len())
}
