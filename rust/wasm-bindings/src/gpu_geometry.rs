// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GPU-ready export of the composed scene
//!
//! Every solid is flattened into one interleaved vertex buffer so a host
//! page can render the floor plan with its own pipeline:
//! - Interleaved (position + normal per vertex)
//! - Placement applied, then converted from plan Z-up to Y-up
//! - One metadata record per solid with its draw range and color
//!
//! ```javascript
//! const geom = viewer.gpuGeometry();
//! const memory = wasmModule.memory;
//! const vertices = new Float32Array(memory.buffer, geom.vertexDataPtr, geom.vertexDataLen);
//! gl.bufferData(gl.ARRAY_BUFFER, vertices, gl.STATIC_DRAW);
//! geom.free();
//! ```

use floorplan3d_scene::{Color, SceneGroup, SolidKind};
use wasm_bindgen::prelude::*;

/// Draw range and material of one solid within a [`GpuGeometry`]
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq)]
pub struct GpuSolidMetadata {
    kind: SolidKind,
    /// Index of the polygon in its input document, -1 for the floor
    source_index: i32,
    /// Offset in vertices (not floats)
    vertex_offset: u32,
    vertex_count: u32,
    index_offset: u32,
    index_count: u32,
    color: [f32; 4],
}

#[wasm_bindgen]
impl GpuSolidMetadata {
    /// "wall", "door", "window" or "floor"
    #[wasm_bindgen(getter)]
    pub fn kind(&self) -> String {
        self.kind.as_str().to_string()
    }

    #[wasm_bindgen(getter, js_name = sourceIndex)]
    pub fn source_index(&self) -> i32 {
        self.source_index
    }

    #[wasm_bindgen(getter, js_name = vertexOffset)]
    pub fn vertex_offset(&self) -> u32 {
        self.vertex_offset
    }

    #[wasm_bindgen(getter, js_name = vertexCount)]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[wasm_bindgen(getter, js_name = indexOffset)]
    pub fn index_offset(&self) -> u32 {
        self.index_offset
    }

    #[wasm_bindgen(getter, js_name = indexCount)]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// RGBA in [0, 1]
    #[wasm_bindgen(getter)]
    pub fn color(&self) -> Vec<f32> {
        self.color.to_vec()
    }
}

/// Interleaved geometry of the whole scene in WASM linear memory
///
/// Data layout:
/// - vertex_data: `[px, py, pz, nx, ny, nz, ...]` (6 floats per vertex)
/// - indices: triangle indices into vertex_data, already offset per solid
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct GpuGeometry {
    vertex_data: Vec<f32>,
    indices: Vec<u32>,
    solids: Vec<GpuSolidMetadata>,
}

#[wasm_bindgen]
impl GpuGeometry {
    /// Pointer to vertex data for a zero-copy view
    ///
    /// The view is only valid until the next WASM allocation.
    #[wasm_bindgen(getter, js_name = vertexDataPtr)]
    pub fn vertex_data_ptr(&self) -> *const f32 {
        self.vertex_data.as_ptr()
    }

    /// Length of vertex data in f32 elements
    #[wasm_bindgen(getter, js_name = vertexDataLen)]
    pub fn vertex_data_len(&self) -> usize {
        self.vertex_data.len()
    }

    #[wasm_bindgen(getter, js_name = indicesPtr)]
    pub fn indices_ptr(&self) -> *const u32 {
        self.indices.as_ptr()
    }

    #[wasm_bindgen(getter, js_name = indicesLen)]
    pub fn indices_len(&self) -> usize {
        self.indices.len()
    }

    /// Copy of the vertex data, for hosts that prefer owned arrays
    #[wasm_bindgen(js_name = vertexData)]
    pub fn vertex_data(&self) -> Vec<f32> {
        self.vertex_data.clone()
    }

    #[wasm_bindgen(js_name = indexData)]
    pub fn index_data(&self) -> Vec<u32> {
        self.indices.clone()
    }

    #[wasm_bindgen(getter, js_name = solidCount)]
    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    #[wasm_bindgen(getter, js_name = totalVertexCount)]
    pub fn total_vertex_count(&self) -> usize {
        self.vertex_data.len() / 6
    }

    #[wasm_bindgen(getter, js_name = totalTriangleCount)]
    pub fn total_triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[wasm_bindgen(js_name = getSolidMetadata)]
    pub fn get_solid_metadata(&self, index: usize) -> Option<GpuSolidMetadata> {
        self.solids.get(index).cloned()
    }

    #[wasm_bindgen(getter, js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.vertex_data.is_empty()
    }
}

impl GpuGeometry {
    /// Flatten every solid of the group
    pub fn from_group(group: &SceneGroup) -> Self {
        let vertices: usize = group.solids().iter().map(|s| s.mesh.vertex_count()).sum();
        let indices: usize = group.solids().iter().map(|s| s.mesh.indices.len()).sum();
        let mut geometry = Self {
            vertex_data: Vec::with_capacity(vertices * 6),
            indices: Vec::with_capacity(indices),
            solids: Vec::with_capacity(group.len()),
        };

        for solid in group.solids() {
            let mesh = solid.world_mesh();
            geometry.add_mesh(
                solid.kind,
                solid.source_index.map_or(-1, |i| i as i32),
                &mesh.positions,
                &mesh.normals,
                &mesh.indices,
                solid.color,
            );
        }
        geometry
    }

    /// Append a mesh, interleaving and converting coordinates
    fn add_mesh(
        &mut self,
        kind: SolidKind,
        source_index: i32,
        positions: &[f32],
        normals: &[f32],
        indices: &[u32],
        color: Color,
    ) {
        let vertex_count = positions.len() / 3;
        if vertex_count == 0 {
            return;
        }

        let vertex_offset = (self.vertex_data.len() / 6) as u32;
        let index_offset = self.indices.len() as u32;

        for (p, n) in positions.chunks_exact(3).zip(normals.chunks_exact(3)) {
            // Z-up to Y-up: (x, y, z) -> (x, z, -y)
            self.vertex_data.extend_from_slice(&[p[0], p[2], -p[1], n[0], n[2], -n[1]]);
        }
        self.indices
            .extend(indices.iter().map(|&i| i + vertex_offset));

        let [r, g, b] = color.to_rgb_f32();
        self.solids.push(GpuSolidMetadata {
            kind,
            source_index,
            vertex_offset,
            vertex_count: vertex_count as u32,
            index_offset,
            index_count: indices.len() as u32,
            color: [r, g, b, 1.0],
        });
    }
}
