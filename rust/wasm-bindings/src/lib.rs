// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floorplan3D WebAssembly Bindings
//!
//! Browser viewer for floor plans: fetches the wall, door and window
//! documents, extrudes them and renders the scene with WebGL2 and orbit
//! controls.

use wasm_bindgen::prelude::*;

mod fetch;
mod gpu_geometry;
mod utils;
mod viewer;
mod webgl;

pub use fetch::HttpSource;
pub use gpu_geometry::{GpuGeometry, GpuSolidMetadata};
pub use utils::set_panic_hook as init_panic_hook;
pub use viewer::FloorPlanViewer;
pub use webgl::WebGlRenderer;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    utils::set_panic_hook();
}

/// Get the version of Floorplan3D
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extrude a JSON array of polygons with a category's default style
///
/// Returns the interleaved geometry without starting a viewer.
#[wasm_bindgen(js_name = extrudePolygons)]
pub fn extrude_polygons(category: &str, json: &str) -> Result<GpuGeometry, JsError> {
    let category = match category {
        "wall" | "walls" => floorplan3d_scene::Category::Wall,
        "door" | "doors" => floorplan3d_scene::Category::Door,
        "window" | "windows" => floorplan3d_scene::Category::Window,
        other => return Err(JsError::new(&format!("Unknown category '{}'", other))),
    };
    let polygons =
        floorplan3d_scene::parse_polygons(json).map_err(|e| JsError::new(&e.to_string()))?;

    let mut group = floorplan3d_scene::SceneGroup::new();
    floorplan3d_scene::SceneComposer::default().build_and_place(&mut group, category, &polygons);
    Ok(GpuGeometry::from_group(&group))
}
