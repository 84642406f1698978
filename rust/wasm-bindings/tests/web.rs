// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tests for the JS-facing API, run with `wasm-pack test --node`

#![cfg(target_arch = "wasm32")]

use floorplan3d_wasm::{extrude_polygons, version};
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn test_version() {
    assert_eq!(version(), env!("CARGO_PKG_VERSION"));
}

#[wasm_bindgen_test]
fn test_extrude_windows_twice() {
    let geometry = extrude_polygons("windows", "[[[0,0],[10,0],[10,20],[0,20]]]").unwrap();
    assert_eq!(geometry.solid_count(), 2);

    let sill = geometry.get_solid_metadata(0).unwrap();
    let head = geometry.get_solid_metadata(1).unwrap();
    assert_eq!(sill.kind(), "window");
    assert_eq!(head.source_index(), 0);
    assert_eq!(sill.vertex_count(), head.vertex_count());
}

#[wasm_bindgen_test]
fn test_extrude_rejects_unknown_category() {
    assert!(extrude_polygons("roofs", "[]").is_err());
}
