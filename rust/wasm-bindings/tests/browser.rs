// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer lifecycle tests, run with `wasm-pack test --headless --firefox`

#![cfg(target_arch = "wasm32")]

use floorplan3d_wasm::FloorPlanViewer;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_canvas(id: &str) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: HtmlCanvasElement = document.create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_id(id);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn test_missing_canvas_is_an_error() {
    assert!(FloorPlanViewer::new(Some("no-such-canvas".to_string())).is_err());
}

#[wasm_bindgen_test]
fn test_start_is_idempotent() {
    mount_canvas("plan-idempotent");
    let mut viewer = FloorPlanViewer::new(Some("plan-idempotent".to_string())).unwrap();
    assert!(!viewer.is_started());

    viewer.start().unwrap();
    assert!(viewer.is_started());
    viewer.start().unwrap();
    assert!(viewer.is_started());
}

#[wasm_bindgen_test]
fn test_failed_start_can_be_retried() {
    // A canvas already holding a 2D context cannot hand out WebGL2
    let canvas = mount_canvas("plan-2d");
    canvas.get_context("2d").unwrap();

    let mut viewer = FloorPlanViewer::new(Some("plan-2d".to_string())).unwrap();
    assert!(viewer.start().is_err());
    assert!(!viewer.is_started());
    assert!(viewer.start().is_err());
    assert!(!viewer.is_started());
    assert_eq!(viewer.solid_count(), 0);
}
