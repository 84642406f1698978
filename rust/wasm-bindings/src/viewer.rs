// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Browser floor plan viewer
//!
//! ```javascript
//! import init, { FloorPlanViewer } from 'floorplan3d-wasm';
//!
//! await init();
//! const viewer = new FloorPlanViewer();
//! viewer.start();
//! // later
//! console.log(viewer.solidCount(), viewer.loadStatus());
//! ```

use crate::fetch::HttpSource;
use crate::gpu_geometry::GpuGeometry;
use crate::utils::{document, js_error_message, log_debug, log_info, log_warn, window, window_size};
use crate::webgl::WebGlRenderer;
use floorplan3d_scene::{load_polygons, Category, RenderDriver, SceneContext, ViewerConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent, PointerEvent};

/// Session state shared by the loaders, input listeners and frame loop
struct ViewerState {
    context: SceneContext,
    driver: Option<RenderDriver<WebGlRenderer>>,
}

/// Floor plan viewer bound to a canvas
#[wasm_bindgen]
pub struct FloorPlanViewer {
    config: ViewerConfig,
    canvas: HtmlCanvasElement,
    /// Whether the canvas fills the window and follows its size
    full_window: bool,
    base_url: String,
    state: Rc<RefCell<ViewerState>>,
    listeners: Vec<(EventTarget, &'static str, Closure<dyn FnMut(Event)>)>,
    started: bool,
}

#[wasm_bindgen]
impl FloorPlanViewer {
    /// Bind to the canvas with id `canvas_id`, or create a full-window one
    ///
    /// Without an id a canvas and the usage overlay are appended to the body.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: Option<String>) -> Result<FloorPlanViewer, JsValue> {
        let document = document()?;

        let (canvas, full_window) = match canvas_id {
            Some(id) => {
                let canvas: HtmlCanvasElement = document
                    .get_element_by_id(&id)
                    .ok_or_else(|| JsValue::from_str(&format!("Canvas '{}' not found", id)))?
                    .dyn_into()?;
                (canvas, false)
            }
            None => {
                let body = document
                    .body()
                    .ok_or_else(|| JsValue::from_str("Document has no body"))?;

                let info: HtmlElement = document.create_element("div")?.dyn_into()?;
                let style = info.style();
                style.set_property("position", "absolute")?;
                style.set_property("top", "10px")?;
                style.set_property("width", "100%")?;
                style.set_property("text-align", "center")?;
                info.set_inner_html("Simple procedurally-generated shapes<br/>Drag to spin");
                body.append_child(&info)?;

                let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
                canvas.style().set_property("display", "block")?;
                body.append_child(&canvas)?;
                (canvas, true)
            }
        };

        let config = ViewerConfig::default();
        let state = ViewerState {
            context: SceneContext::new(config.scene.clone()),
            driver: None,
        };

        Ok(Self {
            config,
            canvas,
            full_window,
            base_url: String::new(),
            state: Rc::new(RefCell::new(state)),
            listeners: Vec::new(),
            started: false,
        })
    }

    /// Replace the configuration with a JSON document; only before `start()`
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, json: &str) -> Result<(), JsError> {
        if self.started {
            return Err(JsError::new("Configuration cannot change after start()"));
        }
        let config = ViewerConfig::from_json_str(json).map_err(|e| JsError::new(&e.to_string()))?;
        self.state.borrow_mut().context = SceneContext::new(config.scene.clone());
        self.config = config;
        Ok(())
    }

    /// Resolve asset paths against this URL instead of the page
    #[wasm_bindgen(js_name = setBaseUrl)]
    pub fn set_base_url(&mut self, base_url: String) {
        self.base_url = base_url;
    }

    /// Start loading the plan documents and the frame loop
    ///
    /// A failed start leaves nothing behind, so calling it again is safe.
    /// The loads are spawned only once everything else is in place.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.started {
            return Ok(());
        }

        let (width, height) = self.viewport_size()?;
        let renderer = WebGlRenderer::new(self.canvas.clone())?;
        self.state.borrow_mut().driver =
            Some(RenderDriver::new(&self.config, renderer, width, height));

        if let Err(e) = self
            .install_listeners()
            .and_then(|_| start_frame_loop(Rc::clone(&self.state)))
        {
            self.remove_listeners();
            self.state.borrow_mut().driver = None;
            return Err(e);
        }

        self.started = true;
        self.spawn_loads();
        log_info(&format!("Viewer started at {}x{}", width, height));
        Ok(())
    }

    /// Whether `start()` has completed
    #[wasm_bindgen(js_name = isStarted)]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Solids currently in the scene
    #[wasm_bindgen(js_name = solidCount)]
    pub fn solid_count(&self) -> usize {
        self.state.borrow().context.group.len()
    }

    /// Whether every category has loaded or failed
    #[wasm_bindgen(js_name = isFullyLoaded)]
    pub fn is_fully_loaded(&self) -> bool {
        self.state.borrow().context.load_state().is_complete()
    }

    /// Per-category load status, e.g. `{ walls: { state: "loaded", solids: 5, skipped: 0 }, ... }`
    #[wasm_bindgen(js_name = loadStatus)]
    pub fn load_status(&self) -> Result<JsValue, JsValue> {
        let state = self.state.borrow();
        serde_wasm_bindgen::to_value(state.context.load_state()).map_err(JsValue::from)
    }

    /// Frames rendered so far
    #[wasm_bindgen(js_name = frameCount)]
    pub fn frame_count(&self) -> f64 {
        self.state
            .borrow()
            .driver
            .as_ref()
            .map_or(0.0, |d| d.frames() as f64)
    }

    /// Interleaved geometry of the current scene for custom rendering
    #[wasm_bindgen(js_name = gpuGeometry)]
    pub fn gpu_geometry(&self) -> GpuGeometry {
        GpuGeometry::from_group(&self.state.borrow().context.group)
    }

    /// Active configuration as JSON
    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.config).map_err(|e| JsError::new(&e.to_string()))
    }
}

impl FloorPlanViewer {
    fn viewport_size(&self) -> Result<(u32, u32), JsValue> {
        if self.full_window {
            Ok(window_size(&window()?))
        } else {
            Ok((self.canvas.client_width().max(1) as u32, self.canvas.client_height().max(1) as u32))
        }
    }

    /// One independent task per category; each composes on its own arrival
    fn spawn_loads(&self) {
        for category in Category::ALL {
            let state = Rc::clone(&self.state);
            let source = HttpSource::new(self.base_url.clone());
            let path = self.config.assets.path(category).to_string();

            spawn_local(async move {
                let result = load_polygons(&source, &path).await;
                if let Err(e) = &result {
                    log_warn(&format!("Failed to load {} from {}: {}", category, path, e));
                }
                let event = state.borrow_mut().context.apply_load(category, result);
                log_debug(&format!("{} load settled: {:?}", category, event.status));
            });
        }
    }

    fn listen(
        &mut self,
        target: EventTarget,
        name: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        self.listeners.push((target, name, closure));
        Ok(())
    }

    fn remove_listeners(&mut self) {
        for (target, name, closure) in self.listeners.drain(..) {
            if let Err(e) =
                target.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            {
                log_debug(&format!("Removing {} listener failed: {}", name, js_error_message(&e)));
            }
        }
    }

    fn install_listeners(&mut self) -> Result<(), JsValue> {
        let canvas: EventTarget = self.canvas.clone().into();

        let state = Rc::clone(&self.state);
        let canvas_el = self.canvas.clone();
        self.listen(canvas.clone(), "pointerdown", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                // Keep receiving moves when the pointer leaves the canvas mid-drag
                if let Some(pointer) = event.dyn_ref::<PointerEvent>() {
                    if let Err(e) = canvas_el.set_pointer_capture(pointer.pointer_id()) {
                        log_debug(&format!("Pointer capture failed: {}", js_error_message(&e)));
                    }
                }
                with_controls(&state, |c| c.pointer_down(event.offset_x() as f64, event.offset_y() as f64));
            }
        })?;

        let state = Rc::clone(&self.state);
        self.listen(canvas.clone(), "pointermove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                with_controls(&state, |c| c.pointer_move(event.offset_x() as f64, event.offset_y() as f64));
            }
        })?;

        for name in ["pointerup", "pointercancel"] {
            let state = Rc::clone(&self.state);
            self.listen(canvas.clone(), name, move |_| with_controls(&state, |c| c.pointer_up()))?;
        }

        let state = Rc::clone(&self.state);
        let target_canvas = self.canvas.clone();
        let full_window = self.full_window;
        let window = window()?;
        self.listen(window.clone().into(), "resize", move |_| {
            let (width, height) = if full_window {
                window_size(&window)
            } else {
                (
                    target_canvas.client_width().max(1) as u32,
                    target_canvas.client_height().max(1) as u32,
                )
            };
            if let Some(driver) = state.borrow_mut().driver.as_mut() {
                driver.resize(width, height);
            }
        })?;

        Ok(())
    }
}

impl Drop for FloorPlanViewer {
    fn drop(&mut self) {
        self.remove_listeners();
    }
}

fn with_controls(state: &Rc<RefCell<ViewerState>>, f: impl FnOnce(&mut floorplan3d_scene::OrbitControls)) {
    if let Some(driver) = state.borrow_mut().driver.as_mut() {
        f(driver.controls_mut());
    }
}

/// Render every animation frame until the page goes away
fn start_frame_loop(state: Rc<RefCell<ViewerState>>) -> Result<(), JsValue> {
    let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&callback);

    *callback.borrow_mut() = Some(Closure::new(move || {
        {
            let mut guard = state.borrow_mut();
            let ViewerState { context, driver } = &mut *guard;
            if let Some(driver) = driver.as_mut() {
                if let Err(e) = driver.frame(&context.group) {
                    log_warn(&format!("Frame failed: {}", js_error_message(&e)));
                }
            }
        }

        if let Some(closure) = next.borrow().as_ref() {
            if let Err(e) = request_animation_frame(closure) {
                log_warn(&format!("Frame loop stopped: {}", js_error_message(&e)));
            }
        }
    }));

    let result = match callback.borrow().as_ref() {
        Some(closure) => request_animation_frame(closure).map(|_| ()),
        None => Err(JsValue::from_str("Frame callback missing")),
    };
    result
}

fn request_animation_frame(closure: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    window()?.request_animation_frame(closure.as_ref().unchecked_ref())
}
