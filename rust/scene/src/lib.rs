// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorplan3D Scene
//!
//! Turns floor plan polygons into a 3D scene:
//!
//! - [`loader`] fetches the wall, door and window documents through an
//!   [`AssetSource`] and composes each category as it arrives
//! - [`builder`] extrudes a polygon into a bevelled [`Solid`]
//! - [`composer`] places solids into the append-only [`SceneGroup`],
//!   including the floor slab under the walls
//! - [`render`] drives an orbit camera and hands frames to a [`Renderer`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use floorplan3d_scene::{load_scene, MemorySource, SceneContext, ViewerConfig};
//!
//! # async fn run() {
//! let config = ViewerConfig::default();
//! let source = MemorySource::new()
//!     .with("input/walls.json", "[[[0,0],[100,0],[100,100],[0,100]]]");
//!
//! let mut context = SceneContext::new(config.scene.clone());
//! let summary = load_scene(&source, &config.assets, &mut context, |_| {}).await;
//! println!("{} solids, {} categories failed", context.group.len(), summary.failed_count());
//! # }
//! ```

pub mod bounds;
pub mod builder;
pub mod composer;
pub mod config;
pub mod context;
pub mod loader;
pub mod render;
pub mod types;

pub use bounds::BoundingRectangle;
pub use builder::{build_solid, BuildError, Solid};
pub use composer::{ComposeReport, SceneComposer, SceneGroup};
pub use config::{
    AssetPaths, BevelConfig, CameraConfig, CategoryStyle, ConfigError, FloorStyle, LightConfig,
    SceneConfig, ViewerConfig,
};
pub use context::{CategoryStatus, LoadEvent, LoadState, SceneContext};
#[cfg(not(target_arch = "wasm32"))]
pub use loader::DirectorySource;
pub use loader::{load_polygons, load_scene, parse_polygons, AssetSource, LoadError, LoadSummary, MemorySource};
pub use render::{Frame, OrbitControls, PerspectiveCamera, PointLight, RenderDriver, Renderer};
pub use types::{Category, Color, ColorError, Point2D, Polygon, SolidKind};

// Re-export the geometry crate for hosts that only depend on this one
pub use floorplan3d_geometry as geometry;
