// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render driving: camera, orbit controls, light and the per-frame call
//!
//! Drawing itself is delegated to a [`Renderer`] so the same driver runs in
//! the browser and in tests.

mod camera;
mod controls;
mod driver;

pub use camera::{PerspectiveCamera, PointLight};
pub use controls::OrbitControls;
pub use driver::RenderDriver;

use crate::composer::SceneGroup;
use crate::types::Color;
use nalgebra::{Matrix4, Point3};

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub scene: &'a SceneGroup,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub camera_position: Point3<f32>,
    pub light: &'a PointLight,
    pub background: Color,
    /// Zero-based frame counter
    pub number: u64,
}

/// Backend that draws a [`Frame`]
pub trait Renderer {
    type Error;

    /// Viewport size in pixels changed
    fn resize(&mut self, width: u32, height: u32);

    fn render(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error>;
}
