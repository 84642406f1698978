// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::camera::{PerspectiveCamera, PointLight};
use super::controls::OrbitControls;
use super::{Frame, Renderer};
use crate::composer::SceneGroup;
use crate::config::ViewerConfig;
use crate::types::Color;
use nalgebra::Matrix4;

/// Owns the camera, controls, light and renderer, and produces frames
///
/// Every call to [`RenderDriver::frame`] renders, whether or not anything
/// changed since the previous one.
pub struct RenderDriver<R: Renderer> {
    camera: PerspectiveCamera,
    controls: OrbitControls,
    light: PointLight,
    background: Color,
    renderer: R,
    frames: u64,
}

impl<R: Renderer> RenderDriver<R> {
    pub fn new(config: &ViewerConfig, mut renderer: R, width: u32, height: u32) -> Self {
        let mut camera = PerspectiveCamera::from_config(&config.camera, 1.0);
        camera.set_aspect(width, height);

        let mut controls = OrbitControls::new(camera.target, config.camera.rotate_speed);
        controls.set_viewport_height(height);

        let mut light = PointLight::from_config(&config.light);
        light.follow(&camera);

        renderer.resize(width, height);

        Self {
            camera,
            controls,
            light,
            background: config.background,
            renderer,
            frames: 0,
        }
    }

    /// Advance the controls and render the scene once
    pub fn frame(&mut self, scene: &SceneGroup) -> Result<(), R::Error> {
        self.controls.update(&mut self.camera);
        self.light.follow(&self.camera);

        let frame = Frame {
            scene,
            view: self.camera.view_matrix().cast::<f32>(),
            projection: self.camera.projection_matrix().cast::<f32>(),
            camera_position: self.camera.position.cast::<f32>(),
            light: &self.light,
            background: self.background,
            number: self.frames,
        };
        self.renderer.render(&frame)?;
        self.frames += 1;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
        self.controls.set_viewport_height(height);
        self.renderer.resize(width, height);
        tracing::debug!(width, height, "Viewport resized");
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn light(&self) -> &PointLight {
        &self.light
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.camera.view_projection().cast::<f32>()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::SceneComposer;
    use crate::types::{Category, Polygon};
    use nalgebra::Point3;

    #[derive(Default)]
    struct RecordingRenderer {
        size: (u32, u32),
        frames: Vec<(u64, usize, Point3<f32>)>,
        fail: bool,
    }

    impl Renderer for RecordingRenderer {
        type Error = String;

        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }

        fn render(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error> {
            if self.fail {
                return Err("context lost".to_string());
            }
            assert_eq!(frame.light.position.cast::<f32>(), frame.camera_position);
            self.frames
                .push((frame.number, frame.scene.len(), frame.camera_position));
            Ok(())
        }
    }

    #[test]
    fn test_renders_every_frame() {
        let config = ViewerConfig::default();
        let mut driver = RenderDriver::new(&config, RecordingRenderer::default(), 800, 600);
        assert_eq!(driver.renderer().size, (800, 600));

        let mut group = SceneGroup::new();
        driver.frame(&group).unwrap();
        driver.frame(&group).unwrap();

        // Solids appended between frames show up in the next one
        SceneComposer::new(config.scene.clone()).build_and_place(
            &mut group,
            Category::Door,
            &[Polygon::from_coords(&[[0.0, 0.0], [10.0, 0.0], [10.0, 5.0]])],
        );
        driver.frame(&group).unwrap();

        let seen: Vec<(u64, usize)> = driver.renderer().frames.iter().map(|f| (f.0, f.1)).collect();
        assert_eq!(seen, vec![(0, 0), (1, 0), (2, 1)]);
        assert_eq!(driver.frames(), 3);
    }

    #[test]
    fn test_drag_moves_camera_between_frames() {
        let mut driver =
            RenderDriver::new(&ViewerConfig::default(), RecordingRenderer::default(), 800, 600);
        let group = SceneGroup::new();
        driver.frame(&group).unwrap();

        let controls = driver.controls_mut();
        controls.pointer_down(0.0, 0.0);
        controls.pointer_move(150.0, 0.0);
        driver.frame(&group).unwrap();

        let frames = &driver.renderer().frames;
        assert_ne!(frames[0].2, frames[1].2);
        assert_eq!(driver.light().position, driver.camera().position);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut driver =
            RenderDriver::new(&ViewerConfig::default(), RecordingRenderer::default(), 800, 600);
        driver.resize(1000, 500);
        assert!((driver.camera().aspect - 2.0).abs() < 1e-12);
        assert_eq!(driver.renderer().size, (1000, 500));
    }

    #[test]
    fn test_render_error_propagates() {
        let renderer = RecordingRenderer {
            fail: true,
            ..Default::default()
        };
        let mut driver = RenderDriver::new(&ViewerConfig::default(), renderer, 10, 10);
        assert_eq!(driver.frame(&SceneGroup::new()), Err("context lost".to_string()));
        assert_eq!(driver.frames(), 0);
    }
}
