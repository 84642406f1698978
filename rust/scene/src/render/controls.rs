// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pointer-driven orbit around a fixed target

use super::camera::PerspectiveCamera;
use nalgebra::{Point3, Vector3};
use std::f64::consts::{PI, TAU};

/// Keeps the polar angle off the poles, where the view direction is parallel to up
const POLAR_EPSILON: f64 = 1e-6;

/// Orbit controls
///
/// Pointer input accumulates azimuth/polar deltas; [`OrbitControls::update`]
/// applies them to the camera. Dragging the full height of the element turns
/// the camera once around the target.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Point3<f64>,
    pub rotate_speed: f64,
    pub enabled: bool,
    viewport_height: f64,
    drag_from: Option<(f64, f64)>,
    delta_theta: f64,
    delta_phi: f64,
}

impl OrbitControls {
    pub fn new(target: Point3<f64>, rotate_speed: f64) -> Self {
        Self {
            target,
            rotate_speed,
            enabled: true,
            viewport_height: 1.0,
            drag_from: None,
            delta_theta: 0.0,
            delta_phi: 0.0,
        }
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        if height > 0 {
            self.viewport_height = height as f64;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if self.enabled {
            self.drag_from = Some((x, y));
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let Some((from_x, from_y)) = self.drag_from else {
            return;
        };
        let scale = TAU / self.viewport_height * self.rotate_speed;
        self.rotate_left((x - from_x) * scale);
        self.rotate_up((y - from_y) * scale);
        self.drag_from = Some((x, y));
    }

    pub fn pointer_up(&mut self) {
        self.drag_from = None;
    }

    pub fn rotate_left(&mut self, angle: f64) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f64) {
        self.delta_phi -= angle;
    }

    /// Apply pending rotation to the camera and aim it at the target
    ///
    /// Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let radius = offset.norm();

        let theta = offset.x.atan2(offset.z) + self.delta_theta;
        let phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };
        let phi = (phi + self.delta_phi).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        let offset = Vector3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let position = self.target + offset;

        let moved = (position - camera.position).norm() > 1e-9 || camera.target != self.target;
        camera.position = position;
        camera.target = self.target;

        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn setup() -> (OrbitControls, PerspectiveCamera) {
        let mut controls = OrbitControls::new(Point3::origin(), 1.0);
        controls.set_viewport_height(600);
        (controls, PerspectiveCamera::default())
    }

    #[test]
    fn test_idle_update_keeps_camera() {
        let (mut controls, mut camera) = setup();
        let before = camera.position;
        assert!(!controls.update(&mut camera));
        assert_relative_eq!(camera.position, before, epsilon = 1e-9);
    }

    #[test]
    fn test_half_height_drag_turns_half_circle() {
        let (mut controls, mut camera) = setup();
        controls.pointer_down(100.0, 300.0);
        controls.pointer_move(250.0, 300.0);
        controls.pointer_move(400.0, 300.0);
        controls.pointer_up();

        assert!(controls.update(&mut camera));
        assert_relative_eq!(camera.position, Point3::new(0.0, 100.0, -1500.0), epsilon = 1e-6);
        // Radius is preserved
        assert_relative_eq!(camera.distance(), (100.0f64.powi(2) + 1500.0f64.powi(2)).sqrt());
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let (mut controls, mut camera) = setup();
        controls.pointer_move(500.0, 500.0);
        assert!(!controls.update(&mut camera));

        controls.pointer_down(0.0, 0.0);
        controls.pointer_up();
        controls.pointer_move(300.0, 0.0);
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let (mut controls, mut camera) = setup();
        controls.pointer_down(0.0, 0.0);
        // Dragging down far enough would flip over the top
        controls.pointer_move(0.0, 2000.0);
        controls.update(&mut camera);

        let radius = camera.distance();
        assert!(camera.position.y > 0.0);
        assert_relative_eq!(camera.position.y, radius, epsilon = 1e-3);
        // Still a usable view matrix
        assert!(camera.view_matrix().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_disabled_controls_ignore_drag() {
        let (mut controls, mut camera) = setup();
        controls.enabled = false;
        controls.pointer_down(0.0, 0.0);
        assert!(!controls.is_dragging());
        controls.pointer_move(100.0, 0.0);
        assert!(!controls.update(&mut camera));
    }
}
