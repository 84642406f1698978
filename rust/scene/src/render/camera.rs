// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::config::{CameraConfig, LightConfig};
use crate::types::Color;
use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

/// Perspective camera looking at a target, Y up
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
}

impl PerspectiveCamera {
    pub fn from_config(config: &CameraConfig, aspect: f64) -> Self {
        let [px, py, pz] = config.position;
        let [tx, ty, tz] = config.target;
        Self {
            fov_deg: config.fov_deg,
            aspect,
            near: config.near,
            far: config.far,
            position: Point3::new(px, py, pz),
            target: Point3::new(tx, ty, tz),
            up: Vector3::y(),
        }
    }

    /// Update the aspect ratio for a viewport; zero-height viewports are ignored
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f64 / height as f64;
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f64> {
        Perspective3::new(self.aspect, self.fov_deg.to_radians(), self.near, self.far)
            .to_homogeneous()
    }

    pub fn view_projection(&self) -> Matrix4<f64> {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn distance(&self) -> f64 {
        (self.position - self.target).norm()
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 1.0)
    }
}

/// Point light carried along with the camera
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f64,
    pub position: Point3<f64>,
}

impl PointLight {
    pub fn from_config(config: &LightConfig) -> Self {
        Self {
            color: config.color,
            intensity: config.intensity,
            position: Point3::origin(),
        }
    }

    /// Move the light to the camera position
    pub fn follow(&mut self, camera: &PerspectiveCamera) {
        self.position = camera.position;
    }

    /// Color scaled by intensity, as shader input
    pub fn radiance(&self) -> [f32; 3] {
        let intensity = self.intensity as f32;
        self.color.to_rgb_f32().map(|c| c * intensity)
    }
}
