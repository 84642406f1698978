// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement of built solids inside the scene group

use nalgebra::{Matrix4, Rotation3, Vector3};

/// Position, Euler rotation and uniform scale of a solid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vector3<f64>,
    /// Euler angles in radians, applied in intrinsic X, Y, Z order
    pub rotation: Vector3<f64>,
    pub scale: f64,
}

impl Placement {
    /// Pure translation
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::default()
        }
    }

    /// Rotation matrix for the Euler angles
    pub fn rotation_matrix(&self) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), self.rotation.x)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.rotation.y)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.rotation.z)
    }

    /// Local-to-parent matrix: translate * rotate * scale
    pub fn matrix(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.position)
            * self.rotation_matrix().to_homogeneous()
            * Matrix4::new_scaling(self.scale)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_translation_only() {
        let placement = Placement::at(-750.0, -750.0, 160.0);
        let p = placement.matrix().transform_point(&Point3::new(10.0, 20.0, 0.0));
        assert_relative_eq!(p, Point3::new(-740.0, -730.0, 160.0));
        assert!(!placement.is_identity());
        assert!(Placement::default().is_identity());
    }

    #[test]
    fn test_scale_then_rotate_then_translate() {
        let placement = Placement {
            position: Vector3::new(1.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, FRAC_PI_2),
            scale: 2.0,
        };
        let p = placement.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        // (1,0,0) -> scaled (2,0,0) -> rotated (0,2,0) -> translated (1,2,0)
        assert_relative_eq!(p, Point3::new(1.0, 2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_euler_order_xyz() {
        let placement = Placement {
            rotation: Vector3::new(FRAC_PI_2, FRAC_PI_2, 0.0),
            ..Placement::default()
        };
        // Rx * Ry applied to +Z: Ry sends +Z to +X, Rx keeps +X
        let p = placement.matrix().transform_point(&Point3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(p, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }
}
