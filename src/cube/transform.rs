//! Rigid transforms and keep-world reparenting
//!
//! A two-level hierarchy (assembly -> optional pivot -> cubelet) is all the
//! cube needs, so transforms are plain values composed on demand.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rotation followed by translation (no scale)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation,
        }
    }

    /// `self * child`: express a child-space transform in this space
    pub fn mul_transform(&self, child: &Transform) -> Transform {
        Transform {
            translation: self.translation + self.rotation * child.translation,
            rotation: (self.rotation * child.rotation).normalize(),
        }
    }

    pub fn inverse(&self) -> Transform {
        let inv = self.rotation.inverse();
        Transform {
            translation: inv * -self.translation,
            rotation: inv,
        }
    }

    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.translation + self.rotation * p
    }

    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.rotation * v
    }

    /// Local transform under `new_parent` that keeps `world` unchanged.
    ///
    /// Both `world` and `new_parent` must be expressed in the same space.
    pub fn reparented(world: &Transform, new_parent: &Transform) -> Transform {
        new_parent.inverse().mul_transform(world)
    }

    /// Snap the rotation to the nearest axis-aligned orientation.
    ///
    /// Only meaningful for rotations that are already close to a multiple of
    /// 90 degrees about the principal axes.
    pub fn snap_rotation(&mut self) {
        let m = Mat3::from_quat(self.rotation);
        let snapped = Mat3::from_cols(m.x_axis.round(), m.y_axis.round(), m.z_axis.round());
        self.rotation = Quat::from_mat3(&snapped).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_compose_and_inverse() {
        let t = Transform {
            translation: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(0.7),
        };
        let round_trip = t.mul_transform(&t.inverse());
        assert!(approx(round_trip.translation, Vec3::ZERO));
        assert!(round_trip.rotation.angle_between(Quat::IDENTITY) < 1e-5);
    }

    #[test]
    fn test_transform_point() {
        let t = Transform {
            translation: Vec3::new(0.0, 1.0, 0.0),
            rotation: Quat::from_rotation_z(FRAC_PI_2),
        };
        // +X rotates to +Y, then lifted by 1
        assert!(approx(t.transform_point(Vec3::X), Vec3::new(0.0, 2.0, 0.0)));
        assert!(approx(t.transform_vector(Vec3::X), Vec3::Y));
    }

    #[test]
    fn test_reparent_keeps_world() {
        let child_world = Transform {
            translation: Vec3::new(1.05, 1.05, 0.0),
            rotation: Quat::from_rotation_x(0.3),
        };
        let pivot = Transform {
            translation: Vec3::new(1.05, 0.0, 0.0),
            rotation: Quat::from_rotation_x(1.1),
        };
        let local = Transform::reparented(&child_world, &pivot);
        let back = pivot.mul_transform(&local);
        assert!(approx(back.translation, child_world.translation));
        assert!(back.rotation.angle_between(child_world.rotation) < 1e-5);
    }

    #[test]
    fn test_snap_rotation() {
        let mut t = Transform::from_rotation(Quat::from_rotation_z(FRAC_PI_2 + 1e-3));
        t.snap_rotation();
        assert!(t.rotation.angle_between(Quat::from_rotation_z(FRAC_PI_2)) < 1e-6);
        assert!(approx(t.transform_vector(Vec3::X), Vec3::Y));
    }
}
