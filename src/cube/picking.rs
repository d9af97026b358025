//! Pointer rays and ray/box intersection

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::cubelet::{Axis, Face};
use super::transform::Transform;

/// Canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }

    /// Pixel coordinates (origin top-left, y down) to normalized device coordinates
    pub fn to_ndc(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(
            (x / self.width) * 2.0 - 1.0,
            1.0 - (y / self.height) * 2.0,
        )
    }
}

/// Perspective camera looking at a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    /// The hero view: looking at the cube from (6, 6, 6) with a 45° lens
    fn default() -> Self {
        Self::looking_at(Vec3::splat(6.0), Vec3::ZERO, Vec3::Y)
    }
}

impl Camera {
    pub fn looking_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            target,
            up,
            fov_y: 45f32.to_radians(),
            near: 0.1,
            far: 100.0,
        }
    }

    /// World-space viewing direction
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    /// Ray from the near plane through the given pixel
    pub fn ray_through(&self, x: f32, y: f32, viewport: Viewport) -> Ray {
        let ndc = viewport.to_ndc(x, y);
        let inv = (self.projection(viewport.aspect()) * self.view()).inverse();
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));
        Ray::new(near, far - near)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Where a ray enters a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxHit {
    /// Distance along the ray
    pub t: f32,
    /// Face entered, in the box's local frame
    pub face: Face,
}

/// Slab test against a cube of half-extent `half` placed by `world`.
///
/// Rays starting inside the box report no hit.
pub fn ray_box(ray: &Ray, world: &Transform, half: f32) -> Option<BoxHit> {
    let inv = world.inverse();
    let origin = inv.transform_point(ray.origin);
    let dir = inv.transform_vector(ray.dir);

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut entered = None;

    for axis in Axis::ALL {
        let i = axis as usize;
        let (o, d) = (origin[i], dir[i]);
        if d.abs() < 1e-8 {
            if o < -half || o > half {
                return None;
            }
            continue;
        }
        // Travelling toward +axis enters through the negative face
        let (t_enter, t_exit, face) = if d > 0.0 {
            ((-half - o) / d, (half - o) / d, Face::new(axis, -1))
        } else {
            ((half - o) / d, (-half - o) / d, Face::new(axis, 1))
        };
        if t_enter > t_near {
            t_near = t_enter;
            entered = Some(face);
        }
        t_far = t_far.min(t_exit);
    }

    let face = entered?;
    if t_near > t_far || t_near < 0.0 {
        return None;
    }
    Some(BoxHit { t: t_near, face })
}
