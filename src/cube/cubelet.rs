//! Cubelets, grid coordinates and face colors

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::transform::Transform;

/// Sticker colors (0xRRGGBB)
pub mod colors {
    pub const RIGHT: u32 = 0x1976d2; // blue   (+X)
    pub const LEFT: u32 = 0x43a047; // green  (-X)
    pub const UP: u32 = 0xffffff; // white  (+Y)
    pub const DOWN: u32 = 0xfbc02d; // yellow (-Y)
    pub const FRONT: u32 = 0xd32f2f; // red    (+Z)
    pub const BACK: u32 = 0xff9800; // orange (-Z)
    pub const INTERNAL: u32 = 0x111111;
}

/// Principal axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// Axis with the largest absolute component, and that component's sign
    pub fn dominant(v: Vec3) -> (Axis, i8) {
        let a = v.abs();
        let (axis, component) = if a.x >= a.y && a.x >= a.z {
            (Axis::X, v.x)
        } else if a.y >= a.z {
            (Axis::Y, v.y)
        } else {
            (Axis::Z, v.z)
        };
        (axis, if component >= 0.0 { 1 } else { -1 })
    }
}

/// One of the six box faces, in mesh material order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    pub fn new(axis: Axis, sign: i8) -> Self {
        match (axis, sign >= 0) {
            (Axis::X, true) => Face::PosX,
            (Axis::X, false) => Face::NegX,
            (Axis::Y, true) => Face::PosY,
            (Axis::Y, false) => Face::NegY,
            (Axis::Z, true) => Face::PosZ,
            (Axis::Z, false) => Face::NegZ,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Face::PosX | Face::NegX => Axis::X,
            Face::PosY | Face::NegY => Axis::Y,
            Face::PosZ | Face::NegZ => Axis::Z,
        }
    }

    pub fn sign(self) -> i8 {
        match self {
            Face::PosX | Face::PosY | Face::PosZ => 1,
            _ => -1,
        }
    }

    pub fn normal(self) -> Vec3 {
        self.axis().unit() * self.sign() as f32
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Integer slot of a cubelet, each component in {-1, 0, 1}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i8,
    pub y: i8,
    pub z: i8,
}

impl GridCoord {
    pub fn new(x: i8, y: i8, z: i8) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> i8 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Nearest slot to a position in assembly space
    pub fn from_position(pos: Vec3, spacing: f32) -> Self {
        let q = (pos / spacing).round().clamp(Vec3::splat(-1.0), Vec3::ONE);
        Self::new(q.x as i8, q.y as i8, q.z as i8)
    }

    /// Center of this slot in assembly space
    pub fn position(&self, spacing: f32) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32) * spacing
    }

    /// All 27 slots, x-major
    pub fn all() -> impl Iterator<Item = GridCoord> {
        (-1..=1).flat_map(|x| (-1..=1).flat_map(move |y| (-1..=1).map(move |z| GridCoord::new(x, y, z))))
    }
}

/// Sticker color per face, indexed by [`Face::index`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceColors(pub [u32; 6]);

impl FaceColors {
    /// Colors for a cubelet in its solved slot: outward sides get their
    /// side's color, everything else is internal.
    pub fn for_slot(grid: GridCoord) -> Self {
        let pick = |on: bool, color: u32| if on { color } else { colors::INTERNAL };
        Self([
            pick(grid.x == 1, colors::RIGHT),
            pick(grid.x == -1, colors::LEFT),
            pick(grid.y == 1, colors::UP),
            pick(grid.y == -1, colors::DOWN),
            pick(grid.z == 1, colors::FRONT),
            pick(grid.z == -1, colors::BACK),
        ])
    }

    pub fn get(&self, face: Face) -> u32 {
        self.0[face.index()]
    }
}

/// One of the 27 pieces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cubelet {
    /// Stable identity, the slot it started in
    pub id: usize,
    /// Current slot
    pub grid: GridCoord,
    /// Transform relative to the current parent (assembly or turn pivot)
    pub local: Transform,
    pub faces: FaceColors,
}

impl Cubelet {
    pub fn new(id: usize, grid: GridCoord, spacing: f32) -> Self {
        Self {
            id,
            grid,
            local: Transform::from_translation(grid.position(spacing)),
            faces: FaceColors::for_slot(grid),
        }
    }

    /// Which local face currently points along `dir` (assembly space)
    pub fn face_pointing(&self, dir: Vec3) -> Face {
        Face::ALL
            .into_iter()
            .max_by(|a, b| {
                let da = self.local.transform_vector(a.normal()).dot(dir);
                let db = self.local.transform_vector(b.normal()).dot(dir);
                da.total_cmp(&db)
            })
            .unwrap_or(Face::PosX)
    }
}
