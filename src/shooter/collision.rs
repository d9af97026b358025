//! Axis-aligned bounding box collision
//!
//! Entity counts stay in the tens, so every test is brute force and computed
//! fresh each tick.

use glam::Vec2;

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { min: pos, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// True when both extents intersect with no gap. Touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let right = Aabb::new(10.0, 0.0, 10.0, 10.0);
        let below = Aabb::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_gap_on_one_axis_is_a_miss() {
        // Horizontal overlap, vertical gap
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(2.0, 30.0, 4.0, 12.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = Aabb::new(0.0, 0.0, 100.0, 100.0);
        let inner = Aabb::new(40.0, 40.0, 4.0, 12.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_center() {
        let a = Aabb::new(50.0, -25.0, 25.0, 25.0);
        assert_eq!(a.center(), Vec2::new(62.5, -12.5));
    }
}
