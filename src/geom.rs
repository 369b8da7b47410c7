//! Geometry Kernel
//!
//! Axis-aligned bounding boxes and the minimum-translation-vector (MTV)
//! computation that all collision resolution builds on. Coordinates are
//! screen space: x grows right, y grows down, so "falling" is +y and a
//! body pushed up out of a floor receives an MTV with positive y
//! (position -= mtv moves it upward).

use glam::Vec2;

use super::components::{Collider, Position};

/// An axis-aligned bounding box, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Box of a collider anchored at its parent's position.
    pub fn of_collider(parent_pos: &Position, collider: &Collider) -> Self {
        Self {
            min: parent_pos.0 + collider.offset,
            size: collider.size,
        }
    }

    /// Strict overlap test; touching edges do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && other.min.x < a_max.x
            && self.min.y < b_max.y
            && other.min.y < a_max.y
    }
}

/// Minimum translation vector separating `a` from `b`.
///
/// Returns None whenever the boxes do not overlap on both axes. Otherwise
/// the vector has exactly one non-zero component: subtracting it from
/// `a`'s position removes the overlap along the axis with the smaller
/// penetration. On an exact tie the vertical axis wins - gravity-aligned
/// resolution is visually stabler and avoids horizontal micro-jitter.
pub fn mtv(a: &Aabb, b: &Aabb) -> Option<Vec2> {
    if !a.overlaps(b) {
        return None;
    }

    let a_max = a.max();
    let b_max = b.max();

    // Push-out distances for both directions on both axes. Subtracting the
    // positive value moves `a` toward negative, the negative value toward
    // positive; both fully separate the pair along their axis.
    let push_left = a_max.x - b.min.x;
    let push_right = a.min.x - b_max.x;
    let push_up = a_max.y - b.min.y;
    let push_down = a.min.y - b_max.y;

    let x = if push_left.abs() <= push_right.abs() {
        push_left
    } else {
        push_right
    };
    let y = if push_up.abs() <= push_down.abs() {
        push_up
    } else {
        push_down
    };

    // Tie prefers vertical
    if y.abs() <= x.abs() {
        Some(Vec2::new(0.0, y))
    } else {
        Some(Vec2::new(x, 0.0))
    }
}
