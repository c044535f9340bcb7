use glam::{Mat4, Vec2, Vec3};

use crate::math::frustum::Frustum;

/// Axis-aligned bounding box stored as center + half extents.
///
/// Zero half extents are a valid point-sized box. "No content" is expressed
/// as `Option<Aabb>` by callers, never as a special box value.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    /// Zero-size box at the origin, reported for nodes without any bounds.
    pub const EMPTY: Aabb = Aabb {
        center: Vec3::ZERO,
        half_extents: Vec3::ZERO,
    };

    pub fn new(center: Vec3, half_extents: Vec3) -> Aabb {
        Aabb {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// Builds a box spanning two arbitrary corners, in any order.
    pub fn from_min_max(point1: Vec3, point2: Vec3) -> Aabb {
        let min = point1.min(point2);
        let max = point1.max(point2);
        Aabb {
            center: (min + max) * 0.5,
            half_extents: (max - min) * 0.5,
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Aabb> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Aabb::from_min_max(min, max))
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    pub fn size(&self) -> Vec3 {
        self.half_extents * 2.0
    }

    /// Per-axis min/max union.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::from_min_max(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// Union of every box, `None` when there are none.
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a Aabb>) -> Option<Aabb> {
        boxes.into_iter().copied().reduce(|acc, aabb| acc.union(&aabb))
    }

    /// Overlap of two boxes, `None` when they are disjoint. Boxes that only
    /// touch overlap in a zero-size box.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        let min = self.min().max(other.min());
        let max = self.max().min(other.max());
        if min.cmpgt(max).any() {
            return None;
        }
        Some(Aabb::from_min_max(min, max))
    }

    /// Grows the box by `amount` on every side.
    pub fn expand(&self, amount: Vec3) -> Aabb {
        Aabb::new(self.center, self.half_extents + amount)
    }

    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(self.center + offset, self.half_extents)
    }

    /// Tight AABB of this box after an affine transform.
    ///
    /// The new half extents are the old ones pushed through `|M|` (upper 3x3,
    /// component-wise absolute value), which avoids transforming all corners.
    pub fn transform(&self, matrix: &Mat4) -> Aabb {
        let center = matrix.transform_point3(self.center);
        let e = self.half_extents;
        let x = matrix.x_axis.truncate().abs() * e.x;
        let y = matrix.y_axis.truncate().abs() * e.y;
        let z = matrix.z_axis.truncate().abs() * e.z;
        Aabb::new(center, x + y + z)
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let min = self.min();
        let max = self.max();
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ]
    }

    pub fn intersects_frustum(&self, frustum: &Frustum) -> bool {
        let corners = self.corners();

        for plane in &frustum.planes {
            let mut outside = true;

            for corner in &corners {
                if plane.signed_distance_to_point(*corner) >= 0.0 {
                    outside = false;
                    break;
                }
            }

            if outside {
                return false;
            }
        }

        true
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x
            && point.x <= max.x
            && point.y >= min.y
            && point.y <= max.y
            && point.z >= min.z
            && point.z <= max.z
    }

    /// Containment test ignoring z, for flat 2D content.
    pub fn contains_point_2d(&self, point: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    pub fn abs_diff_eq(&self, other: &Aabb, max_abs_diff: f32) -> bool {
        self.center.abs_diff_eq(other.center, max_abs_diff)
            && self.half_extents.abs_diff_eq(other.half_extents, max_abs_diff)
    }
}

/// Top-left anchored rectangle, the `getBBox()` shape.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Rectangle {
        Rectangle {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

impl From<&Aabb> for Rectangle {
    fn from(aabb: &Aabb) -> Self {
        let min = aabb.min();
        let size = aabb.size();
        Rectangle::new(min.x, min.y, size.x, size.y)
    }
}
