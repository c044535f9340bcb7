use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// Plane `normal · p + distance = 0`. Points with a positive signed distance lie
/// on the side the normal points to.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, point: Vec3) -> Plane {
        let normal = normal.normalize_or_zero();
        Plane {
            normal,
            distance: -normal.dot(point),
        }
    }

    /// Plane through three points, normal following the counter-clockwise winding.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Plane {
        Plane::new((b - a).cross(c - a), a)
    }

    /// Plane from `ax + by + cz + d = 0` coefficients, normalized.
    pub fn from_coefficients(coefficients: Vec4) -> Plane {
        let length = coefficients.truncate().length();
        if length <= f32::EPSILON {
            return Plane {
                normal: Vec3::Y,
                distance: 0.0,
            };
        }
        Plane {
            normal: coefficients.truncate() / length,
            distance: coefficients.w / length,
        }
    }

    pub fn flip(&self) -> Plane {
        Plane {
            normal: -self.normal,
            distance: -self.distance,
        }
    }

    pub fn signed_distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}
