use bytemuck::{Pod, Zeroable};
use glam::{vec4, Mat4, Vec3, Vec4Swizzles};

use crate::camera::ClipSpaceNearZ;
use crate::math::plane::Plane;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Frustum {
    // Planes are in the order: left, right, bottom, top, near, far.
    // Normals point into the visible volume.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// World-space corners of the clip volume, near plane first.
    pub fn corners(view_projection: Mat4, clip_space: ClipSpaceNearZ) -> [Vec3; 8] {
        let near = clip_space.near_z();
        let corners: [glam::Vec4; 8] = [
            // Left - Bottom - Near
            vec4(-1.0, -1.0, near, 1.0),
            // Right - Bottom - Near
            vec4(1.0, -1.0, near, 1.0),
            // Left - Top - Near
            vec4(-1.0, 1.0, near, 1.0),
            // Right - Top - Near
            vec4(1.0, 1.0, near, 1.0),
            // Left - Bottom - Far
            vec4(-1.0, -1.0, 1.0, 1.0),
            // Right - Bottom - Far
            vec4(1.0, -1.0, 1.0, 1.0),
            // Left - Top - Far
            vec4(-1.0, 1.0, 1.0, 1.0),
            // Right - Top - Far
            vec4(1.0, 1.0, 1.0, 1.0),
        ];

        let inverse = view_projection.inverse();

        corners.map(|corner| {
            let mut corner = inverse * corner;
            corner = corner / corner.w;
            corner.xyz()
        })
    }

    /// Extracts the six planes from the rows of a view-projection matrix.
    ///
    /// Working on clip-space inequalities (`-w <= x <= w` and so on) keeps the
    /// planes facing inwards even when the projection flips an axis, as the
    /// y-down canvas camera does.
    pub fn from_view_projection(view_projection: Mat4, clip_space: ClipSpaceNearZ) -> Frustum {
        let r0 = view_projection.row(0);
        let r1 = view_projection.row(1);
        let r2 = view_projection.row(2);
        let r3 = view_projection.row(3);

        let near = match clip_space {
            ClipSpaceNearZ::NegativeOne => r3 + r2,
            ClipSpaceNearZ::Zero => r2,
        };

        let planes = [
            // Left
            Plane::from_coefficients(r3 + r0),
            // Right
            Plane::from_coefficients(r3 - r0),
            // Bottom
            Plane::from_coefficients(r3 + r1),
            // Top
            Plane::from_coefficients(r3 - r1),
            // Near
            Plane::from_coefficients(near),
            // Far
            Plane::from_coefficients(r3 - r2),
        ];

        Frustum { planes }
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance_to_point(point) >= 0.0)
    }
}
