use glam::{Vec2, Vec3};

use crate::camera::Camera;

impl Camera {
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_size = Vec2::new(width, height);
    }

    pub fn viewport_size(&self) -> Vec2 {
        self.viewport_size
    }

    /// Pixel position in the viewport (origin top-left, y down) to a point on
    /// the canvas plane z = 0, following the current zoom, pan and rotation.
    pub fn viewport_to_canvas(&self, point: Vec2) -> Vec2 {
        let size = self.viewport_size.max(Vec2::ONE);
        let ndc = Vec2::new(point.x / size.x * 2.0 - 1.0, (1.0 - point.y / size.y) * 2.0 - 1.0);
        let inverse = self.get_view_projection().inverse();

        let near = inverse.project_point3(ndc.extend(self.clip_space_near_z.near_z()));
        let far = inverse.project_point3(ndc.extend(1.0));
        let direction = far - near;
        if direction.z.abs() <= f32::EPSILON {
            // View ray parallel to the canvas.
            return inverse.project_point3(ndc.extend(0.0)).truncate();
        }

        let t = -near.z / direction.z;
        (near + direction * t).truncate()
    }

    /// Inverse of [`Camera::viewport_to_canvas`].
    pub fn canvas_to_viewport(&self, point: Vec2) -> Vec2 {
        let size = self.viewport_size;
        let ndc = self
            .get_view_projection()
            .project_point3(Vec3::new(point.x, point.y, 0.0));
        Vec2::new(
            (ndc.x + 1.0) / 2.0 * size.x,
            (1.0 - (ndc.y + 1.0) / 2.0) * size.y,
        )
    }
}
