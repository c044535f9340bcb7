use glam::{Mat4, Vec4};
use log::trace;

use crate::camera::{Camera, ClipSpaceNearZ, ProjectionMode};
use crate::math::Frustum;

/// Sub-rectangle of a larger virtual viewport, for tiled rendering.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewOffset {
    pub full_width: f32,
    pub full_height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

/// Off-center perspective frustum, right handed. `top` may be below `bottom`.
fn perspective_off_center(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
    clip_space: ClipSpaceNearZ,
) -> Mat4 {
    let x = 2.0 * near / (right - left);
    let y = 2.0 * near / (top - bottom);
    let a = (right + left) / (right - left);
    let b = (top + bottom) / (top - bottom);
    let (c, d) = match clip_space {
        ClipSpaceNearZ::NegativeOne => (
            -(far + near) / (far - near),
            -2.0 * far * near / (far - near),
        ),
        ClipSpaceNearZ::Zero => (-far / (far - near), -far * near / (far - near)),
    };

    Mat4::from_cols(
        Vec4::new(x, 0.0, 0.0, 0.0),
        Vec4::new(0.0, y, 0.0, 0.0),
        Vec4::new(a, b, c, -1.0),
        Vec4::new(0.0, 0.0, d, 0.0),
    )
}

impl Camera {
    pub fn get_projection_mode(&self) -> ProjectionMode {
        self.projection_mode
    }

    /// Switches to a perspective projection. `fov` is vertical, in degrees.
    pub fn set_perspective(&mut self, near: f32, far: f32, fov: f32, aspect: f32) {
        self.projection_mode = ProjectionMode::Perspective;
        self.near = near;
        self.far = far;
        self.fov = fov;
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    /// Switches to an orthographic projection. Passing `bottom > top` flips
    /// the y axis, which is how canvas cameras get y pointing down.
    pub fn set_orthographic(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) {
        self.projection_mode = ProjectionMode::Orthographic;
        self.ortho_left = left;
        self.ortho_right = right;
        self.ortho_bottom = bottom;
        self.ortho_top = top;
        self.near = near;
        self.far = far;
        self.update_projection_matrix();
    }

    pub fn get_zoom(&self) -> f32 {
        self.zoom
    }

    /// Zoom factor, 1 being the unzoomed projection. Non-positive values are
    /// ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if !(zoom > 0.0) || !zoom.is_finite() {
            return;
        }
        self.zoom = zoom;
        self.update_projection_matrix();
    }

    pub fn get_fov(&self) -> f32 {
        self.fov
    }

    /// Only changes the projection in perspective mode.
    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
        self.update_projection_matrix();
    }

    pub fn get_aspect(&self) -> f32 {
        self.aspect
    }

    /// Only changes the projection in perspective mode.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    pub fn get_near(&self) -> f32 {
        self.near
    }

    pub fn set_near(&mut self, near: f32) {
        self.near = near;
        self.update_projection_matrix();
    }

    pub fn get_far(&self) -> f32 {
        self.far
    }

    pub fn set_far(&mut self, far: f32) {
        self.far = far;
        self.update_projection_matrix();
    }

    /// Renders only the `width` x `height` window at (`x`, `y`) of a
    /// `full_width` x `full_height` view.
    pub fn set_view_offset(
        &mut self,
        full_width: f32,
        full_height: f32,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) {
        self.view = Some(ViewOffset {
            full_width,
            full_height,
            offset_x: x,
            offset_y: y,
            width,
            height,
        });
        self.update_projection_matrix();
    }

    pub fn clear_view_offset(&mut self) {
        if self.view.take().is_some() {
            self.update_projection_matrix();
        }
    }

    pub fn get_view(&self) -> Option<&ViewOffset> {
        self.view.as_ref()
    }

    /// Projection including any jitter.
    pub fn get_perspective(&self) -> Mat4 {
        self.jittered_projection_matrix
            .unwrap_or(self.projection_matrix)
    }

    /// Inverse of the canonical (unjittered) projection.
    pub fn get_perspective_inverse(&self) -> Mat4 {
        self.projection_matrix_inverse
    }

    /// Offsets the projection by (`dx`, `dy`) in clip space. The canonical
    /// projection is left untouched and comes back with
    /// [`Camera::clear_jitter_projection_matrix`].
    pub fn jitter_projection_matrix(&mut self, dx: f32, dy: f32) {
        let translation = Mat4::from_translation(glam::Vec3::new(dx, dy, 0.0));
        self.jittered_projection_matrix = Some(translation * self.projection_matrix);
    }

    pub fn clear_jitter_projection_matrix(&mut self) {
        self.jittered_projection_matrix = None;
    }

    /// Unjittered projection times view.
    pub fn get_view_projection(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// Frustum of the current view and projection, cached until either
    /// changes.
    pub fn get_frustum(&self) -> Frustum {
        if let Some(frustum) = self.frustum.get() {
            return frustum;
        }
        trace!("recomputing camera frustum");
        let frustum = Frustum::from_view_projection(self.get_view_projection(), self.clip_space_near_z);
        self.frustum.set(Some(frustum));
        frustum
    }

    pub(crate) fn update_projection_matrix(&mut self) {
        self.projection_matrix = match self.projection_mode {
            ProjectionMode::Perspective => {
                // y is flipped to keep canvas coordinates pointing down.
                let mut top = self.near * (0.5 * self.fov).to_radians().tan() / self.zoom;
                let mut height = 2.0 * top;
                let mut width = self.aspect * height;
                let mut left = -0.5 * width;

                if let Some(view) = &self.view {
                    left += view.offset_x * width / view.full_width;
                    top -= view.offset_y * height / view.full_height;
                    width *= view.width / view.full_width;
                    height *= view.height / view.full_height;
                }

                perspective_off_center(
                    left,
                    left + width,
                    top - height,
                    top,
                    self.near,
                    self.far,
                    self.clip_space_near_z,
                ) * Mat4::from_scale(glam::Vec3::new(1.0, -1.0, 1.0))
            }
            ProjectionMode::Orthographic => {
                let dx = (self.ortho_right - self.ortho_left) / (2.0 * self.zoom);
                let dy = (self.ortho_top - self.ortho_bottom) / (2.0 * self.zoom);
                let cx = (self.ortho_right + self.ortho_left) / 2.0;
                let cy = (self.ortho_top + self.ortho_bottom) / 2.0;

                let mut left = cx - dx;
                let mut right = cx + dx;
                let mut top = cy + dy;
                let mut bottom = cy - dy;

                if let Some(view) = &self.view {
                    let scale_w = (self.ortho_right - self.ortho_left) / view.full_width / self.zoom;
                    let scale_h = (self.ortho_top - self.ortho_bottom) / view.full_height / self.zoom;
                    left += scale_w * view.offset_x;
                    right = left + scale_w * view.width;
                    top -= scale_h * view.offset_y;
                    bottom = top - scale_h * view.height;
                }

                match self.clip_space_near_z {
                    ClipSpaceNearZ::NegativeOne => {
                        Mat4::orthographic_rh_gl(left, right, bottom, top, self.near, self.far)
                    }
                    ClipSpaceNearZ::Zero => {
                        Mat4::orthographic_rh(left, right, bottom, top, self.near, self.far)
                    }
                }
            }
        };

        self.projection_matrix_inverse = self.projection_matrix.inverse();
        self.jittered_projection_matrix = None;
        self.frustum.set(None);
    }
}
