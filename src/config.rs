use crate::camera::{ClipSpaceNearZ, Easing, ProjectionMode};

/// Defaults used when a camera is created for a canvas.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub clip_space_near_z: ClipSpaceNearZ,
    pub projection_mode: ProjectionMode,
    pub near: f32,
    pub far: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Milliseconds.
    pub landmark_duration: f64,
    pub landmark_easing: Easing,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            clip_space_near_z: ClipSpaceNearZ::NegativeOne,
            projection_mode: ProjectionMode::Orthographic,
            near: 0.1,
            far: 1000.0,
            fov: 30.0,
            min_distance: f32::NEG_INFINITY,
            max_distance: f32::INFINITY,
            landmark_duration: 100.0,
            landmark_easing: Easing::Linear,
        }
    }
}
