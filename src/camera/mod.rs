use std::cell::Cell;

use glam::{Mat4, Quat, Vec2, Vec3};
use log::debug;

use crate::config::CameraConfig;
use crate::math::Frustum;
use crate::scene_graph::VecInput;

pub mod easing;
pub mod interaction;
pub mod landmark;
pub mod projection;
pub mod viewport;

pub use easing::Easing;
pub use landmark::{Landmark, LandmarkOptions, LandmarkParams, LandmarkTarget};
pub use projection::ViewOffset;

use landmark::LandmarkAnimation;

/// Smallest distance the eye may have from the focal point.
pub const MIN_DISTANCE: f32 = 0.0002;

/// Depth range of clip space produced by the projection matrix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ClipSpaceNearZ {
    /// OpenGL / WebGL style, `[-1, 1]`.
    #[default]
    NegativeOne,
    /// WebGPU / Vulkan / D3D style, `[0, 1]`.
    Zero,
}

impl ClipSpaceNearZ {
    pub fn near_z(self) -> f32 {
        match self {
            ClipSpaceNearZ::NegativeOne => -1.0,
            ClipSpaceNearZ::Zero => 0.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Orthographic,
    Perspective,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CameraType {
    /// Orbits around the focal point. Elevation is limited to [-90, 90].
    #[default]
    Orbiting,
    /// Like orbiting, but rotations accumulate on the current orientation so
    /// the camera can go over the poles.
    Exploring,
    /// Rotates around the eye; the focal point follows.
    Tracking,
}

/// Placement, projection and landmark state of a scene camera.
///
/// `forward` points from the focal point towards the eye, so the camera looks
/// along `-forward`. Angles are in degrees. Positive elevation puts the eye
/// above the focal point.
pub struct Camera {
    camera_type: CameraType,

    /// Placement of the camera in world space. The view matrix is its inverse.
    matrix: Mat4,
    view_matrix: Mat4,
    right: Vec3,
    up: Vec3,
    forward: Vec3,

    position: Vec3,
    focal_point: Vec3,
    distance_vector: Vec3,
    distance: f32,
    dollying_step: f32,
    min_distance: f32,
    max_distance: f32,

    azimuth: f32,
    elevation: f32,
    roll: f32,

    projection_mode: ProjectionMode,
    clip_space_near_z: ClipSpaceNearZ,
    zoom: f32,
    near: f32,
    far: f32,
    fov: f32,
    aspect: f32,
    ortho_left: f32,
    ortho_right: f32,
    ortho_bottom: f32,
    ortho_top: f32,
    view: Option<ViewOffset>,
    projection_matrix: Mat4,
    projection_matrix_inverse: Mat4,
    jittered_projection_matrix: Option<Mat4>,
    frustum: Cell<Option<Frustum>>,

    viewport_size: Vec2,

    landmarks: Vec<Landmark>,
    landmark_animation: Option<LandmarkAnimation>,
    default_landmark_duration: f64,
    default_landmark_easing: Easing,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::with_config(&CameraConfig::default())
    }

    /// Camera at `(0, 0, 1)` looking at the origin, projection taken from
    /// `config`. Orthographic cameras start with a unit `[-1, 1]` volume.
    pub fn with_config(config: &CameraConfig) -> Self {
        let mut camera = Self {
            camera_type: CameraType::default(),
            matrix: Mat4::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            right: Vec3::X,
            up: Vec3::Y,
            forward: Vec3::Z,
            position: Vec3::new(0.0, 0.0, 1.0),
            focal_point: Vec3::ZERO,
            distance_vector: Vec3::new(0.0, 0.0, -1.0),
            distance: 1.0,
            dollying_step: 0.01,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            azimuth: 0.0,
            elevation: 0.0,
            roll: 0.0,
            projection_mode: config.projection_mode,
            clip_space_near_z: config.clip_space_near_z,
            zoom: 1.0,
            near: config.near,
            far: config.far,
            fov: config.fov,
            aspect: 1.0,
            ortho_left: -1.0,
            ortho_right: 1.0,
            ortho_bottom: -1.0,
            ortho_top: 1.0,
            view: None,
            projection_matrix: Mat4::IDENTITY,
            projection_matrix_inverse: Mat4::IDENTITY,
            jittered_projection_matrix: None,
            frustum: Cell::new(None),
            viewport_size: Vec2::ONE,
            landmarks: Vec::new(),
            landmark_animation: None,
            default_landmark_duration: config.landmark_duration,
            default_landmark_easing: config.landmark_easing,
        };
        camera.look_at_focal_point();
        camera.update_projection_matrix();
        camera
    }

    /// Camera for a `width` x `height` canvas: centered above it at z = 500
    /// with y pointing down, so canvas and world coordinates coincide at
    /// zoom 1.
    pub fn for_canvas(width: f32, height: f32, config: &CameraConfig) -> Self {
        let mut camera = Self::with_config(config);
        camera.set_viewport_size(width, height);
        camera.set_position((width / 2.0, height / 2.0, 500.0));
        camera.set_focal_point((width / 2.0, height / 2.0, 0.0));

        match config.projection_mode {
            ProjectionMode::Orthographic => camera.set_orthographic(
                -width / 2.0,
                width / 2.0,
                height / 2.0,
                -height / 2.0,
                config.near,
                config.far,
            ),
            ProjectionMode::Perspective => {
                camera.set_perspective(config.near, config.far, config.fov, width / height.max(1.0))
            }
        }

        camera
    }

    pub fn get_type(&self) -> CameraType {
        self.camera_type
    }

    pub fn set_type(&mut self, camera_type: CameraType) {
        if self.camera_type == camera_type {
            return;
        }
        self.camera_type = camera_type;
        self.look_at_focal_point();
    }

    pub fn get_position(&self) -> Vec3 {
        self.position
    }

    /// Moves the eye and turns it towards the focal point. A pair keeps the
    /// current z. Roll is preserved.
    pub fn set_position(&mut self, position: impl Into<VecInput>) {
        self.position = position.into().to_point(self.position);
        self.look_at_focal_point();
    }

    pub fn get_focal_point(&self) -> Vec3 {
        self.focal_point
    }

    pub fn set_focal_point(&mut self, focal_point: impl Into<VecInput>) {
        self.focal_point = focal_point.into().to_point(self.focal_point);
        self.look_at_focal_point();
    }

    pub fn get_distance(&self) -> f32 {
        self.distance
    }

    pub fn get_distance_vector(&self) -> Vec3 {
        self.distance_vector
    }

    /// Moves the eye along the current view direction so that it sits
    /// `distance` away from the focal point.
    ///
    /// Negative (or NaN) distances are ignored. Anything else is raised to
    /// [`MIN_DISTANCE`] and then clamped to the min/max distance.
    pub fn set_distance(&mut self, distance: f32) {
        if distance.is_nan() || distance < 0.0 {
            debug!("ignored negative camera distance {}", distance);
            return;
        }

        let clamped = distance
            .max(MIN_DISTANCE)
            .max(self.min_distance)
            .min(self.max_distance);
        if clamped != distance {
            debug!("camera distance {} clamped to {}", distance, clamped);
        }
        if clamped == self.distance {
            return;
        }

        self.distance = clamped;
        self.dollying_step = clamped / 100.0;
        self.position = self.focal_point + self.forward * clamped;
        self.distance_vector = self.focal_point - self.position;
        self.matrix.w_axis = self.position.extend(1.0);
        self.update();
    }

    pub fn get_min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Lower bound for later distance changes. The current distance is kept.
    pub fn set_min_distance(&mut self, min_distance: f32) {
        self.min_distance = min_distance;
    }

    pub fn get_max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn set_max_distance(&mut self, max_distance: f32) {
        self.max_distance = max_distance;
    }

    pub fn get_dollying_step(&self) -> f32 {
        self.dollying_step
    }

    pub fn get_azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn get_elevation(&self) -> f32 {
        self.elevation
    }

    pub fn get_roll(&self) -> f32 {
        self.roll
    }

    pub fn get_right(&self) -> Vec3 {
        self.right
    }

    pub fn get_up(&self) -> Vec3 {
        self.up
    }

    pub fn get_forward(&self) -> Vec3 {
        self.forward
    }

    /// Camera placement in world space.
    pub fn get_world_transform(&self) -> Mat4 {
        self.matrix
    }

    pub fn get_view_transform(&self) -> Mat4 {
        self.view_matrix
    }

    pub fn get_clip_space_near_z(&self) -> ClipSpaceNearZ {
        self.clip_space_near_z
    }

    pub fn set_clip_space_near_z(&mut self, clip_space_near_z: ClipSpaceNearZ) {
        self.clip_space_near_z = clip_space_near_z;
        self.update_projection_matrix();
    }

    /// Re-derives distance and angles from position and focal point, then
    /// rebuilds the camera matrix around them.
    fn look_at_focal_point(&mut self) {
        self.update_distance();
        self.update_angles();
        self.compute_matrix();
        self.update_axes();
        self.update();
    }

    fn update_distance(&mut self) {
        self.distance_vector = self.focal_point - self.position;
        self.distance = self.distance_vector.length();
        self.dollying_step = self.distance / 100.0;
    }

    fn update_angles(&mut self) {
        let v = self.distance_vector;
        let r = v.length();
        if r == 0.0 {
            self.elevation = 0.0;
            self.azimuth = 0.0;
            return;
        }

        let elevation = (v.y / r).clamp(-1.0, 1.0).asin().to_degrees();
        let azimuth = (-v.x).atan2(-v.z).to_degrees();
        match self.camera_type {
            CameraType::Tracking => {
                self.elevation = elevation;
                self.azimuth = azimuth;
            }
            CameraType::Orbiting | CameraType::Exploring => {
                self.elevation = -elevation;
                self.azimuth = -azimuth;
            }
        }
    }

    fn orientation(&self) -> Quat {
        let sign = match self.camera_type {
            CameraType::Tracking => 1.0,
            CameraType::Orbiting | CameraType::Exploring => -1.0,
        };
        Quat::from_rotation_y((sign * self.azimuth).to_radians())
            * Quat::from_rotation_x((sign * self.elevation).to_radians())
            * Quat::from_rotation_z(self.roll.to_radians())
    }

    fn compute_matrix(&mut self) {
        let rotation = Mat4::from_quat(self.orientation());
        self.matrix = match self.camera_type {
            CameraType::Orbiting | CameraType::Exploring => {
                Mat4::from_translation(self.focal_point)
                    * rotation
                    * Mat4::from_translation(Vec3::new(0.0, 0.0, self.distance))
            }
            CameraType::Tracking => Mat4::from_translation(self.position) * rotation,
        };
    }

    fn update_axes(&mut self) {
        self.right = self.matrix.x_axis.truncate().normalize_or_zero();
        self.up = self.matrix.y_axis.truncate().normalize_or_zero();
        self.forward = self.matrix.z_axis.truncate().normalize_or_zero();
    }

    /// Eye follows the matrix, distance is kept.
    fn update_position_from_matrix(&mut self) {
        self.position = self.matrix.w_axis.truncate();
        self.distance_vector = self.focal_point - self.position;
    }

    /// Focal point follows the matrix, distance is kept.
    fn update_focal_point_from_matrix(&mut self) {
        self.focal_point = self.position - self.forward * self.distance;
        self.distance_vector = self.focal_point - self.position;
    }

    /// Refreshes everything derived from the camera matrix.
    fn update(&mut self) {
        self.view_matrix = self.matrix.inverse();
        self.frustum.set(None);
    }
}

/// Camera matrices laid out for a GPU uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct CameraUniform {
    view_proj: Mat4,
    view: Mat4,
    projection: Mat4,
}

impl CameraUniform {
    pub fn new(camera: &Camera) -> Self {
        let mut uniform = Self::default();
        uniform.update(camera);
        uniform
    }

    /// Copies the current matrices. The projection includes any jitter.
    pub fn update(&mut self, camera: &Camera) {
        self.view = camera.get_view_transform();
        self.projection = camera.get_perspective();
        self.view_proj = self.projection * self.view;
    }

    pub fn view_proj(&self) -> Mat4 {
        self.view_proj
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
