use glam::{Mat4, Quat, Vec3};
use log::debug;

use crate::camera::{Camera, CameraType, MIN_DISTANCE};

/// Keeps angle inputs within one turn.
fn wrap_angle(angle: f32) -> f32 {
    if angle > 360.0 || angle < -360.0 {
        angle % 360.0
    } else {
        angle
    }
}

impl Camera {
    /// Moves eye and focal point together along the camera's right and up
    /// axes.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let delta = self.right * dx + self.up * dy;
        self.position += delta;
        self.focal_point += delta;
        self.matrix = Mat4::from_translation(delta) * self.matrix;
        self.update();
    }

    /// Moves the eye towards (negative) or away from (positive) the focal
    /// point by `value` dollying steps, one step being 1% of the distance at
    /// the time of the previous dolly.
    ///
    /// The resulting distance is clamped to the min/max distance and never
    /// reaches the focal point.
    pub fn dolly(&mut self, value: f32) {
        let requested = self.distance + value * self.dollying_step;
        let clamped = requested
            .max(self.min_distance)
            .min(self.max_distance)
            .max(MIN_DISTANCE);
        if clamped != requested {
            debug!("dolly distance {} clamped to {}", requested, clamped);
        }

        let step = clamped - self.distance;
        self.position += self.forward * step;
        self.matrix.w_axis = self.position.extend(1.0);

        match self.camera_type {
            CameraType::Orbiting | CameraType::Exploring => {
                self.distance_vector = self.focal_point - self.position;
                self.distance = clamped;
                self.dollying_step = clamped / 100.0;
            }
            CameraType::Tracking => {
                self.focal_point = self.position + self.distance_vector;
            }
        }

        self.update();
    }

    /// Rotates by relative angles in degrees. Azimuth turns about the world
    /// up axis, elevation tilts, roll spins about the view axis.
    ///
    /// Orbiting cameras refuse rotations that would take the elevation past
    /// the poles and stay where they are.
    pub fn rotate(&mut self, azimuth: f32, elevation: f32, roll: f32) {
        let azimuth = wrap_angle(azimuth);
        let elevation = wrap_angle(elevation);
        let roll = wrap_angle(roll);

        match self.camera_type {
            CameraType::Exploring => {
                self.azimuth += azimuth;
                self.elevation += elevation;
                self.roll += roll;

                let rotation = Quat::from_rotation_y((-azimuth).to_radians())
                    * Quat::from_rotation_x((-elevation).to_radians())
                    * Quat::from_rotation_z(roll.to_radians());
                let offset = Vec3::new(0.0, 0.0, self.distance);
                self.matrix = self.matrix
                    * Mat4::from_translation(-offset)
                    * Mat4::from_quat(rotation)
                    * Mat4::from_translation(offset);
            }
            CameraType::Orbiting | CameraType::Tracking => {
                let new_elevation = self.elevation + elevation;
                if self.camera_type == CameraType::Orbiting && new_elevation.abs() > 90.0 {
                    debug!("refused rotation to elevation {}", new_elevation);
                    return;
                }
                self.azimuth += azimuth;
                self.elevation = new_elevation;
                self.roll += roll;
                self.compute_matrix();
            }
        }

        self.follow_matrix();
    }

    pub fn set_azimuth(&mut self, azimuth: f32) {
        self.azimuth = wrap_angle(azimuth);
        self.compute_matrix();
        self.follow_matrix();
    }

    pub fn set_elevation(&mut self, elevation: f32) {
        self.elevation = wrap_angle(elevation);
        self.compute_matrix();
        self.follow_matrix();
    }

    pub fn set_roll(&mut self, roll: f32) {
        self.roll = wrap_angle(roll);
        self.compute_matrix();
        self.follow_matrix();
    }

    /// After the matrix changed: orbiting cameras move the eye, tracking
    /// cameras move the focal point.
    fn follow_matrix(&mut self) {
        self.update_axes();
        match self.camera_type {
            CameraType::Orbiting | CameraType::Exploring => self.update_position_from_matrix(),
            CameraType::Tracking => self.update_focal_point_from_matrix(),
        }
        self.update();
    }
}
