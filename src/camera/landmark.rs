use glam::{Mat4, Vec3};
use log::{debug, warn};

use crate::camera::{Camera, Easing};

/// Transitions stop early once eye and focal point are this close to the
/// target.
const LANDMARK_EPSILON: f32 = 0.01;

/// Named snapshot of a full camera pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    pub name: String,
    pub matrix: Mat4,
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
    pub position: Vec3,
    pub focal_point: Vec3,
    pub distance_vector: Vec3,
    pub distance: f32,
    pub dollying_step: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub roll: f32,
    pub zoom: f32,
}

/// Overrides for [`Camera::create_landmark`]. Unset fields are taken from the
/// camera.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LandmarkParams {
    pub position: Option<Vec3>,
    pub focal_point: Option<Vec3>,
    pub roll: Option<f32>,
    pub zoom: Option<f32>,
}

pub enum LandmarkTarget {
    Name(String),
    Landmark(Landmark),
}

impl From<&str> for LandmarkTarget {
    fn from(name: &str) -> Self {
        LandmarkTarget::Name(name.to_owned())
    }
}

impl From<String> for LandmarkTarget {
    fn from(name: String) -> Self {
        LandmarkTarget::Name(name)
    }
}

impl From<Landmark> for LandmarkTarget {
    fn from(landmark: Landmark) -> Self {
        LandmarkTarget::Landmark(landmark)
    }
}

impl From<&Landmark> for LandmarkTarget {
    fn from(landmark: &Landmark) -> Self {
        LandmarkTarget::Landmark(landmark.clone())
    }
}

/// How to get to a landmark. Unset duration and easing fall back to the
/// camera's configured defaults.
#[derive(Default)]
pub struct LandmarkOptions {
    /// Milliseconds. Zero jumps straight to the landmark.
    pub duration: Option<f64>,
    pub easing: Option<Easing>,
    pub on_frame: Option<Box<dyn FnMut(f32)>>,
    pub on_finish: Option<Box<dyn FnOnce()>>,
}

impl LandmarkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn on_frame(mut self, on_frame: impl FnMut(f32) + 'static) -> Self {
        self.on_frame = Some(Box::new(on_frame));
        self
    }

    pub fn on_finish(mut self, on_finish: impl FnOnce() + 'static) -> Self {
        self.on_finish = Some(Box::new(on_finish));
        self
    }
}

impl From<f64> for LandmarkOptions {
    fn from(duration: f64) -> Self {
        LandmarkOptions::new().duration(duration)
    }
}

#[derive(Debug, Copy, Clone)]
struct Pose {
    position: Vec3,
    focal_point: Vec3,
    roll: f32,
    zoom: f32,
}

/// In-flight transition driven by [`Camera::tick`].
pub(crate) struct LandmarkAnimation {
    target: Landmark,
    from: Pose,
    start_time: Option<f64>,
    duration: f64,
    easing: Easing,
    on_frame: Option<Box<dyn FnMut(f32)>>,
    on_finish: Option<Box<dyn FnOnce()>>,
}

impl Camera {
    /// Snapshots the current pose, with `params` overriding parts of it, and
    /// stores it under `name`. An existing landmark of that name is replaced.
    pub fn create_landmark(&mut self, name: impl Into<String>, params: LandmarkParams) -> Landmark {
        let mut scratch = Camera::new();
        scratch.set_type(self.camera_type);
        scratch.set_position(params.position.unwrap_or(self.position));
        scratch.set_focal_point(params.focal_point.unwrap_or(self.focal_point));
        scratch.set_roll(params.roll.unwrap_or(self.roll));
        scratch.set_zoom(params.zoom.unwrap_or(self.zoom));

        let landmark = Landmark {
            name: name.into(),
            matrix: scratch.matrix,
            right: scratch.right,
            up: scratch.up,
            forward: scratch.forward,
            position: scratch.position,
            focal_point: scratch.focal_point,
            distance_vector: scratch.distance_vector,
            distance: scratch.distance,
            dollying_step: scratch.dollying_step,
            azimuth: scratch.azimuth,
            elevation: scratch.elevation,
            roll: scratch.roll,
            zoom: scratch.zoom,
        };

        match self.landmarks.iter_mut().find(|l| l.name == landmark.name) {
            Some(existing) => *existing = landmark.clone(),
            None => self.landmarks.push(landmark.clone()),
        }
        landmark
    }

    pub fn get_landmark(&self, name: &str) -> Option<&Landmark> {
        self.landmarks.iter().find(|l| l.name == name)
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Starts a transition to a landmark, replacing any transition in flight.
    /// The replaced transition's `on_finish` is dropped without being called.
    ///
    /// Returns `false` when `target` names an unknown landmark.
    pub fn goto_landmark(
        &mut self,
        target: impl Into<LandmarkTarget>,
        options: impl Into<LandmarkOptions>,
    ) -> bool {
        let landmark = match target.into() {
            LandmarkTarget::Landmark(landmark) => landmark,
            LandmarkTarget::Name(name) => match self.get_landmark(&name) {
                Some(landmark) => landmark.clone(),
                None => {
                    warn!("no landmark named {:?}", name);
                    return false;
                }
            },
        };

        self.cancel_landmark_animation();

        let options = options.into();
        let duration = options.duration.unwrap_or(self.default_landmark_duration);
        if duration <= 0.0 {
            self.sync_from_landmark(&landmark);
            if let Some(on_finish) = options.on_finish {
                on_finish();
            }
            return true;
        }

        debug!("starting {}ms transition to landmark {:?}", duration, landmark.name);
        self.landmark_animation = Some(LandmarkAnimation {
            from: Pose {
                position: self.position,
                focal_point: self.focal_point,
                roll: self.roll,
                zoom: self.zoom,
            },
            target: landmark,
            start_time: None,
            duration,
            easing: options.easing.unwrap_or(self.default_landmark_easing),
            on_frame: options.on_frame,
            on_finish: options.on_finish,
        });
        true
    }

    /// Advances the landmark transition to `time` (milliseconds, any
    /// monotonic clock). The first tick after [`Camera::goto_landmark`] marks
    /// the start.
    pub fn tick(&mut self, time: f64) {
        let Some(mut animation) = self.landmark_animation.take() else {
            return;
        };

        let start_time = *animation.start_time.get_or_insert(time);
        let elapsed = time - start_time;
        if elapsed >= animation.duration {
            self.finish_landmark_animation(animation);
            return;
        }

        let t = animation.easing.apply((elapsed / animation.duration) as f32);
        let from = animation.from;
        let target = &animation.target;

        let focal_point = from.focal_point.lerp(target.focal_point, t);
        let position = from.position.lerp(target.position, t);
        self.apply_pose(Pose {
            position,
            focal_point,
            roll: from.roll * (1.0 - t) + target.roll * t,
            zoom: from.zoom * (1.0 - t) + target.zoom * t,
        });

        let remaining = focal_point.distance(target.focal_point) + position.distance(target.position);
        if remaining <= LANDMARK_EPSILON
            && self.roll == target.roll
            && self.zoom == target.zoom
        {
            self.finish_landmark_animation(animation);
            return;
        }

        if let Some(on_frame) = animation.on_frame.as_mut() {
            on_frame(t);
        }
        self.landmark_animation = Some(animation);
    }

    pub fn is_animating(&self) -> bool {
        self.landmark_animation.is_some()
    }

    /// Stops the transition in flight. The camera stays at its last
    /// interpolated pose and `on_finish` is not called.
    pub fn cancel_landmark_animation(&mut self) {
        if let Some(animation) = self.landmark_animation.take() {
            debug!("cancelled transition to landmark {:?}", animation.target.name);
        }
    }

    fn finish_landmark_animation(&mut self, animation: LandmarkAnimation) {
        self.sync_from_landmark(&animation.target);
        debug!("finished transition to landmark {:?}", animation.target.name);
        if let Some(on_finish) = animation.on_finish {
            on_finish();
        }
    }

    fn apply_pose(&mut self, pose: Pose) {
        self.position = pose.position;
        self.focal_point = pose.focal_point;
        self.update_distance();
        self.update_angles();
        self.roll = pose.roll;
        self.compute_matrix();
        self.update_axes();
        self.update();
        self.set_zoom(pose.zoom);
    }

    fn sync_from_landmark(&mut self, landmark: &Landmark) {
        self.matrix = landmark.matrix;
        self.right = landmark.right;
        self.up = landmark.up;
        self.forward = landmark.forward;
        self.position = landmark.position;
        self.focal_point = landmark.focal_point;
        self.distance_vector = landmark.distance_vector;
        self.distance = landmark.distance;
        self.dollying_step = landmark.dollying_step;
        self.azimuth = landmark.azimuth;
        self.elevation = landmark.elevation;
        self.roll = landmark.roll;
        self.update();
        self.set_zoom(landmark.zoom);
    }
}
