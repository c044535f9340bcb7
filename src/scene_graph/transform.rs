use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use std::cell::{Cell, Ref, RefCell};

/// Coordinate space a transform operation is expressed in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Space {
    /// Relative to the parent (or the node's own axes for translations).
    #[default]
    Local,
    /// Relative to the scene root; parent transforms are compensated for.
    World,
}

/// Loose vector argument accepted by the transform API.
///
/// A scalar, a pair or a triple all convert into this. How the missing
/// components are filled in depends on what the vector is used for, see
/// [`VecInput::to_offset`], [`VecInput::to_factor`] and [`VecInput::to_point`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VecInput {
    Scalar(f32),
    Pair(Vec2),
    Triple(Vec3),
}

impl VecInput {
    /// Translation delta: a scalar moves along x, a pair keeps z at 0.
    pub fn to_offset(self) -> Vec3 {
        match self {
            VecInput::Scalar(x) => Vec3::new(x, 0.0, 0.0),
            VecInput::Pair(v) => v.extend(0.0),
            VecInput::Triple(v) => v,
        }
    }

    /// Scale factor: a scalar is uniform, a pair leaves z untouched.
    pub fn to_factor(self) -> Vec3 {
        match self {
            VecInput::Scalar(s) => Vec3::splat(s),
            VecInput::Pair(v) => v.extend(1.0),
            VecInput::Triple(v) => v,
        }
    }

    /// Absolute value: missing components are taken from `current`.
    pub fn to_point(self, current: Vec3) -> Vec3 {
        match self {
            VecInput::Scalar(x) => Vec3::new(x, current.y, current.z),
            VecInput::Pair(v) => v.extend(current.z),
            VecInput::Triple(v) => v,
        }
    }

    /// Euler angles in degrees: a scalar rotates about z, as in 2D.
    pub fn to_euler(self) -> Vec3 {
        match self {
            VecInput::Scalar(z) => Vec3::new(0.0, 0.0, z),
            VecInput::Pair(v) => v.extend(0.0),
            VecInput::Triple(v) => v,
        }
    }

    /// Absolute scale: a scalar is uniform, a pair keeps the current z.
    pub fn to_scale(self, current: Vec3) -> Vec3 {
        match self {
            VecInput::Scalar(s) => Vec3::splat(s),
            VecInput::Pair(v) => v.extend(current.z),
            VecInput::Triple(v) => v,
        }
    }
}

impl From<f32> for VecInput {
    fn from(value: f32) -> Self {
        VecInput::Scalar(value)
    }
}

impl From<(f32, f32)> for VecInput {
    fn from((x, y): (f32, f32)) -> Self {
        VecInput::Pair(Vec2::new(x, y))
    }
}

impl From<[f32; 2]> for VecInput {
    fn from(value: [f32; 2]) -> Self {
        VecInput::Pair(Vec2::from(value))
    }
}

impl From<Vec2> for VecInput {
    fn from(value: Vec2) -> Self {
        VecInput::Pair(value)
    }
}

impl From<(f32, f32, f32)> for VecInput {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        VecInput::Triple(Vec3::new(x, y, z))
    }
}

impl From<[f32; 3]> for VecInput {
    fn from(value: [f32; 3]) -> Self {
        VecInput::Triple(Vec3::from(value))
    }
}

impl From<Vec3> for VecInput {
    fn from(value: Vec3) -> Self {
        VecInput::Triple(value)
    }
}

/// Euler angles in degrees to a quaternion.
pub fn quat_from_euler_degrees(angles: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        angles.x.to_radians(),
        angles.y.to_radians(),
        angles.z.to_radians(),
    )
}

pub fn euler_degrees_from_quat(rotation: Quat) -> Vec3 {
    let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Local TRS of a node plus its lazily rebuilt local and world matrices.
///
/// The local matrix is `T(position) * T(origin) * R * S * T(-origin)`, so
/// rotation and scale pivot around `origin`.
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    origin: Vec3,

    local_matrix: RefCell<Mat4>,
    world_matrix: RefCell<Mat4>,
    local_dirty: Cell<bool>,
    world_dirty: Cell<bool>,
    has_changed_since_last_update: Cell<bool>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_translation(Vec3::ZERO)
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            position: translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            origin: Vec3::ZERO,
            local_matrix: RefCell::new(Mat4::IDENTITY),
            world_matrix: RefCell::new(Mat4::IDENTITY),
            local_dirty: Cell::new(true),
            world_dirty: Cell::new(true),
            has_changed_since_last_update: Cell::new(true),
        }
    }

    /// Translation the pivot contributes for the current rotation and scale.
    fn pivot_offset(&self, origin: Vec3) -> Vec3 {
        origin - self.rotation * (self.scale * origin)
    }

    pub fn get_local_matrix(&self) -> Ref<'_, Mat4> {
        if self.local_dirty.get() {
            let matrix = Mat4::from_scale_rotation_translation(
                self.scale,
                self.rotation,
                self.position + self.pivot_offset(self.origin),
            );

            self.local_matrix.replace(matrix);
            self.local_dirty.set(false);
        }

        self.local_matrix.borrow()
    }

    /// Last computed world matrix. Only meaningful when not world-dirty.
    pub fn get_world_matrix(&self) -> Ref<'_, Mat4> {
        self.world_matrix.borrow()
    }

    pub fn set_world_matrix(&self, world_matrix: Mat4) {
        self.world_matrix.replace(world_matrix);
        self.world_dirty.set(false);
    }

    pub fn invalidate_local(&self) {
        self.local_dirty.set(true);
        self.invalidate_world();
    }

    pub fn invalidate_world(&self) {
        self.world_dirty.set(true);
        self.has_changed_since_last_update.set(true);
    }

    pub fn is_local_dirty(&self) -> bool {
        self.local_dirty.get()
    }

    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty.get()
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
        self.invalidate_local();
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.position = translation;
        self.invalidate_local();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.invalidate_local();
    }

    /// Moves the pivot without moving the node: the position absorbs the
    /// difference so the local matrix stays the same.
    pub fn set_origin(&mut self, origin: Vec3) {
        let translation = self.position + self.pivot_offset(self.origin);
        self.origin = origin;
        self.position = translation - self.pivot_offset(origin);
        self.invalidate_local();
    }

    /// Adds `delta` to the position, in parent space.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.invalidate_local();
    }

    /// Post-multiplies the rotation, i.e. rotates about the node's own axes.
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = (self.rotation * rotation).normalize();
        self.invalidate_local();
    }

    pub fn scale_by(&mut self, factor: Vec3) {
        self.scale *= factor;
        self.invalidate_local();
    }

    pub fn set_transform(&mut self, translation: Vec3, rotation: Quat, scale: Vec3) {
        self.position = translation;
        self.rotation = rotation.normalize();
        self.scale = scale;
        self.invalidate_local();
    }

    /// Sets the translation column of the local matrix, leaving rotation and
    /// scale alone.
    pub fn set_matrix_translation(&mut self, translation: Vec3) {
        self.position = translation - self.pivot_offset(self.origin);
        self.invalidate_local();
    }

    /// Decomposes `matrix` into TRS, keeping the current origin.
    pub fn set_local_matrix(&mut self, matrix: Mat4) {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        self.scale = scale;
        self.rotation = rotation.normalize();
        self.position = translation - self.pivot_offset(self.origin);
        self.invalidate_local();
    }

    /// Identity TRS; the origin is kept.
    pub fn reset(&mut self) {
        self.set_transform(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
    }

    pub fn translation(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn reset_flags(&self) {
        self.has_changed_since_last_update.set(false);
    }

    pub fn has_changed(&self) -> bool {
        self.has_changed_since_last_update.get()
    }
}
