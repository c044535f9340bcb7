pub mod aabb;
pub mod frustum;
pub mod plane;

pub use aabb::{Aabb, Rectangle};
pub use frustum::Frustum;
pub use plane::Plane;
