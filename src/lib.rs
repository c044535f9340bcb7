//! Retained-mode scene graph: node tree, lazily composed transforms, cached
//! bounding volumes and a scene camera.

pub mod camera;
pub mod config;
pub mod math;
pub mod scene_graph;

pub use camera::{
    Camera, CameraType, CameraUniform, ClipSpaceNearZ, Easing, Landmark, LandmarkOptions,
    LandmarkParams, ProjectionMode,
};
pub use config::CameraConfig;
pub use math::{Aabb, Frustum, Plane, Rectangle};
pub use scene_graph::{
    Attribute, Filter, Node, NodeId, Scene, SceneError, SceneResult, Shape, Space, VecInput,
};
