pub mod bounds;
pub mod entity;
pub mod error;
pub mod node;
pub mod scene;
pub mod shape;
pub mod style;
pub mod transform;

pub use bounds::BoundsCache;
pub use entity::{Entity, EntityCounter};
pub use error::SceneError;
pub use node::{Node, NodeId};
pub use scene::{Scene, SceneResult};
pub use shape::Shape;
pub use style::{Attribute, AttributeKind, Filter, PaintStyle};
pub use transform::{Space, Transform, VecInput};
