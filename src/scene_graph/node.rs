use id_arena::Id;

use crate::scene_graph::bounds::BoundsCache;
use crate::scene_graph::entity::Entity;
use crate::scene_graph::scene::Scene;
use crate::scene_graph::shape::Shape;
use crate::scene_graph::style::PaintStyle;
use crate::scene_graph::transform::Transform;

pub type NodeId = Id<Node>;

pub struct Node {
    pub name: String,
    pub(crate) entity: Entity,
    pub(crate) shape: Shape,
    pub(crate) style: PaintStyle,
    pub(crate) transform: Transform,
    pub(crate) bounds: BoundsCache,
    pub(crate) parent_id: Option<NodeId>,
    pub(crate) child_ids: Vec<NodeId>,
    /// Nodes whose `clip_path` points at this node.
    pub(crate) clip_dependents: Vec<NodeId>,
    pub(crate) visible: bool,
    pub(crate) destroyed: bool,
}

impl Node {
    pub(crate) fn new(entity: Entity, name: String, shape: Shape) -> Self {
        let bounds = BoundsCache::new(shape.geometry_bounds());
        Self {
            name,
            entity,
            shape,
            style: PaintStyle::default(),
            transform: Transform::default(),
            bounds,
            parent_id: None,
            child_ids: Vec::new(),
            clip_dependents: Vec::new(),
            visible: true,
            destroyed: false,
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn style(&self) -> &PaintStyle {
        &self.style
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    pub fn child_ids(&self) -> &[NodeId] {
        &self.child_ids
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn parent<'a>(&self, scene: &'a Scene) -> Option<&'a Node> {
        self.parent_id.and_then(|id| scene.get_node(id))
    }

    pub fn children<'a, 'b>(&'a self, scene: &'b Scene) -> impl Iterator<Item = &'b Node> + 'b
    where
        'a: 'b,
    {
        self.child_ids
            .iter()
            .filter_map(move |id| scene.get_node(*id))
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("entity", &self.entity)
            .field("kind", &self.shape.kind())
            .field("parent_id", &self.parent_id)
            .field("child_ids", &self.child_ids)
            .field("visible", &self.visible)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
