use glam::{Mat4, Quat, Vec2, Vec3};
use id_arena::Arena;
use log::{debug, trace};
use std::sync::Arc;

use crate::math::{Aabb, Frustum, Rectangle};
use crate::scene_graph::entity::{Entity, EntityCounter};
use crate::scene_graph::error::SceneError;
use crate::scene_graph::node::{Node, NodeId};
use crate::scene_graph::shape::Shape;
use crate::scene_graph::style::{Attribute, AttributeKind};
use crate::scene_graph::transform::{
    euler_degrees_from_quat, quat_from_euler_degrees, Space, VecInput,
};

pub type SceneResult<T> = Result<T, SceneError>;

/// Owns every node and keeps world transforms and bounds coherent.
///
/// Mutations mark caches dirty right away; reads rebuild whatever is stale
/// on the way up (transforms) or down (bounds) the tree.
pub struct Scene {
    pub(crate) objects: Arena<Node>,
    entity_counter: Arc<EntityCounter>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::with_entity_counter(EntityCounter::global())
    }

    pub fn with_entity_counter(entity_counter: Arc<EntityCounter>) -> Self {
        Self {
            objects: Arena::new(),
            entity_counter,
        }
    }

    // ------------------------------------------------------------------
    // Tree structure
    // ------------------------------------------------------------------

    pub fn create_node(&mut self, name: impl Into<String>, shape: Shape) -> NodeId {
        let entity = self.entity_counter.next();
        let id = self.objects.alloc(Node::new(entity, name.into(), shape));
        trace!("created node {:?} (entity {})", id, entity);
        id
    }

    pub fn create_group(&mut self, name: impl Into<String>) -> NodeId {
        self.create_node(name, Shape::Group)
    }

    /// Live node lookup; destroyed nodes are hidden.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.objects.get(id).filter(|node| !node.destroyed)
    }

    pub fn get_node_by_name(&self, name: &str) -> Option<NodeId> {
        self.objects
            .iter()
            .find(|(_, node)| !node.destroyed && node.name == name)
            .map(|(id, _)| id)
    }

    pub fn node_count(&self) -> usize {
        self.objects.iter().filter(|(_, node)| !node.destroyed).count()
    }

    fn node(&self, id: NodeId) -> SceneResult<&Node> {
        match self.objects.get(id) {
            None => Err(SceneError::NodeNotFound(id)),
            Some(node) if node.destroyed => Err(SceneError::NodeDestroyed(id)),
            Some(node) => Ok(node),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> SceneResult<&mut Node> {
        match self.objects.get_mut(id) {
            None => Err(SceneError::NodeNotFound(id)),
            Some(node) if node.destroyed => Err(SceneError::NodeDestroyed(id)),
            Some(node) => Ok(node),
        }
    }

    pub fn entity(&self, id: NodeId) -> SceneResult<Entity> {
        Ok(self.node(id)?.entity)
    }

    pub fn parent(&self, id: NodeId) -> SceneResult<Option<NodeId>> {
        Ok(self.node(id)?.parent_id)
    }

    pub fn children(&self, id: NodeId) -> SceneResult<&[NodeId]> {
        Ok(&self.node(id)?.child_ids)
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let parent_of = move |id: NodeId| self.objects.get(id).and_then(|node| node.parent_id);
        std::iter::successors(parent_of(id), move |&id| parent_of(id))
    }

    /// Live nodes without a parent, in creation order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.objects
            .iter()
            .filter(|(_, node)| node.parent_id.is_none() && !node.destroyed)
            .map(|(id, _)| id)
    }

    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> SceneResult<()> {
        let len = self.node(parent_id)?.child_ids.len();
        self.insert_child(parent_id, len, child_id)
    }

    /// Attaches `child_id` at `index` (clamped), detaching it from any
    /// previous parent first. Local TRS is kept as is.
    pub fn insert_child(
        &mut self,
        parent_id: NodeId,
        index: usize,
        child_id: NodeId,
    ) -> SceneResult<()> {
        self.node(parent_id)?;
        self.node(child_id)?;

        if parent_id == child_id || self.ancestors(parent_id).any(|id| id == child_id) {
            return Err(SceneError::CycleDetected {
                parent: parent_id,
                child: child_id,
            });
        }

        self.detach(child_id)?;

        let parent = self.node_mut(parent_id)?;
        let index = index.min(parent.child_ids.len());
        parent.child_ids.insert(index, child_id);
        self.node_mut(child_id)?.parent_id = Some(parent_id);

        self.dirtify_world(child_id);
        Ok(())
    }

    pub fn remove_child(&mut self, parent_id: NodeId, child_id: NodeId) -> SceneResult<()> {
        self.node(parent_id)?;
        if self.node(child_id)?.parent_id != Some(parent_id) {
            return Err(SceneError::NotAChild {
                parent: parent_id,
                child: child_id,
            });
        }
        self.detach(child_id)
    }

    /// Makes `id` a root without destroying it. Its local TRS becomes its
    /// world TRS; nothing accumulated from the old parent is baked in.
    pub fn detach(&mut self, id: NodeId) -> SceneResult<()> {
        let Some(old_parent) = self.node(id)?.parent_id else {
            return Ok(());
        };

        if let Some(parent) = self.objects.get_mut(old_parent) {
            parent.child_ids.retain(|&child| child != id);
        }
        self.node_mut(id)?.parent_id = None;

        self.dirtify_to_root(Some(old_parent));
        self.dirtify_world(id);
        Ok(())
    }

    /// Destroys `id` and its whole subtree. Caches are dropped and the ids
    /// are rejected from now on.
    pub fn destroy(&mut self, id: NodeId) -> SceneResult<()> {
        self.detach(id)?;

        let mut stack = vec![id];
        let mut subtree = Vec::new();
        while let Some(current) = stack.pop() {
            if let Some(node) = self.objects.get(current) {
                stack.extend(node.child_ids.iter().copied());
                subtree.push(current);
            }
        }

        for &current in &subtree {
            let (clip, dependents) = match self.objects.get_mut(current) {
                Some(node) => (
                    node.style.clip_path.take(),
                    std::mem::take(&mut node.clip_dependents),
                ),
                None => continue,
            };

            if let Some(clip) = clip.and_then(|clip| self.objects.get_mut(clip)) {
                clip.clip_dependents.retain(|&dependent| dependent != current);
            }

            for dependent in dependents {
                if let Some(node) = self.objects.get_mut(dependent) {
                    node.style.clip_path = None;
                }
                self.dirtify_render(dependent);
            }
        }

        for &current in &subtree {
            if let Some(node) = self.objects.get_mut(current) {
                node.destroyed = true;
                node.parent_id = None;
                node.child_ids.clear();
                node.bounds.clear();
            }
        }

        debug!("destroyed {} node(s) rooted at {:?}", subtree.len(), id);
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> SceneResult<bool> {
        let node = self.node_mut(id)?;
        if node.visible == visible {
            return Ok(false);
        }
        node.visible = visible;
        let parent = node.parent_id;
        self.dirtify_to_root(parent);
        Ok(true)
    }

    pub fn is_visible(&self, id: NodeId) -> SceneResult<bool> {
        Ok(self.node(id)?.visible)
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Pushes a resolved style value. Returns whether anything changed;
    /// invalid values and attributes the shape does not have are ignored.
    pub fn set_attribute(&mut self, id: NodeId, attribute: Attribute) -> SceneResult<bool> {
        let kind = attribute.kind();
        match attribute {
            Attribute::ClipPath(clip) => self.set_clip_path(id, clip),
            Attribute::Transform(matrix) => {
                self.set_local_transform(id, matrix)?;
                Ok(true)
            }
            Attribute::TransformOrigin(origin) => {
                self.set_origin(id, origin)?;
                Ok(true)
            }
            Attribute::Visible(visible) => self.set_visible(id, visible),
            attribute if kind == AttributeKind::Geometry => {
                let node = self.node_mut(id)?;
                if !node.shape.apply(attribute) {
                    debug!(
                        "ignored geometry attribute on {} node {:?}",
                        node.shape.kind(),
                        id
                    );
                    return Ok(false);
                }
                let geometry = node.shape.geometry_bounds();
                node.bounds.set_geometry(geometry);
                self.dirtify_geometry(id);
                Ok(true)
            }
            attribute => {
                let node = self.node_mut(id)?;
                if !node.style.apply(attribute) {
                    debug!("ignored paint attribute on node {:?}", id);
                    return Ok(false);
                }
                self.dirtify_render(id);
                Ok(true)
            }
        }
    }

    /// Points `id`'s clip at another node, or clears it with `None`.
    /// Clip chains that would loop back to `id` are refused.
    pub fn set_clip_path(&mut self, id: NodeId, clip: Option<NodeId>) -> SceneResult<bool> {
        let previous = self.node(id)?.style.clip_path;
        if let Some(clip) = clip {
            self.node(clip)?;
            if self.clip_chain_contains(clip, id) {
                debug!("refused clip path {:?} on {:?}: clip cycle", clip, id);
                return Ok(false);
            }
        }
        if previous == clip {
            return Ok(false);
        }

        if let Some(previous) = previous.and_then(|previous| self.objects.get_mut(previous)) {
            previous.clip_dependents.retain(|&dependent| dependent != id);
        }
        if let Some(clip) = clip {
            self.node_mut(clip)?.clip_dependents.push(id);
        }
        self.node_mut(id)?.style.clip_path = clip;

        self.dirtify_render(id);
        Ok(true)
    }

    fn clip_chain_contains(&self, start: NodeId, target: NodeId) -> bool {
        let mut current = Some(start);
        while let Some(id) = current {
            if id == target {
                return true;
            }
            current = self.objects.get(id).and_then(|node| node.style.clip_path);
        }
        false
    }

    // ------------------------------------------------------------------
    // Invalidation
    // ------------------------------------------------------------------

    /// Marks world transforms and world bounds of the subtree stale, and the
    /// aggregated bounds of every ancestor.
    fn dirtify_world(&self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.objects.get(current) {
                node.transform.invalidate_world();
                node.bounds.invalidate_world();
                if node.style.clip_path.is_some() {
                    node.bounds.invalidate_render();
                }
                for &dependent in &node.clip_dependents {
                    self.dirtify_render(dependent);
                }
                stack.extend(node.child_ids.iter().copied());
            }
        }

        let parent = self.objects.get(id).and_then(|node| node.parent_id);
        self.dirtify_to_root(parent);
    }

    /// Drops local and world bounds of `start` and everything above it.
    fn dirtify_to_root(&self, start: Option<NodeId>) {
        let mut current = start;
        while let Some(id) = current {
            let Some(node) = self.objects.get(id) else {
                break;
            };
            node.bounds.invalidate_local();
            node.bounds.invalidate_world();
            for &dependent in &node.clip_dependents {
                self.dirtify_render(dependent);
            }
            current = node.parent_id;
        }
    }

    fn dirtify_geometry(&self, id: NodeId) {
        if let Some(node) = self.objects.get(id) {
            for &dependent in &node.clip_dependents {
                self.dirtify_render(dependent);
            }
            self.dirtify_to_root(node.parent_id);
        }
    }

    /// Paint changes only touch render bounds, never local or world bounds.
    fn dirtify_render(&self, id: NodeId) {
        let Some(node) = self.objects.get(id) else {
            return;
        };
        node.bounds.invalidate_render();
        for &dependent in &node.clip_dependents {
            self.dirtify_render(dependent);
        }
        for ancestor in self.ancestors(id) {
            if let Some(ancestor) = self.objects.get(ancestor) {
                ancestor.bounds.invalidate_world_render();
            }
        }
    }

    // ------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------

    fn world_matrix(&self, id: NodeId) -> Mat4 {
        let Some(node) = self.objects.get(id) else {
            return Mat4::IDENTITY;
        };

        if node.transform.is_world_dirty() {
            let local_matrix = *node.transform.get_local_matrix();
            let world_matrix = match node.parent_id {
                Some(parent_id) => self.world_matrix(parent_id) * local_matrix,
                None => local_matrix,
            };
            node.transform.set_world_matrix(world_matrix);
            return world_matrix;
        }

        *node.transform.get_world_matrix()
    }

    fn parent_world_matrix(&self, id: NodeId) -> SceneResult<Mat4> {
        Ok(self
            .node(id)?
            .parent_id
            .map_or(Mat4::IDENTITY, |parent_id| self.world_matrix(parent_id)))
    }

    pub fn get_world_transform(&self, id: NodeId) -> SceneResult<Mat4> {
        self.node(id)?;
        Ok(self.world_matrix(id))
    }

    pub fn get_local_transform(&self, id: NodeId) -> SceneResult<Mat4> {
        Ok(*self.node(id)?.transform.get_local_matrix())
    }

    pub fn set_local_transform(&mut self, id: NodeId, matrix: Mat4) -> SceneResult<()> {
        self.node_mut(id)?.transform.set_local_matrix(matrix);
        self.dirtify_world(id);
        Ok(())
    }

    /// Same as [`Scene::get_local_transform`].
    pub fn get_local_matrix(&self, id: NodeId) -> SceneResult<Mat4> {
        self.get_local_transform(id)
    }

    /// Same as [`Scene::set_local_transform`].
    pub fn set_local_matrix(&mut self, id: NodeId, matrix: Mat4) -> SceneResult<()> {
        self.set_local_transform(id, matrix)
    }

    /// World matrix of the node.
    pub fn get_matrix(&self, id: NodeId) -> SceneResult<Mat4> {
        self.get_world_transform(id)
    }

    /// Places the node so that its world matrix becomes `matrix`.
    pub fn set_matrix(&mut self, id: NodeId, matrix: Mat4) -> SceneResult<()> {
        let parent_world = self.parent_world_matrix(id)?;
        self.set_local_transform(id, parent_world.inverse() * matrix)
    }

    pub fn reset_local_transform(&mut self, id: NodeId) -> SceneResult<()> {
        self.node_mut(id)?.transform.reset();
        self.dirtify_world(id);
        Ok(())
    }

    /// Local translations move along the node's own rotated axes; world ones
    /// move the world position by exactly `delta`.
    pub fn translate(
        &mut self,
        id: NodeId,
        delta: impl Into<VecInput>,
        space: Space,
    ) -> SceneResult<()> {
        let delta = delta.into().to_offset();
        match space {
            Space::Local => {
                let transform = &mut self.node_mut(id)?.transform;
                let delta = transform.rotation() * delta;
                transform.translate(delta);
                self.dirtify_world(id);
                Ok(())
            }
            Space::World => {
                let position = self.get_position(id)? + delta;
                self.set_position(id, position)
            }
        }
    }

    pub fn translate_local(&mut self, id: NodeId, delta: impl Into<VecInput>) -> SceneResult<()> {
        self.translate(id, delta, Space::Local)
    }

    pub fn scale(
        &mut self,
        id: NodeId,
        factor: impl Into<VecInput>,
        space: Space,
    ) -> SceneResult<()> {
        let factor = factor.into().to_factor();
        match space {
            Space::Local => {
                self.node_mut(id)?.transform.scale_by(factor);
                self.dirtify_world(id);
                Ok(())
            }
            Space::World => {
                let scale = self.get_scale(id)? * factor;
                self.set_scale(id, scale)
            }
        }
    }

    pub fn scale_local(&mut self, id: NodeId, factor: impl Into<VecInput>) -> SceneResult<()> {
        self.scale(id, factor, Space::Local)
    }

    /// Rotates by Euler angles in degrees. Local rotations spin about the
    /// node's own axes, world rotations about the world axes.
    pub fn rotate(
        &mut self,
        id: NodeId,
        angles: impl Into<VecInput>,
        space: Space,
    ) -> SceneResult<()> {
        let rotation = quat_from_euler_degrees(angles.into().to_euler());
        match space {
            Space::Local => {
                self.node_mut(id)?.transform.rotate(rotation);
            }
            Space::World => {
                let parent_rotation = self.parent_world_rotation(id)?;
                let transform = &mut self.node_mut(id)?.transform;
                let local = parent_rotation.inverse() * rotation * parent_rotation * transform.rotation();
                transform.set_rotation(local);
            }
        }
        self.dirtify_world(id);
        Ok(())
    }

    pub fn rotate_local(&mut self, id: NodeId, angles: impl Into<VecInput>) -> SceneResult<()> {
        self.rotate(id, angles, Space::Local)
    }

    fn parent_world_rotation(&self, id: NodeId) -> SceneResult<Quat> {
        Ok(self.parent_world_matrix(id)?.to_scale_rotation_translation().1)
    }

    /// World position, i.e. the translation column of the world matrix.
    pub fn get_position(&self, id: NodeId) -> SceneResult<Vec3> {
        Ok(self.get_world_transform(id)?.w_axis.truncate())
    }

    /// Moves the node to a world position, compensating for the parent's
    /// rotation and scale. A pair keeps the current world z.
    pub fn set_position(&mut self, id: NodeId, position: impl Into<VecInput>) -> SceneResult<()> {
        let target = position.into().to_point(self.get_position(id)?);
        let translation = self
            .parent_world_matrix(id)?
            .inverse()
            .transform_point3(target);
        self.node_mut(id)?
            .transform
            .set_matrix_translation(translation);
        self.dirtify_world(id);
        Ok(())
    }

    pub fn get_local_position(&self, id: NodeId) -> SceneResult<Vec3> {
        Ok(self.node(id)?.transform.translation())
    }

    pub fn set_local_position(
        &mut self,
        id: NodeId,
        position: impl Into<VecInput>,
    ) -> SceneResult<()> {
        let transform = &mut self.node_mut(id)?.transform;
        let position = position.into().to_point(transform.translation());
        transform.set_translation(position);
        self.dirtify_world(id);
        Ok(())
    }

    pub fn get_scale(&self, id: NodeId) -> SceneResult<Vec3> {
        Ok(self.get_world_transform(id)?.to_scale_rotation_translation().0)
    }

    /// Sets the world scale by dividing out the parent's world scale. Axes
    /// where the parent scale is zero keep their local value.
    pub fn set_scale(&mut self, id: NodeId, scale: impl Into<VecInput>) -> SceneResult<()> {
        let target = scale.into().to_scale(self.get_scale(id)?);
        let parent_scale = self.parent_world_matrix(id)?.to_scale_rotation_translation().0;
        let transform = &mut self.node_mut(id)?.transform;
        let current = transform.scale();
        let local = Vec3::select(parent_scale.cmpeq(Vec3::ZERO), current, target / parent_scale);
        transform.set_scale(local);
        self.dirtify_world(id);
        Ok(())
    }

    pub fn get_local_scale(&self, id: NodeId) -> SceneResult<Vec3> {
        Ok(self.node(id)?.transform.scale())
    }

    pub fn set_local_scale(&mut self, id: NodeId, scale: impl Into<VecInput>) -> SceneResult<()> {
        let transform = &mut self.node_mut(id)?.transform;
        let scale = scale.into().to_scale(transform.scale());
        transform.set_scale(scale);
        self.dirtify_world(id);
        Ok(())
    }

    pub fn get_rotation(&self, id: NodeId) -> SceneResult<Quat> {
        Ok(self.get_world_transform(id)?.to_scale_rotation_translation().1)
    }

    pub fn set_rotation(&mut self, id: NodeId, rotation: Quat) -> SceneResult<()> {
        let parent_rotation = self.parent_world_rotation(id)?;
        self.node_mut(id)?
            .transform
            .set_rotation(parent_rotation.inverse() * rotation);
        self.dirtify_world(id);
        Ok(())
    }

    pub fn get_local_rotation(&self, id: NodeId) -> SceneResult<Quat> {
        Ok(self.node(id)?.transform.rotation())
    }

    pub fn set_local_rotation(&mut self, id: NodeId, rotation: Quat) -> SceneResult<()> {
        self.node_mut(id)?.transform.set_rotation(rotation);
        self.dirtify_world(id);
        Ok(())
    }

    /// World Euler angles in degrees.
    pub fn get_euler_angles(&self, id: NodeId) -> SceneResult<Vec3> {
        Ok(euler_degrees_from_quat(self.get_rotation(id)?))
    }

    pub fn set_euler_angles(&mut self, id: NodeId, angles: impl Into<VecInput>) -> SceneResult<()> {
        self.set_rotation(id, quat_from_euler_degrees(angles.into().to_euler()))
    }

    pub fn get_local_euler_angles(&self, id: NodeId) -> SceneResult<Vec3> {
        Ok(euler_degrees_from_quat(self.get_local_rotation(id)?))
    }

    pub fn set_local_euler_angles(
        &mut self,
        id: NodeId,
        angles: impl Into<VecInput>,
    ) -> SceneResult<()> {
        self.set_local_rotation(id, quat_from_euler_degrees(angles.into().to_euler()))
    }

    pub fn get_origin(&self, id: NodeId) -> SceneResult<Vec3> {
        Ok(self.node(id)?.transform.origin())
    }

    /// Changes the rotation/scale pivot. The node does not move visually.
    pub fn set_origin(&mut self, id: NodeId, origin: impl Into<VecInput>) -> SceneResult<()> {
        let transform = &mut self.node_mut(id)?.transform;
        let origin = origin.into().to_point(transform.origin());
        if origin == transform.origin() {
            return Ok(());
        }
        transform.set_origin(origin);
        self.dirtify_world(id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Bounds
    // ------------------------------------------------------------------

    pub fn get_geometry_bounds(&self, id: NodeId) -> SceneResult<Option<Aabb>> {
        Ok(self.node(id)?.bounds.geometry())
    }

    /// Geometry grown by stroke, shadow and filters, intersected with the
    /// clip path. In the node's own space. `None` when the node has no
    /// geometry or its clip path hides all of it.
    pub fn get_render_bounds(&self, id: NodeId) -> SceneResult<Option<Aabb>> {
        self.node(id)?;
        Ok(self.render_bounds(id))
    }

    /// Geometry unioned with every visible child, in the node's own space.
    /// [`Aabb::EMPTY`] when nothing contributes.
    pub fn get_local_bounds(&self, id: NodeId) -> SceneResult<Aabb> {
        self.node(id)?;
        Ok(self.local_bounds(id).unwrap_or(Aabb::EMPTY))
    }

    /// World-space bounds of the node and its visible descendants.
    pub fn get_bounds(&self, id: NodeId) -> SceneResult<Aabb> {
        self.node(id)?;
        Ok(self.world_bounds(id).unwrap_or(Aabb::EMPTY))
    }

    /// World-space render bounds of the node and its visible descendants,
    /// the dirty-rectangle input for renderers.
    pub fn get_world_render_bounds(&self, id: NodeId) -> SceneResult<Aabb> {
        self.node(id)?;
        Ok(self.world_render_bounds(id).unwrap_or(Aabb::EMPTY))
    }

    /// Top-left/width/height form of the geometry bounds. Zero when the node
    /// has no geometry.
    pub fn get_bbox(&self, id: NodeId) -> SceneResult<Rectangle> {
        Ok(self
            .node(id)?
            .bounds
            .geometry()
            .map(|geometry| Rectangle::from(&geometry))
            .unwrap_or_default())
    }

    fn visible_children<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = (NodeId, &'a Node)> + 'a {
        node.child_ids.iter().filter_map(move |&child_id| {
            self.objects
                .get(child_id)
                .filter(|child| child.visible && !child.destroyed)
                .map(|child| (child_id, child))
        })
    }

    fn render_bounds(&self, id: NodeId) -> Option<Aabb> {
        let node = self.objects.get(id)?;
        node.bounds.render(|| {
            trace!("recomputing render bounds of {:?}", id);
            let geometry = node.bounds.geometry()?;
            let mut bounds = node.style.expand(geometry);
            if let Some(clip) = node
                .style
                .clip_path
                .and_then(|clip_id| self.clip_bounds(id, clip_id))
            {
                bounds = bounds.intersection(&clip)?;
            }
            Some(bounds)
        })
    }

    /// Clip node bounds expressed in the clipped node's space. A detached clip
    /// node's own transform is taken as relative to the clipped node.
    fn clip_bounds(&self, id: NodeId, clip_id: NodeId) -> Option<Aabb> {
        let clip = self.get_node(clip_id)?;
        let bounds = self
            .render_bounds(clip_id)
            .or_else(|| self.local_bounds(clip_id))?;
        let to_local = if clip.parent_id.is_some() {
            self.world_matrix(id).inverse() * self.world_matrix(clip_id)
        } else {
            *clip.transform.get_local_matrix()
        };
        Some(bounds.transform(&to_local))
    }

    fn local_bounds(&self, id: NodeId) -> Option<Aabb> {
        let node = self.objects.get(id)?;
        node.bounds.local(|| {
            trace!("recomputing local bounds of {:?}", id);
            let children = self.visible_children(node).filter_map(|(child_id, child)| {
                let child_matrix = *child.transform.get_local_matrix();
                self.local_bounds(child_id)
                    .map(|bounds| bounds.transform(&child_matrix))
            });
            node.bounds
                .geometry()
                .into_iter()
                .chain(children)
                .reduce(|bounds, other| bounds.union(&other))
        })
    }

    fn world_bounds(&self, id: NodeId) -> Option<Aabb> {
        let node = self.objects.get(id)?;
        node.bounds.world(|| {
            trace!("recomputing world bounds of {:?}", id);
            let world_matrix = self.world_matrix(id);
            let own = node
                .bounds
                .geometry()
                .map(|geometry| geometry.transform(&world_matrix));
            let children = self
                .visible_children(node)
                .filter_map(|(child_id, _)| self.world_bounds(child_id));
            own.into_iter()
                .chain(children)
                .reduce(|bounds, other| bounds.union(&other))
        })
    }

    fn world_render_bounds(&self, id: NodeId) -> Option<Aabb> {
        let node = self.objects.get(id)?;
        node.bounds.world_render(|| {
            let world_matrix = self.world_matrix(id);
            let own = self
                .render_bounds(id)
                .map(|render| render.transform(&world_matrix));
            let children = self
                .visible_children(node)
                .filter_map(|(child_id, _)| self.world_render_bounds(child_id));
            own.into_iter()
                .chain(children)
                .reduce(|bounds, other| bounds.union(&other))
        })
    }

    // ------------------------------------------------------------------
    // Frame hand-off and queries
    // ------------------------------------------------------------------

    /// Clears the per-node "changed since last frame" flags.
    pub fn begin_frame(&mut self) {
        for (_, object) in self.objects.iter() {
            object.transform.reset_flags();
        }
    }

    /// Nodes whose transform changed since the last [`Scene::begin_frame`].
    pub fn changed_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.objects
            .iter()
            .filter(|(_, node)| !node.destroyed && node.transform.has_changed())
            .map(|(id, _)| id)
    }

    /// Eagerly rebuilds every stale world matrix, root first.
    pub fn update_transforms(&self) {
        for root_id in self.roots() {
            self.update_object_transform_recursive(root_id, Mat4::IDENTITY);
        }
    }

    fn update_object_transform_recursive(&self, object_id: NodeId, parent_world_matrix: Mat4) {
        if let Some(object) = self.objects.get(object_id) {
            if object.transform.is_world_dirty() {
                let local_matrix = *object.transform.get_local_matrix();
                object
                    .transform
                    .set_world_matrix(parent_world_matrix * local_matrix);
            }

            let world_matrix = *object.transform.get_world_matrix();
            for &child_id in &object.child_ids {
                self.update_object_transform_recursive(child_id, world_matrix);
            }
        }
    }

    /// Visible nodes whose world render bounds contain `point`, topmost
    /// (last painted) first.
    pub fn elements_from_point(&self, point: Vec2) -> Vec<NodeId> {
        let mut hits = Vec::new();
        self.visit_visible(&mut |id, bounds| {
            if bounds.contains_point_2d(point) {
                hits.push(id);
            }
        });
        hits.reverse();
        hits
    }

    /// Visible nodes whose world render bounds intersect `frustum`, in paint
    /// order.
    pub fn cull(&self, frustum: &Frustum) -> Vec<NodeId> {
        let mut visible = Vec::new();
        self.visit_visible(&mut |id, bounds| {
            if bounds.intersects_frustum(frustum) {
                visible.push(id);
            }
        });
        visible
    }

    /// Depth-first paint-order walk over visible nodes with geometry, handing
    /// each node's own render bounds in world space to `visit`.
    fn visit_visible(&self, visit: &mut dyn FnMut(NodeId, Aabb)) {
        let mut stack: Vec<NodeId> = self.roots().collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            let Some(node) = self.get_node(id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            if let Some(render) = self.render_bounds(id) {
                visit(id, render.transform(&self.world_matrix(id)));
            }
            stack.extend(node.child_ids.iter().rev().copied());
        }
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod scene_tests;
