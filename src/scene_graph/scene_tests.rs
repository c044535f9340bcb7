use super::*;
use crate::scene_graph::style::Filter;
use glam::Vec4;

const EPSILON: f32 = 1e-4;

fn scene() -> Scene {
    Scene::with_entity_counter(Arc::new(EntityCounter::new()))
}

fn circle(scene: &mut Scene, cx: f32, cy: f32, r: f32) -> NodeId {
    scene.create_node("circle", Shape::circle(cx, cy, r))
}

// ========================================================================
// Tree Construction
// ========================================================================

#[test]
fn test_scene_new() {
    let scene = scene();

    assert_eq!(scene.node_count(), 0);
    assert_eq!(scene.roots().count(), 0);
}

#[test]
fn test_entities_are_sequential() {
    let mut scene = scene();

    let a = scene.create_group("a");
    let b = scene.create_group("b");

    assert_eq!(scene.entity(a).unwrap(), 0);
    assert_eq!(scene.entity(b).unwrap(), 1);
    assert_eq!(scene.get_node_by_name("b"), Some(b));
}

#[test]
fn test_append_child() {
    let mut scene = scene();

    let group = scene.create_group("group");
    let child = circle(&mut scene, 0.0, 0.0, 10.0);
    scene.append_child(group, child).unwrap();

    assert_eq!(scene.parent(child).unwrap(), Some(group));
    assert_eq!(scene.children(group).unwrap(), &[child]);
    assert_eq!(scene.roots().collect::<Vec<_>>(), vec![group]);

    // Node-side navigation agrees with the scene
    let node = scene.get_node(child).unwrap();
    assert_eq!(node.parent(&scene).unwrap().name, "group");
}

#[test]
fn test_insert_child_order() {
    let mut scene = scene();

    let group = scene.create_group("group");
    let a = scene.create_group("a");
    let b = scene.create_group("b");
    let c = scene.create_group("c");

    scene.append_child(group, a).unwrap();
    scene.append_child(group, c).unwrap();
    scene.insert_child(group, 1, b).unwrap();
    assert_eq!(scene.children(group).unwrap(), &[a, b, c]);

    // Out of range indices append
    let d = scene.create_group("d");
    scene.insert_child(group, 99, d).unwrap();
    assert_eq!(scene.children(group).unwrap(), &[a, b, c, d]);
}

#[test]
fn test_reparent_moves_child() {
    let mut scene = scene();

    let first = scene.create_group("first");
    let second = scene.create_group("second");
    let child = scene.create_group("child");

    scene.append_child(first, child).unwrap();
    scene.append_child(second, child).unwrap();

    assert!(scene.children(first).unwrap().is_empty());
    assert_eq!(scene.children(second).unwrap(), &[child]);
    assert_eq!(scene.parent(child).unwrap(), Some(second));
}

#[test]
fn test_cycle_is_rejected() {
    let mut scene = scene();

    let root = scene.create_group("root");
    let middle = scene.create_group("middle");
    let leaf = scene.create_group("leaf");
    scene.append_child(root, middle).unwrap();
    scene.append_child(middle, leaf).unwrap();

    assert_eq!(
        scene.append_child(leaf, root),
        Err(SceneError::CycleDetected {
            parent: leaf,
            child: root
        })
    );
    assert!(matches!(
        scene.append_child(leaf, leaf),
        Err(SceneError::CycleDetected { .. })
    ));

    // Tree untouched
    assert_eq!(scene.parent(root).unwrap(), None);
    assert_eq!(scene.children(leaf).unwrap(), &[] as &[NodeId]);
}

#[test]
fn test_remove_child_requires_parent() {
    let mut scene = scene();

    let group = scene.create_group("group");
    let other = scene.create_group("other");
    let child = scene.create_group("child");
    scene.append_child(group, child).unwrap();

    assert_eq!(
        scene.remove_child(other, child),
        Err(SceneError::NotAChild {
            parent: other,
            child
        })
    );

    scene.remove_child(group, child).unwrap();
    assert_eq!(scene.parent(child).unwrap(), None);
    assert!(scene.get_node(child).is_some());
}

#[test]
fn test_ancestors() {
    let mut scene = scene();

    let root = scene.create_group("root");
    let middle = scene.create_group("middle");
    let leaf = scene.create_group("leaf");
    scene.append_child(root, middle).unwrap();
    scene.append_child(middle, leaf).unwrap();

    assert_eq!(scene.ancestors(leaf).collect::<Vec<_>>(), vec![middle, root]);
    assert_eq!(scene.ancestors(root).count(), 0);
}

#[test]
fn test_destroy_subtree() {
    let mut scene = scene();

    let root = scene.create_group("root");
    let group = scene.create_group("group");
    let leaf = circle(&mut scene, 0.0, 0.0, 10.0);
    scene.append_child(root, group).unwrap();
    scene.append_child(group, leaf).unwrap();

    scene.destroy(group).unwrap();

    assert!(scene.get_node(group).is_none());
    assert!(scene.get_node(leaf).is_none());
    assert!(scene.children(root).unwrap().is_empty());
    assert_eq!(scene.node_count(), 1);
    assert_eq!(
        scene.translate_local(leaf, 10.0),
        Err(SceneError::NodeDestroyed(leaf))
    );
    assert_eq!(scene.get_bounds(group), Err(SceneError::NodeDestroyed(group)));
}

#[test]
fn test_set_visible_reports_change() {
    let mut scene = scene();

    let node = scene.create_group("node");
    assert!(scene.is_visible(node).unwrap());
    assert!(scene.set_visible(node, false).unwrap());
    assert!(!scene.set_visible(node, false).unwrap());
    assert!(!scene.is_visible(node).unwrap());
}

// ========================================================================
// Transforms
// ========================================================================

#[test]
fn test_translate_local_follows_rotation() {
    let mut scene = scene();

    let node = scene.create_group("node");
    scene.rotate_local(node, 90.0).unwrap();
    scene.translate_local(node, 10.0).unwrap();

    assert!(scene
        .get_local_position(node)
        .unwrap()
        .abs_diff_eq(Vec3::new(0.0, 10.0, 0.0), EPSILON));
}

#[test]
fn test_translate_world_under_scaled_parent() {
    let mut scene = scene();

    let parent = scene.create_group("parent");
    let child = scene.create_group("child");
    scene.append_child(parent, child).unwrap();
    scene.set_local_scale(parent, 2.0).unwrap();

    scene.translate(child, (10.0, 0.0), Space::World).unwrap();

    assert!(scene
        .get_position(child)
        .unwrap()
        .abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), EPSILON));
    assert!(scene
        .get_local_position(child)
        .unwrap()
        .abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), EPSILON));
}

#[test]
fn test_set_position_inverts_parent() {
    let mut scene = scene();

    let parent = scene.create_group("parent");
    let child = scene.create_group("child");
    scene.append_child(parent, child).unwrap();
    scene.set_local_position(parent, (100.0, 0.0)).unwrap();
    scene.set_local_euler_angles(parent, 90.0).unwrap();

    scene.set_position(child, (100.0, 100.0, 0.0)).unwrap();

    assert!(scene
        .get_position(child)
        .unwrap()
        .abs_diff_eq(Vec3::new(100.0, 100.0, 0.0), EPSILON));
    assert!(scene
        .get_local_position(child)
        .unwrap()
        .abs_diff_eq(Vec3::new(100.0, 0.0, 0.0), EPSILON));
}

#[test]
fn test_set_position_pair_keeps_z() {
    let mut scene = scene();

    let node = scene.create_group("node");
    scene.set_local_position(node, (0.0, 0.0, 7.0)).unwrap();
    scene.set_position(node, (1.0, 2.0)).unwrap();

    assert_eq!(scene.get_position(node).unwrap(), Vec3::new(1.0, 2.0, 7.0));
}

#[test]
fn test_set_scale_world() {
    let mut scene = scene();

    let parent = scene.create_group("parent");
    let child = scene.create_group("child");
    scene.append_child(parent, child).unwrap();
    scene.set_local_scale(parent, 2.0).unwrap();

    scene.set_scale(child, 4.0).unwrap();

    assert!(scene
        .get_local_scale(child)
        .unwrap()
        .abs_diff_eq(Vec3::splat(2.0), EPSILON));
    assert!(scene
        .get_scale(child)
        .unwrap()
        .abs_diff_eq(Vec3::splat(4.0), EPSILON));
}

#[test]
fn test_scale_world_multiplies() {
    let mut scene = scene();

    let node = scene.create_group("node");
    scene.scale(node, 2.0, Space::World).unwrap();
    scene.scale(node, (3.0, 1.0), Space::World).unwrap();

    assert!(scene
        .get_scale(node)
        .unwrap()
        .abs_diff_eq(Vec3::new(6.0, 2.0, 2.0), EPSILON));
}

#[test]
fn test_rotate_world_under_rotated_parent() {
    let mut scene = scene();

    let parent = scene.create_group("parent");
    let child = scene.create_group("child");
    scene.append_child(parent, child).unwrap();
    scene.set_local_euler_angles(parent, 90.0).unwrap();

    scene.rotate(child, 45.0, Space::World).unwrap();

    let expected = Quat::from_rotation_z(135f32.to_radians());
    assert!(scene.get_rotation(child).unwrap().angle_between(expected) < 2e-3);
    let local = Quat::from_rotation_z(45f32.to_radians());
    assert!(scene.get_local_rotation(child).unwrap().angle_between(local) < 2e-3);
}

#[test]
fn test_euler_angles() {
    let mut scene = scene();

    let node = scene.create_group("node");
    scene.set_local_euler_angles(node, 30.0).unwrap();

    assert!(scene
        .get_local_euler_angles(node)
        .unwrap()
        .abs_diff_eq(Vec3::new(0.0, 0.0, 30.0), 1e-2));
    assert!(scene
        .get_euler_angles(node)
        .unwrap()
        .abs_diff_eq(Vec3::new(0.0, 0.0, 30.0), 1e-2));
}

#[test]
fn test_origin_pivots_scale() {
    let mut scene = scene();

    let node = circle(&mut scene, 0.0, 0.0, 100.0);
    scene.set_origin(node, (-100.0, -100.0)).unwrap();
    assert_eq!(scene.get_position(node).unwrap(), Vec3::ZERO);

    scene.scale_local(node, 0.5).unwrap();

    assert!(scene
        .get_position(node)
        .unwrap()
        .abs_diff_eq(Vec3::new(-50.0, -50.0, 0.0), EPSILON));
    assert_eq!(scene.get_origin(node).unwrap(), Vec3::new(-100.0, -100.0, 0.0));
}

#[test]
fn test_set_matrix_round_trip_under_parent() {
    let mut scene = scene();

    let parent = scene.create_group("parent");
    let child = scene.create_group("child");
    scene.append_child(parent, child).unwrap();
    scene.set_local_position(parent, (10.0, 20.0, 0.0)).unwrap();
    scene.set_local_euler_angles(parent, 30.0).unwrap();
    scene.set_local_scale(parent, 2.0).unwrap();

    let matrix = Mat4::from_scale_rotation_translation(
        Vec3::new(3.0, 3.0, 3.0),
        Quat::from_rotation_z(1.2),
        Vec3::new(-40.0, 15.0, 2.0),
    );
    scene.set_matrix(child, matrix).unwrap();

    assert!(scene.get_matrix(child).unwrap().abs_diff_eq(matrix, 1e-2));
}

#[test]
fn test_reset_local_transform() {
    let mut scene = scene();

    let node = scene.create_group("node");
    scene.translate_local(node, (5.0, 5.0)).unwrap();
    scene.rotate_local(node, 30.0).unwrap();
    scene.scale_local(node, 3.0).unwrap();

    scene.reset_local_transform(node).unwrap();

    assert_eq!(scene.get_local_transform(node).unwrap(), Mat4::IDENTITY);
    assert_eq!(scene.get_local_matrix(node).unwrap(), Mat4::IDENTITY);
}

#[test]
fn test_world_matrix_is_lazy() {
    let mut scene = scene();

    let parent = scene.create_group("parent");
    let child = scene.create_group("child");
    scene.append_child(parent, child).unwrap();
    scene.get_world_transform(child).unwrap();
    assert!(!scene.objects[child].transform.is_world_dirty());

    scene.translate_local(parent, 10.0).unwrap();
    assert!(scene.objects[parent].transform.is_world_dirty());
    assert!(scene.objects[child].transform.is_world_dirty());

    let world = scene.get_world_transform(child).unwrap();
    assert!(!scene.objects[child].transform.is_world_dirty());
    assert_eq!(world.w_axis.truncate(), Vec3::new(10.0, 0.0, 0.0));
}

#[test]
fn test_update_transforms_flushes_everything() {
    let mut scene = scene();

    let parent = scene.create_group("parent");
    let child = scene.create_group("child");
    scene.append_child(parent, child).unwrap();
    scene.translate_local(parent, 10.0).unwrap();
    scene.translate_local(child, 1.0).unwrap();

    scene.update_transforms();

    assert!(!scene.objects[child].transform.is_world_dirty());
    assert_eq!(
        scene.objects[child].transform.get_world_matrix().w_axis,
        Vec4::new(11.0, 0.0, 0.0, 1.0)
    );
}

#[test]
fn test_changed_nodes_since_frame() {
    let mut scene = scene();

    let a = scene.create_group("a");
    let b = scene.create_group("b");
    scene.begin_frame();
    assert_eq!(scene.changed_nodes().count(), 0);

    scene.translate_local(b, 1.0).unwrap();
    assert_eq!(scene.changed_nodes().collect::<Vec<_>>(), vec![b]);
    assert!(!scene.changed_nodes().any(|id| id == a));
}

#[test]
fn test_transform_attribute() {
    let mut scene = scene();

    let node = scene.create_group("node");
    let matrix = Mat4::from_translation(Vec3::new(3.0, 4.0, 0.0));
    assert!(scene.set_attribute(node, Attribute::Transform(matrix)).unwrap());

    assert_eq!(scene.get_position(node).unwrap(), Vec3::new(3.0, 4.0, 0.0));
}

#[test]
fn test_detach_keeps_local_scale() {
    let mut scene = scene();

    let group = scene.create_group("group");
    let child = circle(&mut scene, 0.0, 0.0, 10.0);
    scene.append_child(group, child).unwrap();
    scene.scale_local(group, 10.0).unwrap();
    scene.scale_local(child, 2.0).unwrap();
    assert!(scene.get_scale(child).unwrap().abs_diff_eq(Vec3::splat(20.0), EPSILON));

    scene.remove_child(group, child).unwrap();

    assert!(scene.get_scale(child).unwrap().abs_diff_eq(Vec3::splat(2.0), EPSILON));
}

// ========================================================================
// Bounds
// ========================================================================

#[test]
fn test_circle_bounds_follow_translation() {
    let mut scene = scene();

    let node = circle(&mut scene, 100.0, 100.0, 100.0);
    let bounds = scene.get_bounds(node).unwrap();
    assert_eq!(bounds.center, Vec3::new(100.0, 100.0, 0.0));
    assert_eq!(bounds.half_extents, Vec3::new(100.0, 100.0, 0.0));

    scene.translate_local(node, 100.0).unwrap();
    assert_eq!(scene.get_bounds(node).unwrap().center, Vec3::new(200.0, 100.0, 0.0));
    // Local bounds are unaffected by the node's own transform
    assert_eq!(scene.get_local_bounds(node).unwrap().center, Vec3::new(100.0, 100.0, 0.0));
}

#[test]
fn test_line_width_only_affects_render_bounds() {
    let mut scene = scene();

    let node = circle(&mut scene, 100.0, 100.0, 100.0);
    let before = scene.get_bounds(node).unwrap();
    scene.get_local_bounds(node).unwrap();

    assert!(scene.set_attribute(node, Attribute::LineWidth(10.0)).unwrap());

    assert!(!scene.objects[node].bounds.is_local_dirty());
    assert!(!scene.objects[node].bounds.is_world_dirty());
    assert_eq!(scene.get_bounds(node).unwrap(), before);
    assert_eq!(
        scene.get_render_bounds(node).unwrap().unwrap().half_extents,
        Vec3::new(105.0, 105.0, 0.0)
    );
}

#[test]
fn test_group_bounds_union() {
    let mut scene = scene();

    let group = scene.create_group("group");
    let a = circle(&mut scene, 100.0, 100.0, 100.0);
    let b = circle(&mut scene, 200.0, 100.0, 100.0);
    scene.append_child(group, a).unwrap();
    scene.append_child(group, b).unwrap();

    let bounds = scene.get_bounds(group).unwrap();
    assert_eq!(bounds.center, Vec3::new(150.0, 100.0, 0.0));
    assert_eq!(bounds.half_extents, Vec3::new(150.0, 100.0, 0.0));
    assert!(scene.get_geometry_bounds(group).unwrap().is_none());
}

#[test]
fn test_empty_group_bounds() {
    let mut scene = scene();

    let group = scene.create_group("group");

    assert_eq!(scene.get_local_bounds(group).unwrap(), Aabb::EMPTY);
    assert_eq!(scene.get_bounds(group).unwrap(), Aabb::EMPTY);
    assert_eq!(scene.get_render_bounds(group).unwrap(), None);
}

#[test]
fn test_invisible_children_are_skipped() {
    let mut scene = scene();

    let group = scene.create_group("group");
    let a = circle(&mut scene, 0.0, 0.0, 10.0);
    let b = circle(&mut scene, 100.0, 0.0, 10.0);
    scene.append_child(group, a).unwrap();
    scene.append_child(group, b).unwrap();
    assert_eq!(scene.get_bounds(group).unwrap().max().x, 110.0);

    scene.set_visible(b, false).unwrap();
    assert_eq!(scene.get_bounds(group).unwrap().max().x, 10.0);

    scene.set_attribute(b, Attribute::Visible(true)).unwrap();
    assert_eq!(scene.get_bounds(group).unwrap().max().x, 110.0);
}

#[test]
fn test_geometry_change_reaches_ancestors() {
    let mut scene = scene();

    let root = scene.create_group("root");
    let group = scene.create_group("group");
    let leaf = circle(&mut scene, 0.0, 0.0, 10.0);
    scene.append_child(root, group).unwrap();
    scene.append_child(group, leaf).unwrap();
    assert_eq!(scene.get_local_bounds(root).unwrap().half_extents.x, 10.0);
    assert_eq!(scene.get_bounds(root).unwrap().half_extents.x, 10.0);

    scene.set_attribute(leaf, Attribute::R(50.0)).unwrap();

    assert_eq!(scene.get_local_bounds(root).unwrap().half_extents.x, 50.0);
    assert_eq!(scene.get_bounds(root).unwrap().half_extents.x, 50.0);
}

#[test]
fn test_child_transform_reaches_ancestors() {
    let mut scene = scene();

    let group = scene.create_group("group");
    let leaf = circle(&mut scene, 0.0, 0.0, 10.0);
    scene.append_child(group, leaf).unwrap();
    assert_eq!(scene.get_local_bounds(group).unwrap().center.x, 0.0);

    scene.translate_local(leaf, 30.0).unwrap();

    assert_eq!(scene.get_local_bounds(group).unwrap().center.x, 30.0);
    assert_eq!(scene.get_bounds(group).unwrap().center.x, 30.0);
}

#[test]
fn test_invalid_geometry_is_ignored() {
    let mut scene = scene();

    let node = circle(&mut scene, 0.0, 0.0, 10.0);
    let before = scene.get_geometry_bounds(node).unwrap();

    assert!(!scene.set_attribute(node, Attribute::R(f32::NAN)).unwrap());
    assert!(!scene.set_attribute(node, Attribute::Width(20.0)).unwrap());

    assert_eq!(scene.get_geometry_bounds(node).unwrap(), before);
}

#[test]
fn test_bbox_normalizes_negative_size() {
    let mut scene = scene();

    let node = scene.create_node("rect", Shape::rect(100.0, 100.0, -50.0, -20.0));
    assert_eq!(
        scene.get_bbox(node).unwrap(),
        Rectangle::new(50.0, 80.0, 50.0, 20.0)
    );

    let group = scene.create_group("group");
    assert_eq!(scene.get_bbox(group).unwrap(), Rectangle::default());
}

#[test]
fn test_shadow_and_filters_expand_render_bounds() {
    let mut scene = scene();

    let node = circle(&mut scene, 100.0, 100.0, 100.0);
    scene.set_attribute(node, Attribute::ShadowBlur(10.0)).unwrap();
    scene.set_attribute(node, Attribute::ShadowOffsetX(20.0)).unwrap();
    let render = scene.get_render_bounds(node).unwrap().unwrap();
    assert_eq!(render.min(), Vec3::new(0.0, -10.0, 0.0));
    assert_eq!(render.max(), Vec3::new(230.0, 210.0, 0.0));

    scene.set_attribute(node, Attribute::ShadowBlur(0.0)).unwrap();
    scene.set_attribute(node, Attribute::ShadowOffsetX(0.0)).unwrap();
    scene
        .set_attribute(node, Attribute::Filter(vec![Filter::Blur(5.0)]))
        .unwrap();
    let render = scene.get_render_bounds(node).unwrap().unwrap();
    assert_eq!(render.half_extents, Vec3::new(105.0, 105.0, 0.0));
}

#[test]
fn test_clip_path_intersects_render_bounds() {
    let mut scene = scene();

    let node = circle(&mut scene, 0.0, 0.0, 100.0);
    let clip = scene.create_node("clip", Shape::rect(0.0, 0.0, 50.0, 50.0));

    assert!(scene.set_attribute(node, Attribute::ClipPath(Some(clip))).unwrap());
    let render = scene.get_render_bounds(node).unwrap().unwrap();
    assert_eq!(render.min(), Vec3::new(0.0, 0.0, 0.0));
    assert_eq!(render.max(), Vec3::new(50.0, 50.0, 0.0));

    // Editing the clip shape updates the clipped node
    scene.set_attribute(clip, Attribute::Width(20.0)).unwrap();
    assert_eq!(scene.get_render_bounds(node).unwrap().unwrap().max().x, 20.0);

    // Moving a detached clip moves the clip region relative to the node
    scene.translate_local(clip, -10.0).unwrap();
    assert_eq!(scene.get_render_bounds(node).unwrap().unwrap().max().x, 10.0);

    assert!(scene.set_clip_path(node, None).unwrap());
    let render = scene.get_render_bounds(node).unwrap().unwrap();
    assert_eq!(render.half_extents, Vec3::new(100.0, 100.0, 0.0));
}

#[test]
fn test_clip_cycle_is_refused() {
    let mut scene = scene();

    let a = circle(&mut scene, 0.0, 0.0, 10.0);
    let b = circle(&mut scene, 0.0, 0.0, 10.0);
    assert!(scene.set_clip_path(a, Some(b)).unwrap());
    assert!(!scene.set_clip_path(b, Some(a)).unwrap());
    assert!(!scene.set_clip_path(a, Some(a)).unwrap());
    assert_eq!(scene.get_node(b).unwrap().style().clip_path, None);
}

#[test]
fn test_destroying_clip_unlinks_dependents() {
    let mut scene = scene();

    let node = circle(&mut scene, 0.0, 0.0, 100.0);
    let clip = scene.create_node("clip", Shape::rect(0.0, 0.0, 50.0, 50.0));
    scene.set_clip_path(node, Some(clip)).unwrap();
    assert_eq!(scene.get_render_bounds(node).unwrap().unwrap().max().x, 50.0);

    scene.destroy(clip).unwrap();

    assert_eq!(scene.get_node(node).unwrap().style().clip_path, None);
    assert_eq!(scene.get_render_bounds(node).unwrap().unwrap().max().x, 100.0);
}

#[test]
fn test_fully_clipped_node_has_no_render_bounds() {
    let mut scene = scene();

    let node = circle(&mut scene, 500.0, 500.0, 10.0);
    let clip = scene.create_node("clip", Shape::rect(0.0, 0.0, 10.0, 10.0));
    scene.set_clip_path(node, Some(clip)).unwrap();

    assert_eq!(scene.get_render_bounds(node).unwrap(), None);
    assert_eq!(scene.get_world_render_bounds(node).unwrap(), Aabb::EMPTY);

    // Geometry is unaffected by clipping
    assert_eq!(
        scene.get_bounds(node).unwrap().center,
        Vec3::new(500.0, 500.0, 0.0)
    );

    // Nothing is painted, so nothing is picked or kept at the origin
    assert_eq!(scene.elements_from_point(Vec2::ZERO), vec![clip]);
    let projection = Mat4::orthographic_rh(-100.0, 100.0, -100.0, 100.0, -10.0, 10.0);
    let frustum = Frustum::from_view_projection(projection, crate::camera::ClipSpaceNearZ::Zero);
    assert_eq!(scene.cull(&frustum), vec![clip]);

    // Moving the clip over the node brings it back
    scene.set_local_position(clip, (495.0, 495.0)).unwrap();
    let render = scene.get_render_bounds(node).unwrap().unwrap();
    assert_eq!(render.min(), Vec3::new(495.0, 495.0, 0.0));
    assert_eq!(render.max(), Vec3::new(505.0, 505.0, 0.0));
}

#[test]
fn test_point_geometry_keeps_its_position() {
    let mut scene = scene();

    let point = circle(&mut scene, 500.0, 500.0, 0.0);
    let expected = Aabb::new(Vec3::new(500.0, 500.0, 0.0), Vec3::ZERO);
    assert_eq!(scene.get_local_bounds(point).unwrap(), expected);
    assert_eq!(scene.get_bounds(point).unwrap(), expected);

    scene.translate_local(point, 10.0).unwrap();
    assert_eq!(
        scene.get_bounds(point).unwrap().center,
        Vec3::new(510.0, 500.0, 0.0)
    );

    // A point child still stretches its group
    let group = scene.create_group("group");
    let other = circle(&mut scene, 0.0, 0.0, 10.0);
    let polyline = scene.create_node("polyline", Shape::polyline(vec![Vec2::new(-40.0, 0.0)]));
    scene.append_child(group, point).unwrap();
    scene.append_child(group, other).unwrap();
    scene.append_child(group, polyline).unwrap();

    let bounds = scene.get_bounds(group).unwrap();
    assert_eq!(bounds.min(), Vec3::new(-40.0, -10.0, 0.0));
    assert_eq!(bounds.max(), Vec3::new(510.0, 500.0, 0.0));
    assert_eq!(scene.get_local_bounds(group).unwrap(), bounds);
}

#[test]
fn test_world_render_bounds() {
    let mut scene = scene();

    let group = scene.create_group("group");
    let node = circle(&mut scene, 0.0, 0.0, 100.0);
    scene.append_child(group, node).unwrap();
    scene.translate_local(group, 50.0).unwrap();
    assert_eq!(
        scene.get_world_render_bounds(group).unwrap().half_extents,
        Vec3::new(100.0, 100.0, 0.0)
    );

    scene.set_attribute(node, Attribute::LineWidth(10.0)).unwrap();

    let bounds = scene.get_world_render_bounds(group).unwrap();
    assert_eq!(bounds.center, Vec3::new(50.0, 0.0, 0.0));
    assert_eq!(bounds.half_extents, Vec3::new(105.0, 105.0, 0.0));
}

#[test]
fn test_bounds_reads_are_idempotent() {
    let mut scene = scene();

    let group = scene.create_group("group");
    let node = circle(&mut scene, 10.0, 20.0, 30.0);
    scene.append_child(group, node).unwrap();
    scene.rotate_local(group, 33.0).unwrap();

    let first = scene.get_bounds(group).unwrap();
    let second = scene.get_bounds(group).unwrap();
    assert_eq!(first.center.to_array(), second.center.to_array());
    assert_eq!(first.half_extents.to_array(), second.half_extents.to_array());
}

// ========================================================================
// Queries
// ========================================================================

#[test]
fn test_elements_from_point_topmost_first() {
    let mut scene = scene();

    let group = scene.create_group("group");
    let below = scene.create_node("below", Shape::rect(0.0, 0.0, 100.0, 100.0));
    let above = scene.create_node("above", Shape::rect(50.0, 50.0, 100.0, 100.0));
    scene.append_child(group, below).unwrap();
    scene.append_child(group, above).unwrap();

    assert_eq!(
        scene.elements_from_point(Vec2::new(75.0, 75.0)),
        vec![above, below]
    );
    assert_eq!(scene.elements_from_point(Vec2::new(10.0, 10.0)), vec![below]);
    assert!(scene.elements_from_point(Vec2::new(500.0, 500.0)).is_empty());

    scene.set_visible(above, false).unwrap();
    assert_eq!(scene.elements_from_point(Vec2::new(75.0, 75.0)), vec![below]);
}

#[test]
fn test_cull_against_frustum() {
    let mut scene = scene();

    let inside = scene.create_node("inside", Shape::rect(10.0, 10.0, 20.0, 20.0));
    let outside = scene.create_node("outside", Shape::rect(500.0, 500.0, 10.0, 10.0));
    let projection = Mat4::orthographic_rh(0.0, 100.0, 0.0, 100.0, -10.0, 10.0);
    let frustum = Frustum::from_view_projection(projection, crate::camera::ClipSpaceNearZ::Zero);

    let visible = scene.cull(&frustum);
    assert_eq!(visible, vec![inside]);

    scene.set_position(outside, (-450.0, -450.0)).unwrap();
    assert_eq!(scene.cull(&frustum), vec![inside, outside]);
}
