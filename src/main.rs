use anyhow::Result;
use glam::Vec2;
use log::info;

use scenegine::{
    Attribute, Camera, CameraConfig, CameraUniform, LandmarkOptions, LandmarkParams, Scene, Shape,
    Space,
};

fn main() -> Result<()> {
    pretty_env_logger::init();

    let mut scene = Scene::new();
    let group = scene.create_group("group");
    let sun = scene.create_node("sun", Shape::circle(100.0, 100.0, 100.0));
    let planet = scene.create_node("planet", Shape::circle(200.0, 100.0, 100.0));
    scene.append_child(group, sun)?;
    scene.append_child(group, planet)?;

    scene.set_attribute(sun, Attribute::LineWidth(10.0))?;
    scene.translate(group, (50.0, 0.0), Space::World)?;
    scene.rotate(planet, 45.0, Space::Local)?;

    info!("group bounds: {:?}", scene.get_bounds(group)?);
    info!("sun render bounds: {:?}", scene.get_render_bounds(sun)?);
    info!("group dirty rectangle: {:?}", scene.get_world_render_bounds(group)?);

    let config = CameraConfig::default();
    let mut camera = Camera::for_canvas(600.0, 500.0, &config);
    camera.create_landmark(
        "closeup",
        LandmarkParams {
            zoom: Some(2.0),
            ..Default::default()
        },
    );
    camera.goto_landmark(
        "closeup",
        LandmarkOptions::new()
            .duration(300.0)
            .on_finish(|| info!("arrived at closeup")),
    );

    let mut time = 0.0;
    while camera.is_animating() {
        camera.tick(time);
        time += 1000.0 / 60.0;
    }

    let pointer = Vec2::new(450.0, 250.0);
    let canvas_point = camera.viewport_to_canvas(pointer);
    info!(
        "pointer {:?} hits {:?} at canvas {:?}",
        pointer,
        scene.elements_from_point(canvas_point),
        canvas_point
    );
    info!("visible: {:?}", scene.cull(&camera.get_frustum()));

    let uniform = CameraUniform::new(&camera);
    info!("camera uniform: {} bytes", uniform.as_bytes().len());

    Ok(())
}
