use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use serde_json::json;
use strata2d::{
    AssetManager, ComponentFactory, FixedTimestep, LayerFactory, LoadContext, RecordingTarget,
    SceneEvent, SceneState, SimulationConfig, WindowId,
};

const LEVEL_WIDTH: u32 = 320;
const LEVEL_HEIGHT: u32 = 240;
const FRAMES: usize = 180;

/// Ground with a gentle hill and a ledge on the right.
fn build_terrain() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(LEVEL_WIDTH, LEVEL_HEIGHT, Rgba([255, 255, 255, 255]));
    for x in 0..LEVEL_WIDTH {
        let hill = (((x as f64) / 40.0).sin() * 12.0) as i64;
        let mut ground = 200 - hill;
        if x > 240 {
            ground = 150;
        }
        for y in ground.max(0) as u32..LEVEL_HEIGHT {
            img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
        }
    }
    img
}

fn scenes() -> serde_json::Value {
    let crate_box = |x: f64| {
        json!({
            "position": { "x": x, "y": 20 },
            "velocity": { "x": 0, "y": 80 },
            "metadata": { "name": "crate" },
            "components": [
                { "component_type": "physics", "component_subtype": "BoxCollider",
                  "box": { "x": 0, "y": 0, "width": 12, "height": 12 } },
                { "component_type": "physics", "component_subtype": "RigidBody", "mass": 4 },
                { "component_type": "graphics", "component_subtype": "PlaceholderGraphics",
                  "width": 12, "height": 12, "colour": { "r": 160, "g": 110, "b": 40 } }
            ]
        })
    };

    json!({
        "scenes": [{
            "id": "hills",
            "width": LEVEL_WIDTH,
            "height": LEVEL_HEIGHT,
            "layers": [
                { "type": "ImageLayer", "order": 0, "asset_id": "sky",
                  "position": { "x": 0, "y": 0, "width": LEVEL_WIDTH, "height": LEVEL_HEIGHT } },
                { "type": "BitmapCollisionLayer", "order": 1, "asset_id": "terrain", "visible": true,
                  "position": { "x": 0, "y": 0, "width": LEVEL_WIDTH, "height": LEVEL_HEIGHT } }
            ],
            "objects": [
                {
                    "position": { "x": 40, "y": 10 },
                    "velocity": { "x": 30, "y": 0 },
                    "object_type": "Player",
                    "components": [
                        { "component_type": "physics", "component_subtype": "BoxCollider",
                          "box": { "x": 0, "y": 0, "width": 10, "height": 16 } },
                        { "component_type": "physics", "component_subtype": "RigidBody", "mass": 1 },
                        { "component_type": "graphics", "component_subtype": "PlaceholderGraphics",
                          "width": 10, "height": 16, "colour": { "r": 40, "g": 90, "b": 220 } }
                    ]
                },
                crate_box(120.0),
                crate_box(260.0),
                { "components": [{ "component_type": "ai", "component_subtype": "Pathfinder" }] }
            ]
        }]
    })
}

fn load_config() -> Result<SimulationConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let config = SimulationConfig::from_file(&path)
                .with_context(|| format!("failed to load config from {path}"))?;
            config.validate()?;
            Ok(config)
        }
        None => Ok(SimulationConfig::default().with_viewport(LEVEL_WIDTH, LEVEL_HEIGHT)),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let layers = LayerFactory::with_builtins();
    let components = ComponentFactory::with_builtins();
    let mut assets = AssetManager::new();
    assets.insert_texture("sky", LEVEL_WIDTH, LEVEL_HEIGHT);
    assets.insert_image("terrain", build_terrain());

    let ctx = LoadContext {
        layers: &layers,
        components: &components,
        assets: &assets,
        config: &config,
    };
    let window = WindowId(0);
    let mut state = SceneState::new(&scenes(), "hills", window, &ctx)?;
    let events = state.scene().events();

    let steps = Arc::new(AtomicUsize::new(0));
    let counter = steps.clone();
    state.add_update_hook(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    });
    state.set_end_scene_callback(|| log::info!("Scene finished"));

    let player = state
        .scene()
        .objects()
        .first()
        .map(|o| o.id())
        .context("scene has no player")?;

    let mut target = RecordingTarget::new(config.viewport_width, config.viewport_height);
    let mut timestep = FixedTimestep::from_millis_f64(config.ms_per_update);
    // Host frames deliberately run slower than the simulation step.
    let frame_time = Duration::from_millis(25);

    for frame in 0..FRAMES {
        timestep.accumulate(frame_time);
        while timestep.should_update() {
            state.update(config.ms_per_update);
        }
        state.scene_mut().center_camera_on(player);
        state.render(&mut target);
        let commands = target.take();
        if frame % 60 == 0 {
            log::info!(
                "Frame {frame}: {} draw calls, {} steps so far",
                commands.len(),
                steps.load(Ordering::Relaxed)
            );
        }
    }

    for event in events.try_iter() {
        match event {
            SceneEvent::Collision { object, class, side, .. } => {
                log::debug!("{object} collided ({class:?}, {side})");
            }
            SceneEvent::ObjectSkipped { index, reason } => {
                log::warn!("Object {index} was not loaded: {reason}");
            }
            SceneEvent::ResolveFailed { object, layer_order } => {
                log::warn!("{object} is stuck in layer {layer_order}");
            }
            SceneEvent::StateChanged { .. } => {}
        }
    }

    for object in state.scene().objects() {
        log::info!(
            "{} ({:?}) came to rest at ({:.1}, {:.1})",
            object.id(),
            object.object_type(),
            object.position.x,
            object.position.y
        );
    }
    state.scene_mut().end_scene();
    Ok(())
}
