/// Example: Print per-face winding values for a scene
///
/// Positive values are the faces the renderer would draw.
///
/// Usage: cargo run --example inspect_winding -- assets/scenes/demo.scene [models-dir]
use std::env;

use anyhow::Context;
use nalgebra::Vector3;
use sr3d_core::math::cross_sign;
use sr3d_core::{Camera, Model, Scene, SceneLoader, Transform};

const WIDTH: f32 = 800.0;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut scene = Scene::new();
    let start = match args.get(1) {
        Some(path) => {
            let models_dir = args.get(2).map_or("assets/models", String::as_str);
            SceneLoader::new(models_dir)
                .load_scene(path, &mut scene)
                .with_context(|| format!("failed to load scene {path}"))?
        }
        None => {
            eprintln!("No scene provided, using default cube...");
            let mut cube = Model::cube(2.0);
            Transform::translate_to(&mut cube, 0.0, 0.0, 6.0);
            scene.insert(cube);
            Vector3::zeros()
        }
    };

    let camera = Camera::new(start);
    scene.prepare_frame(&start);

    for model in scene.iter() {
        println!("{} (distance {:.2})", model.name, model.distance);
        if model.distance >= camera.render_distance {
            println!("  beyond render distance");
            continue;
        }

        let points = camera.project_vertices(model, WIDTH);
        let mut front = 0;
        for (index, face) in model.faces().iter().enumerate() {
            let [a, b, c] = face.indices.map(|i| points[i]);
            if !(a.is_visible() && b.is_visible() && c.is_visible()) {
                println!("  face {index:>3}: behind the camera");
                continue;
            }
            // Winding is translation invariant; centring is skipped.
            let cross = cross_sign(a.x, a.y, b.x, b.y, c.x, c.y);
            if cross > 0.0 {
                front += 1;
            }
            println!("  face {index:>3}: {cross:>12.2}");
        }
        println!("  {} of {} faces front-facing", front, model.faces().len());
    }
    Ok(())
}
