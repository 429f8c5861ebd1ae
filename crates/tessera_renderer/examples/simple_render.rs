//! Simple path tracer example.
//!
//! Renders the built-in sphere scene on every core and saves a PNG.

use tessera_core::builtin_scene;
use tessera_renderer::{Camera, RenderParams, Renderer, World};

fn main() {
    println!("Tessera Path Tracer - Simple Example");
    println!("====================================");

    let scene = builtin_scene("spheres").expect("spheres preset exists");
    let world = World::from_description(&scene);

    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let params = RenderParams::new(400, 225)
        .with_samples(64)
        .with_max_cpus(threads);
    let camera = Camera::from_description(&scene.camera, params.aspect());

    println!(
        "Rendering {}x{} @ {} spp on {} threads...",
        params.width, params.height, params.samples_per_pixel, threads
    );

    let start = std::time::Instant::now();
    let output = Renderer::new(params, &camera, &world)
        .render(|buffer| println!("  worker done, {} samples so far", buffer.total_samples()))
        .expect("Render failed");
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.png";
    output.snapshot().save(filename).expect("Failed to save image");
    println!("Saved to {}", filename);
}
