//! Tessera command line renderer.
//!
//! Renders a built-in or JSON scene and writes the image. The output file
//! is refreshed with the partial image whenever a worker runs out of tiles.

mod args;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::Mutex;
use tessera_core::resolve_scene;
use tessera_renderer::{Camera, RenderParams, Renderer, World};

use crate::args::CliArgs;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    log::info!("Starting Tessera");

    let scene = resolve_scene(&args.scene)
        .with_context(|| format!("Failed to load scene '{}'", args.scene))?;

    let params = RenderParams::new(args.width, args.height)
        .with_samples(args.spp)
        .with_max_cpus(args.max_cpus)
        .with_preview(args.preview);
    params.validate()?;

    let world = World::from_description(&scene);
    let camera = Camera::from_description(&scene.camera, params.aspect());
    let renderer = Renderer::new(params, &camera, &world);

    // Workers drain the queue at about the same time; write one at a time
    let write_lock = Mutex::new(());
    let start = Instant::now();
    let output = renderer.render(|buffer| {
        let _guard = write_lock.lock();
        match buffer.snapshot().save(&args.output) {
            Ok(()) => log::debug!(
                "Progress: {} samples written to {:?}",
                buffer.total_samples(),
                args.output
            ),
            Err(e) => log::warn!("Failed to write progress image: {}", e),
        }
    })?;
    log::info!("Render finished in {:?}", start.elapsed());

    output
        .snapshot()
        .save(&args.output)
        .with_context(|| format!("Failed to save {:?}", args.output))?;
    log::info!("Saved to {:?}", args.output);

    Ok(())
}
