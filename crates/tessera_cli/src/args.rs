//! Command line parsing.

use std::path::PathBuf;

use clap::Parser;

/// Tile-scheduled path tracer.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "tessera", version, about)]
pub struct CliArgs {
    /// Image width in pixels
    #[arg(long, default_value_t = 320)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 240)]
    pub height: u32,

    /// Samples per pixel
    #[arg(long, default_value_t = 32)]
    pub spp: u32,

    /// Worker threads
    #[arg(long, default_value_t = available_cpus())]
    pub max_cpus: usize,

    /// Built-in scene (cornell, spheres, emissive) or JSON file
    #[arg(long, default_value = "cornell")]
    pub scene: String,

    /// Output image, rewritten as the render progresses
    #[arg(short, long, default_value = "image.png")]
    pub output: PathBuf,

    /// Flat diffuse shading, no bounces
    #[arg(long)]
    pub preview: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn available_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
