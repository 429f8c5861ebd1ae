//! Tessera Renderer - tile-scheduled CPU path tracing.
//!
//! A Monte Carlo path tracer whose frame is cut into prioritized tiles
//! (pixel rectangles × sample batches). A fixed set of worker threads
//! drains a shared queue of tiles and accumulates samples into a
//! per-pixel-locked output buffer, so partial results can be shown while
//! the image converges.

mod camera;
mod error;
mod material;
mod output;
mod primitive;
mod renderer;
mod sphere;
mod tile;
mod triangle;
mod work_queue;
mod world;

pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use material::{Color, Material, MAX_CONE_ANGLE};
pub use output::{color_to_rgba, ImageBuffer, OutputBuffer, PixelSample};
pub use primitive::{Intersection, Primitive, Scene};
pub use renderer::{
    RenderParams, Renderer, FIRST_BOUNCE_NUM_U_SAMPLES, FIRST_BOUNCE_NUM_V_SAMPLES, MAX_DEPTH,
    SAMPLES_PER_TILE, TILE_SIZE,
};
pub use sphere::Sphere;
pub use tile::{generate_tiles, Tile};
pub use triangle::Triangle;
pub use work_queue::WorkQueue;
pub use world::{Environment, World};

/// Re-export Vec3 and common math types from tessera_math
pub use tessera_math::{Interval, Ray, Vec3};

use rand::{Rng, RngCore};

/// Uniform sample in [0, 1).
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}
