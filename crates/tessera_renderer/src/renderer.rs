//! Core path tracing renderer.
//!
//! Implements progressive Monte Carlo path tracing with:
//! - Tile scheduling over a fixed set of worker threads
//! - Stratified sampling at the first bounce
//! - Probabilistic choice between glossy and diffuse bounces
//! - Hard truncation at `MAX_DEPTH` bounces

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tessera_math::{cone_sample, hemisphere_sample, reflect, OrthoNormalBasis};

use crate::{
    gen_f32, generate_tiles, Camera, Color, OutputBuffer, Ray, RenderError, RenderResult, Scene,
    Tile, WorkQueue,
};

/// Paths are cut off (returning black) after this many bounces.
pub const MAX_DEPTH: u32 = 5;

/// Default stratification grid at the primary hit.
pub const FIRST_BOUNCE_NUM_U_SAMPLES: u32 = 6;
pub const FIRST_BOUNCE_NUM_V_SAMPLES: u32 = 3;

/// Tiling granularity used by [`Renderer::render`].
pub const TILE_SIZE: u32 = 16;
pub const SAMPLES_PER_TILE: u32 = 8;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel for the finished image
    pub samples_per_pixel: u32,
    /// Number of worker threads
    pub max_cpus: usize,
    /// Shade hits with their flat diffuse color
    pub preview: bool,
    /// Stratification grid at the primary hit
    pub first_bounce_u_samples: u32,
    pub first_bounce_v_samples: u32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            samples_per_pixel: 32,
            max_cpus: 1,
            preview: false,
            first_bounce_u_samples: FIRST_BOUNCE_NUM_U_SAMPLES,
            first_bounce_v_samples: FIRST_BOUNCE_NUM_V_SAMPLES,
        }
    }
}

impl RenderParams {
    /// Default parameters at the given resolution.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_max_cpus(mut self, max_cpus: usize) -> Self {
        self.max_cpus = max_cpus;
        self
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_first_bounce(mut self, u_samples: u32, v_samples: u32) -> Self {
        self.first_bounce_u_samples = u_samples;
        self.first_bounce_v_samples = v_samples;
        self
    }

    /// Image width / height.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Reject configurations no render can start with.
    pub fn validate(&self) -> RenderResult<()> {
        let invalid = |what: &str| Err(RenderError::InvalidArgument(what.to_string()));

        if self.width == 0 || self.height == 0 {
            return invalid("image dimensions must be positive");
        }
        if self.samples_per_pixel == 0 {
            return invalid("samples per pixel must be positive");
        }
        if self.max_cpus == 0 {
            return invalid("at least one worker thread is required");
        }
        if self.first_bounce_u_samples == 0 || self.first_bounce_v_samples == 0 {
            return invalid("first bounce sample grid must be non-empty");
        }
        Ok(())
    }
}

/// Renders one camera view of a scene.
pub struct Renderer<'a> {
    params: RenderParams,
    camera: &'a Camera,
    scene: &'a dyn Scene,
}

impl<'a> Renderer<'a> {
    pub fn new(params: RenderParams, camera: &'a Camera, scene: &'a dyn Scene) -> Self {
        Self {
            params,
            camera,
            scene,
        }
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// [`generate_tiles`] over this renderer's image size.
    pub fn generate_tiles(
        &self,
        x_tile_size: u32,
        y_tile_size: u32,
        num_samples: u32,
        samples_per_tile: u32,
    ) -> RenderResult<Vec<Tile>> {
        generate_tiles(
            self.params.width,
            self.params.height,
            x_tile_size,
            y_tile_size,
            num_samples,
            samples_per_tile,
        )
    }

    /// Estimate the radiance arriving along `ray`.
    ///
    /// Takes `num_u_samples × num_v_samples` stratified bounces at this hit
    /// and a single bounce at every deeper one. A 1×1 call returns its one
    /// sample as is; larger grids return the mean.
    pub fn radiance(
        &self,
        rng: &mut dyn RngCore,
        ray: &Ray,
        depth: u32,
        num_u_samples: u32,
        num_v_samples: u32,
    ) -> Color {
        if depth >= MAX_DEPTH {
            return Color::ZERO;
        }

        let Some(hit) = self.scene.intersect(ray) else {
            return self.scene.environment(ray);
        };

        let material = hit.material;
        if self.params.preview {
            return material.diffuse;
        }

        // Local frame with z along the normal
        let basis = OrthoNormalBasis::from_z(hit.normal);

        let mut result = Color::ZERO;
        for u_sample in 0..num_u_samples {
            for v_sample in 0..num_v_samples {
                let u = (u_sample as f32 + gen_f32(rng)) / num_u_samples as f32;
                let v = (v_sample as f32 + gen_f32(rng)) / num_v_samples as f32;
                let p = gen_f32(rng);

                let direction = if p < material.reflectivity {
                    let mirror = reflect(ray.direction(), hit.normal);
                    cone_sample(mirror, material.reflection_cone_angle(), u, v)
                } else {
                    hemisphere_sample(&basis, u, v)
                };

                let bounce = Ray::new(hit.position, direction);
                result += material.emission
                    + material.diffuse * self.radiance(rng, &bounce, depth + 1, 1, 1);
            }
        }

        if num_u_samples == 1 && num_v_samples == 1 {
            result
        } else {
            result / (num_u_samples * num_v_samples) as f32
        }
    }

    /// Sum of `num_samples` jittered camera samples through pixel (x, y).
    fn render_pixel(&self, rng: &mut dyn RngCore, x: u32, y: u32, num_samples: u32) -> Color {
        let width = self.params.width as f32;
        let height = self.params.height as f32;

        let mut color = Color::ZERO;
        for _ in 0..num_samples {
            let u = (x as f32 + gen_f32(rng)) / width;
            let v = (y as f32 + gen_f32(rng)) / height;
            let ray = self.camera.ray(2.0 * u - 1.0, 2.0 * v - 1.0, rng);
            color += self.radiance(
                rng,
                &ray,
                0,
                self.params.first_bounce_u_samples,
                self.params.first_bounce_v_samples,
            );
        }
        color
    }

    /// Render the full sample budget.
    ///
    /// Spawns `max_cpus` workers that drain a shared tile queue. Each worker
    /// that finds the queue empty calls `progress` with the live buffer
    /// before exiting, so `progress` runs once per worker; the earlier calls
    /// see a partially converged image.
    pub fn render<F>(&self, progress: F) -> RenderResult<OutputBuffer>
    where
        F: Fn(&OutputBuffer) + Sync,
    {
        self.params.validate()?;

        let start = Instant::now();
        let output = OutputBuffer::new(self.params.width, self.params.height);
        let tiles = self.generate_tiles(
            TILE_SIZE,
            TILE_SIZE,
            self.params.samples_per_pixel,
            SAMPLES_PER_TILE,
        )?;
        log::info!(
            "Rendering {}x{} @ {} spp: {} tiles on {} threads{}",
            self.params.width,
            self.params.height,
            self.params.samples_per_pixel,
            tiles.len(),
            self.params.max_cpus,
            if self.params.preview { " (preview)" } else { "" }
        );

        let queue = WorkQueue::new(tiles);
        let (queue, output_ref, progress) = (&queue, &output, &progress);

        std::thread::scope(|s| -> RenderResult<()> {
            let mut handles = Vec::with_capacity(self.params.max_cpus);
            for worker in 0..self.params.max_cpus {
                let handle = std::thread::Builder::new()
                    .name(format!("tessera-worker-{worker}"))
                    .spawn_scoped(s, move || self.run_worker(worker, queue, output_ref, progress))?;
                handles.push(handle);
            }

            for handle in handles {
                // A panicking worker takes the whole render down with it
                let tiles_done = handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
                log::trace!("Joined worker after {} tiles", tiles_done);
            }
            Ok(())
        })?;

        log::info!(
            "Rendered {} samples in {:.2?}",
            output.total_samples(),
            start.elapsed()
        );
        Ok(output)
    }

    /// Worker loop; returns the number of tiles it rendered.
    fn run_worker<F>(
        &self,
        worker: usize,
        queue: &WorkQueue<Tile>,
        output: &OutputBuffer,
        progress: &F,
    ) -> usize
    where
        F: Fn(&OutputBuffer) + Sync,
    {
        let mut tiles_done = 0;

        while let Some(tile) = queue.pop(|| progress(output)) {
            log::trace!(
                "worker {} tile x {}..{} y {}..{} samples {}+{}",
                worker,
                tile.x_begin,
                tile.x_end,
                tile.y_begin,
                tile.y_end,
                tile.sample_offset,
                tile.samples
            );

            let mut rng = StdRng::seed_from_u64(tile.seed());
            for y in tile.y_begin..tile.y_end {
                for x in tile.x_begin..tile.x_end {
                    let color = self.render_pixel(&mut rng, x, y, tile.samples);
                    output.add_samples(x, y, color, tile.samples);
                }
            }
            tiles_done += 1;
        }

        log::debug!("worker {} finished after {} tiles", worker, tiles_done);
        tiles_done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Environment, Material, Sphere, Vec3, World};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tessera_core::builtin_scene;

    const EMISSION: Color = Color::new(1.0, 0.5, 0.25);

    /// Camera inside an emissive sphere: every ray sees `EMISSION`.
    fn furnace() -> World {
        let mut world = World::default();
        world.add(Box::new(Sphere::new(Vec3::ZERO, 10.0, Material::light(EMISSION))));
        world
    }

    fn camera(params: &RenderParams) -> Camera {
        Camera::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 60.0, params.aspect(), 0.0, 1.0)
    }

    fn assert_close(a: Color, b: Color) {
        assert!((a - b).abs().max_element() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_depth_limit_returns_black() {
        let world = furnace();
        let params = RenderParams::new(4, 4);
        let camera = camera(&params);
        let renderer = Renderer::new(params, &camera, &world);
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(renderer.radiance(&mut rng, &ray, MAX_DEPTH, 2, 2), Color::ZERO);
        assert_eq!(renderer.radiance(&mut rng, &ray, MAX_DEPTH + 3, 1, 1), Color::ZERO);
        assert_close(renderer.radiance(&mut rng, &ray, MAX_DEPTH - 1, 1, 1), EMISSION);
    }

    #[test]
    fn test_miss_returns_environment() {
        let world = World::new(Environment::Solid(Color::new(0.2, 0.4, 0.6)));
        let params = RenderParams::new(4, 4);
        let camera = camera(&params);
        let renderer = Renderer::new(params, &camera, &world);
        let mut rng = StdRng::seed_from_u64(1);

        let color = renderer.radiance(&mut rng, &Ray::new(Vec3::ZERO, Vec3::Y), 0, 3, 3);
        assert_eq!(color, Color::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_preview_returns_flat_diffuse() {
        let mut world = World::new(Environment::Solid(Color::ONE));
        world.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Material::new(Color::new(0.3, 0.6, 0.9), Color::splat(5.0), 0.5, 0.2),
        )));
        let params = RenderParams::new(4, 4).with_preview(true);
        let camera = camera(&params);
        let renderer = Renderer::new(params, &camera, &world);
        let mut rng = StdRng::seed_from_u64(9);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(renderer.radiance(&mut rng, &ray, 0, 6, 3), Color::new(0.3, 0.6, 0.9));
    }

    #[test]
    fn test_single_sample_is_not_averaged() {
        let world = furnace();
        let params = RenderParams::new(4, 4);
        let camera = camera(&params);
        let renderer = Renderer::new(params, &camera, &world);
        let mut rng = StdRng::seed_from_u64(5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.3, 0.2, -1.0));

        // Each sub-sample contributes EMISSION; only grids are divided
        let single = renderer.radiance(&mut rng, &ray, 0, 1, 1);
        assert_close(single, EMISSION);

        let grid = renderer.radiance(&mut rng, &ray, 0, 2, 2);
        let manual = (0..4)
            .map(|_| renderer.radiance(&mut rng, &ray, 0, 1, 1))
            .sum::<Color>()
            / 4.0;
        assert_close(grid, manual);
        assert_close(grid, EMISSION);
    }

    #[test]
    fn test_radiance_is_non_negative() {
        let desc = builtin_scene("cornell").unwrap();
        let world = World::from_description(&desc);
        let params = RenderParams::new(8, 8);
        let camera = Camera::from_description(&desc.camera, params.aspect());
        let renderer = Renderer::new(params, &camera, &world);
        let mut rng = StdRng::seed_from_u64(1234);

        for i in 0..200 {
            let ndc_x = (i % 20) as f32 / 10.0 - 1.0;
            let ndc_y = (i / 20) as f32 / 5.0 - 1.0;
            let ray = camera.ray(ndc_x, ndc_y, &mut rng);
            let color = renderer.radiance(&mut rng, &ray, 0, 2, 2);
            assert!(color.min_element() >= 0.0, "negative radiance {color:?}");
            assert!(color.is_finite());
        }
    }

    #[test]
    fn test_render_emissive_sphere() {
        let world = furnace();
        let params = RenderParams::new(4, 4).with_samples(1).with_max_cpus(1);
        let camera = camera(&params);
        let renderer = Renderer::new(params, &camera, &world);

        let output = renderer.render(|_| {}).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let pixel = output.pixel(x, y);
                assert_eq!(pixel.samples, 1);
                assert_close(pixel.mean(), EMISSION);
            }
        }
    }

    #[test]
    fn test_sample_counts_match_budget_for_any_thread_count() {
        let world = furnace();
        let spp = 12;
        let mut outputs = Vec::new();

        for max_cpus in [1, 8] {
            let params = RenderParams::new(40, 18)
                .with_samples(spp)
                .with_max_cpus(max_cpus)
                .with_first_bounce(2, 1);
            let camera = camera(&params);
            let renderer = Renderer::new(params, &camera, &world);
            outputs.push(renderer.render(|_| {}).unwrap());
        }

        for output in &outputs {
            for y in 0..18 {
                for x in 0..40 {
                    assert_eq!(output.pixel(x, y).samples, spp);
                }
            }
        }
    }

    #[test]
    fn test_thread_count_does_not_change_noisy_image() {
        let desc = builtin_scene("cornell").unwrap();
        let world = World::from_description(&desc);
        let mut images = Vec::new();

        for max_cpus in [1, 8] {
            let params = RenderParams::new(24, 24)
                .with_samples(12)
                .with_max_cpus(max_cpus)
                .with_first_bounce(2, 1);
            let camera = Camera::from_description(&desc.camera, params.aspect());
            let renderer = Renderer::new(params, &camera, &world);
            images.push(renderer.render(|_| {}).unwrap().snapshot());
        }

        // Tiles carry their own seeds; only summation order may differ
        let (single, multi) = (&images[0], &images[1]);
        for (a, b) in single.pixels.iter().zip(&multi.pixels) {
            let tolerance = 1e-4 * a.abs().max_element().max(1.0);
            assert!((*a - *b).abs().max_element() < tolerance, "{a:?} != {b:?}");
        }

        // Estimates in this scene change with the random stream
        let params = RenderParams::new(24, 24);
        let camera = Camera::from_description(&desc.camera, params.aspect());
        let renderer = Renderer::new(params, &camera, &world);
        let ray = Ray::new(desc.camera.look_from, desc.camera.look_at - desc.camera.look_from);
        let a = renderer.radiance(&mut StdRng::seed_from_u64(1), &ray, 0, 2, 1);
        let b = renderer.radiance(&mut StdRng::seed_from_u64(2), &ray, 0, 2, 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_progress_runs_once_per_worker() {
        let world = furnace();
        let params = RenderParams::new(20, 20)
            .with_samples(2)
            .with_max_cpus(3)
            .with_preview(true);
        let camera = camera(&params);
        let renderer = Renderer::new(params, &camera, &world);
        let calls = AtomicUsize::new(0);

        let output = renderer
            .render(|buffer| {
                assert_eq!(buffer.width(), 20);
                calls.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 3);
        assert_eq!(output.total_samples(), 20 * 20 * 2);
    }

    #[test]
    fn test_invalid_params_fail_before_rendering() {
        let world = furnace();
        let calls = AtomicUsize::new(0);

        for params in [
            RenderParams::new(0, 4),
            RenderParams::new(4, 4).with_samples(0),
            RenderParams::new(4, 4).with_max_cpus(0),
            RenderParams::new(4, 4).with_first_bounce(0, 3),
        ] {
            let camera = Camera::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 60.0, 1.0, 0.0, 1.0);
            let renderer = Renderer::new(params, &camera, &world);
            let result = renderer.render(|_| {
                calls.fetch_add(1, Ordering::Relaxed);
            });
            assert!(matches!(result, Err(RenderError::InvalidArgument(_))));
        }
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_generate_tiles_uses_image_size() {
        let world = furnace();
        let params = RenderParams::new(40, 18);
        let camera = camera(&params);
        let renderer = Renderer::new(params, &camera, &world);

        assert_eq!(
            renderer.generate_tiles(16, 16, 20, 8).unwrap(),
            generate_tiles(40, 18, 16, 16, 20, 8).unwrap()
        );
    }
}
