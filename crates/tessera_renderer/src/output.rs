//! Sample accumulation and image export.

use std::path::Path;

use parking_lot::Mutex;
use rayon::prelude::*;

use crate::{Color, RenderResult};

/// Running sum of radiance samples for one pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PixelSample {
    pub sum: Color,
    pub samples: u32,
}

impl PixelSample {
    /// Average radiance, black while no sample has landed.
    pub fn mean(&self) -> Color {
        if self.samples == 0 {
            Color::ZERO
        } else {
            self.sum / self.samples as f32
        }
    }
}

/// Per-pixel (sum, count) accumulator shared by all render workers.
///
/// Tiles covering the same pixels with different sample batches can run
/// on different threads at once, so each cell has its own lock.
pub struct OutputBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Mutex<PixelSample>>,
}

impl OutputBuffer {
    /// Create a zeroed buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let pixels = (0..width as usize * height as usize)
            .map(|_| Mutex::new(PixelSample::default()))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        y as usize * self.width as usize + x as usize
    }

    /// Add `sample_count` samples whose radiance sums to `color_sum`.
    pub fn add_samples(&self, x: u32, y: u32, color_sum: Color, sample_count: u32) {
        let mut cell = self.pixels[self.index(x, y)].lock();
        cell.sum += color_sum;
        cell.samples += sample_count;
    }

    /// Current accumulated state of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> PixelSample {
        *self.pixels[self.index(x, y)].lock()
    }

    /// Total samples accumulated over all pixels.
    pub fn total_samples(&self) -> u64 {
        self.pixels.iter().map(|p| p.lock().samples as u64).sum()
    }

    /// Averaged copy of the buffer. Safe to call while workers are adding.
    pub fn snapshot(&self) -> ImageBuffer {
        ImageBuffer {
            width: self.width,
            height: self.height,
            pixels: self.pixels.par_iter().map(|p| p.lock().mean()).collect(),
        }
    }
}

/// Averaged colors in row-major order.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Convert to gamma-corrected RGBA bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        let rgba: Vec<[u8; 4]> = self.pixels.par_iter().map(|c| color_to_rgba(*c)).collect();
        bytemuck::cast_slice(&rgba).to_vec()
    }

    /// Write the image; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        image::save_buffer(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f32| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}
