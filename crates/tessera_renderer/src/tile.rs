//! Tile generation.
//!
//! A tile is a rectangle of pixels together with a batch of that
//! rectangle's samples. Splitting along both axes keeps tiles small enough
//! to balance across workers while every pixel still converges in several
//! passes.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::{RenderError, RenderResult};

/// One unit of render work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Half-open pixel bounds
    pub x_begin: u32,
    pub x_end: u32,
    pub y_begin: u32,
    pub y_end: u32,
    /// Samples to take per pixel
    pub samples: u32,
    /// Index of the first of those samples within the pixel budget
    pub sample_offset: u32,
    /// Squared distance of the rectangle midpoint from the image centre
    pub distance_sqr: u64,
    /// Tiebreaker, also the seed for this tile's random stream
    pub random_prio: u32,
}

impl Tile {
    /// Scheduling key; the queue serves larger keys first.
    pub fn key(&self) -> (u64, u32) {
        (self.distance_sqr, self.random_prio)
    }

    pub fn width(&self) -> u32 {
        self.x_end - self.x_begin
    }

    pub fn height(&self) -> u32 {
        self.y_end - self.y_begin
    }

    pub fn pixel_count(&self) -> u32 {
        self.width() * self.height()
    }

    /// RNG seed for this tile.
    ///
    /// Sibling batches of one rectangle share `random_prio`, so the sample
    /// offset goes into the low bits to keep their streams independent.
    pub fn seed(&self) -> u64 {
        ((self.random_prio as u64) << 32) | self.sample_offset as u64
    }
}

/// Cut a `width` × `height` image with `num_samples` samples per pixel into
/// tiles of at most `x_tile_size` × `y_tile_size` pixels and
/// `samples_per_tile` samples.
///
/// Tiles come back sorted by descending [`Tile::key`], so the outer edges
/// of the frame are scheduled before its centre. The result depends only on
/// the arguments: the tiebreakers are drawn from an RNG seeded with
/// `width * height`.
pub fn generate_tiles(
    width: u32,
    height: u32,
    x_tile_size: u32,
    y_tile_size: u32,
    num_samples: u32,
    samples_per_tile: u32,
) -> RenderResult<Vec<Tile>> {
    if x_tile_size == 0 || y_tile_size == 0 {
        return Err(RenderError::InvalidArgument(format!(
            "tile size must be positive, got {x_tile_size}x{y_tile_size}"
        )));
    }
    if samples_per_tile == 0 {
        return Err(RenderError::InvalidArgument(
            "samples per tile must be positive".into(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(width as u64 * height as u64);
    let centre_x = (width / 2) as i64;
    let centre_y = (height / 2) as i64;
    let mut tiles = Vec::new();

    for y_begin in (0..height).step_by(y_tile_size as usize) {
        let y_end = y_begin.saturating_add(y_tile_size).min(height);
        for x_begin in (0..width).step_by(x_tile_size as usize) {
            let x_end = x_begin.saturating_add(x_tile_size).min(width);

            let mid_x = ((x_begin + x_end) / 2) as i64;
            let mid_y = ((y_begin + y_end) / 2) as i64;
            let distance_sqr =
                ((mid_x - centre_x).pow(2) + (mid_y - centre_y).pow(2)) as u64;
            let random_prio = rng.next_u32();

            for sample_offset in (0..num_samples).step_by(samples_per_tile as usize) {
                let samples = sample_offset.saturating_add(samples_per_tile).min(num_samples)
                    - sample_offset;
                tiles.push(Tile {
                    x_begin,
                    x_end,
                    y_begin,
                    y_end,
                    samples,
                    sample_offset,
                    distance_sqr,
                    random_prio,
                });
            }
        }
    }

    // Stable, so batches of one rectangle stay in sample order
    tiles.sort_by(|a, b| b.key().cmp(&a.key()));
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_work(tiles: &[Tile]) -> u64 {
        tiles
            .iter()
            .map(|t| t.pixel_count() as u64 * t.samples as u64)
            .sum()
    }

    #[test]
    fn test_exact_fit() {
        let tiles = generate_tiles(32, 32, 16, 16, 16, 8).unwrap();
        // 2x2 rectangles, 2 batches each
        assert_eq!(tiles.len(), 8);
        assert_eq!(total_work(&tiles), 32 * 32 * 16);
    }

    #[test]
    fn test_partial_fit() {
        let tiles = generate_tiles(37, 21, 16, 16, 10, 8).unwrap();
        // 3x2 rectangles, batches of 8 + 2
        assert_eq!(tiles.len(), 12);
        assert_eq!(total_work(&tiles), 37 * 21 * 10);
        assert!(tiles.iter().all(|t| t.x_end <= 37 && t.y_end <= 21));
        assert!(tiles.iter().any(|t| t.samples == 2 && t.sample_offset == 8));
    }

    #[test]
    fn test_covers_every_pixel_sample_exactly_once() {
        let (width, height, spp) = (23, 17, 13);
        let tiles = generate_tiles(width, height, 5, 4, spp, 3).unwrap();

        let mut coverage = vec![0u8; (width * height * spp) as usize];
        for tile in &tiles {
            for y in tile.y_begin..tile.y_end {
                for x in tile.x_begin..tile.x_end {
                    for s in tile.sample_offset..tile.sample_offset + tile.samples {
                        coverage[((y * width + x) * spp + s) as usize] += 1;
                    }
                }
            }
        }
        assert!(coverage.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_sorted_by_descending_key() {
        let tiles = generate_tiles(100, 60, 16, 16, 24, 8).unwrap();
        assert!(tiles.windows(2).all(|w| w[0].key() >= w[1].key()));

        // Edges first, the rectangle holding the centre last
        let last = tiles.last().unwrap();
        assert!(last.x_begin <= 50 && 50 < last.x_end);
        assert!(last.y_begin <= 30 && 30 < last.y_end);
    }

    #[test]
    fn test_batches_share_priority_and_keep_order() {
        let tiles = generate_tiles(16, 16, 16, 16, 20, 8).unwrap();
        assert_eq!(tiles.len(), 3);
        assert!(tiles.iter().all(|t| t.random_prio == tiles[0].random_prio));
        let offsets: Vec<_> = tiles.iter().map(|t| t.sample_offset).collect();
        assert_eq!(offsets, vec![0, 8, 16]);

        // ...but draw from different streams
        assert_ne!(tiles[0].seed(), tiles[1].seed());
    }

    #[test]
    fn test_deterministic() {
        let a = generate_tiles(64, 48, 16, 16, 32, 8).unwrap();
        let b = generate_tiles(64, 48, 16, 16, 32, 8).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_zero_sizes() {
        assert!(matches!(
            generate_tiles(8, 8, 0, 4, 4, 4),
            Err(RenderError::InvalidArgument(_))
        ));
        assert!(generate_tiles(8, 8, 4, 0, 4, 4).is_err());
        assert!(generate_tiles(8, 8, 4, 4, 4, 0).is_err());
    }

    #[test]
    fn test_empty_budget_yields_no_tiles() {
        assert!(generate_tiles(8, 8, 4, 4, 0, 4).unwrap().is_empty());
    }
}
