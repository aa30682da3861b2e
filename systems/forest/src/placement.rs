//! Bounded rejection sampling used to scatter items and characters.

use log::warn;
use mystery_escape_core::{Rect, Vec2};
use rand::Rng;

/// Inclusive range of candidate origins for a placed box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementRegion {
    min: Vec2,
    max: Vec2,
}

impl PlacementRegion {
    /// Creates a region spanning the provided inclusive corners.
    ///
    /// The maximum is raised to the minimum when the corners are inverted.
    #[must_use]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    /// Region inset `near` tiles from the origin and `far` tiles from the far edges.
    #[must_use]
    pub fn inset(width: f32, height: f32, tile_length: f32, near: u32, far: u32) -> Self {
        let near = near as f32 * tile_length;
        let far = far as f32 * tile_length;
        Self::new(Vec2::splat(near), Vec2::new(width - far, height - far))
    }

    /// Smallest candidate origin.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Largest candidate origin.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.gen_range(self.min.x..=self.max.x).floor(),
            rng.gen_range(self.min.y..=self.max.y).floor(),
        )
    }
}

/// Rejection-samples an origin for a box of `size` accepted by `accept`.
///
/// After `max_attempts` rejected samples the region is scanned row-major at
/// `step` intervals and the first accepted origin is used. When nothing in the
/// region is acceptable the region's minimum corner is returned.
pub fn place<R, F>(
    rng: &mut R,
    region: PlacementRegion,
    size: Vec2,
    step: f32,
    max_attempts: u32,
    accept: F,
) -> Vec2
where
    R: Rng + ?Sized,
    F: Fn(Rect) -> bool,
{
    for _ in 0..max_attempts {
        let origin = region.sample(rng);
        if accept(Rect::new(origin, size)) {
            return origin;
        }
    }

    warn!(
        "rejection sampling exhausted {max_attempts} attempts, scanning {:?}..={:?}",
        region.min(),
        region.max()
    );
    scan(region, size, step, &accept).unwrap_or_else(|| {
        warn!("no acceptable origin in region, using {:?}", region.min());
        region.min()
    })
}

fn scan<F>(region: PlacementRegion, size: Vec2, step: f32, accept: &F) -> Option<Vec2>
where
    F: Fn(Rect) -> bool,
{
    if !(step > 0.0) {
        return None;
    }

    let mut y = region.min().y;
    while y <= region.max().y {
        let mut x = region.min().x;
        while x <= region.max().x {
            let origin = Vec2::new(x, y);
            if accept(Rect::new(origin, size)) {
                return Some(origin);
            }
            x += step;
        }
        y += step;
    }
    None
}
