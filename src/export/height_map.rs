/// Export the terrain height field as a false-colour PNG.
///
/// Heights are sampled in the same equirectangular layout as the biome
/// preview, before the ocean floor clamp, so sea-bed relief stays visible.
///
/// Colour encoding
/// ───────────────
/// "Jet" ramp: blue (low) → cyan → green → yellow → red (high).
/// The waterline maps to green; `±strength` around it spans the full ramp.
use image::{Rgb, RgbImage};
use std::path::Path;

use super::png::{check_width, pixel_direction};
use crate::error::Result;
use crate::world::World;

/// "Jet" ramp: blue → cyan → green → yellow → red.
/// `t` ∈ [0.0, 1.0].
fn jet(t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    // Piecewise linear hat functions shifted to R, G, B channels.
    let r = (1.5 - (4.0 * t - 3.0).abs()).clamp(0.0, 1.0);
    let g = (1.5 - (4.0 * t - 2.0).abs()).clamp(0.0, 1.0);
    let b = (1.5 - (4.0 * t - 1.0).abs()).clamp(0.0, 1.0);
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

/// Colourize a signed value v ∈ [-1.0, 1.0] → jet(0.0 … 1.0).
#[inline]
fn diverge(v: f32) -> [u8; 3] {
    jet((v.clamp(-1.0, 1.0) + 1.0) * 0.5)
}

/// Render the theoretical height field relative to the waterline.
pub fn render_height_map(world: &World, width: u32) -> Result<RgbImage> {
    let height = check_width(width)?;
    let noise = world.noise();
    let shape = world.config.shape();
    let water_level = world.config.water_level;
    let span = shape.strength.abs().max(f32::EPSILON);

    Ok(RgbImage::from_fn(width, height, |x, y| {
        let dir = pixel_direction(x, y, width, height);
        let h = shape.theoretical_height(&noise, dir);
        Rgb(diverge((h - water_level) / span))
    }))
}

/// Write [`render_height_map`] to `path`.
pub fn export_height_map(world: &World, width: u32, path: &Path) -> Result<()> {
    render_height_map(world, width)?.save(path)?;
    Ok(())
}
