use glam::Vec3;
use image::{Rgb, RgbImage};
use std::f32::consts::{PI, TAU};
use std::path::Path;

use crate::biome::Color;
use crate::error::{PlanetError, Result};
use crate::terrain::surface_color;
use crate::world::World;

// Reference latitudes drawn as dashed lines: equator, tropics.
const REFERENCE_LATITUDES: &[(f32, [u8; 3])] = &[
    (0.0, [220, 50, 50]),
    (23.5, [220, 150, 0]),
    (-23.5, [220, 150, 0]),
];
// Dash pattern: 6 px on, 4 px off
const DASH_ON: u32 = 6;
const DASH_OFF: u32 = 4;

/// Unit direction seen through pixel `(x, y)` of an equirectangular map.
/// Row 0 is the north pole (+Y).
pub(crate) fn pixel_direction(x: u32, y: u32, width: u32, height: u32) -> Vec3 {
    let lon = (x as f32 + 0.5) / width as f32 * TAU;
    let lat = PI / 2.0 - (y as f32 + 0.5) / height as f32 * PI;
    Vec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin())
}

pub(crate) fn to_rgb(c: Color) -> Rgb<u8> {
    Rgb(c.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8))
}

pub(crate) fn check_width(width: u32) -> Result<u32> {
    if width < 2 {
        return Err(PlanetError::InvalidArgument(format!(
            "preview width must be at least 2, got {width}"
        )));
    }
    Ok(width / 2)
}

/// Render the planet's biome colors as a `width × width/2` equirectangular map.
///
/// Each pixel is classified exactly like a mesh vertex in the same direction,
/// so the map matches the globe at any resolution.
pub fn render_preview(world: &World, width: u32) -> Result<RgbImage> {
    let height = check_width(width)?;
    let config = &world.config;
    let noise = world.noise();
    let shape = config.shape();
    let water = config.water();

    let mut img = RgbImage::from_fn(width, height, |x, y| {
        let dir = pixel_direction(x, y, width, height);
        let radius = shape.surface_radius(&noise, dir);
        to_rgb(surface_color(dir, radius, &noise, &shape, water, &config.palette))
    });

    for &(lat_deg, color) in REFERENCE_LATITUDES {
        let row = (height as f32 * (0.5 - lat_deg / 180.0)).round() as u32;
        if row >= height {
            continue;
        }
        for x in (0..width).filter(|x| x % (DASH_ON + DASH_OFF) < DASH_ON) {
            img.put_pixel(x, row, Rgb(color));
        }
    }
    Ok(img)
}

/// Write [`render_preview`] to `path`.
pub fn export_preview_png(world: &World, width: u32, path: &Path) -> Result<()> {
    render_preview(world, width)?.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::PlanetConfig;

    #[test]
    fn test_pixel_direction_poles_and_equator() {
        let north = pixel_direction(0, 0, 360, 180);
        assert!(north.y > 0.99);
        let south = pixel_direction(0, 179, 360, 180);
        assert!(south.y < -0.99);
        let equator = pixel_direction(90, 90, 360, 181);
        assert!(equator.y.abs() < 1e-6);
        assert!((equator.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_preview_dimensions_and_determinism() {
        let world = World::new("preview", PlanetConfig::default()).unwrap();
        let a = render_preview(&world, 64).unwrap();
        let b = render_preview(&world, 64).unwrap();
        assert_eq!(a.dimensions(), (64, 32));
        assert_eq!(a, b);
    }

    #[test]
    fn test_preview_rejects_tiny_width() {
        let world = World::new("tiny", PlanetConfig::default()).unwrap();
        assert!(render_preview(&world, 1).is_err());
    }

    #[test]
    fn test_export_preview_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        let world = World::new("png", PlanetConfig::default()).unwrap();
        export_preview_png(&world, 32, &path).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (32, 16));
    }
}
