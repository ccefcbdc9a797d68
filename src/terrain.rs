//! Noise-driven radial displacement and per-vertex biome coloring.
//!
//! Displacement, classification and scattering all read terrain height
//! through the same [`TerrainShape`], so the underwater depth and tree
//! placement always agree with the geometry that was actually displaced.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::biome::{Color, Palette, land_biome, water_color};
use crate::error::{PlanetError, Result};
use crate::mesh::IndexedMesh;
use crate::noise::NoiseProvider;

/// Slack added to the waterline so vertices clamped onto it count as water.
pub const WATER_EPSILON: f32 = 1e-4;

/// How noise deforms the unit sphere.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainShape {
    /// Displacement amplitude.
    pub strength: f32,
    /// Spatial frequency multiplier applied before sampling.
    pub frequency: f32,
    /// Radius floor; the displaced surface never sinks below it.
    pub min_deformation: f32,
}

impl Default for TerrainShape {
    fn default() -> Self {
        Self {
            strength: 0.1,
            frequency: 2.0,
            min_deformation: 1.0,
        }
    }
}

impl TerrainShape {
    /// Raw noise at a unit direction, scaled by the frequency.
    #[inline]
    pub fn sample(&self, noise: &NoiseProvider, dir: Vec3) -> f32 {
        let f = f64::from(self.frequency);
        noise.sample(
            f64::from(dir.x) * f,
            f64::from(dir.y) * f,
            f64::from(dir.z) * f,
        ) as f32
    }

    /// Height the terrain would have at `dir` without the radius floor.
    #[inline]
    pub fn theoretical_height(&self, noise: &NoiseProvider, dir: Vec3) -> f32 {
        1.0 + self.sample(noise, dir) * self.strength
    }

    /// Radius of the displaced surface at `dir`.
    #[inline]
    pub fn surface_radius(&self, noise: &NoiseProvider, dir: Vec3) -> f32 {
        self.theoretical_height(noise, dir).max(self.min_deformation)
    }
}

/// Water shading parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaterLevel {
    /// Sphere radius separating ocean from land.
    pub level: f32,
    /// Depth at which water reaches the deep color.
    pub max_depth: f32,
}

/// Push every vertex of a unit sphere out along its direction.
///
/// Must run on the deduplicated mesh: a vertex shared by several triangles is
/// displaced once, so neighbouring faces stay stitched together.
pub fn displace(mesh: &IndexedMesh, noise: &NoiseProvider, shape: &TerrainShape) -> IndexedMesh {
    let vertices = mesh
        .vertices
        .iter()
        .map(|&v| v * shape.surface_radius(noise, v))
        .collect();
    IndexedMesh {
        vertices,
        triangles: mesh.triangles.clone(),
    }
}

/// Color for a point on the surface at direction `dir` and radius `radius`.
pub fn surface_color(
    dir: Vec3,
    radius: f32,
    noise: &NoiseProvider,
    shape: &TerrainShape,
    water: WaterLevel,
    palette: &Palette,
) -> Color {
    if radius <= water.level + WATER_EPSILON {
        // Clamped vertices sit on the floor; recover the real sea-bed depth.
        let height = shape.theoretical_height(noise, dir);
        let depth = ((water.level - height) / water.max_depth).clamp(0.0, 1.0);
        water_color(palette, depth)
    } else {
        palette.color(land_biome(radius - water.level))
    }
}

/// One color per vertex of a displaced mesh.
pub fn classify(
    mesh: &IndexedMesh,
    noise: &NoiseProvider,
    shape: &TerrainShape,
    water: WaterLevel,
    palette: &Palette,
) -> Result<Vec<Color>> {
    if water.max_depth.is_nan() || water.max_depth <= 0.0 {
        return Err(PlanetError::InvalidArgument(format!(
            "max depth must be positive, got {}",
            water.max_depth
        )));
    }

    let missing: Vec<String> = palette.missing().map(|b| b.to_string()).collect();
    if !missing.is_empty() {
        warn!(?missing, "palette incomplete, falling back to magenta");
    }

    let mut underwater = 0usize;
    let colors = mesh
        .vertices
        .iter()
        .map(|&v| {
            let radius = v.length();
            if radius <= water.level + WATER_EPSILON {
                underwater += 1;
            }
            let dir = v.try_normalize().unwrap_or(Vec3::Y);
            surface_color(dir, radius, noise, shape, water, palette)
        })
        .collect();

    debug!(vertices = mesh.vertices.len(), underwater, "classified terrain");
    Ok(colors)
}
