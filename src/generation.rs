use std::time::Instant;

use tracing::info;

use crate::error::Result;
use crate::icosphere::IcoSphere;
use crate::mesh::{SurfaceBuffers, flatten};
use crate::scatter::{Placement, ScatterRule, scatter_objects, spin_seed};
use crate::template;
use crate::terrain::{classify, displace};
use crate::world::World;

/// Geometry instanced onto the planet.
#[derive(Clone, Debug)]
pub struct Templates {
    pub tree: SurfaceBuffers,
    pub cloud: SurfaceBuffers,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            tree: template::tree(),
            cloud: template::cloud_puff(),
        }
    }
}

/// Everything the renderer draws for one planet.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanetMeshes {
    /// Terrain with trees merged in.
    pub surface: SurfaceBuffers,
    /// Cloud layer, kept separate so it can be animated on its own.
    pub clouds: SurfaceBuffers,
}

/// Run the full pipeline for `world`.
///
/// Build → displace → classify → flatten → normals → scatter. Every stage
/// returns a fresh value; nothing is carried over from earlier builds, so a
/// caller that changes parameters mid-build just discards the stale result.
pub fn generate_planet(world: &World, templates: &Templates) -> Result<PlanetMeshes> {
    let started = Instant::now();
    let config = &world.config;
    config.validate()?;

    let noise = world.noise();
    let shape = config.shape();
    let water = config.water();

    // Displace before flattening: shared vertices must move together.
    let base = IcoSphere::build(config.resolution)?;
    let terrain = displace(&base, &noise, &shape);
    let colors = classify(&terrain, &noise, &shape, water, &config.palette)?;
    let surface = SurfaceBuffers::from_flat(flatten(&terrain, &colors)?);
    let terrain_vertices = surface.vertex_count();

    let tree_rule = ScatterRule {
        spin_seed: Some(spin_seed(config.trees.seed)),
        ..ScatterRule::trees()
    };
    let surface = scatter_objects(
        &surface,
        &Placement::Density {
            count: config.trees.density,
            seed: config.trees.seed,
        },
        &noise,
        &shape,
        water.level,
        &tree_rule,
        &templates.tree,
    );
    let surface = scatter_objects(
        &surface,
        &Placement::Points(world.planted.clone()),
        &noise,
        &shape,
        water.level,
        &tree_rule,
        &templates.tree,
    );
    let trees =
        (surface.vertex_count() - terrain_vertices) / templates.tree.vertex_count().max(1);

    let cloud_rule = ScatterRule {
        spin_seed: Some(spin_seed(config.clouds.seed)),
        ..ScatterRule::clouds(config.clouds.altitude)
    };
    let clouds = scatter_objects(
        &SurfaceBuffers::default(),
        &Placement::Density {
            count: config.clouds.density,
            seed: config.clouds.seed,
        },
        &noise,
        &shape,
        water.level,
        &cloud_rule,
        &templates.cloud,
    );

    info!(
        seed = %world.seed,
        resolution = config.resolution,
        noise = %config.noise_type,
        triangles = surface.triangle_count(),
        trees,
        cloud_triangles = clouds.triangle_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generated planet"
    );

    Ok(PlanetMeshes { surface, clouds })
}
