//! Object scattering: instancing template geometry (trees, cloud puffs) on
//! the displaced surface, each copy standing along the local sphere normal.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::SeedableRng;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use tracing::debug;

use crate::mesh::SurfaceBuffers;
use crate::noise::NoiseProvider;
use crate::terrain::TerrainShape;

/// Where to put objects.
#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    /// Explicit surface points, e.g. spots the user clicked.
    Points(Vec<Vec3>),
    /// `count` directions drawn uniformly over the sphere from `seed`.
    Density { count: u32, seed: u64 },
}

impl Placement {
    /// Concrete placement points (directions for the density form).
    pub fn points(&self) -> Vec<Vec3> {
        match self {
            Placement::Points(points) => points.clone(),
            Placement::Density { count, seed } => uniform_directions(*count, *seed),
        }
    }
}

/// `count` unit vectors spread uniformly over the sphere.
pub fn uniform_directions(count: u32, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let r1: f32 = StandardUniform.sample(&mut rng);
            let r2: f32 = StandardUniform.sample(&mut rng);
            let theta = r1 * TAU;
            let phi = (2.0 * r2 - 1.0).clamp(-1.0, 1.0).acos();
            Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
        })
        .collect()
}

/// Mixed into a placement seed to get an independent spin stream.
const SPIN_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seed for instance spin when placements are drawn from `placement_seed`.
pub fn spin_seed(placement_seed: u64) -> u64 {
    placement_seed ^ SPIN_SALT
}

/// Which placements survive and how instances are sized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterRule {
    /// Altitude above the waterline must exceed this.
    pub min_altitude: f32,
    /// Altitude above the waterline must stay below this.
    pub max_altitude: f32,
    /// Uniform scale applied to the template.
    pub scale: f32,
    /// Extra radial offset above the surface (clouds float, trees don't).
    pub lift: f32,
    /// Seed for a random spin about the surface normal; `None` keeps every
    /// instance facing the same way.
    pub spin_seed: Option<u64>,
}

impl ScatterRule {
    /// Trees grow on land between the beach and the snow line.
    pub fn trees() -> Self {
        Self {
            min_altitude: 0.02,
            max_altitude: 0.35,
            scale: 0.02,
            lift: 0.0,
            spin_seed: Some(0),
        }
    }

    /// Clouds drift at a fixed height above the ground, over land or sea.
    pub fn clouds(altitude: f32) -> Self {
        Self {
            min_altitude: f32::NEG_INFINITY,
            max_altitude: f32::INFINITY,
            scale: 0.06,
            lift: altitude,
            spin_seed: Some(1),
        }
    }

    fn accepts(&self, altitude: f32) -> bool {
        altitude > self.min_altitude && altitude < self.max_altitude
    }
}

/// Append one transformed copy of `template` to `out`.
fn instance(
    out: &mut SurfaceBuffers,
    template: &SurfaceBuffers,
    at: Vec3,
    rotation: Quat,
    scale: f32,
) {
    out.positions
        .extend(template.positions.iter().map(|&p| at + rotation * (p * scale)));
    out.normals
        .extend(template.normals.iter().map(|&n| rotation * n));
    out.colors.extend_from_slice(&template.colors);
}

/// Copy `surface` and append an instance of `template` at every accepted
/// placement.
///
/// Each point is projected onto the sphere, its terrain height re-derived
/// from `noise` and `shape`, and the instance rotated so the template's +Y
/// follows the surface normal.
pub fn scatter_objects(
    surface: &SurfaceBuffers,
    placements: &Placement,
    noise: &NoiseProvider,
    shape: &TerrainShape,
    water_level: f32,
    rule: &ScatterRule,
    template: &SurfaceBuffers,
) -> SurfaceBuffers {
    let mut out = surface.clone();
    let mut spin = rule.spin_seed.map(StdRng::seed_from_u64);
    let points = placements.points();
    let mut placed = 0usize;

    for p in &points {
        let Some(normal) = p.try_normalize() else {
            continue;
        };
        // Draw the spin before filtering so accepted instances keep their
        // orientation when neighbouring placements change.
        let yaw = spin
            .as_mut()
            .map(|rng| StandardUniform.sample(rng))
            .map_or(0.0, |r: f32| r * TAU);

        let height = shape.surface_radius(noise, normal);
        if !rule.accepts(height - water_level) {
            continue;
        }

        let rotation =
            Quat::from_axis_angle(normal, yaw) * Quat::from_rotation_arc(Vec3::Y, normal);
        instance(
            &mut out,
            template,
            normal * (height + rule.lift),
            rotation,
            rule.scale,
        );
        placed += 1;
    }

    debug!(requested = points.len(), placed, "scattered objects");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseKind;
    use crate::template;

    fn noise() -> NoiseProvider {
        NoiseProvider::from_seed_str(NoiseKind::Gradient, "forest")
    }

    /// Flat terrain at radius `1 + strength * 0`: every point has the same
    /// altitude, which makes acceptance easy to reason about.
    fn flat(min_deformation: f32) -> TerrainShape {
        TerrainShape {
            strength: 0.0,
            frequency: 1.0,
            min_deformation,
        }
    }

    #[test]
    fn test_uniform_directions_deterministic_unit() {
        let a = uniform_directions(256, 7);
        let b = uniform_directions(256, 7);
        assert_eq!(a, b);
        assert_ne!(a, uniform_directions(256, 8));
        for d in &a {
            assert!((d.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_uniform_directions_cover_both_hemispheres() {
        let dirs = uniform_directions(1000, 3);
        let north = dirs.iter().filter(|d| d.z > 0.0).count();
        assert!((350..650).contains(&north), "skewed sample: {north} north");
    }

    #[test]
    fn test_spin_stream_independent_of_placements() {
        for seed in [0, 1, 2, 99] {
            assert_ne!(spin_seed(seed), seed);
            let mut placements = StdRng::seed_from_u64(seed);
            let mut spin = StdRng::seed_from_u64(spin_seed(seed));
            let a: Vec<f32> = (0..8)
                .map(|_| StandardUniform.sample(&mut placements))
                .collect();
            let b: Vec<f32> = (0..8)
                .map(|_| StandardUniform.sample(&mut spin))
                .collect();
            assert_ne!(a, b, "seed {seed} shares its stream");
        }
    }

    #[test]
    fn test_accepted_tree_lands_on_surface() {
        let template = template::tree();
        let shape = flat(1.1);
        let out = scatter_objects(
            &SurfaceBuffers::default(),
            &Placement::Points(vec![Vec3::new(0.0, 3.0, 0.0)]),
            &noise(),
            &shape,
            1.0,
            &ScatterRule::trees(),
            &template,
        );
        assert_eq!(out.vertex_count(), template.vertex_count());
        // Template origin is the trunk base; it must sit at the surface.
        let lowest = out
            .positions
            .iter()
            .map(|p| p.length())
            .fold(f32::MAX, f32::min);
        assert!((lowest - 1.1).abs() < 1e-3, "trunk base at radius {lowest}");
    }

    #[test]
    fn test_out_of_band_trees_rejected() {
        let template = template::tree();
        let points = Placement::Points(vec![Vec3::X, Vec3::Y, Vec3::Z]);
        // Altitude 0.02 (beach edge) and 0.35 (snow edge) are both excluded.
        for floor in [1.0, 1.02, 1.35, 1.5] {
            let out = scatter_objects(
                &SurfaceBuffers::default(),
                &points,
                &noise(),
                &flat(floor),
                1.0,
                &ScatterRule::trees(),
                &template,
            );
            assert!(out.is_empty(), "tree placed at altitude {}", floor - 1.0);
        }
    }

    #[test]
    fn test_instances_follow_surface_normal() {
        let template = template::tree();
        let dir = Vec3::new(1.0, -2.0, 0.5).normalize();
        let rule = ScatterRule {
            spin_seed: None,
            ..ScatterRule::trees()
        };
        let out = scatter_objects(
            &SurfaceBuffers::default(),
            &Placement::Points(vec![dir * 1.2]),
            &noise(),
            &flat(1.1),
            1.0,
            &rule,
            &template,
        );
        // The template apex is (0, 1, 0); after placement it points along dir.
        let apex = out
            .positions
            .iter()
            .copied()
            .max_by(|a, b| a.dot(dir).total_cmp(&b.dot(dir)))
            .unwrap();
        let offset = (apex - dir * 1.1).normalize();
        assert!(offset.dot(dir) > 0.999, "tree leans: {offset}");
    }

    #[test]
    fn test_appends_to_existing_surface() {
        let surface = template::placeholder([0.0; 3]);
        let template = template::cloud_puff();
        let out = scatter_objects(
            &surface,
            &Placement::Density { count: 10, seed: 5 },
            &noise(),
            &TerrainShape::default(),
            1.0,
            &ScatterRule::clouds(0.15),
            &template,
        );
        assert_eq!(&out.positions[..surface.vertex_count()], &surface.positions[..]);
        assert_eq!(
            out.vertex_count(),
            surface.vertex_count() + 10 * template.vertex_count()
        );
        assert_eq!(out.normals.len(), out.positions.len());
        assert_eq!(out.colors.len(), out.positions.len());
    }

    #[test]
    fn test_density_scatter_deterministic() {
        let run = || {
            scatter_objects(
                &SurfaceBuffers::default(),
                &Placement::Density { count: 200, seed: 99 },
                &noise(),
                &TerrainShape::default(),
                1.0,
                &ScatterRule::trees(),
                &template::tree(),
            )
        };
        assert_eq!(run(), run());
    }
}
