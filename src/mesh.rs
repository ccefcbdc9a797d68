//! Mesh stages: indexed sphere, flattened triangle list, and the final
//! renderer-facing buffers.
//!
//! Each stage is its own type, so normals can only be computed from a
//! flattened mesh and the renderer can only receive complete buffers.

use glam::Vec3;
use tracing::warn;

use crate::biome::Color;
use crate::error::{PlanetError, Result};

/// Shared vertices plus triangle index triples.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexedMesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Number of indices (three per triangle).
    pub fn index_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// Indices as one flat list, in triangle order.
    pub fn indices(&self) -> &[u32] {
        bytemuck::cast_slice(&self.triangles)
    }
}

/// Non-indexed triangles: every run of three entries is one triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatMesh {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Color>,
}

impl FlatMesh {
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Expand an indexed mesh and its per-vertex colors into independent
/// triangles, preserving index order.
///
/// `colors` must be parallel to `mesh.vertices`; a length mismatch is an
/// [`PlanetError::InvalidArgument`].
pub fn flatten(mesh: &IndexedMesh, colors: &[Color]) -> Result<FlatMesh> {
    if colors.len() != mesh.vertices.len() {
        return Err(PlanetError::InvalidArgument(format!(
            "{} colors for {} vertices",
            colors.len(),
            mesh.vertices.len()
        )));
    }

    let count = mesh.index_count();
    let mut positions = Vec::with_capacity(count);
    let mut flat_colors = Vec::with_capacity(count);
    for &i in mesh.indices() {
        positions.push(mesh.vertices[i as usize]);
        flat_colors.push(colors[i as usize]);
    }

    Ok(FlatMesh {
        positions,
        colors: flat_colors,
    })
}

/// Face normal of one triangle, or `None` when it has collapsed.
#[inline]
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Option<Vec3> {
    (b - a).cross(c - a).try_normalize()
}

/// One flat normal per entry of a triangle list; all three corners of a
/// triangle share it.
///
/// Collapsed triangles get [`Vec3::ZERO`] instead of NaN.
pub fn compute_flat_normals(positions: &[Vec3]) -> Vec<Vec3> {
    let mut normals = Vec::with_capacity(positions.len());
    let mut degenerate = 0usize;

    for tri in positions.chunks_exact(3) {
        let n = face_normal(tri[0], tri[1], tri[2]).unwrap_or_else(|| {
            degenerate += 1;
            Vec3::ZERO
        });
        normals.extend_from_slice(&[n, n, n]);
    }

    if degenerate > 0 {
        warn!(degenerate, "degenerate triangles given zero normals");
    }
    normals
}

/// Position, normal and color streams ready for GPU upload.
///
/// All three have equal length, a multiple of three.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceBuffers {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<Color>,
}

impl SurfaceBuffers {
    /// Finish a flat mesh by computing its face normals.
    pub fn from_flat(flat: FlatMesh) -> Self {
        let normals = compute_flat_normals(&flat.positions);
        Self {
            positions: flat.positions,
            normals,
            colors: flat.colors,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append another set of buffers.
    pub fn extend(&mut self, other: &SurfaceBuffers) {
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.colors.extend_from_slice(&other.colors);
    }

    pub fn positions_f32(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn normals_f32(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn colors_f32(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icosphere::IcoSphere;

    #[test]
    fn test_flatten_rejects_short_color_buffer() {
        let mesh = IcoSphere::build(1).unwrap();
        let colors = vec![[0.0; 3]; mesh.vertices.len() - 1];
        assert!(matches!(
            flatten(&mesh, &colors),
            Err(PlanetError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_flatten_preserves_order() {
        let mesh = IcoSphere::build(2).unwrap();
        let colors: Vec<Color> = (0..mesh.vertices.len())
            .map(|i| [i as f32, 0.0, 0.0])
            .collect();
        let flat = flatten(&mesh, &colors).unwrap();

        assert_eq!(flat.positions.len(), mesh.index_count());
        assert_eq!(flat.triangle_count(), mesh.triangles.len());
        for (t, tri) in mesh.triangles.iter().enumerate() {
            for (k, &i) in tri.iter().enumerate() {
                assert_eq!(flat.positions[t * 3 + k], mesh.vertices[i as usize]);
                assert_eq!(flat.colors[t * 3 + k], colors[i as usize]);
            }
        }
    }

    #[test]
    fn test_flatten_float_count() {
        let mesh = IcoSphere::build(3).unwrap();
        let colors = vec![[0.5; 3]; mesh.vertices.len()];
        let buffers = SurfaceBuffers::from_flat(flatten(&mesh, &colors).unwrap());

        let expected = 3 * mesh.triangles.len() * 3;
        assert_eq!(buffers.positions_f32().len(), expected);
        assert_eq!(buffers.normals_f32().len(), expected);
        assert_eq!(buffers.colors_f32().len(), expected);
    }

    #[test]
    fn test_known_triangle_normal() {
        let normals = compute_flat_normals(&[Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert_eq!(normals, vec![Vec3::Z; 3]);
    }

    #[test]
    fn test_degenerate_triangle_gets_zero_normal() {
        let collinear = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        let normals = compute_flat_normals(&collinear);
        assert_eq!(normals, vec![Vec3::ZERO; 3]);
        assert!(normals.iter().all(|n| !n.is_nan()));
    }

    #[test]
    fn test_sphere_normals_unit_and_outward() {
        let mesh = IcoSphere::build(2).unwrap();
        let colors = vec![[1.0; 3]; mesh.vertices.len()];
        let buffers = SurfaceBuffers::from_flat(flatten(&mesh, &colors).unwrap());

        for (tri, normals) in buffers
            .positions
            .chunks_exact(3)
            .zip(buffers.normals.chunks_exact(3))
        {
            assert_eq!(normals[0], normals[1]);
            assert_eq!(normals[1], normals[2]);
            assert!((normals[0].length() - 1.0).abs() < 1e-5);
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!(normals[0].dot(centroid) > 0.0, "normal points inward");
        }
    }

    #[test]
    fn test_extend_appends_all_streams() {
        let mut a = SurfaceBuffers::from_flat(FlatMesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            colors: vec![[1.0, 0.0, 0.0]; 3],
        });
        let b = a.clone();
        a.extend(&b);
        assert_eq!(a.vertex_count(), 6);
        assert_eq!(a.normals.len(), 6);
        assert_eq!(a.colors.len(), 6);
    }
}
