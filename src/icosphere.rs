//! Icosphere construction: a unit icosahedron recursively subdivided into a
//! watertight triangulated sphere.

use std::collections::HashMap;

use glam::Vec3;
use tracing::debug;

use crate::error::{PlanetError, Result};
use crate::mesh::IndexedMesh;

/// Highest subdivision level accepted by [`IcoSphere::build`].
///
/// Level 10 already produces ~10.5M vertices; one more would exceed the
/// memory a single planet buffer can reasonably hold.
pub const MAX_SUBDIVISIONS: i32 = 10;

/// The 20 faces of the base icosahedron, right-hand wound (outward normals).
const BASE_FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Unordered vertex pair packed into one integer, smaller index in the high
/// half. Only constructible through [`EdgeKey::new`], which canonicalises.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeKey(u64);

impl EdgeKey {
    #[inline]
    pub fn new(a: u32, b: u32) -> Self {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        Self((u64::from(lo) << 32) | u64::from(hi))
    }

    /// The two endpoints, smaller first.
    pub fn endpoints(self) -> (u32, u32) {
        ((self.0 >> 32) as u32, self.0 as u32)
    }
}

/// Edge → midpoint vertex index, valid for a single subdivision pass.
#[derive(Debug, Default)]
pub struct MidpointCache {
    map: HashMap<EdgeKey, u32>,
}

impl MidpointCache {
    pub fn with_capacity(edges: usize) -> Self {
        Self {
            map: HashMap::with_capacity(edges),
        }
    }

    /// Index of the normalized midpoint of edge `(i, j)`, appending it to
    /// `vertices` the first time the edge is seen.
    pub fn midpoint(&mut self, vertices: &mut Vec<Vec3>, i: u32, j: u32) -> u32 {
        let key = EdgeKey::new(i, j);
        if let Some(&idx) = self.map.get(&key) {
            return idx;
        }
        let (lo, hi) = key.endpoints();
        let mid = (vertices[lo as usize] + vertices[hi as usize]) * 0.5;
        let idx = vertices.len() as u32;
        vertices.push(mid.normalize());
        self.map.insert(key, idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Builder for unit icospheres.
pub struct IcoSphere;

impl IcoSphere {
    /// Build a unit icosphere subdivided `subdivision_level` times.
    ///
    /// Produces `20 * 4^n` triangles and `10 * 4^n + 2` vertices.
    pub fn build(subdivision_level: i32) -> Result<IndexedMesh> {
        if subdivision_level < 0 {
            return Err(PlanetError::InvalidArgument(format!(
                "subdivision level must be non-negative, got {subdivision_level}"
            )));
        }
        if subdivision_level > MAX_SUBDIVISIONS {
            return Err(PlanetError::InvalidArgument(format!(
                "subdivision level {subdivision_level} exceeds maximum {MAX_SUBDIVISIONS}"
            )));
        }

        let mut mesh = Self::icosahedron();
        for _ in 0..subdivision_level {
            mesh = Self::subdivide(mesh);
        }
        debug!(
            level = subdivision_level,
            vertices = mesh.vertices.len(),
            triangles = mesh.triangles.len(),
            "built icosphere"
        );
        Ok(mesh)
    }

    /// The unsubdivided icosahedron on the unit sphere.
    pub fn icosahedron() -> IndexedMesh {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let vertices = [
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ]
        .into_iter()
        .map(Vec3::normalize)
        .collect();

        IndexedMesh {
            vertices,
            triangles: BASE_FACES.to_vec(),
        }
    }

    /// Split every triangle into four at its edge midpoints.
    fn subdivide(mesh: IndexedMesh) -> IndexedMesh {
        let IndexedMesh {
            mut vertices,
            triangles,
        } = mesh;
        // Closed mesh: each edge is shared by two triangles.
        let mut cache = MidpointCache::with_capacity(triangles.len() * 3 / 2);
        let mut next = Vec::with_capacity(triangles.len() * 4);

        for &[a, b, c] in &triangles {
            let ab = cache.midpoint(&mut vertices, a, b);
            let bc = cache.midpoint(&mut vertices, b, c);
            let ca = cache.midpoint(&mut vertices, c, a);

            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }

        IndexedMesh {
            vertices,
            triangles: next,
        }
    }
}
