//! Template geometry instanced by the scatterer: built-in trees and cloud
//! puffs, plus a small Wavefront OBJ reader for custom models.

use std::f32::consts::TAU;
use std::path::Path;

use glam::Vec3;
use tracing::{debug, warn};

use crate::biome::Color;
use crate::error::{PlanetError, Result};
use crate::mesh::{SurfaceBuffers, compute_flat_normals, face_normal};

pub const TRUNK_COLOR: Color = [0.40, 0.26, 0.13];
pub const FOLIAGE_COLOR: Color = [0.13, 0.45, 0.16];
pub const CLOUD_COLOR: Color = [0.96, 0.96, 0.98];

/// Accumulates triangles, then finishes them into buffers.
#[derive(Default)]
struct Builder {
    positions: Vec<Vec3>,
    colors: Vec<Color>,
}

impl Builder {
    fn triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, color: Color) {
        self.positions.extend_from_slice(&[a, b, c]);
        self.colors.extend_from_slice(&[color; 3]);
    }

    /// Vertical `sides`-gon frustum from `y0` to `y1`. A zero top radius
    /// closes it into a cone.
    fn frustum(&mut self, sides: u32, r0: f32, r1: f32, y0: f32, y1: f32, color: Color) {
        let ring = |r: f32, y: f32, k: u32| {
            let a = k as f32 / sides as f32 * TAU;
            Vec3::new(r * a.cos(), y, r * a.sin())
        };
        let bottom = Vec3::new(0.0, y0, 0.0);
        let top = Vec3::new(0.0, y1, 0.0);

        for k in 0..sides {
            let b0 = ring(r0, y0, k);
            let b1 = ring(r0, y0, k + 1);
            if r1 > 0.0 {
                let t0 = ring(r1, y1, k);
                let t1 = ring(r1, y1, k + 1);
                self.triangle(b0, t0, b1, color);
                self.triangle(b1, t0, t1, color);
                self.triangle(top, t1, t0, color);
            } else {
                self.triangle(b0, top, b1, color);
            }
            self.triangle(bottom, b0, b1, color);
        }
    }

    /// Axis-aligned octahedron with the given half-extents.
    fn octahedron(&mut self, center: Vec3, extent: Vec3, color: Color) {
        for sx in [1.0f32, -1.0] {
            for sy in [1.0f32, -1.0] {
                for sz in [1.0f32, -1.0] {
                    let x = center + Vec3::new(sx * extent.x, 0.0, 0.0);
                    let y = center + Vec3::new(0.0, sy * extent.y, 0.0);
                    let z = center + Vec3::new(0.0, 0.0, sz * extent.z);
                    // An odd number of mirrored axes flips the winding.
                    if sx * sy * sz > 0.0 {
                        self.triangle(x, y, z, color);
                    } else {
                        self.triangle(x, z, y, color);
                    }
                }
            }
        }
    }

    fn finish(self) -> SurfaceBuffers {
        let normals = compute_flat_normals(&self.positions);
        SurfaceBuffers {
            positions: self.positions,
            normals,
            colors: self.colors,
        }
    }
}

/// Low-poly tree standing on the origin, growing along +Y, about one unit
/// tall: a hexagonal trunk under a conical crown.
pub fn tree() -> SurfaceBuffers {
    let mut b = Builder::default();
    b.frustum(6, 0.08, 0.06, 0.0, 0.35, TRUNK_COLOR);
    b.frustum(6, 0.35, 0.0, 0.25, 1.0, FOLIAGE_COLOR);
    b.finish()
}

/// Flattened cluster of three puffs, centred on the origin.
pub fn cloud_puff() -> SurfaceBuffers {
    let mut b = Builder::default();
    b.octahedron(Vec3::ZERO, Vec3::new(0.5, 0.3, 0.4), CLOUD_COLOR);
    b.octahedron(Vec3::new(0.4, -0.05, 0.1), Vec3::new(0.35, 0.22, 0.3), CLOUD_COLOR);
    b.octahedron(Vec3::new(-0.4, -0.05, -0.1), Vec3::new(0.35, 0.2, 0.3), CLOUD_COLOR);
    b.finish()
}

/// Minimal stand-in used when a model cannot be loaded.
pub fn placeholder(tint: Color) -> SurfaceBuffers {
    let mut b = Builder::default();
    b.octahedron(Vec3::ZERO, Vec3::splat(0.5), tint);
    b.finish()
}

// ── OBJ ───────────────────────────────────────────────────────────────────────

fn parse_err(line: usize, message: impl Into<String>) -> PlanetError {
    PlanetError::TemplateParse {
        line,
        message: message.into(),
    }
}

fn parse_vec3<'a>(line: usize, mut fields: impl Iterator<Item = &'a str>) -> Result<Vec3> {
    let mut xyz = [0.0f32; 3];
    for c in &mut xyz {
        let field = fields
            .next()
            .ok_or_else(|| parse_err(line, "expected three coordinates"))?;
        *c = field
            .parse()
            .map_err(|_| parse_err(line, format!("bad number `{field}`")))?;
    }
    Ok(Vec3::from_array(xyz))
}

/// Resolve a 1-based (or negative, relative) OBJ index against `len` items.
fn resolve(line: usize, raw: &str, len: usize) -> Result<usize> {
    let i: i64 = raw
        .parse()
        .map_err(|_| parse_err(line, format!("bad index `{raw}`")))?;
    let resolved = match i {
        0 => None,
        i if i > 0 => Some(i - 1),
        i => Some(len as i64 + i),
    };
    match resolved {
        Some(r) if r >= 0 && (r as usize) < len => Ok(r as usize),
        _ => Err(parse_err(line, format!("index {i} out of range"))),
    }
}

/// Parse OBJ text into a triangle list tinted with `tint`.
///
/// Understands `v`, `vn` and `f` records; polygons are fan-triangulated from
/// their first corner. Faces without normals get flat ones.
pub fn parse_obj(text: &str, tint: Color) -> Result<SurfaceBuffers> {
    let mut vertices = Vec::new();
    let mut vertex_normals = Vec::new();
    let mut out = SurfaceBuffers::default();

    for (n, raw) in text.lines().enumerate() {
        let line = n + 1;
        let mut fields = raw.split_whitespace();
        match fields.next() {
            Some("v") => vertices.push(parse_vec3(line, fields)?),
            Some("vn") => vertex_normals.push(parse_vec3(line, fields)?),
            Some("f") => {
                let mut corners = Vec::new();
                for token in fields {
                    let mut parts = token.split('/');
                    let v = resolve(line, parts.next().unwrap_or(""), vertices.len())?;
                    let vn = match parts.nth(1) {
                        Some(s) if !s.is_empty() => {
                            Some(resolve(line, s, vertex_normals.len())?)
                        }
                        _ => None,
                    };
                    corners.push((v, vn));
                }
                if corners.len() < 3 {
                    return Err(parse_err(line, "face needs at least three corners"));
                }
                for k in 1..corners.len() - 1 {
                    let tri = [corners[0], corners[k], corners[k + 1]];
                    let [a, b, c] = tri.map(|(v, _)| vertices[v]);
                    let flat = face_normal(a, b, c).unwrap_or(Vec3::ZERO);
                    for (v, vn) in tri {
                        out.positions.push(vertices[v]);
                        out.normals
                            .push(vn.map_or(flat, |i| vertex_normals[i].normalize_or_zero()));
                        out.colors.push(tint);
                    }
                }
            }
            _ => {}
        }
    }

    if out.is_empty() {
        return Err(parse_err(0, "model has no faces"));
    }
    Ok(out)
}

/// Load an OBJ template, substituting [`placeholder`] if the file is missing
/// or malformed so generation can carry on.
pub fn load_template(path: &Path, tint: Color) -> SurfaceBuffers {
    let loaded = std::fs::read_to_string(path)
        .map_err(PlanetError::from)
        .and_then(|text| parse_obj(&text, tint));
    match loaded {
        Ok(mesh) => {
            debug!(path = %path.display(), triangles = mesh.triangle_count(), "loaded template");
            mesh
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "template unavailable, using placeholder");
            placeholder(tint)
        }
    }
}
