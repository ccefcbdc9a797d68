use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::mesh::SurfaceBuffers;

/// Write a triangle list as Wavefront OBJ.
///
/// Vertex colors ride along as the non-standard `v x y z r g b` extension
/// most viewers understand. Every corner gets its own `v`/`vn` pair, so face
/// `k` references `3k+1 .. 3k+3`.
pub fn export_obj(buffers: &SurfaceBuffers, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_obj(buffers, &mut out)?;
    out.flush()?;
    Ok(())
}

fn write_obj(buffers: &SurfaceBuffers, out: &mut impl Write) -> Result<()> {
    writeln!(out, "# {} triangles", buffers.triangle_count())?;
    for (p, c) in buffers.positions.iter().zip(&buffers.colors) {
        writeln!(out, "v {} {} {} {} {} {}", p.x, p.y, p.z, c[0], c[1], c[2])?;
    }
    for n in &buffers.normals {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for t in 0..buffers.triangle_count() {
        let [a, b, c] = [3 * t + 1, 3 * t + 2, 3 * t + 3];
        writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{CLOUD_COLOR, parse_obj, placeholder};

    #[test]
    fn test_obj_reimports_identically() {
        let mesh = placeholder(CLOUD_COLOR);
        let mut text = Vec::new();
        write_obj(&mesh, &mut text).unwrap();

        let back = parse_obj(std::str::from_utf8(&text).unwrap(), CLOUD_COLOR).unwrap();
        assert_eq!(back.positions, mesh.positions);
        for (a, b) in back.normals.iter().zip(&mesh.normals) {
            assert!(a.abs_diff_eq(*b, 1e-6), "normal {a} != {b}");
        }
    }

    #[test]
    fn test_export_obj_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.obj");
        export_obj(&placeholder(CLOUD_COLOR), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 8);
    }
}
