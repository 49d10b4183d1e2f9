//! STL export, binary and ASCII.
//!
//! Solids are tessellated on the way out; STL carries no topology, so
//! this is a one-way trip meant for printers and viewers.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use lapidary_brep::{Mesh, Solid};
use lapidary_math::Point3;

/// Tessellates a solid and writes it to `path` as binary STL.
pub fn save_stl<P: AsRef<Path>>(path: P, solid: &Solid) -> io::Result<()> {
    let name = path
        .as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("solid")
        .to_owned();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_binary_stl(&mut writer, &solid.tessellate(), &name)?;
    writer.flush()
}

/// Writes a mesh as binary STL: 80-byte header, triangle count, then
/// 50 bytes per triangle.
pub fn write_binary_stl<W: Write>(writer: &mut W, mesh: &Mesh, name: &str) -> io::Result<()> {
    let mut header = [0u8; 80];
    let label = name.as_bytes();
    let n = label.len().min(header.len());
    header[..n].copy_from_slice(&label[..n]);
    writer.write_all(&header)?;
    writer.write_all(&(mesh.triangles.len() as u32).to_le_bytes())?;

    for tri in &mesh.triangles {
        let [a, b, c] = corners(mesh, tri);
        for v in [normal(&a, &b, &c), vec3(&a), vec3(&b), vec3(&c)] {
            for coord in v {
                writer.write_all(&coord.to_le_bytes())?;
            }
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

/// Writes a mesh as ASCII STL. An order of magnitude bigger than
/// binary, but greppable.
pub fn write_ascii_stl<W: Write>(writer: &mut W, mesh: &Mesh, name: &str) -> io::Result<()> {
    writeln!(writer, "solid {name}")?;
    for tri in &mesh.triangles {
        let [a, b, c] = corners(mesh, tri);
        let [nx, ny, nz] = normal(&a, &b, &c);
        writeln!(writer, "  facet normal {nx:e} {ny:e} {nz:e}")?;
        writeln!(writer, "    outer loop")?;
        for v in [a, b, c] {
            writeln!(writer, "      vertex {:e} {:e} {:e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")
}

fn corners(mesh: &Mesh, tri: &[u32; 3]) -> [Point3; 3] {
    [
        mesh.positions[tri[0] as usize],
        mesh.positions[tri[1] as usize],
        mesh.positions[tri[2] as usize],
    ]
}

fn vec3(p: &Point3) -> [f32; 3] {
    [p.x as f32, p.y as f32, p.z as f32]
}

fn normal(a: &Point3, b: &Point3, c: &Point3) -> [f32; 3] {
    let n = (b - a).cross(&(c - a));
    let len = n.norm();
    if len > 1e-10 {
        [
            (n.x / len) as f32,
            (n.y / len) as f32,
            (n.z / len) as f32,
        ]
    } else {
        [0.0, 0.0, 0.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_stl_of_a_block_is_exactly_sized() {
        let mesh = Solid::block_centered(2.0).unwrap().tessellate();
        let mut bytes = Vec::new();
        write_binary_stl(&mut bytes, &mesh, "block").unwrap();
        // 6 square faces, 2 triangles each.
        assert_eq!(mesh.triangles.len(), 12);
        assert_eq!(bytes.len(), 84 + 12 * 50);
        assert_eq!(&bytes[..5], b"block");
        assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 12);
        // Every attribute byte count is zero.
        for i in 0..12 {
            let off = 84 + i * 50 + 48;
            assert_eq!(&bytes[off..off + 2], &[0, 0]);
        }
    }

    #[test]
    fn ascii_stl_is_well_formed() {
        let mesh = Solid::block_centered(1.0).unwrap().tessellate();
        let mut bytes = Vec::new();
        write_ascii_stl(&mut bytes, &mesh, "cube").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("solid cube\n"));
        assert!(text.trim_end().ends_with("endsolid cube"));
        assert_eq!(text.matches("facet normal").count(), 12);
        assert_eq!(text.matches("vertex").count(), 36);
    }

    #[test]
    fn long_names_are_truncated_into_the_header() {
        let mesh = Solid::block_centered(1.0).unwrap().tessellate();
        let name = "x".repeat(200);
        let mut bytes = Vec::new();
        write_binary_stl(&mut bytes, &mesh, &name).unwrap();
        assert_eq!(bytes.len(), 84 + mesh.triangles.len() * 50);
        assert!(bytes[..80].iter().all(|&b| b == b'x'));
    }
}
