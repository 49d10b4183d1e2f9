//! Triangle meshes for measurement and export.

use std::collections::HashMap;

use lapidary_math::{Point3, Vec3};

use crate::face::Face;
use crate::point_key;
use crate::solid::Solid;

/// An indexed triangle mesh with shared vertices.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Deduplicated vertex positions.
    pub positions: Vec<Point3>,
    /// Counterclockwise triangles indexing into `positions`.
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Enclosed volume by the divergence theorem. Only meaningful for a
    /// closed, outward-oriented mesh.
    pub fn volume(&self) -> f64 {
        let mut six_v = 0.0;
        for t in &self.triangles {
            let a = self.positions[t[0] as usize].coords;
            let b = self.positions[t[1] as usize].coords;
            let c = self.positions[t[2] as usize].coords;
            six_v += a.dot(&b.cross(&c));
        }
        six_v / 6.0
    }

    /// Total triangle area.
    pub fn area(&self) -> f64 {
        let mut doubled = 0.0;
        for t in &self.triangles {
            let a = self.positions[t[0] as usize].coords;
            let b = self.positions[t[1] as usize].coords;
            let c = self.positions[t[2] as usize].coords;
            doubled += (b - a).cross(&(c - a)).norm();
        }
        doubled / 2.0
    }
}

impl Solid {
    /// Triangulates every face. Faces with holes are merged into a single
    /// ring by bridging each hole to its nearest outer vertex, then
    /// ear-clipped; plain rings go straight to ear clipping.
    pub fn tessellate(&self) -> Mesh {
        let mut mesh = Mesh::default();
        let mut ids: HashMap<(i64, i64, i64), u32> = HashMap::new();
        for face in &self.faces {
            triangulate_face(face, &mut mesh, &mut ids);
        }
        mesh
    }
}

fn vertex_id(p: &Point3, mesh: &mut Mesh, ids: &mut HashMap<(i64, i64, i64), u32>) -> u32 {
    *ids.entry(point_key(p)).or_insert_with(|| {
        mesh.positions.push(*p);
        (mesh.positions.len() - 1) as u32
    })
}

/// Orthonormal in-plane axes forming a right-handed frame with `normal`,
/// so rings wound counterclockwise about the normal project counterclockwise.
pub(crate) fn plane_basis(normal: &Vec3) -> (Vec3, Vec3) {
    let seed = if normal.x.abs() <= 0.9 {
        Vec3::x()
    } else {
        Vec3::y()
    };
    let u = (seed - normal * seed.dot(normal)).normalize();
    let v = normal.cross(&u);
    (u, v)
}

fn triangulate_face(face: &Face, mesh: &mut Mesh, ids: &mut HashMap<(i64, i64, i64), u32>) {
    let (u, v) = plane_basis(&face.plane.normal);
    let lift = |ring: &[Point3], mesh: &mut Mesh, ids: &mut HashMap<(i64, i64, i64), u32>| {
        ring.iter()
            .map(|p| ((p.coords.dot(&u), p.coords.dot(&v)), vertex_id(p, mesh, ids)))
            .collect::<Vec<_>>()
    };

    let mut chain = lift(face.outer(), mesh, ids);
    for hole in face.holes() {
        let hole_chain = lift(hole, mesh, ids);
        // Bridge at the closest outer/hole vertex pair. The bridge vertices
        // appear twice in the merged ring, once per crossing direction.
        let mut best = (0usize, 0usize, f64::INFINITY);
        for (i, (cp, _)) in chain.iter().enumerate() {
            for (j, (hp, _)) in hole_chain.iter().enumerate() {
                let d = (cp.0 - hp.0).powi(2) + (cp.1 - hp.1).powi(2);
                if d < best.2 {
                    best = (i, j, d);
                }
            }
        }
        let (bi, bj, _) = best;
        let mut merged = Vec::with_capacity(chain.len() + hole_chain.len() + 2);
        merged.extend_from_slice(&chain[..=bi]);
        for k in 0..hole_chain.len() {
            merged.push(hole_chain[(bj + k) % hole_chain.len()]);
        }
        merged.push(hole_chain[bj]);
        merged.push(chain[bi]);
        merged.extend_from_slice(&chain[bi + 1..]);
        chain = merged;
    }
    ear_clip(&chain, mesh);
}

fn ear_clip(chain: &[((f64, f64), u32)], mesh: &mut Mesh) {
    if chain.len() < 3 {
        return;
    }
    let mut remaining: Vec<usize> = (0..chain.len()).collect();
    while remaining.len() > 3 {
        let n = remaining.len();
        let mut clipped = false;
        for i in 0..n {
            let prev = remaining[(i + n - 1) % n];
            let here = remaining[i];
            let next = remaining[(i + 1) % n];
            let a = chain[prev].0;
            let b = chain[here].0;
            let c = chain[next].0;
            let cross = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
            if cross <= 0.0 {
                continue;
            }
            let mut ear = true;
            for &j in &remaining {
                if j == prev || j == here || j == next {
                    continue;
                }
                if point_in_triangle(chain[j].0, a, b, c) {
                    ear = false;
                    break;
                }
            }
            if ear {
                mesh.triangles.push([chain[prev].1, chain[here].1, chain[next].1]);
                remaining.remove(i);
                clipped = true;
                break;
            }
        }
        if !clipped {
            // Numerical stall on a near-degenerate ring. Finish as a fan
            // rather than dropping area.
            for w in 1..remaining.len() - 1 {
                mesh.triangles.push([
                    chain[remaining[0]].1,
                    chain[remaining[w]].1,
                    chain[remaining[w + 1]].1,
                ]);
            }
            return;
        }
    }
    mesh.triangles
        .push([chain[remaining[0]].1, chain[remaining[1]].1, chain[remaining[2]].1]);
}

fn point_in_triangle(p: (f64, f64), a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> bool {
    let v0 = (c.0 - a.0, c.1 - a.1);
    let v1 = (b.0 - a.0, b.1 - a.1);
    let v2 = (p.0 - a.0, p.1 - a.1);

    let dot00 = v0.0 * v0.0 + v0.1 * v0.1;
    let dot01 = v0.0 * v1.0 + v0.1 * v1.1;
    let dot02 = v0.0 * v2.0 + v0.1 * v2.1;
    let dot11 = v1.0 * v1.0 + v1.1 * v1.1;
    let dot12 = v1.0 * v2.0 + v1.1 * v2.1;

    let inv_denom = 1.0 / (dot00 * dot11 - dot01 * dot01);
    let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
    let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;

    let eps = 1e-10;
    u > eps && v > eps && (u + v) < 1.0 - eps
}
