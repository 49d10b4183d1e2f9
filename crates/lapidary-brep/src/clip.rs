//! Half-space clipping.
//!
//! Clipping keeps the back side of a plane (`signed_distance <= 0`) and
//! seals the opening with cap faces chained from the cut segments. Each
//! boundary ring is clipped independently, so hole rings must not cross
//! the cut plane; the carving pipeline only ever clips hole-free solids.

use lapidary_math::Point3;

use crate::face::{newell_normal, Face, Plane};
use crate::solid::Solid;
use crate::{point_key, GeometryError, Result};

/// On-plane classification width for clipping, in mm.
const EPS: f64 = 1e-9;

impl Solid {
    /// Clip away everything on the normal side of `plane`, capping the
    /// cut. Clipping the same plane twice is a no-op the second time.
    pub fn clip(&self, plane: &Plane) -> Result<Solid> {
        let mut any_above = false;
        let mut any_below = false;
        for face in &self.faces {
            for ring in &face.rings {
                for p in ring {
                    let d = plane.signed_distance(p);
                    if d > EPS {
                        any_above = true;
                    } else if d < -EPS {
                        any_below = true;
                    }
                }
            }
        }
        if !any_above {
            return Ok(self.clone());
        }
        if !any_below {
            return Ok(Solid::empty());
        }

        let mut faces = Vec::new();
        let mut cap_segments: Vec<[Point3; 2]> = Vec::new();

        for face in &self.faces {
            let dists: Vec<Vec<f64>> = face
                .rings
                .iter()
                .map(|ring| ring.iter().map(|p| plane.signed_distance(p)).collect())
                .collect();
            let face_above = dists.iter().flatten().any(|&d| d > EPS);
            let face_below = dists.iter().flatten().any(|&d| d < -EPS);

            if !face_above {
                // Entirely kept, including faces lying in the plane.
                faces.push(face.clone());
                continue;
            }
            if !face_below {
                continue;
            }

            let mut new_rings = Vec::new();
            for (ri, ring) in face.rings.iter().enumerate() {
                let clipped = clip_ring(ring, &dists[ri], EPS);
                let survives =
                    clipped.len() >= 3 && ring_area_vector(&clipped).norm() > 1e-9;
                if ri == 0 {
                    if !survives {
                        break;
                    }
                    collect_cap_segments(&clipped, &mut cap_segments);
                }
                if survives {
                    new_rings.push(clipped.into_iter().map(|(p, _)| p).collect());
                }
            }
            if !new_rings.is_empty() {
                faces.push(Face {
                    rings: new_rings,
                    plane: face.plane.clone(),
                });
            }
        }

        let (loops, open) = chain_loops(cap_segments);
        if open > 0 {
            return Err(GeometryError::OpenSection {
                offset: plane.offset,
                open,
            });
        }
        for mut ring in loops {
            // Cap faces look along the cut normal, out of the kept half.
            if newell_normal(&ring).dot(&plane.normal) < 0.0 {
                ring.reverse();
            }
            faces.push(Face {
                rings: vec![ring],
                plane: plane.clone(),
            });
        }

        Ok(Solid { faces })
    }
}

/// Sutherland-Hodgman step for one ring; each kept point is tagged with
/// whether it lies on the clip plane.
fn clip_ring(ring: &[Point3], dists: &[f64], eps: f64) -> Vec<(Point3, bool)> {
    let n = ring.len();
    let mut out: Vec<(Point3, bool)> = Vec::with_capacity(n + 2);
    for i in 0..n {
        let j = (i + 1) % n;
        let d = dists[i];
        let dq = dists[j];
        if d <= eps {
            out.push((ring[i], d.abs() <= eps));
        }
        if (d < -eps && dq > eps) || (d > eps && dq < -eps) {
            let t = d / (d - dq);
            let p = Point3::from(ring[i].coords + t * (ring[j].coords - ring[i].coords));
            out.push((p, true));
        }
    }
    dedup_cyclic(&mut out);
    out
}

fn dedup_cyclic(points: &mut Vec<(Point3, bool)>) {
    points.dedup_by(|a, b| point_key(&a.0) == point_key(&b.0));
    while points.len() > 1 {
        let first = points[0].0;
        let last = points[points.len() - 1].0;
        if point_key(&first) == point_key(&last) {
            points.pop();
        } else {
            break;
        }
    }
}

/// Newell vector of a tagged ring (magnitude = twice the area).
fn ring_area_vector(points: &[(Point3, bool)]) -> lapidary_math::Vec3 {
    let ring: Vec<Point3> = points.iter().map(|(p, _)| *p).collect();
    newell_normal(&ring)
}

/// Consecutive output points that both sit on the plane trace the cut;
/// record them for cap chaining.
fn collect_cap_segments(points: &[(Point3, bool)], out: &mut Vec<[Point3; 2]>) {
    let n = points.len();
    for i in 0..n {
        let (a, a_on) = points[i];
        let (b, b_on) = points[(i + 1) % n];
        if a_on && b_on {
            out.push([a, b]);
        }
    }
}

/// Greedily chain segments into closed loops by matching endpoints.
/// Returns the loops plus the number of chains that refused to close.
pub(crate) fn chain_loops(segments: Vec<[Point3; 2]>) -> (Vec<Vec<Point3>>, usize) {
    let eps = 1e-6;
    let mut remaining = segments;
    let mut loops = Vec::new();
    let mut open = 0;

    while !remaining.is_empty() {
        let [start, end] = remaining.remove(0);
        let mut chain = vec![start, end];

        let mut changed = true;
        while changed {
            changed = false;
            let chain_start = chain[0];
            let chain_end = *chain.last().unwrap();

            let mut i = 0;
            while i < remaining.len() {
                let [a, b] = remaining[i];
                if (b - chain_end).norm() < eps {
                    chain.push(a);
                    remaining.remove(i);
                    changed = true;
                } else if (a - chain_end).norm() < eps {
                    chain.push(b);
                    remaining.remove(i);
                    changed = true;
                } else if (b - chain_start).norm() < eps {
                    chain.insert(0, a);
                    remaining.remove(i);
                    changed = true;
                } else if (a - chain_start).norm() < eps {
                    chain.insert(0, b);
                    remaining.remove(i);
                    changed = true;
                } else {
                    i += 1;
                }
            }
        }

        if chain.len() >= 4 && (chain[0] - *chain.last().unwrap()).norm() < eps {
            chain.pop();
            loops.push(chain);
        } else {
            open += 1;
        }
    }

    (loops, open)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lapidary_math::Vec3;

    fn block() -> Solid {
        Solid::block_centered(10.0).unwrap()
    }

    fn horizontal_plane(z: f64) -> Plane {
        Plane::from_point_normal(&Point3::new(0.0, 0.0, z), Vec3::z()).unwrap()
    }

    #[test]
    fn horizontal_clip_halves_a_block() {
        let half = block().clip(&horizontal_plane(0.0)).unwrap();
        assert_relative_eq!(half.volume(), 500.0, max_relative = 1e-9);
        assert_eq!(half.face_count(), 6);

        let bb = half.bounding_box().unwrap();
        assert_relative_eq!(bb.max.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(bb.min.z, -5.0, max_relative = 1e-12);

        // The cap faces up, along the cut normal.
        let cap = half
            .faces
            .iter()
            .find(|f| f.plane.normal.z > 0.9)
            .expect("cap face");
        assert_relative_eq!(cap.area(), 100.0, max_relative = 1e-9);
    }

    #[test]
    fn corner_clip_removes_a_tetrahedron() {
        let plane =
            Plane::from_point_normal(&Point3::new(4.0, 4.0, 4.0), Vec3::new(1.0, 1.0, 1.0))
                .unwrap();
        let cut = block().clip(&plane).unwrap();
        // The removed corner is the tetrahedron x+y+z >= 12 inside the
        // block, volume 3^3/6.
        assert_relative_eq!(cut.volume(), 1000.0 - 4.5, max_relative = 1e-9);
        assert_eq!(cut.face_count(), 7);
    }

    #[test]
    fn missing_plane_leaves_solid_unchanged() {
        let cut = block().clip(&horizontal_plane(7.0)).unwrap();
        assert_relative_eq!(cut.volume(), 1000.0, max_relative = 1e-12);
        assert_eq!(cut.face_count(), 6);
    }

    #[test]
    fn plane_below_swallows_everything() {
        let cut = block().clip(&horizontal_plane(-6.0)).unwrap();
        assert!(cut.is_empty());
    }

    #[test]
    fn clipping_twice_changes_nothing_more() {
        let once = block().clip(&horizontal_plane(1.5)).unwrap();
        let twice = once.clip(&horizontal_plane(1.5)).unwrap();
        assert_relative_eq!(twice.volume(), once.volume(), max_relative = 1e-12);
        assert_eq!(twice.face_count(), once.face_count());
    }

    #[test]
    fn clip_through_existing_face_plane_is_a_no_op() {
        let cut = block().clip(&horizontal_plane(5.0)).unwrap();
        assert_relative_eq!(cut.volume(), 1000.0, max_relative = 1e-12);
        assert_eq!(cut.face_count(), 6);
    }

    #[test]
    fn oblique_clip_keeps_closed_topology() {
        let plane =
            Plane::from_point_normal(&Point3::new(0.0, 0.0, 2.0), Vec3::new(0.3, -0.2, 1.0))
                .unwrap();
        let cut = block().clip(&plane).unwrap();
        // 4 trimmed walls, bottom, cap.
        assert_eq!(cut.face_count(), 6);
        // The cut height 0.3x - 0.2y + z = 2 is affine, so the prism
        // volume is footprint times the height at the footprint center.
        assert_relative_eq!(cut.volume(), 100.0 * (2.0 + 5.0), max_relative = 1e-9);
    }

    #[test]
    fn chain_recovers_square_loop_from_shuffled_segments() {
        let a = Point3::new(0.0, 0.0, 1.0);
        let b = Point3::new(2.0, 0.0, 1.0);
        let c = Point3::new(2.0, 2.0, 1.0);
        let d = Point3::new(0.0, 2.0, 1.0);
        let (loops, open) = chain_loops(vec![[c, d], [a, b], [d, a], [b, c]]);
        assert_eq!(open, 0);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 4);
    }

    #[test]
    fn unclosed_segments_are_reported() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(1.0, 1.0, 0.0);
        let (loops, open) = chain_loops(vec![[a, b], [b, c]]);
        assert!(loops.is_empty());
        assert_eq!(open, 1);
    }
}
