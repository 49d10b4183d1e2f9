//! Subtraction and gluing of solids.
//!
//! Both operations work on exact boundary structure rather than general
//! intersection curves. `difference` decomposes the complement of a convex
//! tool into half-space clips; `fuse` glues solids whose boundaries meet
//! along bitwise-matching section rings, the situation the clip and
//! extrude constructors are set up to produce.

use std::collections::{HashMap, HashSet};

use lapidary_math::{Point2, Point3, Tolerance, Vec3};
use lapidary_sketch::Polygon;

use crate::face::{newell_normal, point_in_polygon, Face};
use crate::solid::Solid;
use crate::tessellate::plane_basis;
use crate::{point_key, GeometryError, Result};

type PointKey = (i64, i64, i64);
type RingKey = Vec<PointKey>;

impl Solid {
    /// Removes a convex tool from this solid.
    ///
    /// Walks the tool's face planes, peeling off the part of the material
    /// outside each plane; the peeled pieces together are exactly
    /// `self - tool`. A tool whose face planes all clear the material on
    /// one side (the common case of a cutting slab) yields a single piece,
    /// which is returned as-is and is then identical to a plain clip by
    /// the slab's base plane. Multiple pieces are glued back together;
    /// pieces that meet along partially matching seams keep their interface
    /// faces, which leaves the enclosed volume correct.
    pub fn difference(&self, tool: &Solid) -> Result<Solid> {
        let mut working = self.clone();
        let mut pieces: Vec<Solid> = Vec::new();
        for face in &tool.faces {
            if working.is_empty() {
                break;
            }
            let outside = working.clip(&face.plane.flipped())?;
            working = working.clip(&face.plane)?;
            if !outside.is_empty() {
                pieces.push(outside);
            }
        }

        match pieces.len() {
            0 => Ok(Solid::empty()),
            1 => Ok(pieces.remove(0)),
            _ => {
                let mut result = Solid::empty();
                for piece in pieces {
                    result = result.fuse(&piece)?;
                }
                result.refine()
            }
        }
    }

    /// Glues two solids with disjoint interiors into one.
    ///
    /// Boundary rings that appear in both solids with opposite winding are
    /// interior and vanish. Faces that lose only some of their rings leave
    /// the survivors behind as orphans, which are regrouped into new faces
    /// on their plane; this is how a wide prism fused onto a narrow one
    /// grows its ledge. Rings must match bitwise (same vertices, opposite
    /// order) to cancel.
    pub fn fuse(&self, other: &Solid) -> Result<Solid> {
        if self.is_empty() {
            return Ok(other.clone());
        }
        if other.is_empty() {
            return Ok(self.clone());
        }

        let all: Vec<&Face> = self.faces.iter().chain(&other.faces).collect();
        let mut registry: HashMap<RingKey, Vec<(usize, usize, bool)>> = HashMap::new();
        for (fi, face) in all.iter().enumerate() {
            for (ri, ring) in face.rings.iter().enumerate() {
                let (key, forward) = canonical_ring(ring);
                registry.entry(key).or_default().push((fi, ri, forward));
            }
        }

        let mut dead: HashSet<(usize, usize)> = HashSet::new();
        for entries in registry.into_values() {
            let (mut forward, mut backward): (Vec<_>, Vec<_>) =
                entries.into_iter().partition(|(_, _, f)| *f);
            let pairs = forward.len().min(backward.len());
            for (a, b) in forward.drain(..pairs).zip(backward.drain(..pairs)) {
                dead.insert((a.0, a.1));
                dead.insert((b.0, b.1));
            }
        }
        if dead.is_empty() {
            return Ok(Solid::from_faces(all.into_iter().cloned().collect()));
        }

        let mut kept: Vec<Face> = Vec::new();
        let mut orphans: Vec<Vec<Point3>> = Vec::new();
        for (fi, face) in all.iter().enumerate() {
            let live: Vec<usize> = (0..face.rings.len())
                .filter(|ri| !dead.contains(&(fi, *ri)))
                .collect();
            if live.len() == face.rings.len() {
                kept.push((*face).clone());
            } else {
                for ri in live {
                    orphans.push(face.rings[ri].clone());
                }
            }
        }
        kept.extend(regroup_rings(orphans)?);
        Ok(Solid::from_faces(kept))
    }

    /// Merges coplanar faces that share edges.
    ///
    /// Within each oriented plane, directed edges traversed once in each
    /// direction by two faces are interior and cancel; the surviving edges
    /// are rechained into rings and collinear vertices left over from the
    /// old seams are dropped. Runs until every plane holds edge-disjoint
    /// faces.
    pub fn refine(&self) -> Result<Solid> {
        let tol = Tolerance::DEFAULT;
        let mut groups: HashMap<(PointKey, i64), Vec<usize>> = HashMap::new();
        for (i, face) in self.faces.iter().enumerate() {
            let key = (
                quantize_dir(&face.plane.normal),
                (face.plane.offset * 1e6).round() as i64,
            );
            groups.entry(key).or_default().push(i);
        }

        let mut result: Vec<Face> = Vec::new();
        for members in groups.into_values() {
            if members.len() == 1 {
                result.push(self.faces[members[0]].clone());
                continue;
            }

            let mut open: HashMap<(PointKey, PointKey), (Point3, Point3)> = HashMap::new();
            for &fi in &members {
                for ring in &self.faces[fi].rings {
                    let n = ring.len();
                    for i in 0..n {
                        let a = ring[i];
                        let b = ring[(i + 1) % n];
                        let ka = point_key(&a);
                        let kb = point_key(&b);
                        if open.remove(&(kb, ka)).is_none() {
                            open.insert((ka, kb), (a, b));
                        }
                    }
                }
            }

            let mut outgoing: HashMap<PointKey, Vec<(PointKey, Point3, Point3)>> =
                HashMap::new();
            for ((ka, kb), (a, b)) in open {
                outgoing.entry(ka).or_default().push((kb, a, b));
            }
            let rings = chain_directed_edges(&mut outgoing, &tol);
            result.extend(regroup_rings(rings)?);
        }
        Ok(Solid::from_faces(result))
    }
}

/// Rotationally and directionally canonical form of a ring, plus whether
/// the canonical direction is the ring's own.
fn canonical_ring(ring: &[Point3]) -> (RingKey, bool) {
    let keys: Vec<PointKey> = ring.iter().map(point_key).collect();
    let forward = rotate_to_min(&keys);
    let mut reversed = keys;
    reversed.reverse();
    let backward = rotate_to_min(&reversed);
    if forward <= backward {
        (forward, true)
    } else {
        (backward, false)
    }
}

fn rotate_to_min(keys: &[PointKey]) -> RingKey {
    let n = keys.len();
    let start = keys
        .iter()
        .enumerate()
        .min_by_key(|(_, k)| **k)
        .map(|(i, _)| i)
        .unwrap_or(0);
    (0..n).map(|i| keys[(start + i) % n]).collect()
}

fn quantize_dir(v: &Vec3) -> PointKey {
    (
        (v.x * 1e6).round() as i64,
        (v.y * 1e6).round() as i64,
        (v.z * 1e6).round() as i64,
    )
}

/// Consumes a start-keyed edge map into closed rings, collapsing collinear
/// vertices. Chains that fail to close are dropped.
fn chain_directed_edges(
    outgoing: &mut HashMap<PointKey, Vec<(PointKey, Point3, Point3)>>,
    tol: &Tolerance,
) -> Vec<Vec<Point3>> {
    let mut rings = Vec::new();
    while let Some(start_key) = outgoing.keys().next().copied() {
        let Some((mut cursor_key, first, mut cursor)) = pop_edge(outgoing, start_key) else {
            continue;
        };
        let mut ring = vec![first];
        let mut closed = cursor_key == start_key;
        while !closed {
            ring.push(cursor);
            match pop_edge(outgoing, cursor_key) {
                Some((next_key, _, next)) => {
                    cursor_key = next_key;
                    cursor = next;
                    closed = cursor_key == start_key;
                }
                None => break,
            }
        }
        if closed {
            let ring = collapse_collinear(ring, tol);
            if ring.len() >= 3 {
                rings.push(ring);
            }
        }
    }
    rings
}

fn pop_edge(
    outgoing: &mut HashMap<PointKey, Vec<(PointKey, Point3, Point3)>>,
    from: PointKey,
) -> Option<(PointKey, Point3, Point3)> {
    let slot = outgoing.get_mut(&from)?;
    let edge = slot.pop();
    if slot.is_empty() {
        outgoing.remove(&from);
    }
    edge
}

fn collapse_collinear(ring: Vec<Point3>, tol: &Tolerance) -> Vec<Point3> {
    let mut pts = ring;
    loop {
        let n = pts.len();
        if n < 3 {
            return pts;
        }
        let mut removed = false;
        let mut next: Vec<Point3> = Vec::with_capacity(n);
        for i in 0..n {
            let prev = pts[(i + n - 1) % n];
            let cur = pts[i];
            let nxt = pts[(i + 1) % n];
            let u = cur - prev;
            let v = nxt - cur;
            if u.cross(&v).norm() <= tol.linear * u.norm() * v.norm() {
                removed = true;
            } else {
                next.push(cur);
            }
        }
        if !removed {
            return next;
        }
        pts = next;
    }
}

/// Rebuilds faces from loose rings lying on shared planes. Rings wound
/// with the plane become outers, rings against it holes; each hole is
/// attached to the smallest outer containing it.
fn regroup_rings(rings: Vec<Vec<Point3>>) -> Result<Vec<Face>> {
    let mut groups: HashMap<(PointKey, i64), Vec<(Vec<Point3>, f64)>> = HashMap::new();
    for ring in rings {
        let newell = newell_normal(&ring);
        let len = newell.norm();
        if len < 1e-12 {
            continue;
        }
        let unit = newell / len;
        let canon = canonical_plane_dir(&unit);
        let offset = canon.dot(&ring[0].coords);
        let key = (quantize_dir(&canon), (offset * 1e6).round() as i64);
        groups.entry(key).or_default().push((ring, unit.dot(&canon)));
    }

    let mut faces = Vec::new();
    for members in groups.into_values() {
        let (mut outers, mut holes): (Vec<_>, Vec<_>) =
            members.into_iter().partition(|(_, side)| *side > 0.0);
        if outers.is_empty() {
            std::mem::swap(&mut outers, &mut holes);
        }
        let mut built: Vec<Face> = outers
            .into_iter()
            .map(|(ring, _)| Face::from_ring(ring))
            .collect::<Result<_>>()?;
        for (hole, _) in holes {
            let mut best: Option<(usize, f64)> = None;
            for (i, face) in built.iter().enumerate() {
                if face_contains_point(face, &hole[0]) {
                    let area = face.area();
                    if best.map_or(true, |(_, smallest)| area < smallest) {
                        best = Some((i, area));
                    }
                }
            }
            match best {
                Some((i, _)) => built[i].rings.push(hole),
                None => return Err(GeometryError::InvalidHole),
            }
        }
        faces.append(&mut built);
    }
    Ok(faces)
}

/// Sign-normalized copy of a plane normal so both orientations of one
/// geometric plane group together.
fn canonical_plane_dir(unit: &Vec3) -> Vec3 {
    let q = quantize_dir(unit);
    let flip = q.2 < 0 || (q.2 == 0 && (q.1 < 0 || (q.1 == 0 && q.0 < 0)));
    if flip {
        -unit
    } else {
        *unit
    }
}

fn face_contains_point(face: &Face, p: &Point3) -> bool {
    let (u, v) = plane_basis(&face.plane.normal);
    let poly = Polygon::new(
        face.outer()
            .iter()
            .map(|q| Point2::new(q.coords.dot(&u), q.coords.dot(&v)))
            .collect(),
    );
    point_in_polygon(&Point2::new(p.coords.dot(&u), p.coords.dot(&v)), &poly)
}
