//! Closed solids as collections of planar faces.

use std::collections::HashSet;

use lapidary_math::{Point3, Transform, Vec3};

use crate::face::{Face, Plane};
use crate::{point_key, Result};

/// A closed solid bounded by planar faces. The empty solid (no faces) is
/// the valid result of clipping everything away.
#[derive(Debug, Clone, Default)]
pub struct Solid {
    /// Boundary faces, outward normals.
    pub faces: Vec<Face>,
}

impl Solid {
    /// The empty solid.
    pub fn empty() -> Self {
        Self { faces: Vec::new() }
    }

    /// Build a solid from prepared faces.
    pub fn from_faces(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    /// Whether the solid has no boundary at all.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Number of boundary faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Axis-aligned cube of the given edge length centered at the origin —
    /// the raw block a stone is carved from.
    pub fn block_centered(edge: f64) -> Result<Self> {
        let h = edge / 2.0;
        let corner = |x: f64, y: f64, z: f64| Point3::new(x * h, y * h, z * h);
        // Each ring counter-clockwise seen from outside.
        let rings = [
            // +z
            [
                corner(1.0, 1.0, 1.0),
                corner(-1.0, 1.0, 1.0),
                corner(-1.0, -1.0, 1.0),
                corner(1.0, -1.0, 1.0),
            ],
            // -z
            [
                corner(1.0, 1.0, -1.0),
                corner(1.0, -1.0, -1.0),
                corner(-1.0, -1.0, -1.0),
                corner(-1.0, 1.0, -1.0),
            ],
            // +x
            [
                corner(1.0, 1.0, 1.0),
                corner(1.0, -1.0, 1.0),
                corner(1.0, -1.0, -1.0),
                corner(1.0, 1.0, -1.0),
            ],
            // -x
            [
                corner(-1.0, 1.0, 1.0),
                corner(-1.0, 1.0, -1.0),
                corner(-1.0, -1.0, -1.0),
                corner(-1.0, -1.0, 1.0),
            ],
            // +y
            [
                corner(1.0, 1.0, 1.0),
                corner(1.0, 1.0, -1.0),
                corner(-1.0, 1.0, -1.0),
                corner(-1.0, 1.0, 1.0),
            ],
            // -y
            [
                corner(1.0, -1.0, 1.0),
                corner(-1.0, -1.0, 1.0),
                corner(-1.0, -1.0, -1.0),
                corner(1.0, -1.0, -1.0),
            ],
        ];
        let faces = rings
            .into_iter()
            .map(|ring| Face::from_ring(ring.to_vec()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { faces })
    }

    /// Distinct vertices of the solid, deduplicated across faces.
    pub fn vertices(&self) -> Vec<Point3> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for face in &self.faces {
            for ring in &face.rings {
                for p in ring {
                    if seen.insert(point_key(p)) {
                        out.push(*p);
                    }
                }
            }
        }
        out
    }

    /// Axis-aligned bounding box, or `None` for the empty solid.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut points = self
            .faces
            .iter()
            .flat_map(|f| f.rings.iter().flatten());
        let first = *points.next()?;
        let mut bb = BoundingBox {
            min: first,
            max: first,
        };
        for p in points {
            bb.min.x = bb.min.x.min(p.x);
            bb.min.y = bb.min.y.min(p.y);
            bb.min.z = bb.min.z.min(p.z);
            bb.max.x = bb.max.x.max(p.x);
            bb.max.y = bb.max.y.max(p.y);
            bb.max.z = bb.max.z.max(p.z);
        }
        Some(bb)
    }

    /// Enclosed volume, via tessellation and the divergence theorem.
    pub fn volume(&self) -> f64 {
        self.tessellate().volume()
    }

    /// Total boundary area.
    pub fn surface_area(&self) -> f64 {
        self.faces.iter().map(Face::area).sum()
    }

    /// The solid under an affine transform (rigid motion or uniform
    /// scale; plane normals are re-derived accordingly).
    pub fn transformed(&self, t: &Transform) -> Solid {
        let faces = self
            .faces
            .iter()
            .map(|face| {
                let rings: Vec<Vec<Point3>> = face
                    .rings
                    .iter()
                    .map(|ring| ring.iter().map(|p| t.apply_point(p)).collect())
                    .collect();
                let normal = t.apply_normal(&face.plane.normal);
                let len = normal.norm();
                let normal: Vec3 = if len > 1e-12 {
                    normal / len
                } else {
                    face.plane.normal
                };
                let offset = normal.dot(&rings[0][0].coords);
                Face {
                    plane: Plane { normal, offset },
                    rings,
                }
            })
            .collect();
        Solid { faces }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl BoundingBox {
    /// Box center.
    pub fn center(&self) -> Point3 {
        Point3::from((self.min.coords + self.max.coords) / 2.0)
    }

    /// Edge lengths along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Whether `other` fits inside this box, within `tol`.
    pub fn contains(&self, other: &BoundingBox, tol: f64) -> bool {
        self.min.x <= other.min.x + tol
            && self.min.y <= other.min.y + tol
            && self.min.z <= other.min.z + tol
            && self.max.x >= other.max.x - tol
            && self.max.y >= other.max.y - tol
            && self.max.z >= other.max.z - tol
    }
}
