//! Planar faces and their supporting planes.

use lapidary_math::{Point3, Vec3};
use lapidary_sketch::SectionCurve;

use crate::{GeometryError, Result};

/// An oriented plane `x · normal = offset`, `normal` unit length.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vec3,
    /// Distance from the origin along the normal.
    pub offset: f64,
}

impl Plane {
    /// Plane through `point` with the given (not necessarily unit) normal.
    pub fn from_point_normal(point: &Point3, normal: Vec3) -> Result<Self> {
        let len = normal.norm();
        if !len.is_finite() || len < 1e-12 {
            return Err(GeometryError::ZeroDirection);
        }
        let normal = normal / len;
        Ok(Self {
            offset: normal.dot(&point.coords),
            normal,
        })
    }

    /// Best-fit plane through a ring of points, oriented by the ring's
    /// winding (counter-clockwise seen from the normal side).
    pub fn from_ring(ring: &[Point3]) -> Result<Self> {
        let n = newell_normal(ring);
        if ring.len() < 3 || n.norm() < 1e-12 {
            return Err(GeometryError::DegenerateFace {
                vertices: ring.len(),
            });
        }
        Plane::from_point_normal(&ring[0], n)
    }

    /// Signed distance of a point from the plane, positive on the normal
    /// side.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }

    /// The same plane facing the other way.
    pub fn flipped(&self) -> Plane {
        Plane {
            normal: -self.normal,
            offset: -self.offset,
        }
    }
}

/// A flat face: `rings[0]` is the outer boundary, wound counter-clockwise
/// about the outward normal; any further rings are holes, wound clockwise.
///
/// Tessellation and extrusion support at most one hole, which is all the
/// annular mount faces require.
#[derive(Debug, Clone)]
pub struct Face {
    /// Boundary rings; closing edges are implicit.
    pub rings: Vec<Vec<Point3>>,
    /// Supporting plane; its normal is the face's outward normal.
    pub plane: Plane,
}

impl Face {
    /// Face from a single ring; the outward normal follows the winding.
    pub fn from_ring(ring: Vec<Point3>) -> Result<Self> {
        let plane = Plane::from_ring(&ring)?;
        Ok(Self {
            rings: vec![ring],
            plane,
        })
    }

    /// The outer boundary ring.
    pub fn outer(&self) -> &[Point3] {
        &self.rings[0]
    }

    /// Hole rings, if any.
    pub fn holes(&self) -> &[Vec<Point3>] {
        &self.rings[1..]
    }

    /// Enclosed area: outer ring minus holes.
    pub fn area(&self) -> f64 {
        self.rings
            .iter()
            .map(|ring| newell_normal(ring).dot(&self.plane.normal) / 2.0)
            .sum()
    }

    /// Vertex average of the outer ring.
    pub fn outer_centroid(&self) -> Point3 {
        let ring = self.outer();
        let sum = ring
            .iter()
            .fold(Vec3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / ring.len() as f64)
    }

    /// The same face with the outward normal reversed.
    pub fn reversed(&self) -> Face {
        Face {
            rings: self
                .rings
                .iter()
                .map(|ring| ring.iter().rev().cloned().collect())
                .collect(),
            plane: self.plane.flipped(),
        }
    }

    /// The face rigidly shifted by `offset`.
    pub fn translated(&self, offset: &Vec3) -> Face {
        Face {
            rings: self
                .rings
                .iter()
                .map(|ring| ring.iter().map(|p| p + offset).collect())
                .collect(),
            plane: Plane {
                normal: self.plane.normal,
                offset: self.plane.offset + self.plane.normal.dot(offset),
            },
        }
    }
}

/// Horizontal face at height `z` bounded by `outer` with a hole cut by
/// `inner`; outward normal +z. The hole must lie strictly inside the
/// outer curve.
pub fn annular_face(outer: &SectionCurve, inner: &SectionCurve, z: f64) -> Result<Face> {
    let outer_poly = outer.to_polygon();
    let mut inner_poly = inner.to_polygon();
    if outer_poly.len() < 3 || inner_poly.len() < 3 {
        return Err(GeometryError::DegenerateFace {
            vertices: outer_poly.len().min(inner_poly.len()),
        });
    }
    if inner_poly.area() >= outer_poly.area()
        || !point_in_polygon(&inner_poly.points[0], &outer_poly)
    {
        return Err(GeometryError::InvalidHole);
    }
    inner_poly.ensure_cw();

    let lift = |p: &lapidary_math::Point2| Point3::new(p.x, p.y, z);
    let rings = vec![
        outer_poly.points.iter().map(lift).collect(),
        inner_poly.points.iter().map(lift).collect(),
    ];
    Ok(Face {
        rings,
        plane: Plane {
            normal: Vec3::z(),
            offset: z,
        },
    })
}

/// Newell normal of a ring; magnitude is twice the enclosed area,
/// direction follows the winding.
pub(crate) fn newell_normal(ring: &[Point3]) -> Vec3 {
    let n = ring.len();
    let mut normal = Vec3::zeros();
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

/// Even-odd point-in-polygon test in the xy plane.
pub(crate) fn point_in_polygon(
    p: &lapidary_math::Point2,
    poly: &lapidary_sketch::Polygon,
) -> bool {
    let pts = &poly.points;
    let n = pts.len();
    let mut inside = false;
    for i in 0..n {
        let a = &pts[i];
        let b = &pts[(i + 1) % n];
        if (a.y > p.y) != (b.y > p.y) {
            let t = (p.y - a.y) / (b.y - a.y);
            if p.x < a.x + t * (b.x - a.x) {
                inside = !inside;
            }
        }
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lapidary_math::Point2;
    use lapidary_sketch::Polygon;

    fn square_ring(half: f64, z: f64) -> Vec<Point3> {
        vec![
            Point3::new(half, half, z),
            Point3::new(-half, half, z),
            Point3::new(-half, -half, z),
            Point3::new(half, -half, z),
        ]
    }

    #[test]
    fn ring_winding_sets_plane_orientation() {
        // That vertex order is counter-clockwise seen from above.
        let face = Face::from_ring(square_ring(2.0, 3.0)).unwrap();
        assert_relative_eq!(face.plane.normal.z, 1.0, max_relative = 1e-12);
        assert_relative_eq!(face.plane.offset, 3.0, max_relative = 1e-12);
        assert_relative_eq!(face.area(), 16.0, max_relative = 1e-12);

        let flipped = face.reversed();
        assert_relative_eq!(flipped.plane.normal.z, -1.0, max_relative = 1e-12);
        assert_relative_eq!(flipped.plane.offset, -3.0, max_relative = 1e-12);
        assert_relative_eq!(flipped.area(), 16.0, max_relative = 1e-12);
    }

    #[test]
    fn tilted_ring_normal_comes_from_newell() {
        let ring = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let face = Face::from_ring(ring).unwrap();
        let expect = Vec3::new(0.0, -1.0, 1.0).normalize();
        assert!((face.plane.normal - expect).norm() < 1e-12);
    }

    #[test]
    fn degenerate_rings_are_rejected() {
        assert!(matches!(
            Face::from_ring(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]),
            Err(GeometryError::DegenerateFace { vertices: 2 })
        ));
        let collinear = vec![
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(Face::from_ring(collinear).is_err());
    }

    #[test]
    fn signed_distance_is_symmetric_about_plane() {
        let plane = Plane::from_point_normal(&Point3::new(0.0, 0.0, 2.0), Vec3::z()).unwrap();
        assert_relative_eq!(
            plane.signed_distance(&Point3::new(7.0, -3.0, 5.0)),
            3.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            plane.flipped().signed_distance(&Point3::new(7.0, -3.0, 5.0)),
            -3.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn annular_face_carries_one_hole() {
        let outer = SectionCurve::Circle {
            center: Point2::origin(),
            radius: 4.0,
        };
        let inner = SectionCurve::Circle {
            center: Point2::origin(),
            radius: 2.0,
        };
        let face = annular_face(&outer, &inner, 1.5).unwrap();
        assert_eq!(face.rings.len(), 2);
        assert_relative_eq!(face.plane.offset, 1.5, max_relative = 1e-12);
        // Discretized ring areas, not ideal circles.
        let expected = outer.to_polygon().area() - inner.to_polygon().area();
        assert_relative_eq!(face.area(), expected, max_relative = 1e-9);
        assert!(face.rings[1].iter().all(|p| (p.z - 1.5).abs() < 1e-12));
    }

    #[test]
    fn annular_face_rejects_swapped_curves() {
        let big = SectionCurve::Circle {
            center: Point2::origin(),
            radius: 4.0,
        };
        let small = SectionCurve::Circle {
            center: Point2::origin(),
            radius: 2.0,
        };
        assert!(matches!(
            annular_face(&small, &big, 0.0),
            Err(GeometryError::InvalidHole)
        ));
        let outside = SectionCurve::Circle {
            center: Point2::new(10.0, 0.0),
            radius: 1.0,
        };
        assert!(matches!(
            annular_face(&big, &outside, 0.0),
            Err(GeometryError::InvalidHole)
        ));
    }

    #[test]
    fn point_in_polygon_handles_concave_outline() {
        let poly = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(2.0, 1.0),
            Point2::new(0.0, 4.0),
        ]);
        assert!(point_in_polygon(&Point2::new(1.0, 1.0), &poly));
        assert!(!point_in_polygon(&Point2::new(2.0, 3.0), &poly));
        assert!(!point_in_polygon(&Point2::new(5.0, 1.0), &poly));
    }
}
