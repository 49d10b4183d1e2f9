//! Surfaces of revolution about the Y axis.

use lapidary_math::{Point3, Tolerance};
use lapidary_sketch::Polygon;

use crate::face::Face;
use crate::solid::Solid;
use crate::{GeometryError, Result};

/// Revolves a closed profile around the Y axis.
///
/// The profile lives in the radial/axial plane: `x` is the distance from
/// the axis, `y` the height along it. Every vertex must stay strictly off
/// the axis. Each profile edge becomes `segments` quads; edges that change
/// radius while climbing yield mildly warped quads whose stored plane is
/// the Newell best fit, which is fine for meshing and measurement but
/// makes revolved solids poor clipping tools.
pub fn revolve_y(profile: &Polygon, segments: u32) -> Result<Solid> {
    if profile.len() < 3 {
        return Err(GeometryError::DegenerateFace {
            vertices: profile.len(),
        });
    }
    let tol = Tolerance::DEFAULT;
    for p in &profile.points {
        if p.x < tol.linear {
            return Err(GeometryError::AxisIntersection { radius: p.x });
        }
    }

    let mut outline = profile.clone();
    outline.ensure_ccw();
    let segments = segments.max(3) as usize;
    let step = std::f64::consts::TAU / segments as f64;
    let at = |radius: f64, height: f64, k: usize| {
        let theta = k as f64 * step;
        Point3::new(radius * theta.sin(), height, radius * theta.cos())
    };

    let n = outline.len();
    let mut faces = Vec::with_capacity(n * segments);
    for i in 0..n {
        let a = outline.points[i];
        let b = outline.points[(i + 1) % n];
        for k in 0..segments {
            let k1 = (k + 1) % segments;
            faces.push(Face::from_ring(vec![
                at(a.x, a.y, k),
                at(a.x, a.y, k1),
                at(b.x, b.y, k1),
                at(b.x, b.y, k),
            ])?);
        }
    }
    Ok(Solid::from_faces(faces))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lapidary_math::Point2;

    fn rectangle(x0: f64, x1: f64, y0: f64, y1: f64) -> Polygon {
        Polygon::new(vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ])
    }

    #[test]
    fn rectangle_revolves_to_a_washer() {
        let segments = 96u32;
        let solid = revolve_y(&rectangle(2.0, 4.0, 0.0, 3.0), segments).unwrap();
        assert_eq!(solid.face_count(), 4 * segments as usize);

        // Faceted volume: the inscribed polygon shrinks the cross section.
        let step = std::f64::consts::TAU / segments as f64;
        let expected = 0.5 * segments as f64 * step.sin() * (16.0 - 4.0) * 3.0;
        assert_relative_eq!(solid.volume(), expected, max_relative = 1e-9);

        let bbox = solid.bounding_box().unwrap();
        assert_relative_eq!(bbox.max.x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.min.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(bbox.max.y, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn outward_normals_point_away_from_material() {
        let solid = revolve_y(&rectangle(2.0, 4.0, 0.0, 3.0), 8).unwrap();
        let center = Point3::new(0.0, 1.5, 0.0);
        for face in &solid.faces {
            let c = face.outer_centroid();
            let radial = face.plane.normal.x * c.x + face.plane.normal.z * c.z;
            if face.plane.normal.y.abs() < 0.5 {
                // Walls: outer shell faces away from the axis, bore faces it.
                let outer_wall = (c.x * c.x + c.z * c.z).sqrt() > 3.0;
                assert_eq!(radial > 0.0, outer_wall);
            } else {
                // Annuli: top faces up, bottom faces down.
                assert_eq!(face.plane.normal.y > 0.0, c.y > center.y);
            }
        }
    }

    #[test]
    fn profile_on_the_axis_is_rejected() {
        let err = revolve_y(&rectangle(0.0, 4.0, 0.0, 3.0), 16).unwrap_err();
        assert!(matches!(err, GeometryError::AxisIntersection { .. }));
    }

    #[test]
    fn winding_of_the_profile_does_not_matter() {
        let mut cw = rectangle(2.0, 4.0, 0.0, 3.0);
        cw.reverse();
        let a = revolve_y(&rectangle(2.0, 4.0, 0.0, 3.0), 24).unwrap();
        let b = revolve_y(&cw, 24).unwrap();
        assert_relative_eq!(a.volume(), b.volume(), max_relative = 1e-12);
    }
}
