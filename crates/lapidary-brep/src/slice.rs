//! Horizontal sectioning of solids.

use lapidary_math::{Point2, Point3};
use lapidary_sketch::Polygon;

use crate::clip::chain_loops;
use crate::solid::Solid;
use crate::point_key;

impl Solid {
    /// Closed 2D outlines of the solid at height `z`, largest area first.
    ///
    /// Every boundary ring contributes its crossing segment, so sections
    /// through a hollow solid come back as nested loops. Chains that fail
    /// to close (grazing contact, slivers) are dropped.
    pub fn slice_at(&self, z: f64) -> Vec<Polygon> {
        let eps = 1e-10;
        let mut segments: Vec<[Point3; 2]> = Vec::new();

        for face in &self.faces {
            for ring in &face.rings {
                let n = ring.len();
                let mut points: Vec<Point3> = Vec::with_capacity(2);
                for i in 0..n {
                    let a = &ring[i];
                    let b = &ring[(i + 1) % n];
                    let da = a.z - z;
                    let db = b.z - z;
                    if (da > eps && db < -eps) || (da < -eps && db > eps) {
                        let t = da / (da - db);
                        points.push(Point3::from(a.coords + t * (b.coords - a.coords)));
                    } else if da.abs() <= eps && db.abs() > eps {
                        points.push(*a);
                    } else if db.abs() <= eps && da.abs() > eps {
                        points.push(*b);
                    }
                }
                points.dedup_by(|a, b| point_key(a) == point_key(b));
                if points.len() >= 2 {
                    segments.push([points[0], points[1]]);
                }
            }
        }

        let (loops, _open) = chain_loops(segments);
        let mut outlines: Vec<Polygon> = loops
            .into_iter()
            .map(|ring| {
                Polygon::new(ring.into_iter().map(|p| Point2::new(p.x, p.y)).collect())
            })
            .collect();
        outlines.sort_by(|a, b| b.area().total_cmp(&a.area()));
        outlines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::face::Plane;
    use lapidary_math::Vec3;

    #[test]
    fn block_section_is_its_footprint() {
        let block = Solid::block_centered(10.0).unwrap();
        let outlines = block.slice_at(1.25);
        assert_eq!(outlines.len(), 1);
        assert_relative_eq!(outlines[0].area(), 100.0, max_relative = 1e-9);
        assert_relative_eq!(outlines[0].perimeter(), 40.0, max_relative = 1e-9);
    }

    #[test]
    fn section_misses_above_and_below() {
        let block = Solid::block_centered(10.0).unwrap();
        assert!(block.slice_at(5.5).is_empty());
        assert!(block.slice_at(-7.0).is_empty());
    }

    #[test]
    fn section_of_clipped_corner_shrinks() {
        let plane =
            Plane::from_point_normal(&Point3::new(4.0, 4.0, 4.0), Vec3::new(1.0, 1.0, 1.0))
                .unwrap();
        let cut = Solid::block_centered(10.0).unwrap().clip(&plane).unwrap();
        // At z = 4.5 the cut has eaten the (x + y >= 7.5) corner.
        let outlines = cut.slice_at(4.5);
        assert_eq!(outlines.len(), 1);
        let lost = 2.5 * 2.5 / 2.0;
        assert_relative_eq!(outlines[0].area(), 100.0 - lost, max_relative = 1e-9);
    }

    #[test]
    fn section_exactly_at_a_face_uses_the_wall_outline() {
        let block = Solid::block_centered(10.0).unwrap();
        let outlines = block.slice_at(5.0);
        assert_eq!(outlines.len(), 1);
        assert_relative_eq!(outlines[0].area(), 100.0, max_relative = 1e-9);
    }
}
