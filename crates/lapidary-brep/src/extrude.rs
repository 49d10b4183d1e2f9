//! Linear extrusion of planar faces into prisms.

use lapidary_math::{Point3, Tolerance, Vec3};

use crate::face::Face;
use crate::solid::Solid;
use crate::{GeometryError, Result};

/// Sweeps `face` along `direction` into a closed prism.
///
/// The input face may sit on either side of the sweep: its orientation is
/// normalized so that the cap at the face's own position points away from
/// `direction` and the far cap points along it. Holes in the face become
/// tunnels through the prism. `direction` may be oblique to the face plane
/// (a sheared prism) but must not have zero length.
pub fn extrude(face: &Face, direction: Vec3) -> Result<Solid> {
    let tol = Tolerance::DEFAULT;
    if direction.norm() < tol.linear {
        return Err(GeometryError::ZeroDirection);
    }

    // The near cap keeps the source ring sequence whenever the sweep goes
    // against the face normal. Fusing a downward prism onto an upward one
    // built from the same outline therefore cancels exactly.
    let base = if face.plane.normal.dot(&direction) > 0.0 {
        face.reversed()
    } else {
        face.clone()
    };
    let far = base.reversed().translated(&direction);

    let mut faces = Vec::with_capacity(2 + base.rings.iter().map(Vec::len).sum::<usize>());
    faces.push(base.clone());
    faces.push(far);
    for ring in &base.rings {
        let n = ring.len();
        for i in 0..n {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            faces.push(Face::from_ring(vec![
                b,
                a,
                Point3::from(a.coords + direction),
                Point3::from(b.coords + direction),
            ])?);
        }
    }
    Ok(Solid::from_faces(faces))
}
