#![warn(missing_docs)]

//! Facet carving: turning a parsed facet diagram into a stone.
//!
//! Carving starts from a raw cube of material and subtracts one planar
//! tool per facet index. Each tool is a copy of a single template face,
//! moved out to the facet set's radius, tilted by its angle about the x
//! axis, swung about the z axis by the index's share of the full
//! rotation, and extruded along its own normal far enough to clear the
//! block. Every cut is a subtraction against the shrinking block, so the
//! order of facet sets and indices does not affect the result.

use lapidary_asc::{FacetProgram, FacetSet};
use lapidary_brep::{extrude, Face, GeometryError, Solid};
use lapidary_math::{Point3, Transform, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while carving.
#[derive(Error, Debug)]
pub enum CarveError {
    /// Settings that cannot describe a raw block.
    #[error("invalid carve settings: {0}")]
    InvalidSettings(String),

    /// A kernel operation failed mid-carve.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Result alias for carving.
pub type Result<T> = std::result::Result<T, CarveError>;

/// Raw-block sizing for a carve run.
///
/// The block must be large enough to contain the finished stone; an
/// undersized block silently yields truncated facets, it is not detected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarveSettings {
    /// Edge length of the centered cube of raw material, in mm.
    pub block_size: f64,
}

impl Default for CarveSettings {
    fn default() -> Self {
        Self { block_size: 10.0 }
    }
}

impl CarveSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !self.block_size.is_finite() || self.block_size <= 0.0 {
            return Err(CarveError::InvalidSettings(format!(
                "block_size must be positive, got {}",
                self.block_size
            )));
        }
        Ok(())
    }
}

/// Carves a gemstone solid from a raw block.
pub fn carve(program: &FacetProgram, settings: &CarveSettings) -> Result<Solid> {
    settings.validate()?;
    let mut stone = Solid::block_centered(settings.block_size)?;

    // A square spanning four block edge lengths covers the block at any
    // radius a sane diagram asks for; the extrusion length covers the
    // full space diagonal so each tool is a complete half-space cut.
    let template = template_face(settings.block_size)?;
    let tool_length = settings.block_size * 3.0_f64.sqrt();

    let mut cuts = 0usize;
    for set in &program.facet_sets {
        for &index in &set.indices {
            let face = position_cut(&template, set, program.rotation_degrees(index))?;
            let tool = extrude(&face, face.plane.normal * tool_length)?;
            stone = stone.difference(&tool)?;
            cuts += 1;
            log::debug!(
                "cut {cuts}: angle {} radius {} index {index}, {} faces remain",
                set.angle,
                set.radius,
                stone.face_count()
            );
        }
    }
    log::debug!("carved {} facet cuts from block {}", cuts, settings.block_size);
    Ok(stone)
}

/// The shared template face: a horizontal square at z = 0, normal +z.
fn template_face(block_size: f64) -> lapidary_brep::Result<Face> {
    let s = 2.0 * block_size;
    Face::from_ring(vec![
        Point3::new(s, s, 0.0),
        Point3::new(-s, s, 0.0),
        Point3::new(-s, -s, 0.0),
        Point3::new(s, -s, 0.0),
    ])
}

/// One positioned cutting face: template lifted to the set's radius,
/// tilted about x, then swung about z by the index rotation.
fn position_cut(template: &Face, set: &FacetSet, z_rotation_deg: f64) -> Result<Face> {
    let place = Transform::rotation_z(z_rotation_deg.to_radians())
        .then(&Transform::rotation_x(set.angle.to_radians()))
        .then(&Transform::translation(0.0, 0.0, set.radius));
    let ring = template
        .outer()
        .iter()
        .map(|p| place.apply_point(p))
        .collect();
    Ok(Face::from_ring(ring)?)
}
