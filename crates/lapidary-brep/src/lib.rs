#![warn(missing_docs)]

//! Planar-facet boundary representation kernel.
//!
//! Solids here are closed collections of flat faces; every face is one
//! outer ring of 3D points plus optional hole rings on a common plane.
//! That is all a faceted stone or a stepped mount ever needs, and it keeps
//! every operation exact over plane clips instead of approximate over
//! triangle soups. Available operations: half-space clipping, difference
//! against a convex tool, horizontal slicing, extrusion, revolution,
//! coplanar fusion, refinement, measurement, and tessellation for export.

pub mod booleans;
pub mod clip;
pub mod extrude;
pub mod face;
pub mod revolve;
pub mod slice;
pub mod solid;
pub mod tessellate;

pub use extrude::extrude;
pub use face::{annular_face, Face, Plane};
pub use revolve::revolve_y;
pub use solid::{BoundingBox, Solid};
pub use tessellate::Mesh;

use thiserror::Error;

/// Errors raised by kernel operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A ring had too few distinct vertices or enclosed no area.
    #[error("degenerate face ({vertices} vertices enclose no area)")]
    DegenerateFace {
        /// Number of vertices supplied.
        vertices: usize,
    },

    /// A direction or normal vector had zero length.
    #[error("zero-length direction vector")]
    ZeroDirection,

    /// A hole ring was not strictly inside its outer ring.
    #[error("hole ring does not fit inside its outer ring")]
    InvalidHole,

    /// Cut segments on a plane failed to chain into closed loops.
    #[error("section on plane at offset {offset} left {open} open chains")]
    OpenSection {
        /// Plane offset from the origin along its normal.
        offset: f64,
        /// Number of chains that would not close.
        open: usize,
    },

    /// A revolve profile touched or crossed the rotation axis.
    #[error("revolve profile touches the rotation axis (radius {radius})")]
    AxisIntersection {
        /// Offending radial coordinate.
        radius: f64,
    },

    /// A 2D offset collapsed the curve it was applied to.
    #[error("offset by {distance} collapsed the section curve")]
    OffsetCollapsed {
        /// The signed offset distance that was requested.
        distance: f64,
    },
}

/// Result alias for kernel operations.
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Quantize a coordinate for exact hashing of nearly-equal points.
pub(crate) fn quantize(v: f64) -> i64 {
    (v * 1e9).round() as i64
}

/// Quantized key for a 3D point.
pub(crate) fn point_key(p: &lapidary_math::Point3) -> (i64, i64, i64) {
    (quantize(p.x), quantize(p.y), quantize(p.z))
}
