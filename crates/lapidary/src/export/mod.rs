//! Mesh export.

pub mod stl;
