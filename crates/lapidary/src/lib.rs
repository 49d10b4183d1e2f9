#![warn(missing_docs)]

//! Gemstone carving and jewelry geometry.
//!
//! The two pipelines of this workspace behind one door:
//!
//! - [`carve`] reads a GemCad facet diagram and cuts the described stone
//!   out of a raw block;
//! - [`build_setting`] wraps any finished stone in a stepped bezel mount.
//!
//! Both are pure functions: same inputs, same solids. Supporting pieces
//! (ring bands, carat bookkeeping, STL export) are re-exported from
//! their crates.
//!
//! # Example
//!
//! ```no_run
//! use lapidary::{build_setting, carve, SettingParameters, Transform};
//!
//! let text = std::fs::read_to_string("brilliant.asc")?;
//! let gem = carve(&text)?;
//! println!("{:.2} ct of diamond", gem.carats(3515.0));
//!
//! let setting = build_setting(&gem, &Transform::identity(), &SettingParameters::default())?;
//! lapidary::export::stl::save_stl("setting.stl", &setting.solid)?;
//! # Ok::<(), lapidary::Error>(())
//! ```

pub mod export;

use thiserror::Error;

pub use lapidary_asc::{parse, read_asc, AscError, FacetProgram, FacetSet};
pub use lapidary_brep::{BoundingBox, GeometryError, Mesh, Solid};
pub use lapidary_carve::{CarveError, CarveSettings};
pub use lapidary_gem::{GemError, GemMaterial, Gemstone};
pub use lapidary_math::Transform;
pub use lapidary_ring::{build_ring, RingError, RingParameters, RingProfile};
pub use lapidary_setting::{GirdleProfile, Setting, SettingError, SettingParameters};

/// Any failure from the two pipelines or their supporting pieces.
#[derive(Error, Debug)]
pub enum Error {
    /// A malformed facet diagram.
    #[error(transparent)]
    Parse(#[from] AscError),

    /// Carving failed.
    #[error(transparent)]
    Carve(#[from] CarveError),

    /// Weight bookkeeping failed.
    #[error(transparent)]
    Gem(#[from] GemError),

    /// Setting generation failed.
    #[error(transparent)]
    Setting(#[from] SettingError),

    /// Ring generation failed.
    #[error(transparent)]
    Ring(#[from] RingError),

    /// A kernel operation failed outside any pipeline.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// I/O error while exporting.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for the facade.
pub type Result<T> = std::result::Result<T, Error>;

/// Carves the stone a facet diagram describes, with default block
/// sizing.
///
/// The stone is named `"gem"`; callers that know better (a file stem,
/// say) can rename it afterwards.
pub fn carve(text: &str) -> Result<Gemstone> {
    carve_with(text, &CarveSettings::default())
}

/// Carves with explicit block sizing.
pub fn carve_with(text: &str, settings: &CarveSettings) -> Result<Gemstone> {
    carve_program(&parse(text)?, settings)
}

/// Carves an already-parsed facet program.
pub fn carve_program(program: &FacetProgram, settings: &CarveSettings) -> Result<Gemstone> {
    let solid = lapidary_carve::carve(program, settings)?;
    Ok(Gemstone::new(
        "gem",
        solid,
        program.header.clone(),
        program.footer.clone(),
    ))
}

/// Builds a stepped bezel setting around a finished stone.
///
/// `placement` positions the stone in the host model; the setting comes
/// back under the same transform.
pub fn build_setting(
    gem: &Gemstone,
    placement: &Transform,
    params: &SettingParameters,
) -> Result<Setting> {
    Ok(lapidary_setting::build_setting(gem, placement, params)?)
}
