#![warn(missing_docs)]

//! Bezel setting generation for finished gemstones.
//!
//! A setting is a stepped mount: a wall that rises around the stone's
//! crown, an interior ledge at the girdle for the stone to rest on, and
//! a tapered base that clears the pavilion. Deriving it from an
//! arbitrary stone takes three stages, each its own module:
//!
//! - [`girdle`] scans the stone's vertices for the girdle band and takes
//!   two horizontal cross-sections;
//! - [`round`] replaces a cross-section with a true circle when it is
//!   close enough to one, which lets it offset exactly;
//! - [`assemble`] offsets the sections outward, builds annular faces,
//!   extrudes them, and fuses the prisms into the mount.
//!
//! The gemstone is read-only input throughout; the result carries the
//! stone's placement so the two land together in an assembly.

pub mod assemble;
pub mod girdle;
pub mod round;

pub use girdle::{analyze, CrossSection, GirdleProfile, GirdleVertices};

use lapidary_brep::{GeometryError, Solid};
use lapidary_gem::Gemstone;
use lapidary_math::Transform;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while generating a setting.
#[derive(Error, Debug)]
pub enum SettingError {
    /// Parameters that cannot describe a setting.
    #[error("invalid setting parameters: {0}")]
    InvalidParameters(String),

    /// The vertex scan found no girdle pair: the stone has no band of
    /// equally wide vertices at two heights.
    #[error("no girdle found: the stone has no pair of widest vertices at distinct heights")]
    GirdleNotFound,

    /// A required cross-section came back without a single closed loop.
    #[error("cross-section at z = {z} is empty")]
    EmptySlice {
        /// The slicing height.
        z: f64,
    },

    /// A kernel operation failed.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Result alias for setting generation.
pub type Result<T> = std::result::Result<T, SettingError>;

/// Proportions of the mount, all lengths in mm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingParameters {
    /// Thickness of the outer wall of the bezel.
    pub wall_thickness: f64,
    /// Clearance between the stone and the setting.
    pub margin: f64,
    /// How far the step reaches down from the girdle toward the culet,
    /// as a fraction of the pavilion depth.
    pub step_depth_percentage: f64,
    /// How far the wall rises above the girdle, as a fraction of the
    /// crown height.
    pub protrusion_percentage: f64,
    /// Extra base material below the pavilion.
    pub bottom_extension: f64,
    /// Largest area deviation at which a cross-section still counts as
    /// a circle.
    pub max_noncircularity: f64,
}

impl Default for SettingParameters {
    fn default() -> Self {
        Self {
            wall_thickness: 0.3,
            margin: 0.05,
            step_depth_percentage: 0.2,
            protrusion_percentage: 0.3,
            bottom_extension: 0.2,
            max_noncircularity: 0.05,
        }
    }
}

impl SettingParameters {
    /// Validate parameters.
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(SettingError::InvalidParameters(msg));
        if !self.wall_thickness.is_finite() || self.wall_thickness <= 0.0 {
            return bad(format!(
                "wall_thickness must be positive, got {}",
                self.wall_thickness
            ));
        }
        if self.margin < 0.0 {
            return bad(format!("margin must not be negative, got {}", self.margin));
        }
        // Zero is excluded: it would put the step slice exactly on the
        // lower girdle vertex ring, where slicing is unreliable.
        if !(self.step_depth_percentage > 0.0 && self.step_depth_percentage < 1.0) {
            return bad(format!(
                "step_depth_percentage must be in (0, 1), got {}",
                self.step_depth_percentage
            ));
        }
        if self.protrusion_percentage < 0.0 {
            return bad(format!(
                "protrusion_percentage must not be negative, got {}",
                self.protrusion_percentage
            ));
        }
        if self.bottom_extension < 0.0 {
            return bad(format!(
                "bottom_extension must not be negative, got {}",
                self.bottom_extension
            ));
        }
        if self.max_noncircularity < 0.0 {
            return bad(format!(
                "max_noncircularity must not be negative, got {}",
                self.max_noncircularity
            ));
        }
        Ok(())
    }
}

/// The finished mount, positioned like its source stone.
#[derive(Debug, Clone)]
pub struct Setting {
    /// The fused mount solid.
    pub solid: Solid,
}

/// Builds a setting around a gemstone.
///
/// `placement` is the transform that positions the stone in the host
/// model; it is applied to the finished mount so both stay aligned.
pub fn build_setting(
    gem: &Gemstone,
    placement: &Transform,
    params: &SettingParameters,
) -> Result<Setting> {
    params.validate()?;
    let profile = girdle::analyze(&gem.solid, params.step_depth_percentage)?;
    let upper = round::circularize(
        profile.upper_slice.clone(),
        profile.center,
        profile.max_radius,
        params.max_noncircularity,
    );
    let lower =
        round::circularize_about_own_center(profile.lower_slice.clone(), params.max_noncircularity);
    assemble::assemble(&profile, &upper.curve, &lower.curve, params, placement)
}
