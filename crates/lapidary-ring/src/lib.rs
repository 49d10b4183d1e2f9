#![warn(missing_docs)]

//! Plain ring bands.
//!
//! A band is a closed profile revolved around the finger axis. Sizing
//! follows ISO 8653: the size number is the inner circumference in mm,
//! with conversions to the North American and Swiss scales and to the
//! inner diameter.

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use lapidary_brep::{revolve_y, GeometryError, Solid};
use lapidary_math::Point2;
use lapidary_sketch::{Polygon, CIRCLE_SEGMENTS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while generating a ring band.
#[derive(Error, Debug)]
pub enum RingError {
    /// Parameters that cannot describe a band.
    #[error("invalid ring parameters: {0}")]
    InvalidParameters(String),

    /// The revolve failed in the kernel.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Result alias for ring generation.
pub type Result<T> = std::result::Result<T, RingError>;

/// Cross-section shape of the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RingProfile {
    /// An elliptical section, comfortable against the finger.
    #[default]
    Elliptical,
    /// A flat rectangular section.
    Rectangular,
}

impl fmt::Display for RingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RingProfile::Elliptical => "elliptical",
            RingProfile::Rectangular => "rectangular",
        })
    }
}

impl FromStr for RingProfile {
    type Err = RingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "elliptical" => Ok(RingProfile::Elliptical),
            "rectangular" => Ok(RingProfile::Rectangular),
            other => Err(RingError::InvalidParameters(format!(
                "unknown profile {other:?}, expected elliptical or rectangular"
            ))),
        }
    }
}

/// Band sizing, lengths in mm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RingParameters {
    /// Inner circumference per ISO 8653:2016.
    pub size: f64,
    /// Axial width of the band.
    pub width: f64,
    /// Radial thickness of the band.
    pub thickness: f64,
    /// Section shape.
    pub profile: RingProfile,
}

impl Default for RingParameters {
    fn default() -> Self {
        Self {
            size: 57.0,
            width: 5.0,
            thickness: 2.0,
            profile: RingProfile::Elliptical,
        }
    }
}

impl RingParameters {
    /// Validate parameters.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("size", self.size),
            ("width", self.width),
            ("thickness", self.thickness),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RingError::InvalidParameters(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Inner radius of the band.
    pub fn inner_radius(&self) -> f64 {
        self.size / TAU
    }

    /// Inner diameter in mm.
    pub fn diameter(&self) -> f64 {
        self.size / PI
    }

    /// Ring size on the North American scale (US, Canada, Mexico).
    pub fn north_american(&self) -> f64 {
        (self.size - 36.5) / 2.55348651
    }

    /// Ring size on the Swiss scale (Switzerland, Italy, Spain).
    pub fn swiss(&self) -> f64 {
        self.size - 40.0
    }
}

/// Revolves the band profile around the finger (y) axis.
pub fn build_ring(params: &RingParameters) -> Result<Solid> {
    params.validate()?;
    let r0 = params.inner_radius();
    let profile = match params.profile {
        RingProfile::Elliptical => ellipse_profile(
            r0 + params.thickness / 2.0,
            params.thickness / 2.0,
            params.width / 2.0,
        ),
        RingProfile::Rectangular => Polygon::new(vec![
            Point2::new(r0, -params.width / 2.0),
            Point2::new(r0 + params.thickness, -params.width / 2.0),
            Point2::new(r0 + params.thickness, params.width / 2.0),
            Point2::new(r0, params.width / 2.0),
        ]),
    };
    Ok(revolve_y(&profile, CIRCLE_SEGMENTS)?)
}

/// Ellipse in the radial/axial plane: `x` radial with semi-axis `a`,
/// `y` axial with semi-axis `b`, centered at radius `cx`.
fn ellipse_profile(cx: f64, a: f64, b: f64) -> Polygon {
    let n = CIRCLE_SEGMENTS;
    Polygon::new(
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64 * TAU;
                Point2::new(cx + a * t.cos(), b * t.sin())
            })
            .collect(),
    )
}
