#![warn(missing_docs)]

//! Finished gemstones and their weight bookkeeping.
//!
//! A [`Gemstone`] is the immutable solid a carve run produced, together
//! with the prose its facet diagram carried. Weight is derived, never
//! stored: carats follow from the solid's volume and a material density,
//! and a stone can be rescaled uniformly to hit a target weight.

use std::fmt;
use std::str::FromStr;

use lapidary_brep::{BoundingBox, Solid};
use lapidary_math::Transform;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by gem bookkeeping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GemError {
    /// A rescale target that is not a positive weight.
    #[error("target weight must be positive, got {carats} ct")]
    InvalidTargetWeight {
        /// The requested carat value.
        carats: f64,
    },

    /// The stone encloses no volume, so weight math is meaningless.
    #[error("gemstone has no volume")]
    EmptyStone,

    /// An unknown material name.
    #[error("unknown gem material {0:?}")]
    UnknownMaterial(String),
}

/// Common gem materials and their densities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GemMaterial {
    /// Diamond, 3515 kg/m³.
    Diamond,
    /// Corundum (ruby, sapphire), 3990 kg/m³.
    Corundum,
    /// Beryl (emerald, aquamarine), 2760 kg/m³.
    Beryl,
    /// Quartz (amethyst, citrine), 2650 kg/m³.
    Quartz,
    /// Cubic zirconia, 5900 kg/m³.
    CubicZirconia,
}

impl GemMaterial {
    /// Density in kg/m³.
    pub fn density(&self) -> f64 {
        match self {
            GemMaterial::Diamond => 3515.0,
            GemMaterial::Corundum => 3990.0,
            GemMaterial::Beryl => 2760.0,
            GemMaterial::Quartz => 2650.0,
            GemMaterial::CubicZirconia => 5900.0,
        }
    }
}

impl fmt::Display for GemMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GemMaterial::Diamond => "diamond",
            GemMaterial::Corundum => "corundum",
            GemMaterial::Beryl => "beryl",
            GemMaterial::Quartz => "quartz",
            GemMaterial::CubicZirconia => "cubic-zirconia",
        };
        f.write_str(name)
    }
}

impl FromStr for GemMaterial {
    type Err = GemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "diamond" => Ok(GemMaterial::Diamond),
            "corundum" | "ruby" | "sapphire" => Ok(GemMaterial::Corundum),
            "beryl" | "emerald" | "aquamarine" => Ok(GemMaterial::Beryl),
            "quartz" | "amethyst" | "citrine" => Ok(GemMaterial::Quartz),
            "cubic-zirconia" | "cz" => Ok(GemMaterial::CubicZirconia),
            other => Err(GemError::UnknownMaterial(other.to_string())),
        }
    }
}

/// A finished gemstone: the carved solid plus its diagram's prose.
#[derive(Debug, Clone)]
pub struct Gemstone {
    /// Informal name, usually the diagram's file stem.
    pub name: String,
    /// The stone itself.
    pub solid: Solid,
    /// Header prose from the facet diagram.
    pub header: String,
    /// Footer prose from the facet diagram.
    pub footer: String,
}

impl Gemstone {
    /// Wraps a carved solid.
    pub fn new(
        name: impl Into<String>,
        solid: Solid,
        header: impl Into<String>,
        footer: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            solid,
            header: header.into(),
            footer: footer.into(),
        }
    }

    /// Volume in mm³.
    pub fn volume(&self) -> f64 {
        self.solid.volume()
    }

    /// Bounding box of the stone.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.solid.bounding_box()
    }

    /// Weight in carats for a material density in kg/m³.
    ///
    /// mm³ times kg/m³ is 1e-6 g; one carat is 0.2 g, hence the factor 5.
    pub fn carats(&self, density: f64) -> f64 {
        self.volume() * density / 1e6 * 5.0
    }

    /// The stone uniformly rescaled about the origin to weigh `target`
    /// carats at the given density.
    pub fn scaled_to_carats(&self, target: f64, density: f64) -> Result<Gemstone, GemError> {
        if !target.is_finite() || target <= 0.0 {
            return Err(GemError::InvalidTargetWeight { carats: target });
        }
        let current = self.carats(density);
        if current <= 0.0 {
            return Err(GemError::EmptyStone);
        }
        let factor = (target / current).powf(1.0 / 3.0);
        Ok(Gemstone {
            name: self.name.clone(),
            solid: self.solid.transformed(&Transform::uniform_scale(factor)),
            header: self.header.clone(),
            footer: self.footer.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_stone() -> Gemstone {
        // A 10 mm cube of material, 1000 mm³.
        Gemstone::new("cube", Solid::block_centered(10.0).unwrap(), "", "")
    }

    #[test]
    fn carat_formula_matches_hand_calculation() {
        let stone = unit_stone();
        // 1000 mm³ of diamond: 3.515 g, 17.575 ct.
        assert_relative_eq!(
            stone.carats(GemMaterial::Diamond.density()),
            17.575,
            max_relative = 1e-9
        );
        assert_relative_eq!(stone.carats(2650.0), 13.25, max_relative = 1e-9);
    }

    #[test]
    fn rescale_hits_the_target_weight() {
        let stone = unit_stone();
        let density = GemMaterial::Quartz.density();
        let scaled = stone.scaled_to_carats(1.0, density).unwrap();
        assert_relative_eq!(scaled.carats(density), 1.0, max_relative = 1e-9);
        // Linear dimensions shrink by the cube root of the weight ratio.
        let factor = (1.0 / stone.carats(density)).powf(1.0 / 3.0);
        let bb = scaled.bounding_box().unwrap();
        assert_relative_eq!(bb.max.x, 5.0 * factor, max_relative = 1e-9);
    }

    #[test]
    fn rescale_rejects_bad_targets() {
        let stone = unit_stone();
        assert!(matches!(
            stone.scaled_to_carats(0.0, 3515.0),
            Err(GemError::InvalidTargetWeight { .. })
        ));
        let empty = Gemstone::new("void", Solid::empty(), "", "");
        assert!(matches!(
            empty.scaled_to_carats(1.0, 3515.0),
            Err(GemError::EmptyStone)
        ));
    }

    #[test]
    fn material_names_round_trip() {
        for m in [
            GemMaterial::Diamond,
            GemMaterial::Corundum,
            GemMaterial::Beryl,
            GemMaterial::Quartz,
            GemMaterial::CubicZirconia,
        ] {
            assert_eq!(m.to_string().parse::<GemMaterial>().unwrap(), m);
        }
        assert_eq!("Sapphire".parse::<GemMaterial>().unwrap(), GemMaterial::Corundum);
        assert!(matches!(
            "unobtanium".parse::<GemMaterial>(),
            Err(GemError::UnknownMaterial(_))
        ));
    }

    #[test]
    fn densities_are_in_plausible_ranges() {
        assert_eq!(GemMaterial::Diamond.density(), 3515.0);
        assert!(GemMaterial::CubicZirconia.density() > GemMaterial::Diamond.density());
        assert!(GemMaterial::Quartz.density() < GemMaterial::Beryl.density());
    }
}
