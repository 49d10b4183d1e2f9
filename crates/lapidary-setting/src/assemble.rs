//! Offsetting, extrusion, and fusion of the mount solid.
//!
//! The step shape comes from two prisms sharing one base plane at the
//! step height: a wide wall ring extruded upward past the girdle, and a
//! wide base ring with a narrower bore extruded downward past the
//! pavilion. Fusing them cancels the shared outer ring and leaves the
//! uncancelled inner rings as the ledge the stone rests on.

use lapidary_brep::{annular_face, extrude, GeometryError};
use lapidary_math::{Transform, Vec3};
use lapidary_sketch::SectionCurve;

use crate::girdle::GirdleProfile;
use crate::{Result, Setting, SettingParameters};

/// Assembles the mount from the (possibly circularized) cross-sections.
///
/// `upper` and `lower` are the girdle and step sections; all curves are
/// referenced to the step base plane at `lower girdle vertex - step
/// depth` (the vertical shift leaves the 2D outlines unchanged).
pub fn assemble(
    profile: &GirdleProfile,
    upper: &SectionCurve,
    lower: &SectionCurve,
    params: &SettingParameters,
    placement: &Transform,
) -> Result<Setting> {
    let base_z = profile.vertices.lower.z - profile.step_depth;

    let outer = offset(upper, params.wall_thickness + params.margin)?;
    let mid = offset(upper, params.margin)?;
    let inner = offset(lower, params.margin)?;

    let lower_face = annular_face(&outer, &inner, base_z)?;
    let upper_face = annular_face(&outer, &mid, base_z)?;

    let down = profile.depth + params.bottom_extension - profile.step_depth;
    let up = profile.step_depth
        + profile.girdle_thickness
        + profile.height * params.protrusion_percentage;

    let base = extrude(&lower_face, Vec3::new(0.0, 0.0, -down))?;
    let wall = extrude(&upper_face, Vec3::new(0.0, 0.0, up))?;

    let solid = base.fuse(&wall)?.refine()?;
    Ok(Setting {
        solid: solid.transformed(placement),
    })
}

fn offset(curve: &SectionCurve, distance: f64) -> Result<SectionCurve> {
    curve
        .offset_outward(distance)
        .ok_or(GeometryError::OffsetCollapsed { distance })
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lapidary_math::{Point2, Point3};
    use lapidary_sketch::Polygon;

    use crate::girdle::{CrossSection, GirdleVertices};

    fn circle(radius: f64) -> SectionCurve {
        SectionCurve::Circle {
            center: Point2::origin(),
            radius,
        }
    }

    fn round_profile() -> GirdleProfile {
        let upper = CrossSection {
            curve: circle(3.0),
            z: 0.25,
            center: Point2::origin(),
        };
        let lower = CrossSection {
            curve: circle(2.4),
            z: -0.9,
            center: Point2::origin(),
        };
        GirdleProfile {
            vertices: GirdleVertices {
                upper: Point3::new(3.0, 0.0, 0.5),
                lower: Point3::new(3.0, 0.0, 0.0),
            },
            center: Point2::origin(),
            max_radius: 3.0,
            height: 1.5,
            depth: 2.0,
            girdle_thickness: 0.5,
            step_depth: 0.4,
            lower_slice: lower,
            upper_slice: upper,
        }
    }

    #[test]
    fn wall_offsets_stay_concentric() {
        // The gap between the outer and mid curves is the wall
        // thickness everywhere, both concentric with the source.
        let params = SettingParameters::default();
        let upper = circle(3.0);
        let outer = offset(&upper, params.wall_thickness + params.margin).unwrap();
        let mid = offset(&upper, params.margin).unwrap();
        let (r_outer, r_mid) = (
            outer.circle_radius().unwrap(),
            mid.circle_radius().unwrap(),
        );
        assert_relative_eq!(r_outer - r_mid, params.wall_thickness, max_relative = 1e-12);
        assert_relative_eq!(r_mid, 3.0 + params.margin, max_relative = 1e-12);
    }

    #[test]
    fn round_setting_has_the_step_proportions() {
        let profile = round_profile();
        let params = SettingParameters::default();
        let setting =
            assemble(&profile, &circle(3.0), &circle(2.4), &params, &Transform::identity())
                .unwrap();

        let bb = setting.solid.bounding_box().unwrap();
        // Base plane at lower girdle vertex minus step depth.
        let base_z = -0.4;
        let down = profile.depth + params.bottom_extension - profile.step_depth;
        let up = profile.step_depth
            + profile.girdle_thickness
            + profile.height * params.protrusion_percentage;
        assert_relative_eq!(bb.min.z, base_z - down, epsilon = 1e-9);
        assert_relative_eq!(bb.max.z, base_z + up, epsilon = 1e-9);
        // Lateral extent is the outer offset of the girdle section.
        let r_outer = 3.0 + params.wall_thickness + params.margin;
        assert_relative_eq!(bb.max.x, r_outer, epsilon = 1e-9);
        assert_relative_eq!(bb.min.y, -r_outer, epsilon = 1e-9);
        assert!(setting.solid.volume() > 0.0);
    }

    #[test]
    fn fused_prisms_grow_the_resting_ledge() {
        let profile = round_profile();
        let params = SettingParameters::default();
        let setting =
            assemble(&profile, &circle(3.0), &circle(2.4), &params, &Transform::identity())
                .unwrap();

        // One upward annular face at the base plane: the ledge between
        // the bore and the wall's inner surface.
        let base_z = -0.4;
        let ledges: Vec<_> = setting
            .solid
            .faces
            .iter()
            .filter(|f| {
                f.plane.normal.z > 0.99
                    && !f.holes().is_empty()
                    && (f.outer()[0].z - base_z).abs() < 1e-9
            })
            .collect();
        assert_eq!(ledges.len(), 1);
        let expected = circle(3.0 + params.margin).to_polygon().area()
            - circle(2.4 + params.margin).to_polygon().area();
        assert_relative_eq!(ledges[0].area(), expected, max_relative = 1e-9);
    }

    #[test]
    fn placement_carries_the_setting_with_the_stone() {
        let profile = round_profile();
        let params = SettingParameters::default();
        let placement = Transform::translation(10.0, -4.0, 2.0);
        let moved =
            assemble(&profile, &circle(3.0), &circle(2.4), &params, &placement).unwrap();
        let still =
            assemble(&profile, &circle(3.0), &circle(2.4), &params, &Transform::identity())
                .unwrap();
        let (bb_m, bb_s) = (
            moved.solid.bounding_box().unwrap(),
            still.solid.bounding_box().unwrap(),
        );
        assert_relative_eq!(bb_m.min.x, bb_s.min.x + 10.0, epsilon = 1e-9);
        assert_relative_eq!(bb_m.max.y, bb_s.max.y - 4.0, epsilon = 1e-9);
        assert_relative_eq!(bb_m.min.z, bb_s.min.z + 2.0, epsilon = 1e-9);
        assert_relative_eq!(
            moved.solid.volume(),
            still.solid.volume(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn polygonal_sections_assemble_too() {
        let octagon = |r: f64| SectionCurve::Polygon(Polygon::regular(Point2::origin(), r, 8));
        let profile = round_profile();
        let params = SettingParameters::default();
        let setting = assemble(
            &profile,
            &octagon(3.0),
            &octagon(2.4),
            &params,
            &Transform::identity(),
        )
        .unwrap();
        assert!(setting.solid.volume() > 0.0);
        assert!(setting.solid.face_count() > 8);
    }

    #[test]
    fn collapsing_offset_is_a_geometry_error() {
        let tiny = circle(0.1);
        let err = offset(&tiny, -0.2).unwrap_err();
        assert!(matches!(
            err,
            crate::SettingError::Geometry(GeometryError::OffsetCollapsed { .. })
        ));
    }
}
