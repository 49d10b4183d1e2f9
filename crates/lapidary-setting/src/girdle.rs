//! Girdle detection and cross-section extraction.
//!
//! The generator assumes a stone shaped like a faceted gem: widening
//! from the culet up to a band of vertical facets (the girdle), then
//! narrowing again toward the table. The girdle is located purely from
//! the vertex set: the vertices farthest from the stone's center axis,
//! which come in pairs at the band's top and bottom edges.

use lapidary_brep::Solid;
use lapidary_math::{Point2, Point3};
use lapidary_sketch::SectionCurve;

use crate::{Result, SettingError};

/// Radius and height tolerance of the girdle vertex scan, in mm.
///
/// Looser than the kernel tolerance on purpose: facets meeting at the
/// girdle are cut by independent planes and land within fractions of a
/// micron of each other only in theory.
pub const GIRDLE_EPS: f64 = 1e-3;

/// The two vertices bounding the girdle band, `upper.z > lower.z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GirdleVertices {
    /// Vertex on the band's top edge.
    pub upper: Point3,
    /// Vertex on the band's bottom edge.
    pub lower: Point3,
}

/// One horizontal cross-section of the stone.
#[derive(Debug, Clone)]
pub struct CrossSection {
    /// The section outline.
    pub curve: SectionCurve,
    /// Slicing height.
    pub z: f64,
    /// Center of the outline's bounding box.
    pub center: Point2,
}

/// Everything the assembler needs to know about a stone's shape.
#[derive(Debug, Clone)]
pub struct GirdleProfile {
    /// The girdle vertex pair.
    pub vertices: GirdleVertices,
    /// The stone's center axis in the xy plane (bounding-box center).
    pub center: Point2,
    /// Planar radius of the girdle vertices from the center axis.
    pub max_radius: f64,
    /// Crown height: girdle top to the table.
    pub height: f64,
    /// Pavilion depth: girdle bottom to the culet.
    pub depth: f64,
    /// Height of the girdle band itself.
    pub girdle_thickness: f64,
    /// How far below the girdle the step sits (`depth` times the step
    /// depth fraction).
    pub step_depth: f64,
    /// Cross-section at the step height, below the girdle.
    pub lower_slice: CrossSection,
    /// Cross-section at the girdle midpoint.
    pub upper_slice: CrossSection,
}

/// Locates the girdle of a stone and takes the two cross-sections the
/// assembler works from.
///
/// The upper section is taken at the girdle's vertical midpoint rather
/// than at the vertex ring itself; slicing exactly through a ring of
/// vertices is numerically unreliable.
pub fn analyze(solid: &Solid, step_depth_percentage: f64) -> Result<GirdleProfile> {
    let bbox = solid.bounding_box().ok_or(SettingError::GirdleNotFound)?;
    let center = Point2::new(bbox.center().x, bbox.center().y);

    let vertices = find_girdle_vertices(&solid.vertices(), &center)?;
    let max_radius = planar_radius(&vertices.upper, &center);

    let height = bbox.max.z - vertices.upper.z;
    let depth = vertices.lower.z - bbox.min.z;
    let girdle_thickness = vertices.upper.z - vertices.lower.z;
    let step_depth = depth * step_depth_percentage;

    let lower_slice = section_at(solid, vertices.lower.z - step_depth)?;
    let upper_slice = section_at(solid, vertices.lower.z + girdle_thickness / 2.0)?;

    Ok(GirdleProfile {
        vertices,
        center,
        max_radius,
        height,
        depth,
        girdle_thickness,
        step_depth,
        lower_slice,
        upper_slice,
    })
}

fn planar_radius(v: &Point3, center: &Point2) -> f64 {
    (Point2::new(v.x, v.y) - center).norm()
}

/// Single linear scan with running state.
///
/// A strictly larger radius resets the candidate pair; a radius tied
/// with the maximum either duplicates the current upper vertex (same
/// height), fills or replaces the lower slot (lower height), or demotes
/// the upper (greater height). A tie at a third distinct height means
/// the stone's girdle is stranger than this model; the scan warns and
/// keeps its running pair.
fn find_girdle_vertices(vertices: &[Point3], center: &Point2) -> Result<GirdleVertices> {
    let mut max_r = f64::NEG_INFINITY;
    let mut upper: Option<Point3> = None;
    let mut lower: Option<Point3> = None;
    let mut warned = false;

    for &v in vertices {
        let r = planar_radius(&v, center);
        if let Some(u) = upper {
            if (r - max_r).abs() < GIRDLE_EPS {
                if (v.z - u.z).abs() < GIRDLE_EPS {
                    continue;
                }
                if let Some(l) = lower {
                    if (v.z - l.z).abs() >= GIRDLE_EPS && !warned {
                        warned = true;
                        log::warn!(
                            "girdle has more than two vertex heights at radius {max_r:.4}; \
                             keeping the widest pair found so far"
                        );
                    }
                }
                if v.z < u.z {
                    lower = Some(v);
                } else {
                    lower = Some(u);
                    upper = Some(v);
                }
                continue;
            }
        }
        if r > max_r {
            max_r = r;
            upper = Some(v);
            lower = None;
        }
    }

    match (upper, lower) {
        (Some(upper), Some(lower)) => Ok(GirdleVertices { upper, lower }),
        _ => Err(SettingError::GirdleNotFound),
    }
}

/// Takes the single-loop cross-section at height `z`.
///
/// A section with several loops means the stone is not convex in z
/// (part of a ring band, say); that is not fully supported, so the
/// largest loop is used and a warning raised. No loop at all is fatal.
fn section_at(solid: &Solid, z: f64) -> Result<CrossSection> {
    let mut loops = solid.slice_at(z);
    if loops.is_empty() {
        return Err(SettingError::EmptySlice { z });
    }
    if loops.len() > 1 {
        log::warn!(
            "cross-section at z = {z:.4} has {} loops; shape not fully supported, \
             continuing with the largest",
            loops.len()
        );
    }
    let outline = loops.swap_remove(0);
    let center = outline.bounding_center();
    Ok(CrossSection {
        curve: SectionCurve::Polygon(outline),
        z,
        center,
    })
}
