//! Circularity approximation for cross-sections.
//!
//! Brilliant-style stones slice into near-regular polygons with dozens
//! of vertices. Offsetting those verbatim keeps every vertex and risks
//! miter artifacts; a true circle offsets exactly. A section is swapped
//! for its circumscribing circle when the enclosed areas agree closely
//! enough.

use lapidary_math::Point2;
use lapidary_sketch::SectionCurve;

use crate::girdle::CrossSection;

/// Replaces `section` with the circle `(center, radius)` when the areas
/// deviate by less than `max_noncircularity` (as a fraction).
pub fn circularize(
    section: CrossSection,
    center: Point2,
    radius: f64,
    max_noncircularity: f64,
) -> CrossSection {
    let circle_area = std::f64::consts::PI * radius * radius;
    if circle_area <= 0.0 {
        return section;
    }
    let deviation = section.curve.area() / circle_area - 1.0;
    if deviation.abs() < max_noncircularity {
        log::debug!(
            "section at z = {:.4} is round within {:.4}, using a circle of radius {radius:.4}",
            section.z,
            deviation.abs()
        );
        CrossSection {
            curve: SectionCurve::Circle { center, radius },
            z: section.z,
            center,
        }
    } else {
        section
    }
}

/// Circularizes a section against a circle derived from the section
/// itself: centered on its own bounding center, through its farthest
/// vertex. Used for the lower slice, whose radius the girdle scan does
/// not know.
pub fn circularize_about_own_center(section: CrossSection, max_noncircularity: f64) -> CrossSection {
    let radius = match &section.curve {
        SectionCurve::Polygon(poly) => poly.max_radius_from(&section.center),
        SectionCurve::Circle { radius, .. } => *radius,
    };
    let center = section.center;
    circularize(section, center, radius, max_noncircularity)
}
