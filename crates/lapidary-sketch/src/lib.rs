#![warn(missing_docs)]

//! 2D section curves for the lapidary kernel.
//!
//! Cross-sections of a stone arrive here as closed polygons; curves that
//! turn out to be nearly circular may be replaced by true circles, which
//! offset exactly. Both forms share the [`SectionCurve`] enum so the
//! downstream face building does not care which it got.

use lapidary_math::Point2;

/// Number of segments used when a circle has to become a polygon again
/// (one per index of the common 96-tooth gear).
pub const CIRCLE_SEGMENTS: u32 = 96;

/// A closed 2D polygon. Winding carries orientation: positive signed area
/// is counter-clockwise.
#[derive(Debug, Clone)]
pub struct Polygon {
    /// Vertices in order; the closing edge back to the first vertex is
    /// implicit.
    pub points: Vec<Point2>,
}

impl Polygon {
    /// Create a polygon from points.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// A regular `n`-gon inscribed in the circle `(center, radius)`,
    /// counter-clockwise, first vertex on the +x side.
    pub fn regular(center: Point2, radius: f64, n: u32) -> Self {
        let n = n.max(3);
        let points = (0..n)
            .map(|i| {
                let theta = i as f64 / n as f64 * std::f64::consts::TAU;
                Point2::new(
                    center.x + radius * theta.cos(),
                    center.y + radius * theta.sin(),
                )
            })
            .collect();
        Self { points }
    }

    /// Check if the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Signed area: positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area / 2.0
    }

    /// Absolute enclosed area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Is the winding counter-clockwise?
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Reverse the winding order.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Ensure counter-clockwise winding.
    pub fn ensure_ccw(&mut self) {
        if !self.is_ccw() {
            self.reverse();
        }
    }

    /// Ensure clockwise winding.
    pub fn ensure_cw(&mut self) {
        if self.is_ccw() {
            self.reverse();
        }
    }

    /// Perimeter length.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        let mut length = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            length += (self.points[j] - self.points[i]).norm();
        }
        length
    }

    /// Center of the axis-aligned bounding box.
    pub fn bounding_center(&self) -> Point2 {
        if self.points.is_empty() {
            return Point2::origin();
        }
        let mut min = self.points[0];
        let mut max = self.points[0];
        for p in &self.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Point2::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0)
    }

    /// Largest vertex distance from `center`.
    pub fn max_radius_from(&self, center: &Point2) -> f64 {
        self.points
            .iter()
            .map(|p| (p - center).norm())
            .fold(0.0, f64::max)
    }

    /// Offset every edge outward by `distance` (negative shrinks).
    ///
    /// Vertices move along the corner bisector, scaled so each edge ends
    /// up exactly `distance` away; sharp corners are mitered with a 2x
    /// limit. Returns `None` if the result collapses.
    pub fn offset_outward(&self, distance: f64) -> Option<Self> {
        if self.points.len() < 3 {
            return None;
        }

        let n = self.points.len();
        let sign = if self.is_ccw() { 1.0 } else { -1.0 };
        let mut offset_points = Vec::with_capacity(n);

        for i in 0..n {
            let prev = (i + n - 1) % n;
            let next = (i + 1) % n;

            let p0 = self.points[prev];
            let p1 = self.points[i];
            let p2 = self.points[next];

            let e1 = (p1 - p0).normalize();
            let e2 = (p2 - p1).normalize();

            // Outward edge normals for the winding at hand.
            let n1 = Point2::new(e1.y * sign, -e1.x * sign);
            let n2 = Point2::new(e2.y * sign, -e2.x * sign);

            let bisector = (n1.coords + n2.coords).normalize();

            // Scale along the bisector so the edges, not the corner,
            // land `distance` away.
            let dot = n1.coords.dot(&bisector);
            let offset_dist = if dot.abs() > 0.001 {
                distance / dot
            } else {
                distance
            };

            let max_offset = distance.abs() * 2.0;
            let clamped = offset_dist.clamp(-max_offset, max_offset);

            offset_points.push(Point2::new(
                p1.x + bisector.x * clamped,
                p1.y + bisector.y * clamped,
            ));
        }

        let result = Polygon::new(offset_points);
        if result.signed_area().abs() < 1e-10 {
            return None;
        }
        Some(result)
    }
}

/// A closed planar section curve: either an irregular polygon straight off
/// a slice, or the circle that replaced it.
#[derive(Debug, Clone)]
pub enum SectionCurve {
    /// An arbitrary closed polygon.
    Polygon(Polygon),
    /// A true circle.
    Circle {
        /// Circle center.
        center: Point2,
        /// Circle radius.
        radius: f64,
    },
}

impl SectionCurve {
    /// Enclosed area.
    pub fn area(&self) -> f64 {
        match self {
            SectionCurve::Polygon(p) => p.area(),
            SectionCurve::Circle { radius, .. } => std::f64::consts::PI * radius * radius,
        }
    }

    /// Offset outward by `distance`. Circles offset exactly; polygons use
    /// the mitered bisector construction. Returns `None` on collapse.
    pub fn offset_outward(&self, distance: f64) -> Option<SectionCurve> {
        match self {
            SectionCurve::Polygon(p) => p.offset_outward(distance).map(SectionCurve::Polygon),
            SectionCurve::Circle { center, radius } => {
                let r = radius + distance;
                if r <= 0.0 {
                    None
                } else {
                    Some(SectionCurve::Circle {
                        center: *center,
                        radius: r,
                    })
                }
            }
        }
    }

    /// Realize the curve as a counter-clockwise polygon; circles are
    /// discretized at [`CIRCLE_SEGMENTS`].
    pub fn to_polygon(&self) -> Polygon {
        match self {
            SectionCurve::Polygon(p) => {
                let mut poly = p.clone();
                poly.ensure_ccw();
                poly
            }
            SectionCurve::Circle { center, radius } => {
                Polygon::regular(*center, *radius, CIRCLE_SEGMENTS)
            }
        }
    }

    /// The circle's radius, if this curve is one.
    pub fn circle_radius(&self) -> Option<f64> {
        match self {
            SectionCurve::Circle { radius, .. } => Some(*radius),
            SectionCurve::Polygon(_) => None,
        }
    }
}
