use crate::constants::SEGMENT_TOLERANCE;
use crate::solid::Solid;
use glam::Vec2;

/// 2D segment with a color tag.
///
/// Intersection queries follow a result-or-sentinel contract: "no
/// intersection" is reported as a `Vec2::NAN` point, never an error.
/// Callers must check `is_nan()` before using a returned point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line {
    pub a: Vec2,
    pub b: Vec2,
    pub color: u32,
}

impl Line {
    pub const fn new(a: Vec2, b: Vec2, color: u32) -> Self {
        Self { a, b, color }
    }

    pub fn length(&self) -> f32 {
        self.a.distance(self.b)
    }

    /// Unit direction from `a` to `b`, or zero for a degenerate segment.
    pub fn direction(&self) -> Vec2 {
        (self.b - self.a).normalize_or_zero()
    }

    /// Angle of the segment in radians, measured from the +x axis.
    pub fn angle(&self) -> f32 {
        (self.b - self.a).to_angle()
    }

    /// Whether `point` lies on the segment, within the distance-sum
    /// tolerance: `|P-A| + |P-B| <= |A-B| + SEGMENT_TOLERANCE`.
    /// A NaN point is never contained.
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.a.distance(point) + self.b.distance(point) <= self.length() + SEGMENT_TOLERANCE
    }

    /// Intersection point of two segments, or `Vec2::NAN` when the
    /// lines are parallel/collinear or the solved point falls outside
    /// either segment.
    ///
    /// Solves the 2×2 system from each line's implicit form
    /// `a·x + b·y = c`, then verifies the point against both segments
    /// with the distance-sum test.
    pub fn cross_point(&self, other: &Self) -> Vec2 {
        let d = self.b - self.a;
        let e = other.b - other.a;

        let a1 = d.y;
        let b1 = -d.x;
        let c1 = a1 * self.a.x + b1 * self.a.y;
        let a2 = e.y;
        let b2 = -e.x;
        let c2 = a2 * other.a.x + b2 * other.a.y;

        let det = a1 * b2 - a2 * b1;
        if det == 0.0 {
            return Vec2::NAN;
        }

        let point = Vec2::new((b2 * c1 - b1 * c2) / det, (a1 * c2 - a2 * c1) / det);
        if self.contains_point(point) && other.contains_point(point) {
            point
        } else {
            Vec2::NAN
        }
    }

    /// Whether the two segments intersect (verified, non-NaN point).
    pub fn crosses(&self, other: &Self) -> bool {
        !self.cross_point(other).is_nan()
    }

    /// Closest point on the segment to `point`: clamped projection onto
    /// the infinite line. Degenerate (zero-length) segments yield NaN.
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let ab = self.b - self.a;
        let t = (point - self.a).dot(ab) / ab.length_squared();
        self.a + ab * t.clamp(0.0, 1.0)
    }

    /// Intersection points with the rectangle's four boundary segments
    /// (0 to 4 points).
    pub fn cross_points_with_solid(&self, solid: &Solid) -> Vec<Vec2> {
        let mut points = Vec::new();
        for edge in solid.edges() {
            let p = self.cross_point(&edge);
            if !p.is_nan() {
                points.push(p);
            }
        }
        points
    }

    /// Whether the segment crosses the rectangle's boundary.
    pub fn crosses_solid(&self, solid: &Solid) -> bool {
        solid
            .edges()
            .iter()
            .any(|edge| !self.cross_point(edge).is_nan())
    }

    /// Whether the segment touches the rectangle at all: boundary
    /// crossing or lying fully inside.
    pub fn overlaps_solid(&self, solid: &Solid) -> bool {
        self.crosses_solid(solid) || solid.contains_point(self.a)
    }
}
