use crate::line::Line;
use glam::Vec2;

/// Axis-aligned collision rectangle with a color tag.
///
/// Pure value type: equality is by field value, there is no identity
/// beyond it. Solids never rotate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Solid {
    pub position: Vec2,
    pub size: Vec2,
    pub color: u32,
}

impl Solid {
    pub const fn new(position: Vec2, size: Vec2, color: u32) -> Self {
        Self {
            position,
            size,
            color,
        }
    }

    /// Construct from raw `(x, y, width, height)` components.
    pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32, color: u32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(width, height),
            color,
        }
    }

    /// Decompose into raw `(x, y, width, height)` components.
    pub fn to_xywh(&self) -> (f32, f32, f32, f32) {
        (self.position.x, self.position.y, self.size.x, self.size.y)
    }

    /// Strict AABB overlap test. Rectangles that only touch along an
    /// edge or corner do *not* overlap — tile-boundary tie-breaking
    /// relies on the strict inequalities.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.position.x < other.position.x + other.size.x
            && self.position.x + self.size.x > other.position.x
            && self.position.y < other.position.y + other.size.y
            && self.position.y + self.size.y > other.position.y
    }

    /// Strict interior containment; boundary points are excluded.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x > self.position.x
            && point.x < self.position.x + self.size.x
            && point.y > self.position.y
            && point.y < self.position.y + self.size.y
    }

    /// The rectangle's four boundary segments, each carrying this
    /// solid's color.
    pub fn edges(&self) -> [Line; 4] {
        let tl = self.position;
        let tr = self.position + Vec2::new(self.size.x, 0.0);
        let br = self.position + self.size;
        let bl = self.position + Vec2::new(0.0, self.size.y);
        [
            Line::new(tl, tr, self.color),
            Line::new(tr, br, self.color),
            Line::new(br, bl, self.color),
            Line::new(bl, tl, self.color),
        ]
    }

    /// Copy of this solid shifted by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            position: self.position + delta,
            size: self.size,
            color: self.color,
        }
    }
}
