use glam::Vec2;
use tilebox_core::{Line, Solid};

/// Rigid collection of rectangles bound to one external transform,
/// for free-moving entities that are not tile-aligned.
///
/// Global solid `i` is the local solid scaled by `scale` and translated
/// by `position`; no rotation, no cell indexing. Overlap predicates are
/// brute-force over the owned list, which stays cheap because entity
/// hitboxes hold tens of rectangles, not thousands.
#[derive(Debug, Clone)]
pub struct Hitbox {
    pub position: Vec2,
    pub scale: Vec2,
    items: Vec<Solid>,
}

impl Default for Hitbox {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ONE)
    }
}

impl Hitbox {
    pub fn new(position: Vec2, scale: Vec2) -> Self {
        Self {
            position,
            scale,
            items: Vec::new(),
        }
    }

    /// Reassemble a hitbox from decoded parts.
    pub fn from_parts(position: Vec2, scale: Vec2, items: Vec<Solid>) -> Self {
        Self {
            position,
            scale,
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a local-space rectangle.
    pub fn add(&mut self, solid: Solid) {
        self.items.push(solid);
    }

    pub fn add_many(&mut self, solids: &[Solid]) {
        self.items.extend_from_slice(solids);
    }

    /// Rectangle `index` in global space.
    pub fn get(&self, index: usize) -> Option<Solid> {
        self.items.get(index).map(|s| self.to_global(s))
    }

    /// All rectangles in global space, insertion order.
    pub fn iter_global(&self) -> impl Iterator<Item = Solid> + '_ {
        self.items.iter().map(move |s| self.to_global(s))
    }

    /// The stored local-space rectangles (for serialization).
    pub fn locals(&self) -> &[Solid] {
        &self.items
    }

    pub fn overlaps_hitbox(&self, other: &Hitbox) -> bool {
        self.iter_global()
            .any(|mine| other.iter_global().any(|theirs| mine.overlaps(&theirs)))
    }

    pub fn overlaps_solid(&self, solid: &Solid) -> bool {
        self.iter_global().any(|mine| mine.overlaps(solid))
    }

    pub fn overlaps_line(&self, line: &Line) -> bool {
        self.iter_global().any(|mine| line.overlaps_solid(&mine))
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.iter_global().any(|mine| mine.contains_point(point))
    }

    fn to_global(&self, local: &Solid) -> Solid {
        Solid::new(
            local.position * self.scale + self.position,
            local.size * self.scale,
            local.color,
        )
    }
}
