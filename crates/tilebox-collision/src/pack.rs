use glam::{Affine2, Vec2};
use tilebox_core::{Line, Solid};

/// Affine state applied lazily to every read from a [`Pack`].
///
/// `angle` only participates for line items; solids translate and scale
/// but never rotate. The asymmetry is deliberate: rectangular solids
/// model static level geometry, polylines model free-rotating shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackTransform {
    pub offset: Vec2,
    pub scale: Vec2,
    pub angle: f32,
}

impl Default for PackTransform {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: Vec2::ONE,
            angle: 0.0,
        }
    }
}

/// Local-to-global hook for primitives owned by a [`Pack`].
pub trait PackItem: Copy + PartialEq {
    fn to_global(&self, transform: &PackTransform) -> Self;
}

impl PackItem for Solid {
    fn to_global(&self, t: &PackTransform) -> Self {
        Solid::new(
            self.position * t.scale + t.offset,
            self.size * t.scale,
            self.color,
        )
    }
}

impl PackItem for Line {
    // Scale, then rotate by `angle` around the pack offset, then
    // translate. `from_scale_angle_translation` composes exactly that.
    fn to_global(&self, t: &PackTransform) -> Self {
        let affine = Affine2::from_scale_angle_translation(t.scale, t.angle, t.offset);
        Line::new(
            affine.transform_point2(self.a),
            affine.transform_point2(self.b),
            self.color,
        )
    }
}

/// Owner of an ordered list of local-space primitives plus one
/// transform.
///
/// The pack exclusively owns its items; callers read transformed
/// copies, never references into the storage. Index `i` always maps to
/// `items[i].to_global(transform)`, so mutating the transform changes
/// every future read without touching the stored data.
#[derive(Debug, Clone)]
pub struct Pack<T: PackItem> {
    transform: PackTransform,
    items: Vec<T>,
}

/// Pack of axis-aligned solids: translate + scale only.
pub type SolidPack = Pack<Solid>;

/// Pack of line segments: translate + scale + rotate.
pub type LinePack = Pack<Line>;

impl<T: PackItem> Default for Pack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PackItem> Pack<T> {
    pub fn new() -> Self {
        Self {
            transform: PackTransform::default(),
            items: Vec::new(),
        }
    }

    /// Reassemble a pack from decoded parts. The angle starts at 0; the
    /// wire format does not carry it.
    pub fn from_parts(offset: Vec2, scale: Vec2, items: Vec<T>) -> Self {
        Self {
            transform: PackTransform {
                offset,
                scale,
                angle: 0.0,
            },
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item `index` with the current transform applied.
    pub fn get(&self, index: usize) -> Option<T> {
        self.items
            .get(index)
            .map(|item| item.to_global(&self.transform))
    }

    /// All items in insertion order, with the current transform applied.
    pub fn iter_global(&self) -> impl Iterator<Item = T> + '_ {
        self.items
            .iter()
            .map(move |item| item.to_global(&self.transform))
    }

    /// Append a local-space item.
    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn add_many(&mut self, items: &[T]) {
        self.items.extend_from_slice(items);
    }

    /// Remove the first item equal to `item` (compared in local space).
    /// Returns whether anything was removed.
    pub fn remove(&mut self, item: &T) -> bool {
        if let Some(pos) = self.items.iter().position(|i| i == item) {
            self.items.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn offset(&self) -> Vec2 {
        self.transform.offset
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.transform.offset = offset;
    }

    pub fn scale(&self) -> Vec2 {
        self.transform.scale
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.transform.scale = scale;
    }

    /// The stored local-space items, untransformed (for serialization).
    pub fn locals(&self) -> &[T] {
        &self.items
    }
}

impl Pack<Line> {
    /// Global rotation of the whole pack around its offset, in radians.
    pub fn angle(&self) -> f32 {
        self.transform.angle
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.transform.angle = angle;
    }
}
