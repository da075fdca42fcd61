use glam::IVec2;

/// Newtype for tile identifiers coming from the owning tilemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileId(pub i32);

/// Cell coordinate in grid-space (each unit = one tile).
pub type Cell = IVec2;
