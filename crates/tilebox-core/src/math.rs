use crate::types::Cell;
use glam::{IVec2, Vec2};

/// Convert a world-space point to its containing grid cell.
/// Floors toward negative infinity so negative coordinates snap
/// consistently.
pub fn world_to_cell(world: Vec2) -> Cell {
    IVec2::new(world.x.floor() as i32, world.y.floor() as i32)
}

/// Convert a grid cell back to the world-space position of its corner.
pub fn cell_to_world(cell: Cell) -> Vec2 {
    cell.as_vec2()
}
