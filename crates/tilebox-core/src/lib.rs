//! Geometric primitives and shared math for the tilebox collision engine.

pub mod constants;
pub mod line;
pub mod math;
pub mod solid;
pub mod types;

pub use line::Line;
pub use solid::Solid;
pub use types::{Cell, TileId};
