//! Transformable primitive collections and the tile-grid broad-phase.

pub mod hitbox;
pub mod loader;
pub mod pack;
pub mod solid_map;

pub use hitbox::Hitbox;
pub use loader::{load_all_templates, load_templates_from_str, LoadError, SolidDef, TemplateDef};
pub use pack::{LinePack, Pack, PackItem, PackTransform, SolidPack};
pub use solid_map::SolidMap;
