use serde::{Deserialize, Serialize};
use thiserror::Error;
use tilebox_core::{Solid, TileId};

use crate::solid_map::SolidMap;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse template RON: {0}")]
    TemplateParseError(String),
}

/// One collision rectangle in a template definition, in tile-local
/// coordinates (a full tile spans 0.0..1.0 on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub color: u32,
}

/// Collision template for one tile id, loaded from RON data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDef {
    pub tile_id: i32,
    pub solids: Vec<SolidDef>,
}

/// Parse a single templates RON string.
pub fn load_templates_from_str(ron_str: &str) -> Result<Vec<TemplateDef>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::TemplateParseError(e.to_string()))
}

/// Load and merge multiple template sources into a single list.
pub fn load_all_templates(sources: &[&str]) -> Result<Vec<TemplateDef>, LoadError> {
    let mut all_templates = Vec::new();
    for source in sources {
        all_templates.extend(load_templates_from_str(source)?);
    }
    Ok(all_templates)
}

impl SolidMap {
    /// Register parsed template definitions.
    pub fn add_template_defs(&mut self, defs: &[TemplateDef]) {
        for def in defs {
            let solids: Vec<Solid> = def
                .solids
                .iter()
                .map(|s| Solid::from_xywh(s.x, s.y, s.width, s.height, s.color))
                .collect();
            self.add_solids(TileId(def.tile_id), &solids);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALL_TEMPLATES: &str = r#"[
        (tile_id: 5, solids: [
            (x: 0.0, y: 0.0, width: 1.0, height: 1.0, color: 0xFFFFFFFF),
        ]),
        (tile_id: 6, solids: [
            (x: 0.0, y: 0.5, width: 1.0, height: 0.5),
            (x: 0.0, y: 0.0, width: 0.5, height: 0.5),
        ]),
    ]"#;

    #[test]
    fn test_load_templates_from_str() {
        let defs = load_templates_from_str(WALL_TEMPLATES).expect("valid RON");
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].tile_id, 5);
        assert_eq!(defs[0].solids[0].color, 0xFFFF_FFFF);
        assert_eq!(defs[1].solids.len(), 2);
        // color defaults to 0 when omitted
        assert_eq!(defs[1].solids[0].color, 0);
    }

    #[test]
    fn test_load_invalid_ron_fails() {
        let result = load_templates_from_str("[(tile_id: oops)]");
        assert!(matches!(result, Err(LoadError::TemplateParseError(_))));
    }

    #[test]
    fn test_merge_multiple_sources() {
        let extra = "[(tile_id: 9, solids: [(x: 0.0, y: 0.0, width: 1.0, height: 1.0)])]";
        let defs = load_all_templates(&[WALL_TEMPLATES, extra]).expect("valid RON");
        assert_eq!(defs.len(), 3);
        assert_eq!(defs[2].tile_id, 9);
    }

    #[test]
    fn test_add_template_defs_registers_solids() {
        let defs = load_templates_from_str(WALL_TEMPLATES).expect("valid RON");
        let mut map = SolidMap::new();
        map.add_template_defs(&defs);
        assert_eq!(map.template(TileId(5)).len(), 1);
        assert_eq!(map.template(TileId(6)).len(), 2);
        assert_eq!(map.solid_count(), 3);
    }
}
