use std::collections::{HashMap, HashSet};

use glam::{IVec2, Vec2};
use tilebox_core::constants::{LINE_WALK_MAX_STEPS, NEIGHBOR_WINDOW_SCALE};
use tilebox_core::{math, Cell, Line, Solid, TileId};

use crate::hitbox::Hitbox;
use crate::pack::{LinePack, SolidPack};

/// Cell-indexed broad-phase over tile-template collision geometry.
///
/// Collision rectangles are registered once per tile id ("templates"),
/// not per cell; the cell index only points at tile ids. Memory stays
/// O(distinct tile types) instead of O(map cells), and a tilemap change
/// is just a re-pointing pass over `cell_to_tile`.
///
/// A cell contributes geometry iff it is indexed, its tile id has a
/// non-empty template, and it is not in the ignored set.
#[derive(Debug, Clone, Default)]
pub struct SolidMap {
    /// Tile id -> local-space template rectangles. Only non-empty
    /// templates are kept.
    templates: HashMap<TileId, Vec<Solid>>,
    /// Cell -> tile id, rebuilt wholesale on every [`SolidMap::update`].
    cell_to_tile: HashMap<Cell, TileId>,
    /// Cells suppressed at query time. Persists across updates.
    ignored_cells: HashSet<Cell>,
    /// Running total of template rectangles across all tile ids.
    solid_count: usize,
}

impl SolidMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reassemble a map from decoded parts. The cell index starts
    /// empty; the owner re-runs [`SolidMap::update`] with the
    /// authoritative tile grid.
    pub fn from_parts(templates: Vec<(TileId, Vec<Solid>)>, ignored_cells: Vec<Cell>) -> Self {
        let mut map = Self::new();
        for (tile_id, solids) in templates {
            map.add_solids(tile_id, &solids);
        }
        map.add_ignored_cells(&ignored_cells);
        map
    }

    // --- templates ---

    /// Register template rectangles for a tile id, appended to any
    /// already registered.
    pub fn add_solids(&mut self, tile_id: TileId, solids: &[Solid]) {
        if solids.is_empty() {
            return;
        }
        self.solid_count += solids.len();
        self.templates
            .entry(tile_id)
            .or_default()
            .extend_from_slice(solids);
    }

    /// Remove, per given rectangle, the first matching occurrence from
    /// the tile's template. An emptied template is dropped entirely.
    pub fn remove_solids(&mut self, tile_id: TileId, solids: &[Solid]) {
        let Some(template) = self.templates.get_mut(&tile_id) else {
            return;
        };
        for solid in solids {
            if let Some(pos) = template.iter().position(|s| s == solid) {
                template.remove(pos);
                self.solid_count -= 1;
            }
        }
        if template.is_empty() {
            self.templates.remove(&tile_id);
        }
    }

    /// Drop a tile id's entire template.
    pub fn clear_solids(&mut self, tile_id: TileId) {
        if let Some(template) = self.templates.remove(&tile_id) {
            self.solid_count -= template.len();
        }
    }

    /// The local-space template for a tile id; empty if unregistered.
    pub fn template(&self, tile_id: TileId) -> &[Solid] {
        self.templates
            .get(&tile_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All registered templates (arbitrary order).
    pub fn templates(&self) -> impl Iterator<Item = (TileId, &[Solid])> {
        self.templates.iter().map(|(id, t)| (*id, t.as_slice()))
    }

    /// Total template rectangles across all tile ids.
    pub fn solid_count(&self) -> usize {
        self.solid_count
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    // --- cell index ---

    /// Rebuild the cell index from the authoritative tile grid.
    /// `columns[x][y]` is the tile id at cell `(x, y)`. Cells whose
    /// tile id has no registered template are omitted. O(width·height);
    /// call once per tilemap change, before any queries that tick.
    pub fn update(&mut self, columns: &[Vec<i32>]) {
        self.cell_to_tile.clear();
        let mut seen = 0usize;
        for (x, column) in columns.iter().enumerate() {
            for (y, &raw_id) in column.iter().enumerate() {
                seen += 1;
                let tile_id = TileId(raw_id);
                if self.templates.contains_key(&tile_id) {
                    self.cell_to_tile
                        .insert(IVec2::new(x as i32, y as i32), tile_id);
                }
            }
        }
        log::debug!(
            "solid map update: indexed {} of {} cells",
            self.cell_to_tile.len(),
            seen
        );
    }

    /// Number of cells currently pointing at a template.
    pub fn indexed_cell_count(&self) -> usize {
        self.cell_to_tile.len()
    }

    // --- ignored cells ---

    pub fn add_ignored_cells(&mut self, cells: &[Cell]) {
        self.ignored_cells.extend(cells.iter().copied());
    }

    pub fn remove_ignored_cells(&mut self, cells: &[Cell]) {
        for cell in cells {
            self.ignored_cells.remove(cell);
        }
    }

    /// Rasterize a rectangular region into ignored cells.
    pub fn add_ignored_region(&mut self, region: &Solid) {
        self.edit_ignored_region(region, true);
    }

    /// Rasterize a rectangular region out of the ignored set.
    pub fn remove_ignored_region(&mut self, region: &Solid) {
        self.edit_ignored_region(region, false);
    }

    pub fn clear_ignored_cells(&mut self) {
        self.ignored_cells.clear();
    }

    pub fn is_ignored(&self, cell: Cell) -> bool {
        self.ignored_cells.contains(&cell)
    }

    /// The suppressed cells (arbitrary order).
    pub fn ignored_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.ignored_cells.iter().copied()
    }

    // Steps by sign(width)/sign(height) from the region's corner cell,
    // hard-capped at |width*height| iterations so malformed input
    // terminates. Exceeding the cap truncates silently.
    fn edit_ignored_region(&mut self, region: &Solid, ignored: bool) {
        let base = math::world_to_cell(region.position);
        let w = region.size.x as i32;
        let h = region.size.y as i32;
        let step_x = w.signum();
        let step_y = h.signum();
        let cap = (w as i64 * h as i64).abs();

        let mut steps: i64 = 0;
        let mut x = 0;
        'outer: while x != w {
            let mut y = 0;
            while y != h {
                if steps >= cap {
                    log::warn!("ignored-cell region truncated after {steps} steps");
                    break 'outer;
                }
                let cell = base + IVec2::new(x, y);
                if ignored {
                    self.ignored_cells.insert(cell);
                } else {
                    self.ignored_cells.remove(&cell);
                }
                steps += 1;
                y += step_y;
            }
            x += step_x;
        }
    }

    // --- queries ---

    /// The cell's template geometry translated into cell-global
    /// coordinates; empty if the cell is unindexed or ignored.
    pub fn solids_at(&self, cell: Cell) -> Vec<Solid> {
        if self.ignored_cells.contains(&cell) {
            return Vec::new();
        }
        let Some(tile_id) = self.cell_to_tile.get(&cell) else {
            return Vec::new();
        };
        let delta = math::cell_to_world(cell);
        self.templates
            .get(tile_id)
            .map(|template| template.iter().map(|s| s.translated(delta)).collect())
            .unwrap_or_default()
    }

    /// Every visible cell's translated geometry (full dump for
    /// serialization or debug draw).
    pub fn all_solids(&self) -> Vec<Solid> {
        let mut out = Vec::new();
        for cell in self.cell_to_tile.keys() {
            out.extend(self.solids_at(*cell));
        }
        out
    }

    /// Translated geometry of all cells in the adaptively sized
    /// neighbor window around `area`.
    ///
    /// The window half-extent is `max(ceil(size * 2), 1)` cells per
    /// axis, scanned as `[-half, +half)` offsets from the area's
    /// floored position. Conservative: over-inclusive for anything up
    /// to 2 cells wide, never under-inclusive.
    pub fn solids_near(&self, area: &Solid) -> Vec<Solid> {
        let half_w = (area.size.x * NEIGHBOR_WINDOW_SCALE).ceil().max(1.0) as i32;
        let half_h = (area.size.y * NEIGHBOR_WINDOW_SCALE).ceil().max(1.0) as i32;
        let base = math::world_to_cell(area.position);

        let mut out = Vec::new();
        for dx in -half_w..half_w {
            for dy in -half_h..half_h {
                out.extend(self.solids_at(base + IVec2::new(dx, dy)));
            }
        }
        out
    }

    /// Intersection points of a line with all grid geometry along its
    /// path.
    ///
    /// Walks the line's cells with integer Bresenham stepping (capped
    /// at [`LINE_WALK_MAX_STEPS`]), gathers each visited cell's
    /// neighbor geometry, deduplicates candidates, then intersects the
    /// line against each — a ray cast that never touches cells far from
    /// the segment.
    pub fn cross_points_with_line(&self, line: &Line) -> Vec<Vec2> {
        let start = math::world_to_cell(line.a);
        let end = math::world_to_cell(line.b);

        let dx = (end.x - start.x).abs();
        let dy = -(end.y - start.y).abs();
        let sx = if start.x < end.x { 1 } else { -1 };
        let sy = if start.y < end.y { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (start.x, start.y);

        let mut candidates: Vec<Solid> = Vec::new();
        for _ in 0..LINE_WALK_MAX_STEPS {
            let probe = Solid::new(Vec2::new(x as f32, y as f32), Vec2::ONE, 0);
            for solid in self.solids_near(&probe) {
                if !candidates.contains(&solid) {
                    candidates.push(solid);
                }
            }

            if x == end.x && y == end.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }

        let mut points = Vec::new();
        for solid in &candidates {
            points.extend(line.cross_points_with_solid(solid));
        }
        points
    }

    pub fn overlaps_solid(&self, area: &Solid) -> bool {
        self.solids_near(area).iter().any(|s| s.overlaps(area))
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        let probe = Solid::new(point, Vec2::ONE, 0);
        self.solids_near(&probe)
            .iter()
            .any(|s| s.contains_point(point))
    }

    pub fn overlaps_line(&self, line: &Line) -> bool {
        !self.cross_points_with_line(line).is_empty() || self.contains_point(line.a)
    }

    pub fn overlaps_hitbox(&self, hitbox: &Hitbox) -> bool {
        hitbox.iter_global().any(|s| self.overlaps_solid(&s))
    }

    pub fn overlaps_solid_pack(&self, pack: &SolidPack) -> bool {
        pack.iter_global().any(|s| self.overlaps_solid(&s))
    }

    pub fn overlaps_line_pack(&self, pack: &LinePack) -> bool {
        pack.iter_global().any(|line| self.overlaps_line(&line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: u32 = 0xFFFF_FFFF;

    /// `width` x `height` grid filled with one tile id.
    fn filled(width: usize, height: usize, id: i32) -> Vec<Vec<i32>> {
        vec![vec![id; height]; width]
    }

    fn single_cell_map() -> SolidMap {
        let mut map = SolidMap::new();
        map.add_solids(TileId(5), &[Solid::from_xywh(0.0, 0.0, 1.0, 1.0, WHITE)]);
        // 8x8 grid of zeros with tile 5 at cell (3, 4).
        let mut columns = filled(8, 8, 0);
        columns[3][4] = 5;
        map.update(&columns);
        map
    }

    #[test]
    fn test_solids_at_translates_template() {
        let map = single_cell_map();
        assert_eq!(
            map.solids_at(IVec2::new(3, 4)),
            vec![Solid::from_xywh(3.0, 4.0, 1.0, 1.0, WHITE)]
        );
        assert!(map.solids_at(IVec2::new(0, 0)).is_empty());
        assert_eq!(map.indexed_cell_count(), 1);
    }

    #[test]
    fn test_ignored_cell_suppresses_and_restores() {
        let mut map = single_cell_map();
        let cell = IVec2::new(3, 4);

        map.add_ignored_cells(&[cell]);
        assert!(map.is_ignored(cell));
        assert!(map.solids_at(cell).is_empty());
        assert!(map.all_solids().is_empty());
        assert!(!map.overlaps_solid(&Solid::from_xywh(3.2, 4.2, 0.5, 0.5, 0)));

        // Removing from the ignored set restores visibility without
        // re-registering anything.
        map.remove_ignored_cells(&[cell]);
        assert_eq!(map.solids_at(cell).len(), 1);
        assert!(map.overlaps_solid(&Solid::from_xywh(3.2, 4.2, 0.5, 0.5, 0)));
    }

    #[test]
    fn test_ignored_cells_persist_across_updates() {
        let mut map = single_cell_map();
        map.add_ignored_cells(&[IVec2::new(3, 4)]);

        let mut columns = filled(8, 8, 0);
        columns[3][4] = 5;
        map.update(&columns);
        assert!(map.solids_at(IVec2::new(3, 4)).is_empty());
    }

    #[test]
    fn test_template_shared_across_cells() {
        let mut map = SolidMap::new();
        map.add_solids(TileId(1), &[Solid::from_xywh(0.0, 0.0, 1.0, 1.0, 0)]);

        // 100 cells all mapped to the same tile id.
        map.update(&filled(10, 10, 1));
        assert_eq!(map.all_solids().len(), 100);
        // Internal storage still holds the single template rectangle.
        assert_eq!(map.template(TileId(1)).len(), 1);
        assert_eq!(map.solid_count(), 1);
    }

    #[test]
    fn test_update_replaces_index_wholesale() {
        let mut map = SolidMap::new();
        map.add_solids(TileId(1), &[Solid::from_xywh(0.0, 0.0, 1.0, 1.0, 0)]);

        map.update(&filled(4, 4, 1));
        assert_eq!(map.indexed_cell_count(), 16);

        // Second update with no matching tiles clears everything.
        map.update(&filled(4, 4, 0));
        assert_eq!(map.indexed_cell_count(), 0);
        assert!(map.all_solids().is_empty());
    }

    #[test]
    fn test_unregistered_tile_ids_are_omitted() {
        let mut map = SolidMap::new();
        map.add_solids(TileId(1), &[Solid::from_xywh(0.0, 0.0, 1.0, 1.0, 0)]);
        map.update(&filled(3, 3, 99));
        assert_eq!(map.indexed_cell_count(), 0);
    }

    #[test]
    fn test_remove_and_clear_solids() {
        let mut map = SolidMap::new();
        let a = Solid::from_xywh(0.0, 0.0, 1.0, 0.5, 0);
        let b = Solid::from_xywh(0.0, 0.5, 1.0, 0.5, 0);
        map.add_solids(TileId(1), &[a, b]);
        map.add_solids(TileId(2), &[a]);
        assert_eq!(map.solid_count(), 3);

        map.remove_solids(TileId(1), &[a]);
        assert_eq!(map.template(TileId(1)), &[b]);
        assert_eq!(map.solid_count(), 2);

        // Emptied templates stop indexing their cells.
        map.remove_solids(TileId(1), &[b]);
        map.update(&filled(2, 2, 1));
        assert_eq!(map.indexed_cell_count(), 0);

        map.clear_solids(TileId(2));
        assert_eq!(map.solid_count(), 0);
        assert_eq!(map.template_count(), 0);
    }

    #[test]
    fn test_ignored_region_rasterizes_cells() {
        let mut map = SolidMap::new();
        map.add_ignored_region(&Solid::from_xywh(1.0, 1.0, 3.0, 2.0, 0));
        for x in 1..4 {
            for y in 1..3 {
                assert!(map.is_ignored(IVec2::new(x, y)), "cell ({x}, {y})");
            }
        }
        assert_eq!(map.ignored_cells().count(), 6);

        map.remove_ignored_region(&Solid::from_xywh(1.0, 1.0, 3.0, 1.0, 0));
        assert_eq!(map.ignored_cells().count(), 3);
        assert!(!map.is_ignored(IVec2::new(1, 1)));
        assert!(map.is_ignored(IVec2::new(1, 2)));
    }

    #[test]
    fn test_ignored_region_negative_size_steps_backward() {
        let mut map = SolidMap::new();
        map.add_ignored_region(&Solid::from_xywh(5.0, 5.0, -2.0, -2.0, 0));
        assert_eq!(map.ignored_cells().count(), 4);
        assert!(map.is_ignored(IVec2::new(5, 5)));
        assert!(map.is_ignored(IVec2::new(4, 4)));
        assert!(!map.is_ignored(IVec2::new(3, 3)));
    }

    #[test]
    fn test_ignored_region_zero_size_is_noop() {
        let mut map = SolidMap::new();
        map.add_ignored_region(&Solid::from_xywh(5.0, 5.0, 0.0, 10.0, 0));
        map.add_ignored_region(&Solid::from_xywh(5.0, 5.0, 10.0, 0.0, 0));
        assert_eq!(map.ignored_cells().count(), 0);
    }

    #[test]
    fn test_neighbor_query_finds_adjacent_geometry() {
        let map = single_cell_map();

        // A unit query one cell away must see the tile's rectangle.
        let near = map.solids_near(&Solid::from_xywh(2.0, 4.0, 1.0, 1.0, 0));
        assert!(near.contains(&Solid::from_xywh(3.0, 4.0, 1.0, 1.0, WHITE)));

        // Queries within the window radius on the other side too.
        let near = map.solids_near(&Solid::from_xywh(4.5, 4.5, 1.0, 1.0, 0));
        assert!(near.contains(&Solid::from_xywh(3.0, 4.0, 1.0, 1.0, WHITE)));
    }

    #[test]
    fn test_overlaps_solid_and_point() {
        let map = single_cell_map();
        assert!(map.overlaps_solid(&Solid::from_xywh(3.5, 4.5, 1.0, 1.0, 0)));
        // Edge contact only: strict test says no.
        assert!(!map.overlaps_solid(&Solid::from_xywh(4.0, 4.0, 1.0, 1.0, 0)));
        assert!(!map.overlaps_solid(&Solid::from_xywh(0.0, 0.0, 1.0, 1.0, 0)));

        assert!(map.contains_point(Vec2::new(3.5, 4.5)));
        assert!(!map.contains_point(Vec2::new(3.0, 4.0))); // boundary
        assert!(!map.contains_point(Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn test_line_cast_across_grid() {
        let mut map = SolidMap::new();
        map.add_solids(TileId(1), &[Solid::from_xywh(0.0, 0.0, 1.0, 1.0, 0)]);
        let mut columns = filled(10, 3, 0);
        columns[4][1] = 1;
        columns[7][1] = 1;
        map.update(&columns);

        // Horizontal ray through both tiles: two boundary hits each.
        let ray = Line::new(Vec2::new(0.0, 1.5), Vec2::new(9.5, 1.5), 0);
        let points = map.cross_points_with_line(&ray);
        assert_eq!(points.len(), 4);
        assert!(map.overlaps_line(&ray));

        // Parallel ray above the tiles misses.
        let miss = Line::new(Vec2::new(0.0, 2.5), Vec2::new(9.5, 2.5), 0);
        assert!(map.cross_points_with_line(&miss).is_empty());
        assert!(!map.overlaps_line(&miss));
    }

    #[test]
    fn test_line_fully_inside_tile_overlaps() {
        let map = single_cell_map();
        let inside = Line::new(Vec2::new(3.2, 4.2), Vec2::new(3.8, 4.8), 0);
        assert!(map.cross_points_with_line(&inside).is_empty());
        assert!(map.overlaps_line(&inside));
    }

    #[test]
    fn test_overlaps_hitbox_and_packs() {
        let map = single_cell_map();

        let mut hitbox = Hitbox::new(Vec2::new(3.0, 4.0), Vec2::ONE);
        hitbox.add(Solid::from_xywh(0.25, 0.25, 0.5, 0.5, 0));
        assert!(map.overlaps_hitbox(&hitbox));
        hitbox.position = Vec2::new(20.0, 20.0);
        assert!(!map.overlaps_hitbox(&hitbox));

        let mut pack = SolidPack::new();
        pack.add(Solid::from_xywh(0.0, 0.0, 0.5, 0.5, 0));
        pack.set_offset(Vec2::new(3.25, 4.25));
        assert!(map.overlaps_solid_pack(&pack));
        pack.set_offset(Vec2::new(20.0, 20.0));
        assert!(!map.overlaps_solid_pack(&pack));

        let mut lines = LinePack::new();
        lines.add(Line::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), 0));
        lines.set_offset(Vec2::new(2.5, 4.5));
        assert!(map.overlaps_line_pack(&lines));
        lines.set_offset(Vec2::new(20.0, 20.0));
        assert!(!map.overlaps_line_pack(&lines));
    }
}
