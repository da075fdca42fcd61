use glam::{IVec2, Vec2};
use tilebox_collision::{Hitbox, LinePack, SolidMap, SolidPack};
use tilebox_core::{Cell, Line, Solid, TileId};

use crate::bytes::{ByteReader, ByteWriter};
use crate::compress::{compress, decompress};
use crate::error::PersistError;

/// Fixed-layout binary serialization with a raw-DEFLATE wrapper.
///
/// Each implementation documents its exact field order; the layouts are
/// explicit, versioned field lists rather than anything derived from
/// declaration order, because they double as a cross-implementation
/// save/clipboard format.
pub trait Codec: Sized {
    /// Encode to the fixed layout, then compress.
    fn to_bytes(&self) -> Result<Vec<u8>, PersistError>;

    /// Decompress, then decode the fixed layout. Buffers not produced
    /// by a compatible writer fail with [`PersistError::UnexpectedEof`]
    /// or [`PersistError::DecompressError`]; there is no partial
    /// recovery.
    fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError>;
}

// Raw (uncompressed) field layouts. Kept as standalone functions so the
// tests below can pin the exact byte sequences.

/// `x(4) y(4) width(4) height(4) color(4)` = 20 bytes.
pub(crate) fn encode_solid(w: &mut ByteWriter, solid: &Solid) {
    w.put_f32(solid.position.x);
    w.put_f32(solid.position.y);
    w.put_f32(solid.size.x);
    w.put_f32(solid.size.y);
    w.put_u32(solid.color);
}

pub(crate) fn decode_solid(r: &mut ByteReader<'_>) -> Result<Solid, PersistError> {
    let position = Vec2::new(r.take_f32()?, r.take_f32()?);
    let size = Vec2::new(r.take_f32()?, r.take_f32()?);
    let color = r.take_u32()?;
    Ok(Solid::new(position, size, color))
}

/// `ax(4) ay(4) bx(4) by(4) color(4)` = 20 bytes.
pub(crate) fn encode_line(w: &mut ByteWriter, line: &Line) {
    w.put_f32(line.a.x);
    w.put_f32(line.a.y);
    w.put_f32(line.b.x);
    w.put_f32(line.b.y);
    w.put_u32(line.color);
}

pub(crate) fn decode_line(r: &mut ByteReader<'_>) -> Result<Line, PersistError> {
    let a = Vec2::new(r.take_f32()?, r.take_f32()?);
    let b = Vec2::new(r.take_f32()?, r.take_f32()?);
    let color = r.take_u32()?;
    Ok(Line::new(a, b, color))
}

/// Shared pack header: `count(4) offsetX(4) offsetY(4) scaleW(4)
/// scaleH(4)`, followed by `count` items in insertion order. The angle
/// is not part of the layout; decoded packs start at angle 0.
fn encode_pack_header(w: &mut ByteWriter, count: usize, offset: Vec2, scale: Vec2) {
    w.put_u32(count as u32);
    w.put_f32(offset.x);
    w.put_f32(offset.y);
    w.put_f32(scale.x);
    w.put_f32(scale.y);
}

fn decode_pack_header(r: &mut ByteReader<'_>) -> Result<(usize, Vec2, Vec2), PersistError> {
    let count = r.take_u32()? as usize;
    let offset = Vec2::new(r.take_f32()?, r.take_f32()?);
    let scale = Vec2::new(r.take_f32()?, r.take_f32()?);
    Ok((count, offset, scale))
}

pub(crate) fn encode_solid_pack(pack: &SolidPack) -> Vec<u8> {
    let mut w = ByteWriter::new();
    encode_pack_header(&mut w, pack.len(), pack.offset(), pack.scale());
    for solid in pack.locals() {
        encode_solid(&mut w, solid);
    }
    w.into_bytes()
}

pub(crate) fn decode_solid_pack(raw: &[u8]) -> Result<SolidPack, PersistError> {
    let mut r = ByteReader::new(raw);
    let (count, offset, scale) = decode_pack_header(&mut r)?;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(decode_solid(&mut r)?);
    }
    Ok(SolidPack::from_parts(offset, scale, items))
}

pub(crate) fn encode_line_pack(pack: &LinePack) -> Vec<u8> {
    let mut w = ByteWriter::new();
    encode_pack_header(&mut w, pack.len(), pack.offset(), pack.scale());
    for line in pack.locals() {
        encode_line(&mut w, line);
    }
    w.into_bytes()
}

pub(crate) fn decode_line_pack(raw: &[u8]) -> Result<LinePack, PersistError> {
    let mut r = ByteReader::new(raw);
    let (count, offset, scale) = decode_pack_header(&mut r)?;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(decode_line(&mut r)?);
    }
    Ok(LinePack::from_parts(offset, scale, items))
}

/// `posX(4) posY(4) scaleW(4) scaleH(4) rectCount(4)` then the local
/// rectangles.
pub(crate) fn encode_hitbox(hitbox: &Hitbox) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.put_f32(hitbox.position.x);
    w.put_f32(hitbox.position.y);
    w.put_f32(hitbox.scale.x);
    w.put_f32(hitbox.scale.y);
    w.put_u32(hitbox.len() as u32);
    for solid in hitbox.locals() {
        encode_solid(&mut w, solid);
    }
    w.into_bytes()
}

pub(crate) fn decode_hitbox(raw: &[u8]) -> Result<Hitbox, PersistError> {
    let mut r = ByteReader::new(raw);
    let position = Vec2::new(r.take_f32()?, r.take_f32()?);
    let scale = Vec2::new(r.take_f32()?, r.take_f32()?);
    let count = r.take_u32()? as usize;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(decode_solid(&mut r)?);
    }
    Ok(Hitbox::from_parts(position, scale, items))
}

/// `ignoredCellCount(4)` + `(cellX:i32, cellY:i32)` pairs, then
/// `templateCount(4)` + per template `tileId(4) rectCount(4)` + rects.
///
/// The cell index is not serialized — the owner re-runs `update` with
/// the authoritative tile grid after loading. Ignored cells and
/// templates are written sorted so hash-map iteration order never
/// leaks into saved bytes.
pub(crate) fn encode_solid_map(map: &SolidMap) -> Vec<u8> {
    let mut w = ByteWriter::new();

    let mut ignored: Vec<Cell> = map.ignored_cells().collect();
    ignored.sort_by_key(|c| (c.x, c.y));
    w.put_u32(ignored.len() as u32);
    for cell in ignored {
        w.put_i32(cell.x);
        w.put_i32(cell.y);
    }

    let mut templates: Vec<(TileId, &[Solid])> = map.templates().collect();
    templates.sort_by_key(|(id, _)| id.0);
    w.put_u32(templates.len() as u32);
    for (tile_id, solids) in templates {
        w.put_i32(tile_id.0);
        w.put_u32(solids.len() as u32);
        for solid in solids {
            encode_solid(&mut w, solid);
        }
    }

    w.into_bytes()
}

pub(crate) fn decode_solid_map(raw: &[u8]) -> Result<SolidMap, PersistError> {
    let mut r = ByteReader::new(raw);

    let ignored_count = r.take_u32()? as usize;
    let mut ignored = Vec::with_capacity(ignored_count);
    for _ in 0..ignored_count {
        ignored.push(IVec2::new(r.take_i32()?, r.take_i32()?));
    }

    let template_count = r.take_u32()? as usize;
    let mut templates = Vec::with_capacity(template_count);
    for _ in 0..template_count {
        let tile_id = TileId(r.take_i32()?);
        let rect_count = r.take_u32()? as usize;
        let mut solids = Vec::with_capacity(rect_count);
        for _ in 0..rect_count {
            solids.push(decode_solid(&mut r)?);
        }
        templates.push((tile_id, solids));
    }

    log::debug!(
        "decoded solid map: {} templates, {} ignored cells",
        templates.len(),
        ignored.len()
    );
    Ok(SolidMap::from_parts(templates, ignored))
}

impl Codec for Solid {
    fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        let mut w = ByteWriter::new();
        encode_solid(&mut w, self);
        compress(&w.into_bytes())
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        let raw = decompress(bytes)?;
        decode_solid(&mut ByteReader::new(&raw))
    }
}

impl Codec for Line {
    fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        let mut w = ByteWriter::new();
        encode_line(&mut w, self);
        compress(&w.into_bytes())
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        let raw = decompress(bytes)?;
        decode_line(&mut ByteReader::new(&raw))
    }
}

impl Codec for SolidPack {
    fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        compress(&encode_solid_pack(self))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        decode_solid_pack(&decompress(bytes)?)
    }
}

impl Codec for LinePack {
    fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        compress(&encode_line_pack(self))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        decode_line_pack(&decompress(bytes)?)
    }
}

impl Codec for Hitbox {
    fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        compress(&encode_hitbox(self))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        decode_hitbox(&decompress(bytes)?)
    }
}

impl Codec for SolidMap {
    fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        compress(&encode_solid_map(self))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        decode_solid_map(&decompress(bytes)?)
    }
}
