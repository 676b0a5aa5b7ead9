//! Map loader: reads the ten lumps that follow a map marker
//! (`THINGS`, `LINEDEFS`, `SIDEDEFS`, `VERTEXES`, `SEGS`, `SSECTORS`,
//! `NODES`, `SECTORS`, `REJECT`, `BLOCKMAP`) and assembles a [`Level`].

use alloc::format;
use alloc::vec::Vec;
use log::debug;

use crate::arena::{Arena, Idx};
use crate::error::{CoreError, CoreResult};
use crate::fixed::{Angle, Fixed};
use crate::platform::WadSource;
use crate::wad::Wad;

use super::data::*;

const MAP_LUMP_ORDER: [&str; 10] = [
    "THINGS", "LINEDEFS", "SIDEDEFS", "VERTEXES", "SEGS", "SSECTORS", "NODES", "SECTORS",
    "REJECT", "BLOCKMAP",
];

fn lump_after<S: WadSource>(wad: &Wad<S>, marker_lump: usize, which: &str) -> CoreResult<usize> {
    let offset = MAP_LUMP_ORDER
        .iter()
        .position(|n| *n == which)
        .expect("which must be one of MAP_LUMP_ORDER");
    let lump = marker_lump + 1 + offset;
    if lump >= wad.num_lumps() {
        return Err(CoreError::LumpNotFound(format!("{which} (after marker {marker_lump})")));
    }
    Ok(lump)
}

fn read_lump<S: WadSource>(wad: &Wad<S>, lump: usize) -> CoreResult<Vec<u8>> {
    if let Some(borrowed) = wad.lump_bytes(lump)? {
        return Ok(borrowed.to_vec());
    }
    let len = wad.lump_length(lump)? as usize;
    let mut buf = alloc::vec![0u8; len];
    wad.read_lump_into(lump, &mut buf)?;
    Ok(buf)
}

fn i16_le(b: &[u8], off: usize) -> i16 {
    i16::from_le_bytes([b[off], b[off + 1]])
}
fn u16_le(b: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([b[off], b[off + 1]])
}

fn fixed_from_map_unit(v: i16) -> Fixed {
    Fixed::from_int(v as i32)
}

pub fn load_level<S: WadSource>(wad: &Wad<S>, map_name: &str) -> CoreResult<Level> {
    let marker = wad.get_num_for_name(map_name)?;
    debug!("loading level {map_name} at lump {marker}");

    let vertices = load_vertices(wad, lump_after(wad, marker, "VERTEXES")?)?;
    let sectors = load_sectors(wad, lump_after(wad, marker, "SECTORS")?)?;
    let sidedefs = load_sidedefs(wad, lump_after(wad, marker, "SIDEDEFS")?, sectors.len())?;
    let linedefs = load_linedefs(
        wad,
        lump_after(wad, marker, "LINEDEFS")?,
        &vertices,
        sidedefs.len(),
    )?;
    let segs = load_segs(
        wad,
        lump_after(wad, marker, "SEGS")?,
        &vertices,
        &linedefs,
        &sidedefs,
    )?;
    let subsectors = load_subsectors(wad, lump_after(wad, marker, "SSECTORS")?, &segs, &sectors)?;
    let nodes = load_nodes(wad, lump_after(wad, marker, "NODES")?)?;
    let reject = load_reject(wad, lump_after(wad, marker, "REJECT")?, sectors.len())?;
    let blockmap = load_blockmap(wad, lump_after(wad, marker, "BLOCKMAP")?)?;
    let things = load_things(wad, lump_after(wad, marker, "THINGS")?)?;

    Ok(Level {
        name: map_name.into(),
        vertices,
        sectors,
        sidedefs,
        linedefs,
        segs,
        subsectors,
        nodes,
        blockmap,
        reject,
        things,
    })
}

fn load_vertices<S: WadSource>(wad: &Wad<S>, lump: usize) -> CoreResult<Arena<Vertex>> {
    let bytes = read_lump(wad, lump)?;
    const REC: usize = 4;
    if bytes.len() % REC != 0 {
        return Err(CoreError::MalformedLump { name: "VERTEXES".into(), reason: "size not a multiple of 4".into() });
    }
    let mut arena = Arena::new();
    for chunk in bytes.chunks_exact(REC) {
        arena.push(Vertex {
            x: fixed_from_map_unit(i16_le(chunk, 0)),
            y: fixed_from_map_unit(i16_le(chunk, 2)),
        });
    }
    Ok(arena)
}

fn load_sectors<S: WadSource>(wad: &Wad<S>, lump: usize) -> CoreResult<Arena<Sector>> {
    let bytes = read_lump(wad, lump)?;
    const REC: usize = 26;
    if bytes.len() % REC != 0 {
        return Err(CoreError::MalformedLump { name: "SECTORS".into(), reason: "size not a multiple of 26".into() });
    }
    let mut arena = Arena::new();
    for chunk in bytes.chunks_exact(REC) {
        let floor_height = fixed_from_map_unit(i16_le(chunk, 0));
        let ceiling_height = fixed_from_map_unit(i16_le(chunk, 2));
        // floor/ceiling texture names at offsets 4 and 12, 8 bytes each;
        // resolved to lump numbers by the caller via a flat-name lookup,
        // here we just keep a placeholder pic index of 0 (texture
        // resolution is a render-time lookup keyed by name, not modeled
        // as part of level geometry parsing itself).
        let light_level = chunk[20] as u8;
        let special = i16_le(chunk, 21);
        let tag = i16_le(chunk, 23);
        arena.push(Sector {
            konst: SectorConst { floor_pic: 0, ceiling_pic: 0, tag, special },
            mutable: SectorMut { floor_height, ceiling_height, light_level, active_mover: None },
        });
    }
    Ok(arena)
}

fn load_sidedefs<S: WadSource>(
    wad: &Wad<S>,
    lump: usize,
    num_sectors: usize,
) -> CoreResult<Arena<Sidedef>> {
    let bytes = read_lump(wad, lump)?;
    const REC: usize = 30;
    if bytes.len() % REC != 0 {
        return Err(CoreError::MalformedLump { name: "SIDEDEFS".into(), reason: "size not a multiple of 30".into() });
    }
    let mut arena = Arena::new();
    for chunk in bytes.chunks_exact(REC) {
        let tex_offset_x = fixed_from_map_unit(i16_le(chunk, 0));
        let tex_offset_y = fixed_from_map_unit(i16_le(chunk, 2));
        let sector_raw = u16_le(chunk, 28);
        if sector_raw as usize >= num_sectors {
            return Err(CoreError::BadReference { what: "sector", index: sector_raw as u32 });
        }
        arena.push(Sidedef {
            tex_offset_x,
            tex_offset_y,
            top_texture: 0,
            bottom_texture: 0,
            mid_texture: 0,
            sector: Idx::new(sector_raw),
        });
    }
    Ok(arena)
}

fn load_linedefs<S: WadSource>(
    wad: &Wad<S>,
    lump: usize,
    vertices: &Arena<Vertex>,
    num_sides: usize,
) -> CoreResult<Arena<Linedef>> {
    let bytes = read_lump(wad, lump)?;
    const REC: usize = 14;
    if bytes.len() % REC != 0 {
        return Err(CoreError::MalformedLump { name: "LINEDEFS".into(), reason: "size not a multiple of 14".into() });
    }
    let mut arena = Arena::new();
    for chunk in bytes.chunks_exact(REC) {
        let v1_raw = u16_le(chunk, 0);
        let v2_raw = u16_le(chunk, 2);
        let flags = LineFlags::from_bits_truncate(u16_le(chunk, 4));
        let special = i16_le(chunk, 6);
        let tag = i16_le(chunk, 8);
        let side_front_raw = u16_le(chunk, 10);
        let side_back_raw = u16_le(chunk, 12);

        if side_front_raw as usize >= num_sides {
            return Err(CoreError::BadReference { what: "sidedef", index: side_front_raw as u32 });
        }
        let v1 = Idx::new(v1_raw);
        let v2 = Idx::new(v2_raw);
        let p1 = *vertices.get(v1).ok_or(CoreError::BadReference { what: "vertex", index: v1_raw as u32 })?;
        let p2 = *vertices.get(v2).ok_or(CoreError::BadReference { what: "vertex", index: v2_raw as u32 })?;
        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;
        let slope_type = if dx.0 == 0 {
            SlopeType::Vertical
        } else if dy.0 == 0 {
            SlopeType::Horizontal
        } else if (dy.0 > 0) == (dx.0 > 0) {
            SlopeType::Positive
        } else {
            SlopeType::Negative
        };
        let bbox = [
            p1.x.min(p2.x),
            p2.x.max(p1.x),
            p1.y.min(p2.y),
            p2.y.max(p1.y),
        ];

        arena.push(Linedef {
            v1,
            v2,
            flags,
            special,
            tag,
            side_front: Idx::new(side_front_raw),
            side_back: if side_back_raw == 0xFFFF { None } else { Some(Idx::new(side_back_raw)) },
            dx,
            dy,
            bbox,
            slope_type,
        });
    }
    Ok(arena)
}

fn load_segs<S: WadSource>(
    wad: &Wad<S>,
    lump: usize,
    vertices: &Arena<Vertex>,
    linedefs: &Arena<Linedef>,
    sidedefs: &Arena<Sidedef>,
) -> CoreResult<Arena<Seg>> {
    let bytes = read_lump(wad, lump)?;
    const REC: usize = 12;
    if bytes.len() % REC != 0 {
        return Err(CoreError::MalformedLump { name: "SEGS".into(), reason: "size not a multiple of 12".into() });
    }
    let mut arena = Arena::new();
    for chunk in bytes.chunks_exact(REC) {
        let v1 = Idx::new(u16_le(chunk, 0));
        let v2 = Idx::new(u16_le(chunk, 2));
        let angle = Angle((u16_le(chunk, 4) as u32) << 16);
        let linedef_raw = u16_le(chunk, 6);
        let side = i16_le(chunk, 8);
        let offset = fixed_from_map_unit(i16_le(chunk, 10));

        let linedef_idx: Idx<Linedef> = Idx::new(linedef_raw);
        let line = linedefs
            .get(linedef_idx)
            .ok_or(CoreError::BadReference { what: "linedef", index: linedef_raw as u32 })?;

        let front_side_idx = if side == 0 { line.side_front } else { line.side_back.unwrap_or(line.side_front) };
        let front_side = sidedefs
            .get(front_side_idx)
            .ok_or(CoreError::BadReference { what: "sidedef", index: front_side_idx.index as u32 })?;
        let back_side_idx = if side == 0 { line.side_back } else { Some(line.side_front) };
        let back_sector = back_side_idx.and_then(|idx| sidedefs.get(idx)).map(|s| s.sector);

        let _ = vertices;
        arena.push(Seg {
            v1,
            v2,
            angle,
            side: front_side_idx,
            linedef: linedef_idx,
            front_sector: front_side.sector,
            back_sector,
            offset,
        });
    }
    Ok(arena)
}

fn load_subsectors<S: WadSource>(
    wad: &Wad<S>,
    lump: usize,
    segs: &Arena<Seg>,
    sectors: &Arena<Sector>,
) -> CoreResult<Arena<Subsector>> {
    let bytes = read_lump(wad, lump)?;
    const REC: usize = 4;
    if bytes.len() % REC != 0 {
        return Err(CoreError::MalformedLump { name: "SSECTORS".into(), reason: "size not a multiple of 4".into() });
    }
    let mut arena = Arena::new();
    for chunk in bytes.chunks_exact(REC) {
        let num_segs = u16_le(chunk, 0);
        let first_seg = u16_le(chunk, 2);
        let seg0 = segs
            .get(Idx::new(first_seg))
            .ok_or(CoreError::BadReference { what: "seg", index: first_seg as u32 })?;
        let _ = sectors;
        arena.push(Subsector { sector: seg0.front_sector, first_seg, num_segs });
    }
    Ok(arena)
}

fn load_nodes<S: WadSource>(wad: &Wad<S>, lump: usize) -> CoreResult<Arena<BspNode>> {
    let bytes = read_lump(wad, lump)?;
    const REC: usize = 28;
    if bytes.len() % REC != 0 {
        return Err(CoreError::MalformedLump { name: "NODES".into(), reason: "size not a multiple of 28".into() });
    }
    let mut arena = Arena::new();
    for chunk in bytes.chunks_exact(REC) {
        let x = fixed_from_map_unit(i16_le(chunk, 0));
        let y = fixed_from_map_unit(i16_le(chunk, 2));
        let dx = fixed_from_map_unit(i16_le(chunk, 4));
        let dy = fixed_from_map_unit(i16_le(chunk, 6));
        let mut bbox = [[Fixed::ZERO; 4]; 2];
        for side in 0..2 {
            let base = 8 + side * 8;
            bbox[side] = [
                fixed_from_map_unit(i16_le(chunk, base)),
                fixed_from_map_unit(i16_le(chunk, base + 2)),
                fixed_from_map_unit(i16_le(chunk, base + 4)),
                fixed_from_map_unit(i16_le(chunk, base + 6)),
            ];
        }
        let child_raw = [u16_le(chunk, 24), u16_le(chunk, 26)];
        let children = [
            NodeChild { is_subsector: child_raw[0] & 0x8000 != 0, index: child_raw[0] & 0x7FFF },
            NodeChild { is_subsector: child_raw[1] & 0x8000 != 0, index: child_raw[1] & 0x7FFF },
        ];
        arena.push(BspNode { x, y, dx, dy, bbox, children });
    }
    Ok(arena)
}

fn load_reject<S: WadSource>(wad: &Wad<S>, lump: usize, num_sectors: usize) -> CoreResult<Reject> {
    let bytes = read_lump(wad, lump).unwrap_or_default();
    let needed = (num_sectors * num_sectors + 7) / 8;
    let mut bits = bytes;
    bits.resize(needed.max(bits.len()), 0);
    Ok(Reject::new(bits, num_sectors))
}

fn load_blockmap<S: WadSource>(wad: &Wad<S>, lump: usize) -> CoreResult<Blockmap> {
    let bytes = read_lump(wad, lump)?;
    if bytes.len() < 8 {
        return Err(CoreError::MalformedLump { name: "BLOCKMAP".into(), reason: "truncated header".into() });
    }
    let origin_x = fixed_from_map_unit(i16_le(&bytes, 0));
    let origin_y = fixed_from_map_unit(i16_le(&bytes, 2));
    let columns = u16_le(&bytes, 4);
    let rows = u16_le(&bytes, 6);
    let num_blocks = columns as usize * rows as usize;

    let mut block_offsets = Vec::with_capacity(num_blocks);
    for i in 0..num_blocks {
        let off = 8 + i * 2;
        block_offsets.push(u16_le(&bytes, off));
    }
    let blocklist_start = 8 + num_blocks * 2;
    let mut blocklist = Vec::new();
    let mut i = blocklist_start;
    while i + 1 < bytes.len() {
        blocklist.push(u16_le(&bytes, i));
        i += 2;
    }

    Ok(Blockmap { origin_x, origin_y, columns, rows, block_offsets, blocklist })
}

fn load_things<S: WadSource>(wad: &Wad<S>, lump: usize) -> CoreResult<Vec<MapThing>> {
    let bytes = read_lump(wad, lump)?;
    const REC: usize = 10;
    if bytes.len() % REC != 0 {
        return Err(CoreError::MalformedLump { name: "THINGS".into(), reason: "size not a multiple of 10".into() });
    }
    let mut things = Vec::new();
    for chunk in bytes.chunks_exact(REC) {
        let x = fixed_from_map_unit(i16_le(chunk, 0));
        let y = fixed_from_map_unit(i16_le(chunk, 2));
        let angle_deg = i16_le(chunk, 4) as i64;
        let angle = Angle(((angle_deg.rem_euclid(360) as u32) * (u32::MAX / 360 + 1)) as u32);
        let doomednum = u16_le(chunk, 6);
        let flags = u16_le(chunk, 8);
        things.push(MapThing { x, y, angle, doomednum, flags });
    }
    Ok(things)
}
