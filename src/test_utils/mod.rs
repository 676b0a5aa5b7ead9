//! Shared test builders for a minimal WAD and a minimal level.
//!
//! These de-duplicate the synthetic fixtures that would otherwise be
//! rebuilt, slightly differently, in every module's own test block: a
//! tiny in-memory [`WadSource`], raw WAD bytes assembled from `(name,
//! bytes)` lumps, and a one-sector [`Level`] big enough to exercise
//! movement/sight/AI/renderer code without a real IWAD on disk.

#![allow(dead_code)]

use alloc::string::ToString;
use alloc::vec::Vec;

use crate::arena::{Arena, Idx};
use crate::error::{CoreError, CoreResult};
use crate::fixed::{Angle, Fixed};
use crate::map::{Blockmap, Level, Reject, Sector, SectorConst, SectorMut};
use crate::mobj::{spawn_mobj, Mobj, MobjKind, MobjSpawnArgs, MobjType};
use crate::platform::WadSource;

const HEADER_LEN: usize = 12;

/// Installs `env_logger` as the test run's logging backend, ignoring the
/// "already initialized" error from a second call in the same process.
/// Call at the top of a test that wants `log` output on failure; most
/// tests don't bother.
#[cfg(feature = "std")]
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// An in-memory [`WadSource`] backed by a `Vec<u8>`, for tests that need
/// a real `Wad::open` round trip instead of exercising the map loader
/// directly on hand-built [`Level`] values.
pub struct MemWad(pub Vec<u8>);

impl WadSource for MemWad {
    fn len(&self) -> u32 {
        self.0.len() as u32
    }

    fn read_at(&self, offset: u32, out: &mut [u8]) -> CoreResult<()> {
        let start = offset as usize;
        let end = start + out.len();
        if end > self.0.len() {
            return Err(CoreError::Local("short read".into()));
        }
        out.copy_from_slice(&self.0[start..end]);
        Ok(())
    }

    fn borrow_at(&self, offset: u32, len: u32) -> Option<&[u8]> {
        self.0.get(offset as usize..(offset + len) as usize)
    }
}

fn pad_name(name: &str) -> [u8; 8] {
    let mut out = [0u8; 8];
    for (i, b) in name.bytes().take(8).enumerate() {
        out[i] = b.to_ascii_uppercase();
    }
    out
}

/// Assembles a `PWAD` byte image from `(name, bytes)` lumps, in the
/// order given, with no shared data between lumps.
pub fn build_wad(lumps: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    let mut dir = Vec::new();
    let mut cursor = HEADER_LEN as u32;
    for (name, bytes) in lumps {
        body.extend_from_slice(bytes);
        dir.push((cursor, bytes.len() as u32, *name));
        cursor += bytes.len() as u32;
    }
    let dir_offset = HEADER_LEN as u32 + body.len() as u32;

    let mut out = Vec::new();
    out.extend_from_slice(b"PWAD");
    out.extend_from_slice(&(lumps.len() as u32).to_le_bytes());
    out.extend_from_slice(&dir_offset.to_le_bytes());
    out.extend_from_slice(&body);
    for (pos, size, name) in dir {
        out.extend_from_slice(&pos.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&pad_name(name));
    }
    out
}

/// One sector, no geometry: enough for AI/movement/game-loop tests that
/// only need a valid `Level` to hang a mobj off of, not a walkable map.
pub fn minimal_level(name: &str) -> Level {
    let mut sectors: Arena<Sector> = Arena::new();
    sectors.push(Sector {
        konst: SectorConst { floor_pic: 0, ceiling_pic: 0, tag: 0, special: 0 },
        mutable: SectorMut {
            floor_height: Fixed::ZERO,
            ceiling_height: Fixed::from_int(256),
            light_level: 200,
            active_mover: None,
        },
    });
    Level {
        name: name.to_string(),
        vertices: Arena::new(),
        sectors,
        sidedefs: Arena::new(),
        linedefs: Arena::new(),
        segs: Arena::new(),
        subsectors: Arena::new(),
        nodes: Arena::new(),
        blockmap: Blockmap {
            origin_x: Fixed::ZERO,
            origin_y: Fixed::ZERO,
            columns: 1,
            rows: 1,
            block_offsets: alloc::vec![0],
            blocklist: alloc::vec![0xFFFF],
        },
        reject: Reject::new(alloc::vec![0], 1),
        things: Vec::new(),
    }
}

/// A standalone full mobj sitting in sector 0 of a [`minimal_level`],
/// for tests that need some `Mobj` to hand to movement/AI/specials code
/// without building a whole arena and spawn call themselves.
pub fn minimal_mobj() -> Mobj {
    let mut arena: Arena<Mobj> = Arena::new();
    let idx = spawn_mobj(
        &mut arena,
        MobjSpawnArgs {
            mobj_type: MobjType::Imp,
            x: Fixed::ZERO,
            y: Fixed::ZERO,
            z: Fixed::ZERO,
            angle: Angle::ANG0,
            sector: Idx::new(0),
            floor_z: Fixed::ZERO,
            ceiling_z: Fixed::from_int(256),
            kind: MobjKind::Full,
        },
    );
    arena[idx].clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wad::Wad;

    #[test]
    fn build_wad_round_trips_through_wad_open() {
        let bytes = build_wad(&[("THINGS", &[1, 2, 3]), ("LINEDEFS", &[4, 5])]);
        let wad = Wad::open(MemWad(bytes)).unwrap();
        assert_eq!(wad.num_lumps(), 2);
        assert!(wad.check_num_for_name("things").is_some());
    }

    #[test]
    fn minimal_level_has_one_sector_and_no_geometry() {
        let level = minimal_level("TESTMAP");
        assert_eq!(level.sectors.len(), 1);
        assert_eq!(level.name, "TESTMAP");
        assert!(level.linedefs.is_empty());
    }
}
