//! WAD header/directory parsing and lump lookup.
//!
//! A WAD is a 12-byte header (`IWAD`/`PWAD` magic, lump count, directory
//! offset) followed by the lump bytes and, at `infotableofs`, a flat
//! directory of `(filepos, size, name8)` entries. Lookup is linear by
//! name, last-match-wins (later lumps in a PWAD override earlier ones
//! with the same name, exactly like vanilla's `W_CheckNumForName`).

use alloc::string::String;
use alloc::vec::Vec;
use log::debug;

use crate::error::{CoreError, CoreResult};
use crate::platform::WadSource;

const HEADER_LEN: usize = 12;
const DIRENTRY_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WadKind {
    Iwad,
    Pwad,
}

#[derive(Debug, Clone)]
pub struct LumpInfo {
    pub name: [u8; 8],
    pub file_pos: u32,
    pub size: u32,
}

impl LumpInfo {
    pub fn name_str(&self) -> String {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(8);
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }

    fn matches(&self, name: &str) -> bool {
        let padded = pad_name(name);
        self.name == padded
    }
}

fn pad_name(name: &str) -> [u8; 8] {
    let mut out = [0u8; 8];
    for (i, b) in name.bytes().take(8).enumerate() {
        out[i] = b.to_ascii_uppercase();
    }
    out
}

/// Parsed WAD directory plus a handle to the byte source it was parsed
/// from. Three access tiers mirror the flash-budget reality: a lump may
/// be read zero-copy from flash (`lump_bytes` returns a borrow), or it
/// may require staging into a scratch buffer (`read_lump_into`), or — for
/// lumps already promoted into the purgeable cache — served from RAM.
pub struct Wad<S: WadSource> {
    source: S,
    kind: WadKind,
    directory: Vec<LumpInfo>,
}

impl<S: WadSource> Wad<S> {
    pub fn open(source: S) -> CoreResult<Self> {
        let mut header = [0u8; HEADER_LEN];
        source.read_at(0, &mut header)?;

        let kind = match &header[0..4] {
            b"IWAD" => WadKind::Iwad,
            b"PWAD" => WadKind::Pwad,
            other => {
                return Err(CoreError::BadWad(alloc::format!(
                    "unrecognized magic {:?}",
                    other
                )));
            }
        };

        let num_lumps = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        let dir_offset = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);

        debug!("wad: kind={kind:?} num_lumps={num_lumps} dir_offset={dir_offset}");

        let mut directory = Vec::with_capacity(num_lumps as usize);
        let mut entry = [0u8; DIRENTRY_LEN];
        for i in 0..num_lumps {
            let offset = dir_offset + i * DIRENTRY_LEN as u32;
            source.read_at(offset, &mut entry).map_err(|_| {
                CoreError::BadWad(alloc::format!("truncated directory at entry {i}"))
            })?;
            let file_pos = u32::from_le_bytes([entry[0], entry[1], entry[2], entry[3]]);
            let size = u32::from_le_bytes([entry[4], entry[5], entry[6], entry[7]]);
            let mut name = [0u8; 8];
            name.copy_from_slice(&entry[8..16]);
            directory.push(LumpInfo { name, file_pos, size });
        }

        Ok(Wad { source, kind, directory })
    }

    pub fn kind(&self) -> WadKind {
        self.kind
    }

    pub fn num_lumps(&self) -> usize {
        self.directory.len()
    }

    /// `W_CheckNumForName` — returns `None` instead of the -1 sentinel.
    pub fn check_num_for_name(&self, name: &str) -> Option<usize> {
        self.directory.iter().rposition(|l| l.matches(name))
    }

    /// `W_GetNumForName` — a fatal lookup; callers that know a lump is
    /// mandatory (playpal, colormap, the map marker lumps) use this.
    pub fn get_num_for_name(&self, name: &str) -> CoreResult<usize> {
        self.check_num_for_name(name)
            .ok_or_else(|| CoreError::LumpNotFound(name.into()))
    }

    pub fn lump_info(&self, lump: usize) -> CoreResult<&LumpInfo> {
        self.directory
            .get(lump)
            .ok_or(CoreError::BadReference { what: "lump", index: lump as u32 })
    }

    pub fn lump_length(&self, lump: usize) -> CoreResult<u32> {
        Ok(self.lump_info(lump)?.size)
    }

    /// Zero-copy borrow if the backing `WadSource` can provide one
    /// (flash-resident case); `None` means the caller must
    /// `read_lump_into` a scratch buffer instead.
    pub fn lump_bytes(&self, lump: usize) -> CoreResult<Option<&[u8]>> {
        let info = self.lump_info(lump)?;
        Ok(self.source.borrow_at(info.file_pos, info.size))
    }

    pub fn read_lump_into(&self, lump: usize, out: &mut [u8]) -> CoreResult<()> {
        let info = self.lump_info(lump)?;
        if out.len() as u32 != info.size {
            return Err(CoreError::MalformedLump {
                name: info.name_str(),
                reason: alloc::format!("expected {} bytes, buffer is {}", info.size, out.len()),
            });
        }
        self.source.read_at(info.file_pos, out)
    }

    /// `W_CacheLumpName` — look up by name and stage into a fresh `Vec`.
    /// For flash-resident lumps this still copies; callers on the hot
    /// path that can tolerate a borrow should prefer
    /// `check_num_for_name` + `lump_bytes` instead.
    pub fn cache_lump_name(&self, name: &str) -> CoreResult<Vec<u8>> {
        let lump = self.get_num_for_name(name)?;
        if let Some(borrowed) = self.lump_bytes(lump)? {
            return Ok(borrowed.to_vec());
        }
        let len = self.lump_length(lump)? as usize;
        let mut buf = alloc::vec![0u8; len];
        self.read_lump_into(lump, &mut buf)?;
        Ok(buf)
    }

    pub fn directory(&self) -> &[LumpInfo] {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    struct MemWad(Vec<u8>);
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

    fn build_wad(lumps: &[(&str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        let mut dir = Vec::new();
        let data_start = HEADER_LEN;
        let mut cursor = data_start as u32;
        for (name, bytes) in lumps {
            body.extend_from_slice(bytes);
            dir.push((cursor, bytes.len() as u32, *name));
            cursor += bytes.len() as u32;
        }
        let dir_offset = data_start as u32 + body.len() as u32;
        let mut out = Vec::new();
        out.extend_from_slice(b"PWAD");
        out.extend_from_slice(&(lumps.len() as u32).to_le_bytes());
        out.extend_from_slice(&dir_offset.to_le_bytes());
        out.extend_from_slice(&body);
        for (pos, size, name) in dir {
            out.extend_from_slice(&pos.to_le_bytes());
            out.extend_from_slice(&size.to_le_bytes());
            let padded = pad_name(name);
            out.extend_from_slice(&padded);
        }
        out
    }

    #[test]
    fn parses_header_and_directory() {
        let bytes = build_wad(&[("VERTEXES", &[1, 2, 3, 4]), ("LINEDEFS", &[5, 6])]);
        let wad = Wad::open(MemWad(bytes)).unwrap();
        assert_eq!(wad.kind(), WadKind::Pwad);
        assert_eq!(wad.num_lumps(), 2);
    }

    #[test]
    fn lookup_by_name_is_case_insensitive_to_input() {
        let bytes = build_wad(&[("THINGS", &[9, 9])]);
        let wad = Wad::open(MemWad(bytes)).unwrap();
        assert!(wad.check_num_for_name("things").is_some());
    }

    #[test]
    fn later_duplicate_name_wins() {
        let bytes = build_wad(&[("MAP01", &[1]), ("MAP01", &[2])]);
        let wad = Wad::open(MemWad(bytes)).unwrap();
        let lump = wad.check_num_for_name("MAP01").unwrap();
        assert_eq!(lump, 1);
    }

    #[test]
    fn missing_lump_is_not_found() {
        let bytes = build_wad(&[("A", &[1])]);
        let wad = Wad::open(MemWad(bytes)).unwrap();
        assert!(wad.get_num_for_name("NOPE").is_err());
    }

    #[test]
    fn cache_lump_name_reads_correct_bytes() {
        let bytes = build_wad(&[("A", &[1, 2]), ("B", &[3, 4, 5])]);
        let wad = Wad::open(MemWad(bytes)).unwrap();
        let data = wad.cache_lump_name("B").unwrap();
        assert_eq!(data, vec![3, 4, 5]);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut bytes = build_wad(&[("A", &[1])]);
        bytes[0] = b'X';
        assert!(Wad::open(MemWad(bytes)).is_err());
    }
}
