//! Light-diminishing colormap selection.
//!
//! Vanilla picks one of 32 precomputed colormaps (`COLORMAP` lump) by
//! combining a sector's light level with distance-based scaling
//! (`scalelight[LIGHTLEVELS][MAXLIGHTSCALE]`) so walls fade to black
//! toward the render distance limit. This keeps the same two-input
//! shape without materializing the full precomputed table: the scale
//! factor is computed directly since it's a cheap integer expression and
//! a 16x48-entry `u8` table would cost 768 bytes of flash for a value
//! trivially derived at call time.

pub const NUM_COLORMAPS: i32 = 32;
const LIGHTLEVELS: i32 = 16;
const DISTANCE_SHIFT: i32 = 20;

/// `R_ColourMap` equivalent: `light_level` is the sector's 0-255 light,
/// `distance` is the perpendicular distance to the wall/floor point in
/// map units (16.16 fixed, but only the integer part matters here).
pub fn colormap_index(light_level: u8, distance_map_units: i32) -> i32 {
    let light_bucket = (light_level as i32 * LIGHTLEVELS) >> 8;
    let dist_term = (distance_map_units >> DISTANCE_SHIFT).min(NUM_COLORMAPS - 1);
    let index = (LIGHTLEVELS - 1 - light_bucket) + dist_term - (LIGHTLEVELS / 2);
    index.clamp(0, NUM_COLORMAPS - 1)
}
