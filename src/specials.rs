//! Line and sector specials: doors, floor/ceiling movers, platforms,
//! light effects, scrollers, and switches.
//!
//! Each mover is a plain data variant of [`SpecialThinker`] rather than a
//! trait object; [`think_special`] matches on it and mutates the real
//! level arenas directly, since nothing here needs to own its own copy of
//! the sector/sidedef tables the way an `Rc<RefCell<_>>`-based design
//! would. The sector records which mover owns it (`active_mover`) so
//! `use_special_line`'s door case can refuse to start a second mover on a
//! sector that's already busy, the same way vanilla checks
//! `sector->specialdata`.

use crate::arena::{Arena, Idx};
use crate::fixed::Fixed;
use crate::map::{Level, Linedef, Sector, Sidedef};
use crate::mobj::Mobj;
use crate::rng::Rng;
use crate::thinker::{ThinkerId, ThinkerList};

pub const TICRATE: i32 = 35;

/// `VDOORSPEED` — the speed a use-triggered door moves at.
pub const DOOR_SPEED: Fixed = Fixed::raw(2 << 16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Opening,
    Open { wait_ticks: i32 },
    Closing,
}

#[derive(Debug, Clone, Copy)]
pub struct VerticalDoor {
    pub sector: Idx<Sector>,
    pub state: DoorState,
    pub top_height: Fixed,
    pub speed: Fixed,
}

impl VerticalDoor {
    const WAIT_TICKS: i32 = 150; // 4.something seconds, matches vanilla's VDOORWAIT

    pub fn new(sector: Idx<Sector>, top_height: Fixed, speed: Fixed) -> Self {
        VerticalDoor { sector, state: DoorState::Opening, top_height, speed }
    }
}

fn think_door(door: &mut VerticalDoor, sectors: &mut Arena<Sector>) -> bool {
    let Some(sector) = sectors.get_mut(door.sector) else { return false };
    match door.state {
        DoorState::Opening => {
            sector.mutable.ceiling_height += door.speed;
            if sector.mutable.ceiling_height >= door.top_height {
                sector.mutable.ceiling_height = door.top_height;
                door.state = DoorState::Open { wait_ticks: VerticalDoor::WAIT_TICKS };
            }
            true
        }
        DoorState::Open { ref mut wait_ticks } => {
            *wait_ticks -= 1;
            if *wait_ticks <= 0 {
                door.state = DoorState::Closing;
            }
            true
        }
        DoorState::Closing => {
            sector.mutable.ceiling_height -= door.speed;
            if sector.mutable.ceiling_height <= sector.mutable.floor_height {
                sector.mutable.ceiling_height = sector.mutable.floor_height;
                sector.mutable.active_mover = None;
                return false;
            }
            true
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FloorMover {
    pub sector: Idx<Sector>,
    pub target: Fixed,
    pub speed: Fixed,
    pub crush: bool,
}

fn think_floor(mover: &mut FloorMover, sectors: &mut Arena<Sector>) -> bool {
    let Some(sector) = sectors.get_mut(mover.sector) else { return false };
    let rising = mover.target.0 > sector.mutable.floor_height.0;
    if rising {
        sector.mutable.floor_height += mover.speed;
        if sector.mutable.floor_height >= mover.target {
            sector.mutable.floor_height = mover.target;
            sector.mutable.active_mover = None;
            return false;
        }
    } else {
        sector.mutable.floor_height -= mover.speed;
        if sector.mutable.floor_height <= mover.target {
            sector.mutable.floor_height = mover.target;
            sector.mutable.active_mover = None;
            return false;
        }
    }
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatState {
    Up,
    Down,
    Waiting(i32),
}

#[derive(Debug, Clone, Copy)]
pub struct Platform {
    pub sector: Idx<Sector>,
    pub low: Fixed,
    pub high: Fixed,
    pub speed: Fixed,
    pub wait_ticks: i32,
    pub state: PlatState,
}

fn think_platform(plat: &mut Platform, sectors: &mut Arena<Sector>) -> bool {
    let Some(sector) = sectors.get_mut(plat.sector) else { return false };
    match plat.state {
        PlatState::Up => {
            sector.mutable.floor_height += plat.speed;
            if sector.mutable.floor_height >= plat.high {
                sector.mutable.floor_height = plat.high;
                plat.state = PlatState::Waiting(plat.wait_ticks);
            }
        }
        PlatState::Down => {
            sector.mutable.floor_height -= plat.speed;
            if sector.mutable.floor_height <= plat.low {
                sector.mutable.floor_height = plat.low;
                plat.state = PlatState::Waiting(plat.wait_ticks);
            }
        }
        PlatState::Waiting(ref mut remaining) => {
            *remaining -= 1;
            if *remaining <= 0 {
                plat.state = if sector.mutable.floor_height.0 == plat.low.0 { PlatState::Up } else { PlatState::Down };
            }
        }
    }
    true
}

/// Light-level thinkers: strobe (alternate bright/dim on a fixed period)
/// and glow/flicker (random dim flashes), both driven by the cosmetic RNG
/// since the exact flicker timing never needs to be demo-reproducible.
#[derive(Debug, Clone, Copy)]
pub enum LightKind {
    Strobe { bright_ticks: i32, dark_ticks: i32 },
    Flicker,
}

#[derive(Debug, Clone, Copy)]
pub struct Light {
    pub sector: Idx<Sector>,
    pub kind: LightKind,
    pub max_light: u8,
    pub min_light: u8,
    pub count: i32,
}

fn think_light(light: &mut Light, sectors: &mut Arena<Sector>, rng: &mut Rng) -> bool {
    let Some(sector) = sectors.get_mut(light.sector) else { return false };
    light.count -= 1;
    if light.count > 0 {
        return true;
    }
    match light.kind {
        LightKind::Strobe { bright_ticks, dark_ticks } => {
            if sector.mutable.light_level == light.max_light {
                sector.mutable.light_level = light.min_light;
                light.count = dark_ticks;
            } else {
                sector.mutable.light_level = light.max_light;
                light.count = bright_ticks;
            }
        }
        LightKind::Flicker => {
            sector.mutable.light_level = if sector.mutable.light_level == light.max_light { light.min_light } else { light.max_light };
            light.count = 1 + (rng.play() as i32 & 7);
        }
    }
    true
}

/// Scrollers (`Scroll_Texture`) offset a sidedef's texture each tic. Kept
/// here rather than in `renderer` because it mutates persistent level
/// state, not per-frame scratch.
#[derive(Debug, Clone, Copy)]
pub struct Scroller {
    pub sidedef: Idx<Sidedef>,
    pub dx: Fixed,
    pub dy: Fixed,
}

fn think_scroller(scroller: &mut Scroller, sidedefs: &mut Arena<Sidedef>) -> bool {
    if let Some(side) = sidedefs.get_mut(scroller.sidedef) {
        side.tex_offset_x += scroller.dx;
        side.tex_offset_y += scroller.dy;
    }
    true
}

/// The closed set of sector/sidedef mover behaviors a [`ThinkerList`] can
/// hold. An integer-discriminant match, not a vtable pointer: `Game`
/// feeds the real `&mut Level`/`&mut Rng` into whichever arm applies.
pub enum SpecialThinker {
    Door(VerticalDoor),
    Floor(FloorMover),
    Platform(Platform),
    Light(Light),
    Scroller(Scroller),
}

/// `T_VerticalDoor`/`T_MoveFloor`/`T_PlatRaise`/`T_*Light`/`T_Scroll`'s
/// common dispatch point, run once per thinker per tic from `Game::run_tic`.
pub fn think_special(thinker: &mut SpecialThinker, level: &mut Level, rng: &mut Rng) -> bool {
    match thinker {
        SpecialThinker::Door(door) => think_door(door, &mut level.sectors),
        SpecialThinker::Floor(mover) => think_floor(mover, &mut level.sectors),
        SpecialThinker::Platform(plat) => think_platform(plat, &mut level.sectors),
        SpecialThinker::Light(light) => think_light(light, &mut level.sectors, rng),
        SpecialThinker::Scroller(scroller) => think_scroller(scroller, &mut level.sidedefs),
    }
}

/// `P_UseSpecialLine`/`P_CrossSpecialLine`'s switch half: a line tagged
/// with a switch special flips its texture and, for non-repeatable
/// switches, clears its special so it can't be triggered again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchKind {
    OnceOnly,
    Repeatable,
}

pub fn activate_switch(line: &mut Linedef, kind: SwitchKind) -> bool {
    if kind == SwitchKind::OnceOnly {
        line.special = 0;
    }
    true
}

/// Spawns a door mover for the sector on the back side of `line`,
/// refusing if that sector already has an active mover (mirrors
/// vanilla's `sector->specialdata` busy check).
pub fn try_start_door(
    thinkers: &mut ThinkerList<SpecialThinker>,
    sectors: &mut Arena<Sector>,
    sector_idx: Idx<Sector>,
    top_height: Fixed,
    speed: Fixed,
) -> Option<ThinkerId> {
    {
        let sector = sectors.get_mut(sector_idx)?;
        if sector.mutable.active_mover.is_some() {
            return None;
        }
    }
    let door = VerticalDoor::new(sector_idx, top_height, speed);
    let id = thinkers.add(SpecialThinker::Door(door));
    if let Some(sector) = sectors.get_mut(sector_idx) {
        sector.mutable.active_mover = Some(id.0);
    }
    Some(id)
}

/// The lowest ceiling among sectors sharing a two-sided line with
/// `sector_idx` (`P_FindLowestCeilingSurrounding`), used as a door's
/// target open height.
fn lowest_neighbor_ceiling(level: &Level, sector_idx: Idx<Sector>) -> Fixed {
    let mut lowest = level.sectors[sector_idx].ceiling_height();
    for line in level.linedefs.iter() {
        let Some(back) = line.side_back else { continue };
        let front_sector = level.sidedefs[line.side_front].sector;
        let back_sector = level.sidedefs[back].sector;
        let other = if front_sector == sector_idx {
            Some(back_sector)
        } else if back_sector == sector_idx {
            Some(front_sector)
        } else {
            None
        };
        if let Some(other) = other {
            let h = level.sectors[other].ceiling_height();
            if h.0 < lowest.0 {
                lowest = h;
            }
        }
    }
    lowest
}

/// `EV_Teleport` — relocate `mobj` to the `MT_TELEPORTMAN` thing whose
/// containing sector carries the crossed line's tag, facing the
/// destination's spawn angle.
fn teleport(level: &Level, mobj: &mut Mobj, line: &Linedef) -> bool {
    const TELEPORTMAN: u16 = 14;
    let dest = level.things.iter().find(|thing| {
        thing.doomednum == TELEPORTMAN
            && crate::maputil::sector_at(level, thing.x, thing.y).map(|s| level.sectors[s].konst.tag) == Some(line.tag)
    });
    let Some(dest) = dest else { return false };
    let Some(dest_sector) = crate::maputil::sector_at(level, dest.x, dest.y) else { return false };
    let sector = &level.sectors[dest_sector];
    let floor_z = sector.floor_height();
    let ceiling_z = sector.ceiling_height();
    crate::movement::teleport_move(mobj, dest.x, dest.y, floor_z, floor_z, ceiling_z);
    mobj.angle = dest.angle;
    mobj.sector = dest_sector;
    true
}

/// `P_CrossSpecialLine` — dispatch a walk-triggered special by `line`'s
/// special number. Only teleport (`97`, `W1 Teleport`) is cross-triggered
/// in this port; door/platform/floor specials are use-triggered only.
pub fn cross_special_line(level: &Level, mobj: &mut Mobj, line_idx: Idx<Linedef>) -> bool {
    let Some(line) = level.linedefs.get(line_idx) else { return false };
    match line.special {
        97 => {
            let line = *line;
            teleport(level, mobj, &line)
        }
        _ => false,
    }
}

/// `P_UseSpecialLine` — dispatch a use-triggered special by `line`'s
/// special number. Only the manual door open (`1`, `D1 Open Door Stay
/// Open`) is wired; other use-triggered specials (switches, lifts) are
/// handled through [`activate_switch`] by the caller directly.
pub fn use_special_line(thinkers: &mut ThinkerList<SpecialThinker>, level: &mut Level, line_idx: Idx<Linedef>) -> bool {
    let Some(line) = level.linedefs.get(line_idx).copied() else { return false };
    match line.special {
        1 => {
            let Some(back_side) = line.side_back else { return false };
            let back_sector = level.sidedefs[back_side].sector;
            let top_height = lowest_neighbor_ceiling(level, back_sector);
            try_start_door(thinkers, &mut level.sectors, back_sector, top_height, DOOR_SPEED).is_some()
        }
        _ => false,
    }
}
