//! The actor (mobj) itself: full vs. static tagged representation,
//! spawn/remove, and state-ticking (`P_SetMobjState`/`P_MobjThinker`).

use crate::arena::{Arena, Idx};
use crate::fixed::{Angle, Fixed, Fixed16};
use crate::map::Sector;
use crate::rng::Rng;
use crate::thinker::ThinkerId;

use super::info::{self, Action, MobjFlags, MobjInfo, MobjType, StateId};

/// Spec §3.3's tagged union: a mobj with `MF_STATIC` set carries only
/// enough state to draw and, if `MF_DROPPED` is also set, to know where
/// it landed — no thinker link, no momentum. A full mobj carries
/// everything needed to move, fight, and think.
#[derive(Debug, Clone, Copy)]
pub enum MobjPosition {
    /// Non-static: full position plus momentum.
    Full { momx: Fixed, momy: Fixed, momz: Fixed16 },
    /// Static, not dropped: position is fixed at spawn, no momentum field
    /// is stored at all.
    StaticFixed,
    /// Static and dropped (e.g. a corpse converted after its death
    /// animation): keeps the xy it landed at via a short reference back
    /// into the level's static-item table instead of inline fields.
    StaticDropped { drop_xy: Idx<(Fixed, Fixed)> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobjKind {
    Full,
    Static,
}

#[derive(Debug, Clone)]
pub struct Mobj {
    pub mobj_type: MobjType,
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub angle: Angle,
    pub sector: Idx<Sector>,
    pub floor_z: Fixed,
    pub ceiling_z: Fixed,
    pub radius: Fixed,
    pub height: Fixed,
    pub health: i32,
    pub flags: MobjFlags,
    pub state: StateId,
    pub tics: i16,
    pub target: Option<u32>,
    pub thinker: Option<ThinkerId>,
    pub reaction_time: i32,
    pub threshold: i32,
    pub move_dir: u8,
    pub move_count: i32,
    pub position: MobjPosition,
    /// Set by [`remove_mobj`] once the state chain bottoms out at
    /// `S_NULL` or a pickup is collected. The arena backing `Mobj`
    /// storage is append-only (no generation counter to invalidate a
    /// slot), so removal is a tombstone: flags are cleared and this is
    /// set, rather than the slot being freed and reused. Every system
    /// that walks the mobj arena (collision, sight, AI, rendering) must
    /// skip a tombstoned entry.
    pub removed: bool,
}

impl Mobj {
    pub fn kind(&self) -> MobjKind {
        match self.position {
            MobjPosition::Full { .. } => MobjKind::Full,
            _ => MobjKind::Static,
        }
    }

    pub fn mom(&self) -> (Fixed, Fixed, Fixed) {
        match self.position {
            MobjPosition::Full { momx, momy, momz } => (momx, momy, momz.to_fixed()),
            _ => (Fixed::ZERO, Fixed::ZERO, Fixed::ZERO),
        }
    }

    pub fn set_mom(&mut self, momx: Fixed, momy: Fixed, momz: Fixed) {
        if let MobjPosition::Full { momx: mx, momy: my, momz: mz } = &mut self.position {
            *mx = momx;
            *my = momy;
            *mz = momz.to_fixed16();
        }
    }

    pub fn info(&self) -> &'static MobjInfo {
        info::mobjinfo(self.mobj_type)
    }
}

pub struct MobjSpawnArgs {
    pub mobj_type: MobjType,
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub angle: Angle,
    pub sector: Idx<Sector>,
    pub floor_z: Fixed,
    pub ceiling_z: Fixed,
    pub kind: MobjKind,
}

/// `P_SpawnMobj` — allocate and initialize a new actor in `arena`.
pub fn spawn_mobj(arena: &mut Arena<Mobj>, args: MobjSpawnArgs) -> Idx<Mobj> {
    let info = info::mobjinfo(args.mobj_type);
    let position = match args.kind {
        MobjKind::Full => MobjPosition::Full { momx: Fixed::ZERO, momy: Fixed::ZERO, momz: Fixed16::ZERO },
        MobjKind::Static => MobjPosition::StaticFixed,
    };
    let mobj = Mobj {
        mobj_type: args.mobj_type,
        x: args.x,
        y: args.y,
        z: args.z,
        angle: args.angle,
        sector: args.sector,
        floor_z: args.floor_z,
        ceiling_z: args.ceiling_z,
        radius: info.radius,
        height: info.height,
        health: info.spawn_health,
        flags: info.flags,
        state: info.spawn_state,
        tics: info::state(info.spawn_state).tics,
        target: None,
        thinker: None,
        reaction_time: 0,
        threshold: 0,
        move_dir: 0,
        move_count: 0,
        position,
        removed: false,
    };
    arena.push(mobj)
}

/// `P_RemoveMobj` — clear the flags that make a mobj participate in
/// collision/sight/pickup/AI and mark it tombstoned. See [`Mobj::removed`]
/// for why this isn't a true slot free.
pub fn remove_mobj(mobj: &mut Mobj) {
    mobj.flags = MobjFlags::empty();
    mobj.target = None;
    mobj.removed = true;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetStateResult {
    Continuing,
    /// The state chain reached a state with `tics == -1` and
    /// `next == self` or wrapped to `S_NULL`: the mobj should be removed.
    Removed,
}

/// `P_SetMobjState` — advance through zero-tic states in a loop (matching
/// vanilla's handling of "instant" transition states) until a state with
/// positive or infinite duration is reached, running each state's action
/// pointer as it's entered. Returns `Removed` if the chain bottoms out at
/// `S_NULL`.
pub fn set_mobj_state(mobj: &mut Mobj, mut next: StateId, mut run_action: impl FnMut(&mut Mobj, Action)) -> SetStateResult {
    loop {
        if next.0 == 0 {
            mobj.state = next;
            mobj.tics = -1;
            return SetStateResult::Removed;
        }
        let st = info::state(next);
        mobj.state = next;
        mobj.tics = st.tics;
        run_action(mobj, st.action);
        if st.tics != 0 {
            return SetStateResult::Continuing;
        }
        next = st.next;
    }
}

pub struct Stats {
    pub fixed_divisions: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Stats { fixed_divisions: 0 }
    }
}

pub fn roll_pain_chance(rng: &mut Rng, info: &MobjInfo) -> bool {
    (rng.play() as i32) < info.pain_chance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Sector, SectorConst, SectorMut};

    fn dummy_sector_arena() -> (Arena<Sector>, Idx<Sector>) {
        let mut arena = Arena::new();
        let idx = arena.push(Sector {
            konst: SectorConst { floor_pic: 0, ceiling_pic: 0, tag: 0, special: 0 },
            mutable: SectorMut {
                floor_height: Fixed::ZERO,
                ceiling_height: Fixed::from_int(128),
                light_level: 200,
                active_mover: None,
            },
        });
        (arena, idx)
    }

    #[test]
    fn spawn_full_mobj_initializes_from_info() {
        let (_sectors, sector) = dummy_sector_arena();
        let mut arena: Arena<Mobj> = Arena::new();
        let idx = spawn_mobj(
            &mut arena,
            MobjSpawnArgs {
                mobj_type: MobjType::Imp,
                x: Fixed::ZERO,
                y: Fixed::ZERO,
                z: Fixed::ZERO,
                angle: Angle::ANG0,
                sector,
                floor_z: Fixed::ZERO,
                ceiling_z: Fixed::from_int(128),
                kind: MobjKind::Full,
            },
        );
        let mobj = &arena[idx];
        assert_eq!(mobj.health, 60);
        assert_eq!(mobj.kind(), MobjKind::Full);
    }

    #[test]
    fn static_mobj_has_no_momentum_storage() {
        let (_sectors, sector) = dummy_sector_arena();
        let mut arena: Arena<Mobj> = Arena::new();
        let idx = spawn_mobj(
            &mut arena,
            MobjSpawnArgs {
                mobj_type: MobjType::Blood,
                x: Fixed::ZERO,
                y: Fixed::ZERO,
                z: Fixed::ZERO,
                angle: Angle::ANG0,
                sector,
                floor_z: Fixed::ZERO,
                ceiling_z: Fixed::from_int(128),
                kind: MobjKind::Static,
            },
        );
        let mobj = &arena[idx];
        assert_eq!(mobj.kind(), MobjKind::Static);
        assert_eq!(mobj.mom(), (Fixed::ZERO, Fixed::ZERO, Fixed::ZERO));
    }

    #[test]
    fn set_state_runs_actions_through_zero_tic_chain() {
        let mut mobj = {
            let (_s, sector) = dummy_sector_arena();
            let mut arena: Arena<Mobj> = Arena::new();
            let idx = spawn_mobj(
                &mut arena,
                MobjSpawnArgs {
                    mobj_type: MobjType::Zombieman,
                    x: Fixed::ZERO,
                    y: Fixed::ZERO,
                    z: Fixed::ZERO,
                    angle: Angle::ANG0,
                    sector,
                    floor_z: Fixed::ZERO,
                    ceiling_z: Fixed::from_int(128),
                    kind: MobjKind::Full,
                },
            );
            arena[idx].clone()
        };
        let mut actions_seen = alloc::vec::Vec::new();
        let result = set_mobj_state(&mut mobj, StateId(info::s::POSS_DIE1), |_m, a| actions_seen.push(a));
        assert_eq!(result, SetStateResult::Continuing);
        assert!(actions_seen.contains(&Action::Scream));
    }
}

