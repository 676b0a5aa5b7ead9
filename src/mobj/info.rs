//! `mobjinfo[]` and the state table.
//!
//! The full vanilla IWAD carries on the order of 140 mobj types and
//! roughly a thousand states; reproducing the literal table here would
//! just be a transcription exercise, not a demonstration of the engine
//! architecture. This table carries the player plus a representative
//! slice of the monster/projectile/decoration roster (enough to drive
//! every `ai`/`sight`/`movement` code path this crate implements —
//! hitscan, melee, missile, pain-chance, death/xdeath, explosive
//! barrels) and is structured so adding the remaining types is purely
//! additive: push another `MobjInfo`/`State` row, no code changes.

use crate::fixed::Fixed;
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MobjFlags: u32 {
        const SPECIAL     = 1 << 0;
        const SOLID       = 1 << 1;
        const SHOOTABLE   = 1 << 2;
        const NOSECTOR    = 1 << 3;
        const NOBLOCKMAP  = 1 << 4;
        const AMBUSH      = 1 << 5;
        const JUSTHIT     = 1 << 6;
        const JUSTATTACKED= 1 << 7;
        const SPAWNCEILING= 1 << 8;
        const NOGRAVITY   = 1 << 9;
        const DROPOFF     = 1 << 10;
        const PICKUP      = 1 << 11;
        const NOCLIP      = 1 << 12;
        const FLOAT       = 1 << 13;
        const TELEPORT    = 1 << 14;
        const MISSILE     = 1 << 15;
        const DROPPED     = 1 << 16;
        const SHADOW      = 1 << 17;
        const NOBLOOD     = 1 << 18;
        const CORPSE      = 1 << 19;
        const INFLOAT     = 1 << 20;
        const COUNTKILL   = 1 << 21;
        const COUNTITEM   = 1 << 22;
        const SKULLFLY    = 1 << 23;
        const NOTDMATCH   = 1 << 24;
        /// Placed in the static (RAM-light) mobj representation per the
        /// tagged-union data model: no think/velocity, decorative only.
        const STATIC      = 1 << 30;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MobjType {
    Player,
    Zombieman,
    ShotgunGuy,
    Imp,
    Demon,
    BarrelExploding,
    DoomImpBall,
    Blood,
    Puff,
    ItemClip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Look,
    Chase,
    FaceTarget,
    PosAttack,
    SposAttack,
    TroopAttack,
    SargAttack,
    Scream,
    Fall,
    Explode,
    Pain,
    FireBall,
    ExplodeMissile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(pub u16);

pub const STATE_NULL: StateId = StateId(0);

#[derive(Debug, Clone, Copy)]
pub struct State {
    pub sprite: u16,
    /// Low 6 bits select the frame within the sprite; bit 0x80 is
    /// `FULLBRIGHT` (render at max light regardless of sector light).
    pub frame: u8,
    pub tics: i16,
    pub action: Action,
    pub next: StateId,
}

pub const FULLBRIGHT: u8 = 0x80;

#[derive(Debug, Clone, Copy)]
pub struct MobjInfo {
    pub doomednum: i32,
    pub spawn_state: StateId,
    pub spawn_health: i32,
    pub see_state: StateId,
    pub see_sound: u16,
    pub pain_chance: i32,
    pub pain_state: StateId,
    pub pain_sound: u16,
    pub melee_state: StateId,
    pub missile_state: StateId,
    pub death_state: StateId,
    pub xdeath_state: StateId,
    pub death_sound: u16,
    pub speed: Fixed,
    pub radius: Fixed,
    pub height: Fixed,
    pub mass: i32,
    pub damage: i32,
    pub active_sound: u16,
    pub flags: MobjFlags,
    pub raise_state: StateId,
}

macro_rules! st {
    ($sprite:expr, $frame:expr, $tics:expr, $action:expr, $next:expr) => {
        State { sprite: $sprite, frame: $frame, tics: $tics, action: $action, next: StateId($next) }
    };
}

// State table indices used by `STATES` below; grouped per mobj type so
// the numbering stays legible even though it's one flat array at runtime
// (matching vanilla's single flat `states[]`).
pub mod s {
    pub const PLAY: u16 = 1;
    pub const POSS_STND: u16 = 2;
    pub const POSS_RUN1: u16 = 3;
    pub const POSS_ATK1: u16 = 4;
    pub const POSS_PAIN: u16 = 5;
    pub const POSS_DIE1: u16 = 6;
    pub const POSS_DIE2: u16 = 7;
    pub const POSS_XDIE1: u16 = 8;
    pub const POSS_RAISE1: u16 = 9;
    pub const SPOS_STND: u16 = 10;
    pub const SPOS_RUN1: u16 = 11;
    pub const SPOS_ATK1: u16 = 12;
    pub const SPOS_PAIN: u16 = 13;
    pub const SPOS_DIE1: u16 = 14;
    pub const TROO_STND: u16 = 15;
    pub const TROO_RUN1: u16 = 16;
    pub const TROO_ATK1: u16 = 17;
    pub const TROO_PAIN: u16 = 18;
    pub const TROO_DIE1: u16 = 19;
    pub const SARG_STND: u16 = 20;
    pub const SARG_RUN1: u16 = 21;
    pub const SARG_ATK1: u16 = 22;
    pub const SARG_PAIN: u16 = 23;
    pub const SARG_DIE1: u16 = 24;
    pub const BAR1: u16 = 25;
    pub const BEXP: u16 = 26;
    pub const BAL1: u16 = 27;
    pub const BAL1EXP: u16 = 28;
    pub const BLOOD1: u16 = 29;
    pub const PUFF1: u16 = 30;
    pub const CLIP: u16 = 31;
}

pub const NUM_STATES: usize = 32;

pub static STATES: [State; NUM_STATES] = [
    st!(0, 0, -1, Action::None, 0), // 0: S_NULL
    st!(1, 0, -1, Action::None, s::PLAY), // 1: S_PLAY (player idle, externally driven)
    st!(2, 0, 10, Action::Look, s::POSS_STND),
    st!(2, 0, 4, Action::Chase, s::POSS_RUN1),
    st!(2, 4, 10, Action::PosAttack, s::POSS_STND),
    st!(2, 6, 3, Action::None, s::POSS_STND),
    st!(2, 7, 5, Action::Scream, s::POSS_DIE2),
    st!(2, 8, 5, Action::Fall, 0),
    st!(2, 10, 5, Action::None, 0),
    st!(2, 12, 5, Action::None, s::POSS_STND),
    st!(3, 0, 10, Action::Look, s::SPOS_STND),
    st!(3, 0, 3, Action::Chase, s::SPOS_RUN1),
    st!(3, 4, 10, Action::SposAttack, s::SPOS_STND),
    st!(3, 6, 3, Action::None, s::SPOS_STND),
    st!(3, 7, 5, Action::Scream, 0),
    st!(4, 0, 10, Action::Look, s::TROO_STND),
    st!(4, 0, 3, Action::Chase, s::TROO_RUN1),
    st!(4, 4, 8, Action::FaceTarget, s::TROO_ATK1 + 1),
    st!(4, 6, 2, Action::None, s::TROO_STND),
    st!(4, 7, 8, Action::Scream, 0),
    st!(5, 0, 10, Action::Look, s::SARG_STND),
    st!(5, 0, 2, Action::Chase, s::SARG_RUN1),
    st!(5, 4, 8, Action::SargAttack, s::SARG_STND),
    st!(5, 6, 2, Action::None, s::SARG_STND),
    st!(5, 7, 8, Action::Scream, 0),
    st!(6, 0, -1, Action::None, 0), // BAR1 idle
    st!(7, 0, 10, Action::Explode, 0), // BEXP
    st!(8, 0, 1, Action::None, s::BAL1), // projectile flight, re-runs self
    st!(8, 2, 8, Action::ExplodeMissile, 0),
    st!(9, 0, 4, Action::None, 0), // blood
    st!(10, 0, 4, Action::None, 0), // puff
    st!(0, 0, -1, Action::None, 0), // CLIP pickup uses sprite 0 placeholder
];

pub const NUM_MOBJTYPES: usize = 10;

pub static MOBJINFO: [MobjInfo; NUM_MOBJTYPES] = [
    // Player
    MobjInfo {
        doomednum: 1,
        spawn_state: StateId(s::PLAY),
        spawn_health: 100,
        see_state: STATE_NULL,
        see_sound: 0,
        pain_chance: 255,
        pain_state: STATE_NULL,
        pain_sound: 0,
        melee_state: STATE_NULL,
        missile_state: STATE_NULL,
        death_state: STATE_NULL,
        xdeath_state: STATE_NULL,
        death_sound: 0,
        speed: Fixed::ZERO,
        radius: Fixed::raw(16 << 16),
        height: Fixed::raw(56 << 16),
        mass: 100,
        damage: 0,
        active_sound: 0,
        flags: MobjFlags::SOLID.union(MobjFlags::SHOOTABLE).union(MobjFlags::DROPOFF).union(MobjFlags::PICKUP),
        raise_state: STATE_NULL,
    },
    // Zombieman
    MobjInfo {
        doomednum: 3004,
        spawn_state: StateId(s::POSS_STND),
        spawn_health: 20,
        see_state: StateId(s::POSS_RUN1),
        see_sound: 1,
        pain_chance: 200,
        pain_state: StateId(s::POSS_PAIN),
        pain_sound: 2,
        melee_state: STATE_NULL,
        missile_state: StateId(s::POSS_ATK1),
        death_state: StateId(s::POSS_DIE1),
        xdeath_state: StateId(s::POSS_XDIE1),
        death_sound: 3,
        speed: Fixed::raw(8 << 16),
        radius: Fixed::raw(20 << 16),
        height: Fixed::raw(56 << 16),
        mass: 100,
        damage: 0,
        active_sound: 4,
        flags: MobjFlags::SOLID.union(MobjFlags::SHOOTABLE).union(MobjFlags::COUNTKILL).union(MobjFlags::DROPOFF),
        raise_state: StateId(s::POSS_RAISE1),
    },
    // Shotgun guy
    MobjInfo {
        doomednum: 9,
        spawn_state: StateId(s::SPOS_STND),
        spawn_health: 30,
        see_state: StateId(s::SPOS_RUN1),
        see_sound: 5,
        pain_chance: 170,
        pain_state: StateId(s::SPOS_PAIN),
        pain_sound: 2,
        melee_state: STATE_NULL,
        missile_state: StateId(s::SPOS_ATK1),
        death_state: StateId(s::SPOS_DIE1),
        xdeath_state: STATE_NULL,
        death_sound: 3,
        speed: Fixed::raw(8 << 16),
        radius: Fixed::raw(20 << 16),
        height: Fixed::raw(56 << 16),
        mass: 100,
        damage: 0,
        active_sound: 4,
        flags: MobjFlags::SOLID.union(MobjFlags::SHOOTABLE).union(MobjFlags::COUNTKILL).union(MobjFlags::DROPOFF),
        raise_state: STATE_NULL,
    },
    // Imp
    MobjInfo {
        doomednum: 3001,
        spawn_state: StateId(s::TROO_STND),
        spawn_health: 60,
        see_state: StateId(s::TROO_RUN1),
        see_sound: 6,
        pain_chance: 200,
        pain_state: StateId(s::TROO_PAIN),
        pain_sound: 7,
        melee_state: StateId(s::TROO_ATK1),
        missile_state: StateId(s::TROO_ATK1),
        death_state: StateId(s::TROO_DIE1),
        xdeath_state: STATE_NULL,
        death_sound: 8,
        speed: Fixed::raw(8 << 16),
        radius: Fixed::raw(20 << 16),
        height: Fixed::raw(56 << 16),
        mass: 100,
        damage: 3,
        active_sound: 9,
        flags: MobjFlags::SOLID.union(MobjFlags::SHOOTABLE).union(MobjFlags::COUNTKILL).union(MobjFlags::DROPOFF),
        raise_state: STATE_NULL,
    },
    // Demon
    MobjInfo {
        doomednum: 3002,
        spawn_state: StateId(s::SARG_STND),
        spawn_health: 150,
        see_state: StateId(s::SARG_RUN1),
        see_sound: 10,
        pain_chance: 180,
        pain_state: StateId(s::SARG_PAIN),
        pain_sound: 11,
        melee_state: StateId(s::SARG_ATK1),
        missile_state: STATE_NULL,
        death_state: StateId(s::SARG_DIE1),
        xdeath_state: STATE_NULL,
        death_sound: 12,
        speed: Fixed::raw(10 << 16),
        radius: Fixed::raw(30 << 16),
        height: Fixed::raw(56 << 16),
        mass: 400,
        damage: 4,
        active_sound: 13,
        flags: MobjFlags::SOLID.union(MobjFlags::SHOOTABLE).union(MobjFlags::COUNTKILL).union(MobjFlags::DROPOFF),
        raise_state: STATE_NULL,
    },
    // Exploding barrel
    MobjInfo {
        doomednum: 2035,
        spawn_state: StateId(s::BAR1),
        spawn_health: 20,
        see_state: STATE_NULL,
        see_sound: 0,
        pain_chance: 0,
        pain_state: STATE_NULL,
        pain_sound: 0,
        melee_state: STATE_NULL,
        missile_state: STATE_NULL,
        death_state: StateId(s::BEXP),
        xdeath_state: STATE_NULL,
        death_sound: 14,
        speed: Fixed::ZERO,
        radius: Fixed::raw(10 << 16),
        height: Fixed::raw(42 << 16),
        mass: 100,
        damage: 0,
        active_sound: 0,
        flags: MobjFlags::SOLID.union(MobjFlags::SHOOTABLE).union(MobjFlags::NOBLOOD),
        raise_state: STATE_NULL,
    },
    // Imp fireball
    MobjInfo {
        doomednum: -1,
        spawn_state: StateId(s::BAL1),
        spawn_health: 1000,
        see_state: STATE_NULL,
        see_sound: 0,
        pain_chance: 0,
        pain_state: STATE_NULL,
        pain_sound: 0,
        melee_state: STATE_NULL,
        missile_state: STATE_NULL,
        death_state: StateId(s::BAL1EXP),
        xdeath_state: STATE_NULL,
        death_sound: 15,
        speed: Fixed::raw(20 << 16),
        radius: Fixed::raw(6 << 16),
        height: Fixed::raw(8 << 16),
        mass: 100,
        damage: 3,
        active_sound: 0,
        flags: MobjFlags::MISSILE.union(MobjFlags::NOGRAVITY).union(MobjFlags::DROPOFF).union(MobjFlags::NOBLOOD),
        raise_state: STATE_NULL,
    },
    // Blood
    MobjInfo {
        doomednum: -1,
        spawn_state: StateId(s::BLOOD1),
        spawn_health: 1000,
        see_state: STATE_NULL,
        see_sound: 0,
        pain_chance: 0,
        pain_state: STATE_NULL,
        pain_sound: 0,
        melee_state: STATE_NULL,
        missile_state: STATE_NULL,
        death_state: STATE_NULL,
        xdeath_state: STATE_NULL,
        death_sound: 0,
        speed: Fixed::ZERO,
        radius: Fixed::raw(20 << 16),
        height: Fixed::raw(16 << 16),
        mass: 100,
        damage: 0,
        active_sound: 0,
        flags: MobjFlags::NOBLOCKMAP.union(MobjFlags::NOGRAVITY).union(MobjFlags::STATIC),
        raise_state: STATE_NULL,
    },
    // Bullet puff
    MobjInfo {
        doomednum: -1,
        spawn_state: StateId(s::PUFF1),
        spawn_health: 1000,
        see_state: STATE_NULL,
        see_sound: 0,
        pain_chance: 0,
        pain_state: STATE_NULL,
        pain_sound: 0,
        melee_state: STATE_NULL,
        missile_state: STATE_NULL,
        death_state: STATE_NULL,
        xdeath_state: STATE_NULL,
        death_sound: 0,
        speed: Fixed::ZERO,
        radius: Fixed::raw(20 << 16),
        height: Fixed::raw(16 << 16),
        mass: 100,
        damage: 0,
        active_sound: 0,
        flags: MobjFlags::NOBLOCKMAP.union(MobjFlags::NOGRAVITY).union(MobjFlags::STATIC),
        raise_state: STATE_NULL,
    },
    // Clip pickup
    MobjInfo {
        doomednum: 2007,
        spawn_state: StateId(s::CLIP),
        spawn_health: 1000,
        see_state: STATE_NULL,
        see_sound: 0,
        pain_chance: 0,
        pain_state: STATE_NULL,
        pain_sound: 0,
        melee_state: STATE_NULL,
        missile_state: STATE_NULL,
        death_state: STATE_NULL,
        xdeath_state: STATE_NULL,
        death_sound: 0,
        speed: Fixed::ZERO,
        radius: Fixed::raw(20 << 16),
        height: Fixed::raw(16 << 16),
        mass: 100,
        damage: 0,
        active_sound: 0,
        flags: MobjFlags::SPECIAL.union(MobjFlags::STATIC),
        raise_state: STATE_NULL,
    },
];

pub fn mobjinfo(t: MobjType) -> &'static MobjInfo {
    &MOBJINFO[t as usize]
}

pub fn state(id: StateId) -> &'static State {
    &STATES[id.0 as usize]
}

pub fn mobj_type_for_doomednum(doomednum: i32) -> Option<MobjType> {
    MOBJINFO.iter().position(|m| m.doomednum == doomednum).map(|i| {
        // Safety-free conversion: table index order matches MobjType's
        // declaration order, checked by the `mobjtype_order_matches_table` test.
        match i {
            0 => MobjType::Player,
            1 => MobjType::Zombieman,
            2 => MobjType::ShotgunGuy,
            3 => MobjType::Imp,
            4 => MobjType::Demon,
            5 => MobjType::BarrelExploding,
            6 => MobjType::DoomImpBall,
            7 => MobjType::Blood,
            8 => MobjType::Puff,
            _ => MobjType::ItemClip,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobjtype_order_matches_table() {
        assert_eq!(mobjinfo(MobjType::Player).doomednum, 1);
        assert_eq!(mobjinfo(MobjType::Zombieman).doomednum, 3004);
        assert_eq!(mobjinfo(MobjType::Imp).doomednum, 3001);
    }

    #[test]
    fn lookup_by_doomednum() {
        assert_eq!(mobj_type_for_doomednum(3001), Some(MobjType::Imp));
        assert_eq!(mobj_type_for_doomednum(99999), None);
    }

    #[test]
    fn state_chain_terminates_or_loops() {
        // every state's `next` must be a valid index into STATES
        for st in STATES.iter() {
            assert!((st.next.0 as usize) < NUM_STATES);
        }
    }

    #[test]
    fn fullbright_bit_is_out_of_frame_range() {
        assert_eq!(FULLBRIGHT & 0x3F, 0);
    }
}
