//! Monster action pointers: `P_Look`/`P_Chase`/`P_FaceTarget` and the
//! attack pointers they eventually call into. These are the functions
//! `set_mobj_state`'s `run_action` callback dispatches to as a mobj walks
//! its state chain.

use alloc::vec::Vec;

use crate::arena::{Arena, Idx};
use crate::fixed::{Angle, Fixed};
use crate::map::Level;
use crate::mobj::{set_mobj_state, Action, Mobj, MobjFlags, SetStateResult};
use crate::movement;
use crate::rng::Rng;
use crate::sight::{self, AimResult};

/// Everything an action pointer needs. Bundled the way vanilla's global
/// `mobj_t *actor` plus `players[]`/`gamemap` ambient state would be,
/// but passed explicitly since this crate has no globals.
pub struct AiContext<'a> {
    pub level: &'a Level,
    pub mobjs: &'a mut Arena<Mobj>,
    pub rng: &'a mut Rng,
}

const MELEE_RANGE: i32 = 64;
const MISSILE_RANGE: i32 = 32 * 64;

fn mobj_distance(a: &Mobj, b: &Mobj) -> i32 {
    let dx = (a.x - b.x).abs().to_int();
    let dy = (a.y - b.y).abs().to_int();
    dx.max(dy) + (dx.min(dy) >> 1)
}

/// `P_Look` — scan for a shootable target in sight; if one exists, go
/// straight to the `see_state` and start chasing, playing the "I see you"
/// sound is the caller's job (this returns whether a target was found).
pub fn look(ctx: &mut AiContext, self_id: u32) -> bool {
    let (self_x, self_y, self_z, self_sector) = {
        let m = &ctx.mobjs[Idx::new(self_id as u16)];
        (m.x, m.y, m.z, m.sector)
    };

    let mut found = None;
    for (i, other) in ctx.mobjs.iter().enumerate() {
        if i as u32 == self_id {
            continue;
        }
        if !other.flags.contains(MobjFlags::SHOOTABLE) {
            continue;
        }
        if other.health <= 0 {
            continue;
        }
        if sight::check_sight(ctx.level, self_sector, other.sector, (self_x, self_y, self_z), (other.x, other.y, other.z)) {
            found = Some(i as u32);
            break;
        }
    }

    if let Some(target) = found {
        let info = ctx.mobjs[Idx::new(self_id as u16)].info();
        let see_state = info.see_state;
        let m = &mut ctx.mobjs[Idx::new(self_id as u16)];
        m.target = Some(target);
        if see_state.0 != 0 {
            set_mobj_state(m, see_state, |_, _| {});
        }
        true
    } else {
        false
    }
}

/// `P_FaceTarget` — turn directly toward the current target; vanilla
/// also clears `MF_AMBUSH`-style shadow bobbing which this port has no
/// equivalent of.
pub fn face_target(ctx: &mut AiContext, self_id: u32) {
    let target_pos = match ctx.mobjs[Idx::new(self_id as u16)].target {
        Some(t) => ctx.mobjs.get(Idx::new(t as u16)).map(|m| (m.x, m.y)),
        None => None,
    };
    let Some((tx, ty)) = target_pos else { return };
    let m = &mut ctx.mobjs[Idx::new(self_id as u16)];
    m.angle = point_to_angle_between(m.x, m.y, tx, ty);
}

fn point_to_angle_between(x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed) -> Angle {
    crate::fixed::point_to_angle(x2 - x1, y2 - y1)
}

/// `P_Chase` — the per-tic monster AI loop: forget a dead/vanished
/// target, otherwise try to close distance or attack.
pub fn chase(ctx: &mut AiContext, self_id: u32) {
    let idx: Idx<Mobj> = Idx::new(self_id as u16);

    if ctx.mobjs[idx].reaction_time > 0 {
        ctx.mobjs[idx].reaction_time -= 1;
        return;
    }

    let target_id = match ctx.mobjs[idx].target {
        Some(t) => t,
        None => {
            look(ctx, self_id);
            return;
        }
    };
    let target_idx: Idx<Mobj> = Idx::new(target_id as u16);
    if ctx.mobjs.get(target_idx).map(|t| t.health <= 0).unwrap_or(true) {
        ctx.mobjs[idx].target = None;
        return;
    }

    let dist = mobj_distance(&ctx.mobjs[idx], &ctx.mobjs[target_idx]);
    let info = ctx.mobjs[idx].info();

    if info.melee_state.0 != 0 && dist < MELEE_RANGE {
        face_target(ctx, self_id);
        let st = info.melee_state;
        let m = &mut ctx.mobjs[idx];
        set_mobj_state(m, st, |_, _| {});
        return;
    }

    if info.missile_state.0 != 0 && dist < MISSILE_RANGE && (ctx.rng.play() as i32) < 200 {
        face_target(ctx, self_id);
        let st = info.missile_state;
        let m = &mut ctx.mobjs[idx];
        set_mobj_state(m, st, |_, _| {});
        return;
    }

    step_toward_target(ctx, self_id, target_idx);
}

fn step_toward_target(ctx: &mut AiContext, self_id: u32, target_idx: Idx<Mobj>) {
    let idx: Idx<Mobj> = Idx::new(self_id as u16);
    let speed = ctx.mobjs[idx].info().speed;
    let (sx, sy) = (ctx.mobjs[idx].x, ctx.mobjs[idx].y);
    let (tx, ty) = (ctx.mobjs[target_idx].x, ctx.mobjs[target_idx].y);
    let angle = point_to_angle_between(sx, sy, tx, ty);
    let dx = speed.mul(crate::fixed::fine_cosine(angle));
    let dy = speed.mul(crate::fixed::fine_sine(angle));

    let level = ctx.level;
    let m = &mut ctx.mobjs[idx];
    m.angle = angle;
    let new_x = m.x + dx;
    let new_y = m.y + dy;
    // Monsters don't trigger walk-over line specials in this port; the
    // tic loop threads spechit for the player's own movement instead.
    movement::try_move(level, m, new_x, new_y, &mut Vec::new());
}

/// `A_PosAttack` — zombieman hitscan: one shot, moderate spread, small
/// fixed damage roll.
pub fn pos_attack(ctx: &mut AiContext, self_id: u32) {
    hitscan(ctx, self_id, 1, 3, 5 * (ctx_damage_roll(ctx.rng) as i32 % 3 + 1));
}

/// `A_SPosAttack` — shotgun guy: three-pellet spread, same base damage
/// roll as `pos_attack` but fired three times per invocation like
/// vanilla's unrolled loop.
pub fn spos_attack(ctx: &mut AiContext, self_id: u32) {
    for _ in 0..3 {
        hitscan(ctx, self_id, 1, 12, 5 * (ctx_damage_roll(ctx.rng) as i32 % 3 + 1));
    }
}

fn ctx_damage_roll(rng: &mut Rng) -> u8 {
    rng.play()
}

fn hitscan(ctx: &mut AiContext, self_id: u32, num_shots: i32, spread_bam_shift: u32, damage: i32) {
    let _ = num_shots;
    let idx: Idx<Mobj> = Idx::new(self_id as u16);
    let (x, y, z, sector, base_angle) = {
        let m = &ctx.mobjs[idx];
        (m.x, m.y, m.z + m.height.mul(Fixed::from_int(3)).div(Fixed::from_int(4)), m.sector, m.angle)
    };
    let _ = sector;
    let spread = ctx.rng.play_signed() as i32 * (1 << spread_bam_shift);
    let angle = Angle(base_angle.0.wrapping_add(spread as u32));

    let aim = sight::aim_line_attack(ctx.level, ctx.mobjs, self_id, x, y, z, angle, Fixed::from_int(2048));
    if let Some(AimResult { target: Some(target), .. }) = aim {
        sight::line_attack(aim, ctx.mobjs, damage);
        let _ = target;
    }
}

/// `A_TroopAttack` — melee if in range, otherwise spawn a fireball
/// (fireball spawning itself belongs to the caller/game loop since it
/// needs the level's mobj-spawn budget; this just reports the intent).
pub fn troop_attack(ctx: &mut AiContext, self_id: u32) -> TroopAttackIntent {
    let idx: Idx<Mobj> = Idx::new(self_id as u16);
    let target_id = match ctx.mobjs[idx].target {
        Some(t) => t,
        None => return TroopAttackIntent::None,
    };
    let target_idx: Idx<Mobj> = Idx::new(target_id as u16);
    let Some(target) = ctx.mobjs.get(target_idx) else { return TroopAttackIntent::None };
    let dist = mobj_distance(&ctx.mobjs[idx], target);
    if dist < MELEE_RANGE {
        let dmg = (ctx.rng.play() as i32 % 8 + 1) * 3;
        sight::line_attack(Some(AimResult { slope: Fixed::ZERO, target: Some(target_id), distance: Fixed::from_int(dist) }), ctx.mobjs, dmg);
        TroopAttackIntent::Melee
    } else {
        TroopAttackIntent::Missile { at_target: target_id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TroopAttackIntent {
    None,
    Melee,
    Missile { at_target: u32 },
}

/// `A_SargAttack` — demon bite, melee only, no ranged fallback.
pub fn sarg_attack(ctx: &mut AiContext, self_id: u32) {
    let idx: Idx<Mobj> = Idx::new(self_id as u16);
    let Some(target_id) = ctx.mobjs[idx].target else { return };
    let target_idx: Idx<Mobj> = Idx::new(target_id as u16);
    let Some(target) = ctx.mobjs.get(target_idx) else { return };
    let dist = mobj_distance(&ctx.mobjs[idx], target);
    if dist < MELEE_RANGE {
        let dmg = (ctx.rng.play() as i32 % 4 + 1) * 4;
        sight::line_attack(Some(AimResult { slope: Fixed::ZERO, target: Some(target_id), distance: Fixed::from_int(dist) }), ctx.mobjs, dmg);
    }
}

/// `A_Pain` — pain state is entered by `set_mobj_state` already; this
/// handles vanilla's pain-sound selection knob which this port folds
/// into a single "play pain sound" signal since it has no real sound
/// lump ids yet beyond the numeric placeholders in `mobjinfo`.
pub fn pain(ctx: &mut AiContext, self_id: u32) -> u16 {
    ctx.mobjs[Idx::new(self_id as u16)].info().pain_sound
}

/// `A_Scream` — death sound selection; mirrors `pain`'s shape.
pub fn scream(ctx: &mut AiContext, self_id: u32) -> u16 {
    ctx.mobjs[Idx::new(self_id as u16)].info().death_sound
}

/// `A_Fall` — corpse conversion: clear `SOLID` so nothing collides with
/// the body anymore.
pub fn fall(ctx: &mut AiContext, self_id: u32) {
    let m = &mut ctx.mobjs[Idx::new(self_id as u16)];
    m.flags.remove(MobjFlags::SOLID);
}

/// `A_Explode`/`A_ExplodeMissile` share the same radius-damage shape;
/// distinguished only by call site (death state vs missile impact).
pub fn explode(ctx: &mut AiContext, self_id: u32, damage: i32) -> Vec<u32> {
    let (origin, sector) = {
        let m = &ctx.mobjs[Idx::new(self_id as u16)];
        ((m.x, m.y, m.z), m.sector)
    };
    sight::radius_attack(ctx.level, ctx.mobjs, sector, origin, damage)
}

/// The actual `run_action` callback wired into `set_mobj_state`. Actions
/// that need to spawn new mobjs or play sounds report that intent back
/// to the caller via `Vec<ActionEffect>` instead of doing it inline,
/// since a state-chain walk can trigger several actions in one tic and
/// this module has no owning access to the sound mixer or spawn budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEffect {
    PlaySound(u16),
    SpawnMissile { origin: u32, at_target: u32 },
    RadiusDamage { origin: u32, damage: i32 },
}

pub fn dispatch(ctx: &mut AiContext, self_id: u32, action: Action) -> Option<ActionEffect> {
    match action {
        Action::None => None,
        Action::Look => {
            look(ctx, self_id);
            None
        }
        Action::Chase => {
            chase(ctx, self_id);
            None
        }
        Action::FaceTarget => {
            face_target(ctx, self_id);
            None
        }
        Action::PosAttack => {
            pos_attack(ctx, self_id);
            None
        }
        Action::SposAttack => {
            spos_attack(ctx, self_id);
            None
        }
        Action::TroopAttack => match troop_attack(ctx, self_id) {
            TroopAttackIntent::Missile { at_target } => Some(ActionEffect::SpawnMissile { origin: self_id, at_target }),
            _ => None,
        },
        Action::SargAttack => {
            sarg_attack(ctx, self_id);
            None
        }
        Action::Scream => Some(ActionEffect::PlaySound(scream(ctx, self_id))),
        Action::Fall => {
            fall(ctx, self_id);
            None
        }
        Action::Explode => Some(ActionEffect::RadiusDamage { origin: self_id, damage: 128 }),
        Action::Pain => Some(ActionEffect::PlaySound(pain(ctx, self_id))),
        Action::FireBall => None,
        Action::ExplodeMissile => Some(ActionEffect::RadiusDamage { origin: self_id, damage: 128 }),
    }
}

pub fn advance_state(ctx: &mut AiContext, self_id: u32, next: crate::mobj::StateId) -> (SetStateResult, Vec<ActionEffect>) {
    let mut effects = Vec::new();
    let idx: Idx<Mobj> = Idx::new(self_id as u16);
    let mut mobj = ctx.mobjs[idx].clone();
    let result = set_mobj_state(&mut mobj, next, |_m, action| {
        if let Some(eff) = dispatch(ctx, self_id, action) {
            effects.push(eff);
        }
    });
    ctx.mobjs[idx] = mobj;
    (result, effects)
}
