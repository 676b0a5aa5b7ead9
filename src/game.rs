//! Ties every module together into one tic/frame loop: `P_Ticker` and
//! `R_RenderPlayerView`'s outer shape, minus the menu/HUD/automap layers
//! those call out to in vanilla.
//!
//! Mobjs aren't boxed as `dyn Think` the way sector specials are (an
//! `Arena<Mobj>` entry has no room for a trait object, and ticking every
//! mobj is a hot, uniform loop that doesn't benefit from dynamic
//! dispatch); `Game::run_tic` walks the mobj arena directly for
//! state-tic countdown and movement/AI, and defers to [`ThinkerList`]
//! only for sector specials (doors, floors, platforms, lights,
//! scrollers), matching the split vanilla already has between
//! `P_MobjThinker` and the special-purpose `T_*` functions registered
//! through `P_AddThinker`.

use alloc::vec::Vec;

use crate::ai::{self, ActionEffect, AiContext};
use crate::arena::{Arena, Idx};
use crate::fixed::{Angle, Fixed};
use crate::map::{Level, Linedef};
use crate::mobj::{remove_mobj, set_mobj_state, spawn_mobj, Mobj, MobjKind, MobjSpawnArgs, MobjType, SetStateResult};
use crate::platform::{FrameSink, Platform, TicCmd};
use crate::renderer::{Renderer, Viewer};
use crate::rng::Rng;
use crate::sound::Mixer;
use crate::specials::{self, SpecialThinker};
use crate::thinker::ThinkerList;

pub struct World {
    pub level: Level,
    pub mobjs: Arena<Mobj>,
    pub thinkers: ThinkerList<SpecialThinker>,
}

pub struct Game {
    pub world: World,
    pub rng: Rng,
    pub mixer: Mixer,
    renderer: Renderer,
    tic: u64,
}

impl Game {
    pub fn new(level: Level, screen_width: u16, screen_height: u16) -> Self {
        Game {
            world: World { level, mobjs: Arena::new(), thinkers: ThinkerList::new() },
            rng: Rng::new(),
            mixer: Mixer::new(),
            renderer: Renderer::new(screen_width, screen_height),
            tic: 0,
        }
    }

    /// `P_Ticker` — advance the simulation by one tic. `_cmd` is read by
    /// whatever drives the player mobj; this port has no player-movement
    /// special-case over any other full mobj, so it's accepted but not
    /// yet wired to a distinguished player index.
    pub fn run_tic(&mut self, _cmd: TicCmd, platform: &mut impl Platform) {
        self.tic += 1;
        let level = &mut self.world.level;
        let rng = &mut self.rng;
        self.world.thinkers.run_all(|t| specials::think_special(t, level, rng));
        self.tick_mobjs(platform);
    }

    /// `P_UseLines`'s spawn path: once the caller has traced the line
    /// directly in front of the using mobj, this is where a door/switch
    /// special on it actually starts a mover against the live level.
    pub fn use_line(&mut self, line_idx: Idx<Linedef>) -> bool {
        specials::use_special_line(&mut self.world.thinkers, &mut self.world.level, line_idx)
    }

    /// `P_MobjThinker` — apply momentum/gravity, run any walk-triggered
    /// special the move crossed, then count the current state's tics
    /// down; on reaching zero, advance to the next state in the chain and
    /// run whatever action pointer that state carries (mirroring
    /// `P_SetMobjState` running an action exactly once, on entry, rather
    /// than every tic the mobj spends in that state).
    fn tick_mobjs(&mut self, platform: &mut impl Platform) {
        let count = self.world.mobjs.len();
        for i in 0..count {
            let idx: Idx<Mobj> = Idx::new(i as u16);
            if self.world.mobjs.get(idx).is_none() {
                continue;
            }
            if self.world.mobjs[idx].removed {
                continue;
            }

            let mut spechit = Vec::new();
            crate::movement::xy_movement(&self.world.level, &mut self.world.mobjs[idx], &mut spechit);
            crate::movement::z_movement(&mut self.world.mobjs[idx]);
            for line_idx in spechit {
                specials::cross_special_line(&self.world.level, &mut self.world.mobjs[idx], line_idx);
            }

            let tics = self.world.mobjs[idx].tics;
            if tics < 0 {
                continue;
            }
            if tics > 0 {
                self.world.mobjs[idx].tics -= 1;
                continue;
            }

            let next = crate::mobj::state(self.world.mobjs[idx].state).next;
            let mut mobj = self.world.mobjs[idx].clone();
            let mut effects = Vec::new();
            {
                let mut ctx = AiContext { level: &self.world.level, mobjs: &mut self.world.mobjs, rng: &mut self.rng };
                let result = set_mobj_state(&mut mobj, next, |_m, action| {
                    if let Some(eff) = ai::dispatch(&mut ctx, i as u32, action) {
                        effects.push(eff);
                    }
                });
                if result == SetStateResult::Removed {
                    remove_mobj(&mut mobj);
                }
            }
            self.world.mobjs[idx] = mobj;
            self.apply_effects(&effects, platform);
        }
    }

    fn apply_effects(&mut self, effects: &[ActionEffect], platform: &mut impl Platform) {
        for effect in effects {
            match *effect {
                ActionEffect::PlaySound(id) => {
                    self.mixer.start_channel(id, 255, 128, 64);
                }
                ActionEffect::RadiusDamage { origin, damage } => {
                    let mut ctx = AiContext { level: &self.world.level, mobjs: &mut self.world.mobjs, rng: &mut self.rng };
                    ai::explode(&mut ctx, origin, damage);
                }
                ActionEffect::SpawnMissile { origin, at_target } => {
                    self.spawn_missile(origin, at_target);
                }
            }
        }
        let mut audio = [0i8; 512];
        self.mixer.mix(&mut audio);
        platform.submit_audio(&audio);
    }

    /// `P_SpawnMissile` — launch a fireball from `origin_id` toward
    /// `target_id`'s current position, giving it a constant xy velocity
    /// along the aim line and a momz that closes the z gap over the
    /// number of tics the flight is expected to take at its fixed speed.
    fn spawn_missile(&mut self, origin_id: u32, target_id: u32) {
        let origin_idx: Idx<Mobj> = Idx::new(origin_id as u16);
        let target_idx: Idx<Mobj> = Idx::new(target_id as u16);
        let Some(source) = self.world.mobjs.get(origin_idx).cloned() else { return };
        let Some(dest) = self.world.mobjs.get(target_idx).cloned() else { return };

        let angle = crate::fixed::point_to_angle(dest.x - source.x, dest.y - source.y);
        let info = crate::mobj::mobjinfo(MobjType::DoomImpBall);
        let speed = info.speed;
        let spawn_z = source.z + Fixed::from_int(32);

        let missile_idx = spawn_mobj(
            &mut self.world.mobjs,
            MobjSpawnArgs {
                mobj_type: MobjType::DoomImpBall,
                x: source.x,
                y: source.y,
                z: spawn_z,
                angle,
                sector: source.sector,
                floor_z: source.floor_z,
                ceiling_z: source.ceiling_z,
                kind: MobjKind::Full,
            },
        );

        let momx = speed.mul(crate::fixed::fine_cosine(angle));
        let momy = speed.mul(crate::fixed::fine_sine(angle));
        let dist = aprox_distance(dest.x - source.x, dest.y - source.y);
        let tics = (dist.0 / speed.0.max(1)).max(1);
        let momz = Fixed::raw((dest.z - source.z).0 / tics);

        let missile = &mut self.world.mobjs[missile_idx];
        missile.set_mom(momx, momy, momz);
        missile.target = Some(target_id);
    }

    /// `R_RenderPlayerView` — render from `viewer`'s eye into `sink`.
    pub fn render_view(&mut self, viewer: Viewer, sink: &mut impl FrameSink) {
        self.renderer.render_frame(&self.world.level, viewer, &self.world.mobjs, sink);
    }

    pub fn tic_count(&self) -> u64 {
        self.tic
    }
}

/// `P_AproxDistance` — a cheap `max + min/2` distance estimate, used
/// wherever vanilla trades accuracy for avoiding a square root (here,
/// the missile flight-time-in-tics estimate).
fn aprox_distance(dx: Fixed, dy: Fixed) -> Fixed {
    let dx = dx.abs();
    let dy = dy.abs();
    if dx.0 > dy.0 {
        Fixed::raw(dx.0 + (dy.0 >> 1))
    } else {
        Fixed::raw(dy.0 + (dx.0 >> 1))
    }
}

pub fn viewer_for_mobj(mobj: &Mobj) -> Viewer {
    Viewer { x: mobj.x, y: mobj.y, angle: mobj.angle }
}

pub const DEFAULT_ANGLE: Angle = Angle::ANG0;
