#![doc = r#"
Doom-core library crate.

This crate exposes the map/actor/physics simulation and software BSP
renderer of a Doom engine port sized for a ~256KiB-RAM microcontroller
with external serial-flash WAD storage. It does not draw a HUD, own a
display, scan a keyboard, or move bytes over a transport: those concerns
live on the other side of the `platform` module's traits.

Modules:
- error: fatal/local/user-visible error taxonomy
- fixed: 16.16 and 13.3 fixed-point scalars, BAM angles, trig tables
- rng: play/cosmetic dual-stream LCG
- arena: short-reference index arenas and lifetime-scoped allocators
- wad: WAD header/directory parsing and lump lookup
- map: level geometry data model and loader
- mobj: actor (mobj) data model, mobjinfo/state tables, spawn/remove
- thinker: the deferred-removal thinker list
- maputil: point/box-on-line-side, line openings, blockmap iteration
- movement: P_TryMove / slide-move / teleport / sector-change
- sight: line-of-sight, hitscan/autoaim, radius damage, noise alert
- ai: monster chase/look state machine and action-pointer dispatch
- specials: line and sector specials (doors/floors/plats/lights/switches)
- renderer: BSP-walk software renderer (walls, planes, sprites, colormaps)
- sound: fixed-point N-channel sample mixer
- platform: traits implemented by the host/firmware collaborator
- game: the `Game` context tying one tic/render pass together

In tests, shared WAD/map builders are available under `crate::test_utils`.
"#]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod arena;
pub mod error;
pub mod fixed;
pub mod game;
pub mod map;
pub mod maputil;
pub mod mobj;
pub mod movement;
pub mod platform;
pub mod renderer;
pub mod rng;
pub mod sight;
pub mod sound;
pub mod specials;
pub mod thinker;
pub mod ai;
pub mod wad;

pub use error::CoreError;
pub use fixed::{Angle, Angle16, Fixed, Fixed16};
pub use game::Game;

#[cfg(test)]
pub mod test_utils;
