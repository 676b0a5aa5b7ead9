//! Mobj-wide constants from `p_mobj.h`/`p_local.h`.

use crate::fixed::Fixed;

/// Maximum distance an mobj may move in a single `P_XYMovement` step
/// before being clipped to avoid tunneling through thin walls.
pub const MAXMOVE: Fixed = Fixed::raw(30 << 16);

/// Ground friction applied to `momx`/`momy` each tic (`ORIG_FRICTION`).
pub const ORIG_FRICTION: Fixed = Fixed::raw(0xE800);

/// Radius used by `P_RadiusAttack`'s blockmap search box.
pub const MAXRADIUS: Fixed = Fixed::raw(32 << 16);

/// Gravity subtracted from `momz` each tic.
pub const GRAVITY: Fixed = Fixed::raw(1 << 16);

/// Maximum step height an mobj can climb without being blocked.
pub const MAX_STEP_HEIGHT: Fixed = Fixed::raw(24 << 16);

/// Viewheight used for player eye-height above floor.
pub const VIEWHEIGHT: Fixed = Fixed::raw(41 << 16);
