//! 26.6 fixed-point arithmetic.
//!
//! Every pen position, advance and kerning value flows through [`Unit`].
//! Conversions to and from floating-point are confined to the rasterizer's
//! path tracing; the rest of the crate never touches `f32`/`f64` directly.

use crate::error::ConfigError;

/// One fractional unit out of 64 per whole pixel.
const FRACT_BITS: i32 = 6;

/// `1.0` in [`Unit`] representation.
pub const ONE: Unit = Unit(1 << FRACT_BITS);

/// The largest magnitude representable without overflowing the `f64`
/// round-trip contract (`±2^25`).
const F64_BOUND: f64 = 33_554_432.0;

/// A signed 26.6 fixed-point number: one whole pixel equals `64`.
///
/// `Unit` is a thin wrapper around `i32`. Arithmetic that can't overflow in
/// practice (addition, subtraction, scaling by a small integer) is exposed as
/// inherent methods rather than operator overloads, so call sites read as
/// explicit fixed-point math rather than silently mixing with plain integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Unit(pub i32);

impl Unit {
    /// The zero value.
    pub const ZERO: Unit = Unit(0);

    /// Construct from a whole-pixel integer.
    #[inline]
    pub const fn from_int(i: i32) -> Unit {
        Unit(i << FRACT_BITS)
    }

    /// Construct directly from a raw 26.6 value (already multiplied by 64).
    #[inline]
    pub const fn from_raw(raw: i32) -> Unit {
        Unit(raw)
    }

    /// The raw 26.6 representation.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Add two fixed-point values.
    #[inline]
    pub fn add(self, other: Unit) -> Unit {
        Unit(self.0 + other.0)
    }

    /// Subtract two fixed-point values.
    #[inline]
    pub fn sub(self, other: Unit) -> Unit {
        Unit(self.0 - other.0)
    }

    /// Negate a fixed-point value.
    #[inline]
    pub fn neg(self) -> Unit {
        Unit(-self.0)
    }

    /// Multiply by a plain integer scalar.
    #[inline]
    pub fn mul_int(self, scalar: i32) -> Unit {
        Unit(self.0 * scalar)
    }

    /// Scale by a rational `num/den` pair, rounding to nearest.
    ///
    /// Used for e.g. horizontal scale factors derived from a ratio of pixel
    /// sizes; `den` must be non-zero.
    pub fn scale(self, num: i32, den: i32) -> Unit {
        let product = self.0 as i64 * num as i64;
        let half = den as i64 / 2;
        Unit(((product + half) / den as i64) as i32)
    }

    /// Round up to the nearest multiple of `step`.
    ///
    /// `step` must be one of `{1, 2, 4, 8, 16, 32, 64}`; callers are expected
    /// to have validated this via [`Unit::validate_step`] at configuration
    /// time, so this function does not itself return a `Result`.
    #[inline]
    pub fn quantize_up(self, step: i32) -> Unit {
        if step <= 1 {
            return self;
        }
        let rem = self.0.rem_euclid(step);
        if rem == 0 {
            self
        } else {
            Unit(self.0 + (step - rem))
        }
    }

    /// Validate that `step` is a divisor of 64 accepted by [`Unit::quantize_up`].
    pub fn validate_step(step: u8) -> Result<(), ConfigError> {
        let step_i = step as i32;
        let ok = matches!(step, 1 | 2 | 4 | 8 | 16 | 32 | 64) && 64 % step_i == 0;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidQuantizationStep(step))
        }
    }

    /// Floor to a whole-pixel integer.
    #[inline]
    pub fn to_int_floor(self) -> i32 {
        self.0 >> FRACT_BITS
    }

    /// Ceil to a whole-pixel integer.
    #[inline]
    pub fn to_int_ceil(self) -> i32 {
        (self.0 + (ONE.0 - 1)) >> FRACT_BITS
    }

    /// Round to the nearest whole-pixel integer, ties away from zero.
    #[inline]
    pub fn to_int_round(self) -> i32 {
        if self.0 >= 0 {
            (self.0 + (ONE.0 >> 1)) >> FRACT_BITS
        } else {
            -(((-self.0) + (ONE.0 >> 1)) >> FRACT_BITS)
        }
    }

    /// The fractional part, always in `[0, 64)`.
    #[inline]
    pub fn fract(self) -> Unit {
        Unit(self.0.rem_euclid(ONE.0))
    }

    /// Split into `(integer, fractional)` parts, where `fractional` is in
    /// `[0, 64)` and `integer + fractional/64 == self` (using floored
    /// division).
    #[inline]
    pub fn split(self) -> (i32, Unit) {
        (self.to_int_floor(), self.fract())
    }

    /// Convert to a floating-point pixel count.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / ONE.0 as f64
    }

    /// Convert from a floating-point pixel count, truncating toward zero.
    ///
    /// Fails for NaN, infinities, and magnitudes beyond `±2^25` pixels, which
    /// would overflow the 26.6 representation.
    pub fn from_f64_round_toward_zero(value: f64) -> Result<Unit, ConfigError> {
        if !value.is_finite() || value.abs() > F64_BOUND {
            return Err(ConfigError::NotRepresentable(value));
        }
        Ok(Unit((value * ONE.0 as f64).trunc() as i32))
    }
}

impl From<i32> for Unit {
    fn from(i: i32) -> Unit {
        Unit::from_int(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_int_round_trips_through_floor() {
        let u = Unit::from_int(5);
        assert_eq!(u.to_int_floor(), 5);
        assert_eq!(u.fract(), Unit::ZERO);
    }

    #[test]
    fn quantize_up_is_idempotent() {
        for step in [1, 2, 4, 8, 16, 32, 64] {
            for raw in [-130, -65, -1, 0, 1, 37, 63, 64, 500] {
                let u = Unit(raw);
                let once = u.quantize_up(step);
                let twice = once.quantize_up(step);
                assert_eq!(once, twice, "step={step} raw={raw}");
            }
        }
    }

    #[test]
    fn quantize_up_rounds_toward_positive_infinity() {
        let u = Unit(65); // 1 + 1/64
        assert_eq!(u.quantize_up(64), Unit(128));
        assert_eq!(Unit(64).quantize_up(64), Unit(64));
        assert_eq!(Unit(-1).quantize_up(64), Unit(0));
    }

    #[test]
    fn validate_step_rejects_non_divisors() {
        assert!(Unit::validate_step(64).is_ok());
        assert!(Unit::validate_step(3).is_err());
        assert!(Unit::validate_step(0).is_err());
    }

    #[test]
    fn f64_round_trip() {
        for raw in [-1_000_000, -64, 0, 1, 64, 4096, 1_000_000] {
            let u = Unit(raw);
            let back = Unit::from_f64_round_toward_zero(u.to_f64()).unwrap();
            assert_eq!(u, back);
        }
    }

    #[test]
    fn f64_rejects_nan_and_out_of_range() {
        assert!(Unit::from_f64_round_toward_zero(f64::NAN).is_err());
        assert!(Unit::from_f64_round_toward_zero(f64::INFINITY).is_err());
        assert!(Unit::from_f64_round_toward_zero(40_000_000.0).is_err());
    }

    #[test]
    fn split_matches_floor_and_fract() {
        let u = Unit(-65);
        let (i, f) = u.split();
        assert_eq!(i, -2);
        assert_eq!(f, Unit(63));
    }
}
