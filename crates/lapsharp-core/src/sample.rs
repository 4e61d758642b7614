//! Native sample formats.
//!
//! A [`Sample`] is one channel value in a host buffer. Pyramid math runs on
//! `f32`; every format converts to and from that working type.
//!
//! | Type | Bits | Float | Range |
//! |------|------|-------|-------|
//! | `u8` | 8 | no | 0 - 255 |
//! | `u16` | 16 | no | 0 - 65535 |
//! | `f16` | 16 | yes | ±65504 |
//! | `f32` | 32 | yes | full |
//!
//! Unlike a display pipeline, conversion does **not** normalize: the working
//! value of `200u8` is `200.0`. Integer formats round to nearest and
//! saturate on the way back.

use half::f16;

/// Channel sample type of a native raster.
pub trait Sample: Copy + Default + Send + Sync + PartialOrd + std::fmt::Debug + 'static {
    /// Number of bits per sample.
    const BITS: u32;

    /// Whether this is a floating-point format.
    const IS_FLOAT: bool;

    /// Maximum representable value, in working units.
    const MAX_VALUE: f32;

    /// Minimum representable value, in working units.
    const MIN_VALUE: f32;

    /// Converts to the `f32` working representation.
    fn to_working(self) -> f32;

    /// Converts back from the working representation.
    ///
    /// Integer formats round to nearest and saturate to their range.
    fn from_working(v: f32) -> Self;

    /// Zero value.
    fn zero() -> Self;
}

impl Sample for u8 {
    const BITS: u32 = 8;
    const IS_FLOAT: bool = false;
    const MAX_VALUE: f32 = 255.0;
    const MIN_VALUE: f32 = 0.0;

    #[inline]
    fn to_working(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_working(v: f32) -> Self {
        // `as` saturates and maps NaN to 0
        v.round() as u8
    }

    #[inline]
    fn zero() -> Self {
        0
    }
}

impl Sample for u16 {
    const BITS: u32 = 16;
    const IS_FLOAT: bool = false;
    const MAX_VALUE: f32 = 65535.0;
    const MIN_VALUE: f32 = 0.0;

    #[inline]
    fn to_working(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_working(v: f32) -> Self {
        v.round() as u16
    }

    #[inline]
    fn zero() -> Self {
        0
    }
}

impl Sample for f16 {
    const BITS: u32 = 16;
    const IS_FLOAT: bool = true;
    const MAX_VALUE: f32 = 65504.0;
    const MIN_VALUE: f32 = -65504.0;

    #[inline]
    fn to_working(self) -> f32 {
        self.to_f32()
    }

    #[inline]
    fn from_working(v: f32) -> Self {
        f16::from_f32(v)
    }

    #[inline]
    fn zero() -> Self {
        f16::ZERO
    }
}

impl Sample for f32 {
    const BITS: u32 = 32;
    const IS_FLOAT: bool = true;
    const MAX_VALUE: f32 = f32::MAX;
    const MIN_VALUE: f32 = f32::MIN;

    #[inline]
    fn to_working(self) -> f32 {
        self
    }

    #[inline]
    fn from_working(v: f32) -> Self {
        v
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_u8_saturates() {
        assert_eq!(u8::from_working(300.0), 255);
        assert_eq!(u8::from_working(-12.0), 0);
        assert_eq!(u8::from_working(f32::NAN), 0);
        assert_eq!(u8::from_working(99.5), 100);
        assert_eq!(u8::from_working(99.4), 99);
    }

    #[test]
    fn test_u8_not_normalized() {
        assert_relative_eq!(200u8.to_working(), 200.0);
    }

    #[test]
    fn test_u16_range() {
        assert_eq!(u16::from_working(70000.0), u16::MAX);
        assert_relative_eq!(4096u16.to_working(), 4096.0);
    }

    #[test]
    fn test_f16_passthrough() {
        let v = f16::from_working(0.5);
        assert_relative_eq!(v.to_working(), 0.5);
        assert_eq!(f16::zero(), f16::ZERO);
    }

    #[test]
    fn test_f32_keeps_negative() {
        assert_relative_eq!(f32::from_working(-3.25), -3.25);
    }
}
