//! Adds the boost into the Gaussian base and writes the native result.
//!
//! ```text
//! out = G[0] + round_policy(boost)
//! dst[roi] = from_float(out)
//! ```
//!
//! [`RoundingPolicy::Truncate`] drops the fractional part of each boost value
//! before the add (toward zero), so small boosts below one native unit
//! vanish on integer rasters.
//!
//! The policy quantizes to whole native units, which only means something
//! for integer samples. For float samples (`f16`, `f32`) every policy
//! resolves to [`RoundingPolicy::Exact`]; see [`RoundingPolicy::resolve`].

use crate::arith;
use crate::pyramid::{Level, Pyramid, PyramidKind};
use lapsharp_core::{from_float, Error, FloatRaster, Raster, Rect, Result, Sample};
use tracing::debug;

/// How each boost value is quantized before it's added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoundingPolicy {
    /// Round toward zero.
    #[default]
    Truncate,
    /// Round half away from zero.
    Round,
    /// Add the float value unchanged.
    Exact,
}

impl RoundingPolicy {
    /// Quantizes one boost value.
    ///
    /// ```rust
    /// use lapsharp_ops::recombine::RoundingPolicy;
    ///
    /// assert_eq!(RoundingPolicy::Truncate.apply(-1.7), -1.0);
    /// assert_eq!(RoundingPolicy::Round.apply(-1.7), -2.0);
    /// assert_eq!(RoundingPolicy::Exact.apply(-1.7), -1.7);
    /// ```
    #[inline]
    pub fn apply(self, v: f32) -> f32 {
        match self {
            RoundingPolicy::Truncate => v.trunc(),
            RoundingPolicy::Round => v.round(),
            RoundingPolicy::Exact => v,
        }
    }

    /// The policy actually applied for sample type `T`.
    ///
    /// Float formats have no native unit to quantize to, so they always
    /// get [`Exact`](Self::Exact).
    ///
    /// ```rust
    /// use lapsharp_ops::recombine::RoundingPolicy;
    ///
    /// assert_eq!(RoundingPolicy::Truncate.resolve::<u8>(), RoundingPolicy::Truncate);
    /// assert_eq!(RoundingPolicy::Truncate.resolve::<f32>(), RoundingPolicy::Exact);
    /// ```
    #[inline]
    pub fn resolve<T: Sample>(self) -> Self {
        if T::IS_FLOAT {
            RoundingPolicy::Exact
        } else {
            self
        }
    }
}

/// `base += policy(boost)`, per sample.
///
/// # Errors
///
/// [`Error::SizeMismatch`] or [`Error::UnsupportedChannelLayout`] if the
/// buffers disagree.
pub fn add_boost(base: &mut FloatRaster, boost: &FloatRaster, policy: RoundingPolicy) -> Result<()> {
    if policy == RoundingPolicy::Exact {
        return arith::add_assign(base, boost);
    }
    base.check_same_geometry(boost)?;
    for (d, b) in base.data_mut().iter_mut().zip(boost.data()) {
        *d += policy.apply(*b);
    }
    Ok(())
}

/// Writes a level back into `dst` at `roi`.
///
/// # Errors
///
/// - [`Error::InvalidRegion`] if `roi` is empty or outside `dst`
/// - [`Error::SizeMismatch`] if the level isn't the size of `roi`
pub fn write_back<T: Sample>(level: &Level, dst: &mut Raster<T>, roi: Rect) -> Result<()> {
    if level.rect.size() != roi.size() {
        return Err(Error::size_mismatch(level.rect.size(), roi.size()));
    }
    from_float(&level.buffer, dst, roi)
}

/// Combines Gaussian level 0 with a boost image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recombiner {
    /// Quantization applied to the boost.
    pub rounding: RoundingPolicy,
}

impl Recombiner {
    /// Creates a recombiner with the given rounding.
    pub fn new(rounding: RoundingPolicy) -> Self {
        Self { rounding }
    }

    /// Adds `boost` into level 0 of `gaussian`, then writes it to `dst` at `roi`.
    ///
    /// The rounding is resolved against `T` first, so float rasters get the
    /// boost unquantized. `dst` is untouched unless every check passes.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if `gaussian` isn't a Gaussian pyramid
    /// - [`Error::SizeMismatch`] if `boost`, level 0 and `roi` disagree
    /// - [`Error::InvalidRegion`] if `roi` is outside `dst`
    pub fn recombine<T: Sample>(
        &self,
        gaussian: &mut Pyramid,
        boost: &FloatRaster,
        dst: &mut Raster<T>,
        roi: Rect,
    ) -> Result<()> {
        if gaussian.kind() != PyramidKind::Gaussian {
            return Err(Error::invalid_parameter(
                "pyramid",
                "boost is added to a gaussian base",
            ));
        }
        dst.check_region(roi)?;
        let rounding = self.rounding.resolve::<T>();
        debug!(?rounding, width = roi.width, height = roi.height, "recombine");

        let base = gaussian.finest_mut();
        add_boost(&mut base.buffer, boost, rounding)?;
        write_back(base, dst, roi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_add_boost_policies() {
        let boost = FloatRaster::from_data(3, 1, 1, vec![0.9, -1.5, 2.5]).unwrap();
        let cases = [
            (RoundingPolicy::Truncate, [10.0, 9.0, 12.0]),
            (RoundingPolicy::Round, [11.0, 8.0, 13.0]),
            (RoundingPolicy::Exact, [10.9, 8.5, 12.5]),
        ];
        for (policy, expected) in cases {
            let mut base = FloatRaster::filled(3, 1, &[10.0]);
            add_boost(&mut base, &boost, policy).unwrap();
            for (a, b) in base.data().iter().zip(expected) {
                assert_relative_eq!(*a, b, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_add_boost_mismatch() {
        let mut base = FloatRaster::new(3, 3, 1);
        let boost = FloatRaster::new(3, 3, 2);
        let err = add_boost(&mut base, &boost, RoundingPolicy::Round).unwrap_err();
        assert!(matches!(err, Error::UnsupportedChannelLayout { .. }));
    }

    #[test]
    fn test_recombine_writes_roi_only() {
        let src: Raster<u8> = Raster::filled(6, 6, &[50]);
        let roi = Rect::new(1, 2, 4, 3);
        let mut gaussian = Pyramid::gaussian(&src, 1, roi).unwrap();
        let boost = FloatRaster::filled(4, 3, &[7.8]);
        let mut dst = src.clone();

        Recombiner::default()
            .recombine(&mut gaussian, &boost, &mut dst, roi)
            .unwrap();
        assert_eq!(dst.pixel(1, 2), &[57]);
        assert_eq!(dst.pixel(4, 4), &[57]);
        assert_eq!(dst.pixel(0, 0), &[50]);
        assert_eq!(dst.pixel(5, 5), &[50]);
    }

    #[test]
    fn test_resolve_per_sample_type() {
        for policy in [RoundingPolicy::Truncate, RoundingPolicy::Round, RoundingPolicy::Exact] {
            assert_eq!(policy.resolve::<u8>(), policy);
            assert_eq!(policy.resolve::<u16>(), policy);
            assert_eq!(policy.resolve::<half::f16>(), RoundingPolicy::Exact);
            assert_eq!(policy.resolve::<f32>(), RoundingPolicy::Exact);
        }
    }

    #[test]
    fn test_recombine_float_keeps_fraction() {
        let src: Raster<f32> = Raster::filled(4, 4, &[0.5]);
        let roi = src.bounds();
        let mut gaussian = Pyramid::gaussian(&src, 1, roi).unwrap();
        let boost = FloatRaster::filled(4, 4, &[0.25]);
        let mut dst = src.clone();
        Recombiner::default()
            .recombine(&mut gaussian, &boost, &mut dst, roi)
            .unwrap();
        for v in dst.data() {
            assert_relative_eq!(*v, 0.75, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_recombine_saturates() {
        let src: Raster<u8> = Raster::filled(2, 2, &[250]);
        let roi = src.bounds();
        let mut gaussian = Pyramid::gaussian(&src, 1, roi).unwrap();
        let boost = FloatRaster::filled(2, 2, &[30.0]);
        let mut dst: Raster<u8> = Raster::new(2, 2, 1);
        Recombiner::new(RoundingPolicy::Exact)
            .recombine(&mut gaussian, &boost, &mut dst, roi)
            .unwrap();
        assert!(dst.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_recombine_rejects_laplacian() {
        let src: Raster<u8> = Raster::filled(4, 4, &[1]);
        let g = Pyramid::gaussian(&src, 1, src.bounds()).unwrap();
        let mut l = Pyramid::laplacian(&g).unwrap();
        let mut dst = src.clone();
        let boost = FloatRaster::new(4, 4, 1);
        let err = Recombiner::default()
            .recombine(&mut l, &boost, &mut dst, src.bounds())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
        assert_eq!(dst, src);
    }

    #[test]
    fn test_write_back_size_mismatch() {
        let level = Level {
            rect: Rect::from_size(2, 2),
            buffer: FloatRaster::new(2, 2, 1),
        };
        let mut dst: Raster<u16> = Raster::new(4, 4, 1);
        assert!(write_back(&level, &mut dst, Rect::from_size(3, 3)).is_err());
    }
}
