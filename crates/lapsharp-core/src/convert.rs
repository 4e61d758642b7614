//! Native ⇄ float conversion over a region.
//!
//! The pyramid stages only ever see [`FloatRaster`]s. These two functions
//! are the boundary with the host's native buffers:
//!
//! - [`to_float`] copies a region of a native raster into a new float
//!   buffer sized to that region
//! - [`from_float`] writes a float buffer back into a region of a native
//!   raster, rounding and saturating per [`Sample::from_working`]
//!
//! ```rust
//! use lapsharp_core::{from_float, to_float, Raster, Rect};
//!
//! let src: Raster<u8> = Raster::filled(8, 8, &[100]);
//! let roi = Rect::new(2, 2, 4, 4);
//! let mut work = to_float(&src, roi).unwrap();
//! assert_eq!(work.dimensions(), (4, 4));
//!
//! work.map_samples(|v| v + 0.6);
//! let mut dst: Raster<u8> = Raster::new(8, 8, 1);
//! from_float(&work, &mut dst, roi).unwrap();
//! assert_eq!(dst.pixel(2, 2), &[101]);
//! assert_eq!(dst.pixel(0, 0), &[0]);
//! ```

use crate::{Error, FloatRaster, Raster, Rect, Result, Sample};

/// Copies `rect` of `src` into a new float buffer of size `rect.width x rect.height`.
///
/// # Errors
///
/// - [`Error::UnsupportedChannelLayout`] if `src` has zero channels
/// - [`Error::InvalidRegion`] if `rect` is empty or outside `src`
/// - [`Error::AllocationFailure`] if the float buffer cannot be allocated
pub fn to_float<T: Sample>(src: &Raster<T>, rect: Rect) -> Result<FloatRaster> {
    src.check_channels()?;
    src.check_region(rect)?;

    let mut out = FloatRaster::try_new(rect.width, rect.height, src.channels())?;
    let out_bounds = out.bounds();
    for ((_, s), (_, d)) in src.rows(rect).zip(out.rows_mut(out_bounds)) {
        for (dv, sv) in d.iter_mut().zip(s) {
            *dv = sv.to_working();
        }
    }
    Ok(out)
}

/// Writes `src` into `rect` of `dst`.
///
/// `src` must be exactly `rect.width x rect.height` with `dst`'s channel count.
/// Samples of `dst` outside `rect` are left untouched.
///
/// # Errors
///
/// - [`Error::InvalidRegion`] if `rect` is empty or outside `dst`
/// - [`Error::UnsupportedChannelLayout`] if channel counts differ
/// - [`Error::SizeMismatch`] if `src` isn't the size of `rect`
pub fn from_float<T: Sample>(src: &FloatRaster, dst: &mut Raster<T>, rect: Rect) -> Result<()> {
    dst.check_region(rect)?;
    if src.channels() != dst.channels() {
        return Err(Error::channel_layout(dst.channels(), src.channels()));
    }
    if src.dimensions() != rect.size() {
        return Err(Error::size_mismatch(src.dimensions(), rect.size()));
    }

    for ((_, s), (_, d)) in src.rows(src.bounds()).zip(dst.rows_mut(rect)) {
        for (dv, sv) in d.iter_mut().zip(s) {
            *dv = T::from_working(*sv);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use half::f16;

    #[test]
    fn test_to_float_region() {
        let data: Vec<u8> = (0..32).collect();
        let src = Raster::from_data(4, 4, 2, data).unwrap();
        let work = to_float(&src, Rect::new(1, 1, 2, 3)).unwrap();
        assert_eq!(work.dimensions(), (2, 3));
        assert_eq!(work.channels(), 2);
        // pixel (1, 1) of src starts at sample (1*4 + 1) * 2 = 10
        assert_relative_eq!(work.sample(0, 0, 0), 10.0);
        assert_relative_eq!(work.sample(1, 2, 1), 29.0);
    }

    #[test]
    fn test_to_float_invalid_region() {
        let src: Raster<u8> = Raster::new(4, 4, 1);
        let err = to_float(&src, Rect::new(2, 2, 4, 4)).unwrap_err();
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_to_float_zero_channels() {
        let src: Raster<u8> = Raster::new(4, 4, 0);
        let err = to_float(&src, Rect::from_size(4, 4)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedChannelLayout { .. }));
    }

    #[test]
    fn test_from_float_size_mismatch() {
        let work = FloatRaster::new(3, 3, 1);
        let mut dst: Raster<u8> = Raster::new(8, 8, 1);
        let err = from_float(&work, &mut dst, Rect::new(0, 0, 4, 4)).unwrap_err();
        assert!(err.is_geometry_error());
    }

    #[test]
    fn test_from_float_saturates() {
        let work = FloatRaster::filled(2, 2, &[-20.0, 300.0]);
        let mut dst: Raster<u8> = Raster::new(2, 2, 2);
        let bounds = dst.bounds();
        from_float(&work, &mut dst, bounds).unwrap();
        assert_eq!(dst.pixel(1, 1), &[0, 255]);
    }

    #[test]
    fn test_f16_round_trip() {
        let src: Raster<f16> = Raster::filled(3, 3, &[f16::from_f32(0.25)]);
        let work = to_float(&src, src.bounds()).unwrap();
        let mut dst: Raster<f16> = Raster::new(3, 3, 1);
        from_float(&work, &mut dst, Rect::from_size(3, 3)).unwrap();
        assert_eq!(dst, src);
    }
}
