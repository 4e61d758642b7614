//! Adaptive high-frequency boost of the finest Laplacian band.
//!
//! For a Laplacian level 0 with per-channel peak magnitude `L0Max`:
//!
//! ```text
//! T       = (1 - clip) * L0Max
//! clipped = clamp(v, -T, T) * scale          (in place on level 0)
//! blurred = sharpening_blur(a) applied to a copy of clipped
//! boost   = clipped - blurred
//! ```
//!
//! The threshold tracks the image itself: strong edges are capped at a
//! fraction of the strongest residual, weak detail passes through.
//!
//! # Example
//!
//! ```rust
//! use lapsharp_core::{FloatRaster, Rect};
//! use lapsharp_ops::boost::{AdaptiveBooster, BoostParams};
//! use lapsharp_ops::pyramid::Level;
//!
//! let mut buffer = FloatRaster::new(5, 5, 1);
//! buffer.set_sample(2, 2, 0, 40.0);
//! let rect = Rect::from_size(5, 5);
//! let mut level = Level { rect, buffer };
//!
//! let booster = AdaptiveBooster::new(BoostParams::default()).unwrap();
//! let out = booster.boost(&mut level, rect).unwrap();
//! assert_eq!(out.peaks, vec![40.0]);
//! assert!((out.thresholds[0] - 22.0).abs() < 1e-4);
//! ```

use crate::arith;
use crate::convolve::{separable, BorderMode, ConvolutionKernel};
use crate::pyramid::Level;
use lapsharp_core::{Error, FloatRaster, Rect, Result};
use tracing::debug;

/// How the clipping threshold is shared between channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ThresholdScope {
    /// Each channel is clipped against its own peak.
    #[default]
    PerChannel,
    /// Every channel is clipped against the largest peak of any channel.
    AllChannels,
}

/// Booster parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostParams {
    /// Fraction of the peak removed from the threshold, `[0, 1]`.
    pub clip: f32,
    /// Gain applied after clipping, finite and positive.
    pub scale: f32,
    /// Blur shape parameter, `[0, 0.5]`.
    pub blur_a: f32,
    /// Threshold sharing between channels.
    pub threshold_scope: ThresholdScope,
}

impl Default for BoostParams {
    fn default() -> Self {
        Self {
            clip: 0.45,
            scale: 1.1,
            blur_a: 0.5,
            threshold_scope: ThresholdScope::PerChannel,
        }
    }
}

impl BoostParams {
    /// Checks every parameter is in range.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.clip) {
            return Err(Error::invalid_parameter(
                "clip",
                format!("must be within [0, 1], got {}", self.clip),
            ));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::invalid_parameter(
                "scale",
                format!("must be finite and positive, got {}", self.scale),
            ));
        }
        if !(0.0..=0.5).contains(&self.blur_a) {
            return Err(Error::invalid_parameter(
                "blur_a",
                format!("must be within [0, 0.5], got {}", self.blur_a),
            ));
        }
        Ok(())
    }
}

/// Per-channel maximum absolute value over every pixel of `level`.
///
/// Starts from `0.0`, so an all-zero band yields zero peaks and NaN samples
/// never win. With [`ThresholdScope::AllChannels`] every entry holds the
/// largest peak of any channel.
pub fn peak_magnitudes(level: &FloatRaster, scope: ThresholdScope) -> Vec<f32> {
    let channels = level.channels();
    let mut peaks = vec![0.0f32; channels];
    if channels == 0 {
        return peaks;
    }
    for px in level.data().chunks_exact(channels) {
        for (peak, v) in peaks.iter_mut().zip(px) {
            let m = v.abs();
            if m > *peak {
                *peak = m;
            }
        }
    }
    if scope == ThresholdScope::AllChannels {
        let global = peaks.iter().fold(0.0f32, |a, &b| a.max(b));
        peaks.fill(global);
    }
    peaks
}

/// Clipping threshold `(1 - clip) * peak`.
///
/// Monotonically non-increasing in `clip`; `clip = 0` gives the peak itself.
#[inline]
pub fn threshold(peak: f32, clip: f32) -> f32 {
    (1.0 - clip) * peak
}

/// Clamps each sample of channel `c` to `[-thresholds[c], thresholds[c]]`
/// and multiplies by `scale`, in place.
///
/// # Errors
///
/// - [`Error::UnsupportedChannelLayout`] if `thresholds` doesn't have one
///   entry per channel
/// - [`Error::InvalidParameter`] if a threshold is negative or NaN
pub fn clip_and_scale(level: &mut FloatRaster, thresholds: &[f32], scale: f32) -> Result<()> {
    let channels = level.channels();
    if thresholds.len() != channels {
        return Err(Error::channel_layout(channels, thresholds.len()));
    }
    level.check_channels()?;
    if let Some(t) = thresholds.iter().find(|t| t.is_nan() || **t < 0.0) {
        return Err(Error::invalid_parameter(
            "threshold",
            format!("must be non-negative, got {t}"),
        ));
    }
    for px in level.data_mut().chunks_exact_mut(channels) {
        for (v, &t) in px.iter_mut().zip(thresholds) {
            *v = v.clamp(-t, t) * scale;
        }
    }
    Ok(())
}

/// Result of [`AdaptiveBooster::boost`].
#[derive(Debug, Clone, PartialEq)]
pub struct BoostOutput {
    /// `clipped - blurred`, sized to the working rect.
    pub boost: FloatRaster,
    /// `L0Max` per channel.
    pub peaks: Vec<f32>,
    /// Clipping threshold per channel.
    pub thresholds: Vec<f32>,
}

/// Applies the adaptive boost to Laplacian level 0.
#[derive(Debug, Clone)]
pub struct AdaptiveBooster {
    params: BoostParams,
    kernel: ConvolutionKernel,
}

impl AdaptiveBooster {
    /// Validates `params` and prepares the blur kernel.
    pub fn new(params: BoostParams) -> Result<Self> {
        params.validate()?;
        let kernel = ConvolutionKernel::sharpening_blur(params.blur_a)?;
        Ok(Self { params, kernel })
    }

    /// Parameters in use.
    #[inline]
    pub fn params(&self) -> &BoostParams {
        &self.params
    }

    /// Blur kernel built from `blur_a`.
    #[inline]
    pub fn kernel(&self) -> &ConvolutionKernel {
        &self.kernel
    }

    /// Clips and scales `level` in place, then returns the boost image.
    ///
    /// # Errors
    ///
    /// - [`Error::SizeMismatch`] if `level.rect`, `work_rect` and the buffer
    ///   size disagree
    /// - [`Error::AllocationFailure`] if the blurred copy cannot be allocated
    pub fn boost(&self, level: &mut Level, work_rect: Rect) -> Result<BoostOutput> {
        if level.rect != work_rect || level.dimensions() != work_rect.size() {
            return Err(Error::size_mismatch(level.dimensions(), work_rect.size()));
        }

        let peaks = peak_magnitudes(&level.buffer, self.params.threshold_scope);
        let thresholds: Vec<f32> = peaks
            .iter()
            .map(|&p| threshold(p, self.params.clip))
            .collect();
        debug!(?peaks, ?thresholds, scale = self.params.scale, "booster thresholds");

        clip_and_scale(&mut level.buffer, &thresholds, self.params.scale)?;

        // boost = clipped - blur(clipped), built in the blurred buffer
        let mut boost = separable(&level.buffer, &self.kernel, BorderMode::Repeat)?;
        arith::rsub_assign(&mut boost, &level.buffer)?;

        Ok(BoostOutput {
            boost,
            peaks,
            thresholds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn level(buffer: FloatRaster) -> Level {
        Level {
            rect: buffer.bounds(),
            buffer,
        }
    }

    #[test]
    fn test_params_validation() {
        assert!(BoostParams::default().validate().is_ok());
        let bad = [
            BoostParams { clip: 1.5, ..Default::default() },
            BoostParams { clip: f32::NAN, ..Default::default() },
            BoostParams { scale: 0.0, ..Default::default() },
            BoostParams { scale: f32::INFINITY, ..Default::default() },
            BoostParams { blur_a: 0.75, ..Default::default() },
        ];
        for p in bad {
            let err = p.validate().unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { .. }), "{p:?}");
        }
    }

    #[test]
    fn test_peaks_use_magnitude() {
        let buf = FloatRaster::from_data(3, 1, 2, vec![-5.0, 1.0, 3.0, -7.0, 0.0, 2.0]).unwrap();
        assert_eq!(peak_magnitudes(&buf, ThresholdScope::PerChannel), vec![5.0, 7.0]);
        assert_eq!(peak_magnitudes(&buf, ThresholdScope::AllChannels), vec![7.0, 7.0]);
    }

    #[test]
    fn test_peaks_ignore_nan_and_seed_zero() {
        let buf = FloatRaster::from_data(2, 1, 1, vec![f32::NAN, -0.0]).unwrap();
        assert_eq!(peak_magnitudes(&buf, ThresholdScope::PerChannel), vec![0.0]);
    }

    #[test]
    fn test_threshold_monotonic() {
        let peak = 80.0;
        let mut last = f32::INFINITY;
        for step in 0..=20 {
            let t = threshold(peak, step as f32 / 20.0);
            assert!(t <= last);
            last = t;
        }
        assert_relative_eq!(threshold(peak, 0.0), peak);
        assert_relative_eq!(threshold(peak, 1.0), 0.0);
        assert_relative_eq!(threshold(peak, 0.45), 44.0);
    }

    #[test]
    fn test_clip_and_scale() {
        let mut buf = FloatRaster::from_data(4, 1, 1, vec![-20.0, -2.0, 3.0, 50.0]).unwrap();
        clip_and_scale(&mut buf, &[10.0], 2.0).unwrap();
        assert_eq!(buf.data(), &[-20.0, -4.0, 6.0, 20.0]);
    }

    #[test]
    fn test_clip_and_scale_channel_count() {
        let mut buf = FloatRaster::new(2, 2, 3);
        let err = clip_and_scale(&mut buf, &[1.0], 1.0).unwrap_err();
        assert!(matches!(err, Error::UnsupportedChannelLayout { .. }));
    }

    #[test]
    fn test_boost_zero_band() {
        let booster = AdaptiveBooster::new(BoostParams::default()).unwrap();
        let mut lvl = level(FloatRaster::new(6, 4, 3));
        let out = booster.boost(&mut lvl, Rect::from_size(6, 4)).unwrap();
        assert_eq!(out.peaks, vec![0.0; 3]);
        assert!(out.boost.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_boost_unclipped_is_unsharp_residual() {
        let data: Vec<f32> = (0..25).map(|i| ((i * 7) % 11) as f32 - 5.0).collect();
        let original = FloatRaster::from_data(5, 5, 1, data).unwrap();
        let params = BoostParams {
            clip: 0.0,
            scale: 1.0,
            ..Default::default()
        };
        let booster = AdaptiveBooster::new(params).unwrap();
        let mut lvl = level(original.clone());
        let out = booster.boost(&mut lvl, Rect::from_size(5, 5)).unwrap();

        assert_eq!(lvl.buffer, original);
        let blurred = separable(&original, booster.kernel(), BorderMode::Repeat).unwrap();
        for ((b, o), bl) in out.boost.data().iter().zip(original.data()).zip(blurred.data()) {
            assert_relative_eq!(*b, o - bl, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_boost_rect_mismatch() {
        let booster = AdaptiveBooster::new(BoostParams::default()).unwrap();
        let mut lvl = level(FloatRaster::new(4, 4, 1));
        let err = booster.boost(&mut lvl, Rect::new(1, 0, 4, 4)).unwrap_err();
        assert!(err.is_geometry_error());
    }

    #[test]
    fn test_new_rejects_bad_params() {
        let params = BoostParams {
            blur_a: 0.6,
            ..Default::default()
        };
        assert!(AdaptiveBooster::new(params).is_err());
    }
}
