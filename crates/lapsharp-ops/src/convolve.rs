//! One-dimensional convolution with fixed-point kernels.
//!
//! Kernels are integer taps with an explicit normalization `factor` and an
//! `offset`, applied along one axis:
//!
//! ```text
//! out = sum(taps[i] * in[p + i - r]) / factor + offset
//! ```
//!
//! Two passes (horizontal then vertical) give a separable 2-D filter.
//!
//! # Kernels
//!
//! - [`ConvolutionKernel::binomial5`] - `[1, 4, 6, 4, 1] / 16` pyramid low-pass
//! - [`ConvolutionKernel::sharpening_blur`] - 5-tap booster blur parameterized by `a`
//!
//! # Example
//!
//! ```rust
//! use lapsharp_core::FloatRaster;
//! use lapsharp_ops::convolve::{separable, BorderMode, ConvolutionKernel};
//!
//! let src = FloatRaster::filled(16, 16, &[0.5, 0.5, 0.5]);
//! let kernel = ConvolutionKernel::binomial5();
//! let blurred = separable(&src, &kernel, BorderMode::Repeat).unwrap();
//! assert_eq!(blurred.dimensions(), (16, 16));
//! ```

use lapsharp_core::{Error, FloatRaster, Rect, Result};
use tracing::trace;

/// Fixed-point precision of [`ConvolutionKernel::sharpening_blur`] taps.
///
/// Taps are the real weights times this value, rounded. Steps of `a` that
/// are multiples of `1/800` are represented exactly.
pub const BLUR_TAP_PRECISION: f32 = 16.0;

/// Axis a 1-D kernel runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Width x 1 kernel, runs along rows.
    #[default]
    Horizontal,
    /// 1 x height kernel, runs along columns.
    Vertical,
}

/// How samples outside the source buffer are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Repeat the nearest edge pixel.
    #[default]
    Repeat,
    /// Reflect about the edge pixel (`dcb|abcd|cba`).
    Mirror,
    /// Treat outside samples as zero.
    Zero,
}

impl BorderMode {
    /// Maps a possibly out-of-range index into `0..len`, or `None` for a zero sample.
    #[inline]
    fn resolve(self, p: isize, len: usize) -> Option<usize> {
        let n = len as isize;
        if (0..n).contains(&p) {
            return Some(p as usize);
        }
        match self {
            BorderMode::Repeat => Some(p.clamp(0, n - 1) as usize),
            BorderMode::Mirror => {
                if n == 1 {
                    return Some(0);
                }
                let period = 2 * (n - 1);
                let m = p.rem_euclid(period);
                Some(if m >= n { period - m } else { m } as usize)
            }
            BorderMode::Zero => None,
        }
    }
}

/// Integer 1-D convolution kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvolutionKernel {
    taps: Vec<i32>,
    factor: i32,
    offset: i32,
    orientation: Orientation,
}

impl ConvolutionKernel {
    /// Creates a kernel from explicit taps.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `taps` is empty or even-length, or
    /// `factor` is zero.
    pub fn new(taps: Vec<i32>, factor: i32, offset: i32, orientation: Orientation) -> Result<Self> {
        if taps.is_empty() || taps.len() % 2 == 0 {
            return Err(Error::invalid_parameter(
                "taps",
                format!("kernel length must be odd, got {}", taps.len()),
            ));
        }
        if factor == 0 {
            return Err(Error::invalid_parameter("factor", "normalization factor must be non-zero"));
        }
        Ok(Self {
            taps,
            factor,
            offset,
            orientation,
        })
    }

    /// The `[1, 4, 6, 4, 1] / 16` binomial low-pass used between pyramid levels.
    ///
    /// ```rust
    /// use lapsharp_ops::convolve::ConvolutionKernel;
    ///
    /// let k = ConvolutionKernel::binomial5();
    /// assert_eq!(k.taps(), &[1, 4, 6, 4, 1]);
    /// assert_eq!(k.factor(), 16);
    /// ```
    pub fn binomial5() -> Self {
        Self {
            taps: vec![1, 4, 6, 4, 1],
            factor: 16,
            offset: 0,
            orientation: Orientation::Horizontal,
        }
    }

    /// The booster's 5-tap blur `[25 - 50a, 25, 100a, 25, 25 - 50a]`.
    ///
    /// Normalized by `2 * (k0 + k1) + k2`. `a = 0.5` gives `[0, 1, 2, 1, 0] / 4`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] unless `0 <= a <= 0.5` (outer taps would go
    /// negative above 0.5).
    ///
    /// ```rust
    /// use lapsharp_ops::convolve::ConvolutionKernel;
    ///
    /// let k = ConvolutionKernel::sharpening_blur(0.5).unwrap();
    /// assert_eq!(k.weights(), vec![0.0, 0.25, 0.5, 0.25, 0.0]);
    /// ```
    pub fn sharpening_blur(a: f32) -> Result<Self> {
        if !(0.0..=0.5).contains(&a) {
            return Err(Error::invalid_parameter(
                "blur_a",
                format!("must be within [0, 0.5], got {a}"),
            ));
        }
        let k0 = ((25.0 - 50.0 * a) * BLUR_TAP_PRECISION).round() as i32;
        let k1 = (25.0 * BLUR_TAP_PRECISION) as i32;
        let k2 = (100.0 * a * BLUR_TAP_PRECISION).round() as i32;
        Self::new(vec![k0, k1, k2, k1, k0], 2 * (k0 + k1) + k2, 0, Orientation::Horizontal)
    }

    /// Same taps along the other axis.
    pub fn transposed(&self) -> Self {
        let orientation = match self.orientation {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        };
        Self {
            orientation,
            ..self.clone()
        }
    }

    /// Returns this kernel oriented along `orientation`.
    pub fn oriented(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Integer taps.
    #[inline]
    pub fn taps(&self) -> &[i32] {
        &self.taps
    }

    /// Normalization divisor.
    #[inline]
    pub fn factor(&self) -> i32 {
        self.factor
    }

    /// Value added after normalization.
    #[inline]
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Axis the kernel runs along.
    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Half-length of the kernel.
    #[inline]
    pub fn radius(&self) -> usize {
        self.taps.len() / 2
    }

    /// Effective real weights, `taps / factor`.
    pub fn weights(&self) -> Vec<f32> {
        self.taps
            .iter()
            .map(|&t| t as f32 / self.factor as f32)
            .collect()
    }
}

/// Applies a 1-D kernel over `rect` of `src`.
///
/// The output is `rect.width x rect.height`. Samples the kernel needs
/// outside `rect` are read from `src` when present and produced by
/// `border` past the buffer edge.
///
/// # Errors
///
/// - [`Error::UnsupportedChannelLayout`] if `src` has no channels
/// - [`Error::InvalidRegion`] if `rect` is empty or outside `src`
/// - [`Error::AllocationFailure`] if the output cannot be allocated
pub fn convolve(
    src: &FloatRaster,
    rect: Rect,
    kernel: &ConvolutionKernel,
    border: BorderMode,
) -> Result<FloatRaster> {
    src.check_channels()?;
    src.check_region(rect)?;
    trace!(
        width = rect.width,
        height = rect.height,
        taps = kernel.taps.len(),
        orientation = ?kernel.orientation,
        "convolve"
    );

    let channels = src.channels();
    let mut dst = FloatRaster::try_new(rect.width, rect.height, channels)?;
    let radius = kernel.radius() as isize;
    let factor = kernel.factor as f32;
    let offset = kernel.offset as f32;
    let (src_w, src_h) = (src.width() as usize, src.height() as usize);
    let mut sums = vec![0.0f32; channels];

    for y in 0..rect.height {
        let ay = (rect.y + y) as isize;
        for x in 0..rect.width {
            let ax = (rect.x + x) as isize;
            sums.fill(0.0);

            for (k, &tap) in kernel.taps.iter().enumerate() {
                let shift = k as isize - radius;
                let pos = match kernel.orientation {
                    Orientation::Horizontal => border
                        .resolve(ax + shift, src_w)
                        .map(|sx| (sx as u32, ay as u32)),
                    Orientation::Vertical => border
                        .resolve(ay + shift, src_h)
                        .map(|sy| (ax as u32, sy as u32)),
                };
                let Some((sx, sy)) = pos else {
                    continue;
                };
                let w = tap as f32;
                for (s, v) in sums.iter_mut().zip(src.pixel(sx, sy)) {
                    *s += w * v;
                }
            }

            for (d, s) in dst.pixel_mut(x, y).iter_mut().zip(&sums) {
                *d = s / factor + offset;
            }
        }
    }

    Ok(dst)
}

/// Separable 2-D filter over the whole buffer: `kernel` along rows, then
/// along columns.
///
/// The kernel's own orientation is ignored.
pub fn separable(
    src: &FloatRaster,
    kernel: &ConvolutionKernel,
    border: BorderMode,
) -> Result<FloatRaster> {
    let horizontal = kernel.clone().oriented(Orientation::Horizontal);
    let vertical = kernel.clone().oriented(Orientation::Vertical);
    let temp = convolve(src, src.bounds(), &horizontal, border)?;
    convolve(&temp, temp.bounds(), &vertical, border)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel_validation() {
        assert!(ConvolutionKernel::new(vec![1, 2], 3, 0, Orientation::Horizontal).is_err());
        assert!(ConvolutionKernel::new(vec![], 1, 0, Orientation::Horizontal).is_err());
        assert!(ConvolutionKernel::new(vec![1, 2, 1], 0, 0, Orientation::Horizontal).is_err());
        assert!(ConvolutionKernel::new(vec![1, 2, 1], 4, 0, Orientation::Vertical).is_ok());
    }

    #[test]
    fn test_sharpening_blur_taps() {
        let k = ConvolutionKernel::sharpening_blur(0.5).unwrap();
        assert_eq!(k.taps(), &[0, 400, 800, 400, 0]);
        assert_eq!(k.factor(), 1600);

        let k = ConvolutionKernel::sharpening_blur(0.375).unwrap();
        // 25 - 18.75 = 6.25, 100 * 0.375 = 37.5
        assert_eq!(k.taps(), &[100, 400, 600, 400, 100]);
        assert_eq!(k.factor(), 1600);

        let sum: f32 = k.weights().iter().sum();
        assert_relative_eq!(sum, 1.0);
    }

    #[test]
    fn test_sharpening_blur_rejects_out_of_range() {
        assert!(ConvolutionKernel::sharpening_blur(0.6).is_err());
        assert!(ConvolutionKernel::sharpening_blur(-0.1).is_err());
        assert!(ConvolutionKernel::sharpening_blur(f32::NAN).is_err());
    }

    #[test]
    fn test_convolve_constant() {
        let src = FloatRaster::filled(7, 5, &[0.5, 100.0]);
        let k = ConvolutionKernel::binomial5();
        for border in [BorderMode::Repeat, BorderMode::Mirror] {
            let out = separable(&src, &k, border).unwrap();
            for v in out.data().chunks_exact(2) {
                assert_relative_eq!(v[0], 0.5);
                assert_relative_eq!(v[1], 100.0);
            }
        }
    }

    #[test]
    fn test_zero_border_darkens_edges() {
        let src = FloatRaster::filled(5, 1, &[16.0]);
        let out = convolve(&src, src.bounds(), &ConvolutionKernel::binomial5(), BorderMode::Zero)
            .unwrap();
        // Left edge loses taps 1 and 4 (out of 16)
        assert_relative_eq!(out.sample(0, 0, 0), 11.0);
        assert_relative_eq!(out.sample(2, 0, 0), 16.0);
    }

    #[test]
    fn test_repeat_border_impulse() {
        let mut src = FloatRaster::new(5, 1, 1);
        src.set_sample(0, 0, 0, 16.0);
        let out = convolve(&src, src.bounds(), &ConvolutionKernel::binomial5(), BorderMode::Repeat)
            .unwrap();
        // x=0 sees the edge repeated for offsets -2, -1, 0
        assert_relative_eq!(out.sample(0, 0, 0), 11.0);
        assert_relative_eq!(out.sample(1, 0, 0), 5.0);
        assert_relative_eq!(out.sample(2, 0, 0), 1.0);
    }

    #[test]
    fn test_mirror_resolve() {
        assert_eq!(BorderMode::Mirror.resolve(-1, 4), Some(1));
        assert_eq!(BorderMode::Mirror.resolve(-2, 4), Some(2));
        assert_eq!(BorderMode::Mirror.resolve(4, 4), Some(2));
        assert_eq!(BorderMode::Mirror.resolve(-3, 1), Some(0));
        assert_eq!(BorderMode::Repeat.resolve(9, 4), Some(3));
        assert_eq!(BorderMode::Zero.resolve(-1, 4), None);
    }

    #[test]
    fn test_vertical_pass() {
        let mut src = FloatRaster::new(1, 5, 1);
        src.set_sample(0, 2, 0, 16.0);
        let k = ConvolutionKernel::binomial5().transposed();
        let out = convolve(&src, src.bounds(), &k, BorderMode::Repeat).unwrap();
        let column: Vec<f32> = out.data().to_vec();
        assert_eq!(column, vec![1.0, 4.0, 6.0, 4.0, 1.0]);
    }

    #[test]
    fn test_subrect_reads_outside() {
        let data: Vec<f32> = (0..5).map(|v| v as f32 * 16.0).collect();
        let src = FloatRaster::from_data(5, 1, 1, data).unwrap();
        let k = ConvolutionKernel::new(vec![1, 0, 1], 2, 0, Orientation::Horizontal).unwrap();
        let out = convolve(&src, Rect::new(2, 0, 1, 1), &k, BorderMode::Zero).unwrap();
        // neighbours 16 and 48 come from outside the rect
        assert_relative_eq!(out.sample(0, 0, 0), 32.0);
    }

    #[test]
    fn test_offset_applied() {
        let src = FloatRaster::filled(3, 3, &[2.0]);
        let k = ConvolutionKernel::new(vec![1], 1, 10, Orientation::Horizontal).unwrap();
        let out = convolve(&src, src.bounds(), &k, BorderMode::Repeat).unwrap();
        assert_relative_eq!(out.sample(1, 1, 0), 12.0);
    }
}
