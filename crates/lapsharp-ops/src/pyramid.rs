//! Gaussian and Laplacian pyramids.
//!
//! A pyramid of depth `N` has `N + 1` levels. Level 0 is the region of
//! interest at full resolution; each further level is blurred with the
//! binomial low-pass and decimated by two in each dimension.
//!
//! # Level Geometry
//!
//! Sizes halve with **ceiling** rounding: a 9x7 level is followed by 5x4,
//! then 3x2, 2x1, 1x1, 1x1, ... A level never becomes empty.
//!
//! # Laplacian Levels
//!
//! ```text
//! L[i] = G[i] - upsample(G[i+1])    for i < N
//! L[N] = G[N]                       (terminal copy)
//! ```
//!
//! The terminal level holds absolute intensities, not a residual, so any
//! statistic taken over it describes the coarse image rather than detail.
//! [`Pyramid::reconstruct`] inverts the decomposition.
//!
//! # Example
//!
//! ```rust
//! use lapsharp_core::{Raster, Rect};
//! use lapsharp_ops::pyramid::Pyramid;
//!
//! let src: Raster<u8> = Raster::filled(9, 7, &[100, 50]);
//! let gaussian = Pyramid::gaussian(&src, 2, src.bounds()).unwrap();
//! assert_eq!(gaussian.len(), 3);
//! assert_eq!(gaussian.level(2).unwrap().rect, Rect::new(0, 0, 3, 2));
//!
//! let laplacian = Pyramid::laplacian(&gaussian).unwrap();
//! let restored = laplacian.reconstruct().unwrap();
//! assert_eq!(restored.dimensions(), (9, 7));
//! ```

use crate::arith;
use crate::convolve::{separable, BorderMode, ConvolutionKernel};
use crate::progress::{NoProgress, Progress, ProgressEvent};
use lapsharp_core::{to_float, Error, FloatRaster, Raster, Rect, Result, Sample};
use tracing::{debug, trace};

/// Which decomposition a [`Pyramid`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PyramidKind {
    /// Blurred, downsampled copies of the input.
    Gaussian,
    /// Band-pass residuals plus the terminal coarse level.
    Laplacian,
}

/// One pyramid level.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// Pixel rectangle this level covers, in its own resolution.
    pub rect: Rect,
    /// Float samples, `rect.width x rect.height`.
    pub buffer: FloatRaster,
}

impl Level {
    /// `(width, height)` of the level buffer.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }
}

/// Ordered pyramid levels, finest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Pyramid {
    kind: PyramidKind,
    levels: Vec<Level>,
}

impl Pyramid {
    /// Builds a Gaussian pyramid with `depth + 1` levels over `roi` of `src`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedChannelLayout`] if `src` has zero channels
    /// - [`Error::InvalidRegion`] if `roi` is empty or outside `src`
    /// - [`Error::AllocationFailure`] if a level cannot be allocated
    pub fn gaussian<T: Sample>(src: &Raster<T>, depth: usize, roi: Rect) -> Result<Self> {
        Self::gaussian_with_progress(src, depth, roi, &mut NoProgress)
    }

    /// [`gaussian`](Self::gaussian), reporting each finished level to `progress`.
    pub fn gaussian_with_progress<T: Sample>(
        src: &Raster<T>,
        depth: usize,
        roi: Rect,
        progress: &mut dyn Progress,
    ) -> Result<Self> {
        let total = depth + 1;
        debug!(
            depth,
            width = roi.width,
            height = roi.height,
            channels = src.channels(),
            "building gaussian pyramid"
        );

        let mut levels = Vec::with_capacity(total);
        levels.push(Level {
            rect: roi,
            buffer: to_float(src, roi)?,
        });
        progress.report(ProgressEvent::Level { index: 0, total });

        let kernel = ConvolutionKernel::binomial5();
        for index in 1..total {
            let prev = &levels[index - 1];
            let rect = prev.rect.halved();
            let buffer = downsample_with(&prev.buffer, &kernel)?;
            trace!(level = index, width = rect.width, height = rect.height, "gaussian level");
            levels.push(Level { rect, buffer });
            progress.report(ProgressEvent::Level { index, total });
        }

        Ok(Self {
            kind: PyramidKind::Gaussian,
            levels,
        })
    }

    /// Derives the Laplacian pyramid of a Gaussian pyramid.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if `gaussian` isn't a Gaussian pyramid
    /// - [`Error::SizeMismatch`] if adjacent levels don't follow the halving rule
    /// - [`Error::AllocationFailure`] if a level cannot be allocated
    pub fn laplacian(gaussian: &Pyramid) -> Result<Self> {
        if gaussian.kind != PyramidKind::Gaussian {
            return Err(Error::invalid_parameter(
                "pyramid",
                "laplacian levels derive from a gaussian pyramid",
            ));
        }
        debug!(depth = gaussian.depth(), "building laplacian pyramid");

        let mut levels = Vec::with_capacity(gaussian.len());
        for pair in gaussian.levels.windows(2) {
            let (fine, coarse) = (&pair[0], &pair[1]);
            let (w, h) = fine.dimensions();
            // residual = fine - up(coarse), built in the upsampled buffer
            let mut residual = upsample(&coarse.buffer, w, h)?;
            arith::rsub_assign(&mut residual, &fine.buffer)?;
            levels.push(Level {
                rect: fine.rect,
                buffer: residual,
            });
        }

        let terminal = gaussian.coarsest();
        levels.push(Level {
            rect: terminal.rect,
            buffer: arith::try_clone(&terminal.buffer)?,
        });

        Ok(Self {
            kind: PyramidKind::Laplacian,
            levels,
        })
    }

    /// Collapses a Laplacian pyramid back to its level-0 image.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if this isn't a Laplacian pyramid
    /// - [`Error::SizeMismatch`] if level geometry is inconsistent
    pub fn reconstruct(&self) -> Result<FloatRaster> {
        if self.kind != PyramidKind::Laplacian {
            return Err(Error::invalid_parameter(
                "pyramid",
                "only a laplacian pyramid can be collapsed",
            ));
        }

        let mut acc = arith::try_clone(&self.coarsest().buffer)?;
        for level in self.levels.iter().rev().skip(1) {
            let (w, h) = level.dimensions();
            let mut up = upsample(&acc, w, h)?;
            arith::add_assign(&mut up, &level.buffer)?;
            acc = up;
        }
        Ok(acc)
    }

    /// Which decomposition this is.
    #[inline]
    pub fn kind(&self) -> PyramidKind {
        self.kind
    }

    /// Pyramid depth `N` (the number of halvings).
    #[inline]
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Number of levels, `depth + 1`.
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always `false`; a pyramid has at least its full-resolution level.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level `index`, or `None` past the coarsest level.
    #[inline]
    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Mutable level `index`.
    #[inline]
    pub fn level_mut(&mut self, index: usize) -> Option<&mut Level> {
        self.levels.get_mut(index)
    }

    /// All levels, finest first.
    #[inline]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Level 0.
    #[inline]
    pub fn finest(&self) -> &Level {
        &self.levels[0]
    }

    /// Mutable level 0.
    #[inline]
    pub fn finest_mut(&mut self) -> &mut Level {
        &mut self.levels[0]
    }

    /// Level `N`.
    #[inline]
    pub fn coarsest(&self) -> &Level {
        &self.levels[self.levels.len() - 1]
    }

    /// Consumes the pyramid, returning its levels.
    pub fn into_levels(self) -> Vec<Level> {
        self.levels
    }
}

/// Blurs with the binomial low-pass and keeps every second sample.
///
/// Output is `ceil(w / 2) x ceil(h / 2)`.
pub fn downsample(src: &FloatRaster) -> Result<FloatRaster> {
    downsample_with(src, &ConvolutionKernel::binomial5())
}

fn downsample_with(src: &FloatRaster, kernel: &ConvolutionKernel) -> Result<FloatRaster> {
    let blurred = separable(src, kernel, BorderMode::Repeat)?;
    let (w, h) = (src.width().div_ceil(2), src.height().div_ceil(2));
    let mut out = FloatRaster::try_new(w, h, src.channels())?;
    for y in 0..h {
        for x in 0..w {
            out.pixel_mut(x, y)
                .copy_from_slice(blurred.pixel(x * 2, y * 2));
        }
    }
    Ok(out)
}

/// Bilinear upsampling of a coarse level to `width x height`.
///
/// Coarse sample `j` sits on fine coordinate `2j`; odd fine coordinates
/// average their two coarse neighbours, repeating the edge past the last one.
///
/// # Errors
///
/// [`Error::SizeMismatch`] unless `src` is `ceil(width / 2) x ceil(height / 2)`.
pub fn upsample(src: &FloatRaster, width: u32, height: u32) -> Result<FloatRaster> {
    let expected = (width.div_ceil(2), height.div_ceil(2));
    if src.dimensions() != expected || width == 0 || height == 0 {
        return Err(Error::size_mismatch(src.dimensions(), expected));
    }

    let (cw, ch) = src.dimensions();
    let mut out = FloatRaster::try_new(width, height, src.channels())?;
    for y in 0..height {
        let y0 = y / 2;
        let y1 = (y0 + (y & 1)).min(ch - 1);
        let wy = if y & 1 == 1 { 0.5 } else { 0.0 };
        for x in 0..width {
            let x0 = x / 2;
            let x1 = (x0 + (x & 1)).min(cw - 1);
            let wx = if x & 1 == 1 { 0.5 } else { 0.0 };

            let (p00, p10) = (src.pixel(x0, y0), src.pixel(x1, y0));
            let (p01, p11) = (src.pixel(x0, y1), src.pixel(x1, y1));
            for (c, d) in out.pixel_mut(x, y).iter_mut().enumerate() {
                let top = p00[c] + (p10[c] - p00[c]) * wx;
                let bottom = p01[c] + (p11[c] - p01[c]) * wx;
                *d = top + (bottom - top) * wy;
            }
        }
    }
    Ok(out)
}
