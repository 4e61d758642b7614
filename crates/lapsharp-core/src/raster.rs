//! Multi-channel raster buffers.
//!
//! [`Raster<T>`] is the buffer type for both sides of the pipeline:
//! - `Raster<u8>` / `Raster<u16>` / `Raster<f16>` - native host pixels
//! - [`FloatRaster`] (`Raster<f32>`) - the working format of pyramid levels
//!
//! # Memory Layout
//!
//! Pixels are stored **row-major**, channels interleaved:
//!
//! ```text
//! Memory: [c0 c1 c2 c0 c1 c2 ...]  ← Row 0
//!         [c0 c1 c2 c0 c1 c2 ...]  ← Row 1
//! ```
//!
//! The channel count is a runtime value; color channels and an optional
//! alpha are not distinguished. Every channel is processed the same way.
//!
//! # Region Access
//!
//! Row iterators take a [`Rect`] and yield the channel span of that rect
//! on each row, paired with the absolute row index:
//!
//! ```rust
//! use lapsharp_core::{Raster, Rect};
//!
//! let mut img: Raster<u8> = Raster::new(4, 4, 2);
//! for (_y, row) in img.rows_mut(Rect::new(1, 1, 2, 2)) {
//!     row.fill(9);
//! }
//! assert_eq!(img.pixel(1, 1), &[9, 9]);
//! assert_eq!(img.pixel(0, 0), &[0, 0]);
//! ```

use crate::{Error, Rect, Result, Sample};

/// Owned multi-channel pixel buffer.
#[derive(Clone, PartialEq)]
pub struct Raster<T: Sample> {
    data: Vec<T>,
    width: u32,
    height: u32,
    channels: usize,
}

/// The floating-point working buffer used by pyramid levels.
pub type FloatRaster = Raster<f32>;

/// Computes `width * height * channels`, failing on overflow.
fn sample_count(width: u32, height: u32, channels: usize) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| Error::allocation_failed(usize::MAX, "buffer size overflows usize"))
}

impl<T: Sample> Raster<T> {
    /// Creates a zero-filled raster.
    ///
    /// # Panics
    ///
    /// Panics if `width * height * channels` overflows `usize` or allocation
    /// fails. Use [`try_new`](Self::try_new) where either must be reported
    /// instead.
    pub fn new(width: u32, height: u32, channels: usize) -> Self {
        let len = sample_count(width, height, channels).expect("raster size overflows usize");
        Self {
            data: vec![T::zero(); len],
            width,
            height,
            channels,
        }
    }

    /// Creates a zero-filled raster, reporting allocation failure.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedChannelLayout`] if `channels` is zero
    /// - [`Error::AllocationFailure`] if the buffer cannot be reserved
    pub fn try_new(width: u32, height: u32, channels: usize) -> Result<Self> {
        if channels == 0 {
            return Err(Error::channel_layout(1, 0));
        }
        let len = sample_count(width, height, channels)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| Error::allocation_failed(len, e.to_string()))?;
        data.resize(len, T::zero());
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Creates a raster where every pixel equals `pixel`.
    ///
    /// The channel count is `pixel.len()`.
    ///
    /// # Panics
    ///
    /// Panics if `width * height * pixel.len()` overflows `usize`.
    ///
    /// ```rust
    /// use lapsharp_core::Raster;
    ///
    /// let img: Raster<u8> = Raster::filled(3, 2, &[10, 20, 30]);
    /// assert_eq!(img.channels(), 3);
    /// assert_eq!(img.pixel(2, 1), &[10, 20, 30]);
    /// ```
    pub fn filled(width: u32, height: u32, pixel: &[T]) -> Self {
        let len = sample_count(width, height, pixel.len()).expect("raster size overflows usize");
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(len);
        for _ in 0..count {
            data.extend_from_slice(pixel);
        }
        Self {
            data,
            width,
            height,
            channels: pixel.len(),
        }
    }

    /// Creates a raster from existing interleaved samples.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedChannelLayout`] if `channels` is zero
    /// - [`Error::SizeMismatch`] if `data.len()` isn't `width * height * channels`
    pub fn from_data(width: u32, height: u32, channels: usize, data: Vec<T>) -> Result<Self> {
        if channels == 0 {
            return Err(Error::channel_layout(1, 0));
        }
        let expected = sample_count(width, height, channels)?;
        if data.len() != expected {
            // Report in pixels per row so the mismatch is readable
            let got_rows = (data.len() / (width.max(1) as usize).saturating_mul(channels)) as u32;
            return Err(Error::size_mismatch((width, height), (width, got_rows)));
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Rectangle covering the whole buffer.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns `true` if the raster has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if `other` has the same width, height and channel count.
    #[inline]
    pub fn same_geometry<U: Sample>(&self, other: &Raster<U>) -> bool {
        self.dimensions() == other.dimensions() && self.channels == other.channels()
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw interleaved samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the raster and returns its samples.
    #[inline]
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels
    }

    #[inline]
    fn stride(&self) -> usize {
        self.width as usize * self.channels
    }

    /// Channel samples of pixel (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[T] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let o = self.offset(x, y);
        &self.data[o..o + self.channels]
    }

    /// Mutable channel samples of pixel (x, y).
    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [T] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let o = self.offset(x, y);
        let c = self.channels;
        &mut self.data[o..o + c]
    }

    /// Single sample at (x, y, channel).
    #[inline]
    pub fn sample(&self, x: u32, y: u32, channel: usize) -> T {
        debug_assert!(channel < self.channels);
        self.data[self.offset(x, y) + channel]
    }

    /// Sets a single sample at (x, y, channel).
    #[inline]
    pub fn set_sample(&mut self, x: u32, y: u32, channel: usize, value: T) {
        debug_assert!(channel < self.channels);
        let o = self.offset(x, y) + channel;
        self.data[o] = value;
    }

    /// Full row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &[T] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.stride();
        &self.data[start..start + self.stride()]
    }

    /// Full mutable row `y`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [T] {
        debug_assert!(y < self.height, "row out of bounds");
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    /// Read-only row iterator over `rect`.
    ///
    /// Yields `(y, samples)` where `samples` spans columns `[rect.x, rect.right())`.
    /// `rect` must lie inside [`bounds`](Self::bounds); see [`check_region`](Self::check_region).
    pub fn rows(&self, rect: Rect) -> impl Iterator<Item = (u32, &[T])> + '_ {
        debug_assert!(self.bounds().contains_rect(&rect) || rect.is_empty());
        let start = rect.x as usize * self.channels;
        let end = rect.right() as usize * self.channels;
        (rect.y..rect.bottom()).map(move |y| (y, &self.row(y)[start..end]))
    }

    /// Writable row iterator over `rect`.
    ///
    /// Same contract as [`rows`](Self::rows).
    pub fn rows_mut(&mut self, rect: Rect) -> impl Iterator<Item = (u32, &mut [T])> + '_ {
        debug_assert!(self.bounds().contains_rect(&rect) || rect.is_empty());
        let start = rect.x as usize * self.channels;
        let end = rect.right() as usize * self.channels;
        let stride = self.stride().max(1);
        self.data
            .chunks_exact_mut(stride)
            .skip(rect.y as usize)
            .take(rect.height as usize)
            .enumerate()
            .map(move |(i, row)| (rect.y + i as u32, &mut row[start..end]))
    }

    /// Sets every sample to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Applies `f` to every sample in place.
    pub fn map_samples<F>(&mut self, f: F)
    where
        F: Fn(T) -> T,
    {
        for v in &mut self.data {
            *v = f(*v);
        }
    }

    /// Checks that `rect` is non-empty and lies inside this raster.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegion`] otherwise.
    pub fn check_region(&self, rect: Rect) -> Result<()> {
        if rect.is_empty() || !self.bounds().contains_rect(&rect) {
            return Err(Error::invalid_region(rect, self.width, self.height));
        }
        Ok(())
    }

    /// Checks that the raster carries at least one channel.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedChannelLayout`] if the channel count is zero.
    pub fn check_channels(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(Error::channel_layout(1, 0));
        }
        Ok(())
    }

    /// Checks that `other` has identical width, height and channels.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedChannelLayout`] on channel count disagreement
    /// - [`Error::SizeMismatch`] on dimension disagreement
    pub fn check_same_geometry<U: Sample>(&self, other: &Raster<U>) -> Result<()> {
        if self.channels != other.channels() {
            return Err(Error::channel_layout(self.channels, other.channels()));
        }
        if self.dimensions() != other.dimensions() {
            return Err(Error::size_mismatch(self.dimensions(), other.dimensions()));
        }
        Ok(())
    }
}

impl<T: Sample> std::fmt::Debug for Raster<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("format", &std::any::type_name::<T>())
            .finish()
    }
}
