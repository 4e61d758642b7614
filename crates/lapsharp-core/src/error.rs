//! Error types for lapsharp operations.
//!
//! A single [`Error`] enum covers every failure a sharpening run can hit:
//! - Region checks against buffer bounds
//! - Channel layout checks
//! - Geometry agreement between pipeline stages
//! - Buffer allocation for pyramid levels
//! - Configuration validation
//!
//! None of these are recoverable within one invocation. Callers propagate
//! them with `?` and the filter produces no output.
//!
//! # Usage
//!
//! ```rust
//! use lapsharp_core::{Error, Rect, Result};
//!
//! fn check(rect: Rect, width: u32, height: u32) -> Result<()> {
//!     if !Rect::from_size(width, height).contains_rect(&rect) {
//!         return Err(Error::invalid_region(rect, width, height));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(Rect::new(0, 0, 8, 8), 4, 4).is_err());
//! ```

use crate::Rect;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, boosting or recombining pyramids.
///
/// # Categories
///
/// - **Bounds errors**: [`InvalidRegion`](Error::InvalidRegion)
/// - **Layout errors**: [`UnsupportedChannelLayout`](Error::UnsupportedChannelLayout)
/// - **Geometry errors**: [`SizeMismatch`](Error::SizeMismatch)
/// - **Allocation errors**: [`AllocationFailure`](Error::AllocationFailure)
/// - **Configuration errors**: [`InvalidParameter`](Error::InvalidParameter)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Region of interest is empty or extends beyond buffer bounds.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds buffer bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: u32,
        /// Region Y origin
        ry: u32,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Buffer width
        width: u32,
        /// Buffer height
        height: u32,
    },

    /// Channel count is zero, or two buffers disagree on it.
    #[error("unsupported channel layout: expected {expected}, got {got}")]
    UnsupportedChannelLayout {
        /// Channel count the operation needed
        expected: usize,
        /// Channel count that was supplied
        got: usize,
    },

    /// Two buffers handed between stages have different geometry.
    #[error("size mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    SizeMismatch {
        /// First buffer width
        a_width: u32,
        /// First buffer height
        a_height: u32,
        /// Second buffer width
        b_width: u32,
        /// Second buffer height
        b_height: u32,
    },

    /// A level buffer could not be allocated.
    #[error("failed to allocate {requested} samples: {reason}")]
    AllocationFailure {
        /// Samples requested
        requested: usize,
        /// Failure reason
        reason: String,
    },

    /// A configuration value is out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Why it was rejected
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidRegion`] error for `rect` against a `width`x`height` buffer.
    #[inline]
    pub fn invalid_region(rect: Rect, width: u32, height: u32) -> Self {
        Self::InvalidRegion {
            rx: rect.x,
            ry: rect.y,
            rw: rect.width,
            rh: rect.height,
            width,
            height,
        }
    }

    /// Creates an [`Error::UnsupportedChannelLayout`] error.
    #[inline]
    pub fn channel_layout(expected: usize, got: usize) -> Self {
        Self::UnsupportedChannelLayout { expected, got }
    }

    /// Creates an [`Error::SizeMismatch`] error.
    #[inline]
    pub fn size_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::SizeMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates an [`Error::AllocationFailure`] error.
    #[inline]
    pub fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailure {
            requested,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::InvalidParameter`] error.
    #[inline]
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::InvalidRegion { .. })
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailure { .. })
    }

    /// Returns `true` if two stages disagreed on buffer geometry.
    #[inline]
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Self::SizeMismatch { .. })
    }
}
