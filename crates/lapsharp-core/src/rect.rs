//! Rectangle / region of interest type.
//!
//! All coordinates use the standard image convention:
//! - Origin (0, 0) is at the **top-left** corner
//! - X increases to the right
//! - Y increases downward
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐
//!   │   │   ROI    │
//!   │   └──────────┘
//!   ▼
//!   Y
//! ```
//!
//! # Usage
//!
//! ```rust
//! use lapsharp_core::Rect;
//!
//! let rect = Rect::new(10, 20, 100, 50);
//! assert!(rect.contains(15, 25));
//! assert!(!rect.contains(5, 25));
//!
//! // Pyramid levels halve with ceiling rounding
//! assert_eq!(Rect::new(0, 0, 7, 5).halved(), Rect::new(0, 0, 4, 3));
//! ```

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// Left/top edges are inclusive, right/bottom edges exclusive. A rectangle
/// with zero width or height is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: u32,
    /// Y coordinate of the top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at origin (0, 0) with the given dimensions.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive), saturating on overflow.
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive), saturating on overflow.
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Returns `(width, height)`.
    #[inline]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Area in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Returns `true` if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if the point (px, py) is inside this rectangle.
    ///
    /// ```rust
    /// use lapsharp_core::Rect;
    ///
    /// let rect = Rect::new(10, 10, 100, 100);
    /// assert!(rect.contains(10, 10));
    /// assert!(rect.contains(109, 109));
    /// assert!(!rect.contains(110, 110));
    /// ```
    #[inline]
    pub const fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Returns `true` if this rectangle fully contains `other`.
    ///
    /// Overflowing rectangles (origin + size past `u32::MAX`) are never contained.
    #[inline]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        let fits_x = match other.x.checked_add(other.width) {
            Some(r) => r <= self.right(),
            None => false,
        };
        let fits_y = match other.y.checked_add(other.height) {
            Some(b) => b <= self.bottom(),
            None => false,
        };
        other.x >= self.x && other.y >= self.y && fits_x && fits_y
    }

    /// Returns the intersection with `other`, or `None` if they don't overlap.
    ///
    /// ```rust
    /// use lapsharp_core::Rect;
    ///
    /// let a = Rect::new(0, 0, 100, 100);
    /// let b = Rect::new(50, 50, 100, 100);
    /// assert_eq!(a.intersect(&b), Some(Rect::new(50, 50, 50, 50)));
    /// ```
    #[inline]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Returns this rectangle moved to origin (0, 0), keeping its size.
    #[inline]
    pub const fn at_origin(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// The rectangle one pyramid level down.
    ///
    /// Origin is floor-halved, size is ceil-halved, so a level never
    /// collapses to zero while its parent is non-empty.
    #[inline]
    pub const fn halved(&self) -> Rect {
        Rect::new(
            self.x / 2,
            self.y / 2,
            self.width.div_ceil(2),
            self.height.div_ceil(2),
        )
    }

    /// Iterates all (x, y) coordinates row by row.
    ///
    /// ```rust
    /// use lapsharp_core::Rect;
    ///
    /// let coords: Vec<_> = Rect::new(0, 0, 2, 2).iter_coords().collect();
    /// assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    /// ```
    #[inline]
    pub fn iter_coords(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| (x, y)))
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_rect() {
        let outer = Rect::new(0, 0, 100, 100);
        assert!(outer.contains_rect(&Rect::new(10, 10, 50, 50)));
        assert!(outer.contains_rect(&outer));
        assert!(!outer.contains_rect(&Rect::new(60, 60, 50, 50)));
        assert!(!outer.contains_rect(&Rect::new(u32::MAX, 0, 2, 2)));
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 10, 10);
        assert_eq!(a.intersect(&b), None);
    }

    #[test]
    fn test_halved_odd() {
        assert_eq!(Rect::new(0, 0, 9, 7).halved(), Rect::new(0, 0, 5, 4));
        assert_eq!(Rect::new(3, 5, 1, 1).halved(), Rect::new(1, 2, 1, 1));
        assert_eq!(Rect::new(0, 0, 8, 8).halved().halved(), Rect::new(0, 0, 2, 2));
    }

    #[test]
    fn test_empty() {
        assert!(Rect::new(5, 5, 0, 10).is_empty());
        assert!(!Rect::from_size(1, 1).is_empty());
        assert_eq!(Rect::new(1, 2, 3, 4).area(), 12);
    }
}
