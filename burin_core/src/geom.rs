// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer pixel geometry.
//!
//! All coordinates in the engine are whole device pixels. [`Rect`] is
//! half-open (`min` inclusive, `max` exclusive), and follows the usual
//! raster conventions for set operations:
//!
//! - [`intersect`](Rect::intersect) of disjoint rectangles is [`Rect::ZERO`].
//! - [`union`](Rect::union) ignores empty operands, so `ZERO` is the
//!   identity for accumulating damage.
//!
//! Platform code that works in floating point can convert with
//! [`Rect::to_kurbo`].

use core::fmt;
use core::ops::{Add, Sub};

/// A pixel position or displacement.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: i32,
    /// Vertical coordinate, growing downwards.
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Creates a point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.wrapping_add(rhs.x), self.y.wrapping_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x.wrapping_sub(rhs.x), self.y.wrapping_sub(rhs.y))
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// An axis-aligned, half-open pixel rectangle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Top-left corner (inclusive).
    pub min: Point,
    /// Bottom-right corner (exclusive).
    pub max: Point,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self {
        min: Point::ZERO,
        max: Point::ZERO,
    };

    /// A rectangle large enough to contain any display.
    ///
    /// Used as the bounds of unbounded leaves such as solid fills, and as the
    /// root clip when no destination is involved.
    pub const EVERYTHING: Self = Self {
        min: Point::new(-1_000_000_000, -1_000_000_000),
        max: Point::new(1_000_000_000, 1_000_000_000),
    };

    /// Creates a rectangle from its edge coordinates, normalizing so that
    /// `min <= max` on both axes.
    #[must_use]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (x0, x1) = if x0 > x1 { (x1, x0) } else { (x0, x1) };
        let (y0, y1) = if y0 > y1 { (y1, y0) } else { (y0, y1) };
        Self {
            min: Point::new(x0, y0),
            max: Point::new(x1, y1),
        }
    }

    /// Creates a rectangle from an origin and a size.
    #[must_use]
    pub const fn from_origin_size(origin: Point, width: i32, height: i32) -> Self {
        Self::new(origin.x, origin.y, origin.x + width, origin.y + height)
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    /// Returns `(width, height)` as a point.
    #[inline]
    #[must_use]
    pub const fn size(self) -> Point {
        Point::new(self.width(), self.height())
    }

    /// Returns `true` if the rectangle contains no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Returns `true` if `p` lies inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(self, p: Point) -> bool {
        self.min.x <= p.x && p.x < self.max.x && self.min.y <= p.y && p.y < self.max.y
    }

    /// Returns `true` if every pixel of `other` is inside `self`.
    ///
    /// The empty rectangle is inside everything.
    #[must_use]
    pub fn contains_rect(self, other: Self) -> bool {
        other.is_empty()
            || (self.min.x <= other.min.x
                && self.min.y <= other.min.y
                && other.max.x <= self.max.x
                && other.max.y <= self.max.y)
    }

    /// Returns the largest rectangle inside both `self` and `other`, or
    /// [`Rect::ZERO`] if they do not overlap.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        let r = Self {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if r.is_empty() { Self::ZERO } else { r }
    }

    /// Returns the smallest rectangle containing both `self` and `other`.
    ///
    /// Empty operands are ignored.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Translates the rectangle by `d`.
    #[inline]
    #[must_use]
    pub fn translate(self, d: Point) -> Self {
        Self {
            min: self.min + d,
            max: self.max + d,
        }
    }

    /// Converts to a floating-point [`kurbo::Rect`].
    #[must_use]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.min.x),
            f64::from(self.min.y),
            f64::from(self.max.x),
            f64::from(self.max.y),
        )
    }
}

impl From<Rect> for kurbo::Rect {
    fn from(r: Rect) -> Self {
        r.to_kurbo()
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}-{:?}", self.min, self.max)
    }
}
