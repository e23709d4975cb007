// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packed 4-bit alpha bitmaps.

use crate::geom::{Point, Rect};

/// A borrowed coverage bitmap with two 4-bit pixels per byte.
///
/// The even pixel of each pair occupies the high nibble. Glyph bitmaps are
/// stored in this format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Alpha4Image<'p> {
    /// Packed coverage, row-major without row padding.
    pub pix: &'p [u8],
    /// Bitmap bounds.
    pub rect: Rect,
}

impl<'p> Alpha4Image<'p> {
    /// Wraps packed pixel data.
    ///
    /// # Panics
    ///
    /// Panics if `pix` is too short for `rect`.
    #[must_use]
    pub fn new(pix: &'p [u8], rect: Rect) -> Self {
        let n = rect.width().max(0) as usize * rect.height().max(0) as usize;
        assert!(pix.len() >= n.div_ceil(2), "alpha4 pixel data too short");
        Self { pix, rect }
    }

    /// Pixel index (not byte index) of `(x, y)`.
    #[inline]
    #[must_use]
    pub fn pix_offset(&self, x: i32, y: i32) -> usize {
        let off = Point::new(x, y) - self.rect.min;
        off.y as usize * self.rect.width() as usize + off.x as usize
    }

    /// Coverage at `(x, y)` expanded to 8 bits; zero outside the bounds.
    #[inline]
    #[must_use]
    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        if !self.rect.contains(Point::new(x, y)) {
            return 0;
        }
        let i = self.pix_offset(x, y);
        nibble(i, self.pix[i / 2])
    }
}

/// Extracts pixel `i`'s coverage from its byte, expanded to 8 bits.
#[inline]
#[must_use]
pub fn nibble(i: usize, pair: u8) -> u8 {
    let shift = if i & 1 == 0 { 4 } else { 0 };
    let a = (pair >> shift) & 0x0f;
    a << 4 | a
}
