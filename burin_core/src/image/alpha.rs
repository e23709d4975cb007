// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 8-bit alpha surfaces.

use alloc::vec;
use alloc::vec::Vec;

use super::Canvas;
use crate::color::Rgba64;
use crate::geom::{Point, Rect};

/// A single-channel 8-bit coverage image.
///
/// The compositor uses one as scratch space to flatten stacked masks.
#[derive(Clone, Debug)]
pub struct AlphaImage {
    /// Coverage values in row-major order.
    pub pix: Vec<u8>,
    /// Distance in pixels between vertically adjacent pixels.
    pub stride: usize,
    /// Image bounds.
    pub rect: Rect,
}

impl AlphaImage {
    /// Allocates a transparent image covering `rect`.
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        let w = rect.width().max(0) as usize;
        let h = rect.height().max(0) as usize;
        Self {
            pix: vec![0; w * h],
            stride: w,
            rect,
        }
    }

    /// Index into [`pix`](Self::pix) of the pixel at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn pix_offset(&self, x: i32, y: i32) -> usize {
        let off = Point::new(x, y) - self.rect.min;
        off.y as usize * self.stride + off.x as usize
    }

    /// Coverage at `(x, y)`; zero outside the bounds.
    #[inline]
    #[must_use]
    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        if !self.rect.contains(Point::new(x, y)) {
            return 0;
        }
        self.pix[self.pix_offset(x, y)]
    }
}

impl Canvas for AlphaImage {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn rgba_at(&self, x: i32, y: i32) -> Rgba64 {
        let a = u16::from(self.alpha_at(x, y));
        Rgba64::coverage(a << 8 | a)
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "keeps the high byte"
    )]
    fn set_rgba(&mut self, x: i32, y: i32, c: Rgba64) {
        if !self.rect.contains(Point::new(x, y)) {
            return;
        }
        let i = self.pix_offset(x, y);
        self.pix[i] = (c.a >> 8) as u8;
    }
}
