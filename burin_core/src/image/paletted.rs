// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indexed-color images with a compact palette.

use super::rgb565::Rgb565;
use crate::color::Rgba64;
use crate::geom::{Point, Rect};

/// A borrowed 8-bit indexed image.
///
/// Each palette entry is three bytes: a little-endian [`Rgb565`] color
/// premultiplied by the entry's alpha, followed by that alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PalettedImage<'p> {
    /// One palette index per pixel, row-major.
    pub pix: &'p [u8],
    /// Image bounds.
    pub rect: Rect,
    /// Packed palette entries.
    pub palette: &'p [u8],
}

impl<'p> PalettedImage<'p> {
    /// Wraps indexed pixel data and its palette.
    ///
    /// # Panics
    ///
    /// Panics if `pix` is too short for `rect`.
    #[must_use]
    pub fn new(pix: &'p [u8], rect: Rect, palette: &'p [u8]) -> Self {
        let n = rect.width().max(0) as usize * rect.height().max(0) as usize;
        assert!(pix.len() >= n, "paletted pixel data too short");
        Self { pix, rect, palette }
    }

    /// Index into [`pix`](Self::pix) of the pixel at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn pix_offset(&self, x: i32, y: i32) -> usize {
        let off = Point::new(x, y) - self.rect.min;
        off.y as usize * self.rect.width() as usize + off.x as usize
    }

    /// Returns palette entry `i` as a premultiplied color and its alpha.
    ///
    /// Indices past the end of the palette are transparent.
    #[inline]
    #[must_use]
    pub fn entry(&self, i: u8) -> (Rgb565, u8) {
        let start = usize::from(i) * 3;
        match self.palette.get(start..start + 3) {
            Some(e) => (Rgb565([e[0], e[1]]), e[2]),
            None => (Rgb565([0, 0]), 0),
        }
    }

    /// Color at `(x, y)`; transparent outside the bounds.
    #[must_use]
    pub fn rgba_at(&self, x: i32, y: i32) -> Rgba64 {
        if !self.rect.contains(Point::new(x, y)) {
            return Rgba64::TRANSPARENT;
        }
        let (c, a) = self.entry(self.pix[self.pix_offset(x, y)]);
        let (r, g, b) = c.to_rgb888();
        Rgba64::from_rgba8(r, g, b, a)
    }
}

/// Encodes one palette entry for a straight-alpha color.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "c * a / 0xff never exceeds 0xff"
)]
pub fn palette_entry(r: u8, g: u8, b: u8, a: u8) -> [u8; 3] {
    let pm = |c: u8| (u16::from(c) * u16::from(a) / 0xff) as u8;
    let c = Rgb565::from_rgb888(pm(r), pm(g), pm(b));
    [c.0[0], c.0[1], a]
}
