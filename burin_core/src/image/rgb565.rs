// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The compact on-device color format.

use alloc::vec;
use alloc::vec::Vec;

use bytemuck::{Pod, Zeroable};

use super::Canvas;
use crate::color::Rgba64;
use crate::geom::{Point, Rect};

/// A 16-bit 5:6:5 RGB pixel, stored little-endian.
///
/// The byte order matches what display controllers expect on the wire, so a
/// framebuffer can be handed to the transport with
/// [`Rgb565Image::as_bytes`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(transparent)]
pub struct Rgb565(pub [u8; 2]);

impl Rgb565 {
    /// Packs 8-bit channels, truncating to 5, 6 and 5 bits.
    #[inline]
    #[must_use]
    #[expect(clippy::cast_possible_truncation, reason = "splitting into bytes")]
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        let v = (b as u16) >> 3 | ((g & 0xfc) as u16) << 3 | ((r & 0xf8) as u16) << 8;
        Self([v as u8, (v >> 8) as u8])
    }

    /// Expands to 8-bit channels, replicating the high bits into the low ones.
    #[inline]
    #[must_use]
    #[expect(clippy::cast_possible_truncation, reason = "extracting bit fields")]
    pub const fn to_rgb888(self) -> (u8, u8, u8) {
        let c = (self.0[1] as u16) << 8 | self.0[0] as u16;
        let mut r = (c >> 8) as u8 & 0xf8;
        r |= r >> 5;
        let mut g = (c >> 3) as u8 & 0xfc;
        g |= g >> 6;
        let mut b = (c << 3) as u8;
        b |= b >> 5;
        (r, g, b)
    }
}

impl core::fmt::Debug for Rgb565 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (r, g, b) = self.to_rgb888();
        write!(f, "Rgb565(#{r:02x}{g:02x}{b:02x})")
    }
}

/// An RGB565 framebuffer.
///
/// Allocated once, at start-up.
#[derive(Clone, Debug)]
pub struct Rgb565Image {
    /// Pixels in row-major order.
    pub pix: Vec<Rgb565>,
    /// Distance in pixels between vertically adjacent pixels.
    pub stride: usize,
    /// Image bounds.
    pub rect: Rect,
}

impl Rgb565Image {
    /// Allocates a black image covering `rect`.
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        let w = rect.width().max(0) as usize;
        let h = rect.height().max(0) as usize;
        Self {
            pix: vec![Rgb565::default(); w * h],
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

    /// Returns the pixel at `(x, y)`, or black outside the bounds.
    #[must_use]
    pub fn at(&self, x: i32, y: i32) -> Rgb565 {
        if !self.rect.contains(Point::new(x, y)) {
            return Rgb565::default();
        }
        self.pix[self.pix_offset(x, y)]
    }

    /// Views the pixel data as bytes, ready for a display transport.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pix)
    }
}

impl Canvas for Rgb565Image {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn rgba_at(&self, x: i32, y: i32) -> Rgba64 {
        if !self.rect.contains(Point::new(x, y)) {
            return Rgba64::TRANSPARENT;
        }
        let (r, g, b) = self.at(x, y).to_rgb888();
        Rgba64::from_rgba8(r, g, b, 0xff)
    }

    fn set_rgba(&mut self, x: i32, y: i32, c: Rgba64) {
        if !self.rect.contains(Point::new(x, y)) {
            return;
        }
        let [r, g, b, _] = c.to_rgba8();
        let i = self.pix_offset(x, y);
        self.pix[i] = Rgb565::from_rgb888(r, g, b);
    }

    fn as_rgb565_mut(&mut self) -> Option<&mut Rgb565Image> {
        Some(self)
    }
}
