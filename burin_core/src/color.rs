// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color types.
//!
//! Generators and surfaces exchange [`Rgba64`], a premultiplied color with
//! 16 bits per channel. Callers specify colors as straight-alpha [`Nrgba`].

/// A premultiplied RGBA color with 16-bit channels.
///
/// Every color channel is at most `a`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rgba64 {
    /// Red, premultiplied.
    pub r: u16,
    /// Green, premultiplied.
    pub g: u16,
    /// Blue, premultiplied.
    pub b: u16,
    /// Alpha.
    pub a: u16,
}

impl Rgba64 {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Fully opaque white; as a mask this lets everything through.
    pub const OPAQUE: Self = Self {
        r: 0xffff,
        g: 0xffff,
        b: 0xffff,
        a: 0xffff,
    };

    /// A mask value with the given 16-bit coverage on every channel.
    #[inline]
    #[must_use]
    pub const fn coverage(a: u16) -> Self {
        Self { r: a, g: a, b: a, a }
    }

    /// Widens a premultiplied 8-bit color.
    #[inline]
    #[must_use]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: widen(r),
            g: widen(g),
            b: widen(b),
            a: widen(a),
        }
    }

    /// Narrows to premultiplied 8-bit channels `[r, g, b, a]`.
    #[inline]
    #[must_use]
    #[expect(clippy::cast_possible_truncation, reason = "keeps the high byte")]
    pub const fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r >> 8) as u8,
            (self.g >> 8) as u8,
            (self.b >> 8) as u8,
            (self.a >> 8) as u8,
        ]
    }
}

/// A straight (non-premultiplied) 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Nrgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Nrgba {
    /// Creates a color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque color.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Premultiplies and packs into one word as `r << 24 | g << 16 | b << 8 | a`.
    ///
    /// This is the argument layout of the uniform fill generator.
    #[must_use]
    pub const fn pack_premultiplied(self) -> u32 {
        let a = self.a as u32;
        let r = self.r as u32 * a / 0xff;
        let g = self.g as u32 * a / 0xff;
        let b = self.b as u32 * a / 0xff;
        r << 24 | g << 16 | b << 8 | a
    }
}

/// Unpacks a word produced by [`Nrgba::pack_premultiplied`] into
/// premultiplied `[r, g, b, a]`.
#[inline]
#[must_use]
#[expect(clippy::cast_possible_truncation, reason = "splitting into bytes")]
pub const fn unpack_premultiplied(w: u32) -> [u8; 4] {
    [(w >> 24) as u8, (w >> 16) as u8, (w >> 8) as u8, w as u8]
}

#[inline]
const fn widen(v: u8) -> u16 {
    (v as u16) << 8 | v as u16
}
