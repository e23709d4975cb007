// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel surfaces.
//!
//! Sources and masks are borrowed through [`ImageRef`], which is what the
//! recorder stores in a frame. Destinations implement [`Canvas`]; the
//! compositor asks a canvas for its [`Rgb565Image`] view to decide whether
//! the specialized scanline loops apply.

mod alpha;
mod alpha4;
mod paletted;
mod rgb565;

pub use alpha::AlphaImage;
pub use alpha4::{Alpha4Image, nibble};
pub use paletted::{PalettedImage, palette_entry};
pub use rgb565::{Rgb565, Rgb565Image};

use crate::color::Rgba64;
use crate::geom::Rect;

/// A destination surface for the compositor.
pub trait Canvas {
    /// Surface bounds.
    fn bounds(&self) -> Rect;

    /// Reads back the color at `(x, y)`.
    fn rgba_at(&self, x: i32, y: i32) -> Rgba64;

    /// Stores a color at `(x, y)`; writes outside the bounds are ignored.
    fn set_rgba(&mut self, x: i32, y: i32, c: Rgba64);

    /// Returns the surface as an RGB565 framebuffer, if it is one.
    fn as_rgb565_mut(&mut self) -> Option<&mut Rgb565Image> {
        None
    }
}

/// A borrowed source image.
///
/// Two `ImageRef`s are the same image only if they point at the same
/// object; pixel contents are never compared.
#[derive(Clone, Copy, Debug)]
pub enum ImageRef<'a> {
    /// A full-color framebuffer-format image.
    Rgb565(&'a Rgb565Image),
    /// An 8-bit coverage image.
    Alpha(&'a AlphaImage),
    /// A 4-bit coverage bitmap.
    Alpha4(&'a Alpha4Image<'a>),
    /// An indexed-color image.
    Paletted(&'a PalettedImage<'a>),
}

impl ImageRef<'_> {
    /// Image bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rgb565(img) => img.rect,
            Self::Alpha(img) => img.rect,
            Self::Alpha4(img) => img.rect,
            Self::Paletted(img) => img.rect,
        }
    }

    /// Color at `(x, y)`. Coverage images report their coverage on every
    /// channel.
    #[must_use]
    pub fn rgba_at(&self, x: i32, y: i32) -> Rgba64 {
        match self {
            Self::Rgb565(img) => img.rgba_at(x, y),
            Self::Alpha(img) => img.rgba_at(x, y),
            Self::Alpha4(img) => {
                let a = u16::from(img.alpha_at(x, y));
                Rgba64::coverage(a << 8 | a)
            }
            Self::Paletted(img) => img.rgba_at(x, y),
        }
    }

    /// Identity comparison.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Rgb565(a), Self::Rgb565(b)) => core::ptr::eq(*a, *b),
            (Self::Alpha(a), Self::Alpha(b)) => core::ptr::eq(*a, *b),
            (Self::Alpha4(a), Self::Alpha4(b)) => core::ptr::eq(*a, *b),
            (Self::Paletted(a), Self::Paletted(b)) => core::ptr::eq(*a, *b),
            _ => false,
        }
    }
}
