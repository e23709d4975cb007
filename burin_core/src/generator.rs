// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Procedural pixel sources.
//!
//! A generator is a plain function from a leaf's arguments and a pixel
//! coordinate to a premultiplied color. Generators live in a fixed
//! [`Generators`] table owned by [`Ops`](crate::ops::Ops) and are addressed
//! by [`GeneratorId`], which is what the instruction stream records.
//!
//! Four generators are always present:
//!
//! | Id | Arguments | References | Pixels |
//! |---|---|---|---|
//! | [`UNIFORM`](GeneratorId::UNIFORM) | packed premultiplied color | | the color |
//! | [`GLYPH`](GeneratorId::GLYPH) | code point | [`Ref::Glyphs`] | glyph coverage |
//! | [`FADE`](GeneratorId::FADE) | edge bits, ramp length | | coverage ramping in from the edges |
//! | [`WEDGE`](GeneratorId::WEDGE) | progress in 1/65536 turns | | coverage inside a clockwise sweep from 12 o'clock |

use core::f64::consts::TAU;
use core::fmt;

use kurbo::Vec2;

use crate::color::{Rgba64, unpack_premultiplied};
use crate::config::MAX_GENERATORS;
use crate::geom::{Point, Rect};
use crate::image::Alpha4Image;
use crate::ops::Ref;

/// Supplies glyph bitmaps to the glyph generator.
///
/// Implemented by the font rasterizer. Glyph bitmaps are positioned
/// relative to the pen position.
pub trait GlyphSource {
    /// Returns the coverage bitmap for `ch`, or `None` if the face lacks it.
    fn glyph(&self, ch: char) -> Option<Alpha4Image<'_>>;
}

/// Identifies an entry in a [`Generators`] table.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratorId(pub(crate) u16);

impl GeneratorId {
    /// No generator; the leaf draws a concrete source image.
    pub const NONE: Self = Self(0);
    /// Solid color fill.
    pub const UNIFORM: Self = Self(1);
    /// Glyph coverage.
    pub const GLYPH: Self = Self(2);
    /// Edge fade-out mask.
    pub const FADE: Self = Self(3);
    /// Angular progress mask.
    pub const WEDGE: Self = Self(4);

    const FIRST_FREE: usize = 5;

    /// Raw table index, as recorded in the stream.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NONE => f.write_str("GeneratorId(none)"),
            Self::UNIFORM => f.write_str("GeneratorId(uniform)"),
            Self::GLYPH => f.write_str("GeneratorId(glyph)"),
            Self::FADE => f.write_str("GeneratorId(fade)"),
            Self::WEDGE => f.write_str("GeneratorId(wedge)"),
            Self(i) => write!(f, "GeneratorId({i})"),
        }
    }
}

/// What a generator sees of its leaf.
#[derive(Clone, Copy, Debug)]
pub struct ImageArgs<'s, 'a> {
    /// Leaf bounds in the leaf's own coordinates.
    pub bounds: Rect,
    /// Argument words recorded with the leaf.
    pub args: &'s [u32],
    /// References recorded with the leaf.
    pub refs: &'s [Ref<'a>],
}

/// A pixel generator. Coordinates are in the leaf's own space.
pub type Generator = fn(&ImageArgs<'_, '_>, i32, i32) -> Rgba64;

/// Fixed-capacity generator table.
#[derive(Clone, Debug)]
pub struct Generators {
    table: [Option<Generator>; MAX_GENERATORS],
    len: usize,
}

impl Generators {
    /// Creates a table holding only the built-in generators.
    #[must_use]
    pub fn new() -> Self {
        let mut table = [None; MAX_GENERATORS];
        table[usize::from(GeneratorId::UNIFORM.0)] = Some(uniform as Generator);
        table[usize::from(GeneratorId::GLYPH.0)] = Some(glyph as Generator);
        table[usize::from(GeneratorId::FADE.0)] = Some(fade as Generator);
        table[usize::from(GeneratorId::WEDGE.0)] = Some(wedge as Generator);
        Self {
            table,
            len: GeneratorId::FIRST_FREE,
        }
    }

    /// Adds a generator and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the table is full.
    pub fn register(&mut self, generator: Generator) -> GeneratorId {
        assert!(self.len < MAX_GENERATORS, "generator table is full");
        #[expect(
            clippy::cast_possible_truncation,
            reason = "len is below MAX_GENERATORS, which fits a u16"
        )]
        let id = GeneratorId(self.len as u16);
        self.table[self.len] = Some(generator);
        self.len += 1;
        id
    }

    /// Looks up a generator.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never registered in this table.
    #[must_use]
    pub fn get(&self, id: GeneratorId) -> Generator {
        match self.table.get(usize::from(id.0)).copied().flatten() {
            Some(g) => g,
            None => panic!("unknown generator"),
        }
    }
}

impl Default for Generators {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes the color of a uniform leaf as premultiplied `[r, g, b, a]`.
#[inline]
#[must_use]
pub fn uniform_color(args: &ImageArgs<'_, '_>) -> [u8; 4] {
    unpack_premultiplied(args.args[0])
}

/// Decodes the face and character of a glyph leaf.
#[must_use]
pub fn glyph_args<'a>(args: &ImageArgs<'_, 'a>) -> Option<(&'a dyn GlyphSource, char)> {
    let Ref::Glyphs(face) = args.refs.first().copied()? else {
        return None;
    };
    Some((face, char::from_u32(args.args[0])?))
}

fn uniform(args: &ImageArgs<'_, '_>, _x: i32, _y: i32) -> Rgba64 {
    let [r, g, b, a] = uniform_color(args);
    Rgba64::from_rgba8(r, g, b, a)
}

fn glyph(args: &ImageArgs<'_, '_>, x: i32, y: i32) -> Rgba64 {
    let Some((face, ch)) = glyph_args(args) else {
        return Rgba64::TRANSPARENT;
    };
    let Some(bitmap) = face.glyph(ch) else {
        return Rgba64::TRANSPARENT;
    };
    let a = u16::from(bitmap.alpha_at(x, y));
    Rgba64::coverage(a << 8 | a)
}

/// Edges a fade mask ramps in from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FadeEdges {
    /// Fade at the top edge.
    pub top: bool,
    /// Fade at the bottom edge.
    pub bottom: bool,
    /// Fade at the left edge.
    pub left: bool,
    /// Fade at the right edge.
    pub right: bool,
}

impl FadeEdges {
    /// Top and bottom, as used by vertically scrolling lists.
    pub const VERTICAL: Self = Self {
        top: true,
        bottom: true,
        left: false,
        right: false,
    };

    /// Packs into the fade generator's first argument.
    #[must_use]
    pub const fn to_bits(self) -> u32 {
        self.top as u32
            | (self.bottom as u32) << 1
            | (self.left as u32) << 2
            | (self.right as u32) << 3
    }

    /// Unpacks the fade generator's first argument.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            top: bits & 1 != 0,
            bottom: bits & 2 != 0,
            left: bits & 4 != 0,
            right: bits & 8 != 0,
        }
    }
}

fn fade(args: &ImageArgs<'_, '_>, x: i32, y: i32) -> Rgba64 {
    let edges = FadeEdges::from_bits(args.args[0]);
    let len = args.args[1];
    let b = args.bounds;
    if !b.contains(Point::new(x, y)) {
        return Rgba64::TRANSPARENT;
    }
    // Distances to an edge are non-negative inside the bounds.
    let mut a = 0xffff_u64;
    let mut edge = |enabled: bool, d: i64| {
        let d = d.unsigned_abs();
        if enabled && d < u64::from(len) {
            a = a.min((d + 1) * 0xffff / (u64::from(len) + 1));
        }
    };
    edge(edges.top, i64::from(y) - i64::from(b.min.y));
    edge(edges.bottom, i64::from(b.max.y) - 1 - i64::from(y));
    edge(edges.left, i64::from(x) - i64::from(b.min.x));
    edge(edges.right, i64::from(b.max.x) - 1 - i64::from(x));
    #[expect(
        clippy::cast_possible_truncation,
        reason = "a never exceeds 0xffff"
    )]
    let a = a as u16;
    Rgba64::coverage(a)
}

/// Progress value of a complete wedge turn.
pub const WEDGE_FULL: u32 = 0x1_0000;

fn wedge(args: &ImageArgs<'_, '_>, x: i32, y: i32) -> Rgba64 {
    let progress = args.args[0];
    if progress == 0 || !args.bounds.contains(Point::new(x, y)) {
        return Rgba64::TRANSPARENT;
    }
    if progress >= WEDGE_FULL {
        return Rgba64::OPAQUE;
    }
    let c = args.bounds.to_kurbo().center();
    let d = Vec2::new(f64::from(x) + 0.5 - c.x, f64::from(y) + 0.5 - c.y);
    // Screen y grows downward: rotating by a quarter turn puts zero at
    // 12 o'clock and makes angles increase clockwise.
    let mut theta = Vec2::new(-d.y, d.x).atan2();
    if theta < 0.0 {
        theta += TAU;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "theta is in 0..TAU, so the turn is in 0..=WEDGE_FULL"
    )]
    let turn = (theta / TAU * f64::from(WEDGE_FULL)) as u32;
    if turn < progress {
        Rgba64::OPAQUE
    } else {
        Rgba64::TRANSPARENT
    }
}
