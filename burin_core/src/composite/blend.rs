// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The generic masked blend.
//!
//! Works on any [`Canvas`] in 16-bit premultiplied color, one pixel at a
//! time. The scanline loops in [`fast`](super::fast) cover the common
//! cases; this covers everything else.

use super::Placed;
use crate::color::Rgba64;
use crate::geom::Rect;
use crate::image::Canvas;

/// How a source pixel combines with the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    /// Source over destination, scaled by the mask.
    Over,
    /// Replace the destination with the source scaled by the mask.
    Src,
    /// Scale the destination by the source alpha; the mask is ignored.
    Intersect,
}

const MAX: u64 = 0xffff;

/// Blends `src`, seen through `mask`, into `r` of `dst`.
pub(crate) fn draw_mask(
    dst: &mut dyn Canvas,
    r: Rect,
    src: &Placed<'_, '_>,
    mask: Option<&Placed<'_, '_>>,
    op: Op,
) {
    for y in r.min.y..r.max.y {
        for x in r.min.x..r.max.x {
            let ma = mask.map_or(MAX, |m| u64::from(m.at(x, y).a));
            let out = match op {
                Op::Over => {
                    if ma == 0 {
                        continue;
                    }
                    over(dst.rgba_at(x, y), src.at(x, y), ma)
                }
                Op::Src => scale(src.at(x, y), ma),
                Op::Intersect => scale(dst.rgba_at(x, y), u64::from(src.at(x, y).a)),
            };
            dst.set_rgba(x, y, out);
        }
    }
}

#[inline]
fn scale(c: Rgba64, m: u64) -> Rgba64 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "m is at most MAX, so the product stays in range"
    )]
    let f = |v: u16| (u64::from(v) * m / MAX) as u16;
    Rgba64 {
        r: f(c.r),
        g: f(c.g),
        b: f(c.b),
        a: f(c.a),
    }
}

#[inline]
fn over(d: Rgba64, s: Rgba64, ma: u64) -> Rgba64 {
    let k = MAX - u64::from(s.a) * ma / MAX;
    #[expect(
        clippy::cast_possible_truncation,
        reason = "clamped to MAX"
    )]
    let f = |d: u16, s: u16| ((u64::from(d) * k + u64::from(s) * ma) / MAX).min(MAX) as u16;
    Rgba64 {
        r: f(d.r, s.r),
        g: f(d.g, s.g),
        b: f(d.b, s.b),
        a: f(d.a, s.a),
    }
}
