// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanline loops for an RGB565 destination.
//!
//! These recognize the shapes a device UI draws most: opaque solid fills,
//! paletted icons, and solid color through an 8-bit or 4-bit alpha mask
//! (the latter being text). Blending happens in 8-bit premultiplied color,
//! `d * (255 - a) / 255 + s`, which is exact enough for a 16-bit panel.

use super::{Pixels, Placed};
use crate::generator::{GeneratorId, glyph_args, uniform_color};
use crate::geom::{Point, Rect};
use crate::image::{
    Alpha4Image, AlphaImage, ImageRef, PalettedImage, Rgb565, Rgb565Image, nibble,
};

/// Draws `src` through `mask` if a specialized loop applies.
///
/// Returns `false`, having touched nothing, otherwise.
pub(crate) fn try_draw(
    fb: &mut Rgb565Image,
    clip: Rect,
    src: &Placed<'_, '_>,
    mask: Option<&Placed<'_, '_>>,
) -> bool {
    if !fb.rect.contains_rect(clip) {
        return false;
    }
    match (mask, src.pixels) {
        (
            None,
            Pixels::Generated {
                id: GeneratorId::UNIFORM,
                args,
                ..
            },
        ) => {
            let [r, g, b, a] = uniform_color(&args);
            if a != 0xff {
                return false;
            }
            fill(fb, clip, Rgb565::from_rgb888(r, g, b));
            true
        }
        (None, Pixels::Image(ImageRef::Paletted(img))) => paletted_over(fb, clip, img, src.origin),
        (
            Some(mask),
            Pixels::Generated {
                id: GeneratorId::UNIFORM,
                args,
                ..
            },
        ) => {
            let color = uniform_color(&args);
            match mask.pixels {
                Pixels::Image(ImageRef::Alpha4(m)) => alpha4_over(fb, clip, color, m, mask.origin),
                Pixels::Generated {
                    id: GeneratorId::GLYPH,
                    args,
                    ..
                } => match glyph_args(&args).and_then(|(face, ch)| face.glyph(ch)) {
                    Some(m) => alpha4_over(fb, clip, color, &m, mask.origin),
                    None => false,
                },
                Pixels::Image(ImageRef::Alpha(m)) => alpha8_over(fb, clip, color, m, mask.origin),
                Pixels::Scratch(m) => alpha8_over(fb, clip, color, m, mask.origin),
                _ => false,
            }
        }
        _ => false,
    }
}

fn fill(fb: &mut Rgb565Image, clip: Rect, c: Rgb565) {
    let w = clip.width() as usize;
    for y in clip.min.y..clip.max.y {
        let off = fb.pix_offset(clip.min.x, y);
        fb.pix[off..off + w].fill(c);
    }
}

fn paletted_over(fb: &mut Rgb565Image, clip: Rect, img: &PalettedImage<'_>, origin: Point) -> bool {
    let sr = clip.translate(Point::ZERO - origin);
    if !img.rect.contains_rect(sr) {
        return false;
    }
    let w = clip.width() as usize;
    for y in 0..clip.height() {
        let d0 = fb.pix_offset(clip.min.x, clip.min.y + y);
        let s0 = img.pix_offset(sr.min.x, sr.min.y + y);
        let src = &img.pix[s0..s0 + w];
        for (px, &i) in fb.pix[d0..d0 + w].iter_mut().zip(src) {
            let (c, a) = img.entry(i);
            if a == 0 {
                continue;
            }
            let (r, g, b) = c.to_rgb888();
            *px = over(*px, [r, g, b, a]);
        }
    }
    true
}

fn alpha4_over(
    fb: &mut Rgb565Image,
    clip: Rect,
    color: [u8; 4],
    mask: &Alpha4Image<'_>,
    origin: Point,
) -> bool {
    let mr = clip.translate(Point::ZERO - origin);
    if !mask.rect.contains_rect(mr) {
        return false;
    }
    let w = clip.width() as usize;
    for y in 0..clip.height() {
        let d0 = fb.pix_offset(clip.min.x, clip.min.y + y);
        let m0 = mask.pix_offset(mr.min.x, mr.min.y + y);
        for (x, px) in fb.pix[d0..d0 + w].iter_mut().enumerate() {
            let i = m0 + x;
            let a = nibble(i, mask.pix[i / 2]);
            if a != 0 {
                *px = over(*px, scale(color, a));
            }
        }
    }
    true
}

fn alpha8_over(
    fb: &mut Rgb565Image,
    clip: Rect,
    color: [u8; 4],
    mask: &AlphaImage,
    origin: Point,
) -> bool {
    let mr = clip.translate(Point::ZERO - origin);
    if !mask.rect.contains_rect(mr) {
        return false;
    }
    let w = clip.width() as usize;
    for y in 0..clip.height() {
        let d0 = fb.pix_offset(clip.min.x, clip.min.y + y);
        let m0 = mask.pix_offset(mr.min.x, mr.min.y + y);
        let m = &mask.pix[m0..m0 + w];
        for (px, &a) in fb.pix[d0..d0 + w].iter_mut().zip(m) {
            if a != 0 {
                *px = over(*px, scale(color, a));
            }
        }
    }
    true
}

#[inline]
#[expect(
    clippy::cast_possible_truncation,
    reason = "v * a / 0xff never exceeds 0xff"
)]
fn scale(c: [u8; 4], a: u8) -> [u8; 4] {
    let a = u16::from(a);
    c.map(|v| (u16::from(v) * a / 0xff) as u8)
}

/// Premultiplied `s` over `d`.
#[inline]
#[expect(
    clippy::cast_possible_truncation,
    reason = "d * k / 0xff never exceeds 0xff"
)]
fn over(d: Rgb565, s: [u8; 4]) -> Rgb565 {
    let (dr, dg, db) = d.to_rgb888();
    let k = 0xff - u16::from(s[3]);
    let f = |d: u8, s: u8| ((u16::from(d) * k / 0xff) as u8).saturating_add(s);
    Rgb565::from_rgb888(f(dr, s[0]), f(dg, s[1]), f(db, s[2]))
}
