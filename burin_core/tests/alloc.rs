// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A steady-state frame must not touch the heap.
//!
//! This file holds a single test so that no other test thread allocates
//! while the region is being measured.

use std::alloc::System;

use burin_core::color::Nrgba;
use burin_core::generator::{FadeEdges, GlyphSource, WEDGE_FULL};
use burin_core::geom::{Point, Rect};
use burin_core::image::{Alpha4Image, AlphaImage, ImageRef, Rgb565Image};
use burin_core::ops::{MaskKind, Ops, Tag};
use stats_alloc::{INSTRUMENTED_SYSTEM, Region, StatsAlloc};

#[global_allocator]
static GLOBAL: &StatsAlloc<System> = &INSTRUMENTED_SYSTEM;

const SCREEN: Rect = Rect::new(0, 0, 64, 48);

struct Blocky([u8; 8]);

impl GlyphSource for Blocky {
    fn glyph(&self, ch: char) -> Option<Alpha4Image<'_>> {
        ch.is_ascii_graphic()
            .then(|| Alpha4Image::new(&self.0, Rect::new(0, -4, 4, 0)))
    }
}

struct Fixed {
    buf: [u8; 32],
    len: usize,
}

impl core::fmt::Write for Fixed {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let end = self.len + s.len();
        if end > self.buf.len() {
            return Err(core::fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

fn record<'a>(ops: &mut Ops<'a>, face: &'a Blocky, icon: &'a AlphaImage, frame: i32) {
    let mut ctx = ops.context();
    ctx.color(Nrgba::opaque(0x20, 0x20, 0x20));

    let mut label = ctx.begin();
    for (i, ch) in (0..).zip("OK".chars()) {
        let mut g = label.begin();
        g.offset(Point::new(i * 5, 6));
        g.glyph(face, ch);
        g.color(Nrgba::opaque(0xff, 0xff, 0xff));
        let call = label.end();
        call.add(&mut label);
    }
    let label = ctx.end();

    // A button that slides one pixel per frame.
    let mut button = ctx.begin();
    button.clip(Rect::new(0, 0, 20, 10));
    button.color(Nrgba::new(0x40, 0x80, 0xff, 0xc0));
    label.add(&mut button);
    button.clip(Rect::new(0, 0, 20, 10));
    button.input(Tag(7));
    let button = ctx.end();
    ctx.position(&button, Point::new(4 + frame % 8, 4));

    ctx.offset(Point::new(30, 20));
    ctx.fade(Rect::new(0, 0, 16, 16), FadeEdges::VERTICAL, 4, MaskKind::Intersect);
    ctx.image(ImageRef::Alpha(icon), MaskKind::Intersect);
    ctx.color(Nrgba::opaque(0xff, 0x80, 0));

    ctx.offset(Point::new(-20, 10));
    ctx.wedge(Rect::new(0, 0, 12, 12), WEDGE_FULL / 8 * (frame as u32 % 8));
    ctx.color(Nrgba::opaque(0, 0xff, 0));
}

#[test]
fn steady_state_frame_does_not_allocate() {
    let face = Blocky([0xff, 0xf0, 0x0f, 0xff, 0x88, 0x88, 0xff, 0xff]);
    let mut icon = AlphaImage::new(Rect::new(0, 0, 16, 16));
    for (a, v) in icon.pix.iter_mut().zip((0..=u8::MAX).cycle().step_by(7)) {
        *a = v;
    }
    let mut ops = Ops::new();
    let mut fb = Rgb565Image::new(SCREEN);
    let mut scratch = AlphaImage::new(SCREEN);
    let mut text = Fixed {
        buf: [0; 32],
        len: 0,
    };

    // Warm up so both streams have been through a full cycle.
    for frame in 0..2 {
        ops.reset();
        record(&mut ops, &face, &icon, frame);
        let damage = ops.damage(SCREEN);
        ops.draw_clipped(&mut fb, &mut scratch, damage);
    }

    let region = Region::new(GLOBAL);
    let mut hits = 0;
    for frame in 2..10 {
        ops.reset();
        record(&mut ops, &face, &icon, frame);
        let damage = ops.damage(SCREEN);
        let mut y = damage.min.y;
        while y < damage.max.y {
            let band = Rect::new(damage.min.x, y, damage.max.x, (y + 8).min(damage.max.y));
            ops.draw_clipped(&mut fb, &mut scratch, band);
            y = band.max.y;
        }
        // The button spans x 4..24 at its leftmost and 11..31 at its
        // rightmost; 12 is inside both.
        if ops.hit(Point::new(12, 8)).map(|h| h.0) == Some(Tag(7)) {
            hits += 1;
        }
        text.len = 0;
        ops.extract_text(SCREEN, &mut text).unwrap();
    }
    let stats = region.change();

    assert_eq!(stats.allocations, 0, "allocations during steady state");
    assert_eq!(stats.reallocations, 0, "reallocations during steady state");
    assert_eq!(hits, 8, "button should be under the pointer every frame");
    assert_eq!(&text.buf[..text.len], b"OK", "label should read back");
}
