// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated device frame loop that exercises the engine end to end.
//!
//! Runs 30 synthetic frames of a small controller UI: a list that scrolls
//! under fading edges, a progress wedge, and a button with a text label.
//! Each frame is recorded, diffed against the previous one, and only the
//! damaged region is drawn, in bands, as it would be sent over a slow display
//! link. Events go to both a
//! [`PrettyPrintSink`](burin_debug::pretty::PrettyPrintSink) on stdout and a
//! [`RecorderSink`](burin_debug::recorder::RecorderSink); the last frame is
//! dumped as JSON.

use std::fs::File;
use std::io::BufWriter;

use burin_core::color::Nrgba;
use burin_core::generator::{FadeEdges, GlyphSource, WEDGE_FULL};
use burin_core::geom::{Point, Rect};
use burin_core::image::{Alpha4Image, AlphaImage, Rgb565Image};
use burin_core::ops::{Ctx, MaskKind, Ops, Tag};
use burin_core::trace::{DamageEvent, DrawEvent, FrameStatsEvent, HitEvent, TraceSink, Tracer};

use burin_debug::pretty::PrettyPrintSink;
use burin_debug::recorder::{RecordedEvent, RecorderSink, decode};

const FRAME_COUNT: i32 = 30;
const SCREEN: Rect = Rect::new(0, 0, 128, 64);
/// Rows per transfer to the display.
const BAND: i32 = 16;
const BUTTON: Tag = Tag(1);

/// A stand-in font: every printable character is the same 4x6 block with a
/// hollow middle.
struct BlockFont {
    bitmap: [u8; 12],
}

impl BlockFont {
    fn new() -> Self {
        Self {
            bitmap: [
                0xff, 0xff, //
                0xf0, 0x0f, //
                0xf0, 0x0f, //
                0xf0, 0x0f, //
                0xf0, 0x0f, //
                0xff, 0xff, //
            ],
        }
    }
}

impl GlyphSource for BlockFont {
    fn glyph(&self, ch: char) -> Option<Alpha4Image<'_>> {
        ch.is_ascii_graphic()
            .then(|| Alpha4Image::new(&self.bitmap, Rect::new(0, -6, 4, 0)))
    }
}

/// Forwards every event to two sinks.
struct Tee<'s> {
    pretty: &'s mut PrettyPrintSink,
    recorder: &'s mut RecorderSink,
}

impl TraceSink for Tee<'_> {
    fn on_frame_stats(&mut self, e: &FrameStatsEvent) {
        self.pretty.on_frame_stats(e);
        self.recorder.on_frame_stats(e);
    }

    fn on_damage(&mut self, e: &DamageEvent) {
        self.pretty.on_damage(e);
        self.recorder.on_damage(e);
    }

    fn on_draw(&mut self, e: &DrawEvent) {
        self.pretty.on_draw(e);
        self.recorder.on_draw(e);
    }

    fn on_hit(&mut self, e: &HitEvent) {
        self.pretty.on_hit(e);
        self.recorder.on_hit(e);
    }

    fn on_damage_rects(&mut self, frame_index: u64, rects: &[Rect]) {
        self.pretty.on_damage_rects(frame_index, rects);
        self.recorder.on_damage_rects(frame_index, rects);
    }
}

fn text<'a>(ctx: &mut Ctx<'_, 'a>, font: &'a dyn GlyphSource, s: &str, color: Nrgba) {
    for (i, ch) in (0..).zip(s.chars()) {
        let mut g = ctx.begin();
        g.offset(Point::new(i * 6, 0));
        g.glyph(font, ch);
        g.color(color);
        let call = ctx.end();
        call.add(ctx);
    }
}

fn record<'a>(ops: &mut Ops<'a>, font: &'a BlockFont, frame: i32) {
    let mut ctx = ops.context();
    ctx.color(Nrgba::opaque(0x10, 0x10, 0x18));

    // The list: rows recorded once and placed at a scroll offset, under a
    // vertical fade so rows dissolve at the edges.
    let mut row = ctx.begin();
    row.clip(Rect::new(0, 0, 60, 10));
    row.color(Nrgba::opaque(0x30, 0x30, 0x40));
    row.offset(Point::new(2, 8));
    text(&mut row, font, "ROW", Nrgba::opaque(0xe0, 0xe0, 0xe0));
    let row = ctx.end();

    let list = Rect::new(4, 4, 64, 60);
    let mut content = ctx.begin();
    for i in 0..8 {
        content.position(&row, Point::new(0, i * 12 - frame % 24));
    }
    let content = ctx.end();
    ctx.clip(list);
    ctx.fade(list, FadeEdges::VERTICAL, 8, MaskKind::Intersect);
    ctx.position(&content, list.min);

    // A progress wedge that fills over the run.
    ctx.offset(Point::new(80, 6));
    let progress = WEDGE_FULL / FRAME_COUNT as u32 * frame as u32;
    ctx.wedge(Rect::new(0, 0, 24, 24), progress);
    ctx.color(Nrgba::opaque(0x40, 0xc0, 0x60));

    // The button, lit while "pressed".
    let pressed = frame % 10 < 3;
    let area = Rect::new(72, 40, 120, 56);
    ctx.clip(area);
    ctx.color(if pressed {
        Nrgba::opaque(0x60, 0x80, 0xff)
    } else {
        Nrgba::opaque(0x30, 0x40, 0x80)
    });
    ctx.offset(Point::new(78, 51));
    text(&mut ctx, font, "OK", Nrgba::new(0xff, 0xff, 0xff, 0xe0));
    ctx.clip(area);
    ctx.input(BUTTON);
}

fn main() {
    let font = BlockFont::new();

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    // -- device ------------------------------------------------------------
    let mut ops = Ops::new();
    let mut fb = Rgb565Image::new(SCREEN);
    let mut scratch = AlphaImage::new(SCREEN);
    let mut sent = 0_i64;

    for frame in 0..FRAME_COUNT {
        let mut tee = Tee {
            pretty: &mut pretty,
            recorder: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);

        ops.reset_traced(&mut tracer);
        record(&mut ops, &font, frame);

        let damage = ops.damage_traced(SCREEN, &mut tracer);
        let mut y = damage.min.y;
        while y < damage.max.y {
            let band = Rect::new(damage.min.x, y, damage.max.x, (y + BAND).min(damage.max.y));
            ops.draw_traced(&mut fb, &mut scratch, band, &mut tracer);
            sent += i64::from(band.width()) * i64::from(band.height());
            y = band.max.y;
        }

        // A touch on the button every tenth frame.
        if frame % 10 == 0 {
            let hit = ops.hit_traced(Point::new(96, 48), &mut tracer);
            assert_eq!(hit.map(|h| h.0), Some(BUTTON), "button should be under the touch");
        }
    }

    // -- report ------------------------------------------------------------
    let full = i64::from(SCREEN.width()) * i64::from(SCREEN.height()) * i64::from(FRAME_COUNT);
    println!(
        "Sent {sent} of {full} pixels ({:.1}%), stream {}/{} words",
        sent as f64 * 100.0 / full as f64,
        ops.stats().words_used,
        ops.stats().word_capacity,
    );

    let draws = decode(recorder.as_bytes())
        .filter(|e| matches!(e, RecordedEvent::Draw(_)))
        .count();
    println!("Recorded {} bytes, {draws} draw passes", recorder.as_bytes().len());

    let mut label = String::new();
    ops.extract_text(SCREEN, &mut label)
        .expect("writing to a String cannot fail");
    println!("Visible text: {label}");

    let path = "frame.json";
    let file = File::create(path).expect("failed to create frame.json");
    let mut writer = BufWriter::new(file);
    burin_debug::dump::write_frame(&ops, SCREEN, &mut writer).expect("failed to write frame dump");
    println!("Wrote {path}");
}
