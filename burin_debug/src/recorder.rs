// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`], stopping at the first truncated or
//! unknown record.
//!
//! Damage contributions ([`on_damage_rects`](TraceSink::on_damage_rects))
//! store only the count.

use burin_core::geom::{Point, Rect};
use burin_core::ops::{StreamStats, Tag};
use burin_core::trace::{DamageEvent, DrawEvent, FrameStatsEvent, HitEvent, TraceSink};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_STATS: u8 = 1;
const TAG_DAMAGE: u8 = 2;
const TAG_DRAW: u8 = 3;
const TAG_HIT: u8 = 4;
const TAG_DAMAGE_RECTS_COUNT: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "stream sizes are bounded by u32 cursors"
    )]
    fn write_usize(&mut self, v: usize) {
        self.write_u32(v.min(u32::MAX as usize) as u32);
    }

    fn write_point(&mut self, p: Point) {
        self.write_i32(p.x);
        self.write_i32(p.y);
    }

    fn write_rect(&mut self, r: Rect) {
        self.write_point(r.min);
        self.write_point(r.max);
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_stats(&mut self, e: &FrameStatsEvent) {
        self.write_u8(TAG_FRAME_STATS);
        self.write_u64(e.frame_index);
        self.write_usize(e.stats.words_used);
        self.write_usize(e.stats.word_capacity);
        self.write_usize(e.stats.refs_used);
        self.write_usize(e.stats.ref_capacity);
    }

    fn on_damage(&mut self, e: &DamageEvent) {
        self.write_u8(TAG_DAMAGE);
        self.write_u64(e.frame_index);
        self.write_rect(e.damage);
        self.write_u32(e.elements);
        self.write_u32(e.matched);
    }

    fn on_draw(&mut self, e: &DrawEvent) {
        self.write_u8(TAG_DRAW);
        self.write_u64(e.frame_index);
        self.write_rect(e.clip);
        self.write_u32(e.drawn);
        self.write_u32(e.fast_paths);
    }

    fn on_hit(&mut self, e: &HitEvent) {
        self.write_u8(TAG_HIT);
        self.write_u64(e.frame_index);
        self.write_point(e.point);
        match e.hit {
            Some((tag, bounds)) => {
                self.write_u8(1);
                self.write_u32(tag.0);
                self.write_rect(bounds);
            }
            None => {
                self.write_u8(0);
                self.write_u32(0);
                self.write_rect(Rect::ZERO);
            }
        }
    }

    fn on_damage_rects(&mut self, frame_index: u64, rects: &[Rect]) {
        self.write_u8(TAG_DAMAGE_RECTS_COUNT);
        self.write_u64(frame_index);
        self.write_usize(rects.len());
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`FrameStatsEvent`].
    FrameStats(FrameStatsEvent),
    /// A [`DamageEvent`].
    Damage(DamageEvent),
    /// A [`DrawEvent`].
    Draw(DrawEvent),
    /// A [`HitEvent`].
    Hit(HitEvent),
    /// Damage contribution count for a frame.
    DamageRectsCount {
        /// Frame counter.
        frame_index: u64,
        /// Number of rectangles reported.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?;
        self.pos += N;
        bytes.try_into().ok()
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_usize(&mut self) -> Option<usize> {
        self.read_u32().map(|v| v as usize)
    }

    fn read_point(&mut self) -> Option<Point> {
        Some(Point::new(self.read_i32()?, self.read_i32()?))
    }

    fn read_rect(&mut self) -> Option<Rect> {
        Some(Rect {
            min: self.read_point()?,
            max: self.read_point()?,
        })
    }

    fn decode_frame_stats(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameStats(FrameStatsEvent {
            frame_index: self.read_u64()?,
            stats: StreamStats {
                words_used: self.read_usize()?,
                word_capacity: self.read_usize()?,
                refs_used: self.read_usize()?,
                ref_capacity: self.read_usize()?,
            },
        }))
    }

    fn decode_damage(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Damage(DamageEvent {
            frame_index: self.read_u64()?,
            damage: self.read_rect()?,
            elements: self.read_u32()?,
            matched: self.read_u32()?,
        }))
    }

    fn decode_draw(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Draw(DrawEvent {
            frame_index: self.read_u64()?,
            clip: self.read_rect()?,
            drawn: self.read_u32()?,
            fast_paths: self.read_u32()?,
        }))
    }

    fn decode_hit(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let point = self.read_point()?;
        let present = self.read_u8()?;
        let tag = Tag(self.read_u32()?);
        let bounds = self.read_rect()?;
        Some(RecordedEvent::Hit(HitEvent {
            frame_index,
            point,
            hit: (present != 0).then_some((tag, bounds)),
        }))
    }

    fn decode_damage_rects_count(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::DamageRectsCount { frame_index, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FRAME_STATS => self.decode_frame_stats(),
            TAG_DAMAGE => self.decode_damage(),
            TAG_DRAW => self.decode_draw(),
            TAG_HIT => self.decode_hit(),
            TAG_DAMAGE_RECTS_COUNT => self.decode_damage_rects_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use burin_core::color::Nrgba;
    use burin_core::image::{AlphaImage, Rgb565Image};
    use burin_core::ops::Ops;
    use burin_core::trace::Tracer;

    fn sample_hit() -> HitEvent {
        HitEvent {
            frame_index: 7,
            point: Point::new(-3, 12),
            hit: Some((Tag(42), Rect::new(-10, 0, 10, 20))),
        }
    }

    #[test]
    fn round_trip_each_event() {
        let stats = FrameStatsEvent {
            frame_index: 7,
            stats: StreamStats {
                words_used: 120,
                word_capacity: 16384,
                refs_used: 9,
                ref_capacity: 2048,
            },
        };
        let damage = DamageEvent {
            frame_index: 7,
            damage: Rect::new(0, 0, 15, 5),
            elements: 3,
            matched: 2,
        };
        let draw = DrawEvent {
            frame_index: 7,
            clip: Rect::new(0, 0, 15, 5),
            drawn: 3,
            fast_paths: 1,
        };
        let miss = HitEvent {
            hit: None,
            ..sample_hit()
        };

        let mut rec = RecorderSink::new();
        rec.on_frame_stats(&stats);
        rec.on_damage(&damage);
        rec.on_draw(&draw);
        rec.on_hit(&sample_hit());
        rec.on_hit(&miss);
        rec.on_damage_rects(7, &[Rect::new(0, 0, 1, 1), Rect::new(4, 4, 5, 5)]);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [
                RecordedEvent::FrameStats(stats),
                RecordedEvent::Damage(damage),
                RecordedEvent::Draw(draw),
                RecordedEvent::Hit(sample_hit()),
                RecordedEvent::Hit(miss),
                RecordedEvent::DamageRectsCount {
                    frame_index: 7,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn records_are_fixed_size() {
        let mut a = RecorderSink::new();
        a.on_hit(&sample_hit());
        let mut b = RecorderSink::new();
        b.on_hit(&HitEvent {
            hit: None,
            ..sample_hit()
        });
        assert_eq!(a.as_bytes().len(), b.as_bytes().len());
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_hit(&sample_hit());
        rec.on_hit(&sample_hit());
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 1];
        assert_eq!(decode(cut).count(), 1);
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn records_a_frame_loop() {
        let bounds = Rect::new(0, 0, 8, 8);
        let mut ops = Ops::new();
        let mut fb = Rgb565Image::new(bounds);
        let mut scratch = AlphaImage::new(bounds);
        let mut rec = RecorderSink::new();
        {
            let mut tracer = Tracer::new(&mut rec);
            ops.context().color(Nrgba::opaque(0xff, 0, 0));
            ops.reset_traced(&mut tracer);
            let mut ctx = ops.context();
            ctx.clip(Rect::new(0, 0, 4, 4));
            ctx.color(Nrgba::opaque(0, 0xff, 0));
            let damage = ops.damage_traced(bounds, &mut tracer);
            ops.draw_traced(&mut fb, &mut scratch, damage, &mut tracer);
        }
        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert!(
            matches!(events[0], RecordedEvent::FrameStats(e) if e.frame_index == 0),
            "got {events:?}"
        );
        assert!(
            events.iter().any(|e| matches!(
                e,
                RecordedEvent::Damage(d) if d.damage == Rect::new(0, 0, 8, 8)
            )),
            "got {events:?}"
        );
        assert!(
            matches!(events.last(), Some(RecordedEvent::Draw(d)) if d.drawn == 1),
            "got {events:?}"
        );
    }
}
