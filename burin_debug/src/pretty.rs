// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Rectangles
//! print as `x0,y0..x1,y1`.

use std::fmt;
use std::io::Write;

use burin_core::geom::Rect;
use burin_core::trace::{DamageEvent, DrawEvent, FrameStatsEvent, HitEvent, TraceSink};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Display adapter for a rectangle.
struct R(Rect);

impl fmt::Display for R {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("empty");
        }
        let Rect { min, max } = self.0;
        write!(f, "{},{}..{},{}", min.x, min.y, max.x, max.y)
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_stats(&mut self, e: &FrameStatsEvent) {
        let s = e.stats;
        let _ = writeln!(
            self.writer,
            "[stats] frame={} words={}/{} refs={}/{}",
            e.frame_index, s.words_used, s.word_capacity, s.refs_used, s.ref_capacity,
        );
    }

    fn on_damage(&mut self, e: &DamageEvent) {
        let _ = writeln!(
            self.writer,
            "[damage] frame={} rect={} elements={} matched={}",
            e.frame_index,
            R(e.damage),
            e.elements,
            e.matched,
        );
    }

    fn on_draw(&mut self, e: &DrawEvent) {
        let _ = writeln!(
            self.writer,
            "[draw] frame={} clip={} drawn={} fast={}",
            e.frame_index,
            R(e.clip),
            e.drawn,
            e.fast_paths,
        );
    }

    fn on_hit(&mut self, e: &HitEvent) {
        let _ = match e.hit {
            Some((tag, bounds)) => writeln!(
                self.writer,
                "[hit] frame={} at={},{} tag={} bounds={}",
                e.frame_index,
                e.point.x,
                e.point.y,
                tag.0,
                R(bounds),
            ),
            None => writeln!(
                self.writer,
                "[hit] frame={} at={},{} miss",
                e.frame_index, e.point.x, e.point.y,
            ),
        };
    }

    fn on_damage_rects(&mut self, frame_index: u64, rects: &[Rect]) {
        let _ = writeln!(
            self.writer,
            "[damage:rects] frame={frame_index} rects={}",
            rects.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burin_core::geom::Point;
    use burin_core::ops::Tag;

    #[test]
    fn pretty_print_damage() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_damage(&DamageEvent {
            frame_index: 3,
            damage: Rect::new(0, 0, 15, 5),
            elements: 4,
            matched: 3,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[damage]"), "got: {output}");
        assert!(output.contains("frame=3"), "got: {output}");
        assert!(output.contains("rect=0,0..15,5"), "got: {output}");
    }

    #[test]
    fn pretty_print_hit_and_miss() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_hit(&HitEvent {
            frame_index: 1,
            point: Point::new(4, 5),
            hit: Some((Tag(9), Rect::new(0, 0, 10, 10))),
        });
        sink.on_hit(&HitEvent {
            frame_index: 1,
            point: Point::new(40, 5),
            hit: None,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2, "got: {output}");
        assert!(lines[0].contains("tag=9"), "got: {output}");
        assert!(lines[1].ends_with("miss"), "got: {output}");
    }

    #[test]
    fn empty_rect_prints_as_empty() {
        assert_eq!(R(Rect::ZERO).to_string(), "empty");
    }
}
