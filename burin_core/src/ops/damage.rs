// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-to-frame damage.
//!
//! The previous frame is already on screen. Each element of the current
//! frame is looked for among the next few unmatched elements of the previous
//! frame; a match means it need not be redrawn, and any previous elements
//! skipped to reach the match have disappeared. Whatever is left unmatched
//! on either side is damage.
//!
//! The window is [`OpsConfig::scan_max`](crate::config::OpsConfig::scan_max)
//! elements, which bounds the work at `O(n * scan_max)`. This is a heuristic:
//! a large reordering reports more damage than strictly necessary.

use super::Ops;
use super::iter::FrameIter;
use crate::geom::Rect;
use crate::trace::{DamageEvent, Tracer};

impl Ops<'_> {
    /// Returns the part of `dst` that differs from the previous frame.
    #[must_use]
    pub fn damage(&self, dst: Rect) -> Rect {
        self.damage_traced(dst, &mut Tracer::none())
    }

    /// Like [`damage`](Self::damage), reporting the result to `tracer`.
    #[must_use]
    pub fn damage_traced(&self, dst: Rect, tracer: &mut Tracer<'_>) -> Rect {
        let scan_max = self.config.scan_max;
        let mut cur = FrameIter::new(&self.current, dst);
        let mut prev = FrameIter::new(&self.previous, dst);
        let mut damage = Rect::ZERO;
        let mut rects = Contributions::new(self.frame);
        let mut elements = 0_u32;
        let mut matched = 0_u32;

        'current: while let Some(el) = cur.next_element() {
            elements += 1;
            let mut scan = prev.clone();
            let mut skipped = Rect::ZERO;
            for _ in 0..scan_max {
                let Some(p) = scan.next_element() else {
                    break;
                };
                if el.same(&p) {
                    damage = damage.union(skipped);
                    rects.push(skipped, tracer);
                    prev = scan;
                    matched += 1;
                    continue 'current;
                }
                skipped = skipped.union(p.clip);
            }
            damage = damage.union(el.clip);
            rects.push(el.clip, tracer);
            if damage == dst {
                rects.flush(tracer);
                tracer.damage(&DamageEvent {
                    frame_index: self.frame,
                    damage,
                    elements,
                    matched,
                });
                return damage;
            }
        }
        while let Some(p) = prev.next_element() {
            damage = damage.union(p.clip);
            rects.push(p.clip, tracer);
        }
        rects.flush(tracer);
        tracer.damage(&DamageEvent {
            frame_index: self.frame,
            damage,
            elements,
            matched,
        });
        damage
    }
}

#[cfg(feature = "trace-rich")]
const BATCH: usize = 8;

/// Individual damage contributions, batched for the tracer.
struct Contributions {
    #[cfg(feature = "trace-rich")]
    frame: u64,
    #[cfg(feature = "trace-rich")]
    rects: [Rect; BATCH],
    #[cfg(feature = "trace-rich")]
    len: usize,
}

impl Contributions {
    #[inline]
    fn new(frame: u64) -> Self {
        #[cfg(feature = "trace-rich")]
        {
            Self {
                frame,
                rects: [Rect::ZERO; BATCH],
                len: 0,
            }
        }
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = frame;
            Self {}
        }
    }

    #[inline]
    fn push(&mut self, r: Rect, tracer: &mut Tracer<'_>) {
        #[cfg(feature = "trace-rich")]
        {
            if r.is_empty() {
                return;
            }
            if self.len == BATCH {
                self.flush(tracer);
            }
            self.rects[self.len] = r;
            self.len += 1;
        }
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = (r, tracer);
        }
    }

    #[inline]
    fn flush(&mut self, tracer: &mut Tracer<'_>) {
        #[cfg(feature = "trace-rich")]
        if self.len > 0 {
            tracer.damage_rects(self.frame, &self.rects[..self.len]);
            self.len = 0;
        }
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = tracer;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::color::Nrgba;
    use crate::config::OpsConfig;
    use crate::geom::{Point, Rect};
    use crate::image::{ImageRef, Rgb565Image};
    use crate::ops::{Ctx, MaskKind, Ops, Tag};

    const SCREEN: Rect = Rect::new(0, 0, 240, 240);
    const RED: Nrgba = Nrgba::opaque(0xff, 0, 0);
    const BLUE: Nrgba = Nrgba::opaque(0, 0, 0xff);

    fn square(ctx: &mut Ctx<'_, '_>, at: Point, c: Nrgba) {
        let mut inner = ctx.begin();
        inner.clip(Rect::new(0, 0, 5, 5));
        inner.color(c);
        let call = ctx.end();
        ctx.position(&call, at);
    }

    fn frames(
        ops: &mut Ops<'_>,
        first: &[(i32, Nrgba)],
        second: &[(i32, Nrgba)],
    ) -> Rect {
        ops.reset();
        let mut ctx = ops.context();
        for &(x, c) in first {
            square(&mut ctx, Point::new(x, 0), c);
        }
        ops.reset();
        let mut ctx = ops.context();
        for &(x, c) in second {
            square(&mut ctx, Point::new(x, 0), c);
        }
        ops.damage(SCREEN)
    }

    #[test]
    fn unchanged_frame_has_no_damage() {
        let mut ops = Ops::new();
        let scene = [(0, RED), (10, BLUE), (20, RED)];
        assert!(frames(&mut ops, &scene, &scene).is_empty());
    }

    #[test]
    fn translation_damages_both_positions() {
        let mut ops = Ops::new();
        let d = frames(&mut ops, &[(0, RED)], &[(10, RED)]);
        assert_eq!(d, Rect::new(0, 0, 15, 5));
    }

    #[test]
    fn recolor_damages_in_place() {
        let mut ops = Ops::new();
        let d = frames(&mut ops, &[(0, RED), (10, RED)], &[(0, RED), (10, BLUE)]);
        assert_eq!(d, Rect::new(10, 0, 15, 5));
    }

    #[test]
    fn insertion_damages_only_the_new_element() {
        let mut ops = Ops::new();
        let d = frames(
            &mut ops,
            &[(0, RED), (20, RED)],
            &[(0, RED), (10, BLUE), (20, RED)],
        );
        assert_eq!(d, Rect::new(10, 0, 15, 5));
    }

    #[test]
    fn removal_damages_the_gap() {
        let mut ops = Ops::new();
        let d = frames(
            &mut ops,
            &[(0, RED), (10, BLUE), (20, RED)],
            &[(0, RED), (20, RED)],
        );
        assert_eq!(d, Rect::new(10, 0, 15, 5));
        let d = frames(&mut ops, &[(0, RED), (10, BLUE)], &[(0, RED)]);
        assert_eq!(d, Rect::new(10, 0, 15, 5));
    }

    #[test]
    fn lookahead_is_bounded() {
        let mut ops = Ops::with_config(OpsConfig {
            scan_max: 1,
            ..OpsConfig::DEFAULT
        });
        let d = frames(&mut ops, &[(0, BLUE), (10, BLUE), (20, RED)], &[(20, RED)]);
        // The match is two elements away, so everything is redrawn.
        assert_eq!(d, Rect::new(0, 0, 25, 5));

        let mut ops = Ops::new();
        let d = frames(&mut ops, &[(0, BLUE), (10, BLUE), (20, RED)], &[(20, RED)]);
        assert_eq!(d, Rect::new(0, 0, 15, 5));
    }

    #[test]
    fn full_damage_exits_early() {
        let mut ops = Ops::new();
        ops.context().color(RED);
        ops.reset();
        let mut ctx = ops.context();
        ctx.color(BLUE);
        square(&mut ctx, Point::ZERO, RED);
        assert_eq!(ops.damage(SCREEN), SCREEN);
    }

    #[test]
    fn input_regions_do_not_damage() {
        let mut ops = Ops::new();
        ops.context().input(Tag(1));
        ops.reset();
        ops.context().input(Tag(2));
        assert!(ops.damage(SCREEN).is_empty());
    }

    #[test]
    fn images_compare_by_identity() {
        let a = Rgb565Image::new(Rect::new(0, 0, 4, 4));
        let b = a.clone();
        let mut ops = Ops::new();
        ops.context().image(ImageRef::Rgb565(&a), MaskKind::Fill);
        ops.reset();
        ops.context().image(ImageRef::Rgb565(&a), MaskKind::Fill);
        assert!(ops.damage(SCREEN).is_empty());
        ops.reset();
        ops.context().image(ImageRef::Rgb565(&b), MaskKind::Fill);
        assert_eq!(ops.damage(SCREEN), Rect::new(0, 0, 4, 4));
    }

    #[cfg(feature = "trace-rich")]
    #[test]
    fn contributions_are_traced() {
        use alloc::vec::Vec;

        use crate::trace::{TraceSink, Tracer};

        #[derive(Default)]
        struct Sink(Vec<Rect>);
        impl TraceSink for Sink {
            fn on_damage_rects(&mut self, _: u64, rects: &[Rect]) {
                self.0.extend_from_slice(rects);
            }
        }

        let mut ops = Ops::new();
        let mut ctx = ops.context();
        square(&mut ctx, Point::ZERO, RED);
        ops.reset();
        let mut ctx = ops.context();
        square(&mut ctx, Point::new(10, 0), RED);
        let mut sink = Sink::default();
        let d = ops.damage_traced(SCREEN, &mut Tracer::new(&mut sink));
        assert_eq!(d, Rect::new(0, 0, 15, 5));
        assert_eq!(sink.0, [Rect::new(10, 0, 15, 5), Rect::new(0, 0, 5, 5)]);
    }
}
