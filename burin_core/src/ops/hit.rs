// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input routing.

use super::Ops;
use super::iter::FrameIter;
use super::stream::Tag;
use crate::geom::{Point, Rect};
use crate::trace::{HitEvent, Tracer};

impl Ops<'_> {
    /// Finds the input region containing `p`.
    ///
    /// Regions are searched in recording order and the first one containing
    /// the point wins, even if a later region overlaps it.
    #[must_use]
    pub fn hit(&self, p: Point) -> Option<(Tag, Rect)> {
        self.hit_traced(p, &mut Tracer::none())
    }

    /// Like [`hit`](Self::hit), reporting the result to `tracer`.
    #[must_use]
    pub fn hit_traced(&self, p: Point, tracer: &mut Tracer<'_>) -> Option<(Tag, Rect)> {
        let mut it = FrameIter::new(&self.current, Rect::EVERYTHING);
        let mut hit = None;
        while let Some(r) = it.next_input() {
            if r.bounds.contains(p) {
                hit = Some((r.tag, r.bounds));
                break;
            }
        }
        tracer.hit(&HitEvent {
            frame_index: self.frame,
            point: p,
            hit,
        });
        hit
    }

    /// Bounds of the first input region recorded with `tag`.
    #[must_use]
    pub fn tag_bounds(&self, tag: Tag) -> Option<Rect> {
        let mut it = FrameIter::new(&self.current, Rect::EVERYTHING);
        while let Some(r) = it.next_input() {
            if r.tag == tag {
                return Some(r.bounds);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Nrgba;

    fn button(ops: &mut Ops<'_>, tag: u32, r: Rect) {
        let mut ctx = ops.context();
        let mut inner = ctx.begin();
        inner.clip(r);
        inner.color(Nrgba::opaque(0x80, 0x80, 0x80));
        inner.clip(r);
        inner.input(Tag(tag));
        let call = ctx.end();
        call.add(&mut ctx);
    }

    #[test]
    fn hits_are_contained() {
        let mut ops = Ops::new();
        button(&mut ops, 1, Rect::new(0, 0, 10, 10));
        button(&mut ops, 2, Rect::new(20, 0, 30, 10));
        for y in -2..12 {
            for x in -2..32 {
                let p = Point::new(x, y);
                match ops.hit(p) {
                    Some((_, bounds)) => assert!(bounds.contains(p), "{p:?} outside {bounds:?}"),
                    None => assert!(
                        !Rect::new(0, 0, 10, 10).contains(p)
                            && !Rect::new(20, 0, 30, 10).contains(p),
                        "{p:?} missed"
                    ),
                }
            }
        }
        assert_eq!(ops.hit(Point::new(25, 5)).map(|h| h.0), Some(Tag(2)));
    }

    #[test]
    fn first_recorded_region_wins() {
        let mut ops = Ops::new();
        button(&mut ops, 1, Rect::new(0, 0, 10, 10));
        button(&mut ops, 2, Rect::new(5, 5, 15, 15));
        assert_eq!(
            ops.hit(Point::new(7, 7)),
            Some((Tag(1), Rect::new(0, 0, 10, 10)))
        );
        assert_eq!(ops.hit(Point::new(12, 12)).map(|h| h.0), Some(Tag(2)));
    }

    #[test]
    fn tag_lookup() {
        let mut ops = Ops::new();
        button(&mut ops, 4, Rect::new(1, 2, 3, 4));
        assert_eq!(ops.tag_bounds(Tag(4)), Some(Rect::new(1, 2, 3, 4)));
        assert_eq!(ops.tag_bounds(Tag(5)), None);
    }

    #[test]
    fn previous_frame_is_not_hit() {
        let mut ops = Ops::new();
        button(&mut ops, 1, Rect::new(0, 0, 10, 10));
        ops.reset();
        assert_eq!(ops.hit(Point::new(1, 1)), None);
    }
}
