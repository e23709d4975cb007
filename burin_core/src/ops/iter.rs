// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stream replay.
//!
//! [`FrameIter`] walks a [`Stream`] as a stack machine and yields the
//! frame's visible content one [`Item`] at a time. Every consumer (the
//! differ, the compositor, the hit tester) sees exactly the same sequence.
//!
//! Replay rules:
//!
//! - A `Begin` increments the skip depth and its `End` decrements it; while
//!   the skip depth is non-zero nothing takes effect. Recorded spans only
//!   run when called.
//! - An `End` at skip depth zero returns from the current call.
//! - `Offset` and `Clip` update the draw state. Clips only shrink.
//! - An intersect image narrows the clip and pushes a mask layer.
//! - A fill image narrows the clip and yields an [`Element`] carrying the
//!   accumulated masks, unless its clip is empty.
//! - An input yields an [`InputRegion`] with the current clip.
//! - After a yield and after a call returns, the draw state and mask stack
//!   revert to what they were when the enclosing call began. Siblings never
//!   see each other's state.

use super::stream::{Cursor, IMAGE_FIXED_ARGS, Kind, Ref, Stream, Tag, decode_rect};
use crate::config::{MAX_CALL_DEPTH, MAX_MASK_DEPTH};
use crate::generator::{GeneratorId, ImageArgs};
use crate::geom::{Point, Rect};

/// How an image leaf combines with what follows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum MaskKind {
    /// A base layer: draw it, through the masks stacked so far.
    Fill = 0,
    /// An overlay: multiply the alpha of every later fill in the scope.
    Intersect = 1,
}

impl MaskKind {
    fn from_word(w: u32) -> Self {
        if w == Self::Intersect as u32 {
            Self::Intersect
        } else {
            Self::Fill
        }
    }
}

/// One image leaf as placed by replay.
#[derive(Clone, Copy, Debug)]
pub struct Layer<'s, 'a> {
    /// Accumulated offset; the leaf's own coordinates start here.
    pub pos: Point,
    /// Clip after intersecting with this leaf's bounds.
    pub clip: Rect,
    /// Fill or intersect.
    pub mask: MaskKind,
    /// The generator, or [`GeneratorId::NONE`] for a source image.
    pub generator: GeneratorId,
    /// Bounds in the leaf's own coordinates.
    pub bounds: Rect,
    /// Source image, if any.
    pub src: Ref<'a>,
    /// Generator arguments.
    pub args: &'s [u32],
    /// Generator references.
    pub refs: &'s [Ref<'a>],
}

impl<'s, 'a> Layer<'s, 'a> {
    const EMPTY: Self = Self {
        pos: Point::ZERO,
        clip: Rect::ZERO,
        mask: MaskKind::Fill,
        generator: GeneratorId::NONE,
        bounds: Rect::ZERO,
        src: Ref::None,
        args: &[],
        refs: &[],
    };

    /// The view a generator gets of this leaf.
    #[must_use]
    pub fn image_args(&self) -> ImageArgs<'s, 'a> {
        ImageArgs {
            bounds: self.bounds,
            args: self.args,
            refs: self.refs,
        }
    }

    /// Structural equality: same placement, same arguments, and the same
    /// referenced objects.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        self.pos == other.pos
            && self.clip == other.clip
            && self.mask == other.mask
            && self.generator == other.generator
            && self.bounds == other.bounds
            && self.args == other.args
            && self.src.same(&other.src)
            && self.refs.len() == other.refs.len()
            && self.refs.iter().zip(other.refs).all(|(a, b)| a.same(b))
    }
}

/// A composited element: a base layer seen through a stack of masks.
#[derive(Clone, Copy, Debug)]
pub struct Element<'i, 's, 'a> {
    /// Final clip; nothing outside it is touched.
    pub clip: Rect,
    /// Intersect layers, outermost first.
    pub masks: &'i [Layer<'s, 'a>],
    /// The fill layer.
    pub base: Layer<'s, 'a>,
}

impl Element<'_, '_, '_> {
    /// Returns `true` if both elements would draw the same pixels.
    #[must_use]
    pub fn same(&self, other: &Element<'_, '_, '_>) -> bool {
        self.clip == other.clip
            && self.masks.len() == other.masks.len()
            && self.base.same(&other.base)
            && self.masks.iter().zip(other.masks).all(|(a, b)| a.same(b))
    }
}

/// A recorded hit-test region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputRegion {
    /// Identity chosen by the recorder.
    pub tag: Tag,
    /// The clip in effect where it was recorded.
    pub bounds: Rect,
}

/// What replay produces.
#[derive(Clone, Copy, Debug)]
pub enum Item<'i, 's, 'a> {
    /// Something to draw.
    Draw(Element<'i, 's, 'a>),
    /// Somewhere to receive input.
    Input(InputRegion),
}

/// An item before its masks are attached.
enum Step<'s, 'a> {
    Draw(Layer<'s, 'a>),
    Input(InputRegion),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DrawState {
    pos: Point,
    clip: Rect,
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    /// State at entry; restored after each yield and each return.
    origin: DrawState,
    /// Mask depth at entry.
    masks: usize,
    cursor: Cursor,
}

impl Frame {
    const EMPTY: Self = Self {
        origin: DrawState {
            pos: Point::ZERO,
            clip: Rect::ZERO,
        },
        masks: 0,
        cursor: Cursor { word: 0, refs: 0 },
    };
}

/// Replays one frame's stream.
///
/// This is a lending iterator: each [`Item`] borrows the iterator and must
/// be dropped before the next call to [`next_item`](Self::next_item).
/// Cloning is cheap and allocation-free, which the differ uses for
/// lookahead.
#[derive(Clone, Debug)]
pub struct FrameIter<'s, 'a> {
    stream: &'s Stream<'a>,
    stack: [Frame; MAX_CALL_DEPTH],
    depth: usize,
    skip: u32,
    state: DrawState,
    masks: [Layer<'s, 'a>; MAX_MASK_DEPTH],
    nmasks: usize,
    restore: bool,
}

impl<'s, 'a> FrameIter<'s, 'a> {
    /// Starts replay at the beginning of `stream` with `root` as the
    /// outermost clip.
    #[must_use]
    pub fn new(stream: &'s Stream<'a>, root: Rect) -> Self {
        let origin = DrawState {
            pos: Point::ZERO,
            clip: root,
        };
        let mut stack = [Frame::EMPTY; MAX_CALL_DEPTH];
        stack[0] = Frame {
            origin,
            masks: 0,
            cursor: Cursor::default(),
        };
        Self {
            stream,
            stack,
            depth: 1,
            skip: 0,
            state: origin,
            masks: [Layer::EMPTY; MAX_MASK_DEPTH],
            nmasks: 0,
            restore: false,
        }
    }

    /// Advances to the next item.
    ///
    /// # Panics
    ///
    /// Panics if calls nest deeper than
    /// [`MAX_CALL_DEPTH`](crate::config::MAX_CALL_DEPTH), if more than
    /// [`MAX_MASK_DEPTH`](crate::config::MAX_MASK_DEPTH) masks stack up, or
    /// if a called span runs off the end of the stream.
    pub fn next_item(&mut self) -> Option<Item<'_, 's, 'a>> {
        Some(match self.step()? {
            Step::Draw(base) => Item::Draw(self.element(base)),
            Step::Input(r) => Item::Input(r),
        })
    }

    /// Advances to the next drawable element, skipping input regions.
    ///
    /// # Panics
    ///
    /// As [`next_item`](Self::next_item).
    pub fn next_element(&mut self) -> Option<Element<'_, 's, 'a>> {
        loop {
            if let Step::Draw(base) = self.step()? {
                return Some(self.element(base));
            }
        }
    }

    /// Advances to the next input region, skipping drawable elements.
    ///
    /// # Panics
    ///
    /// As [`next_item`](Self::next_item).
    pub fn next_input(&mut self) -> Option<InputRegion> {
        loop {
            if let Step::Input(r) = self.step()? {
                return Some(r);
            }
        }
    }

    fn element(&self, base: Layer<'s, 'a>) -> Element<'_, 's, 'a> {
        Element {
            clip: base.clip,
            masks: &self.masks[..self.nmasks],
            base,
        }
    }

    fn step(&mut self) -> Option<Step<'s, 'a>> {
        let stream = self.stream;
        loop {
            if self.restore {
                self.restore = false;
                let f = &self.stack[self.depth - 1];
                self.state = f.origin;
                self.nmasks = f.masks;
            }
            if self.depth == 0 {
                return None;
            }
            let top = self.depth - 1;
            let cursor = self.stack[top].cursor;
            if stream.at_end(cursor) {
                assert!(top == 0, "called span is missing its end");
                self.depth = 0;
                return None;
            }
            let (instr, next) = stream.read(cursor);
            self.stack[top].cursor = next;
            match instr.kind {
                Kind::Begin => {
                    self.skip += 1;
                    continue;
                }
                Kind::End => {
                    if self.skip > 0 {
                        self.skip -= 1;
                        continue;
                    }
                    self.depth -= 1;
                    if self.depth == 0 {
                        return None;
                    }
                    self.restore = true;
                    continue;
                }
                _ if self.skip > 0 => continue,
                Kind::Offset => {
                    let d = Point::new(instr.args[0] as i32, instr.args[1] as i32);
                    self.state.pos = self.state.pos + d;
                }
                Kind::Clip => {
                    let r = decode_rect(instr.args).translate(self.state.pos);
                    self.state.clip = self.state.clip.intersect(r);
                }
                Kind::Call => {
                    assert!(self.depth < MAX_CALL_DEPTH, "call stack overflow");
                    self.stack[self.depth] = Frame {
                        origin: self.state,
                        masks: self.nmasks,
                        cursor: Cursor {
                            word: instr.args[0],
                            refs: instr.args[1],
                        },
                    };
                    self.depth += 1;
                }
                Kind::Input => {
                    let Some(Ref::Tag(tag)) = instr.refs.first().copied() else {
                        unreachable!("input without a tag");
                    };
                    self.restore = true;
                    return Some(Step::Input(InputRegion {
                        tag,
                        bounds: self.state.clip,
                    }));
                }
                Kind::Image => {
                    let bounds = decode_rect(&instr.args[2..IMAGE_FIXED_ARGS]);
                    self.state.clip = self.state.clip.intersect(bounds.translate(self.state.pos));
                    #[expect(
                        clippy::cast_possible_truncation,
                        reason = "generator ids are recorded from a u16"
                    )]
                    let layer = Layer {
                        pos: self.state.pos,
                        clip: self.state.clip,
                        mask: MaskKind::from_word(instr.args[0]),
                        generator: GeneratorId(instr.args[1] as u16),
                        bounds,
                        src: instr.refs[0],
                        args: &instr.args[IMAGE_FIXED_ARGS..],
                        refs: &instr.refs[1..],
                    };
                    if layer.mask == MaskKind::Intersect {
                        assert!(self.nmasks < MAX_MASK_DEPTH, "mask stack overflow");
                        self.masks[self.nmasks] = layer;
                        self.nmasks += 1;
                        continue;
                    }
                    self.restore = true;
                    if layer.clip.is_empty() {
                        continue;
                    }
                    return Some(Step::Draw(layer));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::color::Nrgba;
    use crate::ops::Ops;

    const RED: Nrgba = Nrgba::opaque(0xff, 0, 0);

    fn clips(ops: &Ops<'_>) -> Vec<Rect> {
        let mut it = ops.elements(Rect::EVERYTHING);
        let mut out = Vec::new();
        while let Some(e) = it.next_element() {
            out.push(e.clip);
        }
        out
    }

    #[test]
    fn uncalled_span_is_skipped() {
        let mut ops = Ops::new();
        let mut ctx = ops.context();
        let mut inner = ctx.begin();
        inner.clip(Rect::new(0, 0, 1, 1));
        inner.color(RED);
        let _ = ctx.end();
        assert!(clips(&ops).is_empty());
    }

    #[test]
    fn scope_isolation() {
        let mut ops = Ops::new();
        let mut ctx = ops.context();

        let mut a = ctx.begin();
        a.offset(Point::new(100, 100));
        a.clip(Rect::new(0, 0, 3, 3));
        a.color(RED);
        let a = ctx.end();

        let mut b = ctx.begin();
        b.clip(Rect::new(0, 0, 4, 4));
        b.color(RED);
        let b = ctx.end();

        a.add(&mut ctx);
        b.add(&mut ctx);
        assert_eq!(
            clips(&ops),
            [Rect::new(100, 100, 103, 103), Rect::new(0, 0, 4, 4)]
        );
    }

    #[test]
    fn state_reverts_after_each_fill() {
        let mut ops = Ops::new();
        let mut ctx = ops.context();
        ctx.offset(Point::new(10, 0));
        ctx.clip(Rect::new(0, 0, 5, 5));
        ctx.color(RED);
        ctx.clip(Rect::new(0, 0, 2, 2));
        ctx.color(RED);
        assert_eq!(
            clips(&ops),
            [Rect::new(10, 0, 15, 5), Rect::new(0, 0, 2, 2)]
        );
    }

    #[test]
    fn splice_twice() {
        let mut ops = Ops::new();
        let mut ctx = ops.context();
        let mut inner = ctx.begin();
        inner.clip(Rect::new(0, 0, 5, 5));
        inner.color(RED);
        let square = ctx.end();
        ctx.position(&square, Point::new(10, 0));
        ctx.position(&square, Point::new(0, 20));

        let mut it = ops.elements(Rect::EVERYTHING);
        let first = it.next_element().map(|e| (e.clip, e.base));
        let (clip1, base1) = first.unwrap();
        let (clip2, base2) = it.next_element().map(|e| (e.clip, e.base)).unwrap();
        assert!(it.next_element().is_none());
        assert_eq!(clip1, Rect::new(10, 0, 15, 5));
        assert_eq!(clip2, Rect::new(0, 20, 5, 25));
        assert_eq!(base1.args, base2.args);
        assert_eq!(base1.generator, GeneratorId::UNIFORM);
        assert_eq!((base1.pos, base2.pos), (Point::new(10, 0), Point::new(0, 20)));
    }

    #[test]
    fn nested_calls_accumulate_offsets() {
        let mut ops = Ops::new();
        let mut ctx = ops.context();
        let mut leaf = ctx.begin();
        leaf.clip(Rect::new(0, 0, 1, 1));
        leaf.color(RED);
        let leaf = ctx.end();
        let mut row = ctx.begin();
        row.position(&leaf, Point::new(1, 0));
        row.position(&leaf, Point::new(2, 0));
        let row = ctx.end();
        ctx.position(&row, Point::new(0, 7));
        assert_eq!(
            clips(&ops),
            [Rect::new(1, 7, 2, 8), Rect::new(2, 7, 3, 8)]
        );
    }

    #[test]
    fn masks_flow_into_calls() {
        let mut ops = Ops::new();
        let mut ctx = ops.context();
        let mut inner = ctx.begin();
        inner.clip(Rect::new(0, 0, 4, 4));
        inner.color(RED);
        let inner = ctx.end();
        ctx.wedge(Rect::new(0, 0, 10, 10), 0x8000);
        inner.add(&mut ctx);
        ctx.color(RED);

        let mut it = ops.elements(Rect::EVERYTHING);
        let e = it.next_element().unwrap();
        assert_eq!(e.masks.len(), 1);
        assert_eq!(e.masks[0].generator, GeneratorId::WEDGE);
        // The call returned and restored the root state.
        let e = it.next_element().unwrap();
        assert!(e.masks.is_empty());
        assert_eq!(e.clip, Rect::EVERYTHING);
    }

    #[test]
    fn empty_fills_are_dropped() {
        let mut ops = Ops::new();
        let mut ctx = ops.context();
        ctx.clip(Rect::ZERO);
        ctx.color(RED);
        ctx.input(Tag(1));
        let mut it = ops.elements(Rect::EVERYTHING);
        assert!(matches!(it.next_item(), Some(Item::Input(_))));
        assert!(it.next_item().is_none());
    }

    #[test]
    fn input_takes_current_clip() {
        let mut ops = Ops::new();
        let mut ctx = ops.context();
        ctx.offset(Point::new(5, 5));
        ctx.clip(Rect::new(0, 0, 10, 2));
        ctx.input(Tag(9));
        ctx.input(Tag(10));
        let mut it = ops.elements(Rect::EVERYTHING);
        let r = it.next_input().unwrap();
        assert_eq!(r.tag, Tag(9));
        assert_eq!(r.bounds, Rect::new(5, 5, 15, 7));
        assert_eq!(it.next_input().unwrap().bounds, Rect::EVERYTHING);
    }

    #[test]
    fn root_clip_bounds_everything() {
        let mut ops = Ops::new();
        ops.context().color(RED);
        let mut it = ops.elements(Rect::new(0, 0, 8, 8));
        assert_eq!(it.next_element().unwrap().clip, Rect::new(0, 0, 8, 8));
    }

    #[test]
    #[should_panic(expected = "mask stack overflow")]
    fn too_many_masks_panics() {
        let mut ops = Ops::new();
        let mut ctx = ops.context();
        for _ in 0..=MAX_MASK_DEPTH {
            ctx.wedge(Rect::new(0, 0, 1, 1), 1);
        }
        ctx.color(RED);
        let mut it = ops.elements(Rect::EVERYTHING);
        let _ = it.next_item();
    }

    #[test]
    #[should_panic(expected = "call stack overflow")]
    fn unbounded_nesting_panics() {
        let mut ops = Ops::new();
        let mut ctx = ops.context();
        let mut inner = ctx.begin();
        inner.color(RED);
        let mut call = ctx.end();
        for _ in 0..MAX_CALL_DEPTH {
            let mut wrap = ctx.begin();
            call.add(&mut wrap);
            call = ctx.end();
        }
        call.add(&mut ctx);
        let mut it = ops.elements(Rect::EVERYTHING);
        let _ = it.next_item();
    }
}
