// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The recorder.

use super::iter::MaskKind;
use super::stream::{Cursor, Kind, Ref, Tag, encode_rect};
use super::Ops;
use crate::color::Nrgba;
use crate::generator::{FadeEdges, GeneratorId, GlyphSource};
use crate::geom::{Point, Rect};
use crate::image::ImageRef;

/// Appends instructions to the current frame of an [`Ops`].
///
/// A `Ctx` can open one span at a time with [`begin`](Self::begin). The
/// span's contents are recorded through the returned context and the span
/// is closed on the opening context with [`end`](Self::end):
///
/// ```
/// # use burin_core::color::Nrgba;
/// # use burin_core::geom::{Point, Rect};
/// # use burin_core::ops::Ops;
/// let mut ops = Ops::new();
/// let mut ctx = ops.context();
/// let mut inner = ctx.begin();
/// inner.clip(Rect::new(0, 0, 5, 5));
/// inner.color(Nrgba::opaque(0xff, 0, 0));
/// let square = ctx.end();
/// ctx.position(&square, Point::new(10, 0));
/// ctx.position(&square, Point::new(20, 0));
/// ```
///
/// Recorded spans are skipped during replay until a [`CallOp`] splices them
/// in.
#[derive(Debug)]
pub struct Ctx<'o, 'a> {
    ops: Option<&'o mut Ops<'a>>,
    begin: Option<Cursor>,
}

impl<'o, 'a> Ctx<'o, 'a> {
    pub(super) fn new(ops: &'o mut Ops<'a>) -> Self {
        Self {
            ops: Some(ops),
            begin: None,
        }
    }

    /// A context that records nothing.
    ///
    /// Every operation on it is a no-op and [`end`](Self::end) returns an
    /// empty [`CallOp`]; layout code uses it to measure without drawing.
    #[must_use]
    pub const fn noop() -> Self {
        Self {
            ops: None,
            begin: None,
        }
    }

    /// Returns `true` if this context discards everything.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.ops.is_none()
    }

    /// Opens a span and returns a context recording into it.
    ///
    /// # Panics
    ///
    /// Panics if this context already has an open span.
    pub fn begin(&mut self) -> Ctx<'_, 'a> {
        let Some(ops) = self.ops.as_deref_mut() else {
            return Ctx::noop();
        };
        assert!(self.begin.is_none(), "begin while a span is already open");
        ops.current.push(Kind::Begin, &[], &[]);
        self.begin = Some(ops.current.cursor());
        Ctx {
            ops: Some(ops),
            begin: None,
        }
    }

    /// Closes the span opened by [`begin`](Self::begin) and returns a handle
    /// to it.
    ///
    /// # Panics
    ///
    /// Panics if no span is open.
    pub fn end(&mut self) -> CallOp {
        let Some(ops) = self.ops.as_deref_mut() else {
            return CallOp::default();
        };
        let Some(start) = self.begin.take() else {
            panic!("end without a begin");
        };
        ops.current.push(Kind::End, &[], &[]);
        CallOp {
            start,
            frame: ops.frame,
        }
    }

    /// Moves everything recorded after this point, until the enclosing
    /// scope closes.
    pub fn offset(&mut self, d: Point) {
        if let Some(ops) = self.ops.as_deref_mut() {
            ops.current
                .push(Kind::Offset, &[&[d.x as u32, d.y as u32]], &[]);
        }
    }

    /// Restricts everything recorded after this point to `r`, relative to
    /// the current offset.
    pub fn clip(&mut self, r: Rect) {
        if let Some(ops) = self.ops.as_deref_mut() {
            ops.current.push(Kind::Clip, &[&encode_rect(r)], &[]);
        }
    }

    /// Marks the current clip as an input region identified by `tag`.
    pub fn input(&mut self, tag: Tag) {
        if let Some(ops) = self.ops.as_deref_mut() {
            ops.current.push(Kind::Input, &[], &[&[Ref::Tag(tag)]]);
        }
    }

    /// Offsets, then splices `call`.
    pub fn position(&mut self, call: &CallOp, offset: Point) {
        self.offset(offset);
        call.add(self);
    }

    /// Fills the current clip with a solid color.
    pub fn color(&mut self, c: Nrgba) {
        self.leaf(
            Ref::None,
            GeneratorId::UNIFORM,
            MaskKind::Fill,
            Rect::EVERYTHING,
            &[],
            &[c.pack_premultiplied()],
        );
    }

    /// Draws a source image, or with [`MaskKind::Intersect`] masks the next
    /// fill by its alpha.
    pub fn image(&mut self, img: ImageRef<'a>, mask: MaskKind) {
        self.leaf(Ref::Image(img), GeneratorId::NONE, mask, img.bounds(), &[], &[]);
    }

    /// Masks the next fill by the glyph for `ch`, with the pen at the
    /// current offset.
    ///
    /// A glyph the face lacks records an empty clip, so the fill that
    /// follows draws nothing.
    pub fn glyph(&mut self, face: &'a dyn GlyphSource, ch: char) {
        if self.is_noop() {
            return;
        }
        match face.glyph(ch) {
            Some(bitmap) => self.leaf(
                Ref::None,
                GeneratorId::GLYPH,
                MaskKind::Intersect,
                bitmap.rect,
                &[Ref::Glyphs(face)],
                &[ch as u32],
            ),
            None => self.clip(Rect::ZERO),
        }
    }

    /// Records a leaf drawn by a registered generator.
    ///
    /// The generator sees `refs` and `args` through
    /// [`ImageArgs`](crate::generator::ImageArgs) when it is evaluated.
    ///
    /// # Panics
    ///
    /// Panics with "instruction too large" if `refs` holds more than 254
    /// entries or `args` more than 65529 words, and panics if the stream
    /// is out of capacity.
    pub fn param_image(
        &mut self,
        generator: GeneratorId,
        mask: MaskKind,
        bounds: Rect,
        refs: &[Ref<'a>],
        args: &[u32],
    ) {
        self.leaf(Ref::None, generator, mask, bounds, refs, args);
    }

    /// Records an edge fade over `bounds`, ramping over `length` pixels.
    pub fn fade(&mut self, bounds: Rect, edges: FadeEdges, length: u32, mask: MaskKind) {
        self.leaf(
            Ref::None,
            GeneratorId::FADE,
            mask,
            bounds,
            &[],
            &[edges.to_bits(), length],
        );
    }

    /// Masks the next fill by a clockwise sweep over `bounds`.
    ///
    /// `progress` is in units of 1/65536 turn; see
    /// [`WEDGE_FULL`](crate::generator::WEDGE_FULL).
    pub fn wedge(&mut self, bounds: Rect, progress: u32) {
        self.leaf(
            Ref::None,
            GeneratorId::WEDGE,
            MaskKind::Intersect,
            bounds,
            &[],
            &[progress],
        );
    }

    fn leaf(
        &mut self,
        src: Ref<'a>,
        generator: GeneratorId,
        mask: MaskKind,
        bounds: Rect,
        refs: &[Ref<'a>],
        args: &[u32],
    ) {
        if let Some(ops) = self.ops.as_deref_mut() {
            ops.current.push(
                Kind::Image,
                &[
                    &[mask as u32, u32::from(generator.index())],
                    &encode_rect(bounds),
                    args,
                ],
                &[&[src], refs],
            );
        }
    }
}

/// A handle to a recorded span.
///
/// Adding it splices the span at the current offset and clip without
/// copying its instructions. Handles are valid only in the frame they were
/// recorded in. The default handle is empty and adds nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallOp {
    start: Cursor,
    frame: u64,
}

impl CallOp {
    /// Returns `true` for the handle that draws nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == Cursor::default()
    }

    /// Splices the span into `ctx`.
    ///
    /// # Panics
    ///
    /// Panics if the handle was recorded before the last
    /// [`Ops::reset`].
    pub fn add(&self, ctx: &mut Ctx<'_, '_>) {
        if self.is_empty() {
            return;
        }
        let Some(ops) = ctx.ops.as_deref_mut() else {
            return;
        };
        assert!(
            self.frame == ops.frame,
            "stale CallOp from an earlier frame"
        );
        ops.current
            .push(Kind::Call, &[&[self.start.word, self.start.refs]], &[]);
    }
}
