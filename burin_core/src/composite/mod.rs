// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rasterizing a frame.
//!
//! Each element is a base layer seen through zero or more mask layers. With
//! one mask the mask is sampled directly; with more, the masks are first
//! multiplied together into the caller's scratch [`AlphaImage`], at the
//! scratch's origin, and the result is used as a single mask. The base layer
//! is then blended over the destination within the element's clip.
//!
//! Leaves with a source image are sampled from that image. Generated leaves
//! are evaluated per pixel through their generator.

mod blend;
mod fast;

use blend::Op;

use crate::color::Rgba64;
use crate::generator::{Generator, GeneratorId, ImageArgs};
use crate::geom::{Point, Rect};
use crate::image::{AlphaImage, Canvas, ImageRef};
use crate::ops::{Element, FrameIter, Layer, Ops, Ref};
use crate::trace::{DrawEvent, Tracer};

/// A pixel source in its own coordinates.
#[derive(Clone, Copy)]
pub(crate) enum Pixels<'p, 'a> {
    Image(ImageRef<'a>),
    Generated {
        id: GeneratorId,
        generator: Generator,
        args: ImageArgs<'p, 'a>,
    },
    Scratch(&'p AlphaImage),
}

impl Pixels<'_, '_> {
    #[inline]
    fn at(&self, x: i32, y: i32) -> Rgba64 {
        match self {
            Self::Image(img) => img.rgba_at(x, y),
            Self::Generated {
                generator, args, ..
            } => {
                if args.bounds.contains(Point::new(x, y)) {
                    generator(args, x, y)
                } else {
                    Rgba64::TRANSPARENT
                }
            }
            Self::Scratch(m) => {
                let a = u16::from(m.alpha_at(x, y));
                Rgba64::coverage(a << 8 | a)
            }
        }
    }
}

/// A pixel source positioned on the destination.
#[derive(Clone, Copy)]
pub(crate) struct Placed<'p, 'a> {
    pixels: Pixels<'p, 'a>,
    /// Destination point of the source's `(0, 0)`.
    origin: Point,
}

impl Placed<'_, '_> {
    /// Samples at destination coordinates.
    #[inline]
    fn at(&self, x: i32, y: i32) -> Rgba64 {
        self.pixels.at(x - self.origin.x, y - self.origin.y)
    }
}

impl<'a> Ops<'a> {
    /// Draws the current frame over all of `dst`.
    ///
    /// `scratch` holds flattened masks for elements with more than one; it
    /// must be at least as large as the largest such element.
    ///
    /// # Panics
    ///
    /// Panics if `scratch` is too small for an element that needs it.
    pub fn draw(&self, dst: &mut dyn Canvas, scratch: &mut AlphaImage) {
        self.draw_traced(dst, scratch, Rect::EVERYTHING, &mut Tracer::none());
    }

    /// Draws the current frame within `clip` only.
    ///
    /// Drawing the damage region in horizontal bands keeps each call short
    /// on a slow display transport.
    ///
    /// # Panics
    ///
    /// Panics if `scratch` is too small for an element that needs it.
    pub fn draw_clipped(&self, dst: &mut dyn Canvas, scratch: &mut AlphaImage, clip: Rect) {
        self.draw_traced(dst, scratch, clip, &mut Tracer::none());
    }

    /// Like [`draw_clipped`](Self::draw_clipped), reporting to `tracer`.
    ///
    /// # Panics
    ///
    /// Panics if `scratch` is too small for an element that needs it.
    pub fn draw_traced(
        &self,
        dst: &mut dyn Canvas,
        scratch: &mut AlphaImage,
        clip: Rect,
        tracer: &mut Tracer<'_>,
    ) {
        let root = dst.bounds().intersect(clip);
        let mut it = FrameIter::new(&self.current, root);
        let mut drawn = 0_u32;
        let mut fast_paths = 0_u32;
        while let Some(e) = it.next_element() {
            drawn += 1;
            if self.draw_element(dst, scratch, &e) {
                fast_paths += 1;
            }
        }
        tracer.draw(&DrawEvent {
            frame_index: self.frame,
            clip: root,
            drawn,
            fast_paths,
        });
    }

    /// Returns `true` if a specialized loop drew the element.
    fn draw_element(
        &self,
        dst: &mut dyn Canvas,
        scratch: &mut AlphaImage,
        e: &Element<'_, '_, 'a>,
    ) -> bool {
        let clip = e.clip;
        let src = self.place(&e.base, e.base.pos);
        match e.masks {
            [] => composite(dst, clip, &src, None),
            [m] => composite(dst, clip, &src, Some(&self.place(m, m.pos))),
            masks => {
                let size = clip.size();
                let area = Rect::from_origin_size(scratch.rect.min, size.x, size.y);
                assert!(
                    scratch.rect.contains_rect(area),
                    "mask scratch too small for clip"
                );
                let shift = scratch.rect.min - clip.min;
                for (i, m) in masks.iter().enumerate() {
                    let layer = self.place(m, m.pos + shift);
                    let op = if i == 0 { Op::Src } else { Op::Intersect };
                    blend::draw_mask(scratch, area, &layer, None, op);
                }
                let mask = Placed {
                    pixels: Pixels::Scratch(scratch),
                    origin: Point::ZERO - shift,
                };
                composite(dst, clip, &src, Some(&mask))
            }
        }
    }

    fn place<'s>(&self, layer: &Layer<'s, 'a>, origin: Point) -> Placed<'s, 'a> {
        let pixels = match layer.src {
            Ref::Image(img) => Pixels::Image(img),
            _ => Pixels::Generated {
                id: layer.generator,
                generator: self.generators.get(layer.generator),
                args: layer.image_args(),
            },
        };
        Placed { pixels, origin }
    }
}

fn composite(
    dst: &mut dyn Canvas,
    clip: Rect,
    src: &Placed<'_, '_>,
    mask: Option<&Placed<'_, '_>>,
) -> bool {
    if let Some(fb) = dst.as_rgb565_mut() {
        if fast::try_draw(fb, clip, src, mask) {
            return true;
        }
    }
    blend::draw_mask(dst, clip, src, mask, Op::Over);
    false
}
