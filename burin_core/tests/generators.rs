// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generators registered from outside the crate draw and diff like the
//! built-in ones.

use burin_core::color::{Nrgba, Rgba64};
use burin_core::generator::{GeneratorId, ImageArgs};
use burin_core::geom::{Point, Rect};
use burin_core::image::{AlphaImage, ImageRef, Rgb565, Rgb565Image};
use burin_core::ops::{MaskKind, Ops, Ref};

const SCREEN: Rect = Rect::new(0, 0, 8, 4);
const STRIP: Rect = Rect::new(0, 0, 8, 1);

/// Repeats the referenced image across the leaf bounds, shifted right by
/// the first argument.
fn tile(args: &ImageArgs<'_, '_>, x: i32, y: i32) -> Rgba64 {
    let (Some(Ref::Image(img)), Some(&shift)) = (args.refs.first(), args.args.first()) else {
        return Rgba64::TRANSPARENT;
    };
    let r = img.bounds();
    let shift = i32::try_from(shift).unwrap_or(0);
    let tx = r.min.x + (x - shift - r.min.x).rem_euclid(r.width());
    let ty = r.min.y + (y - r.min.y).rem_euclid(r.height());
    img.rgba_at(tx, ty)
}

fn stripe() -> AlphaImage {
    let mut img = AlphaImage::new(Rect::new(0, 0, 2, 1));
    img.pix[0] = 0xff;
    img
}

fn record<'a>(ops: &mut Ops<'a>, id: GeneratorId, img: &'a AlphaImage, shift: u32) {
    let mut ctx = ops.context();
    ctx.param_image(
        id,
        MaskKind::Intersect,
        STRIP,
        &[Ref::Image(ImageRef::Alpha(img))],
        &[shift],
    );
    ctx.color(Nrgba::opaque(0xff, 0, 0));
}

#[test]
fn registered_generator_draws_through_masks() {
    let img = stripe();
    let mut ops = Ops::new();
    let id = ops.register_generator(tile);
    assert_ne!(id, GeneratorId::NONE);
    record(&mut ops, id, &img, 0);

    let mut fb = Rgb565Image::new(SCREEN);
    let mut scratch = AlphaImage::new(SCREEN);
    ops.draw(&mut fb, &mut scratch);

    let red = Rgb565::from_rgb888(0xff, 0, 0);
    let black = Rgb565::from_rgb888(0, 0, 0);
    for x in 0..8 {
        let want = if x % 2 == 0 { red } else { black };
        assert_eq!(fb.at(x, 0), want, "pixel ({x}, 0)");
    }
    // Outside the leaf bounds the mask is closed.
    assert_eq!(fb.at(0, 1), black);
}

#[test]
fn registered_generator_diffs_by_arguments_and_identity() {
    let img = stripe();
    let twin = stripe();
    let mut ops = Ops::new();
    let id = ops.register_generator(tile);

    record(&mut ops, id, &img, 0);
    ops.reset();
    record(&mut ops, id, &img, 0);
    assert!(ops.damage(SCREEN).is_empty(), "identical frames damaged");

    ops.reset();
    record(&mut ops, id, &img, 1);
    assert_eq!(ops.damage(SCREEN), STRIP, "changed argument not damaged");

    // Equal pixels behind a different object still count as a change.
    ops.reset();
    record(&mut ops, id, &twin, 1);
    assert_eq!(ops.damage(SCREEN), STRIP, "changed reference not damaged");

    ops.reset();
    record(&mut ops, id, &twin, 1);
    assert!(ops.damage(SCREEN).is_empty(), "identical frames damaged");
}

#[test]
fn generators_survive_resets() {
    let img = stripe();
    let mut ops = Ops::new();
    let id = ops.register_generator(tile);
    for _ in 0..3 {
        ops.reset();
    }
    record(&mut ops, id, &img, 1);

    let mut fb = Rgb565Image::new(SCREEN);
    let mut scratch = AlphaImage::new(SCREEN);
    ops.draw(&mut fb, &mut scratch);
    assert_eq!(fb.at(1, 0), Rgb565::from_rgb888(0xff, 0, 0));
    assert_eq!(fb.at(0, 0), Rgb565::from_rgb888(0, 0, 0));
}
