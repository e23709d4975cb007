// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON frame dumps.
//!
//! [`frame_json`] replays the current frame of an [`Ops`] and describes each
//! flattened element and input region, in stream order. The result is meant
//! for eyeballing a frame or diffing two dumps in a test failure, not for
//! reading back.

use std::io::{self, Write};

use serde_json::{Value, json};

use burin_core::generator::{GeneratorId, glyph_args, uniform_color};
use burin_core::geom::Rect;
use burin_core::image::ImageRef;
use burin_core::ops::{Item, Layer, MaskKind, Ops, Ref};

/// Describes the current frame of `ops` as replayed within `root`.
#[must_use]
pub fn frame_json(ops: &Ops<'_>, root: Rect) -> Value {
    let mut elements = Vec::new();
    let mut inputs = Vec::new();
    let mut it = ops.elements(root);
    while let Some(item) = it.next_item() {
        match item {
            Item::Draw(e) => elements.push(json!({
                "clip": rect(e.clip),
                "masks": e.masks.iter().map(layer).collect::<Vec<_>>(),
                "base": layer(&e.base),
            })),
            Item::Input(r) => inputs.push(json!({
                "tag": r.tag.0,
                "bounds": rect(r.bounds),
            })),
        }
    }
    let stats = ops.stats();
    json!({
        "frame": ops.frame_index(),
        "words": stats.words_used,
        "refs": stats.refs_used,
        "elements": elements,
        "inputs": inputs,
    })
}

/// Writes [`frame_json`] to `writer`, pretty-printed.
pub fn write_frame(ops: &Ops<'_>, root: Rect, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &frame_json(ops, root))?;
    writeln!(writer)
}

fn rect(r: Rect) -> Value {
    json!([r.min.x, r.min.y, r.max.x, r.max.y])
}

fn layer(l: &Layer<'_, '_>) -> Value {
    let mut v = json!({
        "pos": [l.pos.x, l.pos.y],
        "clip": rect(l.clip),
        "mask": match l.mask {
            MaskKind::Fill => "fill",
            MaskKind::Intersect => "intersect",
        },
        "bounds": rect(l.bounds),
        "source": source(l),
    });
    let args = l.image_args();
    match l.generator {
        GeneratorId::UNIFORM => v["color"] = json!(uniform_color(&args)),
        GeneratorId::GLYPH => {
            if let Some((_, ch)) = glyph_args(&args) {
                v["char"] = json!(ch.to_string());
            }
        }
        GeneratorId::NONE => {}
        _ => v["args"] = json!(l.args),
    }
    v
}

fn source(l: &Layer<'_, '_>) -> String {
    match (l.generator, l.src) {
        (GeneratorId::NONE, Ref::Image(img)) => image_kind(img).to_owned(),
        (GeneratorId::UNIFORM, _) => "uniform".to_owned(),
        (GeneratorId::GLYPH, _) => "glyph".to_owned(),
        (GeneratorId::FADE, _) => "fade".to_owned(),
        (GeneratorId::WEDGE, _) => "wedge".to_owned(),
        (id, _) => format!("generator:{}", id.index()),
    }
}

fn image_kind(img: ImageRef<'_>) -> &'static str {
    match img {
        ImageRef::Rgb565(_) => "rgb565",
        ImageRef::Alpha(_) => "alpha",
        ImageRef::Alpha4(_) => "alpha4",
        ImageRef::Paletted(_) => "paletted",
    }
}
