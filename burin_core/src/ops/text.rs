// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading text back out of a frame.

use core::fmt;

use super::Ops;
use super::iter::{FrameIter, Layer};
use crate::generator::{GeneratorId, glyph_args};
use crate::geom::Rect;

impl Ops<'_> {
    /// Writes the characters of every visible glyph within `dst`, in draw
    /// order.
    ///
    /// UI tests use this to read the screen without rasterizing it.
    pub fn extract_text(&self, dst: Rect, w: &mut impl fmt::Write) -> fmt::Result {
        let mut it = FrameIter::new(&self.current, dst);
        while let Some(e) = it.next_element() {
            for layer in e.masks.iter().chain(core::iter::once(&e.base)) {
                if let Some(ch) = glyph_char(layer) {
                    w.write_char(ch)?;
                }
            }
        }
        Ok(())
    }
}

fn glyph_char(layer: &Layer<'_, '_>) -> Option<char> {
    if layer.generator != GeneratorId::GLYPH {
        return None;
    }
    glyph_args(&layer.image_args()).map(|(_, ch)| ch)
}
