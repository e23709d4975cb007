// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat instruction encoding.
//!
//! A [`Stream`] is two append-only arrays: 32-bit words holding instruction
//! headers and numeric arguments, and [`Ref`]s holding everything that is
//! not a number. Each instruction is one header word followed by its
//! arguments; its references are the next run of entries in the reference
//! array. The header packs:
//!
//! ```text
//!  31            16 15      8 7   4 3    0
//! ┌────────────────┬─────────┬─────┬──────┐
//! │  argument count│ref count│  0  │ kind │
//! └────────────────┴─────────┴─────┴──────┘
//! ```
//!
//! Both arrays are allocated once with a fixed capacity. Appending past it
//! panics; nothing is truncated and nothing is reallocated.

use alloc::vec::Vec;
use core::fmt;

use crate::generator::GlyphSource;
use crate::geom::Rect;
use crate::image::ImageRef;

/// Instruction kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Kind {
    Begin = 0,
    End = 1,
    Offset = 2,
    Image = 3,
    Clip = 4,
    Call = 5,
    Input = 6,
}

impl Kind {
    fn from_bits(bits: u32) -> Self {
        match bits {
            0 => Self::Begin,
            1 => Self::End,
            2 => Self::Offset,
            3 => Self::Image,
            4 => Self::Clip,
            5 => Self::Call,
            6 => Self::Input,
            _ => unreachable!("corrupt instruction header"),
        }
    }
}

/// Most arguments one instruction can carry.
pub(crate) const MAX_ARGS: usize = 0xffff;

/// Most references one instruction can carry.
pub(crate) const MAX_REFS: usize = 0xff;

/// Number of fixed argument words in front of an image's own arguments:
/// mask kind, generator id, and four bounds coordinates.
pub(crate) const IMAGE_FIXED_ARGS: usize = 6;

/// An identity attached to an input region.
///
/// The widget layer picks the values; the engine only compares them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub u32);

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

/// A non-numeric instruction operand.
///
/// References compare by identity, never by content: two frames that
/// reference the same image object are considered to draw the same pixels.
#[derive(Clone, Copy, Default)]
pub enum Ref<'a> {
    /// Nothing; the source slot of a generated image.
    #[default]
    None,
    /// A concrete source image.
    Image(ImageRef<'a>),
    /// A glyph supplier, such as a rasterized font face.
    Glyphs(&'a dyn GlyphSource),
    /// An input-region identity.
    Tag(Tag),
}

impl Ref<'_> {
    /// Identity comparison.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Image(a), Self::Image(b)) => a.same(b),
            (Self::Glyphs(a), Self::Glyphs(b)) => core::ptr::addr_eq(*a, *b),
            (Self::Tag(a), Self::Tag(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Ref<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Image(img) => write!(f, "Image({:?})", img.bounds()),
            Self::Glyphs(g) => write!(f, "Glyphs({:p})", *g),
            Self::Tag(t) => write!(f, "{t:?}"),
        }
    }
}

/// A position inside a [`Stream`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    /// Index into the word array.
    pub(crate) word: u32,
    /// Index into the reference array.
    pub(crate) refs: u32,
}

/// One decoded instruction.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Instr<'s, 'a> {
    pub(crate) kind: Kind,
    pub(crate) args: &'s [u32],
    pub(crate) refs: &'s [Ref<'a>],
}

/// One frame's recorded instructions.
pub struct Stream<'a> {
    words: Vec<u32>,
    refs: Vec<Ref<'a>>,
    word_capacity: usize,
    ref_capacity: usize,
}

impl fmt::Debug for Stream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("words", &self.words.len())
            .field("refs", &self.refs.len())
            .field("word_capacity", &self.word_capacity)
            .field("ref_capacity", &self.ref_capacity)
            .finish()
    }
}

impl<'a> Stream<'a> {
    /// Allocates an empty stream with fixed capacities.
    pub(crate) fn with_capacity(word_capacity: usize, ref_capacity: usize) -> Self {
        Self {
            words: Vec::with_capacity(word_capacity),
            refs: Vec::with_capacity(ref_capacity),
            word_capacity,
            ref_capacity,
        }
    }

    /// Discards all instructions, keeping the allocations.
    pub(crate) fn clear(&mut self) {
        self.words.clear();
        self.refs.clear();
    }

    /// Number of words used.
    #[must_use]
    pub fn words_used(&self) -> usize {
        self.words.len()
    }

    /// Number of references used.
    #[must_use]
    pub fn refs_used(&self) -> usize {
        self.refs.len()
    }

    /// The position the next instruction will be written at.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "stream capacities are far below u32::MAX"
    )]
    pub(crate) fn cursor(&self) -> Cursor {
        Cursor {
            word: self.words.len() as u32,
            refs: self.refs.len() as u32,
        }
    }

    /// Returns `true` if `c` points at the end of the stream.
    pub(crate) fn at_end(&self, c: Cursor) -> bool {
        c.word as usize >= self.words.len()
    }

    /// Appends one instruction whose arguments and references are given in
    /// pieces.
    ///
    /// Capacity is checked for the whole instruction before anything is
    /// written.
    ///
    /// # Panics
    ///
    /// Panics if the instruction has more than [`MAX_ARGS`] arguments or
    /// [`MAX_REFS`] references, or if either array would exceed its capacity.
    pub(crate) fn push(&mut self, kind: Kind, args: &[&[u32]], refs: &[&[Ref<'a>]]) {
        let nargs: usize = args.iter().map(|a| a.len()).sum();
        let nrefs: usize = refs.iter().map(|r| r.len()).sum();
        assert!(
            nargs <= MAX_ARGS && nrefs <= MAX_REFS,
            "instruction too large"
        );
        assert!(
            self.words.len() + 1 + nargs <= self.word_capacity,
            "word buffer capacity exhausted"
        );
        assert!(
            self.refs.len() + nrefs <= self.ref_capacity,
            "reference buffer capacity exhausted"
        );
        #[expect(
            clippy::cast_possible_truncation,
            reason = "counts were checked against the header field widths above"
        )]
        self.words
            .push((nargs as u32) << 16 | (nrefs as u32) << 8 | kind as u32);
        for a in args {
            self.words.extend_from_slice(a);
        }
        for r in refs {
            self.refs.extend_from_slice(r);
        }
    }

    /// Decodes the instruction at `c` and returns it with the cursor of the
    /// following instruction.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "positions stay within the stream, whose length fits a cursor"
    )]
    pub(crate) fn read(&self, c: Cursor) -> (Instr<'_, 'a>, Cursor) {
        let w = c.word as usize;
        let r = c.refs as usize;
        let header = self.words[w];
        let nargs = (header >> 16) as usize;
        let nrefs = ((header >> 8) & 0xff) as usize;
        let instr = Instr {
            kind: Kind::from_bits(header & 0xf),
            args: &self.words[w + 1..w + 1 + nargs],
            refs: &self.refs[r..r + nrefs],
        };
        let next = Cursor {
            word: (w + 1 + nargs) as u32,
            refs: (r + nrefs) as u32,
        };
        (instr, next)
    }
}

/// Encodes a rectangle as four words.
pub(crate) fn encode_rect(r: Rect) -> [u32; 4] {
    [
        r.min.x as u32,
        r.min.y as u32,
        r.max.x as u32,
        r.max.y as u32,
    ]
}

/// Decodes four words written by [`encode_rect`].
pub(crate) fn decode_rect(w: &[u32]) -> Rect {
    Rect {
        min: crate::geom::Point::new(w[0] as i32, w[1] as i32),
        max: crate::geom::Point::new(w[2] as i32, w[3] as i32),
    }
}
