// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame recording and replay.
//!
//! [`Ops`] owns two instruction streams: the frame being recorded and the
//! frame before it. Each frame the caller:
//!
//! 1. calls [`Ops::reset`], retiring the current stream and starting an
//!    empty one,
//! 2. records the scene through [`Ops::context`],
//! 3. asks [`Ops::damage`] which part of the screen changed,
//! 4. draws that part with [`Ops::draw_clipped`], possibly in chunks,
//! 5. routes input with [`Ops::hit`] and [`Ops::tag_bounds`].
//!
//! Nothing here allocates after construction.

mod damage;
mod hit;
mod iter;
mod record;
mod stream;
mod text;

pub use iter::{Element, FrameIter, InputRegion, Item, Layer, MaskKind};
pub use record::{CallOp, Ctx};
pub use stream::{Cursor, Ref, Stream, Tag};

use crate::config::OpsConfig;
use crate::generator::{Generator, GeneratorId, Generators};
use crate::geom::Rect;
use crate::trace::{FrameStatsEvent, Tracer};

/// Instruction stream usage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamStats {
    /// Words written.
    pub words_used: usize,
    /// Words available.
    pub word_capacity: usize,
    /// References written.
    pub refs_used: usize,
    /// References available.
    pub ref_capacity: usize,
}

/// The recording and replay engine.
///
/// `'a` bounds everything a frame may reference: source images, glyph
/// faces. Those must outlive the `Ops` because the previous frame keeps
/// them for comparison.
#[derive(Debug)]
pub struct Ops<'a> {
    pub(crate) current: Stream<'a>,
    pub(crate) previous: Stream<'a>,
    pub(crate) generators: Generators,
    pub(crate) config: OpsConfig,
    pub(crate) frame: u64,
}

impl<'a> Ops<'a> {
    /// Creates an engine with [`OpsConfig::DEFAULT`] capacities.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(OpsConfig::DEFAULT)
    }

    /// Creates an engine, allocating both streams up front.
    #[must_use]
    pub fn with_config(config: OpsConfig) -> Self {
        Self {
            current: Stream::with_capacity(config.word_capacity, config.ref_capacity),
            previous: Stream::with_capacity(config.word_capacity, config.ref_capacity),
            generators: Generators::new(),
            config,
            frame: 0,
        }
    }

    /// Starts a new frame.
    ///
    /// The current frame becomes the previous one and recording starts from
    /// empty. [`CallOp`]s from before the reset can no longer be added.
    pub fn reset(&mut self) {
        core::mem::swap(&mut self.current, &mut self.previous);
        self.current.clear();
        self.frame += 1;
    }

    /// Like [`reset`](Self::reset), reporting the retired frame's usage.
    pub fn reset_traced(&mut self, tracer: &mut Tracer<'_>) {
        tracer.frame_stats(&FrameStatsEvent {
            frame_index: self.frame,
            stats: self.stats(),
        });
        self.reset();
    }

    /// Returns a recorder appending to the current frame.
    pub fn context(&mut self) -> Ctx<'_, 'a> {
        Ctx::new(self)
    }

    /// Adds a generator to this engine's table.
    ///
    /// # Panics
    ///
    /// Panics if the table is full.
    pub fn register_generator(&mut self, generator: Generator) -> GeneratorId {
        self.generators.register(generator)
    }

    /// The generator table.
    #[must_use]
    pub fn generators(&self) -> &Generators {
        &self.generators
    }

    /// Current frame's stream usage.
    #[must_use]
    pub fn stats(&self) -> StreamStats {
        StreamStats {
            words_used: self.current.words_used(),
            word_capacity: self.config.word_capacity,
            refs_used: self.current.refs_used(),
            ref_capacity: self.config.ref_capacity,
        }
    }

    /// Number of resets so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    /// Capacities this engine was built with.
    #[must_use]
    pub fn config(&self) -> OpsConfig {
        self.config
    }

    /// Replays the current frame with `root` as the outermost clip.
    #[must_use]
    pub fn elements(&self, root: Rect) -> FrameIter<'_, 'a> {
        FrameIter::new(&self.current, root)
    }

    /// Replays the previous frame with `root` as the outermost clip.
    #[must_use]
    pub fn previous_elements(&self, root: Rect) -> FrameIter<'_, 'a> {
        FrameIter::new(&self.previous, root)
    }
}

impl Default for Ops<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Nrgba;
    use crate::geom::Point;

    #[test]
    fn reset_swaps_streams() {
        let mut ops = Ops::new();
        ops.context().color(Nrgba::opaque(1, 2, 3));
        let used = ops.stats().words_used;
        assert!(used > 0, "nothing recorded");
        ops.reset();
        assert_eq!(ops.stats().words_used, 0);
        assert_eq!(ops.previous.words_used(), used);
        assert_eq!(ops.frame_index(), 1);
        ops.reset();
        assert_eq!(ops.previous.words_used(), 0);
    }

    #[test]
    fn stats_report_configured_capacity() {
        let ops = Ops::with_config(OpsConfig {
            word_capacity: 64,
            ref_capacity: 8,
            scan_max: 3,
        });
        let s = ops.stats();
        assert_eq!((s.word_capacity, s.ref_capacity), (64, 8));
        assert_eq!((s.words_used, s.refs_used), (0, 0));
    }

    #[test]
    #[should_panic(expected = "word buffer capacity exhausted")]
    fn recording_past_capacity_is_fatal() {
        let mut ops = Ops::with_config(OpsConfig {
            word_capacity: 32,
            ref_capacity: 32,
            scan_max: 10,
        });
        let mut ctx = ops.context();
        for i in 0..32 {
            ctx.offset(Point::new(i, 0));
        }
    }

    #[test]
    #[should_panic(expected = "reference buffer capacity exhausted")]
    fn references_past_capacity_are_fatal() {
        let mut ops = Ops::with_config(OpsConfig {
            word_capacity: 1024,
            ref_capacity: 4,
            scan_max: 10,
        });
        let mut ctx = ops.context();
        for i in 0..5 {
            ctx.input(Tag(i));
        }
    }

    #[cfg(feature = "trace")]
    #[test]
    fn reset_traced_reports_retired_frame() {
        use crate::trace::TraceSink;
        use alloc::vec::Vec;

        #[derive(Default)]
        struct Sink(Vec<FrameStatsEvent>);
        impl TraceSink for Sink {
            fn on_frame_stats(&mut self, e: &FrameStatsEvent) {
                self.0.push(*e);
            }
        }

        let mut ops = Ops::new();
        ops.context().input(Tag(1));
        let mut sink = Sink::default();
        ops.reset_traced(&mut Tracer::new(&mut sink));
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].frame_index, 0);
        assert_eq!(sink.0[0].stats.refs_used, 1);
    }
}
