// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! engine calls as a frame is retired, diffed, drawn and hit-tested. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates the per-contribution damage
//!   rectangle event.

use crate::geom::{Point, Rect};
use crate::ops::{StreamStats, Tag};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted by [`Ops::reset_traced`](crate::ops::Ops::reset_traced) for the
/// frame being retired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStatsEvent {
    /// Index of the retired frame.
    pub frame_index: u64,
    /// Stream usage of the retired frame.
    pub stats: StreamStats,
}

/// Emitted after the damage region of a frame is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Union of everything that changed.
    pub damage: Rect,
    /// Elements examined in the current frame before the result was known.
    pub elements: u32,
    /// How many of them matched an element of the previous frame.
    pub matched: u32,
}

/// Emitted after a draw pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Region the pass was restricted to.
    pub clip: Rect,
    /// Elements composited.
    pub drawn: u32,
    /// Elements handled by a specialized scanline loop.
    pub fast_paths: u32,
}

/// Emitted after a point hit test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The tested point.
    pub point: Point,
    /// The resolved region, if any.
    pub hit: Option<(Tag, Rect)>,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame is retired.
    fn on_frame_stats(&mut self, e: &FrameStatsEvent) {
        _ = e;
    }

    /// Called after damage is computed.
    fn on_damage(&mut self, e: &DamageEvent) {
        _ = e;
    }

    /// Called after a draw pass.
    fn on_draw(&mut self, e: &DrawEvent) {
        _ = e;
    }

    /// Called after a hit test.
    fn on_hit(&mut self, e: &HitEvent) {
        _ = e;
    }

    /// Called with the individual rectangles unioned into the damage region
    /// (requires `trace-rich` feature). May be called several times per
    /// frame.
    #[cfg(feature = "trace-rich")]
    fn on_damage_rects(&mut self, frame_index: u64, rects: &[Rect]) {
        _ = (frame_index, rects);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameStatsEvent`].
    #[inline]
    pub fn frame_stats(&mut self, e: &FrameStatsEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_stats(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DamageEvent`].
    #[inline]
    pub fn damage(&mut self, e: &DamageEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_damage(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DrawEvent`].
    #[inline]
    pub fn draw(&mut self, e: &DrawEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_draw(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`HitEvent`].
    #[inline]
    pub fn hit(&mut self, e: &HitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_hit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits damage contributions (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn damage_rects(&mut self, frame_index: u64, rects: &[Rect]) {
        if let Some(s) = &mut self.sink {
            s.on_damage_rects(frame_index, rects);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_damage() -> DamageEvent {
        DamageEvent {
            frame_index: 42,
            damage: Rect::new(0, 0, 15, 5),
            elements: 3,
            matched: 2,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_damage(&sample_damage());
        sink.on_hit(&HitEvent {
            frame_index: 0,
            point: Point::new(1, 2),
            hit: None,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.damage(&sample_damage());
        tracer.draw(&DrawEvent {
            frame_index: 1,
            clip: Rect::ZERO,
            drawn: 0,
            fast_paths: 0,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            damage: Vec<Rect>,
        }
        impl TraceSink for RecordingSink {
            fn on_damage(&mut self, e: &DamageEvent) {
                self.damage.push(e.damage);
            }
        }

        let mut sink = RecordingSink { damage: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.damage(&sample_damage());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.damage, &[Rect::new(0, 0, 15, 5)]);
    }
}
