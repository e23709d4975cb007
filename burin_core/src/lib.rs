// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Allocation-free scene recording, damage diffing and compositing.
//!
//! `burin_core` is the drawing engine for a device whose display sits behind
//! a slow transport and whose allocator must not be touched after start-up.
//! A frame is recorded into a flat, pre-sized instruction stream; the stream
//! is compared against the previous frame's to find the region that changed,
//! and only that region is rasterized and sent to the display.
//!
//! # Architecture
//!
//! ```text
//!   Ops::reset ──► Ctx (record) ──► Stream
//!                                      │
//!         ┌────────────────────────────┼──────────────────┐
//!         ▼                            ▼                  ▼
//!   Ops::damage(prev, cur)     Ops::draw_clipped     Ops::hit
//!         │                            │                  │
//!         ▼                            ▼                  ▼
//!     damage Rect ───────────► framebuffer          (Tag, Rect)
//! ```
//!
//! **[`ops`]**: The instruction stream and everything that reads it.
//! [`Ctx`](ops::Ctx) records offsets, clips, image leaves and input regions;
//! `begin`/`end` capture a span as a [`CallOp`](ops::CallOp) that can be
//! spliced into the frame any number of times. [`FrameIter`](ops::FrameIter)
//! replays a stream into flattened elements, which the differ, the hit
//! tester and the compositor all consume.
//!
//! **[`composite`]**: Rasterizes elements through their mask stacks, with
//! scanline fast paths for RGB565 destinations.
//!
//! **[`generator`]**: Procedural pixel sources addressed by
//! [`GeneratorId`](generator::GeneratorId): solid fills, glyphs, edge fades,
//! progress wedges.
//!
//! **[`image`]**: Pixel formats and the [`Canvas`](image::Canvas)
//! destination trait.
//!
//! **[`geom`]** and **[`color`]**: Integer geometry and color types.
//!
//! **[`config`]**: Stream capacities and fixed engine limits.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates the
//!   per-contribution damage rectangle event.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod color;
pub mod composite;
pub mod config;
pub mod generator;
pub mod geom;
pub mod image;
pub mod ops;
pub mod trace;
