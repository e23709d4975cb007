// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON frame dumps for burin diagnostics.
//!
//! This crate provides [`TraceSink`](burin_core::trace::TraceSink)
//! implementations for development and post-mortem analysis, plus a frame
//! inspector:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`dump::frame_json`]: the flattened elements and input regions of a
//!   recorded frame as JSON.

pub mod dump;
pub mod pretty;
pub mod recorder;
