// Copyright 2026 the Burin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine sizing.
//!
//! Buffers are sized once from an [`OpsConfig`] when [`Ops`](crate::ops::Ops)
//! is constructed. The nesting limits are compile-time constants because the
//! frame iterator keeps its stacks inline.

/// Maximum nesting of spliced spans during replay.
pub const MAX_CALL_DEPTH: usize = 32;

/// Maximum number of intersect layers stacked over one element.
pub const MAX_MASK_DEPTH: usize = 8;

/// Capacity of the generator table, built-ins included.
pub const MAX_GENERATORS: usize = 32;

/// Fixed capacities of an [`Ops`](crate::ops::Ops).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpsConfig {
    /// Words available to one frame's instruction stream.
    pub word_capacity: usize,
    /// References available to one frame's instruction stream.
    pub ref_capacity: usize,
    /// How many previous-frame elements the differ examines when looking
    /// for a match.
    pub scan_max: usize,
}

impl OpsConfig {
    /// Sized for a full-screen device UI.
    pub const DEFAULT: Self = Self {
        word_capacity: 16384,
        ref_capacity: 2048,
        scan_max: 10,
    };
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
