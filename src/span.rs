//! Immutable source location primitives.

use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` character-offset range in the source text.
///
/// Merges are append-only over a node's lifetime: `extend_to` can only move
/// the end forward and `extend_back` can only move the start backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start character offset.
    pub start: u32,
    /// Exclusive end character offset.
    pub end: u32,
}

impl Span {
    /// Creates a span and normalizes offset ordering.
    pub fn new(start: u32, end: u32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Creates a span from `usize` offsets with saturation.
    pub fn from_usize(start: usize, end: usize) -> Self {
        Self::new(clamp_u32(start), clamp_u32(end))
    }

    /// Returns the span length in characters.
    pub fn len(self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` when the span covers no characters.
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Moves the end forward to cover `other`; never shrinks.
    pub fn extend_to(&mut self, other: Span) {
        if other.end > self.end {
            self.end = other.end;
        }
    }

    /// Moves the start backward to cover `other`; never shrinks.
    pub fn extend_back(&mut self, other: Span) {
        if other.start < self.start {
            self.start = other.start;
        }
    }

    /// Returns the smallest span covering both inputs.
    pub fn merge(self, other: Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

fn clamp_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
