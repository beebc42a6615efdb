//! Inclusive integer ranges.

use serde::Serialize;

/// An inclusive `[from, to]` pair of integers with `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Range {
    pub from: u32,
    pub to: u32,
}

/// A contiguous inclusive range of seconds since midnight (`0..=86399`).
pub type Window = Range;

impl Range {
    pub const fn new(from: u32, to: u32) -> Self {
        Range { from, to }
    }

    pub fn contains(&self, value: u32) -> bool {
        self.from <= value && value <= self.to
    }

    /// Overlapping, or separated by zero units (`[1,4]` touches `[5,9]`).
    pub fn touches(&self, other: &Range) -> bool {
        self.from <= other.to + 1 && self.to + 1 >= other.from
    }

    /// Number of integers covered.
    pub fn span(&self) -> u32 {
        self.to - self.from + 1
    }
}

/// Merge a list of windows produced in ascending order, joining each window
/// onto the previous one when `prev.to + 1 == next.from`.
pub(crate) fn join_adjacent(ranges: impl IntoIterator<Item = Range>) -> Vec<Range> {
    let mut joined: Vec<Range> = Vec::new();
    for range in ranges {
        if let Some(last) = joined.last_mut() {
            if last.to + 1 == range.from {
                last.to = range.to;
                continue;
            }
        }
        joined.push(range);
    }
    joined
}
