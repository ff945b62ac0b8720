//! Output of routing: segments, their layouts and the swaps between them.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::dag::GateIndex;
use crate::layout::Layout;

/// A closed gate range executed under one fixed layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// First gate of the segment.
    pub start: GateIndex,
    /// Last gate of the segment (inclusive).
    pub end: GateIndex,
    /// Layout valid for every gate in the segment.
    pub layout: Layout,
}

impl Segment {
    /// Create a segment covering `range`.
    pub fn new(range: RangeInclusive<GateIndex>, layout: Layout) -> Self {
        let (start, end) = range.into_inner();
        Self { start, end, layout }
    }

    /// The covered gate range.
    #[inline]
    pub fn range(&self) -> RangeInclusive<GateIndex> {
        self.start..=self.end
    }

    /// Number of gates in the segment.
    #[inline]
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    /// Whether the range is inverted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Ordered physical swaps executed between two segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPlan {
    swaps: Vec<(u32, u32)>,
}

impl SwapPlan {
    /// Create a plan from a swap list.
    pub fn new(swaps: Vec<(u32, u32)>) -> Self {
        Self { swaps }
    }

    /// The swaps in execution order.
    pub fn swaps(&self) -> &[(u32, u32)] {
        &self.swaps
    }

    /// Number of swaps.
    #[inline]
    pub fn len(&self) -> usize {
        self.swaps.len()
    }

    /// Whether the plan is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty()
    }

    /// Apply every swap to `layout`.
    pub fn apply(&self, layout: &mut Layout) {
        for &(a, b) in &self.swaps {
            layout.swap(a, b);
        }
    }
}

/// A fully routed circuit: `n` segments and the `n - 1` swap plans between
/// consecutive segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutedCircuit {
    /// Segments in program order.
    pub segments: Vec<Segment>,
    /// `swap_plans[i]` runs between `segments[i]` and `segments[i + 1]`.
    pub swap_plans: Vec<SwapPlan>,
    /// Physical qubit count of the target.
    pub num_physical: u32,
}

impl RoutedCircuit {
    /// Total number of inserted swaps.
    pub fn total_swaps(&self) -> usize {
        self.swap_plans.iter().map(SwapPlan::len).sum()
    }

    /// Number of segments (each one a distinct initial mapping).
    pub fn num_mappings(&self) -> usize {
        self.segments.len()
    }
}
