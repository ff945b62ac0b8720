//! Per-pair interaction positions.

use rustc_hash::FxHashMap;
use std::ops::RangeInclusive;

use crate::dag::GateIndex;
use crate::qubit::QubitId;

/// For every unordered qubit pair, the gate positions where that pair
/// interacts, in strictly increasing order.
///
/// Single-qubit gates on `q` are recorded under the pair `(q, q)`. Positions
/// are appended in program order, so each list stays sorted without any
/// re-sorting.
#[derive(Debug, Clone, Default)]
pub struct LiveRanges {
    positions: FxHashMap<(u32, u32), Vec<GateIndex>>,
}

#[inline]
fn key(a: QubitId, b: QubitId) -> (u32, u32) {
    if a.0 <= b.0 { (a.0, b.0) } else { (b.0, a.0) }
}

impl LiveRanges {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `(a, b)` interacts at `position`.
    ///
    /// Positions must be recorded in increasing order.
    pub(crate) fn record(&mut self, a: QubitId, b: QubitId, position: GateIndex) {
        let list = self.positions.entry(key(a, b)).or_default();
        debug_assert!(list.last().is_none_or(|&last| last < position));
        list.push(position);
    }

    /// All positions of the pair, ascending. Empty if the pair never interacts.
    pub fn positions(&self, a: QubitId, b: QubitId) -> &[GateIndex] {
        match self.positions.get(&key(a, b)) {
            Some(list) => list,
            None => &[],
        }
    }

    /// The latest position of the pair inside `range` (both ends inclusive).
    pub fn latest_within(
        &self,
        a: QubitId,
        b: QubitId,
        range: RangeInclusive<GateIndex>,
    ) -> Option<GateIndex> {
        let list = self.positions(a, b);
        // First index past the end of the range.
        let end = list.partition_point(|&p| p <= *range.end());
        list[..end]
            .last()
            .copied()
            .filter(|&p| p >= *range.start())
    }

    /// Number of distinct pairs recorded.
    pub fn num_pairs(&self) -> usize {
        self.positions.len()
    }

    /// Iterate over `(pair, positions)` in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = ((QubitId, QubitId), &[GateIndex])> {
        self.positions
            .iter()
            .map(|(&(a, b), list)| ((QubitId(a), QubitId(b)), list.as_slice()))
    }
}
