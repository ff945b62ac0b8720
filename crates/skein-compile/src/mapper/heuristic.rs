//! Conflict accounting for failed mapping attempts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use skein_ir::QubitId;

/// Keeps the conflicts recorded at the deepest point a search reached.
///
/// Depth is the number of logical qubits mapped when the conflict was seen.
/// A deeper conflict replaces everything recorded so far; one at the same
/// depth is added.
#[derive(Debug, Clone, Default)]
pub struct FailureHeuristic {
    depth: usize,
    conflicts: BTreeSet<(QubitId, QubitId)>,
}

impl FailureHeuristic {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `qubit` could not be placed next to `partner`.
    pub fn record(&mut self, depth: usize, qubit: QubitId, partner: QubitId) {
        if depth > self.depth {
            self.depth = depth;
            self.conflicts.clear();
        }
        if depth == self.depth {
            self.conflicts.insert((qubit, partner));
        }
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        self.depth = 0;
        self.conflicts.clear();
    }

    /// Deepest depth reached.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Finish the attempt.
    pub fn into_report(self, budget_exhausted: bool) -> ConflictReport {
        ConflictReport {
            depth: self.depth,
            conflicts: self.conflicts.into_iter().collect(),
            budget_exhausted,
        }
    }
}

/// Why a segment could not be mapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Logical qubits mapped at the deepest point of the search.
    pub depth: usize,
    /// `(qubit, partner)` pairs that blocked the search there, ascending.
    pub conflicts: Vec<(QubitId, QubitId)>,
    /// Whether the attempt ran out of its call budget.
    pub budget_exhausted: bool,
}
