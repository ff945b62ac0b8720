//! Subgraph-isomorphism mapping of one gate range onto the coupling graph.
//!
//! The qubits a range touches form an interaction graph. Each connected
//! component (an [`Island`]) must embed into the part of the coupling graph
//! not yet used by earlier islands, so that every two-qubit gate of the range
//! lands on a coupling edge. Islands are embedded one after the other inside
//! a single backtracking search over per-island candidate spaces.
//!
//! A failed attempt returns the conflicts recorded at the deepest point the
//! search reached; the segmentation driver uses them to decide where to cut.

mod candidate;
mod heuristic;
mod island;
mod search;

use std::ops::RangeInclusive;

use tracing::debug;

use skein_ir::{DependencyGraph, GateIndex, Layout};

use crate::config::MapperConfig;
use crate::coupling::CouplingMap;
use crate::error::CompileResult;

pub use candidate::CandidateSpace;
pub use heuristic::{ConflictReport, FailureHeuristic};
pub use island::{Island, islands};

/// Result of one mapping attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOutcome {
    /// Every touched qubit is placed; untouched qubits are left unmapped.
    Mapped(Layout),
    /// No embedding was found (or the call budget ran out).
    Conflicted(ConflictReport),
}

impl MappingOutcome {
    /// Whether the attempt produced a layout.
    pub fn is_mapped(&self) -> bool {
        matches!(self, Self::Mapped(_))
    }
}

/// Maps gate ranges onto a coupling map.
#[derive(Debug, Clone, Copy)]
pub struct SegmentMapper<'a> {
    coupling: &'a CouplingMap,
    config: &'a MapperConfig,
}

impl<'a> SegmentMapper<'a> {
    /// Create a mapper for `coupling`.
    pub fn new(coupling: &'a CouplingMap, config: &'a MapperConfig) -> Self {
        Self { coupling, config }
    }

    /// Try to find one layout under which every gate in `range` is executable.
    pub fn map(
        &self,
        graph: &DependencyGraph,
        range: RangeInclusive<GateIndex>,
    ) -> CompileResult<MappingOutcome> {
        let gates = graph.range(range.clone())?;
        let found = islands(gates, self.config.island_order);

        let search = search::SegmentSearch::new(
            self.coupling,
            &found,
            graph.num_qubits(),
            self.config.limits.mapper_budget(),
        );
        let (outcome, calls) = search.run()?;

        debug!(
            "Mapping gates {}..={}: {} islands, {} calls, mapped: {}",
            range.start(),
            range.end(),
            found.len(),
            calls,
            outcome.is_mapped()
        );
        Ok(outcome)
    }
}
