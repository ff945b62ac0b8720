//! Backtracking over the candidate spaces of all islands of a segment.

use std::collections::BTreeSet;

use skein_ir::{Layout, QubitId};

use super::candidate::CandidateSpace;
use super::heuristic::FailureHeuristic;
use super::island::Island;
use super::MappingOutcome;
use crate::coupling::CouplingMap;
use crate::error::CompileResult;

/// One mapping attempt.
///
/// The state is a single partial embedding (`image` and `used`) plus the
/// order in which logical qubits were placed. Every placement is undone on
/// the way back out of the recursion.
///
/// Islands with edges are searched in the given order; single-qubit islands
/// always come after them, since any free physical qubit suits them.
pub(crate) struct SegmentSearch<'a> {
    coupling: &'a CouplingMap,
    islands: Vec<&'a Island>,
    image: Vec<Option<u32>>,
    used: Vec<bool>,
    placed: Vec<QubitId>,
    heuristic: FailureHeuristic,
    calls: u64,
    budget: Option<u64>,
    exhausted: bool,
}

impl<'a> SegmentSearch<'a> {
    pub(crate) fn new(
        coupling: &'a CouplingMap,
        islands: &'a [Island],
        num_logical: u32,
        budget: Option<u64>,
    ) -> Self {
        let (isolated, connected): (Vec<&Island>, Vec<&Island>) =
            islands.iter().partition(|island| island.is_isolated());

        Self {
            coupling,
            islands: connected.into_iter().chain(isolated).collect(),
            image: vec![None; num_logical as usize],
            used: vec![false; coupling.num_qubits() as usize],
            placed: Vec::new(),
            heuristic: FailureHeuristic::new(),
            calls: 0,
            budget,
            exhausted: false,
        }
    }

    /// Run the attempt to completion.
    pub(crate) fn run(mut self) -> CompileResult<(MappingOutcome, u64)> {
        self.heuristic.reset();
        if self.map_from(0) {
            let pairs = self
                .image
                .iter()
                .enumerate()
                .filter_map(|(l, p)| p.map(|p| (QubitId::from(l), p)));
            let layout = Layout::from_pairs(self.image.len() as u32, pairs)?;
            Ok((MappingOutcome::Mapped(layout), self.calls))
        } else {
            let report = self.heuristic.into_report(self.exhausted);
            Ok((MappingOutcome::Conflicted(report), self.calls))
        }
    }

    fn tick(&mut self) -> bool {
        self.calls += 1;
        if self.budget.is_some_and(|budget| self.calls > budget) {
            self.exhausted = true;
        }
        !self.exhausted
    }

    fn place(&mut self, qubit: QubitId, physical: u32) {
        self.image[qubit.index()] = Some(physical);
        self.used[physical as usize] = true;
        self.placed.push(qubit);
    }

    fn unplace(&mut self, qubit: QubitId, physical: u32) {
        self.image[qubit.index()] = None;
        self.used[physical as usize] = false;
        self.placed.pop();
    }

    /// Map islands `index..` on top of the current state.
    fn map_from(&mut self, index: usize) -> bool {
        let Some(island) = self.islands.get(index).copied() else {
            return true;
        };

        if island.is_isolated() {
            return self.place_isolated(index, island.vertices()[0]);
        }

        let space = CandidateSpace::build(island, self.coupling, &self.used);
        let mut frontier = BTreeSet::from([space.root()]);
        self.extend(index, &space, &mut frontier, 0)
    }

    /// A qubit with no two-qubit partner takes the lowest free physical qubit.
    fn place_isolated(&mut self, index: usize, qubit: QubitId) -> bool {
        if !self.tick() {
            return false;
        }
        let Some(physical) = self.used.iter().position(|used| !used) else {
            self.heuristic.record(self.placed.len(), qubit, qubit);
            return false;
        };

        let physical = physical as u32;
        self.place(qubit, physical);
        if self.map_from(index + 1) {
            return true;
        }
        self.unplace(qubit, physical);
        false
    }

    /// Extend the embedding of the current island by one vertex.
    fn extend(
        &mut self,
        index: usize,
        space: &CandidateSpace,
        frontier: &mut BTreeSet<QubitId>,
        mapped: usize,
    ) -> bool {
        if mapped == space.len() {
            return self.map_from(index + 1);
        }
        if !self.tick() {
            return false;
        }

        let eligible = frontier.iter().copied().find(|&v| {
            space
                .parents(v)
                .iter()
                .all(|p| self.image[p.index()].is_some())
        });
        let Some(vertex) = eligible else {
            return false;
        };
        let is_root = vertex == space.root();

        let options = self.options(space, vertex);
        if options.is_empty() && !is_root {
            let depth = self.placed.len();
            for &parent in space.parents(vertex) {
                self.heuristic.record(depth, vertex, parent);
            }
            return false;
        }

        frontier.remove(&vertex);
        let mut added = Vec::new();
        for &child in space.children(vertex) {
            if frontier.insert(child) {
                added.push(child);
            }
        }

        for physical in options {
            self.place(vertex, physical);
            if self.extend(index, space, frontier, mapped + 1) {
                return true;
            }
            self.unplace(vertex, physical);
            if self.exhausted {
                break;
            }
        }

        for child in added {
            frontier.remove(&child);
        }
        frontier.insert(vertex);

        if is_root && !self.exhausted {
            let partner = self
                .placed
                .last()
                .or_else(|| space.children(vertex).first())
                .copied()
                .unwrap_or(vertex);
            self.heuristic.record(self.placed.len(), vertex, partner);
        }
        false
    }

    /// Free candidates of `vertex` adjacent to the images of all its parents,
    /// ascending.
    fn options(&self, space: &CandidateSpace, vertex: QubitId) -> Vec<u32> {
        let free = |p: &u32| !self.used[*p as usize];

        let Some((&first, rest)) = space.parents(vertex).split_first() else {
            return space.candidates(vertex).iter().copied().filter(free).collect();
        };
        let Some(first_image) = self.image[first.index()] else {
            return Vec::new();
        };

        space
            .adjacent(first, vertex, first_image)
            .iter()
            .copied()
            .filter(free)
            .filter(|p| {
                rest.iter().all(|&parent| {
                    self.image[parent.index()].is_some_and(|image| {
                        space.adjacent(parent, vertex, image).binary_search(p).is_ok()
                    })
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IslandOrder;
    use crate::mapper::island::islands;
    use skein_ir::{DependencyGraph, GateRecord};

    fn attempt(
        records: Vec<GateRecord>,
        coupling: &CouplingMap,
        budget: Option<u64>,
    ) -> MappingOutcome {
        attempt_in_order(records, coupling, budget, IslandOrder::LargestFirst)
    }

    fn attempt_in_order(
        records: Vec<GateRecord>,
        coupling: &CouplingMap,
        budget: Option<u64>,
        order: IslandOrder,
    ) -> MappingOutcome {
        let dag = DependencyGraph::from_records(coupling.num_qubits(), records).unwrap();
        let found = islands(dag.gates(), order);
        SegmentSearch::new(coupling, &found, dag.num_qubits(), budget)
            .run()
            .unwrap()
            .0
    }

    #[test]
    fn test_path_embeds_on_line() {
        let coupling = CouplingMap::linear(3);
        let outcome = attempt(vec![GateRecord::cx(0, 1), GateRecord::cx(1, 2)], &coupling, None);

        let MappingOutcome::Mapped(layout) = outcome else {
            panic!("expected a mapping");
        };
        assert_eq!(layout.get_physical(QubitId(1)), Some(1));
        assert_eq!(layout.get_physical(QubitId(0)), Some(0));
        assert_eq!(layout.get_physical(QubitId(2)), Some(2));
    }

    #[test]
    fn test_triangle_on_line_reports_deepest_conflict() {
        let coupling = CouplingMap::linear(3);
        let outcome = attempt(
            vec![GateRecord::cx(0, 1), GateRecord::cx(1, 2), GateRecord::cx(0, 2)],
            &coupling,
            None,
        );

        let MappingOutcome::Conflicted(report) = outcome else {
            panic!("a triangle does not fit a line");
        };
        assert!(!report.budget_exhausted);
        assert_eq!(report.depth, 1);
        assert_eq!(report.conflicts, vec![(QubitId(1), QubitId(0))]);
    }

    #[test]
    fn test_failure_in_later_island_backtracks_into_earlier_one() {
        // 0-1-2-3 with a pendant 4 on 1. The pair's first placements leave no
        // room for the path; only the pair on (2, 3) does.
        let coupling = CouplingMap::from_edges(5, [(0, 1), (1, 2), (2, 3), (1, 4)]).unwrap();
        let outcome = attempt_in_order(
            vec![GateRecord::cx(0, 1), GateRecord::cx(2, 3), GateRecord::cx(3, 4)],
            &coupling,
            None,
            IslandOrder::Discovery,
        );

        let MappingOutcome::Mapped(layout) = outcome else {
            panic!("expected a mapping");
        };
        assert_eq!(layout.get_physical(QubitId(0)), Some(2));
        assert_eq!(layout.get_physical(QubitId(1)), Some(3));
        assert_eq!(layout.get_physical(QubitId(3)), Some(1));
        for (a, b) in [(0, 1), (2, 3), (3, 4)] {
            let pa = layout.get_physical(QubitId(a)).unwrap();
            let pb = layout.get_physical(QubitId(b)).unwrap();
            assert!(coupling.is_connected(pa, pb));
        }
    }

    #[test]
    fn test_budget_exhaustion_is_a_failure() {
        let coupling = CouplingMap::linear(3);
        let outcome = attempt(vec![GateRecord::cx(0, 1), GateRecord::cx(1, 2)], &coupling, Some(1));
        let MappingOutcome::Conflicted(report) = outcome else {
            panic!("one call cannot finish the search");
        };
        assert!(report.budget_exhausted);
    }

    #[test]
    fn test_isolated_qubit_leaves_room_in_discovery_order() {
        // q0 is discovered first but must not take the hub the pair needs.
        let coupling = CouplingMap::star(3);
        let records = vec![GateRecord::single("h", QubitId(0)), GateRecord::cx(1, 2)];

        for order in [IslandOrder::LargestFirst, IslandOrder::Discovery] {
            let outcome = attempt_in_order(records.clone(), &coupling, None, order);
            let MappingOutcome::Mapped(layout) = outcome else {
                panic!("expected a mapping under {order}");
            };
            assert_eq!(layout.get_physical(QubitId(1)), Some(0));
            assert_eq!(layout.get_physical(QubitId(2)), Some(1));
            assert_eq!(layout.get_physical(QubitId(0)), Some(2));
        }
    }

    #[test]
    fn test_isolated_qubits_take_lowest_free() {
        let coupling = CouplingMap::linear(4);
        let outcome = attempt(
            vec![GateRecord::single("h", QubitId(3)), GateRecord::cx(0, 1)],
            &coupling,
            None,
        );
        let MappingOutcome::Mapped(layout) = outcome else {
            panic!("expected a mapping");
        };
        assert_eq!(layout.get_physical(QubitId(0)), Some(0));
        assert_eq!(layout.get_physical(QubitId(1)), Some(1));
        assert_eq!(layout.get_physical(QubitId(3)), Some(2));
        assert!(!layout.is_mapped(QubitId(2)));
    }
}
