//! Candidate space of one island against the free part of the coupling graph.

use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, VecDeque};

use skein_ir::QubitId;

use super::island::Island;
use crate::coupling::CouplingMap;

/// Candidate physical qubits per island vertex, the query DAG rooted at the
/// most constrained vertex, and candidate edges along every DAG edge.
#[derive(Debug, Clone)]
pub struct CandidateSpace {
    root: QubitId,
    parents: BTreeMap<QubitId, Vec<QubitId>>,
    children: BTreeMap<QubitId, Vec<QubitId>>,
    candidates: BTreeMap<QubitId, Vec<u32>>,
    /// `(parent, child)` DAG edge -> parent candidate -> adjacent child
    /// candidates, ascending.
    edges: FxHashMap<(QubitId, QubitId), FxHashMap<u32, Vec<u32>>>,
}

impl CandidateSpace {
    /// Build the candidate space of `island`.
    ///
    /// `used[p]` marks physical qubits already taken by earlier islands of the
    /// same attempt; they and their incident couplings are ignored.
    pub fn build(island: &Island, coupling: &CouplingMap, used: &[bool]) -> Self {
        let n = coupling.num_qubits();
        let free = |p: u32| !used.get(p as usize).copied().unwrap_or(true);
        let remaining_degree: Vec<usize> = (0..n)
            .map(|p| {
                if free(p) {
                    coupling.neighbors(p).iter().filter(|&&q| free(q)).count()
                } else {
                    0
                }
            })
            .collect();

        let mut vertices = island.vertices().to_vec();
        vertices.sort_unstable();

        let candidates: BTreeMap<QubitId, Vec<u32>> = vertices
            .iter()
            .map(|&v| {
                let needed = island.degree(v);
                let list = (0..n)
                    .filter(|&p| free(p) && remaining_degree[p as usize] >= needed)
                    .collect();
                (v, list)
            })
            .collect();

        let root = select_root(&vertices, island, &candidates);

        // BFS rank from the root; every island edge points to the higher rank.
        let mut rank: BTreeMap<QubitId, usize> = BTreeMap::new();
        let mut queue = VecDeque::from([root]);
        rank.insert(root, 0);
        while let Some(v) = queue.pop_front() {
            for &w in island.neighbors(v) {
                if !rank.contains_key(&w) {
                    rank.insert(w, rank.len());
                    queue.push_back(w);
                }
            }
        }

        let mut parents: BTreeMap<QubitId, Vec<QubitId>> =
            vertices.iter().map(|&v| (v, Vec::new())).collect();
        let mut children: BTreeMap<QubitId, Vec<QubitId>> = parents.clone();
        for &u in &vertices {
            for &w in island.neighbors(u) {
                if rank[&u] < rank[&w] {
                    children.entry(u).or_default().push(w);
                    parents.entry(w).or_default().push(u);
                }
            }
        }

        let mut edges = FxHashMap::default();
        for (&u, kids) in &children {
            for &w in kids {
                let mut is_candidate = vec![false; n as usize];
                for &p in &candidates[&w] {
                    is_candidate[p as usize] = true;
                }
                let adjacency: FxHashMap<u32, Vec<u32>> = candidates[&u]
                    .iter()
                    .filter_map(|&pu| {
                        let list: Vec<u32> = coupling
                            .neighbors(pu)
                            .iter()
                            .copied()
                            .filter(|&pw| is_candidate[pw as usize])
                            .collect();
                        (!list.is_empty()).then_some((pu, list))
                    })
                    .collect();
                edges.insert((u, w), adjacency);
            }
        }

        Self {
            root,
            parents,
            children,
            candidates,
            edges,
        }
    }

    /// The DAG root.
    pub fn root(&self) -> QubitId {
        self.root
    }

    /// Number of island vertices.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the space covers no vertex.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// DAG parents of `v`, ascending.
    pub fn parents(&self, v: QubitId) -> &[QubitId] {
        self.parents.get(&v).map_or(&[][..], Vec::as_slice)
    }

    /// DAG children of `v`, ascending.
    pub fn children(&self, v: QubitId) -> &[QubitId] {
        self.children.get(&v).map_or(&[][..], Vec::as_slice)
    }

    /// Candidate set of `v`, ascending.
    pub fn candidates(&self, v: QubitId) -> &[u32] {
        self.candidates.get(&v).map_or(&[][..], Vec::as_slice)
    }

    /// Candidates of `child` adjacent to `parent_image` along the DAG edge
    /// `parent -> child`, ascending.
    pub fn adjacent(&self, parent: QubitId, child: QubitId, parent_image: u32) -> &[u32] {
        self.edges
            .get(&(parent, child))
            .and_then(|by_image| by_image.get(&parent_image))
            .map_or(&[][..], Vec::as_slice)
    }
}

/// The vertex minimising `|candidates| / degree`; the first one wins ties.
fn select_root(
    vertices: &[QubitId],
    island: &Island,
    candidates: &BTreeMap<QubitId, Vec<u32>>,
) -> QubitId {
    let mut best = vertices[0];
    for &v in &vertices[1..] {
        // |C(v)| / deg(v) < |C(best)| / deg(best), cross-multiplied.
        let lhs = candidates[&v].len() * island.degree(best).max(1);
        let rhs = candidates[&best].len() * island.degree(v).max(1);
        if lhs < rhs {
            best = v;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IslandOrder;
    use crate::mapper::island::islands;
    use skein_ir::{DependencyGraph, GateRecord};

    fn star_island() -> Island {
        let dag = DependencyGraph::from_records(
            4,
            vec![GateRecord::cx(0, 1), GateRecord::cx(0, 2), GateRecord::cx(0, 3)],
        )
        .unwrap();
        islands(dag.gates(), IslandOrder::LargestFirst).remove(0)
    }

    #[test]
    fn test_hub_is_root_and_only_fits_center() {
        let coupling = CouplingMap::star(5);
        let space = CandidateSpace::build(&star_island(), &coupling, &[false; 5]);

        assert_eq!(space.root(), QubitId(0));
        assert_eq!(space.candidates(QubitId(0)), &[0]);
        assert_eq!(space.candidates(QubitId(1)), &[0, 1, 2, 3, 4]);
        assert_eq!(space.children(QubitId(0)), &[QubitId(1), QubitId(2), QubitId(3)]);
        assert_eq!(space.parents(QubitId(2)), &[QubitId(0)]);
        assert_eq!(space.adjacent(QubitId(0), QubitId(3), 0), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_used_qubits_leave_the_data_graph() {
        let coupling = CouplingMap::star(5);
        let mut used = [false; 5];
        used[0] = true;
        let space = CandidateSpace::build(&star_island(), &coupling, &used);

        assert!(space.candidates(QubitId(0)).is_empty());
        assert!(space.candidates(QubitId(1)).is_empty());
    }

    #[test]
    fn test_path_island_on_linear() {
        let dag =
            DependencyGraph::from_records(3, vec![GateRecord::cx(0, 1), GateRecord::cx(1, 2)])
                .unwrap();
        let island = islands(dag.gates(), IslandOrder::LargestFirst).remove(0);
        let coupling = CouplingMap::linear(4);
        let space = CandidateSpace::build(&island, &coupling, &[false; 4]);

        // q1 needs degree 2: only the two inner qubits qualify.
        assert_eq!(space.root(), QubitId(1));
        assert_eq!(space.candidates(QubitId(1)), &[1, 2]);
        assert_eq!(space.adjacent(QubitId(1), QubitId(0), 1), &[0, 2]);
        assert_eq!(space.len(), 3);
    }
}
