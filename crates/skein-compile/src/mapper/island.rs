//! Interaction graph of a gate range and its connected components.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use skein_ir::{GateNode, QubitId};

use crate::config::IslandOrder;

/// A connected component of the interaction graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Island {
    /// Vertices in BFS discovery order.
    vertices: Vec<QubitId>,
    /// Ascending neighbour lists.
    neighbors: BTreeMap<QubitId, Vec<QubitId>>,
    num_edges: usize,
}

impl Island {
    /// Vertices in discovery order.
    pub fn vertices(&self) -> &[QubitId] {
        &self.vertices
    }

    /// Island neighbours of `qubit`, ascending.
    pub fn neighbors(&self, qubit: QubitId) -> &[QubitId] {
        match self.neighbors.get(&qubit) {
            Some(list) => list,
            None => &[],
        }
    }

    /// Number of island neighbours of `qubit`.
    pub fn degree(&self, qubit: QubitId) -> usize {
        self.neighbors(qubit).len()
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the island has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of distinct interacting pairs.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Whether the island is one qubit touched only by single-qubit gates.
    pub fn is_isolated(&self) -> bool {
        self.num_edges == 0
    }
}

/// Split the interaction graph of `gates` into islands, in `order`.
///
/// Discovery runs a BFS from the lowest unvisited qubit, expanding neighbours
/// in ascending order.
pub fn islands(gates: &[GateNode], order: IslandOrder) -> Vec<Island> {
    let mut graph: BTreeMap<QubitId, BTreeSet<QubitId>> = BTreeMap::new();
    for node in gates {
        let (a, b) = node.gate.pair();
        graph.entry(a).or_default();
        graph.entry(b).or_default();
        if a != b {
            graph.entry(a).or_default().insert(b);
            graph.entry(b).or_default().insert(a);
        }
    }

    let mut visited = BTreeSet::new();
    let mut found = Vec::new();
    for &start in graph.keys() {
        if !visited.insert(start) {
            continue;
        }

        let mut vertices = Vec::new();
        let mut neighbors = BTreeMap::new();
        let mut degree_sum = 0;
        let mut queue = VecDeque::from([start]);
        while let Some(qubit) = queue.pop_front() {
            vertices.push(qubit);
            let adjacent: Vec<QubitId> = graph[&qubit].iter().copied().collect();
            degree_sum += adjacent.len();
            for &next in &adjacent {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
            neighbors.insert(qubit, adjacent);
        }

        found.push(Island {
            vertices,
            neighbors,
            num_edges: degree_sum / 2,
        });
    }

    if order == IslandOrder::LargestFirst {
        // Stable, so equal islands keep discovery order.
        found.sort_by(|a, b| {
            b.num_edges
                .cmp(&a.num_edges)
                .then_with(|| b.len().cmp(&a.len()))
        });
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_ir::{DependencyGraph, GateRecord};

    fn graph(records: Vec<GateRecord>) -> DependencyGraph {
        DependencyGraph::from_records(8, records).unwrap()
    }

    #[test]
    fn test_islands_discovery_order() {
        let dag = graph(vec![
            GateRecord::single("h", QubitId(5)),
            GateRecord::cx(3, 4),
            GateRecord::cx(0, 1),
            GateRecord::cx(1, 2),
        ]);
        let found = islands(dag.gates(), IslandOrder::Discovery);

        assert_eq!(found.len(), 3);
        assert_eq!(found[0].vertices(), &[QubitId(0), QubitId(1), QubitId(2)]);
        assert_eq!(found[0].num_edges(), 2);
        assert_eq!(found[1].vertices(), &[QubitId(3), QubitId(4)]);
        assert!(found[2].is_isolated());
        assert_eq!(found[2].vertices(), &[QubitId(5)]);
    }

    #[test]
    fn test_largest_first_is_stable() {
        let dag = graph(vec![
            GateRecord::single("x", QubitId(0)),
            GateRecord::cx(1, 2),
            GateRecord::cx(4, 3),
            GateRecord::cx(5, 6),
            GateRecord::cx(6, 7),
        ]);
        let found = islands(dag.gates(), IslandOrder::LargestFirst);

        let firsts: Vec<u32> = found.iter().map(|i| i.vertices()[0].0).collect();
        assert_eq!(firsts, vec![5, 1, 3, 0]);
    }

    #[test]
    fn test_repeated_pairs_count_once() {
        let dag = graph(vec![GateRecord::cx(0, 1), GateRecord::cx(1, 0), GateRecord::cx(0, 1)]);
        let found = islands(dag.gates(), IslandOrder::LargestFirst);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].num_edges(), 1);
        assert_eq!(found[0].degree(QubitId(0)), 1);
    }
}
