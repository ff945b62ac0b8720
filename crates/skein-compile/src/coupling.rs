//! Target device coupling map.

use petgraph::algo::{connected_components, floyd_warshall};
use petgraph::graph::{DiGraph, NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::{CompileError, CompileResult};

/// Target device coupling map.
///
/// The coupling map defines which pairs of physical qubits can
/// interact with two-qubit gates.
///
/// ## Performance
///
/// [`rebuild_caches()`](Self::rebuild_caches) runs an all-pairs shortest-path
/// relaxation (Floyd–Warshall with unit edge weights) once, so `distance()`
/// is an O(1) lookup during swap search. Factory methods and the readers call
/// it automatically; after manual `add_edge()` calls, `distance()` falls back
/// to a BFS until the caches are rebuilt.
///
/// ## Deserialization
///
/// After deserialization, call [`rebuild_caches()`](Self::rebuild_caches) to
/// recompute the adjacency list and the distance matrix (which are skipped
/// during serialization). [`from_json()`](Self::from_json) does this for you.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouplingMap {
    /// List of connected qubit pairs (bidirectional).
    edges: Vec<(u32, u32)>,
    /// Number of physical qubits.
    num_qubits: u32,
    /// Ascending neighbour list of every qubit.
    #[serde(skip)]
    adjacency: Vec<Vec<u32>>,
    /// Flat `num_qubits * num_qubits` distance matrix, `u32::MAX` if
    /// unreachable. Empty until the caches are built.
    #[serde(skip)]
    dist_matrix: Vec<u32>,
}

impl CouplingMap {
    /// Create a new coupling map with the given number of qubits and no edges.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            edges: vec![],
            num_qubits,
            adjacency: vec![Vec::new(); num_qubits as usize],
            dist_matrix: vec![],
        }
    }

    /// Build a coupling map from an edge list.
    pub fn from_edges(
        num_qubits: u32,
        edges: impl IntoIterator<Item = (u32, u32)>,
    ) -> CompileResult<Self> {
        let mut map = Self::new(num_qubits);
        for (a, b) in edges {
            map.add_edge(a, b)?;
        }
        map.rebuild_caches()?;
        Ok(map)
    }

    /// Read the plain-text format: the physical qubit count, the edge count,
    /// then that many `a b` pairs, all whitespace separated.
    ///
    /// ```
    /// use skein_compile::CouplingMap;
    ///
    /// let map = CouplingMap::parse("3\n2\n0 1\n1 2\n").unwrap();
    /// assert_eq!(map.num_qubits(), 3);
    /// assert_eq!(map.distance(0, 2), Some(2));
    /// ```
    pub fn parse(text: &str) -> CompileResult<Self> {
        let mut numbers = text.split_whitespace().enumerate().map(|(i, word)| {
            word.parse::<u32>().map_err(|_| {
                CompileError::InvalidCouplingMap(format!("token {} ('{word}') is not a number", i + 1))
            })
        });
        let mut next = |what: &str| {
            numbers
                .next()
                .unwrap_or_else(|| Err(CompileError::InvalidCouplingMap(format!("missing {what}"))))
        };

        let num_qubits = next("physical qubit count")?;
        let num_edges = next("edge count")?;
        let mut edges = Vec::with_capacity(num_edges as usize);
        for i in 0..num_edges {
            let a = next(&format!("first endpoint of edge {i}"))?;
            let b = next(&format!("second endpoint of edge {i}"))?;
            edges.push((a, b));
        }
        if numbers.next().is_some() {
            return Err(CompileError::InvalidCouplingMap(format!(
                "trailing data after {num_edges} edges"
            )));
        }

        Self::from_edges(num_qubits, edges)
    }

    /// Read a JSON-serialized coupling map and rebuild its caches.
    pub fn from_json(text: &str) -> CompileResult<Self> {
        let raw: CouplingMap = serde_json::from_str(text)
            .map_err(|e| CompileError::InvalidCouplingMap(e.to_string()))?;
        Self::from_edges(raw.num_qubits, raw.edges)
    }

    /// Build a named topology: `linear:N`, `ring:N`, `star:N`, `full:N` or
    /// `grid:RxC`.
    pub fn from_preset(name: &str) -> CompileResult<Self> {
        let invalid = || CompileError::InvalidCouplingMap(format!("unknown topology '{name}'"));
        let (kind, size) = name.split_once(':').ok_or_else(invalid)?;
        let count = |s: &str| s.trim().parse::<u32>().map_err(|_| invalid());

        match kind.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::linear(count(size)?)),
            "ring" => Ok(Self::ring(count(size)?)),
            "star" => Ok(Self::star(count(size)?)),
            "full" => Ok(Self::full(count(size)?)),
            "grid" => {
                let (rows, cols) = size.split_once(['x', 'X']).ok_or_else(invalid)?;
                Ok(Self::grid(count(rows)?, count(cols)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Add an edge between two qubits (bidirectional).
    ///
    /// Duplicate edges (including reversed pairs) are silently ignored.
    /// Self loops and out-of-range endpoints are rejected.
    pub fn add_edge(&mut self, q1: u32, q2: u32) -> CompileResult<()> {
        if q1 >= self.num_qubits || q2 >= self.num_qubits {
            return Err(CompileError::InvalidCouplingMap(format!(
                "edge ({q1}, {q2}) references a qubit outside 0..{}",
                self.num_qubits
            )));
        }
        if q1 == q2 {
            return Err(CompileError::InvalidCouplingMap(format!(
                "self loop on qubit {q1}"
            )));
        }
        if self.is_connected(q1, q2) {
            return Ok(());
        }

        self.edges.push((q1, q2));
        insert_sorted(&mut self.adjacency[q1 as usize], q2);
        insert_sorted(&mut self.adjacency[q2 as usize], q1);
        self.dist_matrix.clear();
        Ok(())
    }

    /// Rebuild the adjacency list and distance matrix from the edge list.
    pub fn rebuild_caches(&mut self) -> CompileResult<()> {
        let n = self.num_qubits as usize;
        self.adjacency = vec![Vec::new(); n];
        for &(a, b) in &self.edges {
            insert_sorted(&mut self.adjacency[a as usize], b);
            insert_sorted(&mut self.adjacency[b as usize], a);
        }
        self.precompute_distances()
    }

    /// All-pairs shortest paths by Floyd–Warshall relaxation.
    fn precompute_distances(&mut self) -> CompileResult<()> {
        let n = self.num_qubits as usize;
        let mut graph = DiGraph::<(), ()>::with_capacity(n, self.edges.len() * 2);
        for _ in 0..n {
            graph.add_node(());
        }
        for &(a, b) in &self.edges {
            graph.add_edge(NodeIndex::new(a as usize), NodeIndex::new(b as usize), ());
            graph.add_edge(NodeIndex::new(b as usize), NodeIndex::new(a as usize), ());
        }

        let distances = floyd_warshall(&graph, |_| 1u32).map_err(|_| {
            CompileError::InvalidCouplingMap("negative cycle in unit-weight graph".into())
        })?;

        self.dist_matrix = vec![u32::MAX; n * n];
        for ((from, to), d) in distances {
            self.dist_matrix[from.index() * n + to.index()] = d;
        }
        for q in 0..n {
            self.dist_matrix[q * n + q] = 0;
        }
        Ok(())
    }

    /// Check if two qubits are directly connected.
    #[inline]
    pub fn is_connected(&self, q1: u32, q2: u32) -> bool {
        self.adjacency
            .get(q1 as usize)
            .is_some_and(|neighbors| neighbors.binary_search(&q2).is_ok())
    }

    /// Get the number of physical qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the coupling edges.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Neighbours of a qubit in ascending order.
    #[inline]
    pub fn neighbors(&self, qubit: u32) -> &[u32] {
        match self.adjacency.get(qubit as usize) {
            Some(neighbors) => neighbors,
            None => &[],
        }
    }

    /// Number of neighbours of a qubit.
    #[inline]
    pub fn degree(&self, qubit: u32) -> usize {
        self.neighbors(qubit).len()
    }

    /// Shortest-path distance, `None` if unreachable.
    #[inline]
    pub fn distance(&self, from: u32, to: u32) -> Option<u32> {
        if from == to {
            return Some(0);
        }
        let n = self.num_qubits as usize;
        if from as usize >= n || to as usize >= n {
            return None;
        }
        if self.dist_matrix.len() == n * n {
            let d = self.dist_matrix[from as usize * n + to as usize];
            return (d != u32::MAX).then_some(d);
        }
        self.distance_bfs(from, to)
    }

    /// BFS fallback for distance computation.
    fn distance_bfs(&self, from: u32, to: u32) -> Option<u32> {
        let mut seen = vec![false; self.num_qubits as usize];
        let mut queue = VecDeque::from([(from, 0u32)]);
        seen[from as usize] = true;

        while let Some((current, dist)) = queue.pop_front() {
            for &neighbor in self.neighbors(current) {
                if neighbor == to {
                    return Some(dist + 1);
                }
                if !seen[neighbor as usize] {
                    seen[neighbor as usize] = true;
                    queue.push_back((neighbor, dist + 1));
                }
            }
        }

        None
    }

    /// Number of connected components (isolated qubits count as one each).
    pub fn num_components(&self) -> usize {
        let mut graph = UnGraph::<(), ()>::with_capacity(self.num_qubits as usize, self.edges.len());
        for _ in 0..self.num_qubits {
            graph.add_node(());
        }
        for &(a, b) in &self.edges {
            graph.add_edge(NodeIndex::new(a as usize), NodeIndex::new(b as usize), ());
        }
        connected_components(&graph)
    }

    /// Create a linear coupling map (0-1-2-3-...).
    pub fn linear(n: u32) -> Self {
        Self::build(n, (1..n).map(|i| (i - 1, i)))
    }

    /// Create a ring (a linear chain closed back to qubit 0).
    pub fn ring(n: u32) -> Self {
        let closing = (n > 2).then(|| (n - 1, 0));
        Self::build(n, (1..n).map(|i| (i - 1, i)).chain(closing))
    }

    /// Create a fully connected coupling map.
    pub fn full(n: u32) -> Self {
        Self::build(n, (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j))))
    }

    /// Create a star topology (center qubit connected to all others).
    pub fn star(n: u32) -> Self {
        Self::build(n, (1..n).map(|i| (0, i)))
    }

    /// Create a `rows x cols` grid; qubit `r * cols + c` sits at row `r`,
    /// column `c`.
    pub fn grid(rows: u32, cols: u32) -> Self {
        let right = (0..rows).flat_map(move |r| (1..cols).map(move |c| (r * cols + c - 1, r * cols + c)));
        let down = (1..rows).flat_map(move |r| (0..cols).map(move |c| ((r - 1) * cols + c, r * cols + c)));
        Self::build(rows * cols, right.chain(down))
    }

    /// Factory helper for edge sets that are valid by construction.
    fn build(n: u32, edges: impl Iterator<Item = (u32, u32)>) -> Self {
        let mut map = Self::new(n);
        for (a, b) in edges {
            if !map.is_connected(a, b) {
                map.edges.push((a, b));
                insert_sorted(&mut map.adjacency[a as usize], b);
                insert_sorted(&mut map.adjacency[b as usize], a);
            }
        }
        // Unit weights cannot form a negative cycle.
        let _ = map.precompute_distances();
        map
    }
}

fn insert_sorted(list: &mut Vec<u32>, value: u32) {
    if let Err(pos) = list.binary_search(&value) {
        list.insert(pos, value);
    }
}
